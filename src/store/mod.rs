// Public API
pub use errors::StoreError;
pub use file::JsonFileKeyValueStore;
pub use repository::{
    load_json, save_json, InMemoryKeyValueStore, KeyValueStore, PostgresKeyValueStore,
};

// Internal modules
mod errors;
mod file;
mod repository;
