// Public API
pub use client::{GithubClient, ProfileSource};
pub use errors::FetchError;
pub use models::{ProfileRecord, RepositorySummary};

// Internal modules
mod client;
mod errors;
mod models;
