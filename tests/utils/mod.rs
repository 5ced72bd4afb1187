pub mod actions;
pub mod assertions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{assert_error, BattleAssertion};
#[allow(unused_imports)]
pub use mocks::{Failure, MockProfileSource};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
