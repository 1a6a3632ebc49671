//! Decide the next release of a component from the pull requests merged
//! since its last release tag.

pub mod bump;
pub mod config;
pub mod error;
pub mod github_client;
pub mod models;
pub mod outputs;
pub mod release;

pub use bump::{BumpOutcome, Bumper};
pub use error::{ReleaseError, Result};
pub use release::Increment;
