pub mod config;
pub mod domain;
pub mod error;
pub mod github;
pub mod handoff;
pub mod operations;
pub mod ui;

pub use error::{GhOpsError, Result};
