pub mod cloud;
pub mod config;
pub mod context;
pub mod error;
pub mod logger;
pub mod runner;
pub mod stats;
pub mod units;

// Re-export commonly used types
pub use error::{ProbeError, Result};
