//! Shared utilities for chanvote.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
