//! Logger setup for binaries and tools built on nanodraw.
//!
//! The library itself only talks to the `log` facade; installing a backend
//! is left to the application.

mod init;

pub use init::{LoggingConfig, init_logging};
