//! Backend test support utilities
//!
//! Shared logging initialization and HTTP response assertions for the
//! backend's integration tests.

pub mod http;
pub mod logging;
