//! Stacks application library
//!
//! The book catalogue module and the bootstrap sequence that wires it to the
//! database and the HTTP server.

pub mod app;
pub mod modules;

/// Re-export commonly used types
pub use modules::*;
