//! Background tasks module
//!
//! This module contains the focus timer, whose tick source runs as a tokio task
//! alongside the HTTP server.

pub mod countdown;

// Re-export main types
pub use countdown::CountdownTimer;
