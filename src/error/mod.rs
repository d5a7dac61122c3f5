//! Error handling
//!
//! Defines error types and reporting for the submission client.

pub mod handlers;
pub mod types;

pub use types::*;
