//! MOSS submission client
//!
//! Speaks the plaintext MOSS protocol: handshake, language negotiation,
//! source file uploads and the query that yields the report URL.

pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transfer;
pub mod utils;

pub use error::{ErrorCategory, SessionError};
pub use protocol::Language;
pub use session::{SessionClient, SessionOptions, Stage};
