//! Submission session management
//!
//! Handles the protocol stages, tunable options and the session client that
//! drives them.

pub mod client;
pub mod options;
pub mod stage;

pub use client::{BASE_SET_ID, DEFAULT_SERVER_ADDRESS, SessionClient};
pub use options::SessionOptions;
pub use stage::{Operation, Stage};
