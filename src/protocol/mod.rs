//! MOSS protocol implementation
//!
//! Handles command framing, response parsing and the supported language set.

pub mod commands;
pub mod language;
pub mod responses;

pub use commands::{Command, encode_fields};
pub use language::Language;
pub use responses::{parse_language_ack, parse_query_result, read_response_line};
