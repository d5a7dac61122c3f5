//! Error handlers
//!
//! Reporting helpers used by the command-line submitter.

use crate::error::types::{ErrorCategory, SessionError};
use log::error;

/// Log a session error
pub fn handle_error(err: &SessionError) {
    error!("MOSS session error: {}", err);
}

/// Convert error to a process exit code
pub fn error_to_exit_code(err: &SessionError) -> i32 {
    match err.category() {
        ErrorCategory::Configuration => 2,
        ErrorCategory::Stage => 3,
        ErrorCategory::Transport => 4,
        ErrorCategory::ProtocolRejection => 5,
        ErrorCategory::Data => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            error_to_exit_code(&SessionError::UnsupportedLanguage("x".into())),
            error_to_exit_code(&SessionError::AlreadyConnected),
            error_to_exit_code(&SessionError::Transport(std::io::Error::from(
                std::io::ErrorKind::ConnectionReset,
            ))),
            error_to_exit_code(&SessionError::QueryRejected("error".into())),
            error_to_exit_code(&SessionError::EmptyCommand),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
