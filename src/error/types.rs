//! Error types
//!
//! Defines the error taxonomy for a submission session.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::session::{Operation, Stage};

/// Broad classification of a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid construction input; no session is produced.
    Configuration,
    /// Operation attempted in a stage that does not permit it.
    Stage,
    /// The underlying stream failed on connect, read or write.
    Transport,
    /// The server explicitly declined a request.
    ProtocolRejection,
    /// Local data could not be read or a response could not be interpreted.
    Data,
}

/// Errors raised by [`SessionClient`](crate::session::SessionClient) operations
#[derive(Debug)]
pub enum SessionError {
    UnsupportedLanguage(String),
    AlreadyConnected,
    InvalidStage { operation: Operation, stage: Stage },
    SessionClosed,
    NoFilesUploaded,
    Transport(io::Error),
    LanguageRejected(String),
    QueryRejected(String),
    FileRead { path: PathBuf, source: io::Error },
    InvalidResult { response: String, source: url::ParseError },
    MalformedResponse(String),
    EmptyCommand,
    InvalidField(String),
}

impl SessionError {
    /// Returns the taxonomy bucket this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::UnsupportedLanguage(_) => ErrorCategory::Configuration,
            SessionError::AlreadyConnected
            | SessionError::InvalidStage { .. }
            | SessionError::SessionClosed
            | SessionError::NoFilesUploaded => ErrorCategory::Stage,
            SessionError::Transport(_) => ErrorCategory::Transport,
            SessionError::LanguageRejected(_) | SessionError::QueryRejected(_) => {
                ErrorCategory::ProtocolRejection
            }
            SessionError::FileRead { .. }
            | SessionError::InvalidResult { .. }
            | SessionError::MalformedResponse(_)
            | SessionError::EmptyCommand
            | SessionError::InvalidField(_) => ErrorCategory::Data,
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::UnsupportedLanguage(l) => {
                write!(f, "MOSS server does not recognize this programming language: {}", l)
            }
            SessionError::AlreadyConnected => write!(f, "Client is already connected"),
            SessionError::InvalidStage { operation, stage } => {
                write!(f, "Cannot {} while the session is {}", operation, stage)
            }
            SessionError::SessionClosed => write!(f, "Session has been closed"),
            SessionError::NoFilesUploaded => write!(f, "No submission files uploaded yet"),
            SessionError::Transport(e) => write!(f, "Transport error: {}", e),
            SessionError::LanguageRejected(r) => {
                write!(f, "Server rejected the language (response: {:?})", r)
            }
            SessionError::QueryRejected(r) => write!(
                f,
                "Submission failed, the server did not return a result URL (response: {:?})",
                r
            ),
            SessionError::FileRead { path, source } => {
                write!(f, "Cannot read {}: {}", path.display(), source)
            }
            SessionError::InvalidResult { response, source } => {
                write!(f, "Result location {:?} is not a valid URL: {}", response, source)
            }
            SessionError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            SessionError::EmptyCommand => write!(f, "Refusing to send an empty command"),
            SessionError::InvalidField(field) => {
                write!(f, "Command field contains a line break: {:?}", field)
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Transport(e) => Some(e),
            SessionError::FileRead { source, .. } => Some(source),
            SessionError::InvalidResult { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(error: io::Error) -> Self {
        SessionError::Transport(error)
    }
}
