//! Module `stage`
//!
//! The protocol stages of a submission session and the single table that
//! decides which operation is legal from which stage.

use std::fmt;

/// Position of a session in the fixed protocol sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Disconnected,
    AwaitingInitialization,
    AwaitingLanguage,
    AwaitingFiles,
    AwaitingQuery,
    AwaitingResults,
    AwaitingEnd,
}

/// A guarded session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Connect,
    SendInitialization,
    SendLanguage,
    UploadFile,
    SendQuery,
    Close,
}

impl Stage {
    /// Stage reached when `operation` succeeds from `self`, or `None` if the
    /// operation is not legal here.
    pub fn after(self, operation: Operation) -> Option<Stage> {
        use Operation::*;
        use Stage::*;

        match (self, operation) {
            (Disconnected, Connect) => Some(AwaitingInitialization),
            (AwaitingInitialization, SendInitialization) => Some(AwaitingLanguage),
            (AwaitingLanguage, SendLanguage) => Some(AwaitingFiles),
            (AwaitingFiles | AwaitingQuery, UploadFile) => Some(AwaitingQuery),
            (AwaitingQuery, SendQuery) => Some(AwaitingEnd),
            (Disconnected, Close) => None,
            (_, Close) => Some(Disconnected),
            _ => None,
        }
    }

    /// Whether a live connection belongs to this stage.
    pub fn is_connected(self) -> bool {
        self != Stage::Disconnected
    }

    /// Whether session options may still change.
    pub fn accepts_option_changes(self) -> bool {
        !matches!(self, Stage::AwaitingResults | Stage::AwaitingEnd)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Disconnected => "disconnected",
            Stage::AwaitingInitialization => "awaiting initialization",
            Stage::AwaitingLanguage => "awaiting language",
            Stage::AwaitingFiles => "awaiting files",
            Stage::AwaitingQuery => "awaiting query",
            Stage::AwaitingResults => "awaiting results",
            Stage::AwaitingEnd => "awaiting end",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Connect => "connect",
            Operation::SendInitialization => "send initialization",
            Operation::SendLanguage => "send language",
            Operation::UploadFile => "upload file",
            Operation::SendQuery => "send query",
            Operation::Close => "close",
        };
        f.write_str(name)
    }
}
