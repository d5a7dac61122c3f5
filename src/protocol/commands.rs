//! Module `commands`
//!
//! Control commands sent from the client to the MOSS server and the
//! single-line framing they share.

use crate::error::SessionError;
use crate::protocol::Language;

/// A control command understood by the MOSS server.
///
/// Each variant renders to one line of space-separated fields.
#[derive(Debug, PartialEq)]
pub enum Command {
    Moss(String),      // Identify the submitting account
    Directory(u32),    // Group files by directory
    Experimental(u32), // Server-side experimental mode
    MaxMatches(u32),   // Ignore passages seen more often than this
    Show(u32),         // Number of matching pairs in the report
    Language(Language),
    File {
        set_id: u32,
        language: Language,
        length: usize,
        display_path: String,
    },
    Query(String), // Comment tag attached to the report
    End,
}

impl Command {
    /// Returns the fields making up this command line.
    pub fn fields(&self) -> Vec<String> {
        match self {
            Command::Moss(identity) => vec!["moss".into(), identity.clone()],
            Command::Directory(mode) => vec!["directory".into(), mode.to_string()],
            Command::Experimental(flag) => vec!["X".into(), flag.to_string()],
            Command::MaxMatches(max) => vec!["maxmatches".into(), max.to_string()],
            Command::Show(limit) => vec!["show".into(), limit.to_string()],
            Command::Language(language) => vec!["language".into(), language.to_string()],
            Command::File {
                set_id,
                language,
                length,
                display_path,
            } => vec![
                "file".into(),
                set_id.to_string(),
                language.to_string(),
                length.to_string(),
                display_path.clone(),
            ],
            Command::Query(comment) => vec!["query".into(), "0".into(), comment.clone()],
            Command::End => vec!["end".into()],
        }
    }

    /// Renders the command as a newline-terminated line.
    pub fn encode(&self) -> Result<String, SessionError> {
        encode_fields(&self.fields())
    }
}

/// Joins fields with a single space and terminates the line with `\n`.
///
/// Fails without producing any output when there are no fields or a field
/// would break the line framing.
pub fn encode_fields<S: AsRef<str>>(fields: &[S]) -> Result<String, SessionError> {
    if fields.is_empty() {
        return Err(SessionError::EmptyCommand);
    }
    if let Some(bad) = fields
        .iter()
        .map(AsRef::as_ref)
        .find(|field| field.contains(['\n', '\r']))
    {
        return Err(SessionError::InvalidField(bad.to_string()));
    }

    let mut line = fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    line.push('\n');
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_handshake_commands() {
        assert_eq!(Command::Moss("604014254".into()).encode().unwrap(), "moss 604014254\n");
        assert_eq!(Command::Directory(1).encode().unwrap(), "directory 1\n");
        assert_eq!(Command::Experimental(0).encode().unwrap(), "X 0\n");
        assert_eq!(Command::MaxMatches(10).encode().unwrap(), "maxmatches 10\n");
        assert_eq!(Command::Show(250).encode().unwrap(), "show 250\n");
        assert_eq!(
            Command::Language(Language::Java).encode().unwrap(),
            "language java\n"
        );
        assert_eq!(Command::End.encode().unwrap(), "end\n");
    }

    #[test]
    fn test_encode_file_header() {
        let header = Command::File {
            set_id: 3,
            language: Language::Python,
            length: 42,
            display_path: "src/a b.py".into(),
        };
        assert_eq!(header.encode().unwrap(), "file 3 python 42 src/a b.py\n");
    }

    #[test]
    fn test_query_with_empty_comment_keeps_trailing_separator() {
        assert_eq!(Command::Query(String::new()).encode().unwrap(), "query 0 \n");
        assert_eq!(
            Command::Query("lab 2".into()).encode().unwrap(),
            "query 0 lab 2\n"
        );
    }

    #[test]
    fn test_empty_command_rejected() {
        let none: [&str; 0] = [];
        assert!(matches!(encode_fields(&none), Err(SessionError::EmptyCommand)));
    }

    #[test]
    fn test_line_breaks_rejected() {
        assert!(matches!(
            Command::Moss("u1\nend".into()).encode(),
            Err(SessionError::InvalidField(f)) if f == "u1\nend"
        ));
        assert!(matches!(
            encode_fields(&["query", "0", "a\rb"]),
            Err(SessionError::InvalidField(_))
        ));
    }
}
