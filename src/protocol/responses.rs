//! MOSS response handling
//!
//! Reads one server line per protocol step and classifies it.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use url::Url;

use crate::error::SessionError;

/// Upper bound on a single response line, newline included.
pub const MAX_RESPONSE_LENGTH: usize = 1024;

/// Literal the server sends to accept the language.
pub const LANGUAGE_ACCEPTED: &str = "yes";

/// Reads exactly one newline-terminated response and returns its content
/// (everything before the final `\n`).
///
/// Partial reads are buffered until the newline arrives. Bytes left in the
/// buffer after the line mean the server sent more than one line.
pub async fn read_response_line<R>(reader: &mut BufReader<R>) -> Result<String, SessionError>
where
    R: AsyncRead + Unpin,
{
    let mut raw = Vec::with_capacity(64);
    let n = (&mut *reader)
        .take(MAX_RESPONSE_LENGTH as u64)
        .read_until(b'\n', &mut raw)
        .await?;

    if raw.last() != Some(&b'\n') {
        if n >= MAX_RESPONSE_LENGTH {
            return Err(SessionError::MalformedResponse(format!(
                "response exceeds {} bytes",
                MAX_RESPONSE_LENGTH
            )));
        }
        return Err(SessionError::Transport(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed before a complete response line",
        )));
    }
    if !reader.buffer().is_empty() {
        return Err(SessionError::MalformedResponse(
            "unexpected data after response line".into(),
        ));
    }

    raw.pop();
    String::from_utf8(raw)
        .map_err(|_| SessionError::MalformedResponse("response is not valid UTF-8".into()))
}

/// Classifies the reply to a `language` command.
pub fn parse_language_ack(content: &str) -> Result<(), SessionError> {
    if content == LANGUAGE_ACCEPTED {
        Ok(())
    } else {
        Err(SessionError::LanguageRejected(content.to_string()))
    }
}

/// Classifies the reply to a `query` command and parses the result location.
pub fn parse_query_result(content: &str) -> Result<Url, SessionError> {
    let starts_with_http = content
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"));
    if !starts_with_http {
        return Err(SessionError::QueryRejected(content.to_string()));
    }

    let trimmed = content.trim();
    Url::parse(trimmed).map_err(|source| SessionError::InvalidResult {
        response: trimmed.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn test_language_ack() {
        assert!(parse_language_ack("yes").is_ok());
        for reply in ["no", "", "YES", "yes ", "yes\r", "y"] {
            assert!(matches!(
                parse_language_ack(reply),
                Err(SessionError::LanguageRejected(r)) if r == reply
            ));
        }
    }

    #[test]
    fn test_query_result_accepts_http_prefix() {
        let url = parse_query_result("http://example.test/result/1").unwrap();
        assert_eq!(url.as_str(), "http://example.test/result/1");

        let url = parse_query_result("HTTP://moss.stanford.edu/results/7/ ").unwrap();
        assert_eq!(url.as_str(), "http://moss.stanford.edu/results/7/");
    }

    #[test]
    fn test_query_result_rejections() {
        assert!(matches!(
            parse_query_result("error: bad submission"),
            Err(SessionError::QueryRejected(_))
        ));
        assert!(matches!(parse_query_result(""), Err(SessionError::QueryRejected(_))));
        assert!(matches!(
            parse_query_result(" http://x/1"),
            Err(SessionError::QueryRejected(_))
        ));
        assert!(matches!(
            parse_query_result("httpnot a url"),
            Err(SessionError::InvalidResult { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_line_across_partial_writes() {
        let (client, mut server) = tokio::io::duplex(64);
        let mut reader = BufReader::new(client);

        let writer = tokio::spawn(async move {
            server.write_all(b"y").await.unwrap();
            tokio::task::yield_now().await;
            server.write_all(b"es\n").await.unwrap();
            server
        });

        assert_eq!(read_response_line(&mut reader).await.unwrap(), "yes");
        drop(writer.await.unwrap());
    }

    #[tokio::test]
    async fn test_read_bare_newline_is_empty() {
        let (client, mut server) = tokio::io::duplex(64);
        server.write_all(b"\n").await.unwrap();
        let mut reader = BufReader::new(client);
        assert_eq!(read_response_line(&mut reader).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_read_rejects_extra_line() {
        let (client, mut server) = tokio::io::duplex(64);
        server.write_all(b"yes\nyes\n").await.unwrap();
        let mut reader = BufReader::new(client);
        assert!(matches!(
            read_response_line(&mut reader).await,
            Err(SessionError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_read_eof_before_newline() {
        let (client, mut server) = tokio::io::duplex(64);
        server.write_all(b"ye").await.unwrap();
        drop(server);
        let mut reader = BufReader::new(client);
        assert!(matches!(
            read_response_line(&mut reader).await,
            Err(SessionError::Transport(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof
        ));
    }

    #[tokio::test]
    async fn test_read_rejects_oversized_line() {
        let (client, mut server) = tokio::io::duplex(4096);
        server
            .write_all(&vec![b'a'; MAX_RESPONSE_LENGTH + 10])
            .await
            .unwrap();
        let mut reader = BufReader::new(client);
        assert!(matches!(
            read_response_line(&mut reader).await,
            Err(SessionError::MalformedResponse(_))
        ));
    }
}
