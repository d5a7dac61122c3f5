//! Module `file_ops`
//!
//! Reads caller-named source files and frames them for upload: one text
//! header line followed by exactly the declared number of raw bytes.

use log::{debug, info};
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::SessionError;
use crate::protocol::{Command, Language};
use crate::transfer::SourceFile;

/// Reads a source file from disk.
pub async fn load_source_file(path: &Path) -> Result<SourceFile, SessionError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| SessionError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(SourceFile {
        display_path: display_path(path),
        bytes,
    })
}

/// Path as shown in the report, with `\` separators turned into `/`.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Writes the `file` header and the raw payload, then flushes.
pub async fn write_file_frame<W>(
    writer: &mut W,
    set_id: u32,
    language: Language,
    file: &SourceFile,
) -> Result<(), SessionError>
where
    W: AsyncWrite + Unpin,
{
    let header = Command::File {
        set_id,
        language,
        length: file.len(),
        display_path: file.display_path.clone(),
    }
    .encode()?;

    info!("uploading file: {}", file.display_path);
    debug!("> {}", header.trim_end());

    writer.write_all(header.as_bytes()).await?;
    writer.write_all(&file.bytes).await?;
    writer.flush().await?;
    Ok(())
}
