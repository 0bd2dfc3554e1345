//! Entry points the viewer calls: one decode per selected archive.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::exam::{DecodeResponse, Exam, ExamDecoder};
use crate::io::{HttpRangeReader, LocalFileReader, MemoryReader, ReadAt};
use anyhow::Result;

/// Whether an archive location names a remote archive.
pub fn is_http_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

async fn decode_with<R: ReadAt + 'static>(reader: Arc<R>) -> Result<Vec<Exam>> {
    ExamDecoder::new(reader).decode().await
}

async fn try_load(location: &str) -> Result<Vec<Exam>> {
    if is_http_url(location) {
        let reader = HttpRangeReader::new(location.to_string()).await?;
        let reader = Arc::new(reader);
        let exams = decode_with(reader.clone()).await?;
        info!(
            transferred = reader.transferred_bytes(),
            "remote archive decoded"
        );
        Ok(exams)
    } else {
        let reader = Arc::new(LocalFileReader::new(Path::new(location))?);
        decode_with(reader).await
    }
}

fn respond(location: &str, result: Result<Vec<Exam>>) -> DecodeResponse {
    if let Err(err) = &result {
        warn!(%location, error = %format!("{:#}", err), "archive decode failed");
    }
    result.into()
}

/// Decode the archive at a local path or `http(s)://` URL.
///
/// Never fails: problems come back as `success: false` with a message.
pub async fn load_exams(location: &str) -> DecodeResponse {
    respond(location, try_load(location).await)
}

/// Decode an archive already held in memory.
pub async fn decode_bytes(bytes: impl Into<Vec<u8>>) -> DecodeResponse {
    let reader = Arc::new(MemoryReader::new(bytes));
    respond("<memory>", decode_with(reader).await)
}

/// Fetch one attachment's bytes by the `path` recorded at decode time.
pub async fn read_attachment(location: &str, entry_path: &str) -> Result<Vec<u8>> {
    if is_http_url(location) {
        let reader = Arc::new(HttpRangeReader::new(location.to_string()).await?);
        ExamDecoder::new(reader).read_attachment(entry_path).await
    } else {
        let reader = Arc::new(LocalFileReader::new(Path::new(location))?);
        ExamDecoder::new(reader).read_attachment(entry_path).await
    }
}
