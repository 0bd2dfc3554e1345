use flate2::read::DeflateDecoder;
use std::io::Read;
use std::sync::Arc;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipEntry};

/// Upper bound on pre-allocation relative to the compressed size.
const MAX_PREALLOC_RATIO: u64 = 16;

/// ZIP entry reader: lists entries and inflates their contents
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all entries in the archive
    pub async fn list_entries(&self) -> Result<Vec<ZipEntry>> {
        self.parser.list_entries().await
    }

    /// Read and decompress an entry into memory
    pub async fn extract_to_memory(&self, entry: &ZipEntry) -> Result<Vec<u8>> {
        let data_offset = self.parser.data_offset(entry).await?;
        if data_offset.saturating_add(entry.compressed_size) > self.parser.reader().size() {
            bail!("Data of {} extends past end of archive", entry.name);
        }

        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut raw)
            .await
            .with_context(|| format!("Cannot read data of {}", entry.name))?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => {
                // The declared size is untrusted; never reserve more than a
                // generous multiple of what was actually read.
                let reserve = entry
                    .uncompressed_size
                    .min(entry.compressed_size.saturating_mul(MAX_PREALLOC_RATIO));
                let mut out = Vec::with_capacity(reserve as usize);
                // One byte of slack is enough to detect an oversized stream.
                DeflateDecoder::new(raw.as_slice())
                    .take(entry.uncompressed_size.saturating_add(1))
                    .read_to_end(&mut out)
                    .with_context(|| format!("Cannot inflate {}", entry.name))?;
                out
            }
            CompressionMethod::Unknown(method) => bail!(
                "Unsupported compression method {} for {} (only STORED and DEFLATE are supported)",
                method,
                entry.name
            ),
        };

        if data.len() as u64 != entry.uncompressed_size {
            bail!(
                "Size mismatch for {}: expected {} bytes, got {}",
                entry.name,
                entry.uncompressed_size,
                data.len()
            );
        }

        Ok(data)
    }

    /// Look up an entry by its full path and return its contents.
    ///
    /// With duplicate paths the last one in the directory wins, like
    /// everywhere else in the archive.
    pub async fn extract_by_name(&self, name: &str) -> Result<Vec<u8>> {
        let entries = self.list_entries().await?;
        let entry = entries
            .iter()
            .rev()
            .find(|e| !e.is_directory && e.name == name)
            .with_context(|| format!("Entry not found in archive: {}", name))?;
        self.extract_to_memory(entry).await
    }
}
