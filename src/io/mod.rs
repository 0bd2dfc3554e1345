//! Random-access sources an archive can be read from.
//!
//! The ZIP reader only ever needs "give me these bytes at this offset",
//! so every backing store (memory, local disk, remote HTTP server) sits
//! behind the same [`ReadAt`] trait.

mod http;
mod local;
mod memory;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;
pub use memory::MemoryReader;

use anyhow::{Result, bail};
use async_trait::async_trait;

/// Trait for random access reading from a data source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer.
    ///
    /// Returns the number of bytes read, which may be short at the end
    /// of the source.
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Fill `buf` completely starting at `offset`.
    ///
    /// Fails if the source ends before the buffer is full, so a truncated
    /// archive is reported instead of silently yielding zeroed bytes.
    async fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_at(offset + filled as u64, &mut buf[filled..]).await?;
            if n == 0 {
                bail!(
                    "Unexpected end of archive: wanted {} bytes at offset {}, got {}",
                    buf.len(),
                    offset,
                    filled
                );
            }
            filled += n;
        }
        Ok(())
    }
}
