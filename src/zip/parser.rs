//! Low-level ZIP archive parser.
//!
//! ZIP files are read from the end:
//! 1. Find the End of Central Directory (EOCD) at the file's end
//! 2. If ZIP64, follow the locator to the ZIP64 EOCD
//! 3. Read the Central Directory to get metadata for all entries
//! 4. For extraction, read each entry's Local File Header and data
//!
//! Only the archive's tail is needed to enumerate entries, which keeps
//! remote archives cheap to list.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Extra field tag carrying 64-bit sizes and offsets.
const ZIP64_EXTRA_ID: u16 = 0x0001;

/// Low-level ZIP file parser.
///
/// Generic over the reader type so the same code serves in-memory,
/// local and HTTP archives. Usually driven through
/// [`ZipExtractor`](super::ZipExtractor).
pub struct ZipParser<R: ReadAt> {
    reader: Arc<R>,
    size: u64,
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Returns the record together with its offset in the archive.
    ///
    /// # Errors
    ///
    /// Fails if no valid EOCD exists, i.e. the source is not a ZIP archive.
    pub async fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        let eocd_size = EndOfCentralDirectory::SIZE as u64;

        // Common case: no archive comment, EOCD is the last 22 bytes.
        if self.size >= eocd_size {
            let offset = self.size - eocd_size;
            let mut buf = vec![0u8; EndOfCentralDirectory::SIZE];
            self.reader.read_exact_at(offset, &mut buf).await?;

            if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && &buf[20..22] == b"\x00\x00" {
                let eocd = EndOfCentralDirectory::from_bytes(&buf)?;
                return Ok((eocd, offset));
            }
        }

        // Otherwise a comment follows the EOCD; scan backwards for a
        // signature whose comment length reaches exactly to the end.
        let search_size = (MAX_COMMENT_SIZE + eocd_size).min(self.size);
        let search_start = self.size - search_size;

        let mut buf = vec![0u8; search_size as usize];
        self.reader.read_exact_at(search_start, &mut buf).await?;

        for i in (0..buf.len().saturating_sub(EndOfCentralDirectory::SIZE)).rev() {
            if &buf[i..i + 4] != EndOfCentralDirectory::SIGNATURE {
                continue;
            }
            let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;
            if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
                let eocd =
                    EndOfCentralDirectory::from_bytes(&buf[i..i + EndOfCentralDirectory::SIZE])?;
                return Ok((eocd, search_start + i as u64));
            }
        }

        bail!("Not a valid ZIP file")
    }

    /// Read the ZIP64 End of Central Directory record.
    ///
    /// The locator sits immediately before the regular EOCD.
    pub async fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<Zip64EndOfCentralDirectory> {
        let locator_offset = eocd_offset
            .checked_sub(Zip64Locator::SIZE as u64)
            .context("Invalid ZIP64 format: no room for locator")?;
        let mut locator_buf = vec![0u8; Zip64Locator::SIZE];
        self.reader
            .read_exact_at(locator_offset, &mut locator_buf)
            .await?;

        let locator = Zip64Locator::from_bytes(&locator_buf)?;

        let mut eocd64_buf = vec![0u8; Zip64EndOfCentralDirectory::MIN_SIZE];
        self.reader
            .read_exact_at(locator.eocd64_offset, &mut eocd64_buf)
            .await?;

        Zip64EndOfCentralDirectory::from_bytes(&eocd64_buf)
    }

    /// List all entries in the archive, in central directory order.
    ///
    /// That order is the archive's iteration order: later entries win
    /// whenever two of them land on the same question.
    pub async fn list_entries(&self) -> Result<Vec<ZipEntry>> {
        let (eocd, eocd_offset) = self.find_eocd().await?;

        let (cd_offset, cd_size, total_entries) = if eocd.is_zip64() {
            let eocd64 = self.read_zip64_eocd(eocd_offset).await?;
            (eocd64.cd_offset, eocd64.cd_size, eocd64.total_entries)
        } else {
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
            )
        };

        if cd_offset.saturating_add(cd_size) > self.size {
            bail!("Central Directory extends past end of archive");
        }

        // Single read for the whole directory; one Range request over HTTP.
        let mut cd_data = vec![0u8; cd_size as usize];
        self.reader.read_exact_at(cd_offset, &mut cd_data).await?;

        let mut entries = Vec::with_capacity(total_entries.min(u16::MAX as u64) as usize);
        let mut cursor = Cursor::new(cd_data.as_slice());

        for index in 0..total_entries {
            let entry = Self::parse_cdfh(&mut cursor)
                .with_context(|| format!("Corrupt Central Directory entry #{}", index))?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Parse a Central Directory File Header from a cursor.
    fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipEntry> {
        let cd_len = cursor.get_ref().len() as u64;
        if cd_len.saturating_sub(cursor.position()) < CDFH_MIN_SIZE as u64 {
            bail!("Truncated Central Directory File Header");
        }

        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CDFH_SIGNATURE {
            bail!("Invalid Central Directory File Header");
        }

        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let _flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let _last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let _last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let mut compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let mut uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let _external_attrs = cursor.read_u32::<LittleEndian>()?;
        let mut lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes)?;
        // Non-UTF-8 names are kept readable rather than rejected.
        let name = String::from_utf8_lossy(&file_name_bytes).into_owned();
        let is_directory = name.ends_with('/');

        let extra_field_end = cursor.position() + extra_field_length as u64;
        let header_end = extra_field_end + file_comment_length as u64;
        if header_end > cd_len {
            bail!("Extra field or comment of {} extends past Central Directory", name);
        }

        while cursor.position() + 4 <= extra_field_end {
            let header_id = cursor.read_u16::<LittleEndian>()?;
            let field_size = cursor.read_u16::<LittleEndian>()?;
            let field_end = (cursor.position() + field_size as u64).min(extra_field_end);

            if header_id == ZIP64_EXTRA_ID {
                // Values appear only for header fields saturated at 0xFFFFFFFF,
                // always in this order.
                if uncompressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    uncompressed_size = cursor.read_u64::<LittleEndian>()?;
                }
                if compressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    compressed_size = cursor.read_u64::<LittleEndian>()?;
                }
                if lfh_offset == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    lfh_offset = cursor.read_u64::<LittleEndian>()?;
                }
            }
            cursor.set_position(field_end);
        }

        cursor.set_position(header_end);

        Ok(ZipEntry {
            name,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            crc32,
            lfh_offset,
            is_directory,
        })
    }

    /// Offset of an entry's data, just past its Local File Header.
    ///
    /// The local name and extra field may differ in length from the
    /// central directory copy, so the LFH itself has to be read.
    pub async fn data_offset(&self, entry: &ZipEntry) -> Result<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.reader
            .read_exact_at(entry.lfh_offset, &mut lfh_buf)
            .await
            .with_context(|| format!("Cannot read local header of {}", entry.name))?;

        if &lfh_buf[0..4] != LFH_SIGNATURE {
            bail!("Invalid Local File Header for {}", entry.name);
        }

        let mut cursor = Cursor::new(&lfh_buf);
        cursor.set_position(26);

        let file_name_length = cursor.read_u16::<LittleEndian>()? as u64;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as u64;

        Ok(entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length)
    }

    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}
