#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

struct Written {
    name: String,
    method: u16,
    crc: u32,
    compressed: u64,
    uncompressed: u64,
    offset: u64,
}

const SATURATED: u32 = 0xFFFFFFFF;

/// Minimal ZIP writer for fixtures. Entries keep insertion order in the
/// central directory.
#[derive(Default)]
pub struct ZipBuilder {
    body: Vec<u8>,
    written: Vec<Written>,
    comment: Vec<u8>,
    zip64: bool,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(mut self, name: &str, data: &[u8]) -> Self {
        self.push(name, 0, data, data.to_vec());
        self
    }

    pub fn deflated(mut self, name: &str, data: &[u8]) -> Self {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        let packed = encoder.finish().unwrap();
        self.push(name, 8, data, packed);
        self
    }

    /// Entry with an arbitrary method id, data stored as-is.
    pub fn with_method(mut self, name: &str, method: u16, data: &[u8]) -> Self {
        self.push(name, method, data, data.to_vec());
        self
    }

    pub fn dir(self, name: &str) -> Self {
        assert!(name.ends_with('/'));
        self.stored(name, b"")
    }

    /// Write sizes and offsets through ZIP64 extra fields and records.
    pub fn zip64(mut self) -> Self {
        self.zip64 = true;
        self
    }

    /// Override the uncompressed size the central directory declares for
    /// the most recently added entry.
    pub fn declare_size(mut self, size: u64) -> Self {
        self.written
            .last_mut()
            .expect("declare_size after an entry")
            .uncompressed = size;
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.as_bytes().to_vec();
        self
    }

    fn push(&mut self, name: &str, method: u16, data: &[u8], packed: Vec<u8>) {
        let mut crc = flate2::Crc::new();
        crc.update(data);
        let entry = Written {
            name: name.to_string(),
            method,
            crc: crc.sum(),
            compressed: packed.len() as u64,
            uncompressed: data.len() as u64,
            offset: self.body.len() as u64,
        };

        let out = &mut self.body;
        out.extend_from_slice(b"PK\x03\x04");
        out.write_u16::<LittleEndian>(20).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(method).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(entry.crc).unwrap();
        out.write_u32::<LittleEndian>(entry.compressed as u32).unwrap();
        out.write_u32::<LittleEndian>(entry.uncompressed as u32).unwrap();
        out.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&packed);

        self.written.push(entry);
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = self.body;
        let cd_offset = out.len() as u64;

        for e in &self.written {
            let (compressed, uncompressed, offset, extra_len) = if self.zip64 {
                (SATURATED, SATURATED, SATURATED, 28u16)
            } else {
                (e.compressed as u32, e.uncompressed as u32, e.offset as u32, 0)
            };

            out.extend_from_slice(b"PK\x01\x02");
            out.write_u16::<LittleEndian>(45).unwrap();
            out.write_u16::<LittleEndian>(if self.zip64 { 45 } else { 20 }).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(e.method).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u32::<LittleEndian>(e.crc).unwrap();
            out.write_u32::<LittleEndian>(compressed).unwrap();
            out.write_u32::<LittleEndian>(uncompressed).unwrap();
            out.write_u16::<LittleEndian>(e.name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(extra_len).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap();
            out.write_u32::<LittleEndian>(offset).unwrap();
            out.extend_from_slice(e.name.as_bytes());

            if self.zip64 {
                out.write_u16::<LittleEndian>(0x0001).unwrap();
                out.write_u16::<LittleEndian>(24).unwrap();
                out.write_u64::<LittleEndian>(e.uncompressed).unwrap();
                out.write_u64::<LittleEndian>(e.compressed).unwrap();
                out.write_u64::<LittleEndian>(e.offset).unwrap();
            }
        }

        let cd_size = out.len() as u64 - cd_offset;
        let count = self.written.len() as u64;

        if self.zip64 {
            let eocd64_offset = out.len() as u64;
            out.extend_from_slice(b"PK\x06\x06");
            out.write_u64::<LittleEndian>(44).unwrap();
            out.write_u16::<LittleEndian>(45).unwrap();
            out.write_u16::<LittleEndian>(45).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap();
            out.write_u64::<LittleEndian>(count).unwrap();
            out.write_u64::<LittleEndian>(count).unwrap();
            out.write_u64::<LittleEndian>(cd_size).unwrap();
            out.write_u64::<LittleEndian>(cd_offset).unwrap();

            out.extend_from_slice(b"PK\x06\x07");
            out.write_u32::<LittleEndian>(0).unwrap();
            out.write_u64::<LittleEndian>(eocd64_offset).unwrap();
            out.write_u32::<LittleEndian>(1).unwrap();
        }

        let (count16, cd_size32, cd_offset32) = if self.zip64 {
            (0xFFFF, SATURATED, SATURATED)
        } else {
            (count as u16, cd_size as u32, cd_offset as u32)
        };

        out.extend_from_slice(b"PK\x05\x06");
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(count16).unwrap();
        out.write_u16::<LittleEndian>(count16).unwrap();
        out.write_u32::<LittleEndian>(cd_size32).unwrap();
        out.write_u32::<LittleEndian>(cd_offset32).unwrap();
        out.write_u16::<LittleEndian>(self.comment.len() as u16).unwrap();
        out.extend_from_slice(&self.comment);

        out
    }
}

/// Offset of the central directory, read from an archive that has no
/// archive comment and no ZIP64 records.
pub fn central_directory_offset(zip: &[u8]) -> usize {
    let eocd = zip.len() - 22;
    u32::from_le_bytes(zip[eocd + 16..eocd + 20].try_into().unwrap()) as usize
}

pub const STRUCTURED_COMMENT: &str = "\
Media ID: 555
Source: https://example.com/media/555
Extracted At: 2024-06-01T12:00:00
Total Comments: 1
========================================
#1 | User: Alice | Date: 2024-01-01
ID: abc123
Content:
Option C is correct
see page 12
----------------------------------------
";
