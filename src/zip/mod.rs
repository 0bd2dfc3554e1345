//! ZIP archive reading.
//!
//! - [`structures`]: on-disk records (EOCD, ZIP64 records, entry metadata)
//! - [`parser`]: locating and parsing the central directory
//! - [`extractor`]: pulling an entry's bytes out of the archive
//!
//! Entries are always reported in central directory order.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for large archives
//! - STORED and DEFLATE compression methods
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - CRC-32 values are recorded but not verified

mod extractor;
mod parser;
mod structures;

pub use extractor::ZipExtractor;
pub use parser::ZipParser;
pub use structures::*;
