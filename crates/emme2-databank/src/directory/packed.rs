//! Packed (pre-9.0) directory decoder
//!
//! The old directory stores each internal file in two 32-bit words:
//! `word1` at word `ifn` and `word2` at word `ifn + 100`. Offsets are 29
//! bits wide and record lengths 23 bits wide, so their high bits are
//! scattered into spare bits of the two words:
//!
//! ```text
//! word1: bit 31     offset bit 28
//!        bit 30     record length bit 22
//!        bits 28-29 record type
//!        bits 0-27  offset bits 0-27
//!
//! word2: bit 31     record length bit 21
//!        bits 21-30 record count
//!        bits 0-20  record length bits 0-20
//! ```
//!
//! Offsets and record lengths are in words; they are scaled to bytes on
//! decode.

use crate::directory::descriptor::{FileDescriptor, FileDirectory, MAX_FILE_NUMBER, RecordType};
use crate::directory::version::DirectoryVersion;
use crate::error::Result;
use crate::word::{WORD_SIZE, WordReader};
use std::io::{Read, Seek};
use tracing::debug;

/// Word index of the second directory word for file 0
pub const WORD2_BASE: u64 = 100;

/// Offset bits 0-27 in `word1`
pub const OFFSET_LOW_MASK: u32 = 0x0FFF_FFFF;
/// Shift moving `word1` bit 31 to offset bit 28
pub const OFFSET_HIGH_SHIFT: u32 = 3;
/// Offset bit 28 after shifting
pub const OFFSET_HIGH_MASK: u32 = 0x1000_0000;

/// Shift moving the record type to bits 0-1
pub const RECORD_TYPE_SHIFT: u32 = 28;
/// Record type bits after shifting
pub const RECORD_TYPE_MASK: u32 = 0x0000_0003;

/// Record length bits 0-20 in `word2`
pub const RECORD_LENGTH_LOW_MASK: u32 = 0x001F_FFFF;
/// Shift moving `word2` bit 31 to record length bit 21
pub const RECORD_LENGTH_BIT21_SHIFT: u32 = 10;
/// Record length bit 21 after shifting
pub const RECORD_LENGTH_BIT21_MASK: u32 = 0x0020_0000;
/// Shift moving `word1` bit 30 to record length bit 22
pub const RECORD_LENGTH_BIT22_SHIFT: u32 = 8;
/// Record length bit 22 after shifting
pub const RECORD_LENGTH_BIT22_MASK: u32 = 0x0040_0000;

/// Shift moving the record count to bits 0-9
pub const RECORD_COUNT_SHIFT: u32 = 21;
/// Record count bits after shifting
pub const RECORD_COUNT_MASK: u32 = 0x0000_03FF;

/// File offset in words (29 bits)
pub const fn offset_words(word1: u32) -> u32 {
    (word1 & OFFSET_LOW_MASK) | ((word1 >> OFFSET_HIGH_SHIFT) & OFFSET_HIGH_MASK)
}

/// Record type code (0..=3)
pub const fn record_type_code(word1: u32) -> u32 {
    (word1 >> RECORD_TYPE_SHIFT) & RECORD_TYPE_MASK
}

/// Record length in words (23 bits)
pub const fn record_length_words(word1: u32, word2: u32) -> u32 {
    ((word1 >> RECORD_LENGTH_BIT22_SHIFT) & RECORD_LENGTH_BIT22_MASK)
        | ((word2 >> RECORD_LENGTH_BIT21_SHIFT) & RECORD_LENGTH_BIT21_MASK)
        | (word2 & RECORD_LENGTH_LOW_MASK)
}

/// Number of records (10 bits)
pub const fn record_count(word2: u32) -> u32 {
    (word2 >> RECORD_COUNT_SHIFT) & RECORD_COUNT_MASK
}

/// Decode one directory entry from its two words
pub const fn decode_entry(word1: u32, word2: u32) -> FileDescriptor {
    FileDescriptor {
        offset_bytes: offset_words(word1) as i64 * WORD_SIZE as i64,
        record_length_bytes: (record_length_words(word1, word2) * WORD_SIZE as u32) as i32,
        record_count: record_count(word2) as i32,
        record_type: RecordType::from_bits(record_type_code(word1)),
    }
}

/// Pack one directory entry into its two words
///
/// Inverse of [`decode_entry`]. Values wider than their field are
/// truncated to the field width.
pub const fn encode_entry(
    offset_words: u32,
    record_type: RecordType,
    record_length_words: u32,
    record_count: u32,
) -> (u32, u32) {
    let word1 = (offset_words & OFFSET_LOW_MASK)
        | ((offset_words & OFFSET_HIGH_MASK) << OFFSET_HIGH_SHIFT)
        | (((record_type.code() as u32) & RECORD_TYPE_MASK) << RECORD_TYPE_SHIFT)
        | ((record_length_words & RECORD_LENGTH_BIT22_MASK) << RECORD_LENGTH_BIT22_SHIFT);
    let word2 = (record_length_words & RECORD_LENGTH_LOW_MASK)
        | ((record_length_words & RECORD_LENGTH_BIT21_MASK) << RECORD_LENGTH_BIT21_SHIFT)
        | ((record_count & RECORD_COUNT_MASK) << RECORD_COUNT_SHIFT);
    (word1, word2)
}

/// Read and decode the packed directory for files 1..=99
pub fn read_directory<R: Read + Seek>(reader: &mut WordReader<R>) -> Result<FileDirectory> {
    debug!("Reading old file directory structure");

    let mut directory = FileDirectory::new(DirectoryVersion::Packed);
    for ifn in 1..=MAX_FILE_NUMBER as u64 {
        let word1 = reader.read_i32_at(ifn * WORD_SIZE)? as u32;
        let word2 = reader.read_i32_at((ifn + WORD2_BASE) * WORD_SIZE)? as u32;
        directory.set(ifn as usize, decode_entry(word1, word2))?;
    }

    Ok(directory)
}
