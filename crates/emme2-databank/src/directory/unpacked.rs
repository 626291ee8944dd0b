//! Unpacked (9.0+) directory decoder
//!
//! ```text
//! word   0        version probe
//! words  1 -  99  file offsets (words)
//! word 100        separator
//! words 101 - 199 records per file
//! word 200        separator
//! words 201 - 299 words per record
//! word 300        separator
//! words 301 - 399 record type
//! ```

use crate::directory::descriptor::{FileDescriptor, FileDirectory, MAX_FILE_NUMBER, RecordType};
use crate::directory::version::DirectoryVersion;
use crate::error::{DatabankError, Result};
use crate::word::{WORD_SIZE, WordReader};
use std::io::{Read, Seek};
use tracing::debug;

/// Byte offset of the first offset word
pub const DIRECTORY_START: u64 = WORD_SIZE;

/// Words per block including the trailing separator
pub const BLOCK_STRIDE_WORDS: u64 = MAX_FILE_NUMBER as u64 + 1;

/// Read and decode the unpacked directory for files 1..=99
///
/// `first_word` is only used to describe a rejected directory.
pub fn read_directory<R: Read + Seek>(
    reader: &mut WordReader<R>,
    first_word: u32,
) -> Result<FileDirectory> {
    debug!("Reading new file directory structure");

    reader.seek_to(DIRECTORY_START)?;
    let offsets = reader.read_words_here(MAX_FILE_NUMBER)?;
    reader.skip_words(1)?;
    let counts = reader.read_words_here(MAX_FILE_NUMBER)?;
    reader.skip_words(1)?;
    let lengths = reader.read_words_here(MAX_FILE_NUMBER)?;
    reader.skip_words(1)?;
    let types = reader.read_words_here(MAX_FILE_NUMBER)?;

    let unsupported = |reason| DatabankError::UnsupportedDirectoryVersion { first_word, reason };

    let mut directory = FileDirectory::new(DirectoryVersion::Unpacked);
    for slot in 0..MAX_FILE_NUMBER {
        let record_type = RecordType::from_code(types[slot])
            .ok_or_else(|| unsupported("record type out of range"))?;
        if offsets[slot] < 0 {
            return Err(unsupported("negative file offset"));
        }
        let record_length_bytes = lengths[slot]
            .checked_mul(WORD_SIZE as i32)
            .ok_or_else(|| unsupported("record length overflows"))?;

        directory.set(
            slot + 1,
            FileDescriptor {
                offset_bytes: i64::from(offsets[slot]) * WORD_SIZE as i64,
                record_length_bytes,
                record_count: counts[slot],
                record_type,
            },
        )?;
    }

    if directory.file_one_begin() <= 0 {
        return Err(unsupported("global parameter file has no offset"));
    }

    Ok(directory)
}
