//! Internal file descriptors and the directory table

use crate::directory::version::DirectoryVersion;
use crate::error::{DatabankError, Result};
use tracing::debug;

/// Highest internal file number
pub const MAX_FILE_NUMBER: usize = 99;

/// Number of slots in the directory table (slot 0 is unused)
pub const DIRECTORY_SLOTS: usize = MAX_FILE_NUMBER + 1;

/// Byte offset of File 1 when the directory uses the packed layout
///
/// The packed directory occupies words 0..200, and File 1 follows it.
pub const PACKED_FILE_ONE_OFFSET: i64 = 200 * 4;

/// Type of the records stored in an internal file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordType {
    /// Type code 0, file not typed (usually unallocated)
    #[default]
    Unknown,
    /// Type code 1, 32-bit integers
    Integer,
    /// Type code 2, 32-bit reals
    Real,
    /// Type code 3, text
    Text,
}

impl RecordType {
    /// Map the low two bits of a type code
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            1 => Self::Integer,
            2 => Self::Real,
            3 => Self::Text,
            _ => Self::Unknown,
        }
    }

    /// Map a full type word, rejecting values outside 0..=3
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Integer),
            2 => Some(Self::Real),
            3 => Some(Self::Text),
            _ => None,
        }
    }

    /// Numeric type code as stored on disk
    pub const fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Integer => 1,
            Self::Real => 2,
            Self::Text => 3,
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Integer => write!(f, "integer"),
            Self::Real => write!(f, "real"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Location and shape of one internal file inside the databank
///
/// Downstream readers seek to `offset_bytes + n * record_length_bytes` to
/// reach record `n` (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileDescriptor {
    /// Absolute byte offset of the first record
    pub offset_bytes: i64,
    /// Length of one record in bytes
    pub record_length_bytes: i32,
    /// Number of records in the file
    pub record_count: i32,
    /// Type of the stored values
    pub record_type: RecordType,
}

impl FileDescriptor {
    /// Record length in 4-byte words
    pub const fn record_length_words(&self) -> i32 {
        self.record_length_bytes / 4
    }

    /// Byte offset of the 0-based record `record`
    pub const fn record_offset(&self, record: i64) -> i64 {
        self.offset_bytes + record * self.record_length_bytes as i64
    }

    /// Total size of the file in bytes
    pub const fn size_bytes(&self) -> i64 {
        self.record_length_bytes as i64 * self.record_count as i64
    }
}

/// The 100-entry internal file directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDirectory {
    version: DirectoryVersion,
    entries: [FileDescriptor; DIRECTORY_SLOTS],
}

impl FileDirectory {
    /// Create an empty directory for the given layout
    pub fn new(version: DirectoryVersion) -> Self {
        Self {
            version,
            entries: [FileDescriptor::default(); DIRECTORY_SLOTS],
        }
    }

    /// On-disk layout the directory was decoded from
    pub const fn version(&self) -> DirectoryVersion {
        self.version
    }

    /// Descriptor for internal file `file_number` (1..=99)
    pub fn get(&self, file_number: usize) -> Result<&FileDescriptor> {
        if (1..=MAX_FILE_NUMBER).contains(&file_number) {
            Ok(&self.entries[file_number])
        } else {
            Err(DatabankError::InvalidFileNumber(file_number))
        }
    }

    /// Replace the descriptor for internal file `file_number` (1..=99)
    pub fn set(&mut self, file_number: usize, descriptor: FileDescriptor) -> Result<()> {
        if (1..=MAX_FILE_NUMBER).contains(&file_number) {
            self.entries[file_number] = descriptor;
            Ok(())
        } else {
            Err(DatabankError::InvalidFileNumber(file_number))
        }
    }

    /// Iterate `(file_number, descriptor)` over files 1..=99
    pub fn iter(&self) -> impl Iterator<Item = (usize, &FileDescriptor)> {
        self.entries.iter().enumerate().skip(1)
    }

    /// Byte offset of File 1, where the global parameters start
    pub fn file_one_begin(&self) -> i64 {
        match self.version {
            DirectoryVersion::Packed => PACKED_FILE_ONE_OFFSET,
            DirectoryVersion::Unpacked => self.entries[1].offset_bytes,
        }
    }

    /// Emit the record table at debug level
    pub(crate) fn log_record_table(&self) {
        debug!("databank directory format: {}", self.version);
        debug!("file  recs  words/rec  type     offset");
        for (ifn, file) in self.iter() {
            debug!(
                "{:4}{:6}{:11}{:6}{:11}",
                ifn,
                file.record_count,
                file.record_length_words(),
                file.record_type.code(),
                file.offset_bytes
            );
        }
    }
}
