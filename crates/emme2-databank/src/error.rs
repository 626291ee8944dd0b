//! Error types for databank decoding

use thiserror::Error;

/// Errors that can occur when opening or querying a databank
#[derive(Error, Debug)]
pub enum DatabankError {
    /// Open, seek or read failure, including reads past the end of the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Word accessor asked for a width other than 2 or 4 bytes
    #[error("Invalid word width: {0} bytes (expected 2 or 4)")]
    InvalidWordWidth(usize),

    /// Malformed matrix identifier such as `"xyz"` or `"mfAB"`
    #[error("Invalid matrix name {name:?}: {reason}")]
    InvalidMatrixName {
        /// The name as supplied by the caller
        name: String,
        /// Why the name was rejected
        reason: &'static str,
    },

    /// The file directory matches neither the packed nor the unpacked layout
    #[error("Unsupported directory version (first word 0x{first_word:08x}): {reason}")]
    UnsupportedDirectoryVersion {
        /// First four bytes of the file, as read in the configured byte order
        first_word: u32,
        /// Which check failed
        reason: &'static str,
    },

    /// Internal file number outside 1..=99
    #[error("Invalid internal file number: {0} (expected 1..=99)")]
    InvalidFileNumber(usize),

    /// A global parameter holds a value that cannot size the databank tables
    #[error("Invalid global parameter {field}: {value}")]
    InvalidGlobalParameter {
        /// Legacy parameter name
        field: &'static str,
        /// Value read from File 1
        value: i32,
    },

    /// External zone number in File 6 that cannot be indexed
    #[error("Invalid external zone number {external} at internal position {position}")]
    InvalidZoneNumber {
        /// Internal position (1-based) holding the number
        position: usize,
        /// Value read from File 6
        external: i32,
    },

    /// Well-formed matrix name whose directory entry is not flagged as defined
    #[error("Matrix not defined in databank: {0}")]
    MatrixNotDefined(String),

    /// `BinRW` failure that is not a plain I/O error
    #[error("Binary format error: {0}")]
    BinRw(binrw::Error),
}

impl From<binrw::Error> for DatabankError {
    fn from(err: binrw::Error) -> Self {
        match err {
            binrw::Error::Io(io) => Self::Io(io),
            other => Self::BinRw(other),
        }
    }
}

/// Type alias for databank operation results
pub type Result<T> = std::result::Result<T, DatabankError>;
