//! Directory layout detection

use crate::error::Result;
use std::io::{Read, Seek, SeekFrom};

/// Value of byte 0 that marks the packed (pre-9.0) directory
pub const PACKED_MARKER: u8 = 99;

/// On-disk layout of the internal file directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryVersion {
    /// Pre-9.0 two-word directory with 23-bit packed record lengths
    Packed,
    /// 9.0+ directory of four unpacked 99-word blocks
    Unpacked,
}

impl DirectoryVersion {
    /// Select the layout from the first four bytes of the file
    ///
    /// The packed layout starts with the bytes `99 0 0 0`. Any other first
    /// word selects the unpacked layout. The check looks at individual
    /// bytes, so it does not depend on the configured byte order.
    pub const fn from_probe(probe: [u8; 4]) -> Self {
        if probe[0] == PACKED_MARKER && probe[1] == 0 && probe[2] == 0 && probe[3] == 0 {
            Self::Packed
        } else {
            Self::Unpacked
        }
    }

    /// Detect the layout by reading bytes 0..4
    ///
    /// The reader position is restored afterwards.
    pub fn detect<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let probe = read_probe(reader)?;
        Ok(Self::from_probe(probe))
    }

    /// Whether record lengths are bit-packed
    pub const fn is_packed(self) -> bool {
        matches!(self, Self::Packed)
    }
}

/// Read the first four bytes of the file, restoring the reader position
pub(crate) fn read_probe<R: Read + Seek>(reader: &mut R) -> Result<[u8; 4]> {
    let start_pos = reader.stream_position()?;
    reader.seek(SeekFrom::Start(0))?;

    let mut probe = [0u8; 4];
    reader.read_exact(&mut probe)?;

    reader.seek(SeekFrom::Start(start_pos))?;
    Ok(probe)
}

impl std::fmt::Display for DirectoryVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Packed => write!(f, "old, with 23 bit record length"),
            Self::Unpacked => write!(f, "32-bit"),
        }
    }
}
