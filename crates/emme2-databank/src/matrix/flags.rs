//! Matrix directory flags (`cflag`)

use std::fmt;

/// Packed per-matrix flags from the matrix directory
///
/// Bits 0-2 are interpreted. Bit 3 marks a shareable matrix stored
/// outside the databank; such matrices are not supported, so the bit is
/// reported through [`MatrixFlags::unhandled_bits`] rather than acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MatrixFlags(pub u32);

impl MatrixFlags {
    /// Matrix is defined (bit 0)
    pub const DEFINED: u32 = 0x0001;

    /// Matrix is stored column-wise (bit 1)
    pub const COLUMN_WISE: u32 = 0x0002;

    /// Matrix is read-only (bit 2)
    pub const READ_ONLY: u32 = 0x0004;

    /// Shareable read-only matrix stored externally (bit 3)
    pub const SHAREABLE_EXTERNAL: u32 = 0x0008;

    /// Bits this crate interprets
    pub const HANDLED: u32 = Self::DEFINED | Self::COLUMN_WISE | Self::READ_ONLY;

    /// Create flags from a raw value
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get raw value
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Check if flag is set
    pub const fn has(&self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Matrix is defined
    pub const fn is_defined(&self) -> bool {
        self.has(Self::DEFINED)
    }

    /// Matrix is stored column-wise
    pub const fn is_column_wise(&self) -> bool {
        self.has(Self::COLUMN_WISE)
    }

    /// Matrix is read-only
    pub const fn is_read_only(&self) -> bool {
        self.has(Self::READ_ONLY)
    }

    /// Matrix is a shareable matrix stored outside the databank
    pub const fn is_shareable_external(&self) -> bool {
        self.has(Self::SHAREABLE_EXTERNAL)
    }

    /// Set bits that are not interpreted, including bit 3
    pub const fn unhandled_bits(&self) -> u32 {
        self.0 & !Self::HANDLED
    }
}

impl fmt::Display for MatrixFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl From<u32> for MatrixFlags {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<i32> for MatrixFlags {
    fn from(value: i32) -> Self {
        Self::new(value as u32)
    }
}
