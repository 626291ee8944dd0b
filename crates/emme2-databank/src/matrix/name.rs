//! Matrix identifiers such as `"mf61"`

use crate::error::{DatabankError, Result};
use std::fmt;
use std::str::FromStr;

/// Number of matrix types
pub const MATRIX_TYPE_COUNT: usize = 4;

/// Matrix type, the second character of a matrix name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatrixType {
    /// `ms`: scalar matrix
    Scalar,
    /// `mo`: origin vector
    Origin,
    /// `md`: destination vector
    Destination,
    /// `mf`: full zone-to-zone matrix
    Full,
}

impl MatrixType {
    /// All types in directory order
    pub const ALL: [Self; MATRIX_TYPE_COUNT] = [Self::Scalar, Self::Origin, Self::Destination, Self::Full];

    /// Legacy type code (MS=1, MO=2, MD=3, MF=4)
    pub const fn code(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Origin => 2,
            Self::Destination => 3,
            Self::Full => 4,
        }
    }

    /// Two-letter prefix used in matrix names
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Scalar => "ms",
            Self::Origin => "mo",
            Self::Destination => "md",
            Self::Full => "mf",
        }
    }

    /// Map a type character, case-insensitively
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            's' => Some(Self::Scalar),
            'o' => Some(Self::Origin),
            'd' => Some(Self::Destination),
            'f' => Some(Self::Full),
            _ => None,
        }
    }
}

impl fmt::Display for MatrixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

fn invalid(name: &str, reason: &'static str) -> DatabankError {
    DatabankError::InvalidMatrixName {
        name: name.to_string(),
        reason,
    }
}

/// Type of the matrix named `name`
///
/// Only the character at index 1 is inspected. Names shorter than three
/// characters are rejected.
pub fn matrix_type(name: &str) -> Result<MatrixType> {
    if name.chars().count() < 3 {
        return Err(invalid(name, "name too short"));
    }

    name.chars()
        .nth(1)
        .and_then(MatrixType::from_char)
        .ok_or_else(|| invalid(name, "unknown matrix type"))
}

/// Number of the matrix named `name`
///
/// Everything from index 2 onward must be an unsigned decimal number.
pub fn matrix_number(name: &str) -> Result<u32> {
    let digits = name
        .char_indices()
        .nth(2)
        .map_or("", |(at, _)| &name[at..]);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(name, "matrix number is not numeric"));
    }

    digits
        .parse()
        .map_err(|_| invalid(name, "matrix number too large"))
}

/// A parsed matrix name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatrixId {
    /// Matrix type
    pub kind: MatrixType,
    /// Matrix number (1-based)
    pub number: u32,
}

impl MatrixId {
    /// Create an identifier from its parts
    pub const fn new(kind: MatrixType, number: u32) -> Self {
        Self { kind, number }
    }

    /// Parse a name such as `"mf61"` or `"MO3"`
    pub fn parse(name: &str) -> Result<Self> {
        Ok(Self {
            kind: matrix_type(name)?,
            number: matrix_number(name)?,
        })
    }
}

impl FromStr for MatrixId {
    type Err = DatabankError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MatrixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.kind.prefix(), self.number)
    }
}
