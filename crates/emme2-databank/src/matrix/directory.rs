//! Matrix directory (File 60)
//!
//! ```text
//! cflag(mmat, 4)      flags, type-major
//! itimst(mmat, 4)     timestamps, type-major
//! name(3, mmat, 4)    not decoded
//! descr(20, mmat, 4)  not decoded
//! ```

use crate::directory::FileDirectory;
use crate::error::{DatabankError, Result};
use crate::globals::GlobalParameters;
use crate::matrix::flags::MatrixFlags;
use crate::matrix::name::{MATRIX_TYPE_COUNT, MatrixId, MatrixType};
use crate::word::{WordReader, seek_offset};
use std::io::{Read, Seek};
use tracing::{Level, debug};

/// Internal file holding the matrix directory
pub const MATRIX_DIRECTORY_FILE: usize = 60;

/// Flags and timestamps for every matrix slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixDirectory {
    max_matrices: usize,
    flags: Vec<MatrixFlags>,
    timestamps: Vec<i32>,
}

impl MatrixDirectory {
    /// Build from type-major flag and timestamp words
    ///
    /// Both slices hold `4 * max_matrices` words ordered MS, MO, MD, MF.
    /// Missing trailing words read as zero.
    pub fn from_words(max_matrices: usize, flags: &[i32], timestamps: &[i32]) -> Self {
        let slots = MATRIX_TYPE_COUNT * max_matrices;
        let mut directory = Self {
            max_matrices,
            flags: vec![MatrixFlags::default(); slots],
            timestamps: vec![0; slots],
        };

        for (slot, &word) in directory.flags.iter_mut().zip(flags) {
            *slot = MatrixFlags::from(word);
        }
        for (slot, &word) in directory.timestamps.iter_mut().zip(timestamps) {
            *slot = word;
        }
        directory
    }

    /// Read the flag and timestamp blocks from File 60
    pub fn read<R: Read + Seek>(
        reader: &mut WordReader<R>,
        directory: &FileDirectory,
        globals: &GlobalParameters,
    ) -> Result<Self> {
        let max_matrices = globals.max_matrices() as usize;
        let slots = MATRIX_TYPE_COUNT * max_matrices;

        let file60 = directory.get(MATRIX_DIRECTORY_FILE)?;
        let flags = reader.read_words(seek_offset(file60.offset_bytes)?, slots)?;
        let timestamps = reader.read_words_here(slots)?;
        // TODO: decode the name(3,mmat,4) and descr(20,mmat,4) blocks that follow
        // the timestamps once their character encoding is confirmed on a real bank.

        let matrices = Self::from_words(max_matrices, &flags, &timestamps);
        matrices.log_defined();
        Ok(matrices)
    }

    /// Number of matrix slots per type
    pub const fn max_matrices(&self) -> usize {
        self.max_matrices
    }

    /// Validate a matrix name against the dimensioned number of matrices
    pub fn lookup(&self, name: &str) -> Result<MatrixId> {
        let id = MatrixId::parse(name)?;
        self.slot(id).map(|_| id).ok_or_else(|| DatabankError::InvalidMatrixName {
            name: name.to_string(),
            reason: "matrix number out of range",
        })
    }

    /// Validate a matrix name and require the matrix to be defined
    pub fn check(&self, name: &str) -> Result<MatrixId> {
        let id = self.lookup(name)?;
        if self.flags_of(id).is_defined() {
            Ok(id)
        } else {
            Err(DatabankError::MatrixNotDefined(name.to_string()))
        }
    }

    fn slot(&self, id: MatrixId) -> Option<usize> {
        let number = id.number as usize;
        (1..=self.max_matrices)
            .contains(&number)
            .then(|| (id.kind.code() - 1) * self.max_matrices + number - 1)
    }

    /// Flags of a matrix; out-of-range identifiers read as empty flags
    pub fn flags_of(&self, id: MatrixId) -> MatrixFlags {
        self.slot(id).map(|s| self.flags[s]).unwrap_or_default()
    }

    /// Timestamp of a matrix; out-of-range identifiers read as 0
    pub fn timestamp_of(&self, id: MatrixId) -> i32 {
        self.slot(id).map(|s| self.timestamps[s]).unwrap_or_default()
    }

    /// Flags of the matrix named `name`
    pub fn flags(&self, name: &str) -> Result<MatrixFlags> {
        Ok(self.flags_of(self.lookup(name)?))
    }

    /// Timestamp of the matrix named `name`
    pub fn timestamp(&self, name: &str) -> Result<i32> {
        Ok(self.timestamp_of(self.lookup(name)?))
    }

    /// Whether the matrix named `name` is defined (bit 0)
    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.flags(name)?.is_defined())
    }

    /// Whether the matrix named `name` is a column-wise full matrix
    ///
    /// Only full matrices have an orientation; other types always report
    /// `false` whatever their stored bits.
    pub fn is_column_wise(&self, name: &str) -> Result<bool> {
        let id = self.lookup(name)?;
        Ok(id.kind == MatrixType::Full && self.flags_of(id).is_column_wise())
    }

    /// Whether the matrix named `name` is read-only (bit 2)
    pub fn is_read_only(&self, name: &str) -> Result<bool> {
        Ok(self.flags(name)?.is_read_only())
    }

    /// Defined matrices of one type, in number order
    pub fn defined(&self, kind: MatrixType) -> impl Iterator<Item = MatrixId> + '_ {
        (1..=self.max_matrices as u32)
            .map(move |number| MatrixId::new(kind, number))
            .filter(|&id| self.flags_of(id).is_defined())
    }

    fn log_defined(&self) {
        if !tracing::enabled!(Level::DEBUG) {
            return;
        }

        debug!("Matrix Directory:");
        for id in self.defined(MatrixType::Full) {
            let flags = self.flags_of(id);
            if flags.unhandled_bits() != 0 {
                debug!("{} flags {} (unhandled bits 0x{:x})", id, flags, flags.unhandled_bits());
            } else {
                debug!("{}", id);
            }
        }
    }
}
