//! Word-level access to the databank file
//!
//! A databank is a flat sequence of 4-byte words (a few legacy fields are
//! 2 bytes wide). Words are written in the byte order of the host that
//! created the databank and the file carries no marker for it, so the
//! order is always an explicit [`ByteOrder`] supplied by the caller.

use crate::error::{DatabankError, Result};
use binrw::{BinRead, VecArgs};
use serde::{Deserialize, Serialize};
use std::io::{Read, Seek, SeekFrom};

/// Size of a databank word in bytes
pub const WORD_SIZE: u64 = 4;

/// Byte order of the words stored in a databank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Least significant byte first (x86 hosts; the default)
    #[default]
    Little,
    /// Most significant byte first (SPARC, POWER and other legacy Unix hosts)
    Big,
}

impl ByteOrder {
    /// Byte order of the machine running this code
    ///
    /// Legacy readers decoded databanks in host order implicitly, which only
    /// works when the databank was written on a host of the same order. Use
    /// this to reproduce that behaviour deliberately.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// Equivalent `binrw` endianness
    pub const fn endian(self) -> binrw::Endian {
        match self {
            Self::Little => binrw::Endian::Little,
            Self::Big => binrw::Endian::Big,
        }
    }
}

impl From<ByteOrder> for binrw::Endian {
    fn from(order: ByteOrder) -> Self {
        order.endian()
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Little => write!(f, "little-endian"),
            Self::Big => write!(f, "big-endian"),
        }
    }
}

/// Seekable word reader over an open databank
#[derive(Debug)]
pub struct WordReader<R> {
    inner: R,
    byte_order: ByteOrder,
}

impl<R: Read + Seek> WordReader<R> {
    /// Position the reader at an absolute byte offset
    pub fn seek_to(&mut self, offset_bytes: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset_bytes))?;
        Ok(())
    }

    /// Read a 2- or 4-byte word at `offset_bytes` as a signed integer
    ///
    /// 2-byte words are sign-extended.
    pub fn read_word(&mut self, offset_bytes: u64, width_bytes: usize) -> Result<i32> {
        if width_bytes != 2 && width_bytes != 4 {
            return Err(DatabankError::InvalidWordWidth(width_bytes));
        }

        self.seek_to(offset_bytes)?;
        let endian = self.byte_order.endian();
        let value = if width_bytes == 2 {
            i32::from(i16::read_options(&mut self.inner, endian, ())?)
        } else {
            i32::read_options(&mut self.inner, endian, ())?
        };
        Ok(value)
    }

    /// Read the 4-byte word at `offset_bytes`
    pub fn read_i32_at(&mut self, offset_bytes: u64) -> Result<i32> {
        self.read_word(offset_bytes, 4)
    }

    /// Read the 4-byte word at the current position
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::read_options(
            &mut self.inner,
            self.byte_order.endian(),
            (),
        )?)
    }

    /// Read `count` consecutive 4-byte words starting at `offset_bytes`
    pub fn read_words(&mut self, offset_bytes: u64, count: usize) -> Result<Vec<i32>> {
        self.seek_to(offset_bytes)?;
        self.read_words_here(count)
    }

    /// Read `count` consecutive 4-byte words from the current position
    ///
    /// Fails with `UnexpectedEof` before allocating when fewer than `count`
    /// words remain in the stream.
    pub fn read_words_here(&mut self, count: usize) -> Result<Vec<i32>> {
        self.ensure_remaining((count as u64).saturating_mul(WORD_SIZE))?;

        let words = Vec::<i32>::read_options(
            &mut self.inner,
            self.byte_order.endian(),
            VecArgs { count, inner: () },
        )?;
        Ok(words)
    }

    /// Check that `len` bytes remain after the current position
    fn ensure_remaining(&mut self, len: u64) -> Result<()> {
        let pos = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(pos))?;

        let remaining = end.saturating_sub(pos);
        if remaining < len {
            return Err(past_end(len, remaining));
        }
        Ok(())
    }

    /// Skip `count` words forward from the current position
    pub fn skip_words(&mut self, count: i64) -> Result<()> {
        self.inner
            .seek(SeekFrom::Current(count * WORD_SIZE as i64))?;
        Ok(())
    }

    /// Read the 4-byte IEEE real stored at `offset_bytes`
    pub fn read_real_at(&mut self, offset_bytes: u64) -> Result<f32> {
        self.seek_to(offset_bytes)?;
        Ok(f32::read_options(
            &mut self.inner,
            self.byte_order.endian(),
            (),
        )?)
    }

    /// Read `len` raw bytes at `offset_bytes`
    pub fn read_bytes_at(&mut self, offset_bytes: u64, len: usize) -> Result<Vec<u8>> {
        self.seek_to(offset_bytes)?;
        self.ensure_remaining(len as u64)?;
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }
}

impl<R> WordReader<R> {
    /// Wrap a reader, decoding words in `byte_order`
    pub const fn new(inner: R, byte_order: ByteOrder) -> Self {
        Self { inner, byte_order }
    }

    /// Byte order used to decode words
    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Borrow the underlying reader
    pub const fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the underlying reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

fn past_end(requested: u64, remaining: u64) -> DatabankError {
    DatabankError::Io(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        format!("read of {requested} bytes with {remaining} bytes left in the databank"),
    ))
}

/// Convert a signed byte offset taken from the directory into a seek position
///
/// A negative offset is reported as an `Io` error of kind `InvalidInput`,
/// the same class as a seek the operating system refuses. Directory
/// decoders reject negative file offsets themselves; this catches record
/// offsets derived from them.
pub(crate) fn seek_offset(offset_bytes: i64) -> Result<u64> {
    u64::try_from(offset_bytes).map_err(|_| {
        DatabankError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("negative databank offset {offset_bytes}"),
        ))
    })
}
