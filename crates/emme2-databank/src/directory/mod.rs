//! Internal file directory (File 0)
//!
//! The start of every databank is a directory describing up to 99
//! internal files multiplexed into the single databank file. Two layouts
//! exist: the packed pre-9.0 layout and the unpacked 9.0+ layout. The
//! first four bytes of the file select between them, see
//! [`DirectoryVersion::from_probe`].
//!
//! # Example
//!
//! ```rust,no_run
//! use emme2_databank::directory::read_directory;
//! use emme2_databank::word::{ByteOrder, WordReader};
//! use std::fs::File;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("emme2ban")?;
//! let mut reader = WordReader::new(file, ByteOrder::Little);
//! let directory = read_directory(&mut reader)?;
//!
//! let zones = directory.get(6)?;
//! println!("File 6 starts at byte {}", zones.offset_bytes);
//! # Ok(())
//! # }
//! ```

pub mod descriptor;
pub mod packed;
pub mod unpacked;
pub mod version;

pub use descriptor::{FileDescriptor, FileDirectory, MAX_FILE_NUMBER, RecordType};
pub use version::DirectoryVersion;

use crate::error::Result;
use crate::word::{ByteOrder, WordReader};
use std::io::{Read, Seek};

/// Detect the directory layout and decode the file directory
pub fn read_directory<R: Read + Seek>(reader: &mut WordReader<R>) -> Result<FileDirectory> {
    let probe = version::read_probe(reader.get_mut())?;
    let directory = match DirectoryVersion::from_probe(probe) {
        DirectoryVersion::Packed => packed::read_directory(reader)?,
        DirectoryVersion::Unpacked => {
            let first_word = match reader.byte_order() {
                ByteOrder::Little => u32::from_le_bytes(probe),
                ByteOrder::Big => u32::from_be_bytes(probe),
            };
            unpacked::read_directory(reader, first_word)?
        }
    };

    directory.log_record_table();
    Ok(directory)
}
