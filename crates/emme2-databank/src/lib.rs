//! Reader for EMME/2 transportation planning databanks
//!
#![allow(clippy::cast_possible_truncation)] // Word-sized on-disk fields
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_sign_loss)] // Dimensions are validated before use
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Legacy parameter names don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::missing_errors_doc)] // Every fallible call returns DatabankError
//! An EMME/2 databank is a single binary file holding up to 99 internal
//! files: network, zone system, scenarios and matrices. This crate decodes
//! the metadata needed to locate and interpret them:
//!
//! - **Directory**: internal file offsets, record lengths and types, in
//!   both the packed pre-9.0 layout and the unpacked 9.0+ layout
//! - **Globals**: the 60 dimensioning parameters stored in File 1
//! - **Zones**: the bidirectional mapping between external zone numbers
//!   and internal positions
//! - **Matrices**: defined, column-wise and read-only flags plus
//!   timestamps for every `ms`, `mo`, `md` and `mf` matrix
//!
//! Words are 4 bytes in the byte order of the machine that wrote the
//! databank. That order is not stored in the file; pass it through
//! [`DatabankConfig`] when it is not little endian.
//!
//! # Example
//!
//! ```rust,no_run
//! use emme2_databank::{ByteOrder, Databank, DatabankConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabankConfig::new().with_byte_order(ByteOrder::Big);
//! let bank = Databank::open_with_config("emme2ban", &config)?;
//!
//! println!("{} directory", bank.directory_version());
//! println!("{} of {} zones used", bank.zones_used(), bank.max_zones());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Builder for minimal databanks used as fixtures
pub mod builder;

/// Configuration for opening a databank
pub mod config;

/// Open databank handle
pub mod databank;

/// Internal file directory decoding
pub mod directory;

/// Error types
pub mod error;

/// Global parameters from File 1
pub mod globals;

/// Matrix names and the matrix directory
pub mod matrix;

/// Byte-order aware word access
pub mod word;

/// Zone numbering
pub mod zones;

pub use builder::DatabankBuilder;
pub use config::DatabankConfig;
pub use databank::Databank;
pub use directory::{DirectoryVersion, FileDescriptor, FileDirectory, RecordType};
pub use error::{DatabankError, Result};
pub use globals::{GlobalField, GlobalParameters};
pub use matrix::{
    MatrixDirectory, MatrixFlags, MatrixId, MatrixType, matrix_number, matrix_type,
};
pub use word::{ByteOrder, WordReader};
pub use zones::ZoneIndex;
