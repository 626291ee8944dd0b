//! Open databank handle
//!
//! Opening a databank runs a fixed pipeline: decode the file directory,
//! read the global parameters from File 1, build the zone numbering from
//! File 6 and read the matrix directory from File 60. A handle is only
//! returned when every step succeeds.
//!
//! # Example
//!
//! ```rust,no_run
//! use emme2_databank::Databank;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bank = Databank::open("emme2ban", true)?;
//! println!("{} zones used", bank.zones_used());
//!
//! if bank.matrix_exists("mf61")? && bank.is_column_wise_matrix("mf61")? {
//!     println!("mf61 is stored column-wise");
//! }
//! bank.close()?;
//! # Ok(())
//! # }
//! ```

use crate::config::DatabankConfig;
use crate::directory::{DirectoryVersion, FileDescriptor, FileDirectory, read_directory};
use crate::error::Result;
use crate::globals::GlobalParameters;
use crate::matrix::{MatrixDirectory, MatrixFlags, MatrixId, MatrixType};
use crate::word::{ByteOrder, WordReader};
use crate::zones::ZoneIndex;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// An open EMME/2 databank
///
/// All tables are decoded when the handle is created; queries afterwards
/// do not touch the underlying reader.
#[derive(Debug)]
pub struct Databank<R = File> {
    reader: WordReader<R>,
    path: Option<PathBuf>,
    read_only: bool,
    directory: FileDirectory,
    globals: GlobalParameters,
    zones: ZoneIndex,
    matrices: MatrixDirectory,
}

impl Databank<File> {
    /// Open the databank at `path` with little-endian words
    pub fn open<P: AsRef<Path>>(path: P, read_only: bool) -> Result<Self> {
        Self::open_with_config(path, &DatabankConfig::new().with_read_only(read_only))
    }

    /// Open the databank at `path`
    ///
    /// The file is opened for reading, and also for writing unless
    /// `config.read_only` is set.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: &DatabankConfig) -> Result<Self> {
        let path = path.as_ref();
        debug!(
            path = %path.display(),
            read_only = config.read_only,
            byte_order = %config.byte_order,
            "Opening databank"
        );

        let file = OpenOptions::new()
            .read(true)
            .write(!config.read_only)
            .open(path)
            .inspect_err(|e| error!(path = %path.display(), "Cannot open databank: {}", e))?;

        let mut bank = Self::from_reader(file, config)?;
        bank.path = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            version = %bank.directory_version(),
            zones = bank.zones_used(),
            "Opened databank"
        );
        Ok(bank)
    }

    /// Release the file
    ///
    /// A writable handle is synced to disk first.
    pub fn close(self) -> Result<()> {
        let read_only = self.read_only;
        let path = self.path;
        let file = self.reader.into_inner();
        if !read_only {
            file.sync_all()?;
        }
        debug!(path = ?path, "Closed databank");
        Ok(())
    }
}

impl<R: Read + Seek> Databank<R> {
    /// Decode a databank from any seekable reader
    pub fn from_reader(reader: R, config: &DatabankConfig) -> Result<Self> {
        let mut reader = WordReader::new(reader, config.byte_order);

        let directory = read_directory(&mut reader)?;
        debug!(
            version = %directory.version(),
            file_one_begin = directory.file_one_begin(),
            "Decoded file directory"
        );

        let globals = GlobalParameters::read(&mut reader, directory.file_one_begin())?;
        let zones = ZoneIndex::read(&mut reader, &directory, &globals)?;
        let matrices = MatrixDirectory::read(&mut reader, &directory, &globals)?;

        debug!(
            max_scenarios = globals.max_scenarios(),
            max_zones = globals.max_zones(),
            zones_used = zones.zones_used(),
            highest_zone = zones.highest_zone(),
            max_nodes = globals.max_nodes(),
            max_links = globals.max_links(),
            max_lines = globals.max_lines(),
            max_matrices = globals.max_matrices(),
            "Databank dimensions"
        );

        Ok(Self {
            reader,
            path: None,
            read_only: config.read_only,
            directory,
            globals,
            zones,
            matrices,
        })
    }
}

impl<R> Databank<R> {
    /// Path the databank was opened from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the handle was opened without write access
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Byte order used to decode words
    pub const fn byte_order(&self) -> ByteOrder {
        self.reader.byte_order()
    }

    /// Layout of the file directory
    pub const fn directory_version(&self) -> DirectoryVersion {
        self.directory.version()
    }

    /// The decoded file directory
    pub const fn file_directory(&self) -> &FileDirectory {
        &self.directory
    }

    /// Directory entry of internal file `file_number` (1..=99)
    pub fn file_parameters(&self, file_number: usize) -> Result<&FileDescriptor> {
        self.directory.get(file_number)
    }

    /// The global parameter block from File 1
    pub const fn global_parameters(&self) -> &GlobalParameters {
        &self.globals
    }

    /// Maximum number of scenarios (MSCEN)
    pub const fn max_scenarios(&self) -> i32 {
        self.globals.max_scenarios()
    }

    /// Maximum number of zones per scenario (MCENT)
    pub const fn max_zones(&self) -> i32 {
        self.globals.max_zones()
    }

    /// Maximum number of nodes (MNODE)
    pub const fn max_nodes(&self) -> i32 {
        self.globals.max_nodes()
    }

    /// Maximum number of links (MLINK)
    pub const fn max_links(&self) -> i32 {
        self.globals.max_links()
    }

    /// Maximum number of transit lines (MLINE)
    pub const fn max_lines(&self) -> i32 {
        self.globals.max_lines()
    }

    /// Matrix slots per type (MMAT)
    pub const fn max_matrices(&self) -> i32 {
        self.globals.max_matrices()
    }

    /// Zone numbering of the scenario with the most centroids
    pub const fn zone_index(&self) -> &ZoneIndex {
        &self.zones
    }

    /// Number of zones in use
    pub const fn zones_used(&self) -> usize {
        self.zones.zones_used()
    }

    /// Highest external zone number
    pub const fn highest_zone(&self) -> i32 {
        self.zones.highest_zone()
    }

    /// Internal position by external zone number, slot 0 unused
    pub fn internal_zone_numbers(&self) -> &[i32] {
        self.zones.internal_numbers()
    }

    /// External zone number by internal position, slot 0 unused
    pub fn external_zone_numbers(&self) -> &[i32] {
        self.zones.external_numbers()
    }

    /// The matrix directory from File 60
    pub const fn matrix_directory(&self) -> &MatrixDirectory {
        &self.matrices
    }

    /// Whether the matrix named `name` is defined
    pub fn matrix_exists(&self, name: &str) -> Result<bool> {
        self.matrices.exists(name)
    }

    /// Whether the full matrix named `name` is stored column-wise
    pub fn is_column_wise_matrix(&self, name: &str) -> Result<bool> {
        self.matrices.is_column_wise(name)
    }

    /// Whether the matrix named `name` is read-only
    pub fn is_read_only_matrix(&self, name: &str) -> Result<bool> {
        self.matrices.is_read_only(name)
    }

    /// Timestamp recorded for the matrix named `name`
    pub fn matrix_timestamp(&self, name: &str) -> Result<i32> {
        self.matrices.timestamp(name)
    }

    /// Raw directory flags of the matrix named `name`
    pub fn matrix_flags(&self, name: &str) -> Result<MatrixFlags> {
        self.matrices.flags(name)
    }

    /// Require the matrix named `name` to be defined
    pub fn check_matrix(&self, name: &str) -> Result<MatrixId> {
        self.matrices.check(name)
    }

    /// Defined matrices of one type, in number order
    pub fn defined_matrices(&self, kind: MatrixType) -> impl Iterator<Item = MatrixId> + '_ {
        self.matrices.defined(kind)
    }

    /// Underlying reader, for callers that decode further files
    pub fn reader_mut(&mut self) -> &mut R {
        self.reader.get_mut()
    }

    /// Word reader over the databank, in the configured byte order
    pub fn word_reader_mut(&mut self) -> &mut WordReader<R> {
        &mut self.reader
    }

    /// Consume the handle and return the underlying reader
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}
