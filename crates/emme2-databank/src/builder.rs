//! Builder for minimal databanks
//!
//! Writes a databank containing only what the decoder reads: the file
//! directory, the global parameter block, the scenario centroid counts,
//! the zone numbering (File 6) and the matrix directory (File 60). Useful
//! for fixtures and for exercising downstream readers without a licensed
//! copy of EMME/2.
//!
//! Layout of the generated file, in words:
//!
//! ```text
//! directory           packed: 0..200, unpacked: 0..400
//! File 1              (scenarios + 1) * 80 words
//! File 6              one record of max_zones words per scenario
//! File 60             8 * max_matrices words (flags then timestamps)
//! ```

use crate::directory::packed::encode_entry;
use crate::directory::version::PACKED_MARKER;
use crate::directory::{DirectoryVersion, MAX_FILE_NUMBER, RecordType};
use crate::error::Result;
use crate::globals::{GLOBAL_WORD_COUNT, GlobalField};
use crate::matrix::{MATRIX_DIRECTORY_FILE, MATRIX_TYPE_COUNT, MatrixFlags, MatrixId};
use crate::word::ByteOrder;
use crate::zones::{SCENARIO_BLOCK_WORDS, ZONE_NUMBER_FILE};
use binrw::BinWrite;
use std::collections::BTreeMap;
use std::io::Cursor;

/// Probe word written at the start of an unpacked directory
pub const UNPACKED_PROBE: i32 = 9;

/// One scenario of a generated databank
#[derive(Debug, Clone, PartialEq, Eq)]
struct Scenario {
    centroids: i32,
    external_numbers: Vec<i32>,
}

/// Extent of one internal file, in words
#[derive(Debug, Clone, Copy)]
struct Extent {
    offset_words: usize,
    record_length_words: usize,
    record_count: usize,
}

/// Builder for databank files
#[derive(Debug, Clone)]
pub struct DatabankBuilder {
    version: DirectoryVersion,
    byte_order: ByteOrder,
    globals: [i32; GLOBAL_WORD_COUNT],
    max_zones: usize,
    max_matrices: usize,
    scenarios: Vec<Scenario>,
    matrices: BTreeMap<MatrixId, (MatrixFlags, i32)>,
}

impl DatabankBuilder {
    /// Start an empty databank with the given directory layout
    pub fn new(version: DirectoryVersion) -> Self {
        Self {
            version,
            byte_order: ByteOrder::default(),
            globals: [0; GLOBAL_WORD_COUNT],
            max_zones: 0,
            max_matrices: 0,
            scenarios: Vec::new(),
            matrices: BTreeMap::new(),
        }
    }

    /// Byte order of the written words
    pub const fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set a global parameter
    ///
    /// MSCEN, MCENT and MMAT are derived from the scenarios, `max_zones`
    /// and `max_matrices` and are overwritten on build.
    pub const fn global(mut self, field: GlobalField, value: i32) -> Self {
        self.globals[field.index()] = value;
        self
    }

    /// Number of zone positions per scenario (MCENT)
    pub const fn max_zones(mut self, max_zones: usize) -> Self {
        self.max_zones = max_zones;
        self
    }

    /// Number of matrix slots per type (MMAT)
    pub const fn max_matrices(mut self, max_matrices: usize) -> Self {
        self.max_matrices = max_matrices;
        self
    }

    /// Add a scenario using `centroids` zones numbered `external_numbers`
    ///
    /// The numbering is padded with zeros, or truncated, to `max_zones`.
    pub fn scenario(mut self, centroids: i32, external_numbers: Vec<i32>) -> Self {
        self.scenarios.push(Scenario {
            centroids,
            external_numbers,
        });
        self
    }

    /// Set the directory entry of a matrix
    pub fn matrix(mut self, id: MatrixId, flags: MatrixFlags, timestamp: i32) -> Self {
        self.matrices.insert(id, (flags, timestamp));
        self
    }

    /// Serialize the databank
    pub fn build(&self) -> Result<Vec<u8>> {
        let words = self.layout_words();

        let mut cursor = Cursor::new(Vec::with_capacity(words.len() * 4));
        for word in &words {
            word.write_options(&mut cursor, self.byte_order.endian(), ())?;
        }
        Ok(cursor.into_inner())
    }

    fn directory_words(&self) -> usize {
        match self.version {
            DirectoryVersion::Packed => 200,
            DirectoryVersion::Unpacked => 400,
        }
    }

    fn layout_words(&self) -> Vec<i32> {
        let scenario_count = self.scenarios.len();
        let scenario_block = SCENARIO_BLOCK_WORDS as usize;

        let file1 = Extent {
            offset_words: self.directory_words(),
            record_length_words: scenario_block,
            record_count: scenario_count + 1,
        };
        let file6 = Extent {
            offset_words: file1.offset_words + file1.record_length_words * file1.record_count,
            record_length_words: self.max_zones,
            record_count: scenario_count.max(1),
        };
        let file60 = Extent {
            offset_words: file6.offset_words + file6.record_length_words * file6.record_count,
            record_length_words: 2 * MATRIX_TYPE_COUNT * self.max_matrices,
            record_count: 1,
        };
        let total = file60.offset_words + file60.record_length_words;

        let mut words = vec![0i32; total];
        self.write_directory(
            &mut words,
            &[(1, file1), (ZONE_NUMBER_FILE, file6), (MATRIX_DIRECTORY_FILE, file60)],
        );

        let mut globals = self.globals;
        globals[GlobalField::Mscen.index()] = scenario_count as i32;
        globals[GlobalField::Mcent.index()] = self.max_zones as i32;
        globals[GlobalField::Mmat.index()] = self.max_matrices as i32;
        words[file1.offset_words..file1.offset_words + GLOBAL_WORD_COUNT].copy_from_slice(&globals);

        for (i, scenario) in self.scenarios.iter().enumerate() {
            words[file1.offset_words + (i + 1) * scenario_block] = scenario.centroids;

            let record = file6.offset_words + i * file6.record_length_words;
            for (k, &external) in scenario.external_numbers.iter().take(self.max_zones).enumerate() {
                words[record + k] = external;
            }
        }

        let slots = MATRIX_TYPE_COUNT * self.max_matrices;
        for (id, (flags, timestamp)) in &self.matrices {
            let number = id.number as usize;
            if (1..=self.max_matrices).contains(&number) {
                let slot = (id.kind.code() - 1) * self.max_matrices + number - 1;
                words[file60.offset_words + slot] = flags.value() as i32;
                words[file60.offset_words + slots + slot] = *timestamp;
            }
        }

        words
    }

    fn write_directory(&self, words: &mut [i32], files: &[(usize, Extent)]) {
        match self.version {
            DirectoryVersion::Packed => {
                words[0] = match self.byte_order {
                    ByteOrder::Little => i32::from(PACKED_MARKER),
                    ByteOrder::Big => i32::from(PACKED_MARKER) << 24,
                };
                for &(ifn, extent) in files {
                    let (word1, word2) = encode_entry(
                        extent.offset_words as u32,
                        RecordType::Integer,
                        extent.record_length_words as u32,
                        extent.record_count as u32,
                    );
                    words[ifn] = word1 as i32;
                    words[ifn + 100] = word2 as i32;
                }
            }
            DirectoryVersion::Unpacked => {
                words[0] = UNPACKED_PROBE;
                let block = MAX_FILE_NUMBER + 1;
                for &(ifn, extent) in files {
                    words[ifn] = extent.offset_words as i32;
                    words[block + ifn] = extent.record_count as i32;
                    words[2 * block + ifn] = extent.record_length_words as i32;
                    words[3 * block + ifn] = RecordType::Integer.code();
                }
            }
        }
    }
}
