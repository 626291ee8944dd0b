//! Zone numbering (File 1 scenario blocks and File 6)
//!
//! Zones are stored densely inside the databank: internal position 1 is the
//! first zone, 2 the second, and so on. Analysts refer to zones by their
//! external number, which may skip values. File 6 holds, per scenario, the
//! external number of each internal position.
//!
//! ```text
//! centroids 3, 4 and 6 unused:
//!
//! external_by_internal   internal_by_external
//!   pos   ext              ext   pos
//!     1     1                1     1
//!     2     2                2     2
//!     3     5                3     0
//!     4     7                4     0
//!                            5     3
//!                            6     0
//!                            7     4
//! ```
//!
//! The scenario using the most centroids defines the numbering for the
//! whole databank, including scenarios that use fewer centroids.

use crate::directory::FileDirectory;
use crate::error::{DatabankError, Result};
use crate::globals::GlobalParameters;
use crate::word::{WORD_SIZE, WordReader, seek_offset};
use std::io::{Read, Seek};
use tracing::{Level, debug, warn};

/// Width in words of each scenario's parameter block in File 1
pub const SCENARIO_BLOCK_WORDS: i64 = 80;

/// Internal file holding external zone numbers
pub const ZONE_NUMBER_FILE: usize = 6;

/// Largest external zone number accepted
///
/// The internal-by-external table is dense, so its size follows the
/// highest external number rather than the zone count.
pub const MAX_EXTERNAL_ZONE: i32 = 9_999_999;

/// Scenario chosen to define the zone numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioCentroids {
    /// Scenario number (1-based)
    pub scenario: usize,
    /// Number of centroids used by that scenario
    pub centroids: i32,
}

/// Find the scenario with the most centroids
///
/// Scenario `i` stores its centroid count in the first word of the 80-word
/// block at `file_one_begin + i * 80 * 4`. Ties keep the lower scenario
/// number, and scenario 1 with 0 centroids is reported when no scenario
/// uses any.
pub fn scan_scenarios<R: Read + Seek>(
    reader: &mut WordReader<R>,
    file_one_begin: i64,
    max_scenarios: i32,
) -> Result<ScenarioCentroids> {
    let mut best = ScenarioCentroids {
        scenario: 1,
        centroids: 0,
    };

    for scenario in 1..=i64::from(max_scenarios) {
        let offset = file_one_begin + scenario * SCENARIO_BLOCK_WORDS * WORD_SIZE as i64;
        let centroids = reader.read_i32_at(seek_offset(offset)?)?;
        if centroids > best.centroids {
            best = ScenarioCentroids {
                scenario: scenario as usize,
                centroids,
            };
        }
    }

    Ok(best)
}

/// Bijection between internal zone positions and external zone numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneIndex {
    external_by_internal: Vec<i32>,
    internal_by_external: Vec<i32>,
    zones_used: usize,
    highest_zone: i32,
    scenario: usize,
}

impl ZoneIndex {
    /// Build the index from the File 6 record of the defining scenario
    ///
    /// `external_numbers[k]` is the external number of internal position
    /// `k + 1`. Non-positive entries mark unused positions. Entries above
    /// [`MAX_EXTERNAL_ZONE`] are rejected.
    pub fn from_external_numbers(
        scenario: ScenarioCentroids,
        external_numbers: &[i32],
    ) -> Result<Self> {
        let mut external_by_internal = vec![0i32; external_numbers.len() + 1];
        let mut highest_zone = 0i32;

        for (position, &external) in external_numbers.iter().enumerate() {
            if external > MAX_EXTERNAL_ZONE {
                return Err(DatabankError::InvalidZoneNumber {
                    position: position + 1,
                    external,
                });
            }
            if external > 0 {
                external_by_internal[position + 1] = external;
            }
            highest_zone = highest_zone.max(external);
        }

        let table_len = highest_zone as usize + 1;
        let mut internal_by_external = Vec::new();
        internal_by_external
            .try_reserve_exact(table_len)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::OutOfMemory, e))?;
        internal_by_external.resize(table_len, 0i32);

        for (position, &external) in external_numbers.iter().enumerate() {
            if external > 0 {
                let slot = &mut internal_by_external[external as usize];
                if *slot != 0 {
                    warn!(
                        external,
                        first = *slot,
                        second = position + 1,
                        "external zone number used twice; keeping the later position"
                    );
                }
                *slot = (position + 1) as i32;
            }
        }

        let zones_used = usize::try_from(scenario.centroids)
            .unwrap_or(0)
            .min(external_numbers.len());
        if let Some(position) = (1..=zones_used).find(|&p| external_by_internal[p] == 0) {
            warn!(
                position,
                zones_used, "internal zone position within the used range has no external number"
            );
        }

        Ok(Self {
            external_by_internal,
            internal_by_external,
            zones_used,
            highest_zone,
            scenario: scenario.scenario,
        })
    }

    /// Scan the scenarios and read the zone numbering from File 6
    pub fn read<R: Read + Seek>(
        reader: &mut WordReader<R>,
        directory: &FileDirectory,
        globals: &GlobalParameters,
    ) -> Result<Self> {
        let scenario = scan_scenarios(reader, directory.file_one_begin(), globals.max_scenarios())?;
        debug!(
            scenario = scenario.scenario,
            centroids = scenario.centroids,
            "scenario with the most centroids"
        );

        let file6 = directory.get(ZONE_NUMBER_FILE)?;
        let start = file6.record_offset(scenario.scenario as i64 - 1);
        let max_zones = globals.max_zones() as usize;
        let numbers = reader.read_words(seek_offset(start)?, max_zones)?;

        let index = Self::from_external_numbers(scenario, &numbers)?;
        index.log_numbering();
        Ok(index)
    }

    /// Number of zones used by the defining scenario
    pub const fn zones_used(&self) -> usize {
        self.zones_used
    }

    /// Highest external zone number
    pub const fn highest_zone(&self) -> i32 {
        self.highest_zone
    }

    /// Number of dimensioned zone positions
    pub fn max_zones(&self) -> usize {
        self.external_by_internal.len() - 1
    }

    /// Scenario whose numbering defines the index
    pub const fn scenario_with_most_centroids(&self) -> usize {
        self.scenario
    }

    /// External number by internal position, slot 0 unused
    pub fn external_numbers(&self) -> &[i32] {
        &self.external_by_internal
    }

    /// Internal position by external number, slot 0 unused, 0 = absent
    pub fn internal_numbers(&self) -> &[i32] {
        &self.internal_by_external
    }

    /// External number of internal position `internal`
    pub fn external_number(&self, internal: usize) -> Option<i32> {
        self.external_by_internal
            .get(internal)
            .copied()
            .filter(|&external| internal > 0 && external > 0)
    }

    /// Internal position of external zone `external`
    pub fn internal_number(&self, external: i32) -> Option<usize> {
        let slot = usize::try_from(external).ok().filter(|&e| e > 0)?;
        self.internal_by_external
            .get(slot)
            .copied()
            .filter(|&internal| internal > 0)
            .map(|internal| internal as usize)
    }

    /// Iterate `(internal, external)` for the used zones
    pub fn iter(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        (1..=self.zones_used).map(|internal| (internal, self.external_by_internal[internal]))
    }

    fn log_numbering(&self) {
        if !tracing::enabled!(Level::DEBUG) {
            return;
        }

        debug!("External Zone Numbering:");
        for (internal, external) in self.iter() {
            debug!(" {} {}", internal, external);
        }

        debug!("Internal Position Numbering:");
        for (external, internal) in self.internal_by_external.iter().enumerate().skip(1) {
            debug!(" {} {}", external, internal);
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::directory::{DirectoryVersion, FileDescriptor, RecordType};
    use crate::globals::{GLOBAL_WORD_COUNT, GlobalField};
    use crate::word::ByteOrder;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn scenario(scenario: usize, centroids: i32) -> ScenarioCentroids {
        ScenarioCentroids {
            scenario,
            centroids,
        }
    }

    #[test]
    fn test_skipped_centroids() {
        let index = ZoneIndex::from_external_numbers(scenario(1, 4), &[1, 2, 5, 7, 0, 0])
            .expect("Test operation should succeed");

        assert_eq!(index.zones_used(), 4);
        assert_eq!(index.max_zones(), 6);
        assert_eq!(index.highest_zone(), 7);
        assert_eq!(index.external_numbers(), &[0, 1, 2, 5, 7, 0, 0]);
        assert_eq!(index.internal_numbers(), &[0, 1, 2, 0, 0, 3, 0, 4]);
        assert_eq!(index.internal_number(5), Some(3));
        assert_eq!(index.internal_number(3), None);
        assert_eq!(index.internal_number(0), None);
        assert_eq!(index.internal_number(-1), None);
        assert_eq!(index.internal_number(8), None);
        assert_eq!(index.external_number(4), Some(7));
        assert_eq!(index.external_number(0), None);
        assert_eq!(index.external_number(5), None);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![(1, 1), (2, 2), (3, 5), (4, 7)]);
    }

    #[test]
    fn test_empty_numbering() {
        let index = ZoneIndex::from_external_numbers(scenario(1, 0), &[0, 0, 0])
            .expect("Test operation should succeed");
        assert_eq!(index.zones_used(), 0);
        assert_eq!(index.highest_zone(), 0);
        assert_eq!(index.internal_numbers(), &[0]);
        assert_eq!(index.iter().count(), 0);
    }

    #[test]
    fn test_duplicate_external_keeps_later_position() {
        let index = ZoneIndex::from_external_numbers(scenario(1, 3), &[4, 9, 4])
            .expect("Test operation should succeed");
        assert_eq!(index.internal_number(4), Some(3));
        assert_eq!(index.internal_number(9), Some(2));
    }

    #[test]
    fn test_oversized_external_number_is_rejected() {
        let result = ZoneIndex::from_external_numbers(scenario(1, 3), &[1, i32::MAX, 3]);
        assert!(matches!(
            result,
            Err(DatabankError::InvalidZoneNumber { position: 2, external: i32::MAX })
        ));

        let index = ZoneIndex::from_external_numbers(scenario(1, 1), &[MAX_EXTERNAL_ZONE])
            .expect("Test operation should succeed");
        assert_eq!(index.internal_number(MAX_EXTERNAL_ZONE), Some(1));
    }

    #[test]
    fn test_scan_scenarios_picks_first_maximum() {
        let file_one_begin = 800usize;
        let mut data = vec![0u8; file_one_begin + 6 * 80 * 4];
        for (scen, count) in [(1usize, 10i32), (2, 25), (3, 25), (4, -3), (5, 7)] {
            let at = file_one_begin + scen * 80 * 4;
            data[at..at + 4].copy_from_slice(&count.to_le_bytes());
        }
        let mut reader = WordReader::new(Cursor::new(data), ByteOrder::Little);

        let best = scan_scenarios(&mut reader, 800, 5).expect("Test operation should succeed");
        assert_eq!(best, scenario(2, 25));

        let none = scan_scenarios(&mut reader, 800, 0).expect("Test operation should succeed");
        assert_eq!(none, scenario(1, 0));
    }

    #[test]
    fn test_read_uses_defining_scenario_record() {
        // File 1 at 800, two scenarios; File 6 at 4000 with 4-zone records
        let mut data = vec![0u8; 5_000];
        let put = |data: &mut Vec<u8>, at: usize, value: i32| {
            data[at..at + 4].copy_from_slice(&value.to_be_bytes());
        };
        put(&mut data, 800 + 320, 2);
        put(&mut data, 800 + 640, 3);
        for (k, ext) in [11, 12, 0, 0].iter().enumerate() {
            put(&mut data, 4_000 + k * 4, *ext);
        }
        for (k, ext) in [21, 23, 22, 0].iter().enumerate() {
            put(&mut data, 4_016 + k * 4, *ext);
        }

        let mut directory = FileDirectory::new(DirectoryVersion::Packed);
        directory
            .set(
                ZONE_NUMBER_FILE,
                FileDescriptor {
                    offset_bytes: 4_000,
                    record_length_bytes: 16,
                    record_count: 2,
                    record_type: RecordType::Integer,
                },
            )
            .expect("valid slot");

        let mut words = [0i32; GLOBAL_WORD_COUNT];
        words[GlobalField::Mscen.index()] = 2;
        words[GlobalField::Mcent.index()] = 4;
        let globals = GlobalParameters::from_words(words);

        let mut reader = WordReader::new(Cursor::new(data), ByteOrder::Big);
        let index = ZoneIndex::read(&mut reader, &directory, &globals)
            .expect("Test operation should succeed");

        assert_eq!(index.scenario_with_most_centroids(), 2);
        assert_eq!(index.zones_used(), 3);
        assert_eq!(index.highest_zone(), 23);
        assert_eq!(index.external_numbers(), &[0, 21, 23, 22, 0]);
        assert_eq!(index.internal_number(22), Some(3));
    }

    fn distinct_zone_numbers() -> impl Strategy<Value = Vec<i32>> {
        prop::collection::btree_set(1i32..5_000, 1..200)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    }

    proptest! {
        #[test]
        fn zone_numbering_is_a_bijection(numbers in distinct_zone_numbers(), spare in 0usize..20) {
            let used = numbers.len();
            let mut record = numbers.clone();
            record.extend(std::iter::repeat_n(0, spare));

            let index = ZoneIndex::from_external_numbers(scenario(1, used as i32), &record)
                .expect("valid numbering");
            let externals = index.external_numbers();
            let internals = index.internal_numbers();

            prop_assert_eq!(index.zones_used(), used);
            for i in 1..=used {
                prop_assert!(externals[i] > 0);
                prop_assert_eq!(internals[externals[i] as usize], i as i32);
            }
            for x in 1..=index.highest_zone() {
                if !numbers.contains(&x) {
                    prop_assert_eq!(internals[x as usize], 0);
                    prop_assert_eq!(index.internal_number(x), None);
                }
            }
        }
    }
}
