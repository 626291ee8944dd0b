//! Global databank parameters (File 1, words 200-259)
//!
//! File 1 starts with a block of 60 integer parameters. They are stored
//! positionally, so the declaration order of [`GlobalField`] is the
//! on-disk order and must never change.

use crate::error::{DatabankError, Result};
use crate::word::{WordReader, seek_offset};
use std::io::{Read, Seek};

/// Legacy word number of the first global parameter
pub const FIRST_GLOBAL_WORD: usize = 200;

/// Number of words in the global parameter block
pub const GLOBAL_WORD_COUNT: usize = 60;

macro_rules! global_fields {
    ($($(#[$meta:meta])* $variant:ident => $name:literal,)+) => {
        /// One word of the global parameter block, declared in file order
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum GlobalField {
            $($(#[$meta])* $variant,)+
        }

        impl GlobalField {
            /// Every field in on-disk order
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Legacy parameter name
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

global_fields! {
    // Logical device numbers, words 200-209
    /// Logical device LDI
    Ldi => "LDI",
    /// Logical device LDO
    Ldo => "LDO",
    /// Logical device LGI
    Lgi => "LGI",
    /// Logical device LGO
    Lgo => "LGO",
    /// Logical device LDAI
    Ldai => "LDAI",
    /// Logical device LDAO
    Ldao => "LDAO",
    /// Logical device LERO
    Lero => "LERO",
    /// Logical device LLIO
    Llio => "LLIO",
    /// Logical device LREP
    Lrep => "LREP",
    /// Logical device LGRAPH
    Lgraph => "LGRAPH",

    // Physical device numbers, words 210-219
    /// Physical device 1
    Iphys1 => "IPHYS(1)",
    /// Physical device 2
    Iphys2 => "IPHYS(2)",
    /// Physical device 3
    Iphys3 => "IPHYS(3)",
    /// Physical device 4
    Iphys4 => "IPHYS(4)",
    /// Physical device 5
    Iphys5 => "IPHYS(5)",
    /// Physical device 6
    Iphys6 => "IPHYS(6)",
    /// Physical device 7
    Iphys7 => "IPHYS(7)",
    /// Physical device 8
    Iphys8 => "IPHYS(8)",
    /// Physical device 9
    Iphys9 => "IPHYS(9)",
    /// Physical device 10
    Iphys10 => "IPHYS(10)",

    // Miscellaneous parameters, words 220-249
    /// Parameter KMOD
    Kmod => "KMOD",
    /// Parameter IDEV
    Idev => "IDEV",
    /// Parameter ISHORT
    Ishort => "ISHORT",
    /// Parameter LPSIZ
    Lpsiz => "LPSIZ",
    /// Parameter IPGE
    Ipge => "IPGE",
    /// Parameter IDAT
    Idat => "IDAT",
    /// Parameter IUSR
    Iusr => "IUSR",
    /// Parameter ITPTER
    Itpter => "ITPTER",
    /// Parameter ITPPRI
    Itppri => "ITPPRI",
    /// Parameter ITPPLO
    Itpplo => "ITPPLO",
    /// Unused word 230
    Idm31 => "IDM31",
    /// Unused word 231
    Idm32 => "IDM32",
    /// Parameter IGCMD
    Igcmd => "IGCMD",
    /// Parameter ICPDAT
    Icpdat => "ICPDAT",
    /// Current scenario ISCEN
    Iscen => "ISCEN",
    /// Parameter IMODL
    Imodl => "IMODL",
    /// Parameter LMODL
    Lmodl => "LMODL",
    /// Parameter ICGM
    Icgm => "ICGM",
    /// Parameter IMFB
    Imfb => "IMFB",
    /// Parameter IEROP
    Ierop => "IEROP",
    /// Parameter KLU
    Klu => "KLU",
    /// Parameter KCU
    Kcu => "KCU",
    /// Parameter KEU
    Keu => "KEU",
    /// Unused word 243
    Idm44 => "IDM44",
    /// Unused word 244
    Idm45 => "IDM45",
    /// Unused word 245
    Idm46 => "IDM46",
    /// Unused word 246
    Idm47 => "IDM47",
    /// Unused word 247
    Idm48 => "IDM48",
    /// Unused word 248
    Idm49 => "IDM49",
    /// Databank release IDBREL
    Idbrel => "IDBREL",

    // Databank dimensions, words 250-259
    /// Maximum number of scenarios
    Mscen => "MSCEN",
    /// Maximum number of centroids (zones)
    Mcent => "MCENT",
    /// Maximum number of nodes
    Mnode => "MNODE",
    /// Maximum number of links
    Mlink => "MLINK",
    /// Maximum number of turn table entries
    Mturn => "MTURN",
    /// Maximum number of transit lines
    Mline => "MLINE",
    /// Maximum number of transit line segments
    Mlseg => "MLSEG",
    /// Maximum number of matrices per type
    Mmat => "MMAT",
    /// Maximum number of functions
    Mfunc => "MFUNC",
    /// Maximum number of operators
    Moper => "MOPER",
}

const _: () = assert!(GlobalField::ALL.len() == GLOBAL_WORD_COUNT);

impl GlobalField {
    /// Position within the block (0-based)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Legacy word number (200..=259)
    pub const fn word_number(self) -> usize {
        FIRST_GLOBAL_WORD + self.index()
    }
}

impl std::fmt::Display for GlobalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Dimensions that size the decoded tables and must not be negative
const DIMENSION_FIELDS: [GlobalField; 3] = [GlobalField::Mscen, GlobalField::Mcent, GlobalField::Mmat];

/// The 60-word global parameter block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalParameters {
    values: [i32; GLOBAL_WORD_COUNT],
}

impl GlobalParameters {
    /// Build from words in file order
    pub const fn from_words(values: [i32; GLOBAL_WORD_COUNT]) -> Self {
        Self { values }
    }

    /// Read the block starting at the File 1 byte offset
    pub fn read<R: Read + Seek>(reader: &mut WordReader<R>, file_one_begin: i64) -> Result<Self> {
        let words = reader.read_words(seek_offset(file_one_begin)?, GLOBAL_WORD_COUNT)?;

        let mut values = [0i32; GLOBAL_WORD_COUNT];
        values.copy_from_slice(&words);
        let globals = Self::from_words(values);

        for field in DIMENSION_FIELDS {
            let value = globals.get(field);
            if value < 0 {
                return Err(DatabankError::InvalidGlobalParameter {
                    field: field.name(),
                    value,
                });
            }
        }

        Ok(globals)
    }

    /// Value of a single parameter
    pub const fn get(&self, field: GlobalField) -> i32 {
        self.values[field.index()]
    }

    /// Raw words in file order
    pub const fn words(&self) -> &[i32; GLOBAL_WORD_COUNT] {
        &self.values
    }

    /// Iterate `(field, value)` in file order
    pub fn iter(&self) -> impl Iterator<Item = (GlobalField, i32)> + '_ {
        GlobalField::ALL.iter().map(|&field| (field, self.get(field)))
    }

    /// Physical device number `n` (1..=10)
    pub fn physical_device(&self, n: usize) -> Option<i32> {
        (1..=10)
            .contains(&n)
            .then(|| self.values[GlobalField::Iphys1.index() + n - 1])
    }

    /// Maximum number of scenarios (MSCEN)
    pub const fn max_scenarios(&self) -> i32 {
        self.get(GlobalField::Mscen)
    }

    /// Maximum number of zones (MCENT)
    pub const fn max_zones(&self) -> i32 {
        self.get(GlobalField::Mcent)
    }

    /// Maximum number of nodes (MNODE)
    pub const fn max_nodes(&self) -> i32 {
        self.get(GlobalField::Mnode)
    }

    /// Maximum number of links (MLINK)
    pub const fn max_links(&self) -> i32 {
        self.get(GlobalField::Mlink)
    }

    /// Maximum number of turn table entries (MTURN)
    pub const fn max_turns(&self) -> i32 {
        self.get(GlobalField::Mturn)
    }

    /// Maximum number of transit lines (MLINE)
    pub const fn max_lines(&self) -> i32 {
        self.get(GlobalField::Mline)
    }

    /// Maximum number of transit line segments (MLSEG)
    pub const fn max_line_segments(&self) -> i32 {
        self.get(GlobalField::Mlseg)
    }

    /// Maximum number of matrices per type (MMAT)
    pub const fn max_matrices(&self) -> i32 {
        self.get(GlobalField::Mmat)
    }

    /// Maximum number of functions (MFUNC)
    pub const fn max_functions(&self) -> i32 {
        self.get(GlobalField::Mfunc)
    }

    /// Maximum number of operators (MOPER)
    pub const fn max_operators(&self) -> i32 {
        self.get(GlobalField::Moper)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::word::ByteOrder;
    use std::io::Cursor;

    fn block_at(offset: usize, words: &[i32]) -> Vec<u8> {
        let mut data = vec![0u8; offset];
        data.extend(words.iter().flat_map(|w| w.to_le_bytes()));
        data
    }

    #[test]
    fn test_field_order_matches_word_numbers() {
        for (position, field) in GlobalField::ALL.iter().enumerate() {
            assert_eq!(field.index(), position);
        }
        assert_eq!(GlobalField::Ldi.word_number(), 200);
        assert_eq!(GlobalField::Iphys1.word_number(), 210);
        assert_eq!(GlobalField::Kmod.word_number(), 220);
        assert_eq!(GlobalField::Idbrel.word_number(), 249);
        assert_eq!(GlobalField::Mscen.word_number(), 250);
        assert_eq!(GlobalField::Moper.word_number(), 259);
    }

    #[test]
    fn test_read_positional_block() {
        let words: Vec<i32> = (0..60).map(|i| 1_000 + i).collect();
        let mut reader = WordReader::new(Cursor::new(block_at(800, &words)), ByteOrder::Little);
        let globals = GlobalParameters::read(&mut reader, 800).expect("Test operation should succeed");

        assert_eq!(globals.get(GlobalField::Ldi), 1_000);
        assert_eq!(globals.get(GlobalField::Lgraph), 1_009);
        assert_eq!(globals.physical_device(1), Some(1_010));
        assert_eq!(globals.physical_device(10), Some(1_019));
        assert_eq!(globals.physical_device(0), None);
        assert_eq!(globals.physical_device(11), None);
        assert_eq!(globals.get(GlobalField::Iscen), 1_034);
        assert_eq!(globals.max_scenarios(), 1_050);
        assert_eq!(globals.max_zones(), 1_051);
        assert_eq!(globals.max_nodes(), 1_052);
        assert_eq!(globals.max_links(), 1_053);
        assert_eq!(globals.max_turns(), 1_054);
        assert_eq!(globals.max_lines(), 1_055);
        assert_eq!(globals.max_line_segments(), 1_056);
        assert_eq!(globals.max_matrices(), 1_057);
        assert_eq!(globals.max_functions(), 1_058);
        assert_eq!(globals.max_operators(), 1_059);

        let collected: Vec<i32> = globals.iter().map(|(_, v)| v).collect();
        assert_eq!(collected, words);
    }

    #[test]
    fn test_negative_dimension_rejected() {
        let mut words = vec![0i32; 60];
        words[GlobalField::Mmat.index()] = -5;
        let mut reader = WordReader::new(Cursor::new(block_at(0, &words)), ByteOrder::Little);
        assert!(matches!(
            GlobalParameters::read(&mut reader, 0),
            Err(DatabankError::InvalidGlobalParameter { field: "MMAT", value: -5 })
        ));
    }

    #[test]
    fn test_truncated_block() {
        let mut reader = WordReader::new(Cursor::new(block_at(800, &[1; 59])), ByteOrder::Little);
        assert!(matches!(
            GlobalParameters::read(&mut reader, 800),
            Err(DatabankError::Io(_))
        ));
    }
}
