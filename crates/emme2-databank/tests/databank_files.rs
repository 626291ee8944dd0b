#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests opening databanks from disk
//!
//! Databanks are generated with `DatabankBuilder`, written to a temporary
//! directory and opened by path in every directory layout and byte order.

use emme2_databank::{
    ByteOrder, Databank, DatabankBuilder, DatabankConfig, DatabankError, DirectoryVersion,
    GlobalField, MatrixFlags, MatrixId, MatrixType,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn builder(version: DirectoryVersion, byte_order: ByteOrder) -> DatabankBuilder {
    DatabankBuilder::new(version)
        .byte_order(byte_order)
        .max_zones(8)
        .max_matrices(99)
        .global(GlobalField::Mnode, 2_500)
        .global(GlobalField::Mlink, 9_000)
        .global(GlobalField::Mline, 40)
        .global(GlobalField::Kmod, 2)
        .scenario(4, vec![1, 2, 3, 4])
        .scenario(7, vec![11, 12, 13, 21, 22, 31, 500])
        .matrix(MatrixId::new(MatrixType::Full, 61), MatrixFlags::new(0x3), 19_991_231)
        .matrix(MatrixId::new(MatrixType::Full, 99), MatrixFlags::new(0x1), 20_000_101)
        .matrix(MatrixId::new(MatrixType::Scalar, 1), MatrixFlags::new(0x5), 1)
        .matrix(MatrixId::new(MatrixType::Destination, 12), MatrixFlags::new(0x9), 2)
}

fn write_bank(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, data).expect("Test operation should succeed");
    path
}

fn open(path: &Path, byte_order: ByteOrder) -> Databank {
    Databank::open_with_config(path, &DatabankConfig::new().with_byte_order(byte_order))
        .expect("Test operation should succeed")
}

#[test]
fn test_open_every_layout_from_disk() {
    let dir = TempDir::new().expect("Test operation should succeed");

    for version in [DirectoryVersion::Packed, DirectoryVersion::Unpacked] {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let data = builder(version, order).build().expect("Test operation should succeed");
            let path = write_bank(&dir, &format!("emme2ban_{version:?}_{order}"), &data);

            let bank = open(&path, order);
            assert_eq!(bank.path(), Some(path.as_path()));
            assert_eq!(bank.directory_version(), version);

            let globals = bank.global_parameters();
            assert_eq!(globals.get(GlobalField::Kmod), 2);
            assert_eq!(bank.max_scenarios(), 2);
            assert_eq!(bank.max_nodes(), 2_500);
            assert_eq!(bank.max_links(), 9_000);
            assert_eq!(bank.max_lines(), 40);

            assert_eq!(bank.zones_used(), 7);
            assert_eq!(bank.highest_zone(), 500);
            let zones = bank.zone_index();
            assert_eq!(zones.internal_number(21), Some(4));
            assert_eq!(zones.external_number(7), Some(500));
            assert_eq!(zones.internal_number(14), None);

            assert!(bank.matrix_exists("mf61").expect("valid"));
            assert!(bank.is_column_wise_matrix("mf61").expect("valid"));
            assert!(!bank.is_column_wise_matrix("mf99").expect("valid"));
            assert!(bank.is_read_only_matrix("ms1").expect("valid"));
            assert_eq!(bank.matrix_timestamp("mf61").expect("valid"), 19_991_231);
            assert!(
                bank.matrix_flags("md12")
                    .expect("valid")
                    .is_shareable_external()
            );

            bank.close().expect("Test operation should succeed");
        }
    }
}

#[test]
fn test_read_write_open_and_close() {
    let dir = TempDir::new().expect("Test operation should succeed");
    let data = builder(DirectoryVersion::Unpacked, ByteOrder::Little)
        .build()
        .expect("Test operation should succeed");
    let path = write_bank(&dir, "emme2ban", &data);

    let bank = Databank::open(&path, false).expect("Test operation should succeed");
    assert!(!bank.is_read_only());
    bank.close().expect("Test operation should succeed");

    // closing does not modify the file
    assert_eq!(std::fs::read(&path).expect("readable"), data);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().expect("Test operation should succeed");
    let result = Databank::open(dir.path().join("does_not_exist"), true);
    assert!(matches!(result, Err(DatabankError::Io(_))));
}

#[test]
fn test_truncated_file_yields_no_handle() {
    let dir = TempDir::new().expect("Test operation should succeed");
    let data = builder(DirectoryVersion::Packed, ByteOrder::Little)
        .build()
        .expect("Test operation should succeed");

    // cut inside the global parameter block
    let path = write_bank(&dir, "short", &data[..800 + 40]);
    assert!(matches!(Databank::open(&path, true), Err(DatabankError::Io(_))));

    let path = write_bank(&dir, "empty", &[]);
    assert!(matches!(Databank::open(&path, true), Err(DatabankError::Io(_))));
}

#[test]
fn test_unusable_unpacked_directory() {
    let dir = TempDir::new().expect("Test operation should succeed");
    let mut data = builder(DirectoryVersion::Unpacked, ByteOrder::Little)
        .build()
        .expect("Test operation should succeed");

    // File 1 offset of zero
    data[4..8].copy_from_slice(&0i32.to_le_bytes());
    let path = write_bank(&dir, "no_file_one", &data);

    match Databank::open(&path, true) {
        Err(DatabankError::UnsupportedDirectoryVersion { first_word, .. }) => {
            assert_eq!(first_word, 9);
        }
        other => panic!("expected unsupported directory, got {other:?}"),
    }
}
