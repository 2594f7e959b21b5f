// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::boards::{FLASH_SIZE, SECTOR_STARTS};
use crate::error::FlashError;
use crate::geometry::SectorGeometry;

fn native() -> SectorGeometry {
    SectorGeometry::new(SECTOR_STARTS, FLASH_SIZE).unwrap()
}

#[test]
fn test_sector_sizes_follow_starts() {
    let g = native();
    assert_eq!(g.len(), 12);

    for i in 0..g.len() - 1 {
        let (addr, size) = g.sector_info(i).unwrap();
        let (next, _) = g.sector_info(i + 1).unwrap();
        assert_eq!(size, next - addr, "sector {}", i);
    }

    let last = g.len() - 1;
    let (addr, size) = g.sector_info(last).unwrap();
    assert_eq!(size, FLASH_SIZE - addr);
}

#[test]
fn test_known_sector_sizes() {
    let g = native();
    assert_eq!(g.sector_info(0).unwrap(), (0, 16 * 1024));
    assert_eq!(g.sector_info(4).unwrap(), (0x10000, 64 * 1024));
    assert_eq!(g.sector_info(11).unwrap(), (0xe0000, 128 * 1024));
    assert_eq!(g.iter().map(|(_, s)| s as u64).sum::<u64>(), FLASH_SIZE as u64);
}

#[test]
fn test_sector_info_out_of_range() {
    let g = native();
    match g.sector_info(12) {
        Err(FlashError::IndexOutOfRange { index: 12, count: 12 }) => (),
        other => panic!("Expected IndexOutOfRange, got {:?}", other),
    }
}

#[test]
fn test_find_sector_exact_boundaries_only() {
    let g = native();
    assert_eq!(g.find_sector(0), Some(0));
    assert_eq!(g.find_sector(0x10000), Some(4));
    assert_eq!(g.find_sector(0xe0000), Some(11));
    assert_eq!(g.find_sector(0x10001), None);
    assert_eq!(g.find_sector(0x3000), None);
    assert_eq!(g.find_sector(FLASH_SIZE), None);
}

fn rejected(starts: &[u32], total_size: u32) -> bool {
    matches!(SectorGeometry::new(starts.to_vec(), total_size), Err(FlashError::InvalidGeometry(_)))
}

#[test]
fn test_rejects_bad_tables() {
    assert!(rejected(&[], 0x1000));
    assert!(rejected(&[0x100, 0x200], 0x1000));
    assert!(rejected(&[0, 0x200, 0x200], 0x1000));
    assert!(rejected(&[0, 0x400, 0x200], 0x1000));
    assert!(rejected(&[0, 0x1000], 0x1000));
    assert!(!rejected(&[0, 0x800], 0x1000));
}

#[test]
fn test_uniform() {
    let g = SectorGeometry::uniform(4096, 4).unwrap();
    assert_eq!(g.total_size(), 16384);
    assert_eq!(g.starts(), &[0, 4096, 8192, 12288]);
    assert!(SectorGeometry::uniform(0, 4).is_err());
    assert!(SectorGeometry::uniform(4096, 0).is_err());
}

#[test]
fn test_sectors_overlapping() {
    let g = native();
    let hits: Vec<_> = g.sectors_overlapping(0x8000, 0x8001).collect();
    assert_eq!(hits, vec![(0x8000, 0x4000), (0xc000, 0x4000), (0x10000, 0x10000)]);
    assert_eq!(g.sectors_overlapping(0x8000, 0).count(), 0);
}
