// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::area::FlashArea;
use crate::boards::{Board, INTERNAL_FLASH};
use crate::config::SimConfig;
use crate::context::FlashContext;
use crate::error::FlashError;
use crate::geometry::SectorGeometry;
use crate::sim::SimFlash;
use crate::types::id::{AreaId, DeviceId};

fn small_flash() -> Box<SimFlash> {
    let geometry = SectorGeometry::uniform(0x1000, 8).unwrap();
    Box::new(SimFlash::new(0, geometry, 1, SimConfig::ephemeral()).unwrap())
}

#[test]
fn test_board_context_lookup() {
    let ctx = Board::OlimexStm32E407.context(SimConfig::ephemeral()).unwrap();
    let boot = ctx.lookup(AreaId::BOOTLOADER).unwrap();
    assert_eq!((boot.offset, boot.size), (0x0800_0000, 32768));
    assert!(matches!(ctx.lookup(AreaId(77)), Err(FlashError::UnknownAreaId(_))));
}

#[test]
fn test_startup_opens_devices() {
    let ctx = Board::Native.context(SimConfig::ephemeral()).unwrap();
    let device = ctx.device(INTERNAL_FLASH).unwrap();
    assert_eq!(device.descriptor().total_size, 1024 * 1024);
    assert!(matches!(ctx.device(DeviceId(3)), Err(FlashError::UnknownDevice(_))));
}

#[test]
fn test_startup_rejects_unknown_device() {
    let mut ctx = FlashContext::new();
    ctx.register_device(DeviceId(0), small_flash()).unwrap();
    let areas = [FlashArea::new(AreaId(0), DeviceId(1), 0, 0x1000)];
    assert!(matches!(ctx.startup(areas), Err(FlashError::UnknownDevice(DeviceId(1)))));
    assert!(ctx.areas().is_empty());
}

#[test]
fn test_startup_rejects_out_of_bounds_area() {
    let mut ctx = FlashContext::new();
    ctx.register_device(DeviceId(0), small_flash()).unwrap();
    let areas = [FlashArea::new(AreaId(0), DeviceId(0), 0x7000, 0x2000)];
    assert!(matches!(ctx.startup(areas), Err(FlashError::AreaOutOfBounds(AreaId(0)))));
}

#[test]
fn test_rejected_startup_keeps_previous_table() {
    let mut ctx = FlashContext::new();
    ctx.register_device(DeviceId(0), small_flash()).unwrap();
    ctx.startup([FlashArea::new(AreaId(0), DeviceId(0), 0, 0x1000)]).unwrap();

    let areas = [FlashArea::new(AreaId(1), DeviceId(0), 0x7000, 0x2000)];
    assert!(matches!(ctx.startup(areas), Err(FlashError::AreaOutOfBounds(AreaId(1)))));
    assert_eq!(ctx.areas().len(), 1);
    assert_eq!(ctx.lookup(AreaId(0)).unwrap().size, 0x1000);
}

#[test]
fn test_failed_device_init_keeps_previous_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = FlashContext::new();
    ctx.register_device(DeviceId(0), small_flash()).unwrap();
    ctx.startup([FlashArea::new(AreaId(0), DeviceId(0), 0, 0x1000)]).unwrap();

    // Backing file under a directory that does not exist: init fails.
    let geometry = SectorGeometry::uniform(0x1000, 2).unwrap();
    let config = SimConfig::with_path(dir.path().join("missing").join("flash.bin"));
    let broken = SimFlash::new(0, geometry, 1, config).unwrap();
    ctx.register_device(DeviceId(1), Box::new(broken)).unwrap();

    let areas = [
        FlashArea::new(AreaId(0), DeviceId(0), 0, 0x1000),
        FlashArea::new(AreaId(1), DeviceId(1), 0, 0x1000),
    ];
    assert!(matches!(ctx.startup(areas), Err(FlashError::BackingStoreUnavailable { .. })));
    assert_eq!(ctx.areas().len(), 1);
    assert!(matches!(ctx.lookup(AreaId(1)), Err(FlashError::UnknownAreaId(_))));
}

#[test]
fn test_duplicate_device() {
    let mut ctx = FlashContext::new();
    ctx.register_device(DeviceId(0), small_flash()).unwrap();
    assert!(matches!(
        ctx.register_device(DeviceId(0), small_flash()),
        Err(FlashError::DuplicateDevice(DeviceId(0)))
    ));
}

#[test]
fn test_reinit_replaces_table() {
    let mut ctx = FlashContext::new();
    ctx.register_device(DeviceId(0), small_flash()).unwrap();

    ctx.startup([FlashArea::new(AreaId(0), DeviceId(0), 0, 0x1000)]).unwrap();
    ctx.startup([FlashArea::new(AreaId(1), DeviceId(0), 0x1000, 0x1000)]).unwrap();

    assert!(matches!(ctx.lookup(AreaId(0)), Err(FlashError::UnknownAreaId(_))));
    assert_eq!(ctx.lookup(AreaId(1)).unwrap().offset, 0x1000);
}

#[test]
fn test_area_relative_io() {
    let mut ctx = Board::Native.context(SimConfig::ephemeral()).unwrap();

    ctx.area_write(AreaId::NFFS, 0x10, b"nffs").unwrap();
    let mut buf = [0u8; 4];
    ctx.area_read(AreaId::NFFS, 0x10, &mut buf).unwrap();
    assert_eq!(&buf, b"nffs");

    // The same bytes through the device, at the absolute address.
    let device = ctx.device_mut(INTERNAL_FLASH).unwrap();
    assert_eq!(device.read_vec(0x8010, 4).unwrap(), b"nffs".to_vec());

    assert!(matches!(
        ctx.area_write(AreaId::NFFS, 0x7FFE, &[0; 4]),
        Err(FlashError::OutOfBounds { .. })
    ));
    assert!(matches!(
        ctx.area_write(AreaId::NFFS, 0x10, &[0; 4]),
        Err(FlashError::WriteOverlapViolation { .. })
    ));
}

#[test]
fn test_area_erase() {
    let mut ctx = Board::Native.context(SimConfig::ephemeral()).unwrap();
    ctx.area_write(AreaId::BOOTLOADER, 0, &[1; 8]).unwrap();
    ctx.area_write(AreaId::BOOTLOADER, 0x4000, &[2; 8]).unwrap();
    ctx.area_write(AreaId::NFFS, 0, &[3; 8]).unwrap();

    // Second bootloader sector only.
    ctx.area_erase(AreaId::BOOTLOADER, 0x4000, 0x4000).unwrap();
    let mut buf = [0u8; 8];
    ctx.area_read(AreaId::BOOTLOADER, 0, &mut buf).unwrap();
    assert_eq!(buf, [1; 8]);
    ctx.area_read(AreaId::BOOTLOADER, 0x4000, &mut buf).unwrap();
    assert_eq!(buf, [0xFF; 8]);

    ctx.area_erase_all(AreaId::BOOTLOADER).unwrap();
    ctx.area_read(AreaId::BOOTLOADER, 0, &mut buf).unwrap();
    assert_eq!(buf, [0xFF; 8]);

    // Neighbouring area untouched.
    ctx.area_read(AreaId::NFFS, 0, &mut buf).unwrap();
    assert_eq!(buf, [3; 8]);
}

#[test]
fn test_area_erase_must_be_sector_aligned() {
    let mut ctx = Board::Native.context(SimConfig::ephemeral()).unwrap();
    assert!(matches!(
        ctx.area_erase(AreaId::BOOTLOADER, 0x100, 0x4000),
        Err(FlashError::UnalignedErase { offset: 0x100, len: 0x4000 })
    ));
    assert!(matches!(
        ctx.area_erase(AreaId::IMAGE_0, 0, 0x10000),
        Err(FlashError::UnalignedErase { .. })
    ));
    assert!(ctx.area_erase(AreaId::IMAGE_0, 0, 0).is_ok());
}

#[test]
fn test_area_sectors() {
    let ctx = Board::Native.context(SimConfig::ephemeral()).unwrap();
    assert_eq!(
        ctx.area_sectors(AreaId::NFFS).unwrap(),
        vec![(0x8000, 0x4000), (0xc000, 0x4000)]
    );
    assert_eq!(ctx.area_sectors(AreaId::IMAGE_SCRATCH).unwrap(), vec![(0xe0000, 0x20000)]);

    // Device based away from zero: addresses come back absolute.
    let ctx = Board::OlimexStm32E407.context(SimConfig::ephemeral()).unwrap();
    assert_eq!(
        ctx.area_sectors(AreaId::BOOTLOADER).unwrap(),
        vec![(0x0800_0000, 0x4000), (0x0800_4000, 0x4000)]
    );
    assert!(matches!(ctx.area_sectors(AreaId(9)), Err(FlashError::UnknownAreaId(_))));
}

#[test]
fn test_independent_contexts() {
    let mut a = Board::Native.context(SimConfig::ephemeral()).unwrap();
    let mut b = Board::Native.context(SimConfig::ephemeral()).unwrap();

    a.area_write(AreaId::IMAGE_1, 0, &[0x5A]).unwrap();
    let mut buf = [0u8; 1];
    b.area_read(AreaId::IMAGE_1, 0, &mut buf).unwrap();
    assert_eq!(buf, [0xFF]);
}
