// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Flash device capability interface.
//!
//! Upper layers (bootloader, filesystem, image updater) only ever see this
//! trait, so they run unchanged against a simulated store or a real chip.

use crate::error::Result;
use crate::geometry::SectorGeometry;
use crate::types::descriptor::FlashDescriptor;
use crate::types::ERASED_VALUE;

pub trait FlashDevice {
    /// Static attributes: base address, size, sector count, write alignment.
    fn descriptor(&self) -> FlashDescriptor;

    /// Sector layout, with starts relative to the device base address.
    fn geometry(&self) -> &SectorGeometry;

    /// Prepares the device for use. Calling it again is a no-op.
    fn init(&mut self) -> Result<()>;

    /// Reads `buf.len()` bytes starting at `address`.
    ///
    /// Unwritten bytes read back as [`ERASED_VALUE`]; only an out-of-range
    /// request or an unavailable backing store fails.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Programs `data` at `address`.
    ///
    /// Every target byte must be erased. A rejected write leaves the device
    /// unchanged.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Erases the whole sector starting exactly at `sector_address`.
    fn erase_sector(&mut self, sector_address: u32) -> Result<()>;

    /// Absolute `(address, size)` of sector `index`.
    fn sector_info(&self, index: usize) -> Result<(u32, u32)>;

    fn sector_count(&self) -> usize {
        self.descriptor().sector_count
    }

    fn erased_value(&self) -> u8 {
        ERASED_VALUE
    }

    fn read_vec(&mut self, address: u32, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read(address, &mut buf)?;
        Ok(buf)
    }
}

impl<T: FlashDevice + ?Sized> FlashDevice for Box<T> {
    fn descriptor(&self) -> FlashDescriptor {
        (**self).descriptor()
    }

    fn geometry(&self) -> &SectorGeometry {
        (**self).geometry()
    }

    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        (**self).read(address, buf)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        (**self).write(address, data)
    }

    fn erase_sector(&mut self, sector_address: u32) -> Result<()> {
        (**self).erase_sector(sector_address)
    }

    fn sector_info(&self, index: usize) -> Result<(u32, u32)> {
        (**self).sector_info(index)
    }
}
