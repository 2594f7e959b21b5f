// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Adapter exposing a NOR flash chip driver as a [`FlashDevice`].
//!
//! The driver speaks chip-relative addresses (0 is the first byte of the
//! chip). The adapter translates from the device address space, validates
//! every request against the geometry before touching the driver, and splits
//! writes so that no page program crosses a page boundary.

use core::fmt::Debug;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::device::FlashDevice;
use crate::error::{FlashError, Result};
use crate::geometry::SectorGeometry;
use crate::types::descriptor::FlashDescriptor;

/// Minimal command set of a serial NOR flash chip.
pub trait NorFlashDriver {
    type Error: Debug;

    /// Largest number of bytes one page program may cover.
    const PAGE_SIZE: usize = DEFAULT_PAGE_SIZE;

    /// Reads flash contents into `buf`, starting at `addr`.
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Sets every byte of the sector at `addr` to the erased state (FFh).
    fn sector_erase(&mut self, addr: u32) -> core::result::Result<(), Self::Error>;

    /// Programs up to one page of previously erased bytes.
    fn page_program(&mut self, addr: u32, data: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Brings the chip into a ready state. Most drivers do this on construction.
    fn reset(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

fn driver_err<E: Debug>(e: E) -> FlashError {
    FlashError::Driver(format!("{:?}", e))
}

#[derive(Debug)]
pub struct HardwareFlash<D> {
    driver: D,
    descriptor: FlashDescriptor,
    geometry: SectorGeometry,
    initialized: bool,
}

impl<D: NorFlashDriver> HardwareFlash<D> {
    pub fn new(driver: D, base_address: u32, geometry: SectorGeometry, write_alignment: u32) -> Result<Self> {
        if D::PAGE_SIZE == 0 {
            return Err(FlashError::InvalidGeometry("driver page size must be at least 1".into()));
        }
        let descriptor = FlashDescriptor::new(base_address, &geometry, write_alignment)?;
        Ok(Self {
            driver,
            descriptor,
            geometry,
            initialized: false,
        })
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }
}

impl<D: NorFlashDriver> FlashDevice for HardwareFlash<D> {
    fn descriptor(&self) -> FlashDescriptor {
        self.descriptor
    }

    fn geometry(&self) -> &SectorGeometry {
        &self.geometry
    }

    fn init(&mut self) -> Result<()> {
        if !self.initialized {
            self.driver.reset().map_err(driver_err)?;
            self.initialized = true;
            tracing::info!(
                "Flash chip ready at {:#010x} ({} bytes, {} sectors)",
                self.descriptor.base_address,
                self.descriptor.total_size,
                self.descriptor.sector_count
            );
        }
        Ok(())
    }

    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        self.descriptor.check_range(address, buf.len())?;
        if buf.is_empty() {
            return Ok(());
        }
        let offset = address - self.descriptor.base_address;
        self.driver.read(offset, buf).map_err(driver_err)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if let Err(e) = self.descriptor.check_alignment(address) {
            tracing::error!("Rejected flash write: {}", e);
            return Err(e);
        }
        self.descriptor.check_range(address, data.len())?;

        let page = D::PAGE_SIZE;
        let mut offset = (address - self.descriptor.base_address) as usize;
        let mut rest = data;
        while !rest.is_empty() {
            let room = page - offset % page;
            let (head, tail) = rest.split_at(room.min(rest.len()));
            self.driver.page_program(offset as u32, head).map_err(driver_err)?;
            offset += head.len();
            rest = tail;
        }
        Ok(())
    }

    fn erase_sector(&mut self, sector_address: u32) -> Result<()> {
        let offset = sector_address
            .checked_sub(self.descriptor.base_address)
            .filter(|&off| self.geometry.find_sector(off).is_some())
            .ok_or(FlashError::UnknownSector(sector_address))?;
        self.driver.sector_erase(offset).map_err(driver_err)?;
        tracing::debug!("Erased sector at {:#010x}", sector_address);
        Ok(())
    }

    fn sector_info(&self, index: usize) -> Result<(u32, u32)> {
        let (offset, size) = self.geometry.sector_info(index)?;
        Ok((self.descriptor.base_address + offset, size))
    }
}
