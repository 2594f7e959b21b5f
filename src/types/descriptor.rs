// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Static attributes of a flash device.

use crate::error::{FlashError, Result};
use crate::geometry::SectorGeometry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlashDescriptor {
    pub base_address: u32,
    pub total_size: u32,
    pub sector_count: usize,
    /// Minimum write granularity in bytes. 1 means byte-addressable.
    pub write_alignment: u32,
}

impl FlashDescriptor {
    /// Attributes of a device laid out as `geometry` starting at `base_address`.
    ///
    /// The whole device must be addressable with 32 bits and the write
    /// alignment must be at least 1.
    pub fn new(base_address: u32, geometry: &SectorGeometry, write_alignment: u32) -> Result<Self> {
        if write_alignment == 0 {
            return Err(FlashError::InvalidGeometry("write alignment must be at least 1".into()));
        }
        if base_address as u64 + geometry.total_size() as u64 > u32::MAX as u64 + 1 {
            return Err(FlashError::InvalidGeometry(format!(
                "device at {:#x} of size {:#x} exceeds the 32-bit address space",
                base_address,
                geometry.total_size()
            )));
        }
        Ok(Self {
            base_address,
            total_size: geometry.total_size(),
            sector_count: geometry.len(),
            write_alignment,
        })
    }

    /// One past the last addressable byte.
    pub fn end(&self) -> u64 {
        self.base_address as u64 + self.total_size as u64
    }

    /// Fails with `OutOfBounds` unless `[address, address + len)` lies on the device.
    pub fn check_range(&self, address: u32, len: usize) -> Result<()> {
        let start = address as u64;
        if start < self.base_address as u64 || start + len as u64 > self.end() {
            return Err(FlashError::OutOfBounds {
                address,
                len,
                base: self.base_address,
                size: self.total_size,
            });
        }
        Ok(())
    }

    pub fn check_alignment(&self, address: u32) -> Result<()> {
        if self.write_alignment > 1 && address % self.write_alignment != 0 {
            return Err(FlashError::AlignmentViolation {
                address,
                align: self.write_alignment,
            });
        }
        Ok(())
    }

    /// Byte offset of `address` from the device base. Caller checks bounds first.
    pub(crate) fn offset_of(&self, address: u32) -> usize {
        (address - self.base_address) as usize
    }
}
