// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Flash area (partition) table.

use crate::error::{FlashError, Result};
use crate::geometry::SectorGeometry;
use crate::types::descriptor::FlashDescriptor;
use crate::types::id::{AreaId, DeviceId};

/// A contiguous byte range on one flash device.
///
/// `offset` is an absolute device address, in the same address space as the
/// device's base address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlashArea {
    pub id: AreaId,
    pub device_id: DeviceId,
    pub offset: u32,
    pub size: u32,
}

impl FlashArea {
    pub const fn new(id: AreaId, device_id: DeviceId, offset: u32, size: u32) -> Self {
        Self {
            id,
            device_id,
            offset,
            size,
        }
    }

    /// One past the last byte of the area.
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }

    fn overlaps(&self, other: &FlashArea) -> bool {
        self.device_id == other.device_id
            && self.size > 0
            && other.size > 0
            && (self.offset as u64) < other.end()
            && (other.offset as u64) < self.end()
    }

    /// Absolute address of `rel` bytes into the area, checking that
    /// `[rel, rel + len)` stays inside it.
    pub fn address_of(&self, rel: u32, len: usize) -> Result<u32> {
        let out_of_bounds = FlashError::OutOfBounds {
            address: rel,
            len,
            base: self.offset,
            size: self.size,
        };
        if rel as u64 + len as u64 > self.size as u64 {
            return Err(out_of_bounds);
        }
        self.offset.checked_add(rel).ok_or(out_of_bounds)
    }

    /// Absolute `(address, size)` of every device sector intersecting the area.
    pub fn to_sectors(&self, base_address: u32, geometry: &SectorGeometry) -> Vec<(u32, u32)> {
        let Some(rel) = self.offset.checked_sub(base_address) else {
            return Vec::new();
        };
        geometry
            .sectors_overlapping(rel, self.size)
            .map(|(start, size)| (base_address + start, size))
            .collect()
    }
}

/// The installed area table. Built once, read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlashAreaMap {
    areas: Vec<FlashArea>,
}

impl FlashAreaMap {
    /// Installs `areas` in table order, rejecting duplicate ids and areas that
    /// overlap on the same device.
    pub fn new(areas: impl Into<Vec<FlashArea>>) -> Result<Self> {
        let areas = areas.into();
        for (i, a) in areas.iter().enumerate() {
            for b in &areas[i + 1..] {
                if a.id == b.id {
                    return Err(FlashError::DuplicateAreaId(a.id));
                }
                if a.overlaps(b) {
                    return Err(FlashError::AreaOverlap {
                        first: a.id,
                        second: b.id,
                        device: a.device_id,
                    });
                }
            }
        }
        Ok(Self { areas })
    }

    pub fn lookup(&self, id: AreaId) -> Result<&FlashArea> {
        self.areas
            .iter()
            .find(|a| a.id == id)
            .ok_or(FlashError::UnknownAreaId(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlashArea> {
        self.areas.iter()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Checks every area placed on `device_id` against that device's extent.
    pub fn validate_bounds(&self, device_id: DeviceId, descriptor: &FlashDescriptor) -> Result<()> {
        for area in self.areas.iter().filter(|a| a.device_id == device_id) {
            if (area.offset as u64) < descriptor.base_address as u64 || area.end() > descriptor.end() {
                return Err(FlashError::AreaOutOfBounds(area.id));
            }
        }
        Ok(())
    }
}
