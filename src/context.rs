// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Flash context: the registered devices plus the installed area table.
//!
//! The context is owned by the caller and passed wherever flash is touched,
//! so independent simulated devices can coexist in one process.

use std::collections::BTreeMap;

use crate::area::{FlashArea, FlashAreaMap};
use crate::device::FlashDevice;
use crate::error::{FlashError, Result};
use crate::types::id::{AreaId, DeviceId};

#[derive(Default)]
pub struct FlashContext {
    devices: BTreeMap<DeviceId, Box<dyn FlashDevice>>,
    areas: FlashAreaMap,
}

impl FlashContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_device(&mut self, id: DeviceId, device: Box<dyn FlashDevice>) -> Result<()> {
        if self.devices.contains_key(&id) {
            return Err(FlashError::DuplicateDevice(id));
        }
        self.devices.insert(id, device);
        Ok(())
    }

    /// Startup hook: initializes every registered device and installs
    /// `areas`, replacing any previous table.
    ///
    /// The table is only installed once every area has been checked against
    /// its device and every device is up. On failure the previous table stays.
    pub fn startup(&mut self, areas: impl Into<Vec<FlashArea>>) -> Result<()> {
        let map = FlashAreaMap::new(areas)?;

        for area in map.iter() {
            if !self.devices.contains_key(&area.device_id) {
                return Err(FlashError::UnknownDevice(area.device_id));
            }
        }
        for (id, device) in &self.devices {
            map.validate_bounds(*id, &device.descriptor())?;
        }

        for (id, device) in self.devices.iter_mut() {
            if let Err(e) = device.init() {
                tracing::error!("Flash device {} failed to initialize: {}", id, e);
                return Err(e);
            }
            tracing::debug!("Flash device {} initialized", id);
        }

        self.areas = map;
        tracing::info!(
            "Installed {} flash areas across {} devices",
            self.areas.len(),
            self.devices.len()
        );
        Ok(())
    }

    pub fn areas(&self) -> &FlashAreaMap {
        &self.areas
    }

    pub fn lookup(&self, id: AreaId) -> Result<FlashArea> {
        self.areas.lookup(id).copied()
    }

    pub fn device(&self, id: DeviceId) -> Result<&dyn FlashDevice> {
        self.devices
            .get(&id)
            .map(|d| &**d)
            .ok_or(FlashError::UnknownDevice(id))
    }

    pub fn device_mut(&mut self, id: DeviceId) -> Result<&mut Box<dyn FlashDevice>> {
        self.devices.get_mut(&id).ok_or(FlashError::UnknownDevice(id))
    }

    /// Resolves an area and its device in one step.
    fn area_device(&mut self, id: AreaId) -> Result<(FlashArea, &mut Box<dyn FlashDevice>)> {
        let area = self.lookup(id)?;
        let device = self.device_mut(area.device_id)?;
        Ok((area, device))
    }

    /// Reads `buf.len()` bytes at `offset` relative to the start of area `id`.
    pub fn area_read(&mut self, id: AreaId, offset: u32, buf: &mut [u8]) -> Result<()> {
        let (area, device) = self.area_device(id)?;
        let address = area.address_of(offset, buf.len())?;
        device.read(address, buf)
    }

    /// Writes `data` at `offset` relative to the start of area `id`.
    pub fn area_write(&mut self, id: AreaId, offset: u32, data: &[u8]) -> Result<()> {
        let (area, device) = self.area_device(id)?;
        let address = area.address_of(offset, data.len())?;
        device.write(address, data)
    }

    /// Erases `[offset, offset + len)` of area `id`. The range must start and
    /// end on sector boundaries.
    pub fn area_erase(&mut self, id: AreaId, offset: u32, len: u32) -> Result<()> {
        let (area, device) = self.area_device(id)?;
        let start = area.address_of(offset, len as usize)?;
        if len == 0 {
            return Ok(());
        }
        let end = start as u64 + len as u64;

        let mut sectors = Vec::new();
        let mut covered = 0u64;
        for index in 0..device.sector_count() {
            let (address, size) = device.sector_info(index)?;
            if address >= start && address as u64 + size as u64 <= end {
                sectors.push(address);
                covered += size as u64;
            }
        }
        if covered != len as u64 {
            return Err(FlashError::UnalignedErase { offset, len });
        }

        for address in sectors {
            device.erase_sector(address)?;
        }
        Ok(())
    }

    /// Erases every sector of area `id`.
    pub fn area_erase_all(&mut self, id: AreaId) -> Result<()> {
        let size = self.lookup(id)?.size;
        self.area_erase(id, 0, size)
    }

    /// Absolute `(address, size)` of every sector intersecting area `id`.
    pub fn area_sectors(&self, id: AreaId) -> Result<Vec<(u32, u32)>> {
        let area = self.lookup(id)?;
        let device = self.device(area.device_id)?;
        Ok(area.to_sectors(device.descriptor().base_address, device.geometry()))
    }
}
