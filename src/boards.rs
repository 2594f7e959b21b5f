// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Static board profiles: device geometry plus partition table.

use crate::area::FlashArea;
use crate::config::SimConfig;
use crate::context::FlashContext;
use crate::error::Result;
use crate::geometry::SectorGeometry;
use crate::sim::SimFlash;
use crate::types::id::{AreaId, DeviceId};

/// Internal flash device id on every board profile.
pub const INTERNAL_FLASH: DeviceId = DeviceId(0);

/// 4 x 16K, 1 x 64K, 7 x 128K. Offsets relative to the device base.
pub const SECTOR_STARTS: [u32; 12] = [
    0x0000_0000,
    0x0000_4000,
    0x0000_8000,
    0x0000_c000,
    0x0001_0000,
    0x0002_0000,
    0x0004_0000,
    0x0006_0000,
    0x0008_0000,
    0x000a_0000,
    0x000c_0000,
    0x000e_0000,
];

pub const FLASH_SIZE: u32 = 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Board {
    /// Host simulator, flash mapped at address 0.
    Native,
    /// Olimex STM32-E407, internal flash mapped at 0x0800_0000.
    OlimexStm32E407,
}

impl Board {
    pub fn name(&self) -> &'static str {
        match self {
            Board::Native => "native",
            Board::OlimexStm32E407 => "olimex_stm32-e407",
        }
    }

    pub fn base_address(&self) -> u32 {
        match self {
            Board::Native => 0,
            Board::OlimexStm32E407 => 0x0800_0000,
        }
    }

    pub fn geometry(&self) -> Result<SectorGeometry> {
        SectorGeometry::new(SECTOR_STARTS, FLASH_SIZE)
    }

    /// Partition table, in table order.
    pub fn areas(&self) -> [FlashArea; 5] {
        let base = self.base_address();
        [
            FlashArea::new(AreaId::BOOTLOADER, INTERNAL_FLASH, base, 32 * 1024),
            FlashArea::new(AreaId::IMAGE_0, INTERNAL_FLASH, base + 0x0002_0000, 384 * 1024),
            FlashArea::new(AreaId::IMAGE_1, INTERNAL_FLASH, base + 0x0008_0000, 384 * 1024),
            FlashArea::new(AreaId::IMAGE_SCRATCH, INTERNAL_FLASH, base + 0x000e_0000, 128 * 1024),
            FlashArea::new(AreaId::NFFS, INTERNAL_FLASH, base + 0x0000_8000, 32 * 1024),
        ]
    }

    /// Simulated internal flash for this board.
    pub fn sim_flash(&self, config: SimConfig) -> Result<SimFlash> {
        SimFlash::new(self.base_address(), self.geometry()?, 1, config)
    }

    /// Registers the simulated internal flash and runs the startup hook.
    pub fn context(&self, config: SimConfig) -> Result<FlashContext> {
        let mut ctx = FlashContext::new();
        ctx.register_device(INTERNAL_FLASH, Box::new(self.sim_flash(config)?))?;
        ctx.startup(self.areas())?;
        Ok(ctx)
    }
}

impl std::str::FromStr for Board {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "native" => Ok(Board::Native),
            "olimex_stm32-e407" | "olimex" => Ok(Board::OlimexStm32E407),
            other => Err(format!("unknown board: {}", other)),
        }
    }
}
