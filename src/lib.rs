// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! flashsim: sectorized flash devices, a host-side file-backed simulator, and
//! the flash area (partition) table layered on top of them.

pub mod config;
pub mod error;
pub mod types;
pub mod geometry;
pub mod device;
pub mod sim;
pub mod hardware;
pub mod area;
pub mod context;
pub mod boards;

pub use area::{FlashArea, FlashAreaMap};
pub use context::FlashContext;
pub use device::FlashDevice;
pub use error::{FlashError, Result};
pub use geometry::SectorGeometry;
pub use hardware::{HardwareFlash, NorFlashDriver};
pub use sim::SimFlash;
pub use types::descriptor::FlashDescriptor;
pub use types::id::{AreaId, DeviceId};

#[cfg(test)]
pub mod tests;
