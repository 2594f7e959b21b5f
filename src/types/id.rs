// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.

use core::fmt;

/// Identifies a flash area (partition) within an area table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct AreaId(pub u8);

impl AreaId {
    pub const BOOTLOADER: AreaId = AreaId(0);
    pub const IMAGE_0: AreaId = AreaId(1);
    pub const IMAGE_1: AreaId = AreaId(2);
    pub const IMAGE_SCRATCH: AreaId = AreaId(3);
    pub const NFFS: AreaId = AreaId(4);

    /// Human readable name for the well-known ids.
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            AreaId::BOOTLOADER => Some("bootloader"),
            AreaId::IMAGE_0 => Some("image-0"),
            AreaId::IMAGE_1 => Some("image-1"),
            AreaId::IMAGE_SCRATCH => Some("image-scratch"),
            AreaId::NFFS => Some("nffs"),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            AreaId::BOOTLOADER,
            AreaId::IMAGE_0,
            AreaId::IMAGE_1,
            AreaId::IMAGE_SCRATCH,
            AreaId::NFFS,
        ]
        .into_iter()
        .find(|id| id.name() == Some(name))
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Identifies a flash device registered with a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct DeviceId(pub u8);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
