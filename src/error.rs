// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::id::{AreaId, DeviceId};

#[derive(Error, Debug)]
pub enum FlashError {
    #[error("Unknown flash area id: {0}")]
    UnknownAreaId(AreaId),

    #[error("Sector index {index} out of range (sector count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Address {0:#010x} is not a sector boundary")]
    UnknownSector(u32),

    #[error("Address {address:#010x} is not aligned to {align} bytes")]
    AlignmentViolation { address: u32, align: u32 },

    #[error("Write at {address:#010x} overlaps programmed byte at {conflict:#010x}")]
    WriteOverlapViolation { address: u32, conflict: u32 },

    #[error("Backing store {path:?} unavailable: {source}")]
    BackingStoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Range {address:#010x}+{len} outside device {base:#010x}+{size}")]
    OutOfBounds { address: u32, len: usize, base: u32, size: u32 },

    #[error("Invalid sector geometry: {0}")]
    InvalidGeometry(String),

    #[error("Duplicate flash area id: {0}")]
    DuplicateAreaId(AreaId),

    #[error("Flash areas {first} and {second} overlap on device {device}")]
    AreaOverlap { first: AreaId, second: AreaId, device: DeviceId },

    #[error("Flash area {0} does not fit on its device")]
    AreaOutOfBounds(AreaId),

    #[error("Unknown flash device: {0}")]
    UnknownDevice(DeviceId),

    #[error("Flash device {0} registered twice")]
    DuplicateDevice(DeviceId),

    #[error("Erase range {offset:#x}+{len} does not fall on sector boundaries")]
    UnalignedErase { offset: u32, len: u32 },

    #[error("Driver error: {0}")]
    Driver(String),
}

pub type Result<T> = std::result::Result<T, FlashError>;
