// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Resolving command-line locations to absolute device addresses.

use anyhow::{anyhow, bail, Context};
use flashsim::{AreaId, DeviceId, FlashContext};

/// Parses `0x`-prefixed hex or plain decimal.
pub fn parse_u32(s: &str) -> anyhow::Result<u32> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse::<u32>(),
    };
    parsed.with_context(|| format!("invalid number: {}", s))
}

/// Accepts a well-known area name (`image-0`) or a numeric id.
pub fn parse_area(s: &str) -> anyhow::Result<AreaId> {
    if let Some(id) = AreaId::from_name(s) {
        return Ok(id);
    }
    s.parse::<u8>()
        .map(AreaId)
        .map_err(|_| anyhow!("unknown area: {}", s))
}

/// Where a command operates: an absolute address, or an offset into an area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Address(u32),
    Area { id: AreaId, offset: u32 },
}

impl Location {
    pub fn from_args(addr: Option<&str>, area: Option<&str>, offset: u32) -> anyhow::Result<Self> {
        match (addr, area) {
            (Some(addr), None) => Ok(Location::Address(parse_u32(addr)?)),
            (None, Some(area)) => Ok(Location::Area {
                id: parse_area(area)?,
                offset,
            }),
            (Some(_), Some(_)) => bail!("--addr and --area are mutually exclusive"),
            (None, None) => bail!("one of --addr or --area is required"),
        }
    }

    /// Device and absolute address, checking that `len` bytes fit an area.
    pub fn resolve(&self, ctx: &FlashContext, device: DeviceId, len: usize) -> anyhow::Result<(DeviceId, u32)> {
        match *self {
            Location::Address(addr) => Ok((device, addr)),
            Location::Area { id, offset } => {
                let area = ctx.lookup(id)?;
                Ok((area.device_id, area.address_of(offset, len)?))
            }
        }
    }
}
