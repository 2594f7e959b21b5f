// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::bail;
use flashsim::boards::INTERNAL_FLASH;
use flashsim::{FlashContext, FlashDevice};

use crate::location::Location;

/// Erases one sector by address, or a sector-aligned range of an area.
///
/// For an area, `len` defaults to the rest of the area past `offset`.
pub fn run(ctx: &mut FlashContext, location: Location, len: Option<u32>) -> anyhow::Result<()> {
    match location {
        Location::Address(address) => {
            if len.is_some() {
                bail!("--len only applies to area erases; --addr erases one sector");
            }
            ctx.device_mut(INTERNAL_FLASH)?.erase_sector(address)?;
            println!("Erased sector at {:#010x}", address);
        }
        Location::Area { id, offset } => {
            let size = ctx.lookup(id)?.size;
            let len = len.unwrap_or_else(|| size.saturating_sub(offset));
            ctx.area_erase(id, offset, len)?;
            println!("Erased {:#x} bytes of area {} at offset {:#x}", len, id, offset);
        }
    }
    Ok(())
}
