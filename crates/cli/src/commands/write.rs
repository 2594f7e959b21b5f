// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use flashsim::boards::INTERNAL_FLASH;
use flashsim::{FlashContext, FlashDevice};

use crate::location::Location;

/// Programs hex-encoded `data`. Fails like the device does if the target is not erased.
pub fn run(ctx: &mut FlashContext, location: Location, data: &str) -> anyhow::Result<()> {
    let bytes = hex::decode(data.trim_start_matches("0x")).context("data must be hex encoded")?;
    let (device_id, address) = location.resolve(ctx, INTERNAL_FLASH, bytes.len())?;
    ctx.device_mut(device_id)?.write(address, &bytes)?;
    println!("Wrote {} bytes at {:#010x}", bytes.len(), address);
    Ok(())
}
