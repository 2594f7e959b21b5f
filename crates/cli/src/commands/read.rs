// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use flashsim::boards::INTERNAL_FLASH;
use flashsim::{FlashContext, FlashDevice};

use crate::location::Location;

const ROW: usize = 16;

/// Reads `len` bytes, prints a hex dump and returns them.
pub fn run(ctx: &mut FlashContext, location: Location, len: usize) -> anyhow::Result<Vec<u8>> {
    let (device_id, address) = location.resolve(ctx, INTERNAL_FLASH, len)?;
    let data = ctx.device_mut(device_id)?.read_vec(address, len)?;

    for (i, row) in data.chunks(ROW).enumerate() {
        println!("{:#010x}  {}", address as usize + i * ROW, hex::encode(row));
    }
    Ok(data)
}
