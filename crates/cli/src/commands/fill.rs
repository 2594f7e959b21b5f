// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use flashsim::boards::Board;
use flashsim::config::SimConfig;

/// Raw fill that skips the erase check, for staging corrupted images.
pub fn run(board: Board, config: SimConfig, address: u32, value: u8, len: usize) -> anyhow::Result<()> {
    let mut flash = board.sim_flash(config)?;
    flash.fill(address, value, len)?;
    flash.flush()?;
    println!("Filled {} bytes at {:#010x} with {:#04x}", len, address, value);
    Ok(())
}
