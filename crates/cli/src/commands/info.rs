// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use flashsim::boards::{Board, INTERNAL_FLASH};
use flashsim::{FlashContext, FlashDevice};

pub fn run(ctx: &FlashContext, board: Board) -> anyhow::Result<()> {
    let device = ctx.device(INTERNAL_FLASH)?;
    let desc = device.descriptor();

    println!("\nBoard: {}", board.name());
    println!("Base address:    {:#010x}", desc.base_address);
    println!("Total size:      {} bytes", desc.total_size);
    println!("Sectors:         {}", desc.sector_count);
    println!("Write alignment: {}", desc.write_alignment);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Sector", "Address", "Size"]);

    for index in 0..device.sector_count() {
        let (address, size) = device.sector_info(index)?;
        table.add_row(vec![
            index.to_string(),
            format!("{:#010x}", address),
            format!("{} KiB", size / 1024),
        ]);
    }

    println!("{table}");
    Ok(())
}
