// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use flashsim::FlashContext;

pub fn run(ctx: &FlashContext) -> anyhow::Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Device", "Offset", "Size", "Sectors"]);

    for area in ctx.areas().iter() {
        let sectors = ctx.area_sectors(area.id)?;
        table.add_row(vec![
            area.id.to_string(),
            area.device_id.to_string(),
            format!("{:#010x}", area.offset),
            format!("{} KiB", area.size / 1024),
            sectors.len().to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}
