// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use flashsim::boards::Board;
use flashsim::config::SimConfig;
use flashsim_cli::commands::{areas, erase, fill, info, read, write};
use flashsim_cli::location::{parse_u32, Location};
use flashsim_cli::telemetry::init_tracing;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flashsim")]
#[command(about = "Inspect and modify simulated flash backing files", long_about = None)]
struct Cli {
    /// Board profile: native or olimex_stm32-e407
    #[arg(long, short, default_value = "native")]
    board: Board,

    /// Backing file (defaults to $FLASHSIM_FILE, otherwise a throwaway file)
    #[arg(long, short)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the device attributes and sector table
    Info,
    /// List the flash areas of the board
    Areas,
    /// Hex dump a range
    Read {
        /// Absolute address (hex with 0x, or decimal)
        #[arg(long)]
        addr: Option<String>,

        /// Area name (bootloader, image-0, image-1, image-scratch, nffs) or id
        #[arg(long)]
        area: Option<String>,

        /// Offset into the area
        #[arg(long, default_value = "0", value_parser = parse_u32)]
        offset: u32,

        #[arg(long, short, default_value_t = 64)]
        len: usize,
    },
    /// Program hex-encoded bytes into erased flash
    Write {
        #[arg(long)]
        addr: Option<String>,

        #[arg(long)]
        area: Option<String>,

        #[arg(long, default_value = "0", value_parser = parse_u32)]
        offset: u32,

        /// Bytes to write, hex encoded
        data: String,
    },
    /// Erase a sector by address, or sector-aligned bytes of an area
    Erase {
        #[arg(long)]
        addr: Option<String>,

        #[arg(long)]
        area: Option<String>,

        /// Offset into the area, on a sector boundary
        #[arg(long, default_value = "0", value_parser = parse_u32)]
        offset: u32,

        /// Bytes to erase (defaults to the rest of the area)
        #[arg(long, short, value_parser = parse_u32)]
        len: Option<u32>,
    },
    /// Overwrite a range without the erase check
    Fill {
        #[arg(long, value_parser = parse_u32)]
        addr: u32,

        #[arg(long, value_parser = parse_u32)]
        value: u32,

        #[arg(long, short)]
        len: usize,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match cli.file {
        Some(path) => SimConfig::with_path(path),
        None => SimConfig::from_env(),
    };
    tracing::debug!("Using board {} with {:?}", cli.board.name(), config);

    let board = cli.board;
    match cli.command {
        Commands::Info => info::run(&board.context(config)?, board),
        Commands::Areas => areas::run(&board.context(config)?),
        Commands::Read { addr, area, offset, len } => {
            let location = Location::from_args(addr.as_deref(), area.as_deref(), offset)?;
            read::run(&mut board.context(config)?, location, len).map(|_| ())
        }
        Commands::Write { addr, area, offset, data } => {
            let location = Location::from_args(addr.as_deref(), area.as_deref(), offset)?;
            write::run(&mut board.context(config)?, location, &data)
        }
        Commands::Erase { addr, area, offset, len } => {
            let location = Location::from_args(addr.as_deref(), area.as_deref(), offset)?;
            erase::run(&mut board.context(config)?, location, len)
        }
        // Raw fill works on the bare device, without the area table.
        Commands::Fill { addr, value, len } => {
            let value = u8::try_from(value).map_err(|_| anyhow::anyhow!("fill value must fit in a byte"))?;
            fill::run(board, config, addr, value, len)
        }
    }
}
