//! Generates the CB prefixed `BIT`, `RES` and `SET` dispatch table entries and writes them
//! to a file or stdout.

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use cbgen::output::{save_table, write_table};
use cbgen::render::OutputFormat;
use cbgen::{generate, CB_BIT_OPS_BASE};
use clap::Parser;
use clap_num::maybe_hex;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(about)]
struct Args {
    /// Opcode of the first entry (`BIT 0,B`), decimal or 0x-prefixed hex.
    #[arg(short, long, value_parser = maybe_hex::<u8>, default_value_t = CB_BIT_OPS_BASE)]
    start: u8,
    /// Format to write the table in.
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
    /// File to write the table to. Written to stdout if not given.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    info!(
        "Generating CB bit table from {:#04X} as {:?}",
        args.start, args.format
    );

    let records = generate(args.start);
    let result: Result<(), Box<dyn Error>> = match args.output {
        Some(ref path) => save_table(&records, args.format, path).map_err(Into::into),
        None => write_table(&records, args.format, io::stdout().lock()).map_err(Into::into),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
