use clap::Parser;
use std::process::ExitCode;

use provsmini_tools::combine::{combine, CombineArgs};
use provsmini_tools::inspect::{inspect, InspectArgs};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
enum Cli {
    Combine(CombineArgs),
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let result = match Cli::parse_from(wild::args()) {
        Cli::Combine(args) => combine(args),
        Cli::Inspect(args) => inspect(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
