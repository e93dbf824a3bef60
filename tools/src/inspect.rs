//! The `inspect` subcommand

use crate::utils::{extension_pattern, file_name, init_logging, iter_files};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use log::debug;
use provsmini::{
    bulk::BulkFrame,
    frame::{Classification, RawFrame},
    name::PresetName,
};
use std::path::{Path, PathBuf};
use walkdir::DirEntry;

/// Arguments for the `inspect` subcommand
#[derive(Args)]
#[clap(
    author,
    version,
    about = "Inspect .syx files, or entire directories, for presets"
)]
pub struct InspectArgs {
    /// The path(s) to inspect
    paths: Vec<PathBuf>,

    /// Extension of the files to pick from directories, can use globs
    #[clap(short, long, default_value = "syx")]
    extension: String,

    /// Search the folder recursively
    #[clap(short, long)]
    recursive: bool,

    /// Also dump the contents of every file
    #[clap(short, long)]
    verbose: bool,
}

/// Inspect .syx files, or entire directories, for presets
pub fn inspect(args: &InspectArgs) -> Result<()> {
    init_logging(args.verbose)?;

    if args.paths.is_empty() {
        println!("No paths provided to inspect");
        return Ok(());
    }

    let pattern = extension_pattern(&args.extension)?;
    let paths: Vec<_> = iter_files(&args.paths, args.recursive, &pattern)
        .map(DirEntry::into_path)
        .collect();

    if let Some((last, rest)) = paths.split_last() {
        for path in rest {
            print(path)?;
            println!();
        }

        print(last)?;
    } else {
        println!("No matching files found");
    }

    Ok(())
}

fn print(path: &Path) -> Result<()> {
    let frame = RawFrame::from_path(path)
        .context(format!("Could not read {}", path.to_string_lossy()))?;
    let file = file_name(path);

    match frame.classify() {
        Classification::Preset(preset) => {
            println!("{file:<32}Preset {}", name_or_dash(preset.name.as_ref()).bold());
        }
        Classification::Malformed(err) => {
            println!("{file:<32}{} {err}", "Not a preset:".red());
        }
        Classification::AlreadyCombined => match BulkFrame::from_bytes(&frame.bytes) {
            Ok(bulk) => {
                println!(
                    "{file:<32}Bulk {}/{} | checksum {:02X}",
                    bulk.len(),
                    BulkFrame::SLOTS_CAPACITY,
                    bulk.checksum()
                );

                for (slot, payload) in bulk.slots() {
                    println!(
                        "{:>3} | {}",
                        u8::from(slot),
                        name_or_dash(payload.name().as_ref())
                    );
                }
            }
            Err(err) => {
                println!("{file:<32}{} {err}", "Broken bulk frame:".red());
            }
        },
    }

    debug!("File contents:\n{}", hex::encode(&frame.bytes));

    Ok(())
}

fn name_or_dash(name: Option<&PresetName>) -> String {
    match name {
        Some(name) if !name.is_empty() => name.as_str().to_owned(),
        _ => "-".to_owned(),
    }
}
