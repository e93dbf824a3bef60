//! The `combine` subcommand

use crate::utils::{
    absolute, check_for_overwrite, extension_pattern, file_name, init_logging, iter_files,
    write_bulk,
};
use anyhow::{Context, Error, Result};
use clap::Args;
use log::{debug, info, warn};
use provsmini::{
    bulk::BulkFrame,
    combine::{Combiner, Entry, Outcome, Report},
    frame::{COMBINED_PREAMBLE, RawFrame, TERMINATOR},
    name::PresetName,
};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::DirEntry;

/// The file name used when no output path is given
const DEFAULT_OUTPUT: &str = "combined.syx";

/// Arguments for the `combine` subcommand
#[derive(Args)]
#[clap(
    author,
    version,
    about = "Combine preset .syx files into one bulk transfer",
    long_about = "Combine goes through the preset files in a directory, and packs them into one SysEx file for bulk transmission to the Pro VS Mini.\n\nFiles that aren't single presets, including the output of an earlier combine, are skipped. The synthesizer accepts at most 32 presets per transfer, so only the first 32 (by file name) are combined."
)]
pub struct CombineArgs {
    /// Directory to get the preset files from. Only the first 32 presets are combined
    directory: PathBuf,

    /// Extension of the files, can use globs
    #[clap(short, long, default_value = "syx")]
    extension: String,

    /// Path for the combined preset file. Defaults to "combined.syx" in the source directory
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Output messages about operations being carried out
    #[clap(short, long)]
    verbose: bool,

    /// Overwrite the output file without asking
    #[clap(short, long)]
    force: bool,

    /// A JSON file a report of the combine should be written to
    #[clap(long)]
    json: Option<PathBuf>,
}

/// Combine preset .syx files into one bulk transfer
pub fn combine(args: CombineArgs) -> Result<()> {
    init_logging(args.verbose)?;

    if !args.directory.is_dir() {
        return Err(Error::msg(format!(
            "{} is not a directory",
            args.directory.display()
        )));
    }

    let pattern = extension_pattern(&args.extension)?;
    let paths: Vec<_> = iter_files([&args.directory], false, &pattern)
        .map(DirEntry::into_path)
        .collect();

    if !paths.is_empty() {
        info!(
            "Found {} SysEx files in {}",
            paths.len(),
            absolute(&args.directory).display()
        );
        debug!(
            "SysEx files found:\n{}",
            paths
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    let mut combiner = Combiner::new();
    for path in &paths {
        let frame = RawFrame::from_path(path)
            .context(format!("Could not read {}", path.to_string_lossy()))?;

        log_entry(combiner.push(&frame), &frame);
    }

    let combination = combiner.finish()?;
    let bulk = &combination.bulk;

    debug!("Adding preamble: {}", hex::encode(COMBINED_PREAMBLE));
    debug!("Adding combined bytes: {}", hex::encode(bulk.concatenated()));
    debug!("Adding calculated checksum: {:02x}", bulk.checksum());
    debug!("Adding terminator: {:02x}", TERMINATOR);

    let output = args
        .output
        .unwrap_or_else(|| args.directory.join(DEFAULT_OUTPUT));

    if !args.force && !check_for_overwrite(&output)? {
        info!("Left {} untouched", output.display());
        return Ok(());
    }

    info!(
        "Writing the combined SysEx to {}",
        absolute(&output).display()
    );
    write_bulk(&output, bulk)?;

    if let Some(path) = args.json {
        write_json(&path, &combination.report, bulk).context(format!(
            "The combined SysEx was written to {}, but the report was not",
            output.display()
        ))?;
        info!("Wrote the report to {}", path.display());
    }

    info!(
        "Done! Combined {} presets, skipped {} files",
        combination.report.added_count(),
        combination.report.skipped_count()
    );

    Ok(())
}

fn log_entry(entry: &Entry, frame: &RawFrame) {
    let file = file_name(entry.source());

    match entry.outcome() {
        Outcome::Added { slot, name } => {
            info!("{:02} <= {file}{}", u8::from(*slot), describe(name));
            debug!("File contents:\n{}", hex::encode(&frame.bytes));
        }
        Outcome::AlreadyCombined => info!("Skipping combined file {file}"),
        Outcome::Malformed(err) => {
            warn!("Skipping file with unrecognized format: {file} ({err})")
        }
        Outcome::SlotLimitExceeded { name } => warn!(
            "Skipping file above the {}-preset limit: {file}{}",
            BulkFrame::SLOTS_CAPACITY,
            describe(name)
        ),
    }
}

fn describe(name: &Option<PresetName>) -> String {
    match name {
        Some(name) => format!(" ({name})"),
        None => String::new(),
    }
}

fn write_json(path: &Path, report: &Report, bulk: &BulkFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .context(format!("Could not create folder at {}", parent.display()))?;
    }

    let file =
        fs::File::create(path).context(format!("Could not create file at {}", path.display()))?;

    serde_json::to_writer_pretty(file, &JsonReport::new(report, bulk))
        .context("Could not write to JSON")
}

#[derive(Serialize)]
struct JsonReport {
    added: usize,
    skipped: usize,
    checksum: u8,
    entries: Vec<JsonEntry>,
}

impl JsonReport {
    fn new(report: &Report, bulk: &BulkFrame) -> Self {
        Self {
            added: report.added_count(),
            skipped: report.skipped_count(),
            checksum: bulk.checksum(),
            entries: report.entries().iter().map(JsonEntry::from).collect(),
        }
    }
}

#[derive(Serialize)]
struct JsonEntry {
    path: PathBuf,

    #[serde(flatten)]
    outcome: JsonOutcome,
}

impl From<&Entry> for JsonEntry {
    fn from(entry: &Entry) -> Self {
        let name = entry.outcome().name().map(|name| name.as_str().to_owned());

        let outcome = match entry.outcome() {
            Outcome::Added { slot, .. } => JsonOutcome::Added {
                slot: u8::from(*slot),
                name,
            },
            Outcome::AlreadyCombined => JsonOutcome::AlreadyCombined,
            Outcome::Malformed(err) => JsonOutcome::Malformed {
                reason: err.to_string(),
            },
            Outcome::SlotLimitExceeded { .. } => JsonOutcome::SlotLimitExceeded { name },
        };

        Self {
            path: entry.source().to_owned(),
            outcome,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum JsonOutcome {
    Added { slot: u8, name: Option<String> },
    AlreadyCombined,
    Malformed { reason: String },
    SlotLimitExceeded { name: Option<String> },
}
