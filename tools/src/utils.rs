use anyhow::{Context, Result};
use glob::Pattern;
use log::LevelFilter;
use provsmini::bulk::BulkFrame;
use std::{
    fs::create_dir_all,
    io::{stdin, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use walkdir::{DirEntry, WalkDir};

/// Set up logging to stderr
///
/// Normally only info and up is shown, as bare messages. Verbose mode adds debug output and
/// prefixes every line with its level. `RUST_LOG` still has the final say.
pub fn init_logging(verbose: bool) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    if verbose {
        builder
            .filter_level(LevelFilter::Debug)
            .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()));
    } else {
        builder
            .filter_level(LevelFilter::Info)
            .format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    builder
        .parse_default_env()
        .try_init()
        .context("Could not initialize logging")
}

/// Compile the glob that file names have to match, from an extension (which may itself be a glob)
pub fn extension_pattern(extension: &str) -> Result<Pattern> {
    Pattern::new(&format!("*.{extension}"))
        .context(format!("Invalid extension pattern \"{extension}\""))
}

/// Walk the given paths for files whose name matches the pattern
///
/// Paths that are files themselves are always yielded. Hidden files are skipped, and the
/// contents of each folder come out sorted by name. Symbolic links to files count as files.
pub fn iter_files<'a, I>(
    paths: I,
    recursive: bool,
    pattern: &'a Pattern,
) -> impl Iterator<Item = DirEntry> + 'a
where
    I: IntoIterator + 'a,
    <I as IntoIterator>::Item: AsRef<Path>,
{
    paths
        .into_iter()
        .flat_map(move |path| {
            let mut walk_dir = WalkDir::new(path.as_ref()).sort_by_file_name();
            if !recursive {
                walk_dir = walk_dir.max_depth(1);
            }

            walk_dir
        })
        .filter_map(Result::ok)
        .filter(move |entry| {
            entry.path().is_file()
                && (entry.depth() == 0
                    || (!is_hidden(entry)
                        && pattern.matches(&entry.file_name().to_string_lossy())))
        })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// The file name of a path, for short log messages
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Best-effort absolute version of a path, for messages
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_owned())
}

/// Ask the user whether an existing file may be overwritten
///
/// Returns `true` if the file doesn't exist or the user agreed. Closing stdin counts as a no.
pub fn check_for_overwrite(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }

    loop {
        println!(
            "{} already exists. Do you want to overwrite it? Y/n",
            path.to_string_lossy()
        );

        let mut line = String::new();
        let read = stdin()
            .read_line(&mut line)
            .context("Could not read terminal input")?;

        if read == 0 {
            return Ok(false);
        }

        match line.trim_end() {
            "Y" => return Ok(true),
            "n" => return Ok(false),
            _ => (),
        }
    }
}

/// Write a bulk frame to disk
///
/// The frame is written to a temporary file next to the destination first, and only moved in
/// place once complete. A failed write leaves any existing file untouched.
pub fn write_bulk(path: &Path, bulk: &BulkFrame) -> Result<()> {
    let folder = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    create_dir_all(folder).context(format!("Could not create folder at {}", folder.display()))?;

    let mut file = NamedTempFile::new_in(folder)
        .context(format!("Could not create a temporary file in {}", folder.display()))?;

    bulk.to_writer(&mut file)
        .context(format!("Could not write to {}", file.path().display()))?;

    file.persist(path)
        .context(format!("Could not move the output into place at {}", path.display()))?;

    Ok(())
}
