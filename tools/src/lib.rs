//! # Pro VS Mini Tools
//!
//! The [Behringer Pro VS Mini](https://www.behringer.com/product.html?modelCode=0718-AAW) can send
//! and receive its presets as SysEx files, one 75-byte file per preset. To restore a whole set of
//! presets at once, the synthesizer accepts a single bulk transfer of up to 32 presets. This crate
//! provides a command-line utility that builds such a bulk file from a folder of preset files, and
//! can inspect what's in any of them.
//!
//! ## Combine
//!
//! ```console
//! provsmini-tools-combine 0.1.0
//! Combine preset .syx files into one bulk transfer
//!
//! USAGE:
//!     provsmini-tools combine [OPTIONS] <DIRECTORY>
//!
//! ARGS:
//!     <DIRECTORY>    Directory to get the preset files from. Only the first 32 presets are combined
//!
//! OPTIONS:
//!     -e, --extension <EXTENSION>    Extension of the files, can use globs [default: syx]
//!     -f, --force                    Overwrite the output file without asking
//!     -h, --help                     Print help information
//!         --json <JSON>              A JSON file a report of the combine should be written to
//!     -o, --output <OUTPUT>          Path for the combined preset file. Defaults to "combined.syx" in the source directory
//!     -v, --verbose                  Output messages about operations being carried out
//!     -V, --version                  Print version information
//! ```
//!
//! ### Example
//!
//! ```console
//! 4ntler@mbp > provsmini-tools combine presets
//! Found 4 SysEx files in /Users/4ntler/presets
//! 00 <= acid.syx (ACID)
//! 01 <= brass.syx (BRASS 2)
//! Skipping combined file combined.syx
//! Skipping file with unrecognized format: notes.syx (Expected 75 bytes, found 12)
//! Writing the combined SysEx to /Users/4ntler/presets/combined.syx
//! Done! Combined 2 presets, skipped 2 files
//! ```
//!
//! ## Inspect
//!
//! ```console
//! provsmini-tools-inspect 0.1.0
//! Inspect .syx files, or entire directories, for presets
//!
//! USAGE:
//!     provsmini-tools inspect [OPTIONS] [PATHS]...
//!
//! ARGS:
//!     <PATHS>...    The path(s) to inspect
//!
//! OPTIONS:
//!     -e, --extension <EXTENSION>    Extension of the files to pick from directories, can use globs [default: syx]
//!     -h, --help                     Print help information
//!     -r, --recursive                Search the folder recursively
//!     -v, --verbose                  Also dump the contents of every file
//!     -V, --version                  Print version information
//! ```
//!
//! ### Example
//!
//! ```console
//! 4ntler@mbp > provsmini-tools inspect presets/combined.syx presets/acid.syx
//! combined.syx                    Bulk 2/32 | checksum 1C
//!   0 | ACID
//!   1 | BRASS 2
//!
//! acid.syx                        Preset ACID
//! ```

pub mod combine;
pub mod inspect;
pub(crate) mod utils;
