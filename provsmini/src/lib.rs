//! Reading, validating and combining SysEx presets for the Behringer Pro VS Mini
//!
//! The Pro VS Mini saves every preset as its own 75-byte SysEx message, but can receive up to
//! 32 of them in a single bulk transfer. This crate validates single-preset
//! [frames](frame::PresetFrame), and packs their payloads into a [`BulkFrame`](bulk::BulkFrame)
//! with the 7-bit [checksum] the device expects.
//!
//! ```no_run
//! # use provsmini::{combine::combine, frame::RawFrame};
//! let frames = ["lead.syx", "bass.syx"]
//!     .into_iter()
//!     .map(RawFrame::from_path)
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let combination = combine(frames)?;
//! std::fs::write("combined.syx", combination.bulk.to_bytes())?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! This is not a general SysEx or MIDI library; it only knows the two frame layouts above.

pub mod bulk;
pub mod checksum;
pub mod combine;
pub mod frame;
pub mod name;
