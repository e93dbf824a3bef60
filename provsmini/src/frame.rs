//! Single-preset SysEx frames and their validation
//!
//! A preset saved from the Pro VS Mini is one SysEx message of exactly 75 bytes:
//!
//! ```text
//! F0 00 20 32 00 13 31 | xx | 64 bytes of payload | yy | F7
//! \---- preamble ----/  sub   \-- name at 55..63 /  \ suffix /
//! ```
//!
//! Only the payload is carried over into a [`BulkFrame`](crate::bulk::BulkFrame), the header
//! and suffix are discarded.

use crate::name::PresetName;
use std::{
    fmt,
    io::{self, Read},
    ops::Range,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// The bytes every Pro VS Mini SysEx message starts with
pub const DEVICE_PREAMBLE: [u8; 7] = [0xF0, 0x00, 0x20, 0x32, 0x00, 0x13, 0x31];

/// The sub-id that marks a bulk transfer
pub const BULK_SUB_ID: u8 = 0x10;

/// The preamble of a bulk (already combined) frame
pub const COMBINED_PREAMBLE: [u8; 8] = [0xF0, 0x00, 0x20, 0x32, 0x00, 0x13, 0x31, BULK_SUB_ID];

/// The end-of-exclusive byte closing every frame
pub const TERMINATOR: u8 = 0xF7;

const HEADER_LEN: usize = DEVICE_PREAMBLE.len() + 1;
const SUFFIX_LEN: usize = 3;
const PAYLOAD_RANGE: Range<usize> = HEADER_LEN..HEADER_LEN + Payload::LEN;
const PAYLOAD_NAME_RANGE: Range<usize> = 55..63;

/// The bytes of one candidate file, along with where they came from
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Where the bytes were read from, for diagnostics
    pub source: PathBuf,

    /// The untouched file contents
    pub bytes: Vec<u8>,
}

impl RawFrame {
    /// Wrap bytes with a source identifier
    pub fn new(source: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            bytes,
        }
    }

    /// Read a [`RawFrame`] from an arbitrary I/O reader
    pub fn from_reader<R>(source: impl Into<PathBuf>, mut reader: R) -> Result<Self, io::Error>
    where
        R: Read,
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        Ok(Self::new(source, bytes))
    }

    /// Read a [`RawFrame`] from a path on disk
    pub fn from_path<P>(path: P) -> Result<Self, io::Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        Ok(Self::new(path, std::fs::read(path)?))
    }

    /// Run the bytes through [`classify()`]
    pub fn classify(&self) -> Classification {
        classify(&self.bytes)
    }
}

/// The 64-byte body of a preset, as it is stored in a bulk transfer
#[derive(Clone, PartialEq, Eq)]
pub struct Payload([u8; Self::LEN]);

impl Payload {
    /// The length in bytes of a payload
    pub const LEN: usize = 64;

    /// Construct a payload from its bytes
    pub fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// The name of the preset, or [`None`] if the name field isn't ASCII
    pub fn name(&self) -> Option<PresetName> {
        PresetName::from_bytes(&self.0[PAYLOAD_NAME_RANGE]).ok()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Payload").field(&self.name()).finish()
    }
}

/// A validated single-preset frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetFrame {
    /// The payload that goes into a bulk frame
    pub payload: Payload,

    /// The name of the preset, if it could be decoded
    pub name: Option<PresetName>,
}

impl PresetFrame {
    /// The exact length in bytes of a single-preset frame
    pub const LEN: usize = HEADER_LEN + Payload::LEN + SUFFIX_LEN;

    /// Validate and pick apart a single-preset frame
    ///
    /// Bulk frames are rejected too. Use [`classify()`] to tell them apart from broken files.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MalformedFrameError> {
        if !bytes.starts_with(&DEVICE_PREAMBLE) {
            return Err(MalformedFrameError::WrongPreamble);
        }

        if bytes.len() != Self::LEN {
            return Err(MalformedFrameError::WrongLength { len: bytes.len() });
        }

        let last = bytes[Self::LEN - 1];
        if last != TERMINATOR {
            return Err(MalformedFrameError::WrongTerminator { found: last });
        }

        let mut payload = [0; Payload::LEN];
        payload.copy_from_slice(&bytes[PAYLOAD_RANGE]);
        let payload = Payload::new(payload);

        Ok(Self {
            name: payload.name(),
            payload,
        })
    }
}

/// What a candidate file turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A bulk frame, probably the output of an earlier run
    AlreadyCombined,

    /// A valid single preset
    Preset(PresetFrame),

    /// Anything else
    Malformed(MalformedFrameError),
}

/// Decide what a candidate file is
///
/// Anything starting with the [`COMBINED_PREAMBLE`] counts as already combined, no matter
/// what follows.
pub fn classify(bytes: &[u8]) -> Classification {
    if bytes.starts_with(&COMBINED_PREAMBLE) {
        return Classification::AlreadyCombined;
    }

    match PresetFrame::from_bytes(bytes) {
        Ok(preset) => Classification::Preset(preset),
        Err(err) => Classification::Malformed(err),
    }
}

/// The reasons a file is not a single-preset frame
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MalformedFrameError {
    #[error("The file does not start with the Pro VS Mini SysEx preamble")]
    WrongPreamble,

    #[error("Expected {expected} bytes, found {len}", expected = PresetFrame::LEN)]
    WrongLength { len: usize },

    #[error("Expected terminator {terminator:#04X}, found {found:#04X}", terminator = TERMINATOR)]
    WrongTerminator { found: u8 },
}

/// Build a single-preset frame around a payload, for tests
#[cfg(test)]
pub(crate) fn frame_bytes(payload: &[u8; Payload::LEN]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(PresetFrame::LEN);
    bytes.extend_from_slice(&DEVICE_PREAMBLE);
    bytes.push(0x00);
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&[0x00, 0x00, TERMINATOR]);
    bytes
}

/// Build a named single-preset frame, for tests
#[cfg(test)]
pub(crate) fn preset_bytes(fill: u8, name: &[u8]) -> Vec<u8> {
    let mut payload = [fill; Payload::LEN];
    payload[PAYLOAD_NAME_RANGE].fill(b' ');
    payload[PAYLOAD_NAME_RANGE.start..PAYLOAD_NAME_RANGE.start + name.len()].copy_from_slice(name);
    frame_bytes(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        assert_eq!(PresetFrame::LEN, 75);
        assert_eq!(PAYLOAD_RANGE, 8..72);
        assert!(COMBINED_PREAMBLE.starts_with(&DEVICE_PREAMBLE));
    }

    #[test]
    fn preset() {
        let bytes = preset_bytes(0x01, b"LEAD");

        let Classification::Preset(preset) = classify(&bytes) else {
            panic!("not classified as a preset");
        };
        assert_eq!(preset.payload.as_slice(), &bytes[8..72]);
        assert_eq!(preset.name.unwrap().as_str(), "LEAD");

        // Name field sits at 63..71 in the full frame
        assert_eq!(&bytes[63..71], b"LEAD    ");
    }

    #[test]
    fn non_ascii_name_is_still_a_preset() {
        let mut bytes = preset_bytes(0x01, b"");
        bytes[63] = 0x80;

        let Classification::Preset(preset) = classify(&bytes) else {
            panic!("not classified as a preset");
        };
        assert_eq!(preset.name, None);
    }

    #[test]
    fn already_combined() {
        let mut bytes = COMBINED_PREAMBLE.to_vec();
        assert_eq!(classify(&bytes), Classification::AlreadyCombined);

        bytes.resize(PresetFrame::LEN - 1, 0x00);
        bytes.push(TERMINATOR);
        assert_eq!(classify(&bytes), Classification::AlreadyCombined);
    }

    #[test]
    fn malformed() {
        let bytes = preset_bytes(0x01, b"X");

        assert_eq!(
            classify(&bytes[..74]),
            Classification::Malformed(MalformedFrameError::WrongLength { len: 74 })
        );

        let mut long = bytes.clone();
        long.push(TERMINATOR);
        assert_eq!(
            classify(&long),
            Classification::Malformed(MalformedFrameError::WrongLength { len: 76 })
        );

        let mut preamble = bytes.clone();
        preamble[3] = 0x33;
        assert_eq!(
            classify(&preamble),
            Classification::Malformed(MalformedFrameError::WrongPreamble)
        );

        let mut terminator = bytes.clone();
        terminator[74] = 0x00;
        assert_eq!(
            classify(&terminator),
            Classification::Malformed(MalformedFrameError::WrongTerminator { found: 0x00 })
        );

        assert_eq!(
            classify(&[]),
            Classification::Malformed(MalformedFrameError::WrongPreamble)
        );
    }

    #[test]
    fn device_id_01_33_is_not_a_preset() {
        // F0 00 20 32 00 01 33 swaps the device id bytes, and is not accepted as a Pro VS Mini
        // preamble
        let mut bytes = frame_bytes(&[0x01; Payload::LEN]);
        bytes[5] = 0x01;
        bytes[6] = 0x33;
        assert_eq!(&bytes[..7], &[0xF0, 0x00, 0x20, 0x32, 0x00, 0x01, 0x33]);

        assert_eq!(
            classify(&bytes),
            Classification::Malformed(MalformedFrameError::WrongPreamble)
        );

        // Neither is its bulk counterpart recognized as already combined
        bytes[7] = BULK_SUB_ID;
        assert_eq!(
            classify(&bytes),
            Classification::Malformed(MalformedFrameError::WrongPreamble)
        );
    }

    #[test]
    fn classification_is_pure() {
        let frame = RawFrame::new("a.syx", preset_bytes(0x05, b"SAME"));
        assert_eq!(frame.classify(), frame.classify());
    }

    #[test]
    fn from_reader() {
        let bytes = preset_bytes(0x02, b"READ");
        let frame = RawFrame::from_reader("read.syx", io::Cursor::new(bytes.clone())).unwrap();

        assert_eq!(frame.bytes, bytes);
        assert_eq!(frame.source, PathBuf::from("read.syx"));
    }
}
