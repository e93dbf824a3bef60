//! The bulk transfer frame

use crate::{
    checksum::{checksum, verify},
    frame::{COMBINED_PREAMBLE, Payload, TERMINATOR},
};
use std::io::{self, Read, Write};
use thiserror::Error;

/// A 5-bit (0 - 31) index into the slots of a [`BulkFrame`]
pub type Slot = ux::u5;

/// Up to 32 preset payloads, transferred to the device in one go
///
/// On the wire a bulk frame is the [`COMBINED_PREAMBLE`], followed by the payloads back to back,
/// a 7-bit [`checksum`] over those payloads and the [`TERMINATOR`]:
///
/// ```text
/// F0 00 20 32 00 13 31 10 | N * 64 bytes | checksum | F7
/// ```
///
/// The device accepts at most [`BulkFrame::SLOTS_CAPACITY`] presets per transfer, which
/// [`BulkFrame::insert()`] enforces.
///
/// ```
/// # use provsmini::{bulk::BulkFrame, frame::Payload};
/// let mut bulk = BulkFrame::new();
/// bulk.insert(Payload::new([0x01; 64]))?;
/// bulk.insert(Payload::new([0x02; 64]))?;
///
/// let bytes = bulk.to_bytes();
/// assert_eq!(bytes.len(), 8 + 2 * 64 + 2);
/// assert_eq!(bytes[bytes.len() - 2], 0x40);
/// # Ok::<(), provsmini::bulk::SlotLimitExceeded>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkFrame {
    payloads: Vec<Payload>,
}

impl BulkFrame {
    /// The maximal number of presets in a single bulk transfer
    pub const SLOTS_CAPACITY: usize = 0x20;

    /// Bytes surrounding the payloads: the preamble, checksum and terminator
    const OVERHEAD_LEN: usize = COMBINED_PREAMBLE.len() + 2;

    /// Construct an empty bulk frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a payload to the next free slot
    ///
    /// Fails without changing anything once all slots are taken.
    pub fn insert(&mut self, payload: Payload) -> Result<Slot, SlotLimitExceeded> {
        if self.is_full() {
            return Err(SlotLimitExceeded);
        }

        let slot = Slot::new(self.payloads.len() as u8);
        self.payloads.push(payload);

        Ok(slot)
    }

    /// The number of slots in use
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Are all slots in use?
    pub fn is_full(&self) -> bool {
        self.len() == Self::SLOTS_CAPACITY
    }

    /// The payloads in slot order
    pub fn payloads(&self) -> &[Payload] {
        &self.payloads
    }

    /// Iterate over the payloads along with their slot
    pub fn slots(&self) -> impl Iterator<Item = (Slot, &Payload)> {
        self.payloads
            .iter()
            .enumerate()
            .map(|(index, payload)| (Slot::new(index as u8), payload))
    }

    /// All payloads back to back, which is what the checksum is computed over
    pub fn concatenated(&self) -> Vec<u8> {
        self.payloads
            .iter()
            .flat_map(|payload| payload.as_slice())
            .copied()
            .collect()
    }

    /// The checksum as it will be written
    pub fn checksum(&self) -> u8 {
        checksum(&self.concatenated())
    }

    /// The length in bytes of the serialized frame
    pub fn byte_len(&self) -> usize {
        Self::OVERHEAD_LEN + self.len() * Payload::LEN
    }

    /// Parse a bulk frame, verifying its structure and checksum
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FromBytesError> {
        if !bytes.starts_with(&COMBINED_PREAMBLE) {
            return Err(FromBytesError::WrongPreamble);
        }

        if bytes.len() < Self::OVERHEAD_LEN {
            return Err(FromBytesError::TooShort { len: bytes.len() });
        }

        let end = bytes.len() - 1;
        if bytes[end] != TERMINATOR {
            return Err(FromBytesError::WrongTerminator { found: bytes[end] });
        }

        let body = &bytes[COMBINED_PREAMBLE.len()..end - 1];
        let found = bytes[end - 1];

        if body.len() % Payload::LEN != 0 {
            return Err(FromBytesError::PartialPayload { len: body.len() });
        }

        let count = body.len() / Payload::LEN;
        if count > Self::SLOTS_CAPACITY {
            return Err(FromBytesError::TooManyPayloads { count });
        }

        if !verify(body, found) {
            return Err(FromBytesError::ChecksumMismatch {
                expected: checksum(body),
                found,
            });
        }

        let payloads = body
            .chunks_exact(Payload::LEN)
            .map(|chunk| {
                let mut payload = [0; Payload::LEN];
                payload.copy_from_slice(chunk);
                Payload::new(payload)
            })
            .collect();

        Ok(Self { payloads })
    }

    /// Read a bulk frame from an arbitrary I/O reader
    pub fn from_reader<R>(mut reader: R) -> Result<Self, FromReaderError>
    where
        R: Read,
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        Ok(Self::from_bytes(&bytes)?)
    }

    /// Serialize the bulk frame to an arbitrary I/O writer
    pub fn to_writer<W>(&self, mut writer: W) -> Result<(), io::Error>
    where
        W: Write,
    {
        writer.write_all(&COMBINED_PREAMBLE)?;
        for payload in &self.payloads {
            writer.write_all(payload.as_slice())?;
        }
        writer.write_all(&[self.checksum(), TERMINATOR])?;

        Ok(())
    }

    /// Serialize the bulk frame to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        bytes.extend_from_slice(&COMBINED_PREAMBLE);
        bytes.extend(self.concatenated());
        bytes.push(self.checksum());
        bytes.push(TERMINATOR);
        bytes
    }
}

/// Returned from [`BulkFrame::insert()`] when every slot is taken
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("All {capacity} slots of the bulk frame are in use", capacity = BulkFrame::SLOTS_CAPACITY)]
pub struct SlotLimitExceeded;

/// Errors that might be returned from [`BulkFrame::from_bytes()`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FromBytesError {
    #[error("The file does not start with the bulk preamble")]
    WrongPreamble,

    #[error("{len} bytes is too short for a bulk frame")]
    TooShort { len: usize },

    #[error("Expected terminator {terminator:#04X}, found {found:#04X}", terminator = TERMINATOR)]
    WrongTerminator { found: u8 },

    /// The payload section isn't a whole number of presets
    #[error("{len} payload bytes is not a multiple of {size}", size = Payload::LEN)]
    PartialPayload { len: usize },

    #[error("{count} presets exceed the limit of {limit}", limit = BulkFrame::SLOTS_CAPACITY)]
    TooManyPayloads { count: usize },

    #[error("Checksum should be {expected:#04X}, found {found:#04X}")]
    ChecksumMismatch { expected: u8, found: u8 },
}

/// Errors that might be returned from [`BulkFrame::from_reader()`]
#[derive(Debug, Error)]
pub enum FromReaderError {
    /// Any failure that has to do with I/O
    #[error("Something failed with I/O")]
    Read(#[from] io::Error),

    /// The bytes did not make up a bulk frame
    #[error("Parsing the bulk frame failed")]
    Parse(#[from] FromBytesError),
}
