//! The ASCII name stored inside every preset
use std::{
    fmt,
    str::{self, FromStr},
};
use thiserror::Error;

/// An 8-character, right-padded ASCII preset name
///
/// The Pro VS Mini stores the name of a preset as a fixed-width field near the end
/// of the preset payload. Unused characters are padded with spaces (or NUL bytes),
/// which are trimmed off when the name is read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresetName {
    bytes: [u8; Self::LEN],
}

impl PresetName {
    /// The width of the name field in bytes
    pub const LEN: usize = 8;

    /// Try to convert a byte slice to a name
    ///
    /// This function fails if the bytes are longer than the name field, or a non-ASCII
    /// byte is found. A NUL byte ends the name.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FromBytesError> {
        if bytes.len() > Self::LEN {
            return Err(FromBytesError::TooLong);
        }

        let mut dest = [0; Self::LEN];
        for (index, byte) in bytes.iter().enumerate() {
            match *byte {
                0 => break,
                byte if byte.is_ascii() => dest[index] = byte,
                byte => return Err(FromBytesError::NonAscii { byte, index }),
            }
        }

        Ok(Self { bytes: dest })
    }

    /// Access the underlying bytes that make up the name, including padding
    pub fn bytes(&self) -> &[u8; Self::LEN] {
        &self.bytes
    }

    /// The number of characters, not counting trailing padding
    pub fn len(&self) -> usize {
        let end = self
            .bytes
            .iter()
            .position(|c| *c == 0)
            .unwrap_or(Self::LEN);

        self.bytes[..end]
            .iter()
            .rposition(|c| !is_padding(*c))
            .map_or(0, |last| last + 1)
    }

    /// Is the name blank?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to a [`prim@str`] slice, with the padding trimmed off
    pub fn as_str(&self) -> &str {
        // SAFETY: from_bytes only lets ASCII through, which is valid UTF-8 by definition
        unsafe { str::from_utf8_unchecked(&self.bytes[..self.len()]) }
    }
}

/// Whitespace as understood when trimming the right side of a name
///
/// Besides the usual ASCII whitespace this covers vertical tab and the four information
/// separators (0x1C - 0x1F).
fn is_padding(byte: u8) -> bool {
    byte.is_ascii_whitespace() || matches!(byte, 0x0B | 0x1C..=0x1F)
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'a> TryFrom<&'a [u8]> for PresetName {
    type Error = FromBytesError;

    #[inline]
    fn try_from(bytes: &'a [u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl FromStr for PresetName {
    type Err = FromBytesError;

    #[inline]
    fn from_str(str: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(str.as_bytes())
    }
}

/// Errors that can result from trying to convert a byte slice to a [`PresetName`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FromBytesError {
    /// The source slice is bigger than the name field
    #[error("The slice did not fit in the name field")]
    TooLong,

    /// Names are plain ASCII
    #[error("Byte {byte:#04x} at position {index} is not ASCII")]
    NonAscii { byte: u8, index: usize },
}
