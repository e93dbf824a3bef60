//! The 7-bit checksum that closes a bulk frame

/// Compute the checksum over a run of bytes
///
/// This is the two's complement of the byte sum, masked to 7 bits so it stays a valid
/// MIDI data byte. Adding it to the sum of the bytes yields a multiple of 128.
pub fn checksum(bytes: &[u8]) -> u8 {
    sum(bytes).wrapping_neg() & 0x7F
}

/// Does the checksum match the bytes?
///
/// A checksum with the high bit set is never valid, as it would be a status byte on the wire.
pub fn verify(bytes: &[u8], checksum: u8) -> bool {
    checksum < 0x80 && sum(bytes).wrapping_add(checksum) & 0x7F == 0
}

// Only the low 7 bits of the result matter, so summing modulo 256 loses nothing
fn sum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |sum, byte| sum.wrapping_add(*byte))
}
