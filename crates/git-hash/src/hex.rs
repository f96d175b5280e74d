//! Hex codec for object identities.
//!
//! Object headers carry identities as 40 hex characters while tree entries
//! and the hasher work on 20 raw bytes. The helpers here convert between the
//! two and reject anything that is not exactly one SHA-1 digest long.

use std::path::{Path, PathBuf};

use crate::{HashError, SHA1_HEX_LEN, SHA1_LEN};

/// Lookup table: ASCII byte → nibble value (255 = invalid).
const HEX_DECODE: [u8; 256] = {
    let mut table = [255u8; 256];
    let mut i = 0u8;
    loop {
        match i {
            b'0'..=b'9' => table[i as usize] = i - b'0',
            b'a'..=b'f' => table[i as usize] = i - b'a' + 10,
            b'A'..=b'F' => table[i as usize] = i - b'A' + 10,
            _ => {}
        }
        if i == 255 {
            break;
        }
        i += 1;
    }
    table
};

const HEX_ENCODE: &[u8; 16] = b"0123456789abcdef";

/// Hex-encode `bytes` into `buf`. `buf` must be at least `bytes.len() * 2` bytes.
///
/// # Panics
///
/// Panics if `buf` is too short.
pub fn hex_encode(bytes: &[u8], buf: &mut [u8]) {
    assert!(
        buf.len() >= bytes.len() * 2,
        "hex_encode: buffer too short"
    );
    for (i, &b) in bytes.iter().enumerate() {
        buf[i * 2] = HEX_ENCODE[(b >> 4) as usize];
        buf[i * 2 + 1] = HEX_ENCODE[(b & 0x0f) as usize];
    }
}

/// Hex-encode `bytes` to a new lowercase `String`.
pub fn hex_to_string(bytes: &[u8]) -> String {
    let mut buf = vec![0u8; bytes.len() * 2];
    hex_encode(bytes, &mut buf);
    // SAFETY: hex_encode only writes ASCII hex digits.
    unsafe { String::from_utf8_unchecked(buf) }
}

/// Decode hex into `buf`. The input length must be exactly `buf.len() * 2`.
pub fn hex_decode(hex: &[u8], buf: &mut [u8]) -> Result<(), HashError> {
    if hex.len() != buf.len() * 2 {
        return Err(HashError::InvalidHexLength {
            expected: buf.len() * 2,
            actual: hex.len(),
        });
    }
    for i in 0..buf.len() {
        let hi = HEX_DECODE[hex[i * 2] as usize];
        let lo = HEX_DECODE[hex[i * 2 + 1] as usize];
        if hi == 255 {
            return Err(HashError::InvalidHex {
                position: i * 2,
                character: hex[i * 2] as char,
            });
        }
        if lo == 255 {
            return Err(HashError::InvalidHex {
                position: i * 2 + 1,
                character: hex[i * 2 + 1] as char,
            });
        }
        buf[i] = (hi << 4) | lo;
    }
    Ok(())
}

/// Decode hex to a new `Vec<u8>`.
pub fn hex_to_bytes(hex: &[u8]) -> Result<Vec<u8>, HashError> {
    if hex.len() % 2 != 0 {
        return Err(HashError::InvalidHexLength {
            expected: hex.len() + 1, // nearest even
            actual: hex.len(),
        });
    }
    let mut buf = vec![0u8; hex.len() / 2];
    hex_decode(hex, &mut buf)?;
    Ok(buf)
}

/// Check if a byte string is valid hexadecimal (even length, all hex chars).
pub fn is_valid_hex(s: &[u8]) -> bool {
    s.len() % 2 == 0 && s.iter().all(|&b| HEX_DECODE[b as usize] != 255)
}

/// Convert a 40-character hex SHA to its 20 raw bytes.
pub fn hex_to_sha(hex: &[u8]) -> Result<[u8; SHA1_LEN], HashError> {
    let mut sha = [0u8; SHA1_LEN];
    hex_decode(hex, &mut sha)?;
    Ok(sha)
}

/// Convert 20 raw SHA bytes to 40 lowercase hex characters.
pub fn sha_to_hex(sha: &[u8]) -> Result<String, HashError> {
    if sha.len() != SHA1_LEN {
        return Err(HashError::InvalidHashLength {
            expected: SHA1_LEN,
            actual: sha.len(),
        });
    }
    Ok(hex_to_string(sha))
}

/// Succeeds iff `hex` is exactly 40 hex characters.
pub fn check_hex_sha(hex: &[u8]) -> Result<(), HashError> {
    hex_to_sha(hex).map(|_| ())
}

/// Map a hex SHA to its sharded location below `base`: `base/xx/yyyy…`.
pub fn hex_to_filename(base: impl AsRef<Path>, hex: &[u8]) -> Result<PathBuf, HashError> {
    check_hex_sha(hex)?;
    let hex = hex.to_ascii_lowercase();
    // Checked above: all ASCII.
    let hex = String::from_utf8_lossy(&hex);
    Ok(base.as_ref().join(&hex[..2]).join(&hex[2..SHA1_HEX_LEN]))
}
