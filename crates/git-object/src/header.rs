//! The envelope shared by every object: `"<type> <size>\0<payload>"`.

use bstr::ByteSlice;

use crate::{ObjectError, ObjectType};

/// Parse an object header from raw bytes.
///
/// The type ends at the first space and the decimal size at the first NUL
/// after it. Returns `(type, content_size, header_length)` where
/// `header_length` includes the NUL terminator.
pub fn parse_header(data: &[u8]) -> Result<(ObjectType, usize, usize), ObjectError> {
    let space_pos = data
        .find_byte(b' ')
        .ok_or_else(|| ObjectError::InvalidHeader("missing space in header".into()))?;
    let null_pos = data[space_pos + 1..]
        .find_byte(0)
        .ok_or_else(|| ObjectError::InvalidHeader("missing null terminator".into()))?
        + space_pos
        + 1;

    let obj_type = ObjectType::from_bytes(&data[..space_pos])?;

    let size_bytes = &data[space_pos + 1..null_pos];
    if size_bytes.is_empty() || !size_bytes.iter().all(u8::is_ascii_digit) {
        return Err(ObjectError::InvalidHeader(format!(
            "invalid size: {:?}",
            size_bytes.as_bstr()
        )));
    }
    let content_size: usize = size_bytes
        .to_str()
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ObjectError::InvalidHeader(format!("size out of range: {:?}", size_bytes.as_bstr())))?;

    Ok((obj_type, content_size, null_pos + 1))
}

/// Split a complete envelope into its type and payload.
///
/// The declared size must match the payload length exactly.
pub fn split_envelope(data: &[u8]) -> Result<(ObjectType, &[u8]), ObjectError> {
    let (obj_type, content_size, header_len) = parse_header(data)?;
    let payload = &data[header_len..];
    if payload.len() != content_size {
        return Err(ObjectError::LengthMismatch {
            expected: content_size,
            actual: payload.len(),
        });
    }
    Ok((obj_type, payload))
}

/// Write an object header: `"<type> <size>\0"`.
pub fn write_header(obj_type: ObjectType, content_size: usize) -> Vec<u8> {
    let s = format!("{} {}\0", obj_type, content_size);
    s.into_bytes()
}
