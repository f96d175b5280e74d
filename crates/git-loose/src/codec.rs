use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use git_object::header::write_header;
use git_object::{ObjectError, ObjectType, ShaFile};
use tracing::trace;

use crate::LooseError;

/// Does `data` start with a zlib stream header?
///
/// The first byte must announce deflate with a window of at most 32K and the
/// first two bytes, read big-endian, must be a multiple of 31.
pub fn is_zlib_header(data: &[u8]) -> bool {
    match data {
        [cmf, flg, ..] => {
            let word = u16::from(*cmf) << 8 | u16::from(*flg);
            word & 0x8f00 == 0x0800 && word % 31 == 0
        }
        _ => false,
    }
}

/// Decode the contents of a loose object file.
///
/// Both framings are recognised from the first two bytes: a zlib stream
/// holding the whole `"<type> <size>\0<payload>"` envelope, or a pack-style
/// type/size header followed by a zlib stream of the payload alone.
pub fn decode_loose(compressed: &[u8]) -> Result<ShaFile, LooseError> {
    if is_zlib_header(compressed) {
        trace!("zlib-framed loose object");
        let envelope = inflate(compressed)?;
        Ok(ShaFile::parse_envelope(&envelope)?)
    } else {
        trace!("pack-style loose object");
        let (obj_type, size, header_len) = parse_pack_header(compressed)?;
        let payload = inflate(&compressed[header_len..])?;
        if payload.len() != size {
            return Err(ObjectError::LengthMismatch {
                expected: size,
                actual: payload.len(),
            }
            .into());
        }
        Ok(ShaFile::from_raw(obj_type, payload)?)
    }
}

/// Compress an object into the standard zlib-framed loose format.
pub fn encode_loose(file: &ShaFile, level: Compression) -> Result<Vec<u8>, LooseError> {
    let payload = file.as_raw_bytes();
    let mut encoder = ZlibEncoder::new(Vec::new(), level);
    encoder.write_all(&write_header(file.object_type(), payload.len()))?;
    encoder.write_all(&payload)?;
    Ok(encoder.finish()?)
}

/// Inflate a complete zlib stream. Output does not depend on how the
/// encoder chunked its input or on its window size.
fn inflate(data: &[u8]) -> Result<Vec<u8>, LooseError> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(LooseError::Decompress)?;
    Ok(out)
}

/// Parse a pack entry header: type in bits 4-6 of the first byte, size in
/// its low 4 bits, then 7 more size bits per continuation byte.
fn parse_pack_header(data: &[u8]) -> Result<(ObjectType, usize, usize), LooseError> {
    let first = *data
        .first()
        .ok_or_else(|| LooseError::corrupt("empty loose object"))?;
    let type_num = (first >> 4) & 0x07;
    let obj_type = ObjectType::from_type_num(type_num)
        .ok_or_else(|| LooseError::corrupt(format!("invalid object type number {type_num}")))?;

    let mut size = usize::from(first & 0x0f);
    let mut shift = 4u32;
    let mut pos = 1;
    let mut byte = first;
    while byte & 0x80 != 0 {
        byte = *data
            .get(pos)
            .ok_or_else(|| LooseError::corrupt("truncated object size"))?;
        let bits = usize::from(byte & 0x7f);
        size |= bits
            .checked_shl(shift)
            .filter(|v| v >> shift == bits)
            .ok_or_else(|| LooseError::corrupt("object size overflows"))?;
        shift += 7;
        pos += 1;
    }
    Ok((obj_type, size, pos))
}
