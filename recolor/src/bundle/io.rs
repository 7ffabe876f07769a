//! Low-level primitives shared by the bundle reader and writer.

use std::io::{Cursor, Read};

use byteorder::WriteBytesExt;

use crate::error::{Error, Result};

/// Reads a 7-bit encoded length prefix (`BinaryReader.Read7BitEncodedInt`).
pub(super) fn read_7bit_len(cursor: &mut Cursor<&[u8]>) -> Result<usize> {
    let mut value: u32 = 0;
    let mut shift = 0u32;
    loop {
        if shift > 28 {
            return Err(Error::InvalidBundleLayout(
                "7-bit encoded length is too long".into(),
            ));
        }
        let mut byte = [0u8; 1];
        cursor.read_exact(&mut byte).map_err(|_| Error::UnexpectedEof)?;
        value |= u32::from(byte[0] & 0x7F) << shift;
        if byte[0] & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    Ok(value as usize)
}

/// Writes a 7-bit encoded length prefix.
pub(super) fn write_7bit_len(out: &mut Vec<u8>, len: usize) -> Result<()> {
    let mut value = u32::try_from(len)
        .map_err(|_| Error::InvalidBundleLayout("length exceeds u32".into()))?;
    while value >= 0x80 {
        out.write_u8((value as u8) | 0x80)?;
        value >>= 7;
    }
    out.write_u8(value as u8)?;
    Ok(())
}

/// Reads a length-prefixed UTF-8 string (prefix counts bytes).
pub(super) fn read_prefixed_utf8(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let len = read_7bit_len(cursor)?;
    let mut buf = vec![0u8; len];
    cursor.read_exact(&mut buf).map_err(|_| Error::UnexpectedEof)?;
    Ok(String::from_utf8(buf)?)
}

/// Writes a length-prefixed UTF-8 string.
pub(super) fn write_prefixed_utf8(out: &mut Vec<u8>, s: &str) -> Result<()> {
    write_7bit_len(out, s.len())?;
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Reads a length-prefixed UTF-16LE string (prefix counts bytes, not chars).
pub(super) fn read_prefixed_utf16(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let byte_len = read_7bit_len(cursor)?;
    if byte_len % 2 != 0 {
        return Err(Error::MalformedString(
            "UTF-16 name has odd byte length".into(),
        ));
    }
    let mut buf = vec![0u8; byte_len];
    cursor.read_exact(&mut buf).map_err(|_| Error::UnexpectedEof)?;
    let units: Vec<u16> = buf
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Ok(String::from_utf16(&units)?)
}

/// Writes a length-prefixed UTF-16LE string.
pub(super) fn write_prefixed_utf16(out: &mut Vec<u8>, s: &str) -> Result<()> {
    let bytes: Vec<u8> = s
        .encode_utf16()
        .flat_map(|unit| unit.to_le_bytes())
        .collect();
    write_7bit_len(out, bytes.len())?;
    out.extend_from_slice(&bytes);
    Ok(())
}

/// Hash used by the runtime's resource name lookup table.
///
/// djb2 with xor folding over UTF-16 code units, seed 5381. Must match the
/// runtime exactly or lookups against the written bundle fail.
#[must_use]
pub(super) fn name_hash(name: &str) -> u32 {
    let mut hash: u32 = 5381;
    for unit in name.encode_utf16() {
        hash = hash.wrapping_shl(5).wrapping_add(hash) ^ u32::from(unit);
    }
    hash
}
