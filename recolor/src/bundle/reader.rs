//! Reading `.resources` bundles into a [`ResourceSet`].

use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};
use crate::set::ResourceSet;

use super::io::{read_7bit_len, read_prefixed_utf8, read_prefixed_utf16};
use super::value::ResourceValue;
use super::RESOURCE_MAGIC;

/// Loads a bundle from disk.
pub fn load_bundle<P: AsRef<Path>>(path: P) -> Result<ResourceSet> {
    let data = std::fs::read(path)?;
    read_bundle(&data)
}

/// Parses a `.resources` bundle.
///
/// Accepts both the standalone file form (magic first) and the embedded form
/// carrying a 4-byte length prefix in front of the magic.
pub fn read_bundle(data: &[u8]) -> Result<ResourceSet> {
    if data.len() < 8 {
        return Err(Error::UnexpectedEof);
    }

    let first = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if first == RESOURCE_MAGIC {
        return read_bundle_body(data);
    }

    // Embedded resources are prefixed with their byte length.
    let second = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if second == RESOURCE_MAGIC && first as usize <= data.len() - 4 {
        return read_bundle_body(&data[4..]);
    }

    Err(Error::InvalidBundleMagic { found: first })
}

/// Parses a bundle whose magic sits at offset zero.
///
/// All stored offsets (name positions, data section location) are relative
/// to that zero point, matching what the runtime's writer emits.
fn read_bundle_body(body: &[u8]) -> Result<ResourceSet> {
    let mut cursor = Cursor::new(body);

    let magic = cursor.read_u32::<LittleEndian>()?;
    if magic != RESOURCE_MAGIC {
        return Err(Error::InvalidBundleMagic { found: magic });
    }

    let manager_version = cursor.read_u32::<LittleEndian>()?;
    let header_size = u64::from(cursor.read_u32::<LittleEndian>()?);
    if manager_version == 1 {
        // Class names of the reader and the resource set.
        let _reader_type = read_prefixed_utf8(&mut cursor)?;
        let _set_type = read_prefixed_utf8(&mut cursor)?;
    } else {
        // Unknown header layout, but the size field tells us how far to skip.
        cursor.set_position(cursor.position() + header_size);
    }

    // Version-1 readers index payload types through the type table instead
    // of type codes; decoding them as v2 would yield garbage, so they are
    // rejected outright.
    let reader_version = cursor.read_u32::<LittleEndian>()?;
    if reader_version != 2 {
        return Err(Error::UnsupportedBundleVersion {
            version: reader_version,
        });
    }
    if peek(&cursor) == Some(b'*') {
        // Debug builds carry a "***DEBUG***" marker string here.
        let _ = read_prefixed_utf8(&mut cursor)?;
    }

    let resource_count = cursor.read_u32::<LittleEndian>()? as usize;
    let type_count = cursor.read_u32::<LittleEndian>()? as usize;
    for _ in 0..type_count {
        // User type names; entries referencing them fail at decode time.
        let _ = read_prefixed_utf8(&mut cursor)?;
    }

    // "PAD" bytes align the hash table to an 8-byte boundary.
    let misalign = cursor.position() & 7;
    if misalign != 0 {
        cursor.set_position(cursor.position() + (8 - misalign));
    }

    // Hash table is only needed for runtime lookups; we iterate every entry.
    for _ in 0..resource_count {
        let _ = cursor.read_u32::<LittleEndian>()?;
    }
    let mut name_positions = Vec::with_capacity(resource_count);
    for _ in 0..resource_count {
        name_positions.push(cursor.read_u32::<LittleEndian>()?);
    }

    let data_section = u64::from(cursor.read_u32::<LittleEndian>()?);
    let name_section = cursor.position();
    if data_section < name_section || data_section > body.len() as u64 {
        return Err(Error::InvalidBundleLayout(format!(
            "data section offset {data_section} outside bundle"
        )));
    }

    // Positions are hash-sorted on disk; reading them in ascending file
    // order restores the writer's insertion order.
    name_positions.sort_unstable();

    let mut set = ResourceSet::new();
    for position in name_positions {
        cursor.set_position(name_section + u64::from(position));
        let name = read_prefixed_utf16(&mut cursor)?;
        let data_offset = cursor.read_u32::<LittleEndian>()?;

        cursor.set_position(data_section + u64::from(data_offset));
        let code_raw = read_7bit_len(&mut cursor)?;
        let code = u8::try_from(code_raw).map_err(|_| Error::UnsupportedTypeCode {
            code: 0xFF,
            key: name.clone(),
        })?;
        let value = ResourceValue::decode(code, &mut cursor, &name)?;
        set.insert(name, value);
    }

    if set.len() != resource_count {
        return Err(Error::InvalidBundleLayout(format!(
            "bundle declared {resource_count} resources but {} were read",
            set.len()
        )));
    }

    Ok(set)
}

fn peek(cursor: &Cursor<&[u8]>) -> Option<u8> {
    let pos = usize::try_from(cursor.position()).ok()?;
    cursor.get_ref().get(pos).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::writer::write_bundle;

    #[test]
    fn rejects_garbage() {
        let err = read_bundle(&[0u8; 16]).unwrap_err();
        assert!(matches!(err, Error::InvalidBundleMagic { found: 0 }));
    }

    #[test]
    fn rejects_truncated_input() {
        let err = read_bundle(&[0xCE, 0xCA]).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof));
    }

    #[test]
    fn rejects_version_1_reader_bundles() {
        let mut set = ResourceSet::new();
        set.insert("resources/icons/a.png", ResourceValue::Stream(vec![1]));
        let mut bytes = write_bundle(&set).unwrap();

        // The reader version sits right after the manager header, whose
        // length is the u32 at offset 8.
        let header_size = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;
        let at = 12 + header_size;
        bytes[at..at + 4].copy_from_slice(&1u32.to_le_bytes());

        let err = read_bundle(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedBundleVersion { version: 1 }
        ));
    }

    #[test]
    fn reads_embedded_form_with_length_prefix() {
        let mut set = ResourceSet::new();
        set.insert("resources/icons/a.png", ResourceValue::Stream(vec![1, 2, 3]));
        let body = write_bundle(&set).unwrap();

        let mut embedded = Vec::with_capacity(body.len() + 4);
        embedded.extend_from_slice(&u32::try_from(body.len()).unwrap().to_le_bytes());
        embedded.extend_from_slice(&body);

        let reread = read_bundle(&embedded).unwrap();
        assert_eq!(reread, set);
    }
}
