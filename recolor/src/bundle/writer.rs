//! Serializing a [`ResourceSet`] back into `.resources` form.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::set::ResourceSet;

use super::io::{name_hash, write_prefixed_utf16, write_prefixed_utf8};
use super::{READER_TYPE_NAME, RESOURCE_MAGIC, RESOURCE_SET_TYPE_NAME};

/// Serializes the set as a standalone bundle (magic at offset zero).
///
/// Name and data sections follow the set's insertion order; the hash table is
/// sorted ascending with its position column coupled, as the runtime's
/// binary-search lookup requires. Output is deterministic for a given set.
pub fn write_bundle(set: &ResourceSet) -> Result<Vec<u8>> {
    let mut name_section: Vec<u8> = Vec::new();
    let mut data_section: Vec<u8> = Vec::new();
    let mut lookup: Vec<(u32, u32)> = Vec::with_capacity(set.len());

    for (key, value) in set.iter() {
        let data_offset = to_u32(data_section.len())?;
        let name_position = to_u32(name_section.len())?;
        value.encode(&mut data_section)?;
        write_prefixed_utf16(&mut name_section, key)?;
        name_section.write_u32::<LittleEndian>(data_offset)?;
        lookup.push((name_hash(key), name_position));
    }
    lookup.sort_unstable();

    let mut header_types: Vec<u8> = Vec::new();
    write_prefixed_utf8(&mut header_types, READER_TYPE_NAME)?;
    write_prefixed_utf8(&mut header_types, RESOURCE_SET_TYPE_NAME)?;

    let mut out: Vec<u8> = Vec::new();
    out.write_u32::<LittleEndian>(RESOURCE_MAGIC)?;
    out.write_u32::<LittleEndian>(1)?; // resource manager header version
    out.write_u32::<LittleEndian>(to_u32(header_types.len())?)?;
    out.extend_from_slice(&header_types);

    out.write_u32::<LittleEndian>(2)?; // runtime resource reader version
    out.write_u32::<LittleEndian>(to_u32(set.len())?)?;
    out.write_u32::<LittleEndian>(0)?; // no user types in the type table

    // Align the hash table to 8 bytes with the runtime's PAD filler.
    const PAD: &[u8; 3] = b"PAD";
    let mut filler = 0;
    while (out.len() & 7) != 0 {
        out.push(PAD[filler % 3]);
        filler += 1;
    }

    for (hash, _) in &lookup {
        out.write_u32::<LittleEndian>(*hash)?;
    }
    for (_, position) in &lookup {
        out.write_u32::<LittleEndian>(*position)?;
    }

    let data_section_offset = to_u32(out.len() + 4 + name_section.len())?;
    out.write_u32::<LittleEndian>(data_section_offset)?;
    out.extend_from_slice(&name_section);
    out.extend_from_slice(&data_section);

    Ok(out)
}

fn to_u32(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::InvalidBundleLayout("section exceeds 4 GiB".into()))
}
