//! Typed resource payloads.
//!
//! Every entry in a `.resources` bundle carries a type code followed by the
//! encoded value. The built-in codes cover strings, the CLR primitive
//! scalars, and the two raw-byte shapes (`ByteArray`, `Stream`). User types
//! (codes 0x40 and above) require a serialized type table and are rejected.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

use super::io::{read_7bit_len, write_7bit_len};

/// One decoded resource payload.
///
/// Scalar variants exist so that non-icon entries survive a load/merge/save
/// cycle byte-for-byte; the merge and projection layers only ever substitute
/// `Stream` and `ByteArray` payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceValue {
    /// Null payload (type code 0x00), no data bytes.
    Null,
    /// UTF-8 string with a 7-bit encoded byte-length prefix (0x01).
    String(String),
    /// Boolean, single byte, zero = false (0x02).
    Boolean(bool),
    /// Single UTF-16 code unit (0x03).
    Char(u16),
    /// Unsigned 8-bit integer (0x04).
    Byte(u8),
    /// Signed 8-bit integer (0x05).
    SByte(i8),
    /// Signed 16-bit integer, little-endian (0x06).
    Int16(i16),
    /// Unsigned 16-bit integer, little-endian (0x07).
    UInt16(u16),
    /// Signed 32-bit integer, little-endian (0x08).
    Int32(i32),
    /// Unsigned 32-bit integer, little-endian (0x09).
    UInt32(u32),
    /// Signed 64-bit integer, little-endian (0x0A).
    Int64(i64),
    /// Unsigned 64-bit integer, little-endian (0x0B).
    UInt64(u64),
    /// 32-bit float, little-endian (0x0C).
    Single(f32),
    /// 64-bit float, little-endian (0x0D).
    Double(f64),
    /// CLR decimal as four little-endian i32 words (0x0E).
    Decimal {
        /// Low 32 bits of the mantissa.
        lo: i32,
        /// Middle 32 bits of the mantissa.
        mid: i32,
        /// High 32 bits of the mantissa.
        hi: i32,
        /// Sign and scale flags.
        flags: i32,
    },
    /// CLR `DateTime.ToBinary()` value (0x0F).
    DateTime(i64),
    /// CLR `TimeSpan` ticks (0x10).
    TimeSpan(i64),
    /// Raw bytes with a 4-byte little-endian length prefix (0x20).
    ByteArray(Vec<u8>),
    /// Same wire shape as `ByteArray`, different type code (0x21).
    ///
    /// WPF image assets (the icons this tool cares about) are streams.
    Stream(Vec<u8>),
}

impl ResourceValue {
    /// The wire type code for this payload.
    #[must_use]
    pub fn type_code(&self) -> u8 {
        match self {
            ResourceValue::Null => 0x00,
            ResourceValue::String(_) => 0x01,
            ResourceValue::Boolean(_) => 0x02,
            ResourceValue::Char(_) => 0x03,
            ResourceValue::Byte(_) => 0x04,
            ResourceValue::SByte(_) => 0x05,
            ResourceValue::Int16(_) => 0x06,
            ResourceValue::UInt16(_) => 0x07,
            ResourceValue::Int32(_) => 0x08,
            ResourceValue::UInt32(_) => 0x09,
            ResourceValue::Int64(_) => 0x0A,
            ResourceValue::UInt64(_) => 0x0B,
            ResourceValue::Single(_) => 0x0C,
            ResourceValue::Double(_) => 0x0D,
            ResourceValue::Decimal { .. } => 0x0E,
            ResourceValue::DateTime(_) => 0x0F,
            ResourceValue::TimeSpan(_) => 0x10,
            ResourceValue::ByteArray(_) => 0x20,
            ResourceValue::Stream(_) => 0x21,
        }
    }

    /// The raw bytes of a `Stream` or `ByteArray` payload.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ResourceValue::ByteArray(data) | ResourceValue::Stream(data) => Some(data),
            _ => None,
        }
    }

    /// Decodes a payload from the data section, given its type code.
    ///
    /// `key` is only used to label errors.
    pub fn decode(code: u8, cursor: &mut Cursor<&[u8]>, key: &str) -> Result<Self> {
        let value = match code {
            0x00 => ResourceValue::Null,
            0x01 => {
                let len = read_7bit_len(cursor)?;
                let mut buf = vec![0u8; len];
                cursor.read_exact(&mut buf).map_err(|_| Error::UnexpectedEof)?;
                ResourceValue::String(String::from_utf8(buf)?)
            }
            0x02 => ResourceValue::Boolean(cursor.read_u8()? > 0),
            0x03 => ResourceValue::Char(cursor.read_u16::<LittleEndian>()?),
            0x04 => ResourceValue::Byte(cursor.read_u8()?),
            0x05 => ResourceValue::SByte(cursor.read_i8()?),
            0x06 => ResourceValue::Int16(cursor.read_i16::<LittleEndian>()?),
            0x07 => ResourceValue::UInt16(cursor.read_u16::<LittleEndian>()?),
            0x08 => ResourceValue::Int32(cursor.read_i32::<LittleEndian>()?),
            0x09 => ResourceValue::UInt32(cursor.read_u32::<LittleEndian>()?),
            0x0A => ResourceValue::Int64(cursor.read_i64::<LittleEndian>()?),
            0x0B => ResourceValue::UInt64(cursor.read_u64::<LittleEndian>()?),
            0x0C => ResourceValue::Single(cursor.read_f32::<LittleEndian>()?),
            0x0D => ResourceValue::Double(cursor.read_f64::<LittleEndian>()?),
            0x0E => ResourceValue::Decimal {
                lo: cursor.read_i32::<LittleEndian>()?,
                mid: cursor.read_i32::<LittleEndian>()?,
                hi: cursor.read_i32::<LittleEndian>()?,
                flags: cursor.read_i32::<LittleEndian>()?,
            },
            0x0F => ResourceValue::DateTime(cursor.read_i64::<LittleEndian>()?),
            0x10 => ResourceValue::TimeSpan(cursor.read_i64::<LittleEndian>()?),
            0x20 | 0x21 => {
                let len = cursor.read_u32::<LittleEndian>()? as usize;
                let mut buf = vec![0u8; len];
                cursor.read_exact(&mut buf).map_err(|_| Error::UnexpectedEof)?;
                if code == 0x20 {
                    ResourceValue::ByteArray(buf)
                } else {
                    ResourceValue::Stream(buf)
                }
            }
            other => {
                return Err(Error::UnsupportedTypeCode {
                    code: other,
                    key: key.to_string(),
                })
            }
        };
        Ok(value)
    }

    /// Encodes the payload, type code included, onto `out`.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        // Type codes are written as 7-bit encoded ints; every built-in code
        // fits in one byte.
        out.write_u8(self.type_code())?;
        match self {
            ResourceValue::Null => {}
            ResourceValue::String(s) => {
                write_7bit_len(out, s.len())?;
                out.write_all(s.as_bytes())?;
            }
            ResourceValue::Boolean(b) => out.write_u8(u8::from(*b))?,
            ResourceValue::Char(c) => out.write_u16::<LittleEndian>(*c)?,
            ResourceValue::Byte(v) => out.write_u8(*v)?,
            ResourceValue::SByte(v) => out.write_i8(*v)?,
            ResourceValue::Int16(v) => out.write_i16::<LittleEndian>(*v)?,
            ResourceValue::UInt16(v) => out.write_u16::<LittleEndian>(*v)?,
            ResourceValue::Int32(v) => out.write_i32::<LittleEndian>(*v)?,
            ResourceValue::UInt32(v) => out.write_u32::<LittleEndian>(*v)?,
            ResourceValue::Int64(v) => out.write_i64::<LittleEndian>(*v)?,
            ResourceValue::UInt64(v) => out.write_u64::<LittleEndian>(*v)?,
            ResourceValue::Single(v) => out.write_f32::<LittleEndian>(*v)?,
            ResourceValue::Double(v) => out.write_f64::<LittleEndian>(*v)?,
            ResourceValue::Decimal { lo, mid, hi, flags } => {
                out.write_i32::<LittleEndian>(*lo)?;
                out.write_i32::<LittleEndian>(*mid)?;
                out.write_i32::<LittleEndian>(*hi)?;
                out.write_i32::<LittleEndian>(*flags)?;
            }
            ResourceValue::DateTime(v) | ResourceValue::TimeSpan(v) => {
                out.write_i64::<LittleEndian>(*v)?;
            }
            ResourceValue::ByteArray(data) | ResourceValue::Stream(data) => {
                out.write_u32::<LittleEndian>(
                    u32::try_from(data.len())
                        .map_err(|_| Error::InvalidBundleLayout("payload too large".into()))?,
                )?;
                out.write_all(data)?;
            }
        }
        Ok(())
    }
}
