//! Variable-length integer encoding shared by `Int` and `UInt`.
//!
//! The leading byte carries a length prefix, most-significant bit first:
//!
//! | Leading bits | Total bytes | Payload bits |
//! |--------------|-------------|--------------|
//! | `0_______`   | 1           | 7            |
//! | `10______`   | 2           | 14           |
//! | `110_____`   | 4           | 29           |
//! | `1110____`   | 8           | 60           |
//! | `0xF0`       | 9           | 64 (raw)     |
//!
//! Leading bytes of the form `1111___1` are reserved for integers wider than
//! 64 bits and are rejected.

use bytes::{Buf, BufMut};

use super::ensure_remaining;
use crate::error::BinonError;

/// Marker byte preceding a raw 64-bit value.
pub const MARKER_64: u8 = 0xF0;

const PREFIX_2: u16 = 0x8000;
const PREFIX_4: u32 = 0xC000_0000;
const PREFIX_8: u64 = 0xE000_0000_0000_0000;

const MASK_1: u64 = 0x7F;
const MASK_2: u64 = 0x3FFF;
const MASK_4: u64 = 0x1FFF_FFFF;
const MASK_8: u64 = 0x0FFF_FFFF_FFFF_FFFF;

/// Encodes an unsigned integer in the smallest bracket that fits.
pub fn encode_uint(buf: &mut impl BufMut, value: u64) {
    if value < 0x80 {
        buf.put_u8(value as u8);
    } else if value < 0x4000 {
        buf.put_u16(PREFIX_2 | value as u16);
    } else if value < 0x2000_0000 {
        buf.put_u32(PREFIX_4 | value as u32);
    } else if value < 0x1000_0000_0000_0000 {
        buf.put_u64(PREFIX_8 | value);
    } else {
        buf.put_u8(MARKER_64);
        buf.put_u64(value);
    }
}

/// Encodes a signed integer in the smallest symmetric two's-complement window.
pub fn encode_int(buf: &mut impl BufMut, value: i64) {
    if (-0x40..0x40).contains(&value) {
        buf.put_u8((value as u64 & MASK_1) as u8);
    } else if (-0x2000..0x2000).contains(&value) {
        buf.put_u16(PREFIX_2 | (value as u64 & MASK_2) as u16);
    } else if (-0x1000_0000..0x1000_0000).contains(&value) {
        buf.put_u32(PREFIX_4 | (value as u64 & MASK_4) as u32);
    } else if (-0x0800_0000_0000_0000..0x0800_0000_0000_0000).contains(&value) {
        buf.put_u64(PREFIX_8 | (value as u64 & MASK_8));
    } else {
        buf.put_u8(MARKER_64);
        buf.put_i64(value);
    }
}

/// Number of bytes `encode_uint` writes for `value`.
pub fn uint_len(value: u64) -> usize {
    match value {
        0..0x80 => 1,
        0x80..0x4000 => 2,
        0x4000..0x2000_0000 => 4,
        0x2000_0000..0x1000_0000_0000_0000 => 8,
        _ => 9,
    }
}

/// A decoded varint before sign interpretation.
struct Raw {
    value: u64,
    /// Sign-bit mask of the bracket, or `None` for the raw 64-bit form.
    sign_bit: Option<u64>,
}

fn decode_raw(buf: &mut impl Buf) -> Result<Raw, BinonError> {
    ensure_remaining(buf, 1)?;
    let b0 = buf.get_u8();
    if b0 & 0x80 == 0 {
        return Ok(Raw {
            value: u64::from(b0) & MASK_1,
            sign_bit: Some(0x40),
        });
    }
    if b0 & 0x40 == 0 {
        ensure_remaining(buf, 1)?;
        let word = (u64::from(b0) << 8) | u64::from(buf.get_u8());
        return Ok(Raw {
            value: word & MASK_2,
            sign_bit: Some(0x2000),
        });
    }
    if b0 & 0x20 == 0 {
        ensure_remaining(buf, 3)?;
        let word = (u64::from(b0) << 24) | buf.get_uint(3);
        return Ok(Raw {
            value: word & MASK_4,
            sign_bit: Some(0x1000_0000),
        });
    }
    if b0 & 0x10 == 0 {
        ensure_remaining(buf, 7)?;
        let word = (u64::from(b0) << 56) | buf.get_uint(7);
        return Ok(Raw {
            value: word & MASK_8,
            sign_bit: Some(0x0800_0000_0000_0000),
        });
    }
    if b0 & 0x01 == 0 {
        ensure_remaining(buf, 8)?;
        return Ok(Raw {
            value: buf.get_u64(),
            sign_bit: None,
        });
    }
    Err(BinonError::IntRange(format!(
        "leading byte 0x{b0:02X} is reserved for integers wider than 64 bits"
    )))
}

/// Decodes an unsigned varint.
pub fn decode_uint(buf: &mut impl Buf) -> Result<u64, BinonError> {
    decode_raw(buf).map(|raw| raw.value)
}

/// Decodes a signed varint, sign-extending from the bracket's top payload bit.
pub fn decode_int(buf: &mut impl Buf) -> Result<i64, BinonError> {
    let raw = decode_raw(buf)?;
    let value = match raw.sign_bit {
        Some(m) => sign_extend(raw.value, m),
        None => raw.value,
    };
    Ok(value as i64)
}

fn sign_extend(value: u64, sign_bit: u64) -> u64 {
    let low_mask = (sign_bit << 1) - 1;
    if value & sign_bit != 0 {
        value | !low_mask
    } else {
        value & low_mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint_bytes(v: u64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_uint(&mut out, v);
        out
    }

    fn int_bytes(v: i64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_int(&mut out, v);
        out
    }

    #[test]
    fn uint_brackets() {
        assert_eq!(uint_bytes(0), vec![0x00]);
        assert_eq!(uint_bytes(127), vec![0x7F]);
        assert_eq!(uint_bytes(128), vec![0x80, 0x80]);
        assert_eq!(uint_bytes(0x3FFF), vec![0xBF, 0xFF]);
        assert_eq!(uint_bytes(0x4000), vec![0xC0, 0x00, 0x40, 0x00]);
        assert_eq!(uint_bytes(0x1FFF_FFFF).len(), 4);
        assert_eq!(uint_bytes(0x2000_0000).len(), 8);
        assert_eq!(uint_bytes(0x0FFF_FFFF_FFFF_FFFF).len(), 8);
        assert_eq!(
            uint_bytes(0x1000_0000_0000_0000),
            vec![0xF0, 0x10, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(uint_bytes(u64::MAX)[0], MARKER_64);
    }

    #[test]
    fn uint_len_matches_encoding() {
        for v in [0, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1FFF_FFFF, 0x2000_0000, u64::MAX] {
            assert_eq!(uint_len(v), uint_bytes(v).len(), "failed for {v:#x}");
        }
    }

    #[test]
    fn int_brackets() {
        assert_eq!(int_bytes(0), vec![0x00]);
        assert_eq!(int_bytes(-1), vec![0x7F]);
        assert_eq!(int_bytes(0x3F), vec![0x3F]);
        assert_eq!(int_bytes(-64), vec![0x40]);
        assert_eq!(int_bytes(0x40), vec![0x80, 0x40]);
        assert_eq!(int_bytes(-65), vec![0xBF, 0xBF]);
        assert_eq!(int_bytes(0x1FFF).len(), 2);
        assert_eq!(int_bytes(0x2000).len(), 4);
        assert_eq!(int_bytes(-0x2000).len(), 2);
        assert_eq!(int_bytes(0x0FFF_FFFF).len(), 4);
        assert_eq!(int_bytes(0x1000_0000).len(), 8);
        assert_eq!(int_bytes(0x07FF_FFFF_FFFF_FFFF).len(), 8);
        assert_eq!(int_bytes(0x0800_0000_0000_0000).len(), 9);
        assert_eq!(int_bytes(-0x0800_0000_0000_0000).len(), 8);
        assert_eq!(int_bytes(-0x0800_0000_0000_0001).len(), 9);
    }

    #[test]
    fn round_trip_uint_boundaries() {
        for v in [
            0,
            0x7F,
            0x80,
            0x3FFF,
            0x4000,
            0x1FFF_FFFF,
            0x2000_0000,
            0x0FFF_FFFF_FFFF_FFFF,
            0x1000_0000_0000_0000,
            u64::MAX,
        ] {
            let bytes = uint_bytes(v);
            let mut cursor = &bytes[..];
            assert_eq!(decode_uint(&mut cursor).unwrap(), v, "failed for {v:#x}");
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn round_trip_int_boundaries() {
        for v in [
            0,
            1,
            -1,
            0x3F,
            0x40,
            -0x40,
            -0x41,
            0x1FFF,
            0x2000,
            -0x2000,
            -0x2001,
            0x0FFF_FFFF,
            0x1000_0000,
            -0x1000_0000,
            -0x1000_0001,
            0x07FF_FFFF_FFFF_FFFF,
            0x0800_0000_0000_0000,
            -0x0800_0000_0000_0000,
            -0x0800_0000_0000_0001,
            i64::MAX,
            i64::MIN,
        ] {
            let bytes = int_bytes(v);
            let mut cursor = &bytes[..];
            assert_eq!(decode_int(&mut cursor).unwrap(), v, "failed for {v:#x}");
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn reserved_big_int_prefix_is_range_error() {
        let mut cursor = &[0xF1u8, 0, 0, 0, 0, 0, 0, 0, 0][..];
        assert!(matches!(
            decode_uint(&mut cursor),
            Err(BinonError::IntRange(_))
        ));
        let mut cursor = &[0xFFu8][..];
        assert!(matches!(decode_int(&mut cursor), Err(BinonError::IntRange(_))));
    }

    #[test]
    fn even_f_prefixes_read_raw_64_bits() {
        for b0 in [0xF2u8, 0xF8, 0xFE] {
            let mut bytes = vec![b0];
            bytes.extend_from_slice(&0x0123_4567_89AB_CDEFu64.to_be_bytes());
            let mut cursor = &bytes[..];
            assert_eq!(decode_uint(&mut cursor).unwrap(), 0x0123_4567_89AB_CDEF);
            assert!(cursor.is_empty());
        }
        let mut bytes = vec![0xF4u8];
        bytes.extend_from_slice(&(-2i64).to_be_bytes());
        assert_eq!(decode_int(&mut &bytes[..]).unwrap(), -2);
    }

    #[test]
    fn short_input_is_eof() {
        let mut cursor = &[0xC0u8, 0x00][..];
        let err = decode_uint(&mut cursor).unwrap_err();
        assert!(err.is_incomplete(), "got {err}");
    }
}
