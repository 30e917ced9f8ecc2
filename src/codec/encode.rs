//! BinON encoding: `Object` → bytes.

use bytes::BufMut;

use super::{CodeByte, check_null_run, varint};
use crate::error::BinonError;
use crate::types::{Dict, IntVal, Object, StrictDict, StrictKeyDict, StrictList, UIntVal};

/// Encodes an object as its code byte followed by its payload.
///
/// Default values write only the code byte. On error the sink may hold a
/// partial encoding and should be discarded.
pub fn encode_object(buf: &mut impl BufMut, obj: &Object) -> Result<(), BinonError> {
    obj.code_byte().write(buf);
    if obj.has_def_val() || matches!(obj, Object::Bool(_)) {
        return Ok(());
    }
    encode_data(buf, obj)
}

/// Encodes an object's payload without its code byte.
///
/// This is the form packed inside strict containers, where no default
/// elision applies.
pub fn encode_data(buf: &mut impl BufMut, obj: &Object) -> Result<(), BinonError> {
    match obj {
        Object::Null => {}
        Object::Bool(b) => buf.put_u8(u8::from(*b)),
        Object::Int(i) => encode_int(buf, i)?,
        Object::UInt(u) => encode_uint(buf, u)?,
        Object::Float64(f) => buf.put_f64(*f),
        Object::Float32(f) => buf.put_f32(*f),
        Object::Buffer(b) => encode_bytes(buf, b),
        Object::String(s) => encode_bytes(buf, s.as_bytes()),
        Object::List(items) => encode_list(buf, items)?,
        Object::Dict(dict) => encode_dict(buf, dict)?,
        Object::StrictList(list) => encode_strict_list(buf, list)?,
        Object::StrictKeyDict(d) => encode_strict_key_dict(buf, d)?,
        Object::StrictDict(d) => encode_strict_dict(buf, d)?,
    }
    Ok(())
}

fn encode_int(buf: &mut impl BufMut, value: &IntVal) -> Result<(), BinonError> {
    let i = value.as_i64().ok_or_else(|| {
        BinonError::IntRange(format!("cannot encode {value}: wider than 64 bits"))
    })?;
    varint::encode_int(buf, i);
    Ok(())
}

fn encode_uint(buf: &mut impl BufMut, value: &UIntVal) -> Result<(), BinonError> {
    let u = value.as_u64().ok_or_else(|| {
        BinonError::IntRange(format!("cannot encode {value}: wider than 64 bits"))
    })?;
    varint::encode_uint(buf, u);
    Ok(())
}

fn encode_len(buf: &mut impl BufMut, len: usize) {
    varint::encode_uint(buf, len as u64);
}

/// Length-prefixed raw bytes (Buffer and String payloads).
fn encode_bytes(buf: &mut impl BufMut, value: &[u8]) {
    encode_len(buf, value.len());
    buf.put_slice(value);
}

pub fn encode_list(buf: &mut impl BufMut, items: &[Object]) -> Result<(), BinonError> {
    encode_len(buf, items.len());
    for item in items {
        encode_object(buf, item)?;
    }
    Ok(())
}

/// Writes the count, then every key fully tagged, then every value fully
/// tagged, both blocks in iteration order.
pub fn encode_dict(buf: &mut impl BufMut, dict: &Dict) -> Result<(), BinonError> {
    encode_len(buf, dict.len());
    for key in dict.keys() {
        encode_object(buf, key)?;
    }
    for value in dict.values() {
        encode_object(buf, value)?;
    }
    Ok(())
}

// -- Strict containers --

fn encode_strict_list(buf: &mut impl BufMut, list: &StrictList) -> Result<(), BinonError> {
    encode_len(buf, list.len());
    if list.is_empty() {
        return Ok(());
    }
    let code = declared(list.elem_code(), list.len())?;
    check_null_run(code, list.len())?;
    check_types(code, list.items())?;
    code.write(buf);
    encode_packed(buf, code, list.items())
}

fn encode_strict_key_dict(buf: &mut impl BufMut, d: &StrictKeyDict) -> Result<(), BinonError> {
    encode_len(buf, d.len());
    if d.is_empty() {
        return Ok(());
    }
    let key_code = declared(d.key_code(), d.len())?;
    check_types(key_code, d.dict().keys())?;
    key_code.write(buf);
    encode_packed(buf, key_code, d.dict().keys())?;
    for value in d.dict().values() {
        encode_object(buf, value)?;
    }
    Ok(())
}

fn encode_strict_dict(buf: &mut impl BufMut, d: &StrictDict) -> Result<(), BinonError> {
    encode_len(buf, d.len());
    if d.is_empty() {
        return Ok(());
    }
    let key_code = declared(d.key_code(), d.len())?;
    let value_code = declared(d.value_code(), d.len())?;
    check_types(key_code, d.dict().keys())?;
    check_types(value_code, d.dict().values())?;
    key_code.write(buf);
    encode_packed(buf, key_code, d.dict().keys())?;
    value_code.write(buf);
    encode_packed(buf, value_code, d.dict().values())
}

fn declared(code: Option<CodeByte>, len: usize) -> Result<CodeByte, BinonError> {
    code.ok_or(BinonError::MissingTypeCode(len))
}

/// Verifies every element presents the declared type code.
fn check_types<'a>(
    code: CodeByte,
    items: impl IntoIterator<Item = &'a Object>,
) -> Result<(), BinonError> {
    for (index, item) in items.into_iter().enumerate() {
        let actual = item.type_code();
        if actual != code {
            return Err(BinonError::BadElemType {
                expected: code,
                actual,
                index,
                value: item.to_string(),
            });
        }
    }
    Ok(())
}

/// Writes payloads back to back with no per-element tags.
///
/// Booleans pack 8 per byte, most significant bit first, with a short final
/// group zero-padded in its low bits.
fn encode_packed<'a>(
    buf: &mut impl BufMut,
    code: CodeByte,
    items: impl IntoIterator<Item = &'a Object>,
) -> Result<(), BinonError> {
    if code == CodeByte::BOOL {
        let mut byte = 0u8;
        let mut bits = 0;
        for item in items {
            if item.as_bool() == Some(true) {
                byte |= 0x80 >> bits;
            }
            bits += 1;
            if bits == 8 {
                buf.put_u8(byte);
                byte = 0;
                bits = 0;
            }
        }
        if bits > 0 {
            buf.put_u8(byte);
        }
        return Ok(());
    }
    for item in items {
        encode_data(buf, item)?;
    }
    Ok(())
}
