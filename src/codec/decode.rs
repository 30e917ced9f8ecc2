//! BinON decoding: bytes → `Object`.

use std::borrow::Cow;

use bytes::Buf;

use super::codebyte::{CodeByte, base};
use super::{check_null_run, ensure_remaining, varint};
use crate::error::BinonError;
use crate::types::{Dict, IntVal, Object, StrictDict, StrictKeyDict, StrictList, UIntVal};

/// Default limit on container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default limit on any declared element or byte count (64 MiB).
pub const DEFAULT_MAX_LEN: usize = 64 * 1024 * 1024;

/// Decoder with limits for untrusted input.
///
/// ```
/// use binon::codec::Decoder;
///
/// let decoder = Decoder::new().max_depth(16).max_len(4096);
/// let mut input = &[0x81u8, 0x02, b'o', b'k'][..];
/// let obj = decoder.decode(&mut input).unwrap();
/// assert_eq!(obj.as_str(), Some("ok"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    max_depth: usize,
    max_len: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_len: DEFAULT_MAX_LEN,
        }
    }
}

/// Decodes a single object with the default limits.
pub fn decode_object(buf: &mut impl Buf) -> Result<Object, BinonError> {
    Decoder::default().decode(buf)
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum container nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the maximum declared length of any buffer, string or container.
    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = len;
        self
    }

    /// Decodes one self-terminating object, consuming exactly its bytes.
    pub fn decode(&self, buf: &mut impl Buf) -> Result<Object, BinonError> {
        self.decode_at(buf, 0)
    }

    fn decode_at(&self, buf: &mut impl Buf, depth: usize) -> Result<Object, BinonError> {
        let cb = CodeByte::read(buf)?;
        self.decode_tagged(buf, cb, depth)
    }

    /// Decodes the rest of an object whose code byte has already been read.
    fn decode_tagged(
        &self,
        buf: &mut impl Buf,
        cb: CodeByte,
        depth: usize,
    ) -> Result<Object, BinonError> {
        match cb.base_type() {
            base::TRUE => Ok(Object::Bool(true)),
            _ if cb.is_default() => default_for(cb),
            _ => self.decode_data(buf, cb.type_code(), depth),
        }
    }

    /// Decodes an untagged payload of the given kind.
    fn decode_data(
        &self,
        buf: &mut impl Buf,
        code: CodeByte,
        depth: usize,
    ) -> Result<Object, BinonError> {
        match code.base_type() {
            base::NULL => Ok(Object::Null),
            base::BOOL => {
                ensure_remaining(buf, 1)?;
                Ok(Object::Bool(buf.get_u8() != 0))
            }
            base::INT => Ok(Object::Int(IntVal::Scalar(varint::decode_int(buf)?))),
            base::UINT => Ok(Object::UInt(UIntVal::Scalar(varint::decode_uint(buf)?))),
            base::FLOAT64 => {
                ensure_remaining(buf, 8)?;
                Ok(Object::Float64(buf.get_f64()))
            }
            base::FLOAT32 => {
                ensure_remaining(buf, 4)?;
                Ok(Object::Float32(buf.get_f32()))
            }
            base::BUFFER => {
                let len = self.read_len(buf)?;
                Ok(Object::Buffer(read_bytes(buf, len)?))
            }
            base::STRING => {
                let len = self.read_len(buf)?;
                let s = String::from_utf8(read_bytes(buf, len)?)?;
                Ok(Object::String(Cow::Owned(s)))
            }
            base::LIST => {
                self.enter(depth)?;
                let len = self.read_len(buf)?;
                Ok(Object::List(self.decode_tagged_seq(buf, len, depth + 1)?))
            }
            base::DICT => {
                self.enter(depth)?;
                let len = self.read_len(buf)?;
                let keys = self.decode_tagged_seq(buf, len, depth + 1)?;
                let values = self.decode_tagged_seq(buf, len, depth + 1)?;
                Ok(Object::Dict(zip_dict(keys, values)?))
            }
            base::STRICT_LIST => {
                self.enter(depth)?;
                self.decode_strict_list(buf, depth + 1)
            }
            base::STRICT_KEY_DICT => {
                self.enter(depth)?;
                self.decode_strict_key_dict(buf, depth + 1)
            }
            base::STRICT_DICT => {
                self.enter(depth)?;
                self.decode_strict_dict(buf, depth + 1)
            }
            _ => Err(BinonError::BadCodeByte(code.as_byte())),
        }
    }

    fn enter(&self, depth: usize) -> Result<(), BinonError> {
        if depth >= self.max_depth {
            tracing::debug!(depth, limit = self.max_depth, "decode depth limit reached");
            return Err(BinonError::DepthLimit(self.max_depth));
        }
        Ok(())
    }

    fn read_len(&self, buf: &mut impl Buf) -> Result<usize, BinonError> {
        let len = varint::decode_uint(buf)?;
        if len > self.max_len as u64 {
            tracing::debug!(len, limit = self.max_len, "declared length over limit");
            return Err(BinonError::LengthLimit {
                len,
                limit: self.max_len,
            });
        }
        Ok(len as usize)
    }

    fn decode_tagged_seq(
        &self,
        buf: &mut impl Buf,
        len: usize,
        depth: usize,
    ) -> Result<Vec<Object>, BinonError> {
        let mut items = Vec::with_capacity(len.min(buf.remaining()));
        for _ in 0..len {
            items.push(self.decode_at(buf, depth)?);
        }
        Ok(items)
    }

    fn decode_strict_list(&self, buf: &mut impl Buf, depth: usize) -> Result<Object, BinonError> {
        let len = self.read_len(buf)?;
        if len == 0 {
            return Ok(Object::StrictList(StrictList::default()));
        }
        let code = read_declared_code(buf)?;
        check_null_run(code, len)?;
        let items = self.decode_packed(buf, code, len, depth)?;
        Ok(Object::StrictList(StrictList::from_parts(Some(code), items)))
    }

    fn decode_strict_key_dict(
        &self,
        buf: &mut impl Buf,
        depth: usize,
    ) -> Result<Object, BinonError> {
        let len = self.read_len(buf)?;
        if len == 0 {
            return Ok(Object::StrictKeyDict(StrictKeyDict::default()));
        }
        let key_code = read_declared_code(buf)?;
        check_null_run(key_code, len)?;
        let keys = self.decode_packed(buf, key_code, len, depth)?;
        let values = self.decode_tagged_seq(buf, len, depth)?;
        Ok(Object::StrictKeyDict(StrictKeyDict::from_parts(
            Some(key_code),
            zip_dict(keys, values)?,
        )))
    }

    fn decode_strict_dict(&self, buf: &mut impl Buf, depth: usize) -> Result<Object, BinonError> {
        let len = self.read_len(buf)?;
        if len == 0 {
            return Ok(Object::StrictDict(StrictDict::default()));
        }
        let key_code = read_declared_code(buf)?;
        check_null_run(key_code, len)?;
        let keys = self.decode_packed(buf, key_code, len, depth)?;
        let value_code = read_declared_code(buf)?;
        let values = self.decode_packed(buf, value_code, len, depth)?;
        Ok(Object::StrictDict(StrictDict::from_parts(
            Some(key_code),
            Some(value_code),
            zip_dict(keys, values)?,
        )))
    }

    /// Reads `len` untagged payloads of one kind; booleans are bit-packed.
    fn decode_packed(
        &self,
        buf: &mut impl Buf,
        code: CodeByte,
        len: usize,
        depth: usize,
    ) -> Result<Vec<Object>, BinonError> {
        if code == CodeByte::BOOL {
            let byte_len = len.div_ceil(8);
            ensure_remaining(buf, byte_len)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..byte_len {
                let byte = buf.get_u8();
                for bit in 0..8 {
                    if items.len() == len {
                        break;
                    }
                    items.push(Object::Bool(byte & (0x80 >> bit) != 0));
                }
            }
            return Ok(items);
        }
        let mut items = Vec::with_capacity(len.min(buf.remaining()));
        for _ in 0..len {
            items.push(self.decode_data(buf, code, depth)?);
        }
        Ok(items)
    }
}

/// Reads a strict container's declared element code.
fn read_declared_code(buf: &mut impl Buf) -> Result<CodeByte, BinonError> {
    let cb = CodeByte::read(buf)?;
    if cb.base_type() == base::TRUE {
        return Err(BinonError::BadCodeByte(cb.as_byte()));
    }
    Ok(cb.type_code())
}

fn read_bytes(buf: &mut impl Buf, len: usize) -> Result<Vec<u8>, BinonError> {
    ensure_remaining(buf, len)?;
    let mut data = vec![0u8; len];
    buf.copy_to_slice(&mut data);
    Ok(data)
}

fn zip_dict(keys: Vec<Object>, values: Vec<Object>) -> Result<Dict, BinonError> {
    let mut dict = Dict::with_capacity(keys.len());
    for (k, v) in keys.into_iter().zip(values) {
        if !k.is_container() && dict.contains_key(&k)? {
            return Err(BinonError::DuplicateKey(k.to_string()));
        }
        dict.insert(k, v)?;
    }
    Ok(dict)
}

/// The value a default-subtype code byte stands for.
fn default_for(cb: CodeByte) -> Result<Object, BinonError> {
    Ok(match cb.base_type() {
        base::NULL => Object::Null,
        base::BOOL => Object::Bool(false),
        base::INT => Object::Int(IntVal::default()),
        base::UINT => Object::UInt(UIntVal::default()),
        base::FLOAT64 => Object::Float64(0.0),
        base::FLOAT32 => Object::Float32(0.0),
        base::BUFFER => Object::Buffer(Vec::new()),
        base::STRING => Object::String(Cow::Borrowed("")),
        base::LIST => Object::List(Vec::new()),
        base::STRICT_LIST => Object::StrictList(StrictList::default()),
        base::DICT => Object::Dict(Dict::new()),
        base::STRICT_KEY_DICT => Object::StrictKeyDict(StrictKeyDict::default()),
        base::STRICT_DICT => Object::StrictDict(StrictDict::default()),
        _ => return Err(BinonError::BadCodeByte(cb.as_byte())),
    })
}
