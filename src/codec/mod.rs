//! BinON wire codec.
//!
//! An encoded object is a code byte followed by a kind-specific payload,
//! nested recursively for containers. The grammar is self-terminating: there
//! is no framing, magic number or version byte. Multi-byte fields are
//! big-endian.

pub mod codebyte;
pub mod decode;
pub mod encode;
pub mod varint;

use bytes::{Buf, Bytes, BytesMut};

pub use codebyte::CodeByte;
pub use decode::{Decoder, decode_object};
pub use encode::encode_object;

use crate::error::BinonError;
use crate::types::Object;

/// Encodes an object into a fresh buffer.
pub fn to_bytes(obj: &Object) -> Result<Bytes, BinonError> {
    let mut buf = BytesMut::new();
    encode_object(&mut buf, obj)?;
    Ok(buf.freeze())
}

/// Decodes exactly one object from `data`, rejecting trailing bytes.
pub fn from_slice(data: &[u8]) -> Result<Object, BinonError> {
    let mut cursor = data;
    let obj = decode_object(&mut cursor)?;
    if !cursor.is_empty() {
        return Err(BinonError::TrailingBytes(cursor.len()));
    }
    Ok(obj)
}

pub(crate) fn ensure_remaining(buf: &impl Buf, needed: usize) -> Result<(), BinonError> {
    if buf.remaining() < needed {
        Err(BinonError::UnexpectedEof {
            needed,
            remaining: buf.remaining(),
        })
    } else {
        Ok(())
    }
}

/// Null payloads take no input, so a Null-declared strict list or key block
/// holds at most one element. Strict dict values are exempt: their count is
/// paid for by the keys.
pub(crate) fn check_null_run(code: CodeByte, len: usize) -> Result<(), BinonError> {
    if code == CodeByte::NULL && len > 1 {
        tracing::debug!(len, "rejecting Null-declared strict run");
        return Err(BinonError::NullRun(len));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dict;

    #[test]
    fn bytes_round_trip() {
        let obj = Object::List(vec![Object::from("x"), Object::from(9u8)]);
        let bytes = to_bytes(&obj).unwrap();
        assert_eq!(from_slice(&bytes).unwrap(), obj);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        assert!(matches!(
            from_slice(&[0x00, 0x00]),
            Err(BinonError::TrailingBytes(1))
        ));
    }

    #[test]
    fn encoding_is_deterministic_for_equal_construction() {
        let build = || {
            Object::Dict(
                Dict::from_entries([
                    (Object::from("k1"), Object::from(1.0f64)),
                    (Object::from("k2"), Object::Bool(true)),
                ])
                .unwrap(),
            )
        };
        assert_eq!(to_bytes(&build()).unwrap(), to_bytes(&build()).unwrap());
    }
}
