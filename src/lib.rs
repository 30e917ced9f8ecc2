//! BinON: a compact, self-describing binary serialization format.
//!
//! Every encoded value starts with a one-byte type tag (its code byte).
//! Values equal to their kind's default are written as the tag alone, and
//! the strict container kinds declare one element type up front so their
//! elements can be packed without per-element tags.
//!
//! # Architecture
//!
//! - **`codec`**: Code bytes, variable-length integers, encode/decode
//! - **`types`**: The `Object` value model, dictionaries and strict containers
//! - **`hash`**: Salted object hashing used by dictionary lookups
//! - **`stream`**: Reading and writing objects over async byte streams
//!
//! ```
//! use binon::{Dict, Object, codec};
//!
//! let mut dict = Dict::new();
//! dict.insert("name".into(), "binon".into()).unwrap();
//! dict.insert("version".into(), 2u64.into()).unwrap();
//!
//! let bytes = codec::to_bytes(&Object::Dict(dict.clone())).unwrap();
//! assert_eq!(codec::from_slice(&bytes).unwrap(), Object::Dict(dict));
//! ```

pub mod codec;
pub mod error;
pub mod hash;
pub mod stream;
pub mod types;

pub use codec::{CodeByte, Decoder, decode_object, encode_object};
pub use error::{BinonError, DecodeError, EncodeError};
pub use types::{Dict, IntVal, Object, StrictDict, StrictKeyDict, StrictList, UIntVal};
