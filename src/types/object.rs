//! The BinON object model.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{Dict, IntVal, StrictDict, StrictKeyDict, StrictList, UIntVal};
use crate::codec::CodeByte;

/// A BinON value. Each variant exclusively owns its payload.
///
/// Strings may borrow a `'static` literal and are promoted to an owned
/// buffer on first mutable access.
#[derive(Debug, Clone, Default)]
pub enum Object {
    #[default]
    Null,
    Bool(bool),
    Int(IntVal),
    UInt(UIntVal),
    Float64(f64),
    Float32(f32),
    Buffer(Vec<u8>),
    String(Cow<'static, str>),
    List(Vec<Object>),
    StrictList(StrictList),
    Dict(Dict),
    StrictKeyDict(StrictKeyDict),
    StrictDict(StrictDict),
}

impl Object {
    /// Normalized type code identifying the object's kind.
    ///
    /// `Bool` reports the base Bool code whatever its value; the reserved
    /// `true` code only exists on the wire.
    pub fn type_code(&self) -> CodeByte {
        match self {
            Self::Null => CodeByte::NULL,
            Self::Bool(_) => CodeByte::BOOL,
            Self::Int(_) => CodeByte::INT,
            Self::UInt(_) => CodeByte::UINT,
            Self::Float64(_) => CodeByte::FLOAT64,
            Self::Float32(_) => CodeByte::FLOAT32,
            Self::Buffer(_) => CodeByte::BUFFER,
            Self::String(_) => CodeByte::STRING,
            Self::List(_) => CodeByte::LIST,
            Self::StrictList(_) => CodeByte::STRICT_LIST,
            Self::Dict(_) => CodeByte::DICT,
            Self::StrictKeyDict(_) => CodeByte::STRICT_KEY_DICT,
            Self::StrictDict(_) => CodeByte::STRICT_DICT,
        }
    }

    /// The tag byte written in front of this object.
    pub fn code_byte(&self) -> CodeByte {
        match self {
            Self::Bool(true) => CodeByte::TRUE,
            _ if self.has_def_val() => self.type_code().to_default(),
            _ => self.type_code(),
        }
    }

    /// Returns `true` if the object holds its kind's default value, in which
    /// case its payload is elided on the wire.
    pub fn has_def_val(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Int(i) => i.is_zero(),
            Self::UInt(u) => u.is_zero(),
            Self::Float64(f) => f.to_bits() == 0,
            Self::Float32(f) => f.to_bits() == 0,
            Self::Buffer(b) => b.is_empty(),
            Self::String(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::StrictList(list) => list.is_empty(),
            Self::Dict(dict) => dict.is_empty(),
            Self::StrictKeyDict(d) => d.is_empty(),
            Self::StrictDict(d) => d.is_empty(),
        }
    }

    /// Name of the object's kind, e.g. `"StrictList"`.
    pub fn kind(&self) -> &'static str {
        self.type_code().name()
    }

    /// Returns `true` for list and dict kinds, which cannot be dictionary keys.
    pub fn is_container(&self) -> bool {
        self.type_code().is_container()
    }

    /// Salted hash, stable for the lifetime of the process.
    pub fn hash_value(&self) -> u64 {
        crate::hash::hash_object(self)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => i.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(u) => u.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float32(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Buffer(b) => Some(b),
            _ => None,
        }
    }

    /// Elements of a `List` or `StrictList`.
    pub fn as_list(&self) -> Option<&[Object]> {
        match self {
            Self::List(items) => Some(items),
            Self::StrictList(list) => Some(list.items()),
            _ => None,
        }
    }

    /// Entries of any dict kind.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(dict) => Some(dict),
            Self::StrictKeyDict(d) => Some(d.dict()),
            Self::StrictDict(d) => Some(d.dict()),
            _ => None,
        }
    }

    /// Mutable string access; a borrowed string is copied into an owned one first.
    pub fn as_string_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::String(s) => Some(s.to_mut()),
            _ => None,
        }
    }

    pub fn as_bytes_mut(&mut self) -> Option<&mut Vec<u8>> {
        match self {
            Self::Buffer(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Object>> {
        match self {
            Self::List(items) => Some(items),
            Self::StrictList(list) => Some(list.items_mut()),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Self::Dict(dict) => Some(dict),
            Self::StrictKeyDict(d) => Some(d.dict_mut()),
            Self::StrictDict(d) => Some(d.dict_mut()),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so that `Eq` agrees with `Hash`.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::UInt(a), Self::UInt(b)) => a == b,
            (Self::Float64(a), Self::Float64(b)) => a.to_bits() == b.to_bits(),
            (Self::Float32(a), Self::Float32(b)) => a.to_bits() == b.to_bits(),
            (Self::Buffer(a), Self::Buffer(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::StrictList(a), Self::StrictList(b)) => a == b,
            (Self::Dict(a), Self::Dict(b)) => a == b,
            (Self::StrictKeyDict(a), Self::StrictKeyDict(b)) => a == b,
            (Self::StrictDict(a), Self::StrictDict(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Object {}

impl Hash for Object {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = &'a Object>,
) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

fn write_map(f: &mut fmt::Formatter<'_>, dict: &Dict) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (k, v)) in dict.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{k}: {v}")?;
    }
    write!(f, "}}")
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}u"),
            Self::Float64(v) => write!(f, "{v:?}"),
            Self::Float32(v) => write!(f, "{v:?}f"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Buffer(b) => write!(f, "<{} bytes>", b.len()),
            Self::List(items) => write_seq(f, items),
            Self::StrictList(list) => write_seq(f, list.items()),
            Self::Dict(dict) => write_map(f, dict),
            Self::StrictKeyDict(d) => write_map(f, d.dict()),
            Self::StrictDict(d) => write_map(f, d.dict()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_default_subtype() {
        assert_eq!(Object::Bool(false).code_byte().as_byte(), 0x10);
        assert_eq!(Object::Bool(true).code_byte(), CodeByte::TRUE);
        assert_eq!(Object::from(0i64).code_byte().as_byte(), 0x30);
        assert_eq!(Object::from(5i64).code_byte(), CodeByte::INT);
        assert_eq!(Object::from("").code_byte().as_byte(), 0x80);
        assert_eq!(Object::List(vec![]).code_byte().as_byte(), 0x90);
        assert_eq!(Object::Null.code_byte().as_byte(), 0x00);
    }

    #[test]
    fn kind_names() {
        assert_eq!(Object::Bool(true).kind(), "Bool");
        assert_eq!(Object::from(1.0f32).kind(), "Float32");
        assert_eq!(Object::StrictDict(StrictDict::default()).kind(), "StrictDict");
    }

    #[test]
    fn negative_zero_is_not_default() {
        assert!(Object::Float64(0.0).has_def_val());
        assert!(!Object::Float64(-0.0).has_def_val());
    }

    #[test]
    fn float_equality_by_bits() {
        assert_eq!(Object::Float64(f64::NAN), Object::Float64(f64::NAN));
        assert_ne!(Object::Float64(0.0), Object::Float64(-0.0));
    }

    #[test]
    fn int_and_uint_differ() {
        assert_ne!(Object::from(1i64), Object::from(1u64));
    }

    #[test]
    fn borrowed_string_promotes_on_mutation() {
        let mut obj = Object::from("abc");
        assert!(matches!(&obj, Object::String(Cow::Borrowed(_))));
        obj.as_string_mut().unwrap().push('d');
        assert!(matches!(&obj, Object::String(Cow::Owned(_))));
        assert_eq!(obj.as_str(), Some("abcd"));
    }

    #[test]
    fn display_nested() {
        let obj = Object::List(vec![
            Object::from(1i64),
            Object::from("two"),
            Object::Bool(true),
            Object::Null,
        ]);
        assert_eq!(obj.to_string(), r#"[1, "two", true, null]"#);
    }
}
