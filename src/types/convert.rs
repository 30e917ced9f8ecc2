//! Conversions between native Rust types and `Object`.
//!
//! Types that match a kind's payload exactly (`bool`, `i64`, `u64`, `f64`,
//! `f32`, `String`, `Vec<u8>`, `Vec<Object>`, `Dict`) move in and out.
//! Narrower integers convert by range-checked cast.

use std::borrow::Cow;

use super::{Dict, IntVal, Object, StrictDict, StrictKeyDict, StrictList, UIntVal};
use crate::error::BinonError;

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Object {
            fn from(i: $t) -> Self {
                Self::Int(IntVal::Scalar(i64::from(i)))
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Object {
            fn from(u: $t) -> Self {
                Self::UInt(UIntVal::Scalar(u64::from(u)))
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<()> for Object {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<IntVal> for Object {
    fn from(i: IntVal) -> Self {
        Self::Int(i)
    }
}

impl From<UIntVal> for Object {
    fn from(u: UIntVal) -> Self {
        Self::UInt(u)
    }
}

impl From<f64> for Object {
    fn from(f: f64) -> Self {
        Self::Float64(f)
    }
}

impl From<f32> for Object {
    fn from(f: f32) -> Self {
        Self::Float32(f)
    }
}

impl From<&'static str> for Object {
    fn from(s: &'static str) -> Self {
        Self::String(Cow::Borrowed(s))
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Self::String(Cow::Owned(s))
    }
}

impl From<Vec<u8>> for Object {
    fn from(b: Vec<u8>) -> Self {
        Self::Buffer(b)
    }
}

impl From<&[u8]> for Object {
    fn from(b: &[u8]) -> Self {
        Self::Buffer(b.to_vec())
    }
}

impl From<Vec<Object>> for Object {
    fn from(v: Vec<Object>) -> Self {
        Self::List(v)
    }
}

impl From<Dict> for Object {
    fn from(d: Dict) -> Self {
        Self::Dict(d)
    }
}

impl From<StrictList> for Object {
    fn from(l: StrictList) -> Self {
        Self::StrictList(l)
    }
}

impl From<StrictKeyDict> for Object {
    fn from(d: StrictKeyDict) -> Self {
        Self::StrictKeyDict(d)
    }
}

impl From<StrictDict> for Object {
    fn from(d: StrictDict) -> Self {
        Self::StrictDict(d)
    }
}

impl<T: Into<Object>> From<Option<T>> for Object {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

// -- Object → native --

fn mismatch(expected: &'static str, obj: &Object) -> BinonError {
    BinonError::TypeMismatch {
        expected,
        actual: obj.type_code(),
    }
}

fn out_of_range(target: &'static str, obj: &Object) -> BinonError {
    BinonError::IntRange(format!("{obj} does not fit in {target}"))
}

impl TryFrom<&Object> for bool {
    type Error = BinonError;

    fn try_from(obj: &Object) -> Result<Self, BinonError> {
        obj.as_bool().ok_or_else(|| mismatch("Bool", obj))
    }
}

macro_rules! try_signed {
    ($($t:ty),*) => {$(
        impl TryFrom<&Object> for $t {
            type Error = BinonError;

            fn try_from(obj: &Object) -> Result<Self, BinonError> {
                match obj {
                    Object::Int(IntVal::Scalar(i)) => {
                        <$t>::try_from(*i).map_err(|_| out_of_range(stringify!($t), obj))
                    }
                    Object::Int(IntVal::Wide(_)) => Err(out_of_range(stringify!($t), obj)),
                    _ => Err(mismatch("Int", obj)),
                }
            }
        }
    )*};
}

macro_rules! try_unsigned {
    ($($t:ty),*) => {$(
        impl TryFrom<&Object> for $t {
            type Error = BinonError;

            fn try_from(obj: &Object) -> Result<Self, BinonError> {
                match obj {
                    Object::UInt(UIntVal::Scalar(u)) => {
                        <$t>::try_from(*u).map_err(|_| out_of_range(stringify!($t), obj))
                    }
                    Object::UInt(UIntVal::Wide(_)) => Err(out_of_range(stringify!($t), obj)),
                    _ => Err(mismatch("UInt", obj)),
                }
            }
        }
    )*};
}

try_signed!(i8, i16, i32, i64);
try_unsigned!(u8, u16, u32, u64);

impl TryFrom<&Object> for f64 {
    type Error = BinonError;

    fn try_from(obj: &Object) -> Result<Self, BinonError> {
        match obj {
            Object::Float64(f) => Ok(*f),
            Object::Float32(f) => Ok(f64::from(*f)),
            _ => Err(mismatch("Float64", obj)),
        }
    }
}

impl TryFrom<&Object> for f32 {
    type Error = BinonError;

    fn try_from(obj: &Object) -> Result<Self, BinonError> {
        obj.as_f32().ok_or_else(|| mismatch("Float32", obj))
    }
}

impl<'a> TryFrom<&'a Object> for &'a str {
    type Error = BinonError;

    fn try_from(obj: &'a Object) -> Result<Self, BinonError> {
        obj.as_str().ok_or_else(|| mismatch("String", obj))
    }
}

impl<'a> TryFrom<&'a Object> for &'a [u8] {
    type Error = BinonError;

    fn try_from(obj: &'a Object) -> Result<Self, BinonError> {
        obj.as_bytes().ok_or_else(|| mismatch("Buffer", obj))
    }
}

impl TryFrom<Object> for String {
    type Error = BinonError;

    fn try_from(obj: Object) -> Result<Self, BinonError> {
        match obj {
            Object::String(s) => Ok(s.into_owned()),
            other => Err(mismatch("String", &other)),
        }
    }
}

impl TryFrom<Object> for Vec<u8> {
    type Error = BinonError;

    fn try_from(obj: Object) -> Result<Self, BinonError> {
        match obj {
            Object::Buffer(b) => Ok(b),
            other => Err(mismatch("Buffer", &other)),
        }
    }
}

impl TryFrom<Object> for Vec<Object> {
    type Error = BinonError;

    fn try_from(obj: Object) -> Result<Self, BinonError> {
        match obj {
            Object::List(items) => Ok(items),
            Object::StrictList(list) => Ok(list.into_items()),
            other => Err(mismatch("List", &other)),
        }
    }
}

impl TryFrom<Object> for Dict {
    type Error = BinonError;

    fn try_from(obj: Object) -> Result<Self, BinonError> {
        match obj {
            Object::Dict(d) => Ok(d),
            Object::StrictKeyDict(d) => Ok(d.into_dict()),
            Object::StrictDict(d) => Ok(d.into_dict()),
            other => Err(mismatch("Dict", &other)),
        }
    }
}

impl Object {
    /// Reads the payload as a native type, failing on a kind or range mismatch.
    ///
    /// ```
    /// use binon::Object;
    ///
    /// let obj = Object::from(300u64);
    /// assert_eq!(obj.get::<u64>().unwrap(), 300);
    /// assert!(obj.get::<u8>().is_err());
    /// assert!(obj.get::<i64>().is_err());
    /// ```
    pub fn get<'a, T>(&'a self) -> Result<T, BinonError>
    where
        T: TryFrom<&'a Object, Error = BinonError>,
    {
        T::try_from(self)
    }

    /// Consumes the object, moving its payload out.
    pub fn take<T>(self) -> Result<T, BinonError>
    where
        T: TryFrom<Object, Error = BinonError>,
    {
        T::try_from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natives_map_to_kinds() {
        assert_eq!(Object::from(()), Object::Null);
        assert!(matches!(Object::from(-3i8), Object::Int(IntVal::Scalar(-3))));
        assert!(matches!(Object::from(3u16), Object::UInt(UIntVal::Scalar(3))));
        assert!(matches!(Object::from(1.5f32), Object::Float32(_)));
        assert!(matches!(Object::from(vec![1u8, 2]), Object::Buffer(_)));
        assert_eq!(Object::from(None::<i64>), Object::Null);
        assert_eq!(Object::from(Some("x")), Object::from("x"));
    }

    #[test]
    fn narrowing_is_range_checked() {
        let obj = Object::from(-200i64);
        assert_eq!(obj.get::<i16>().unwrap(), -200);
        assert!(matches!(obj.get::<i8>(), Err(BinonError::IntRange(_))));
    }

    #[test]
    fn wrong_kind_is_type_mismatch() {
        let obj = Object::from("text");
        match obj.get::<bool>() {
            Err(BinonError::TypeMismatch { expected, actual }) => {
                assert_eq!(expected, "Bool");
                assert_eq!(actual, crate::codec::CodeByte::STRING);
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn borrowed_access() {
        let obj = Object::from(String::from("owned"));
        let s: &str = obj.get().unwrap();
        assert_eq!(s, "owned");
    }

    #[test]
    fn owned_payloads_move_out() {
        let s: String = Object::from("moved").take().unwrap();
        assert_eq!(s, "moved");
        let items: Vec<Object> = Object::StrictList(StrictList::infer(vec![1i64.into()]))
            .take()
            .unwrap();
        assert_eq!(items, vec![Object::from(1i64)]);
        assert!(Object::Null.take::<Dict>().is_err());
    }

    #[test]
    fn float32_widens_to_f64() {
        assert_eq!(Object::from(0.5f32).get::<f64>().unwrap(), 0.5);
        assert!(Object::from(0.5f64).get::<f32>().is_err());
    }
}
