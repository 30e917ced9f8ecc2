//! BinON code byte: 4-bit base type + 4-bit subtype.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::BinonError;

/// Base-type nibbles (high 4 bits of a code byte).
pub mod base {
    pub const NULL: u8 = 0x0;
    pub const BOOL: u8 = 0x1;
    /// Reserved base for the literal `true`.
    pub const TRUE: u8 = 0x2;
    pub const INT: u8 = 0x3;
    pub const UINT: u8 = 0x4;
    pub const FLOAT64: u8 = 0x5;
    pub const FLOAT32: u8 = 0x6;
    pub const BUFFER: u8 = 0x7;
    pub const STRING: u8 = 0x8;
    pub const LIST: u8 = 0x9;
    pub const STRICT_LIST: u8 = 0xA;
    pub const DICT: u8 = 0xB;
    pub const STRICT_KEY_DICT: u8 = 0xC;
    pub const STRICT_DICT: u8 = 0xD;
}

/// Subtype meaning "default value, no payload follows".
pub const SUBTYPE_DEFAULT: u8 = 0x0;
/// Subtype meaning "payload follows".
pub const SUBTYPE_VALUE: u8 = 0x1;

/// A single type-identifying byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeByte(u8);

impl CodeByte {
    pub const NULL: Self = Self::new(base::NULL, SUBTYPE_VALUE);
    pub const BOOL: Self = Self::new(base::BOOL, SUBTYPE_VALUE);
    pub const TRUE: Self = Self::new(base::TRUE, SUBTYPE_VALUE);
    pub const INT: Self = Self::new(base::INT, SUBTYPE_VALUE);
    pub const UINT: Self = Self::new(base::UINT, SUBTYPE_VALUE);
    pub const FLOAT64: Self = Self::new(base::FLOAT64, SUBTYPE_VALUE);
    pub const FLOAT32: Self = Self::new(base::FLOAT32, SUBTYPE_VALUE);
    pub const BUFFER: Self = Self::new(base::BUFFER, SUBTYPE_VALUE);
    pub const STRING: Self = Self::new(base::STRING, SUBTYPE_VALUE);
    pub const LIST: Self = Self::new(base::LIST, SUBTYPE_VALUE);
    pub const STRICT_LIST: Self = Self::new(base::STRICT_LIST, SUBTYPE_VALUE);
    pub const DICT: Self = Self::new(base::DICT, SUBTYPE_VALUE);
    pub const STRICT_KEY_DICT: Self = Self::new(base::STRICT_KEY_DICT, SUBTYPE_VALUE);
    pub const STRICT_DICT: Self = Self::new(base::STRICT_DICT, SUBTYPE_VALUE);

    /// Builds a code byte from its two nibbles.
    pub const fn new(base_type: u8, subtype: u8) -> Self {
        Self((base_type << 4) | (subtype & 0x0F))
    }

    /// Wraps a raw byte without validating it.
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub const fn as_byte(self) -> u8 {
        self.0
    }

    pub const fn base_type(self) -> u8 {
        self.0 >> 4
    }

    pub const fn subtype(self) -> u8 {
        self.0 & 0x0F
    }

    /// Normalizes a default-subtype byte up to subtype 1 for identity comparisons.
    pub const fn type_code(self) -> Self {
        if self.subtype() == SUBTYPE_DEFAULT {
            Self::new(self.base_type(), SUBTYPE_VALUE)
        } else {
            self
        }
    }

    /// The same base type with the default subtype.
    pub const fn to_default(self) -> Self {
        Self::new(self.base_type(), SUBTYPE_DEFAULT)
    }

    pub const fn is_default(self) -> bool {
        self.subtype() == SUBTYPE_DEFAULT
    }

    /// Returns `true` if the byte names a known base type with a known subtype.
    pub const fn is_valid(self) -> bool {
        self.base_type() <= base::STRICT_DICT && self.subtype() <= SUBTYPE_VALUE
    }

    /// Reads and validates a code byte.
    pub fn read(buf: &mut impl Buf) -> Result<Self, BinonError> {
        if !buf.has_remaining() {
            return Err(BinonError::UnexpectedEof {
                needed: 1,
                remaining: 0,
            });
        }
        let cb = Self(buf.get_u8());
        if cb.is_valid() {
            Ok(cb)
        } else {
            Err(BinonError::BadCodeByte(cb.0))
        }
    }

    pub fn write(self, buf: &mut impl BufMut) {
        buf.put_u8(self.0);
    }

    /// Short kind name for diagnostics.
    pub fn name(self) -> &'static str {
        match self.base_type() {
            base::NULL => "Null",
            base::BOOL => "Bool",
            base::TRUE => "True",
            base::INT => "Int",
            base::UINT => "UInt",
            base::FLOAT64 => "Float64",
            base::FLOAT32 => "Float32",
            base::BUFFER => "Buffer",
            base::STRING => "String",
            base::LIST => "List",
            base::STRICT_LIST => "StrictList",
            base::DICT => "Dict",
            base::STRICT_KEY_DICT => "StrictKeyDict",
            base::STRICT_DICT => "StrictDict",
            _ => "Unknown",
        }
    }

    /// Returns `true` for the list and dict families.
    pub const fn is_container(self) -> bool {
        self.base_type() >= base::LIST && self.base_type() <= base::STRICT_DICT
    }
}

impl fmt::Display for CodeByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.0)
    }
}
