//! Integer payloads: 64-bit scalars with an arbitrary-width byte-vector form.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A signed integer payload.
///
/// `from_be_bytes` holds values that fit in 64 bits as `Scalar` and keeps
/// `Wide` for minimal big-endian two's-complement vectors longer than 8
/// bytes. A `Wide` built by hand may be unnormalized; equality and hashing
/// compare the numeric value either way.
#[derive(Debug, Clone)]
pub enum IntVal {
    Scalar(i64),
    Wide(Vec<u8>),
}

/// An unsigned integer payload.
///
/// `Wide` holds a big-endian byte vector, minimal and longer than 8 bytes
/// when produced by `from_be_bytes`.
#[derive(Debug, Clone)]
pub enum UIntVal {
    Scalar(u64),
    Wide(Vec<u8>),
}

impl IntVal {
    /// Builds a signed integer from big-endian two's-complement bytes.
    ///
    /// Redundant sign extension is trimmed and anything that fits in 64 bits
    /// collapses to `Scalar`. An empty slice is zero.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let trimmed = trim_signed(bytes);
        if trimmed.len() <= 8 {
            let fill = if trimmed.first().is_some_and(|b| b & 0x80 != 0) {
                0xFF
            } else {
                0x00
            };
            let mut word = [fill; 8];
            word[8 - trimmed.len()..].copy_from_slice(trimmed);
            Self::Scalar(i64::from_be_bytes(word))
        } else {
            Self::Wide(trimmed.to_vec())
        }
    }

    /// Minimal big-endian two's-complement bytes (at least one byte).
    pub fn to_be_bytes(&self) -> Vec<u8> {
        match self {
            Self::Scalar(i) => trim_signed(&i.to_be_bytes()).to_vec(),
            Self::Wide(bytes) if bytes.is_empty() => vec![0x00],
            Self::Wide(bytes) => trim_signed(bytes).to_vec(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(i) => Some(*i),
            Self::Wide(bytes) => match Self::from_be_bytes(bytes) {
                Self::Scalar(i) => Some(i),
                Self::Wide(_) => None,
            },
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Scalar(i) => *i == 0,
            Self::Wide(bytes) => bytes.iter().all(|&b| b == 0),
        }
    }
}

impl UIntVal {
    /// Builds an unsigned integer from big-endian bytes, trimming leading zeros.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        let trimmed = &bytes[start..];
        if trimmed.len() <= 8 {
            let mut word = [0u8; 8];
            word[8 - trimmed.len()..].copy_from_slice(trimmed);
            Self::Scalar(u64::from_be_bytes(word))
        } else {
            Self::Wide(trimmed.to_vec())
        }
    }

    /// Minimal big-endian bytes (at least one byte).
    pub fn to_be_bytes(&self) -> Vec<u8> {
        match self {
            Self::Scalar(u) => {
                let bytes = u.to_be_bytes();
                let start = bytes.iter().position(|&b| b != 0).unwrap_or(7);
                bytes[start..].to_vec()
            }
            Self::Wide(bytes) => {
                let start = bytes
                    .iter()
                    .position(|&b| b != 0)
                    .unwrap_or(bytes.len().saturating_sub(1));
                match &bytes[start..] {
                    [] => vec![0x00],
                    trimmed => trimmed.to_vec(),
                }
            }
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Scalar(u) => Some(*u),
            Self::Wide(bytes) => match Self::from_be_bytes(bytes) {
                Self::Scalar(u) => Some(u),
                Self::Wide(_) => None,
            },
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Scalar(u) => *u == 0,
            Self::Wide(bytes) => bytes.iter().all(|&b| b == 0),
        }
    }
}

impl PartialEq for IntVal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            _ => self.to_be_bytes() == other.to_be_bytes(),
        }
    }
}

impl Eq for IntVal {}

impl Hash for IntVal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_be_bytes().hash(state);
    }
}

impl PartialEq for UIntVal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            _ => self.to_be_bytes() == other.to_be_bytes(),
        }
    }
}

impl Eq for UIntVal {}

impl Hash for UIntVal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_be_bytes().hash(state);
    }
}

/// Drops leading bytes that only repeat the sign of the byte after them.
fn trim_signed(bytes: &[u8]) -> &[u8] {
    let mut start = 0;
    while start + 1 < bytes.len() {
        let (b, next) = (bytes[start], bytes[start + 1]);
        let redundant = (b == 0x00 && next & 0x80 == 0) || (b == 0xFF && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    &bytes[start..]
}

impl Default for IntVal {
    fn default() -> Self {
        Self::Scalar(0)
    }
}

impl Default for UIntVal {
    fn default() -> Self {
        Self::Scalar(0)
    }
}

impl From<i64> for IntVal {
    fn from(i: i64) -> Self {
        Self::Scalar(i)
    }
}

impl From<u64> for UIntVal {
    fn from(u: u64) -> Self {
        Self::Scalar(u)
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    write!(f, "0x")?;
    for b in bytes {
        write!(f, "{b:02X}")?;
    }
    Ok(())
}

impl fmt::Display for IntVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(i) => write!(f, "{i}"),
            Self::Wide(bytes) => write_hex(f, bytes),
        }
    }
}

impl fmt::Display for UIntVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(u) => write!(f, "{u}"),
            Self::Wide(bytes) => write_hex(f, bytes),
        }
    }
}
