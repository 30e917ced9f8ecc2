//! Object hashing: boost-style combining with a process-wide salt.
//!
//! The salt is drawn once, lazily, on first use and is read-only afterwards.
//! It never influences encoded bytes.

use std::hash::{BuildHasher, DefaultHasher, Hash, Hasher};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Object;

/// Golden-ratio constant sized to the platform word.
const GOLDEN_RATIO: u64 = if usize::BITS == 64 {
    0x9E37_79B9_7F4A_7C15
} else {
    0x9E37_79B9
};

static SALT: OnceLock<u64> = OnceLock::new();

/// Returns the process-wide hash salt, generating it on first call.
pub fn salt() -> u64 {
    *SALT.get_or_init(seed_salt)
}

fn seed_salt() -> u64 {
    salt_from(getrandom::u64())
}

/// Uses OS entropy when available, otherwise a clock-seeded SplitMix64 draw.
fn salt_from(entropy: Result<u64, getrandom::Error>) -> u64 {
    match entropy {
        Ok(seed) => {
            tracing::debug!("hash salt seeded from system entropy");
            seed
        }
        Err(err) => {
            tracing::warn!(%err, "system entropy unavailable, seeding hash salt from clock");
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default();
            splitmix64(nanos)
        }
    }
}

/// One step of the SplitMix64 generator.
fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Mixes `b` into `a`: `a ^ (b + K + (a << 6) + (a >> 2))`.
pub fn combine(a: u64, b: u64) -> u64 {
    a ^ b
        .wrapping_add(GOLDEN_RATIO)
        .wrapping_add(a << 6)
        .wrapping_add(a >> 2)
}

fn hash_of(value: impl Hash) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Unsalted object hash: `combine(hash(type code), hash(payload))`.
pub(crate) fn raw_hash(obj: &Object) -> u64 {
    let code = hash_of(obj.type_code().as_byte());
    let payload = match obj {
        Object::Null => 0,
        Object::Bool(b) => hash_of(b),
        Object::Int(i) => hash_of(i),
        Object::UInt(u) => hash_of(u),
        Object::Float64(f) => hash_of(f.to_bits()),
        Object::Float32(f) => hash_of(f.to_bits()),
        Object::Buffer(b) => hash_of(b.as_slice()),
        Object::String(s) => hash_of(&**s),
        Object::List(items) => hash_seq(items),
        Object::StrictList(list) => hash_seq(list.items()),
        Object::Dict(dict) => hash_entries(dict),
        Object::StrictKeyDict(d) => hash_entries(d.dict()),
        Object::StrictDict(d) => hash_entries(d.dict()),
    };
    combine(code, payload)
}

fn hash_seq(items: &[Object]) -> u64 {
    items
        .iter()
        .fold(hash_of(items.len()), |acc, item| combine(acc, raw_hash(item)))
}

/// Order-independent: entries are summed so iteration order cannot matter.
fn hash_entries(dict: &crate::types::Dict) -> u64 {
    dict.iter().fold(hash_of(dict.len()), |acc, (k, v)| {
        acc.wrapping_add(combine(raw_hash(k), raw_hash(v)))
    })
}

/// Salted object hash.
pub fn hash_object(obj: &Object) -> u64 {
    raw_hash(obj) ^ salt()
}

/// `BuildHasher` for maps keyed by pre-hashed objects.
///
/// Object keys feed their full salted hash through `write_u64`, so the
/// hasher only needs to pass it through.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectHashBuilder;

impl BuildHasher for ObjectHashBuilder {
    type Hasher = PassThroughHasher;

    fn build_hasher(&self) -> Self::Hasher {
        PassThroughHasher(0)
    }
}

#[derive(Debug, Default)]
pub struct PassThroughHasher(u64);

impl Hasher for PassThroughHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = combine(self.0, u64::from(b));
        }
    }

    fn write_u64(&mut self, n: u64) {
        self.0 = combine(self.0, n);
    }
}
