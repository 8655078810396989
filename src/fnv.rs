//! FNV hashing of raw byte sequences.
//!
//! This is the digest the table is keyed by: a 64-bit FNV-1 variant that
//! xors each byte into the state before multiplying by the FNV prime. It is
//! fast and deterministic, and deliberately non-cryptographic — the table
//! trusts it (together with the key length) as the key's identity.

/// The FNV-64 offset basis. Hashing an empty sequence yields this value.
pub const FNV_SEED: u64 = 0xcbf29ce484222325;

/// The FNV-64 prime.
pub const FNV_PRIME: u64 = 0x100000001b3;

#[inline(always)]
fn step(state: u64, byte: u8) -> u64 {
    (state ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
}

/// Hashes a byte sequence to a 64-bit digest.
///
/// Pure and deterministic: equal inputs always produce equal digests, and
/// there is no failure mode.
///
/// # Examples
///
/// ```rust
/// use robin_hash::fnv;
///
/// assert_eq!(fnv::hash(b""), fnv::FNV_SEED);
/// assert_eq!(fnv::hash(b"foobar"), fnv::hash("foobar".as_bytes()));
/// assert_ne!(fnv::hash(b"foo"), fnv::hash(b"bar"));
/// ```
#[inline]
#[must_use]
pub fn hash(bytes: &[u8]) -> u64 {
    let mut state = FNV_SEED;
    for &byte in bytes {
        state = step(state, byte);
    }
    state
}

/// A streaming [`core::hash::Hasher`] over the same digest as [`hash`].
///
/// Feeding bytes incrementally produces the identical result to hashing the
/// concatenated sequence in one call.
///
/// # Examples
///
/// ```rust
/// use core::hash::Hasher;
///
/// use robin_hash::fnv;
///
/// let mut hasher = fnv::Fnv::new();
/// hasher.write(b"foo");
/// hasher.write(b"bar");
/// assert_eq!(hasher.finish(), fnv::hash(b"foobar"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Fnv {
    state: u64,
}

impl Fnv {
    /// Creates a hasher seeded with the FNV offset basis.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Fnv { state: FNV_SEED }
    }
}

impl Default for Fnv {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::hash::Hasher for Fnv {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = step(self.state, byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use core::hash::Hasher;

    use super::*;

    #[test]
    fn empty_input_yields_seed() {
        assert_eq!(hash(b""), FNV_SEED);
    }

    #[test]
    fn known_answers() {
        // Reference vectors for the 64-bit xor-then-multiply FNV variant.
        assert_eq!(hash(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(hash(b"foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn streaming_matches_oneshot() {
        let mut hasher = Fnv::new();
        hasher.write(b"hello, ");
        hasher.write(b"world");
        assert_eq!(hasher.finish(), hash(b"hello, world"));
    }

    #[test]
    fn length_participates_in_identity() {
        // Prefix of a key hashes differently; the table additionally keys on
        // length, but the digest alone should already separate these.
        assert_ne!(hash(b"word"), hash(b"words"));
    }
}
