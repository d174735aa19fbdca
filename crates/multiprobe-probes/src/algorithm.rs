//! Supported algorithms and their probe adapter.

use std::fmt;
use std::str::FromStr;

use md4::Md4;
use md5::Md5;
use multiprobe_placement::{Probe, ProbeSet};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use sha3::Sha3_224;

use crate::error::ProbeError;

/// A checksum or digest usable as a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    /// IEEE CRC-32.
    Crc32,
    /// MD4.
    Md4,
    /// MD5.
    Md5,
    /// SHA-1.
    Sha1,
    /// SHA-256.
    Sha256,
    /// SHA-512.
    Sha512,
    /// SHA3-224.
    Sha3_224,
    /// BLAKE3.
    Blake3,
}

impl Algorithm {
    /// Every supported algorithm.
    pub const ALL: [Algorithm; 8] = [
        Algorithm::Crc32,
        Algorithm::Md4,
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Sha512,
        Algorithm::Sha3_224,
        Algorithm::Blake3,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Crc32 => "crc32",
            Algorithm::Md4 => "md4",
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
            Algorithm::Sha3_224 => "sha3-224",
            Algorithm::Blake3 => "blake3",
        }
    }

    /// Score `input`.
    ///
    /// CRC-32 returns the whole checksum. Digests return their first four
    /// bytes as a big-endian integer, the same value as the first eight
    /// characters of the hex digest.
    pub fn score(self, input: &[u8]) -> u32 {
        match self {
            Algorithm::Crc32 => crc32fast::hash(input),
            Algorithm::Md4 => prefix(&Md4::digest(input)),
            Algorithm::Md5 => prefix(&Md5::digest(input)),
            Algorithm::Sha1 => prefix(&Sha1::digest(input)),
            Algorithm::Sha256 => prefix(&Sha256::digest(input)),
            Algorithm::Sha512 => prefix(&Sha512::digest(input)),
            Algorithm::Sha3_224 => prefix(&Sha3_224::digest(input)),
            Algorithm::Blake3 => prefix(blake3::hash(input).as_bytes()),
        }
    }

    /// Wrap this algorithm as a probe.
    pub fn probe(self) -> DigestProbe {
        DigestProbe::new(self)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| ProbeError::UnknownAlgorithm(s.to_string()))
    }
}

/// First four digest bytes as a big-endian `u32`.
fn prefix(digest: &[u8]) -> u32 {
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// [`Probe`] backed by one [`Algorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestProbe {
    algorithm: Algorithm,
}

impl DigestProbe {
    /// Create a probe for `algorithm`.
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    /// The wrapped algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl Probe for DigestProbe {
    fn name(&self) -> &str {
        self.algorithm.name()
    }

    fn score(&self, input: &[u8]) -> u64 {
        u64::from(self.algorithm.score(input))
    }
}

/// Build a probe set from `algorithms`, keeping their order.
pub fn probe_set(algorithms: &[Algorithm]) -> ProbeSet {
    algorithms
        .iter()
        .fold(ProbeSet::new(), |set, a| set.with(a.probe()))
}
