//! Random key data: IPv4 addresses and hex strings.
//!
//! Keys come in two families, mirroring what a cache or shard router
//! typically sees: dotted IPv4 addresses and opaque 20-character hex tokens.
//! Both families are generated from a seeded [`StdRng`] so a run can be
//! repeated exactly, and can be saved to and loaded from JSON files.

use std::collections::HashSet;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use tracing::debug;

use crate::error::BenchError;

/// File holding the IPv4 address keys.
pub const IP_ADDRESSES_FILE: &str = "random_ip_addresses.json";
/// File holding the hex string keys.
pub const STRINGS_FILE: &str = "random_strings.json";

/// Draw attempts allowed per requested item before giving up on uniqueness.
const ATTEMPTS_PER_ITEM: usize = 4;

/// Two families of unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    ip_addresses: Vec<String>,
    strings: Vec<String>,
}

impl KeySet {
    /// Generate `count` unique IPv4 addresses and `count` unique hex strings.
    pub fn generate(count: usize, seed: u64) -> Result<Self, BenchError> {
        let mut rng = StdRng::seed_from_u64(seed);

        let ip_addresses = unique_items(count, "ip addresses", || {
            Ipv4Addr::from(rng.random::<u32>()).to_string()
        })?;
        let strings = unique_items(count, "random strings", || {
            let mut bytes = [0u8; 10];
            rng.fill_bytes(&mut bytes);
            hex::encode(bytes)
        })?;

        debug!(count, seed, "generated key set");
        Ok(Self {
            ip_addresses,
            strings,
        })
    }

    /// Build a key set from existing lists.
    pub fn from_parts(ip_addresses: Vec<String>, strings: Vec<String>) -> Self {
        Self {
            ip_addresses,
            strings,
        }
    }

    /// Write both families as JSON arrays into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<(), BenchError> {
        fs::create_dir_all(dir)?;
        fs::write(
            dir.join(IP_ADDRESSES_FILE),
            serde_json::to_vec(&self.ip_addresses)?,
        )?;
        fs::write(dir.join(STRINGS_FILE), serde_json::to_vec(&self.strings)?)?;
        debug!(dir = %dir.display(), keys = self.len(), "saved key set");
        Ok(())
    }

    /// Read both families from `dir`.
    pub fn load(dir: &Path) -> Result<Self, BenchError> {
        Ok(Self {
            ip_addresses: read_string_array(&dir.join(IP_ADDRESSES_FILE))?,
            strings: read_string_array(&dir.join(STRINGS_FILE))?,
        })
    }

    /// The IPv4 address keys.
    pub fn ip_addresses(&self) -> &[String] {
        &self.ip_addresses
    }

    /// The hex string keys.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Total number of keys across both families.
    pub fn len(&self) -> usize {
        self.ip_addresses.len() + self.strings.len()
    }

    /// Returns `true` if there are no keys at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Both families merged and shuffled with `seed`.
    pub fn shuffled(&self, seed: u64) -> Vec<String> {
        let mut keys: Vec<String> = self
            .ip_addresses
            .iter()
            .chain(&self.strings)
            .cloned()
            .collect();
        keys.shuffle(&mut StdRng::seed_from_u64(seed));
        keys
    }
}

fn unique_items(
    count: usize,
    kind: &'static str,
    mut next: impl FnMut() -> String,
) -> Result<Vec<String>, BenchError> {
    let mut seen = HashSet::with_capacity(count);
    let mut items = Vec::with_capacity(count);
    let max_attempts = count.saturating_mul(ATTEMPTS_PER_ITEM);

    for _ in 0..max_attempts {
        if items.len() == count {
            break;
        }
        let item = next();
        if seen.insert(item.clone()) {
            items.push(item);
        }
    }

    if items.len() != count {
        return Err(BenchError::NotUnique {
            kind,
            wanted: count,
            got: items.len(),
        });
    }
    Ok(items)
}

fn read_string_array(path: &Path) -> Result<Vec<String>, BenchError> {
    let bytes = fs::read(path).map_err(|source| BenchError::KeyFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| BenchError::KeyFileFormat {
        path: path.to_path_buf(),
        source,
    })
}
