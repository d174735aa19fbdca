//! Named probe presets.

use std::fmt;
use std::str::FromStr;

use multiprobe_placement::ProbeSet;

use crate::algorithm::{Algorithm, probe_set};
use crate::error::ProbeError;

/// Preset probe lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bundle {
    /// crc32, sha1, md4.
    Standard,
    /// crc32, sha1, sha256, md4, md5.
    Accurate,
}

impl Bundle {
    /// Both presets, standard first.
    pub const ALL: [Bundle; 2] = [Bundle::Standard, Bundle::Accurate];

    /// Lowercase preset name.
    pub fn name(self) -> &'static str {
        match self {
            Bundle::Standard => "standard",
            Bundle::Accurate => "accurate",
        }
    }

    /// Algorithms of this preset, in probe order.
    pub fn algorithms(self) -> &'static [Algorithm] {
        match self {
            Bundle::Standard => &[Algorithm::Crc32, Algorithm::Sha1, Algorithm::Md4],
            Bundle::Accurate => &[
                Algorithm::Crc32,
                Algorithm::Sha1,
                Algorithm::Sha256,
                Algorithm::Md4,
                Algorithm::Md5,
            ],
        }
    }

    /// Build the probe set.
    pub fn probes(self) -> ProbeSet {
        probe_set(self.algorithms())
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bundle {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Bundle::ALL
            .into_iter()
            .find(|b| b.name() == wanted)
            .ok_or_else(|| ProbeError::UnknownBundle(s.to_string()))
    }
}
