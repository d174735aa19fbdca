//! Checksum and digest probes for [`multiprobe_placement`].
//!
//! This crate provides:
//! - [`Algorithm`]: the supported checksums/digests, parsable by name.
//! - [`DigestProbe`]: adapts an algorithm to the [`Probe`] contract.
//! - [`Bundle`]: named presets (`standard`, `accurate`).
//! - [`probe_set`]: builds a [`ProbeSet`] from any list of algorithms.
//!
//! Every probe scores within `[0, 2^32)`: CRC-32 uses the full checksum,
//! digests use their first four bytes read big-endian.
//!
//! [`Probe`]: multiprobe_placement::Probe
//! [`ProbeSet`]: multiprobe_placement::ProbeSet

mod algorithm;
mod bundle;
mod error;

pub use algorithm::{Algorithm, DigestProbe, probe_set};
pub use bundle::Bundle;
pub use error::ProbeError;
