//! Probes: the scoring functions applied per node per key.

use std::fmt;
use std::sync::Arc;

/// A deterministic scoring function over arbitrary bytes.
///
/// Implementations must return the same score for the same input and should
/// spread scores roughly uniformly over their output range; the selector
/// relies on both properties for its distribution guarantee but does not
/// verify either. Scores are compared as `f64` after weighting, so values
/// above 2^53 lose precision.
pub trait Probe: Send + Sync {
    /// Short name used in logs and result labels (e.g. `"crc32"`).
    fn name(&self) -> &str;

    /// Score `input`, which is the key immediately followed by the node ID.
    fn score(&self, input: &[u8]) -> u64;
}

/// A named probe backed by a closure.
pub struct FnProbe<F> {
    name: String,
    f: F,
}

impl<F> FnProbe<F>
where
    F: Fn(&[u8]) -> u64 + Send + Sync,
{
    /// Wrap `f` as a probe called `name`.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Probe for FnProbe<F>
where
    F: Fn(&[u8]) -> u64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, input: &[u8]) -> u64 {
        (self.f)(input)
    }
}

impl<F> fmt::Debug for FnProbe<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProbe").field("name", &self.name).finish()
    }
}

/// An ordered set of probes, configured as a unit.
///
/// Cloning is cheap: probes are shared behind `Arc`. Order does not change
/// which score is minimal but decides which probe wins an exact tie.
#[derive(Clone, Default)]
pub struct ProbeSet {
    probes: Vec<Arc<dyn Probe>>,
}

impl ProbeSet {
    /// Create an empty probe set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a probe.
    pub fn push<P: Probe + 'static>(&mut self, probe: P) {
        self.probes.push(Arc::new(probe));
    }

    /// Append an already shared probe.
    pub fn push_shared(&mut self, probe: Arc<dyn Probe>) {
        self.probes.push(probe);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with<P: Probe + 'static>(mut self, probe: P) -> Self {
        self.push(probe);
        self
    }

    /// Number of probes.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Whether the set contains no probes.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Probe names in configured order.
    pub fn names(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Probe names joined with `", "`, e.g. `"crc32, sha1, md4"`.
    pub fn label(&self) -> String {
        self.names().join(", ")
    }

    /// Iterate over the probes in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Probe> {
        self.probes.iter().map(|p| p.as_ref())
    }
}

impl FromIterator<Arc<dyn Probe>> for ProbeSet {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Probe>>>(iter: I) -> Self {
        Self {
            probes: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for ProbeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
