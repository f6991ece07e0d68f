//! Identifiers and simple allocators for engine entities.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimelineId(pub u32);

/// Stable name of one visual object on the page (an element id, or a derived
/// id such as a generated word span).
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetKey(pub String);

impl TargetKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the `index`-th child span produced by splitting this target's text.
    pub fn span(&self, index: usize) -> TargetKey {
        TargetKey(format!("{}#w{}", self.0, index))
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TargetKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&TargetKey> for TargetKey {
    fn from(k: &TargetKey) -> Self {
        k.clone()
    }
}

/// Monotonic allocator for TimelineId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_timeline: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_timeline(&mut self) -> TimelineId {
        let id = TimelineId(self.next_timeline);
        self.next_timeline = self.next_timeline.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_timeline(), TimelineId(0));
        assert_eq!(alloc.alloc_timeline(), TimelineId(1));
    }

    #[test]
    fn span_keys_are_derived_from_parent() {
        let k = TargetKey::from("hero-subtitle");
        assert_eq!(k.span(0).as_str(), "hero-subtitle#w0");
        assert_eq!(k.span(12).to_string(), "hero-subtitle#w12");
    }
}
