//! Track identifier generation.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::types::TrackId;

/// Source of fresh, never-reused track identifiers
pub trait IdGenerator {
    fn next_id(&self) -> TrackId;
}

/// Random v4 UUIDs, as the engine expects for interactively created tracks
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> TrackId {
        TrackId(uuid::Uuid::new_v4().to_string())
    }
}

/// Deterministic `prefix-N` identifiers
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> TrackId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        TrackId(format!("{}-{n}", self.prefix))
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn next_id(&self) -> TrackId {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new("track");
        assert_eq!(ids.next_id(), TrackId::new("track-0"));
        assert_eq!(ids.next_id(), TrackId::new("track-1"));
    }

    #[test]
    fn test_uuid_ids_unique() {
        let ids: HashSet<TrackId> = (0..100).map(|_| UuidGenerator.next_id()).collect();
        assert_eq!(ids.len(), 100);
    }
}
