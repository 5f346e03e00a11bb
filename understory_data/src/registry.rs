// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Central registry for records of element-like objects.
//!
//! Element-like objects do not own their record. They carry an
//! [`IdentityTag`] and the record lives here, keyed by that tag. Several
//! objects may carry the same tag; they then share one record.
//!
//! Each object carrying a tag is a *holder*. A record is dropped when its
//! last holder is released, so the registry does not grow without bound as
//! objects come and go.

use hashbrown::HashMap;

use crate::record::ObjectRecord;
use crate::tag::IdentityTag;

#[derive(Clone, Debug, Default)]
struct Entry {
    record: ObjectRecord,
    holders: usize,
}

/// Records of element-like objects, keyed by [`IdentityTag`].
///
/// ```rust
/// use understory_data::{CentralRegistry, DataValue, IdentityTagger, SiloKind};
///
/// let mut tagger = IdentityTagger::new();
/// let mut registry = CentralRegistry::new();
///
/// let tag = tagger.issue();
/// registry.retain(tag);
/// registry
///     .record_for(tag)
///     .silo_mut(SiloKind::Data)
///     .insert("foo", DataValue::new(1_i32));
///
/// assert_eq!(registry.get(tag).unwrap().data().get_as::<i32>("foo"), Some(&1));
///
/// // Releasing the only holder drops the record.
/// assert!(registry.release(tag).is_some());
/// assert!(registry.get(tag).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CentralRegistry {
    entries: HashMap<IdentityTag, Entry>,
}

impl CentralRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `tag`, creating an empty one on first access.
    pub fn record_for(&mut self, tag: IdentityTag) -> &mut ObjectRecord {
        &mut self.entries.entry(tag).or_default().record
    }

    /// Returns the record for `tag` without creating it.
    #[must_use]
    pub fn get(&self, tag: IdentityTag) -> Option<&ObjectRecord> {
        self.entries.get(&tag).map(|e| &e.record)
    }

    /// Returns the record for `tag` mutably without creating it.
    #[must_use]
    pub fn get_mut(&mut self, tag: IdentityTag) -> Option<&mut ObjectRecord> {
        self.entries.get_mut(&tag).map(|e| &mut e.record)
    }

    /// Returns `true` if a record exists for `tag`.
    #[must_use]
    pub fn contains(&self, tag: IdentityTag) -> bool {
        self.entries.contains_key(&tag)
    }

    /// Returns the number of objects carrying `tag`.
    #[must_use]
    pub fn holders(&self, tag: IdentityTag) -> usize {
        self.entries.get(&tag).map_or(0, |e| e.holders)
    }

    /// Records one more object carrying `tag`.
    pub fn retain(&mut self, tag: IdentityTag) {
        self.entries.entry(tag).or_default().holders += 1;
    }

    /// Records that one object stopped carrying `tag`.
    ///
    /// When no holders remain the record is removed and returned.
    pub fn release(&mut self, tag: IdentityTag) -> Option<ObjectRecord> {
        let entry = self.entries.get_mut(&tag)?;
        entry.holders = entry.holders.saturating_sub(1);
        if entry.holders == 0 {
            self.entries.remove(&tag).map(|e| e.record)
        } else {
            None
        }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the registry holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (IdentityTag, &ObjectRecord)> + '_ {
        self.entries.iter().map(|(tag, e)| (*tag, &e.record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SiloKind;
    use crate::tag::IdentityTagger;
    use crate::value::DataValue;

    #[test]
    fn record_for_creates_once() {
        let mut tagger = IdentityTagger::new();
        let mut registry = CentralRegistry::new();
        let tag = tagger.issue();

        assert!(registry.get(tag).is_none());
        registry
            .record_for(tag)
            .silo_mut(SiloKind::Data)
            .insert("foo", DataValue::new(1_i32));
        assert!(registry.contains(tag));
        assert_eq!(registry.len(), 1);

        // Second access finds the same record.
        let record = registry.record_for(tag);
        assert_eq!(record.data().get_as::<i32>("foo"), Some(&1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn shared_tag_keeps_record_until_last_release() {
        let mut tagger = IdentityTagger::new();
        let mut registry = CentralRegistry::new();
        let tag = tagger.issue();

        registry.retain(tag);
        registry.retain(tag);
        assert_eq!(registry.holders(tag), 2);

        assert!(registry.release(tag).is_none());
        assert!(registry.contains(tag));
        assert!(registry.release(tag).is_some());
        assert!(!registry.contains(tag));
        assert_eq!(registry.holders(tag), 0);
    }

    #[test]
    fn release_unknown_tag_is_a_miss() {
        let mut tagger = IdentityTagger::new();
        let mut registry = CentralRegistry::new();
        assert!(registry.release(tagger.issue()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn iter_visits_every_record() {
        let mut tagger = IdentityTagger::new();
        let mut registry = CentralRegistry::new();
        let a = tagger.issue();
        let b = tagger.issue();
        registry.record_for(a);
        registry.record_for(b);

        let mut tags: alloc::vec::Vec<_> = registry.iter().map(|(tag, _)| tag).collect();
        tags.sort();
        assert_eq!(tags, [a, b]);
    }
}
