// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The metadata store facade.
//!
//! [`DataStore`] composes the pieces of this crate: keys are normalized with
//! [`camel_case`], subjects are classified by the [`Blocklist`]-driven
//! gatekeeper, and records are found either directly (plain objects) or
//! through an [`IdentityTag`] in the [`CentralRegistry`] (element-like
//! objects).
//!
//! # Markers
//!
//! The store keeps two side tables keyed by subject identity: one holding the
//! records of plain objects, one holding the tags of element-like objects. A
//! subject appears in at most one of them; that entry is its *marker*.
//! Subjects themselves are never modified.
//!
//! # Misses
//!
//! No operation fails. A denied subject, an absent record, an absent key and
//! an absent attribute all read as `None`, and writes to denied subjects are
//! dropped (reported as `false`). Install a [`DataTrace`] sink to tell these
//! cases apart.

use alloc::boxed::Box;
use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;

use hashbrown::HashMap;

use crate::gate::{Access, Blocklist, Denial, Strategy, classify};
use crate::key::{attribute_name, camel_case};
use crate::record::{ObjectRecord, Silo, SiloKind};
use crate::registry::CentralRegistry;
use crate::subject::Subject;
use crate::tag::{IdentityTag, IdentityTagger};
use crate::trace::{DataTrace, NoTrace};
use crate::value::DataValue;

/// Attribute prefix used for seeding unless configured otherwise.
pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "data-";

/// Configuration for a [`DataStore`].
///
/// ```rust
/// use understory_data::{DataStore, Denial, Plain};
///
/// let store: DataStore<u32> = DataStore::builder()
///     .attribute_prefix("x-")
///     .deny("video", Denial::Always)
///     .build();
///
/// assert_eq!(store.attribute_prefix(), "x-");
/// assert!(store.blocklist().rule("VIDEO").is_some());
/// assert!(store.accepts(&Plain(1)));
/// ```
pub struct DataStoreBuilder<K, Tr = NoTrace> {
    blocklist: Blocklist,
    attribute_prefix: Box<str>,
    trace: Tr,
    _key: PhantomData<fn() -> K>,
}

impl<K> Default for DataStoreBuilder<K> {
    fn default() -> Self {
        Self {
            blocklist: Blocklist::new(),
            attribute_prefix: Box::from(DEFAULT_ATTRIBUTE_PREFIX),
            trace: NoTrace,
            _key: PhantomData,
        }
    }
}

impl<K> DataStoreBuilder<K> {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, Tr> DataStoreBuilder<K, Tr> {
    /// Sets the prefix prepended to hyphenated keys when seeding.
    #[must_use]
    pub fn attribute_prefix(mut self, prefix: &str) -> Self {
        self.attribute_prefix = Box::from(prefix);
        self
    }

    /// Adds a blocklist rule.
    #[must_use]
    pub fn deny(mut self, name: &str, rule: Denial) -> Self {
        self.blocklist.deny(name, rule);
        self
    }

    /// Drops the rules for the built-in names (`embed`, `applet`, `object`).
    #[must_use]
    pub fn without_default_denials(mut self) -> Self {
        for name in Blocklist::BUILT_IN {
            self.blocklist.allow(name);
        }
        self
    }

    /// Installs a trace sink.
    #[must_use]
    pub fn trace<T: DataTrace<K>>(self, trace: T) -> DataStoreBuilder<K, T> {
        DataStoreBuilder {
            blocklist: self.blocklist,
            attribute_prefix: self.attribute_prefix,
            trace,
            _key: PhantomData,
        }
    }

    /// Builds the store.
    #[must_use]
    pub fn build(self) -> DataStore<K, Tr> {
        DataStore {
            direct: HashMap::new(),
            tags: HashMap::new(),
            registry: CentralRegistry::new(),
            tagger: IdentityTagger::new(),
            blocklist: self.blocklist,
            attribute_prefix: self.attribute_prefix,
            trace: self.trace,
        }
    }
}

impl<K, Tr: fmt::Debug> fmt::Debug for DataStoreBuilder<K, Tr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataStoreBuilder")
            .field("blocklist", &self.blocklist)
            .field("attribute_prefix", &self.attribute_prefix)
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

/// Attaches named values to arbitrary objects.
///
/// Every store owns its own blocklist, tag counter and registry, so several
/// stores never observe each other.
///
/// # Example
///
/// ```rust
/// use understory_data::{DataStore, Plain, SiloKind};
///
/// let mut store = DataStore::new();
/// let o = Plain(1_u32);
///
/// store.set(&o, "foo-bar", String::from("baz"));
/// assert_eq!(store.get::<String>(&o, "fooBar").map(String::as_str), Some("baz"));
/// assert_eq!(store.get::<String>(&o, "foo-bar").map(String::as_str), Some("baz"));
///
/// // The private silo is a separate namespace.
/// store.set_private(&o, "foo", 1_i32);
/// assert!(store.get::<i32>(&o, "foo").is_none());
/// assert_eq!(store.silo(&o, SiloKind::Private).unwrap().get_as::<i32>("foo"), Some(&1));
/// ```
#[derive(Clone, Debug)]
pub struct DataStore<K, Tr = NoTrace> {
    /// Records of plain objects.
    direct: HashMap<K, ObjectRecord>,
    /// Tags of element-like objects.
    tags: HashMap<K, IdentityTag>,
    registry: CentralRegistry,
    tagger: IdentityTagger,
    blocklist: Blocklist,
    attribute_prefix: Box<str>,
    trace: Tr,
}

impl<K> Default for DataStore<K> {
    fn default() -> Self {
        DataStoreBuilder::new().build()
    }
}

impl<K> DataStore<K> {
    /// Creates a store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a builder for a configured store.
    #[must_use]
    pub fn builder() -> DataStoreBuilder<K> {
        DataStoreBuilder::new()
    }
}

impl<K, Tr> DataStore<K, Tr> {
    /// Returns the blocklist.
    #[must_use]
    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    /// Returns the blocklist mutably.
    ///
    /// Changes apply from the next classification on; data already stored
    /// for newly denied objects stays in place but becomes unreachable
    /// through reads.
    pub fn blocklist_mut(&mut self) -> &mut Blocklist {
        &mut self.blocklist
    }

    /// Returns the central registry.
    #[must_use]
    pub fn registry(&self) -> &CentralRegistry {
        &self.registry
    }

    /// Returns the attribute prefix used for seeding.
    #[must_use]
    pub fn attribute_prefix(&self) -> &str {
        &self.attribute_prefix
    }

    /// Returns the trace sink.
    #[must_use]
    pub fn trace(&self) -> &Tr {
        &self.trace
    }

    /// Returns the trace sink mutably.
    pub fn trace_mut(&mut self) -> &mut Tr {
        &mut self.trace
    }
}

impl<K: Copy + Eq + Hash, Tr: DataTrace<K>> DataStore<K, Tr> {
    /// Classifies `subject` against this store's blocklist.
    #[must_use]
    pub fn classify<S: Subject<Key = K> + ?Sized>(&self, subject: &S) -> Access {
        classify(&self.blocklist, subject)
    }

    /// Returns `true` if `subject` may carry data.
    #[must_use]
    pub fn accepts<S: Subject<Key = K> + ?Sized>(&self, subject: &S) -> bool {
        self.classify(subject).is_allowed()
    }

    /// Returns the tag `subject` carries, if any.
    #[must_use]
    pub fn tag_of<S: Subject<Key = K> + ?Sized>(&self, subject: &S) -> Option<IdentityTag> {
        self.tags.get(&subject.key()).copied()
    }

    /// Returns the tag of `subject`, issuing one if it has none.
    ///
    /// Only element-like subjects get tags; for any other subject this
    /// returns `None` unless a tag was assigned with
    /// [`assign_tag`](Self::assign_tag). Repeated calls return the same tag.
    pub fn ensure_tag<S: Subject<Key = K> + ?Sized>(
        &mut self,
        subject: &S,
    ) -> Option<IdentityTag> {
        let key = subject.key();
        if let Some(tag) = self.tags.get(&key) {
            return Some(*tag);
        }
        (self.classify(subject) == Access::Allowed(Strategy::Indexed))
            .then(|| self.stamp_new_tag(key))
    }

    /// Makes `subject` carry `tag`, so it shares the record of every other
    /// object carrying it.
    ///
    /// Any marker `subject` had before is released first. Returns `false`,
    /// changing nothing, if `subject` is denied or `tag` was never issued by
    /// this store.
    ///
    /// ```rust
    /// use understory_data::{DataStore, NodeType, Subject};
    ///
    /// struct P(u32);
    ///
    /// impl Subject for P {
    ///     type Key = u32;
    ///     fn key(&self) -> u32 {
    ///         self.0
    ///     }
    ///     fn node_type(&self) -> NodeType<'_> {
    ///         NodeType::Number(1.0)
    ///     }
    /// }
    ///
    /// let mut store = DataStore::new();
    /// let (p, q) = (P(1), P(2));
    /// store.set(&p, "foo", "bar");
    ///
    /// let tag = store.tag_of(&p).unwrap();
    /// assert!(store.assign_tag(&q, tag));
    /// assert_eq!(store.get::<&str>(&q, "foo"), Some(&"bar"));
    ///
    /// store.set(&q, "foo", "baz");
    /// assert_eq!(store.get::<&str>(&p, "foo"), Some(&"baz"));
    /// ```
    pub fn assign_tag<S: Subject<Key = K> + ?Sized>(
        &mut self,
        subject: &S,
        tag: IdentityTag,
    ) -> bool {
        if !self.accepts(subject) || tag >= self.tagger.peek_next() {
            return false;
        }
        let key = subject.key();
        if self.tags.get(&key) == Some(&tag) {
            return true;
        }
        self.release_key(key);
        self.registry.retain(tag);
        self.tags.insert(key, tag);
        self.trace.tagged(key, tag);
        true
    }

    /// Stores `value` under `key` in the selected silo.
    ///
    /// Returns `false` if `subject` is denied; nothing is stored then and no
    /// marker is created.
    pub fn write<S, T>(&mut self, subject: &S, key: &str, value: T, silo: SiloKind) -> bool
    where
        S: Subject<Key = K> + ?Sized,
        T: Clone + Send + Sync + 'static,
    {
        self.write_value(subject, key, DataValue::new(value), silo)
    }

    /// Stores an already erased `value` under `key` in the selected silo.
    pub fn write_value<S: Subject<Key = K> + ?Sized>(
        &mut self,
        subject: &S,
        key: &str,
        value: DataValue,
        silo: SiloKind,
    ) -> bool {
        let Some(strategy) = self.admit(subject, silo) else {
            return false;
        };
        let key = camel_case(key);
        self.record_mut(subject.key(), strategy)
            .silo_mut(silo)
            .insert(&key, value);
        true
    }

    /// Stores `value` under `key` in the public silo.
    pub fn set<S, T>(&mut self, subject: &S, key: &str, value: T) -> bool
    where
        S: Subject<Key = K> + ?Sized,
        T: Clone + Send + Sync + 'static,
    {
        self.write(subject, key, value, SiloKind::Data)
    }

    /// Stores `value` under `key` in the private silo.
    pub fn set_private<S, T>(&mut self, subject: &S, key: &str, value: T) -> bool
    where
        S: Subject<Key = K> + ?Sized,
        T: Clone + Send + Sync + 'static,
    {
        self.write(subject, key, value, SiloKind::Private)
    }

    /// Reads the value under `key` from the selected silo.
    ///
    /// On a public-silo miss the subject's attribute provider is asked for
    /// the prefixed, hyphenated attribute (`fooBar` becomes `data-foo-bar`).
    /// A hit is stored as a `String` under the normalized key and returned;
    /// later attribute changes do not affect it.
    pub fn read<S: Subject<Key = K> + ?Sized>(
        &mut self,
        subject: &S,
        key: &str,
        silo: SiloKind,
    ) -> Option<&DataValue> {
        let strategy = self.admit(subject, silo)?;
        let id = subject.key();
        let key = camel_case(key);

        let present = self
            .record_ref(id)
            .is_some_and(|record| record.silo(silo).contains_key(&key));
        if !present {
            if silo != SiloKind::Data {
                return None;
            }
            self.seed(subject, &key, strategy)?;
        }
        self.record_ref(id)?.silo(silo).get(&key)
    }

    /// Reads the value under `key` from the public silo as a `T`.
    pub fn get<T: 'static>(
        &mut self,
        subject: &(impl Subject<Key = K> + ?Sized),
        key: &str,
    ) -> Option<&T> {
        self.read(subject, key, SiloKind::Data)?.downcast_ref()
    }

    /// Reads the value under `key` from the private silo as a `T`.
    pub fn get_private<T: 'static>(
        &mut self,
        subject: &(impl Subject<Key = K> + ?Sized),
        key: &str,
    ) -> Option<&T> {
        self.read(subject, key, SiloKind::Private)?.downcast_ref()
    }

    /// Returns a whole silo of `subject` without seeding.
    #[must_use]
    pub fn silo<S: Subject<Key = K> + ?Sized>(&self, subject: &S, silo: SiloKind) -> Option<&Silo> {
        if !self.accepts(subject) {
            return None;
        }
        self.record_ref(subject.key()).map(|record| record.silo(silo))
    }

    /// Returns the whole record of `subject`, both silos included.
    #[must_use]
    pub fn record<S: Subject<Key = K> + ?Sized>(&self, subject: &S) -> Option<&ObjectRecord> {
        if !self.accepts(subject) {
            return None;
        }
        self.record_ref(subject.key())
    }

    /// Returns `true` if `subject` has any value in either silo.
    #[must_use]
    pub fn has_data<S: Subject<Key = K> + ?Sized>(&self, subject: &S) -> bool {
        self.record_ref(subject.key())
            .is_some_and(|record| !record.is_empty())
    }

    /// Removes and returns the value under `key` from the selected silo.
    ///
    /// When this empties the record, the subject's marker is released as by
    /// [`release`](Self::release). A removed public key may be seeded again.
    pub fn remove<S: Subject<Key = K> + ?Sized>(
        &mut self,
        subject: &S,
        key: &str,
        silo: SiloKind,
    ) -> Option<DataValue> {
        self.admit(subject, silo)?;
        let id = subject.key();
        let key = camel_case(key);

        let record = self.existing_record_mut(id)?;
        let removed = record.silo_mut(silo).remove(&key);
        if record.is_empty() {
            self.release_key(id);
        }
        removed
    }

    /// Drops the marker of `subject`.
    ///
    /// A plain object's record is dropped with it. An element-like object's
    /// record is dropped only if no other object carries the same tag.
    /// Returns the dropped record, if any.
    pub fn release<S: Subject<Key = K> + ?Sized>(&mut self, subject: &S) -> Option<ObjectRecord> {
        self.release_key(subject.key())
    }

    fn admit<S: Subject<Key = K> + ?Sized>(&mut self, subject: &S, silo: SiloKind) -> Option<Strategy> {
        let access = self.classify(subject);
        if access == Access::Denied {
            self.trace.denied(subject.key(), silo);
        }
        access.strategy()
    }

    fn seed<S: Subject<Key = K> + ?Sized>(
        &mut self,
        subject: &S,
        key: &str,
        strategy: Strategy,
    ) -> Option<()> {
        let name = attribute_name(&self.attribute_prefix, key);
        let value = subject.attributes()?.attribute(&name)?.into_owned();
        let id = subject.key();
        self.record_mut(id, strategy)
            .silo_mut(SiloKind::Data)
            .insert(key, DataValue::new(value));
        self.trace.seeded(id, &name);
        Some(())
    }

    fn record_ref(&self, key: K) -> Option<&ObjectRecord> {
        match self.tags.get(&key) {
            Some(tag) => self.registry.get(*tag),
            None => self.direct.get(&key),
        }
    }

    fn existing_record_mut(&mut self, key: K) -> Option<&mut ObjectRecord> {
        match self.tags.get(&key) {
            Some(tag) => self.registry.get_mut(*tag),
            None => self.direct.get_mut(&key),
        }
    }

    /// Returns the record for `key`, creating the marker and record as needed.
    fn record_mut(&mut self, key: K, strategy: Strategy) -> &mut ObjectRecord {
        let existing = self.tags.get(&key).copied();
        let tag = match existing {
            Some(tag) => tag,
            None if strategy == Strategy::Indexed => self.stamp_new_tag(key),
            None => return self.direct.entry(key).or_default(),
        };
        self.registry.record_for(tag)
    }

    /// Issues a tag for `key`, moving any direct record into the registry.
    fn stamp_new_tag(&mut self, key: K) -> IdentityTag {
        let tag = self.tagger.issue();
        self.registry.retain(tag);
        if let Some(record) = self.direct.remove(&key) {
            *self.registry.record_for(tag) = record;
        }
        self.tags.insert(key, tag);
        self.trace.tagged(key, tag);
        tag
    }

    fn release_key(&mut self, key: K) -> Option<ObjectRecord> {
        let (had_marker, dropped) = match self.tags.remove(&key) {
            Some(tag) => (true, self.registry.release(tag)),
            None => {
                let record = self.direct.remove(&key);
                (record.is_some(), record)
            }
        };
        if had_marker {
            self.trace.released(key, dropped.is_some());
        }
        dropped
    }
}
