// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object records and their silos.

use alloc::boxed::Box;
use core::fmt;

use hashbrown::HashMap;

use crate::value::DataValue;

/// Selects one of the two namespaces inside an [`ObjectRecord`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SiloKind {
    /// The public silo, seeded from attributes and visible to every caller.
    #[default]
    Data,
    /// The private silo for internal and trusted callers.
    Private,
}

/// A map from normalized key to value.
///
/// Keys are stored exactly as given; [`DataStore`](crate::DataStore)
/// normalizes them before they get here.
#[derive(Clone, Default)]
pub struct Silo {
    entries: HashMap<Box<str>, DataValue>,
}

impl Silo {
    /// Creates an empty silo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries.get(key)
    }

    /// Returns the value stored under `key` if it is a `T`.
    #[must_use]
    pub fn get_as<T: 'static>(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(DataValue::downcast_ref)
    }

    /// Returns the value stored under `key` mutably.
    #[must_use]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut DataValue> {
        self.entries.get_mut(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: &str, value: DataValue) -> Option<DataValue> {
        if let Some(slot) = self.entries.get_mut(key) {
            return Some(core::mem::replace(slot, value));
        }
        self.entries.insert(Box::from(key), value);
        None
    }

    /// Removes and returns the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<DataValue> {
        self.entries.remove(key)
    }

    /// Returns `true` if `key` holds a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the stored keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(|k| &**k)
    }

    /// Iterates over the stored entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> + '_ {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for Silo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Everything stored for one object.
///
/// The two silos share a key space but never see each other's values.
#[derive(Clone, Debug, Default)]
pub struct ObjectRecord {
    data: Silo,
    private: Silo,
}

impl ObjectRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the public silo.
    #[must_use]
    #[inline]
    pub fn data(&self) -> &Silo {
        &self.data
    }

    /// Returns the private silo.
    #[must_use]
    #[inline]
    pub fn private(&self) -> &Silo {
        &self.private
    }

    /// Returns the silo selected by `kind`.
    #[must_use]
    #[inline]
    pub fn silo(&self, kind: SiloKind) -> &Silo {
        match kind {
            SiloKind::Data => &self.data,
            SiloKind::Private => &self.private,
        }
    }

    /// Returns the silo selected by `kind` mutably.
    #[must_use]
    #[inline]
    pub fn silo_mut(&mut self, kind: SiloKind) -> &mut Silo {
        match kind {
            SiloKind::Data => &mut self.data,
            SiloKind::Private => &mut self.private,
        }
    }

    /// Returns `true` if both silos are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.private.is_empty()
    }
}
