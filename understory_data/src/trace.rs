// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observability hooks for the store.
//!
//! Every miss in the store collapses to `None`, which makes "never set" and
//! "not permitted" look the same from the outside. A [`DataTrace`] sink sees
//! the store's decisions as they happen, so embedders can tell them apart
//! while debugging without changing the public contract.
//!
//! The default sink, [`NoTrace`], compiles away. [`EventLog`] records every
//! event in order.

use alloc::string::String;
use alloc::vec::Vec;

use crate::record::SiloKind;
use crate::tag::IdentityTag;

/// A callback sink for store decisions.
///
/// All hooks default to doing nothing.
pub trait DataTrace<K> {
    /// A read or write against `key` was refused by the gatekeeper.
    fn denied(&mut self, key: K, silo: SiloKind) {
        let _ = (key, silo);
    }

    /// `key` received `tag`, either freshly issued or assigned by a caller.
    fn tagged(&mut self, key: K, tag: IdentityTag) {
        let _ = (key, tag);
    }

    /// The public silo of `key` was seeded from `attribute`.
    fn seeded(&mut self, key: K, attribute: &str) {
        let _ = (key, attribute);
    }

    /// `key` dropped its marker. `dropped_record` is `true` when its record
    /// went away with it.
    fn released(&mut self, key: K, dropped_record: bool) {
        let _ = (key, dropped_record);
    }
}

/// A sink that ignores every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTrace;

impl<K> DataTrace<K> for NoTrace {}

/// A single recorded event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataEvent<K> {
    /// See [`DataTrace::denied`].
    Denied {
        /// The refused object.
        key: K,
        /// The silo the operation addressed.
        silo: SiloKind,
    },
    /// See [`DataTrace::tagged`].
    Tagged {
        /// The tagged object.
        key: K,
        /// The tag it now carries.
        tag: IdentityTag,
    },
    /// See [`DataTrace::seeded`].
    Seeded {
        /// The seeded object.
        key: K,
        /// The attribute the value came from.
        attribute: String,
    },
    /// See [`DataTrace::released`].
    Released {
        /// The released object.
        key: K,
        /// Whether the record was dropped too.
        dropped_record: bool,
    },
}

/// Records every event in order.
///
/// ```rust
/// use understory_data::{DataEvent, DataStore, EventLog, Plain, SiloKind};
///
/// let mut store = DataStore::builder().trace(EventLog::<u32>::new()).build();
/// store.set(&Plain(1_u32), "foo", 1_i32);
/// store.release(&Plain(1_u32));
///
/// assert_eq!(
///     store.trace().events(),
///     &[DataEvent::Released { key: 1, dropped_record: true }]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct EventLog<K> {
    events: Vec<DataEvent<K>>,
}

impl<K> Default for EventLog<K> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<K> EventLog<K> {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[DataEvent<K>] {
        &self.events
    }

    /// Removes and returns the recorded events.
    pub fn take(&mut self) -> Vec<DataEvent<K>> {
        core::mem::take(&mut self.events)
    }

    /// Forgets all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<K> DataTrace<K> for EventLog<K> {
    fn denied(&mut self, key: K, silo: SiloKind) {
        self.events.push(DataEvent::Denied { key, silo });
    }

    fn tagged(&mut self, key: K, tag: IdentityTag) {
        self.events.push(DataEvent::Tagged { key, tag });
    }

    fn seeded(&mut self, key: K, attribute: &str) {
        self.events.push(DataEvent::Seeded {
            key,
            attribute: String::from(attribute),
        });
    }

    fn released(&mut self, key: K, dropped_record: bool) {
        self.events.push(DataEvent::Released {
            key,
            dropped_record,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::IdentityTagger;

    #[test]
    fn event_log_records_in_order() {
        let tag = IdentityTagger::new().issue();
        let mut log = EventLog::new();
        log.tagged(1_u32, tag);
        log.seeded(1, "data-foo");
        log.denied(2, SiloKind::Private);

        assert_eq!(
            log.events(),
            &[
                DataEvent::Tagged { key: 1, tag },
                DataEvent::Seeded {
                    key: 1,
                    attribute: String::from("data-foo"),
                },
                DataEvent::Denied {
                    key: 2,
                    silo: SiloKind::Private,
                },
            ]
        );
    }

    #[test]
    fn take_drains_the_log() {
        let mut log = EventLog::new();
        log.released(1_u32, false);
        assert_eq!(log.take().len(), 1);
        assert!(log.events().is_empty());
        log.released(2, true);
        log.clear();
        assert!(log.events().is_empty());
    }

    #[test]
    fn no_trace_accepts_everything() {
        let mut sink = NoTrace;
        DataTrace::<u32>::denied(&mut sink, 1, SiloKind::Data);
        DataTrace::<u32>::released(&mut sink, 1, true);
    }
}
