// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Data: attach named values to arbitrary objects.
//!
//! This crate provides a metadata store in which any object, from a plain
//! keyed value to an element of a document tree, can carry a bag of named
//! values without its own type changing shape or cooperating beyond naming
//! its identity.
//!
//! ## Core Concepts
//!
//! - **Subjects** ([`Subject`]): the objects data is attached to. A subject
//!   names its identity key and may expose a node type, a node name and
//!   attributes.
//! - **Silos** ([`Silo`], [`SiloKind`]): each object's [`ObjectRecord`] holds
//!   a public data silo and a private silo.
//! - **Keys**: `foo-bar` and `fooBar` address the same slot; see
//!   [`camel_case`].
//! - **Gatekeeping** ([`Blocklist`], [`classify`]): some objects never carry
//!   data; the rest are stored directly or through an [`IdentityTag`] in the
//!   [`CentralRegistry`].
//! - **Seeding**: a public read that misses consults the subject's
//!   [`AttributeProvider`] for a `data-*` attribute and caches the result.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use understory_data::{AttributeProvider, DataStore, NodeType, SiloKind, Subject};
//!
//! struct Element {
//!     id: u32,
//!     attrs: BTreeMap<String, String>,
//! }
//!
//! impl Subject for Element {
//!     type Key = u32;
//!
//!     fn key(&self) -> u32 {
//!         self.id
//!     }
//!
//!     fn node_type(&self) -> NodeType<'_> {
//!         NodeType::Number(1.0)
//!     }
//!
//!     fn attributes(&self) -> Option<&dyn AttributeProvider> {
//!         Some(&self.attrs)
//!     }
//! }
//!
//! let mut store = DataStore::new();
//! let p = Element {
//!     id: 1,
//!     attrs: BTreeMap::from([("data-foo-bar".into(), "baz".into())]),
//! };
//!
//! // Seeded from `data-foo-bar` on first read.
//! assert_eq!(store.get::<String>(&p, "fooBar").map(String::as_str), Some("baz"));
//!
//! // Element-like objects are tagged; the record lives in the registry.
//! let tag = store.tag_of(&p).unwrap();
//! assert!(store.registry().contains(tag));
//!
//! store.set(&p, "count", 3_u32);
//! assert_eq!(store.get::<u32>(&p, "count"), Some(&3));
//! assert_eq!(store.silo(&p, SiloKind::Data).unwrap().len(), 2);
//! ```
//!
//! ## Misses
//!
//! Nothing in this crate fails. `None` from a read may mean the key was never
//! set, the object is denied, or the object was never tagged. Use
//! [`DataStore::accepts`] to ask about permission, or install a
//! [`DataTrace`] sink such as [`EventLog`] to observe decisions.
//!
//! ## Concurrency
//!
//! Every operation that may create a marker, tag or record takes
//! `&mut self`, which keeps tag issuance and record creation atomic. Stored
//! values must be `Send + Sync`, so a store is too; share one between threads
//! by wrapping it in a lock such as `std::sync::Mutex`.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod gate;
mod key;
mod record;
mod registry;
mod store;
mod subject;
mod tag;
mod trace;
mod value;

pub use gate::{Access, Blocklist, Denial, Strategy, classify};
pub use key::{attribute_name, camel_case, hyphenate};
pub use record::{ObjectRecord, Silo, SiloKind};
pub use registry::CentralRegistry;
pub use store::{DEFAULT_ATTRIBUTE_PREFIX, DataStore, DataStoreBuilder};
pub use subject::{AttributeProvider, NodeKind, NodeType, Plain, Subject};
pub use tag::{IdentityTag, IdentityTagger};
pub use trace::{DataEvent, DataTrace, EventLog, NoTrace};
pub use value::DataValue;
