// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subjects: the objects data is attached to.
//!
//! The store never touches a subject's own fields. It only asks the subject
//! for an identity key and, optionally, for the few element-like traits that
//! drive classification and seeding.

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::hash::{BuildHasher, Hash};

use hashbrown::HashMap;

/// The `nodeType`-like marker an object exposes.
///
/// Element-like objects report a node type; plain objects report
/// [`NodeType::Absent`]. The variants cover the shapes such a marker takes in
/// loosely typed hosts; [`NodeType::kind`] maps each of them to an explicit
/// [`NodeKind`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NodeType<'a> {
    /// No marker at all.
    Absent,
    /// A numeric marker.
    Number(f64),
    /// A textual marker. Numeric text (`"9"`, `"0x9"`, `" 9e0 "`) counts as
    /// its number; `"Infinity"` is the only non-finite spelling recognized.
    Text(&'a str),
    /// A boolean marker.
    Bool(bool),
    /// Any other present marker (a list, a record, ...), with the number it
    /// coerces to. `None` stands for `NaN`: a list `[2]` is `Other(Some(2.0))`,
    /// an empty list is `Other(Some(0.0))` and a record is `Other(None)`.
    Other(Option<f64>),
}

/// Explicit categories a [`NodeType`] falls into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// No marker.
    Absent,
    /// Marker equal to `1`.
    Element,
    /// Marker equal to `9`.
    Document,
    /// Any other non-zero number.
    OtherNumber,
    /// A present marker with no numeric meaning; treated like an element.
    Truthy,
    /// `0`, `NaN`, `false` or empty text.
    Falsy,
}

impl NodeType<'_> {
    /// Classifies this marker.
    ///
    /// ```rust
    /// use understory_data::{NodeKind, NodeType};
    ///
    /// assert_eq!(NodeType::Number(1.0).kind(), NodeKind::Element);
    /// assert_eq!(NodeType::Text("4").kind(), NodeKind::OtherNumber);
    /// assert_eq!(NodeType::Text("string").kind(), NodeKind::Truthy);
    /// assert_eq!(NodeType::Bool(false).kind(), NodeKind::Falsy);
    /// ```
    #[must_use]
    pub fn kind(self) -> NodeKind {
        match self {
            Self::Absent => NodeKind::Absent,
            Self::Number(n) => number_kind(n).unwrap_or(NodeKind::Falsy),
            Self::Text("") => NodeKind::Falsy,
            // Non-empty text is present even when it reads as zero.
            Self::Text(text) => parse_number(text)
                .and_then(number_kind)
                .unwrap_or(NodeKind::Truthy),
            Self::Bool(true) => NodeKind::Element,
            Self::Bool(false) => NodeKind::Falsy,
            Self::Other(n) => n.and_then(number_kind).unwrap_or(NodeKind::Truthy),
        }
    }
}

/// Returns `None` for zero and `NaN`.
fn number_kind(n: f64) -> Option<NodeKind> {
    if n.is_nan() || n == 0.0 {
        None
    } else if n == 1.0 {
        Some(NodeKind::Element)
    } else if n == 9.0 {
        Some(NodeKind::Document)
    } else {
        Some(NodeKind::OtherNumber)
    }
}

/// Reads `text` as a number the way loosely typed hosts coerce strings.
///
/// Surrounding whitespace is ignored and blank text is zero. Accepts decimal
/// literals with an optional sign and exponent, unsigned `0x`/`0o`/`0b`
/// integers and `Infinity` with an optional sign. Anything else, including
/// `inf` and `nan`, is `None`.
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    let (negative, unsigned) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if unsigned == "Infinity" {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }
    if unsigned.len() == text.len() {
        let radix = match text.get(..2) {
            Some("0x" | "0X") => Some(16),
            Some("0o" | "0O") => Some(8),
            Some("0b" | "0B") => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return parse_radix(&text[2..], radix);
        }
    }
    let decimal = unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal || !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    text.parse().ok()
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0, |acc: f64, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// Read access to an object's attributes.
///
/// Used for seeding the public silo and for conditional blocklist rules.
pub trait AttributeProvider {
    /// Returns the value of the attribute `name`, if present.
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl<S: BuildHasher> AttributeProvider for HashMap<String, String, S> {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl AttributeProvider for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

/// An object metadata can be attached to.
///
/// Only [`Subject::key`] is required. The key is the object's identity: two
/// subjects with equal keys are the same object as far as the store is
/// concerned.
///
/// # Example
///
/// ```rust
/// use understory_data::{NodeType, Subject};
///
/// struct Paragraph {
///     id: u32,
/// }
///
/// impl Subject for Paragraph {
///     type Key = u32;
///
///     fn key(&self) -> u32 {
///         self.id
///     }
///
///     fn node_type(&self) -> NodeType<'_> {
///         NodeType::Number(1.0)
///     }
///
///     fn node_name(&self) -> Option<&str> {
///         Some("P")
///     }
/// }
/// ```
pub trait Subject {
    /// The identity key type.
    type Key: Copy + Eq + Hash;

    /// Returns the identity of this object.
    fn key(&self) -> Self::Key;

    /// Returns the `nodeType`-like marker.
    fn node_type(&self) -> NodeType<'_> {
        NodeType::Absent
    }

    /// Returns the node name consulted by the blocklist.
    fn node_name(&self) -> Option<&str> {
        None
    }

    /// Returns this object's attribute provider, if it has one.
    fn attributes(&self) -> Option<&dyn AttributeProvider> {
        None
    }
}

/// A plain object known only by its key.
///
/// ```rust
/// use understory_data::{DataStore, Plain};
///
/// let mut store = DataStore::new();
/// let o = Plain(7_u32);
/// store.set(&o, "foo", 1_i32);
/// assert_eq!(store.get::<i32>(&o, "foo"), Some(&1));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Plain<K>(pub K);

impl<K: Copy + Eq + Hash> Subject for Plain<K> {
    type Key = K;

    fn key(&self) -> K {
        self.0
    }
}
