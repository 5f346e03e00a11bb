// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deciding whether, and how, an object may carry data.

use alloc::boxed::Box;

use hashbrown::HashMap;

use crate::subject::{NodeKind, Subject};

/// Where an allowed object's record lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// The record is held in the store's side table, owned by the object's
    /// entry there. Used for plain objects.
    Direct,
    /// The object carries an [`IdentityTag`](crate::IdentityTag) and the
    /// record lives in the [`CentralRegistry`](crate::CentralRegistry).
    /// Used for element-like objects.
    Indexed,
}

/// The outcome of classifying an object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Data may be stored using the given strategy.
    Allowed(Strategy),
    /// The object never carries data.
    Denied,
}

impl Access {
    /// Returns the strategy if access is allowed.
    #[must_use]
    #[inline]
    pub fn strategy(self) -> Option<Strategy> {
        match self {
            Self::Allowed(strategy) => Some(strategy),
            Self::Denied => None,
        }
    }

    /// Returns `true` if access is allowed.
    #[must_use]
    #[inline]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed(_))
    }
}

/// A blocklist rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Denial {
    /// Deny unconditionally.
    Always,
    /// Deny unless the object's `attribute` equals `value` exactly.
    Unless {
        /// The attribute consulted.
        attribute: Box<str>,
        /// The value that lifts the denial.
        value: Box<str>,
    },
}

impl Denial {
    /// The attribute consulted by [`Denial::unless_classid`].
    pub const CLASSID: &'static str = "classid";

    /// Denies unless the `classid` attribute equals `value`.
    #[must_use]
    pub fn unless_classid(value: &str) -> Self {
        Self::Unless {
            attribute: Box::from(Self::CLASSID),
            value: Box::from(value),
        }
    }

    /// Returns `true` if this rule denies `subject`.
    #[must_use]
    pub fn denies<S: Subject + ?Sized>(&self, subject: &S) -> bool {
        match self {
            Self::Always => true,
            Self::Unless { attribute, value } => {
                let actual = subject.attributes().and_then(|a| a.attribute(attribute));
                actual.as_deref() != Some(&**value)
            }
        }
    }
}

/// Node names that never carry data.
///
/// Names match case-insensitively. A new [`Blocklist`] denies `embed`,
/// `applet` and `object`; [`Blocklist::empty`] starts with no rules.
///
/// ```rust
/// use understory_data::{Blocklist, Denial};
///
/// let mut blocklist = Blocklist::new();
/// assert_eq!(blocklist.rule("EMBED"), Some(&Denial::Always));
///
/// blocklist.deny("maxElement", Denial::Always);
/// assert_eq!(blocklist.rule("maxelement"), Some(&Denial::Always));
///
/// blocklist.allow("embed");
/// assert_eq!(blocklist.rule("embed"), None);
/// ```
#[derive(Clone, Debug)]
pub struct Blocklist {
    rules: HashMap<Box<str>, Denial>,
}

impl Default for Blocklist {
    fn default() -> Self {
        let mut blocklist = Self::empty();
        for name in Self::BUILT_IN {
            blocklist.deny(name, Denial::Always);
        }
        blocklist
    }
}

impl Blocklist {
    /// Node names denied by [`Blocklist::new`].
    pub const BUILT_IN: [&'static str; 3] = ["embed", "applet", "object"];

    /// Creates a blocklist with the built-in rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a blocklist without any rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Registers `rule` for `name`, replacing any previous rule.
    pub fn deny(&mut self, name: &str, rule: Denial) -> Option<Denial> {
        self.rules.insert(name.to_lowercase().into_boxed_str(), rule)
    }

    /// Removes the rule for `name`.
    pub fn allow(&mut self, name: &str) -> Option<Denial> {
        self.rules.remove(name.to_lowercase().as_str())
    }

    /// Returns the rule for `name`.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Denial> {
        self.rules.get(name.to_lowercase().as_str())
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns `true` if a rule denies `subject`.
    #[must_use]
    pub fn is_denied<S: Subject + ?Sized>(&self, subject: &S) -> bool {
        subject
            .node_name()
            .and_then(|name| self.rule(name))
            .is_some_and(|rule| rule.denies(subject))
    }
}

/// Classifies `subject` against `blocklist`.
///
/// In order:
///
/// 1. a matching blocklist rule denies;
/// 2. a node type that is some number other than `1` or `9` denies;
/// 3. a present, non-falsy node type selects [`Strategy::Indexed`];
/// 4. anything else selects [`Strategy::Direct`].
///
/// ```rust
/// use understory_data::{classify, Access, Blocklist, NodeType, Plain, Strategy, Subject};
///
/// struct Node(u32, f64);
///
/// impl Subject for Node {
///     type Key = u32;
///     fn key(&self) -> u32 {
///         self.0
///     }
///     fn node_type(&self) -> NodeType<'_> {
///         NodeType::Number(self.1)
///     }
/// }
///
/// let blocklist = Blocklist::new();
/// assert_eq!(classify(&blocklist, &Node(1, 1.0)), Access::Allowed(Strategy::Indexed));
/// assert_eq!(classify(&blocklist, &Node(2, 2.0)), Access::Denied);
/// assert_eq!(classify(&blocklist, &Plain(3_u32)), Access::Allowed(Strategy::Direct));
/// ```
#[must_use]
pub fn classify<S: Subject + ?Sized>(blocklist: &Blocklist, subject: &S) -> Access {
    if blocklist.is_denied(subject) {
        return Access::Denied;
    }
    match subject.node_type().kind() {
        NodeKind::OtherNumber => Access::Denied,
        NodeKind::Element | NodeKind::Document | NodeKind::Truthy => {
            Access::Allowed(Strategy::Indexed)
        }
        NodeKind::Absent | NodeKind::Falsy => Access::Allowed(Strategy::Direct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::{AttributeProvider, NodeType};
    use alloc::borrow::Cow;

    struct Named {
        name: &'static str,
        node_type: NodeType<'static>,
        classid: Option<&'static str>,
    }

    impl Named {
        fn plain(name: &'static str) -> Self {
            Self {
                name,
                node_type: NodeType::Absent,
                classid: None,
            }
        }
    }

    impl AttributeProvider for Named {
        fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
            (name == Denial::CLASSID)
                .then_some(self.classid)
                .flatten()
                .map(Cow::Borrowed)
        }
    }

    impl Subject for Named {
        type Key = &'static str;

        fn key(&self) -> &'static str {
            self.name
        }

        fn node_type(&self) -> NodeType<'_> {
            self.node_type
        }

        fn node_name(&self) -> Option<&str> {
            Some(self.name)
        }

        fn attributes(&self) -> Option<&dyn AttributeProvider> {
            Some(self)
        }
    }

    #[test]
    fn built_in_names_are_denied() {
        let blocklist = Blocklist::new();
        for name in ["embed", "APPLET", "Object"] {
            assert_eq!(classify(&blocklist, &Named::plain(name)), Access::Denied);
        }
        assert_eq!(
            classify(&blocklist, &Named::plain("p")),
            Access::Allowed(Strategy::Direct)
        );
    }

    #[test]
    fn empty_blocklist_denies_nothing() {
        let blocklist = Blocklist::empty();
        assert!(blocklist.is_empty());
        assert!(classify(&blocklist, &Named::plain("embed")).is_allowed());
    }

    #[test]
    fn rules_apply_from_next_classification() {
        let mut blocklist = Blocklist::new();
        let subject = Named::plain("maxelement");
        assert!(classify(&blocklist, &subject).is_allowed());

        blocklist.deny("maxElement", Denial::Always);
        assert_eq!(classify(&blocklist, &subject), Access::Denied);

        blocklist.allow("MAXELEMENT");
        assert!(classify(&blocklist, &subject).is_allowed());
    }

    #[test]
    fn conditional_rule_lifts_on_exact_value() {
        let mut blocklist = Blocklist::new();
        blocklist.deny("dataAllowed", Denial::unless_classid("flag"));

        let good = Named {
            classid: Some("flag"),
            ..Named::plain("dataAllowed")
        };
        let bad = Named::plain("dataAllowed");
        let close = Named {
            classid: Some("flag "),
            ..Named::plain("dataAllowed")
        };

        assert!(classify(&blocklist, &good).is_allowed());
        assert_eq!(classify(&blocklist, &bad), Access::Denied);
        assert_eq!(classify(&blocklist, &close), Access::Denied);
    }

    #[test]
    fn node_type_selects_strategy() {
        let blocklist = Blocklist::new();
        let indexed = [
            NodeType::Number(1.0),
            NodeType::Number(9.0),
            NodeType::Text("string"),
            NodeType::Text("inf"),
            NodeType::Text("0"),
            NodeType::Other(None),
            NodeType::Other(Some(0.0)),
            NodeType::Bool(true),
        ];
        for node_type in indexed {
            let subject = Named {
                node_type,
                ..Named::plain("p")
            };
            assert_eq!(
                classify(&blocklist, &subject),
                Access::Allowed(Strategy::Indexed),
                "{node_type:?}"
            );
        }

        let denied = [
            NodeType::Number(2.0),
            NodeType::Text("4"),
            NodeType::Text("0x2"),
            NodeType::Text("Infinity"),
            NodeType::Other(Some(2.0)),
        ];
        for node_type in denied {
            let subject = Named {
                node_type,
                ..Named::plain("p")
            };
            assert_eq!(classify(&blocklist, &subject), Access::Denied, "{node_type:?}");
        }

        let direct = [NodeType::Number(0.0), NodeType::Bool(false), NodeType::Absent];
        for node_type in direct {
            let subject = Named {
                node_type,
                ..Named::plain("p")
            };
            assert_eq!(
                classify(&blocklist, &subject),
                Access::Allowed(Strategy::Direct),
                "{node_type:?}"
            );
        }
    }

    #[test]
    fn access_helpers() {
        assert_eq!(Access::Allowed(Strategy::Direct).strategy(), Some(Strategy::Direct));
        assert_eq!(Access::Denied.strategy(), None);
        assert!(!Access::Denied.is_allowed());
    }
}
