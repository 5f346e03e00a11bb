// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity tags for element-like objects.

use core::fmt;
use core::num::NonZeroU64;

/// A numeric handle linking an object to its record in the
/// [`CentralRegistry`](crate::CentralRegistry).
///
/// Tags are never zero; `Option<IdentityTag>` is the "no tag" state and has
/// the same size as a tag.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityTag(NonZeroU64);

impl IdentityTag {
    /// Creates a tag from a raw value, or `None` for zero.
    #[must_use]
    #[inline]
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// Returns the raw value.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for IdentityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IdentityTag").field(&self.0).finish()
    }
}

impl fmt::Display for IdentityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues [`IdentityTag`]s from a monotonically increasing counter.
///
/// The first tag is `1`. Tags are never reused, even after the record they
/// named has been released.
///
/// ```rust
/// use understory_data::IdentityTagger;
///
/// let mut tagger = IdentityTagger::new();
/// let a = tagger.issue();
/// let b = tagger.issue();
/// assert_eq!(a.get(), 1);
/// assert!(b > a);
/// ```
#[derive(Clone, Debug)]
pub struct IdentityTagger {
    next: NonZeroU64,
}

impl Default for IdentityTagger {
    fn default() -> Self {
        Self {
            next: NonZeroU64::MIN,
        }
    }
}

impl IdentityTagger {
    /// Creates a tagger whose first tag is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tag the next call to [`issue`](Self::issue) hands out.
    #[must_use]
    #[inline]
    pub fn peek_next(&self) -> IdentityTag {
        IdentityTag(self.next)
    }

    /// Issues a fresh tag.
    ///
    /// # Panics
    ///
    /// Panics if the counter is exhausted (after `u64::MAX - 1` tags).
    pub fn issue(&mut self) -> IdentityTag {
        let tag = IdentityTag(self.next);
        self.next = self
            .next
            .checked_add(1)
            .unwrap_or_else(|| panic!("Identity tags exhausted (max {})", u64::MAX));
        tag
    }
}
