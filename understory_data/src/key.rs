// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key normalization.
//!
//! Callers may spell a key either hyphenated (`foo-bar`) or in camel case
//! (`fooBar`). Both spellings address the same slot: every key is passed
//! through [`camel_case`] before it touches a silo. The reverse direction,
//! [`hyphenate`], is only used to build attribute names for seeding.

use alloc::borrow::Cow;
use alloc::string::String;

/// Converts a key into its canonical camel case form.
///
/// Every `-` followed by an ASCII lowercase letter is replaced by the
/// uppercase letter, scanning left to right without overlap. Any other `-`
/// is kept as is.
///
/// Already canonical keys are returned borrowed, so this is a fixed point:
///
/// ```rust
/// use understory_data::camel_case;
///
/// assert_eq!(camel_case("foo-bar"), "fooBar");
/// assert_eq!(camel_case("fooBar"), "fooBar");
/// assert_eq!(camel_case(&camel_case("foo-bar-baz")), "fooBarBaz");
/// ```
#[must_use]
pub fn camel_case(key: &str) -> Cow<'_, str> {
    if !needs_camel_case(key) {
        return Cow::Borrowed(key);
    }

    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-'
            && let Some(&next) = chars.peek()
            && next.is_ascii_lowercase()
        {
            out.push(next.to_ascii_uppercase());
            chars.next();
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn needs_camel_case(key: &str) -> bool {
    key.as_bytes()
        .windows(2)
        .any(|pair| pair[0] == b'-' && pair[1].is_ascii_lowercase())
}

/// Converts a camel case key into its hyphenated form.
///
/// Every ASCII uppercase letter becomes `-` followed by its lowercase form.
///
/// ```rust
/// use understory_data::hyphenate;
///
/// assert_eq!(hyphenate("fooBar"), "foo-bar");
/// assert_eq!(hyphenate("foo"), "foo");
/// ```
#[must_use]
pub fn hyphenate(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Builds the attribute name consulted when seeding `key`.
///
/// The key is normalized first, so both spellings map to the same attribute:
///
/// ```rust
/// use understory_data::attribute_name;
///
/// assert_eq!(attribute_name("data-", "fooBar"), "data-foo-bar");
/// assert_eq!(attribute_name("data-", "foo-bar"), "data-foo-bar");
/// ```
#[must_use]
pub fn attribute_name(prefix: &str, key: &str) -> String {
    let hyphenated = hyphenate(&camel_case(key));
    let mut name = String::with_capacity(prefix.len() + hyphenated.len());
    name.push_str(prefix);
    name.push_str(&hyphenated);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_converts_hyphen_lowercase_pairs() {
        assert_eq!(camel_case("foo-bar"), "fooBar");
        assert_eq!(camel_case("foo-bar-baz"), "fooBarBaz");
        assert_eq!(camel_case("-foo"), "Foo");
    }

    #[test]
    fn camel_case_keeps_other_hyphens() {
        assert_eq!(camel_case("foo-1"), "foo-1");
        assert_eq!(camel_case("foo-Bar"), "foo-Bar");
        assert_eq!(camel_case("foo-"), "foo-");
        // Non-overlapping: the first hyphen has no letter after it.
        assert_eq!(camel_case("a--b"), "a-B");
    }

    #[test]
    fn camel_case_borrows_canonical_keys() {
        assert!(matches!(camel_case("fooBar"), Cow::Borrowed("fooBar")));
        assert!(matches!(camel_case(""), Cow::Borrowed("")));
        assert!(matches!(camel_case("foo-bar"), Cow::Owned(_)));
    }

    #[test]
    fn camel_case_is_idempotent() {
        for key in ["foo-bar", "fooBar", "a--b", "x-y-z", "data", "-a-b-"] {
            let once = camel_case(key).into_owned();
            assert_eq!(camel_case(&once), once.as_str(), "key {key:?}");
        }
    }

    #[test]
    fn hyphenate_lowers_capitals() {
        assert_eq!(hyphenate("fooBarBaz"), "foo-bar-baz");
        assert_eq!(hyphenate("URL"), "-u-r-l");
        assert_eq!(hyphenate(""), "");
    }

    #[test]
    fn attribute_name_uses_prefix() {
        assert_eq!(attribute_name("data-", "foo"), "data-foo");
        assert_eq!(attribute_name("x-", "fooBar"), "x-foo-bar");
    }
}
