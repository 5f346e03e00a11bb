// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased stored values.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use core::fmt;

/// A value held in a silo.
///
/// Silos are heterogeneous: one object may carry a `String` under one key and
/// a callback handle under another. `DataValue` erases the type and recovers
/// it by downcasting.
///
/// Values seeded from attributes are always `String`. Stored values are
/// `Send + Sync`, so a store holding them can be shared behind a lock.
///
/// ```rust
/// use understory_data::DataValue;
///
/// let value = DataValue::new(String::from("bar"));
/// assert_eq!(value.as_str(), Some("bar"));
/// assert_eq!(value.downcast_ref::<i32>(), None);
/// ```
pub struct DataValue {
    inner: Box<dyn AnyClone>,
}

impl DataValue {
    /// Wraps `value`.
    #[must_use]
    pub fn new<T: Clone + Send + Sync + 'static>(value: T) -> Self {
        Self {
            inner: Box::new(value),
        }
    }

    /// Returns the [`TypeId`] of the wrapped value.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.inner.as_any().type_id()
    }

    /// Returns `true` if the wrapped value is a `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.inner.as_any().is::<T>()
    }

    /// Returns the wrapped value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref()
    }

    /// Returns the wrapped value mutably if it is a `T`.
    #[must_use]
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.inner.as_any_mut().downcast_mut()
    }

    /// Returns the wrapped text for `String` and `&'static str` values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        let any = self.inner.as_any();
        any.downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| any.downcast_ref::<&'static str>().copied())
    }
}

impl Clone for DataValue {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_boxed(),
        }
    }
}

impl fmt::Debug for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => f.debug_tuple("DataValue").field(&text).finish(),
            None => f
                .debug_struct("DataValue")
                .field("type_id", &self.type_id())
                .finish_non_exhaustive(),
        }
    }
}

trait AnyClone: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_boxed(&self) -> Box<dyn AnyClone>;
}

impl<T: Clone + Send + Sync + 'static> AnyClone for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn AnyClone> {
        Box::new(self.clone())
    }
}
