//! Equality between containers and against the empty sentinel.

use crate::erased_value::ErasedValue;

/// The "no value" sentinel.
///
/// An [`ErasedValue`] compares equal to `NoValue` exactly when it is empty,
/// and converting `NoValue` into a container yields an empty one.
///
/// ```
/// use core::any::Any;
///
/// use execution_chain::{ErasedValue, NoValue};
///
/// let mut value = ErasedValue::<dyn Any>::new(1_u8);
/// assert!(value != NoValue);
///
/// value = NoValue.into();
/// assert!(value == NoValue);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NoValue;

impl<T: ?Sized + 'static> From<NoValue> for ErasedValue<T> {
    fn from(_: NoValue) -> Self {
        Self::empty()
    }
}

/// Two containers are equal when both are empty, or when both hold objects
/// that compare equal through the bases' own equality.
///
/// Containers of different bases can be compared when `T: PartialEq<U>`.
impl<T, U> PartialEq<ErasedValue<U>> for ErasedValue<T>
where
    T: ?Sized + PartialEq<U> + 'static,
    U: ?Sized + 'static,
{
    fn eq(&self, other: &ErasedValue<U>) -> bool {
        match (self.get(), other.get()) {
            (None, None) => true,
            (Some(this), Some(other)) => this.eq(other),
            _ => false,
        }
    }
}

impl<T: ?Sized + Eq + 'static> Eq for ErasedValue<T> {}

impl<T: ?Sized + 'static> PartialEq<NoValue> for ErasedValue<T> {
    fn eq(&self, _: &NoValue) -> bool {
        self.is_empty()
    }
}

impl<T: ?Sized + 'static> PartialEq<ErasedValue<T>> for NoValue {
    fn eq(&self, other: &ErasedValue<T>) -> bool {
        other.is_empty()
    }
}
