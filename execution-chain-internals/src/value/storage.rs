//! The three storage kinds a [`RawValue`] can hold.
//!
//! A storage knows the concrete type of the value and is responsible for
//! every operation that needs it: viewing the value as the base type `T`,
//! copying it, reporting its type and producing a thin pointer to it for
//! downcasting. The vtable is generated from these methods, so the storage
//! type is the only thing that has to be remembered across erasure.

use alloc::boxed::Box;
use core::{
    any::{TypeId, type_name},
    mem::ManuallyDrop,
    ptr::NonNull,
};

use crate::{
    strategies::{CopyStrategy, Upcast},
    value::raw::RawValue,
};

/// Operations that the vtable of a [`RawValue<T>`] dispatches to.
pub(crate) trait Storage<T: ?Sized + 'static>: Sized + 'static {
    /// Views the stored value as the base type.
    fn base(&self) -> &T;

    /// Views the stored value as the base type, mutably.
    fn base_mut(&mut self) -> &mut T;

    /// Produces an independent storage holding a copy of the value.
    fn duplicate(&self) -> Self;

    /// The [`TypeId`] of the concrete value.
    fn concrete_type_id(&self) -> TypeId;

    /// The [`core::any::type_name`] of the concrete value.
    fn concrete_type_name(&self) -> &'static str;

    /// A thin pointer to the concrete value.
    fn concrete_ptr(&self) -> NonNull<()>;

    /// A thin pointer to the concrete value that may be used for writes.
    fn concrete_ptr_mut(&mut self) -> NonNull<()>;
}

/// A value held directly inside the allocation, copied through [`Clone`].
pub(super) struct Inline<U>(
    /// The held value.
    pub(super) U,
);

impl<T, U> Storage<T> for Inline<U>
where
    T: ?Sized + Upcast<U>,
    U: Clone + 'static,
{
    #[inline]
    fn base(&self) -> &T {
        T::upcast_ref(&self.0)
    }

    #[inline]
    fn base_mut(&mut self) -> &mut T {
        T::upcast_mut(&mut self.0)
    }

    #[inline]
    fn duplicate(&self) -> Self {
        Inline(self.0.clone())
    }

    #[inline]
    fn concrete_type_id(&self) -> TypeId {
        TypeId::of::<U>()
    }

    #[inline]
    fn concrete_type_name(&self) -> &'static str {
        type_name::<U>()
    }

    #[inline]
    fn concrete_ptr(&self) -> NonNull<()> {
        NonNull::from(&self.0).cast::<()>()
    }

    #[inline]
    fn concrete_ptr_mut(&mut self) -> NonNull<()> {
        NonNull::from(&mut self.0).cast::<()>()
    }
}

/// A value handed over as a [`Box`], copied and destroyed by a
/// [`CopyStrategy`].
pub(super) struct External<U: ?Sized + 'static, C: CopyStrategy<U>> {
    /// The boxed value.
    ///
    /// # Safety
    ///
    /// The box is only taken out of the [`ManuallyDrop`] in the [`Drop`]
    /// implementation, so it is initialized whenever any other method runs.
    value: ManuallyDrop<Box<U>>,
    /// The strategy used for copying and disposing of `value`.
    strategy: C,
}

impl<U: ?Sized + 'static, C: CopyStrategy<U>> External<U, C> {
    /// Creates a new [`External`] storage.
    #[inline]
    pub(super) fn new(value: Box<U>, strategy: C) -> Self {
        Self {
            value: ManuallyDrop::new(value),
            strategy,
        }
    }
}

impl<U: ?Sized + 'static, C: CopyStrategy<U>> Drop for External<U, C> {
    fn drop(&mut self) {
        // SAFETY: `self.value` is initialized until this point and is never
        // accessed again, since we are inside the `Drop` implementation.
        let value = unsafe { ManuallyDrop::take(&mut self.value) };
        self.strategy.dispose(value);
    }
}

impl<T, U, C> Storage<T> for External<U, C>
where
    T: ?Sized + Upcast<U>,
    U: ?Sized + 'static,
    C: CopyStrategy<U>,
{
    #[inline]
    fn base(&self) -> &T {
        T::upcast_ref(&**self.value)
    }

    #[inline]
    fn base_mut(&mut self) -> &mut T {
        T::upcast_mut(&mut **self.value)
    }

    #[inline]
    fn duplicate(&self) -> Self {
        Self::new(self.strategy.copy(&**self.value), self.strategy.clone())
    }

    #[inline]
    fn concrete_type_id(&self) -> TypeId {
        TypeId::of::<U>()
    }

    #[inline]
    fn concrete_type_name(&self) -> &'static str {
        type_name::<U>()
    }

    #[inline]
    fn concrete_ptr(&self) -> NonNull<()> {
        NonNull::from(&**self.value).cast::<()>()
    }

    #[inline]
    fn concrete_ptr_mut(&mut self) -> NonNull<()> {
        NonNull::from(&mut **self.value).cast::<()>()
    }
}

/// A value of a more specific base type `D`, viewed as `T` through
/// [`Upcast`].
///
/// Every operation other than the base view is forwarded to the inner value
/// untouched, so the concrete type seen through the delegate is the concrete
/// type of the inner value.
pub(super) struct Delegate<D: ?Sized + 'static> {
    /// The wrapped value.
    pub(super) inner: RawValue<D>,
}

impl<T, D> Storage<T> for Delegate<D>
where
    T: ?Sized + Upcast<D>,
    D: ?Sized + 'static,
{
    #[inline]
    fn base(&self) -> &T {
        T::upcast_ref(self.inner.as_ref().base())
    }

    #[inline]
    fn base_mut(&mut self) -> &mut T {
        T::upcast_mut(self.inner.as_mut().base_mut())
    }

    #[inline]
    fn duplicate(&self) -> Self {
        Delegate {
            inner: self.inner.as_ref().duplicate(),
        }
    }

    #[inline]
    fn concrete_type_id(&self) -> TypeId {
        self.inner.as_ref().concrete_type_id()
    }

    #[inline]
    fn concrete_type_name(&self) -> &'static str {
        self.inner.as_ref().concrete_type_name()
    }

    #[inline]
    fn concrete_ptr(&self) -> NonNull<()> {
        self.inner.as_ref().concrete_ptr()
    }

    #[inline]
    fn concrete_ptr_mut(&mut self) -> NonNull<()> {
        self.inner.as_mut().concrete_ptr_mut()
    }
}
