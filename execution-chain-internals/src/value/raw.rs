//! Type-erased value pointer types.
//!
//! This module encapsulates the `ptr` field of [`RawValue`], [`RawValueRef`]
//! and [`RawValueMut`], ensuring it is only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the pointer always
//! comes from `Box<ValueData<T, S>>`**.
//!
//! # Safety Invariant
//!
//! Since the `ptr` field can only be set via [`RawValue::from_storage`] (which
//! creates it from `Box::into_raw`), and cannot be modified afterward (no `pub`
//! or `pub(crate)` fields), the pointer provenance remains valid throughout the
//! value's lifetime.
//!
//! The [`RawValue::drop`] implementation relies on this invariant to safely
//! reconstruct the `Box` and deallocate the memory.
//!
//! # Type Erasure
//!
//! The storage type parameter `S` is erased by casting to
//! `ValueData<T, Erased>`. The base type `T` is kept, so the vtable can hand
//! out `&T` and `&mut T` views without knowing the concrete type.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::{
    strategies::{CopyStrategy, Upcast},
    util::Erased,
    value::{
        data::ValueData,
        storage::{Delegate, External, Inline, Storage},
    },
};

/// A pointer to a [`ValueData`] that is guaranteed to point to an
/// initialized instance of a [`ValueData<T, S>`] for some specific `S`,
/// though we do not know which actual `S` it is.
///
/// However, the pointer is allowed to transition into a non-initialized state
/// inside the [`RawValue::drop`] method.
///
/// The pointer is guaranteed to have been created using [`Box::into_raw`].
///
/// We cannot use a [`Box<ValueData<T, S>>`] directly, because that does not
/// allow us to type-erase the `S`.
#[repr(transparent)]
pub struct RawValue<T: ?Sized + 'static> {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<T, S>>`
    ///    for some `S` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ValueData<T, S>` for the entire
    ///    lifetime of this object.
    /// 3. The pointee is properly initialized for the entire lifetime of this
    ///    object, except during the execution of the `Drop` implementation.
    /// 4. This object has exclusive ownership of the pointee.
    ptr: NonNull<ValueData<T, Erased>>,
}

impl<T: ?Sized + 'static> RawValue<T> {
    /// Creates a new [`RawValue`] around the specified storage.
    #[inline]
    pub(super) fn from_storage<S: Storage<T>>(storage: S) -> Self {
        let ptr = Box::new(ValueData::new(storage));
        let ptr: *mut ValueData<T, S> = Box::into_raw(ptr);
        let ptr: *mut ValueData<T, Erased> = ptr.cast::<ValueData<T, Erased>>();

        // SAFETY: `Box::into_raw` returns a non-null pointer
        let ptr: NonNull<ValueData<T, Erased>> = unsafe { NonNull::new_unchecked(ptr) };

        Self { ptr }
    }

    /// Creates a new [`RawValue`] holding `value` directly.
    ///
    /// Copies of the returned value are made with [`Clone`].
    #[inline]
    pub fn new_inline<U>(value: U) -> Self
    where
        U: Clone + 'static,
        T: Upcast<U>,
    {
        Self::from_storage(Inline(value))
    }

    /// Creates a new [`RawValue`] taking over an already boxed value.
    ///
    /// Copies of the returned value are made with `strategy`, and the value is
    /// destroyed through [`CopyStrategy::dispose`].
    #[inline]
    pub fn new_external<U, C>(value: Box<U>, strategy: C) -> Self
    where
        U: ?Sized + 'static,
        C: CopyStrategy<U>,
        T: Upcast<U>,
    {
        Self::from_storage(External::new(value, strategy))
    }

    /// Creates a new [`RawValue`] that views a value of the more specific
    /// base type `D` as `T`.
    ///
    /// No copy of the inner value is made; the returned value takes over
    /// ownership of `inner`.
    #[inline]
    pub fn new_delegate<D>(inner: RawValue<D>) -> Self
    where
        D: ?Sized + 'static,
        T: Upcast<D>,
    {
        Self::from_storage(Delegate { inner })
    }

    /// Returns a reference to the [`ValueData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawValueRef<'_, T> {
        RawValueRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Returns a mutable reference to the [`ValueData`] instance.
    #[inline]
    pub fn as_mut(&mut self) -> RawValueMut<'_, T> {
        RawValueMut {
            // SAFETY:
            // 1. The pointer comes from `Box::into_raw` (guaranteed by `RawValue`'s invariant)
            // 2. We are creating the `RawValueMut` here, and we are not changing the pointer
            // 3. Exclusive access is guaranteed since we own the allocation and hold
            //    `&mut self` for the lifetime of the returned value
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }
}

impl<T: ?Sized + 'static> core::ops::Drop for RawValue<T> {
    #[inline]
    fn drop(&mut self) {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The pointer comes from `Box::into_raw` (guaranteed by
        //    `RawValue::from_storage`)
        // 2. The vtable returned by `self.as_ref().vtable()` is guaranteed to match the
        //    data in the `ValueData`.
        // 3. The pointer is initialized and has not been previously free as guaranteed
        //    by the invariants on this type. We are correctly transferring ownership
        //    here and the pointer is not used afterwards, as we are in the drop
        //    function.
        unsafe {
            vtable.drop(self.ptr);
        }
    }
}

/// A lifetime-bound pointer to a [`ValueData`] that is guaranteed to point to
/// an initialized instance of a [`ValueData<T, S>`] for some specific `S`,
/// though we do not know which actual `S` it is.
///
/// We cannot use a [`&'a ValueData<T, S>`] directly, because that would
/// require us to know the actual storage type, which we do not.
///
/// [`&'a ValueData<T, S>`]: ValueData
#[repr(transparent)]
pub struct RawValueRef<'a, T: ?Sized + 'static> {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<T, S>>`
    ///    for some `S` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ValueData<T, S>` for the entire
    ///    lifetime of this object.
    ptr: NonNull<ValueData<T, Erased>>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a ValueData<T, Erased>`
    _marker: core::marker::PhantomData<&'a ValueData<T, Erased>>,
}

impl<T: ?Sized + 'static> Clone for RawValueRef<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized + 'static> Copy for RawValueRef<'_, T> {}

impl<'a, T: ?Sized + 'static> RawValueRef<'a, T> {
    /// Casts the [`RawValueRef`] to a [`ValueData<T, S>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `S` matches the actual storage type stored in the
    ///    [`ValueData`].
    #[inline]
    pub(super) unsafe fn cast_inner<S: 'static>(self) -> &'a ValueData<T, S> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable().storage_type_id(), TypeId::of::<S>());

        let this = self.ptr.cast::<ValueData<T, S>>();
        // SAFETY: Converting the NonNull pointer to a reference is sound because:
        // - The pointer is non-null, properly aligned, and dereferenceable (guaranteed
        //   by RawValueRef's type invariants)
        // - The pointee is properly initialized (RawValueRef's doc comment
        //   guarantees it points to an initialized ValueData<T, S> for some S)
        // - The type `S` matches the actual storage type (guaranteed by caller)
        // - Shared access is allowed
        // - The reference lifetime 'a is valid (tied to RawValueRef<'a>'s lifetime)
        unsafe { this.as_ref() }
    }

    /// Returns a raw pointer to the [`ValueData`] instance.
    #[inline]
    pub(super) fn as_ptr(self) -> *const ValueData<T, Erased> {
        self.ptr.as_ptr()
    }

    /// Returns the value viewed as the base type `T`.
    #[inline]
    pub fn base(self) -> &'a T {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `ValueData`.
        unsafe { vtable.base(self) }
    }

    /// Returns the [`TypeId`] of the concrete value.
    ///
    /// For values created with [`RawValue::new_delegate`], this is the type
    /// of the innermost value.
    #[inline]
    pub fn concrete_type_id(self) -> TypeId {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `ValueData`.
        unsafe { vtable.concrete_type_id(self) }
    }

    /// Returns the [`core::any::type_name`] of the concrete value.
    #[inline]
    pub fn concrete_type_name(self) -> &'static str {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `ValueData`.
        unsafe { vtable.concrete_type_name(self) }
    }

    /// Returns a thin pointer to the concrete value.
    #[inline]
    pub(super) fn concrete_ptr(self) -> NonNull<()> {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `ValueData`.
        unsafe { vtable.concrete_ptr(self) }
    }

    /// Creates an independent copy of the value using the copy operation
    /// captured when the value was created.
    #[inline]
    pub fn duplicate(self) -> RawValue<T> {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `ValueData`.
        unsafe { vtable.duplicate(self) }
    }

    /// Returns a reference to the concrete value if it is of type `U`.
    #[inline]
    pub fn downcast<U: 'static>(self) -> Option<&'a U> {
        if self.concrete_type_id() != TypeId::of::<U>() {
            return None;
        }

        let ptr = self.concrete_ptr().cast::<U>();
        // SAFETY:
        // - The concrete value has type `U`, as we just checked its `TypeId`
        // - The pointer was derived from a shared reference into the `ValueData`,
        //   which lives for at least `'a`
        // - Only shared access is handed out, matching the borrow we hold
        Some(unsafe { ptr.as_ref() })
    }
}

/// A mutable lifetime-bound pointer to a [`ValueData`] that is guaranteed to
/// point to an initialized instance of a [`ValueData<T, S>`] for some
/// specific `S`, though we do not know which actual `S` it is.
///
/// We cannot use a [`&'a mut ValueData<T, S>`] directly, because that would
/// require us to know the actual storage type, which we do not.
///
/// [`&'a mut ValueData<T, S>`]: ValueData
#[repr(transparent)]
pub struct RawValueMut<'a, T: ?Sized + 'static> {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<T, S>>`
    ///    for some `S` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ValueData<T, S>` for the entire
    ///    lifetime of this object.
    /// 3. This pointer is valid for exclusive mutable access to the
    ///    `ValueData` with the same semantics as a `&'a mut ValueData<T, S>`.
    ptr: NonNull<ValueData<T, Erased>>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a mut ValueData<T, Erased>`
    _marker: core::marker::PhantomData<&'a mut ValueData<T, Erased>>,
}

impl<'a, T: ?Sized + 'static> RawValueMut<'a, T> {
    /// Casts the [`RawValueMut`] to a mutable [`ValueData<T, S>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `S` matches the actual storage type stored in the
    ///    [`ValueData`].
    #[inline]
    pub(super) unsafe fn cast_inner<S: 'static>(self) -> &'a mut ValueData<T, S> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.as_ref().vtable().storage_type_id(), TypeId::of::<S>());

        let mut this = self.ptr.cast::<ValueData<T, S>>();
        // SAFETY: Converting the NonNull pointer to a mutable reference is sound
        // because:
        // - The pointer is non-null, properly aligned, and dereferenceable (guaranteed
        //   by RawValueMut's type invariants)
        // - The pointee is properly initialized (RawValueMut's doc comment guarantees
        //   it points to an initialized ValueData<T, S> for some S)
        // - The type `S` matches the actual storage type (guaranteed by caller)
        // - Exclusive access is guaranteed by RawValueMut's invariants
        // - The reference lifetime 'a is valid (tied to RawValueMut<'a>'s lifetime)
        unsafe { this.as_mut() }
    }

    /// Returns a shared reference to the [`ValueData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawValueRef<'_, T> {
        RawValueRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Reborrows the mutable reference for a shorter lifetime.
    #[inline]
    pub fn reborrow<'b>(&'b mut self) -> RawValueMut<'b, T> {
        RawValueMut {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Returns the value viewed as the base type `T`, mutably.
    #[inline]
    pub fn base_mut(self) -> &'a mut T {
        let vtable = self.as_ref().vtable();
        // SAFETY:
        // 1. The vtable returned by `self.as_ref().vtable()` is guaranteed to match the
        //    data in the `ValueData`.
        unsafe { vtable.base_mut(self) }
    }

    /// Returns a thin pointer to the concrete value that may be used for
    /// writes.
    #[inline]
    pub(super) fn concrete_ptr_mut(self) -> NonNull<()> {
        let vtable = self.as_ref().vtable();
        // SAFETY:
        // 1. The vtable returned by `self.as_ref().vtable()` is guaranteed to match the
        //    data in the `ValueData`.
        unsafe { vtable.concrete_ptr_mut(self) }
    }

    /// Returns a mutable reference to the concrete value if it is of type
    /// `U`.
    #[inline]
    pub fn downcast_mut<U: 'static>(self) -> Option<&'a mut U> {
        if self.as_ref().concrete_type_id() != TypeId::of::<U>() {
            return None;
        }

        let mut ptr = self.concrete_ptr_mut().cast::<U>();
        // SAFETY:
        // - The concrete value has type `U`, as we just checked its `TypeId`
        // - The pointer was derived from a mutable reference into the `ValueData`,
        //   which lives for at least `'a`
        // - `self` was consumed, so the returned reference is the only access path
        Some(unsafe { ptr.as_mut() })
    }
}

#[cfg(test)]
mod tests {
    use alloc::{boxed::Box, string::String};
    use core::any::Any;

    use super::*;
    use crate::strategies::DefaultCopy;

    #[test]
    fn test_raw_value_size() {
        assert_eq!(
            core::mem::size_of::<RawValue<dyn Any>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawValue<dyn Any>>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Result<String, RawValue<str>>>(),
            core::mem::size_of::<String>()
        );
        assert_eq!(
            core::mem::size_of::<RawValueRef<'_, dyn Any>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawValueMut<'_, dyn Any>>>(),
            core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_raw_value_get_refs() {
        let value = RawValue::<i32>::new_inline(100);
        let value_ref = value.as_ref();

        // Accessing the pointer multiple times should be safe and consistent
        let ptr1 = value_ref.as_ptr();
        let ptr2 = value_ref.as_ptr();
        assert_eq!(ptr1, ptr2);
        assert_eq!(*value_ref.base(), 100);
    }

    #[test]
    fn test_raw_value_downcast() {
        let int_value = RawValue::<dyn Any>::new_inline(42_i32);
        let string_value = RawValue::<dyn Any>::new_inline(String::from("test"));

        let int_ref = int_value.as_ref();
        let string_ref = string_value.as_ref();

        assert_eq!(int_ref.concrete_type_id(), TypeId::of::<i32>());
        assert_eq!(string_ref.concrete_type_id(), TypeId::of::<String>());

        assert_eq!(int_ref.downcast::<i32>(), Some(&42));
        assert_eq!(int_ref.downcast::<String>(), None);
        assert_eq!(string_ref.downcast::<String>().map(String::as_str), Some("test"));

        // The vtables should be different
        assert!(!core::ptr::eq(int_ref.vtable(), string_ref.vtable()));
    }

    #[test]
    fn test_raw_value_mutation() {
        let mut value = RawValue::<dyn Any>::new_inline(String::from("exec"));
        value
            .as_mut()
            .downcast_mut::<String>()
            .unwrap()
            .push_str("ution");
        assert_eq!(
            value.as_ref().downcast::<String>().map(String::as_str),
            Some("execution")
        );
        assert!(value.as_mut().downcast_mut::<i32>().is_none());
    }

    #[test]
    fn test_raw_value_mut_reborrow() {
        let mut value = RawValue::<dyn Any>::new_inline(1_u16);
        let mut outer = value.as_mut();

        if let Some(inner) = outer.reborrow().downcast_mut::<u16>() {
            *inner += 1;
        }
        if let Some(inner) = outer.reborrow().downcast_mut::<u16>() {
            *inner *= 10;
        }
        assert_eq!(outer.as_ref().downcast::<u16>(), Some(&20));
    }

    #[test]
    fn test_raw_value_duplicate_is_deep() {
        let mut original = RawValue::<dyn Any>::new_external(Box::new(7_u64), DefaultCopy);
        let copy = original.as_ref().duplicate();

        *original.as_mut().downcast_mut::<u64>().unwrap() = 8;

        assert_eq!(original.as_ref().downcast::<u64>(), Some(&8));
        assert_eq!(copy.as_ref().downcast::<u64>(), Some(&7));
        assert_eq!(copy.as_ref().concrete_type_id(), TypeId::of::<u64>());
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawValue<dyn Any>: Send, Sync);
        static_assertions::assert_not_impl_any!(RawValueRef<'_, dyn Any>: Send, Sync);
        static_assertions::assert_not_impl_any!(RawValueMut<'_, dyn Any>: Send, Sync);
    }
}
