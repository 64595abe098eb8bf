//! Vtable for type-erased value operations.
//!
//! This module contains the [`ValueVtable`] which enables operating on values
//! whose storage type `S` has been erased. The vtable stores function pointers
//! that dispatch to the correct typed implementations.
//!
//! This module encapsulates the fields of [`ValueVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameters must match the actual storage
//! stored in the [`ValueData`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`ValueVtable::new`], which pairs the function pointers
//! with a specific storage type `S` at compile time.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::{
    util::Erased,
    value::{
        data::ValueData,
        raw::{RawValue, RawValueMut, RawValueRef},
        storage::Storage,
    },
};

/// Vtable for type-erased value operations.
///
/// Contains function pointers for performing operations on values without
/// knowing their storage type at compile time.
///
/// # Safety Invariant
///
/// All function pointer fields are guaranteed to point to the functions
/// defined below instantiated with the storage type `S` that was used to
/// create this [`ValueVtable`].
pub(crate) struct ValueVtable<T: ?Sized + 'static> {
    /// Gets the [`TypeId`] of the storage type that was used to create this
    /// [`ValueVtable`].
    storage_type_id: fn() -> TypeId,
    /// Drops the [`Box<ValueData<T, S>>`] instance pointed to by this pointer.
    drop: unsafe fn(NonNull<ValueData<T, Erased>>),
    /// Copies the value into a new, independent [`RawValue`].
    duplicate: unsafe fn(RawValueRef<'_, T>) -> RawValue<T>,
    /// Views the value as the base type.
    base: unsafe fn(RawValueRef<'_, T>) -> &'_ T,
    /// Views the value as the base type, mutably.
    base_mut: unsafe fn(RawValueMut<'_, T>) -> &'_ mut T,
    /// Gets the [`TypeId`] of the concrete value.
    concrete_type_id: unsafe fn(RawValueRef<'_, T>) -> TypeId,
    /// Gets the type name of the concrete value.
    concrete_type_name: unsafe fn(RawValueRef<'_, T>) -> &'static str,
    /// Gets a thin pointer to the concrete value.
    concrete_ptr: unsafe fn(RawValueRef<'_, T>) -> NonNull<()>,
    /// Gets a thin pointer to the concrete value valid for writes.
    concrete_ptr_mut: unsafe fn(RawValueMut<'_, T>) -> NonNull<()>,
}

impl<T: ?Sized + 'static> ValueVtable<T> {
    /// Creates a new [`ValueVtable`] for the storage type `S`.
    pub(super) const fn new<S: Storage<T>>() -> &'static Self {
        const {
            &Self {
                storage_type_id: TypeId::of::<S>,
                drop: drop::<T, S>,
                duplicate: duplicate::<T, S>,
                base: base::<T, S>,
                base_mut: base_mut::<T, S>,
                concrete_type_id: concrete_type_id::<T, S>,
                concrete_type_name: concrete_type_name::<T, S>,
                concrete_ptr: concrete_ptr::<T, S>,
                concrete_ptr_mut: concrete_ptr_mut::<T, S>,
            }
        }
    }

    /// Gets the [`TypeId`] of the storage type that was used to create this
    /// [`ValueVtable`].
    #[inline]
    pub(super) fn storage_type_id(&self) -> TypeId {
        (self.storage_type_id)()
    }

    /// Drops the `Box<ValueData<T, S>>` instance pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`Box<ValueData<T, S>>`] via
    ///    [`Box::into_raw`]
    /// 2. This [`ValueVtable`] must be a vtable for the storage type stored in
    ///    the [`ValueData`].
    /// 3. This method drops the [`Box<ValueData<T, S>>`], so the caller must
    ///    ensure that the pointer has not previously been dropped, that it is
    ///    able to transfer ownership of the pointer, and that it will not use
    ///    the pointer after calling this method.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<ValueData<T, Erased>>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<T, S>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }

    /// Copies the value with the copy operation of its storage.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ValueVtable`] must be a vtable for the storage type stored in
    ///    the [`RawValueRef`].
    #[inline]
    pub(super) unsafe fn duplicate(&self, ptr: RawValueRef<'_, T>) -> RawValue<T> {
        // SAFETY: We know that `self.duplicate` points to the function
        // `duplicate::<T, S>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.duplicate)(ptr) }
    }

    /// Views the value as the base type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ValueVtable`] must be a vtable for the storage type stored in
    ///    the [`RawValueRef`].
    #[inline]
    pub(super) unsafe fn base<'a>(&self, ptr: RawValueRef<'a, T>) -> &'a T {
        // SAFETY: We know that `self.base` points to the function `base::<T, S>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.base)(ptr) }
    }

    /// Views the value as the base type, mutably.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ValueVtable`] must be a vtable for the storage type stored in
    ///    the [`RawValueMut`].
    #[inline]
    pub(super) unsafe fn base_mut<'a>(&self, ptr: RawValueMut<'a, T>) -> &'a mut T {
        // SAFETY: We know that `self.base_mut` points to the function
        // `base_mut::<T, S>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.base_mut)(ptr) }
    }

    /// Gets the [`TypeId`] of the concrete value.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ValueVtable`] must be a vtable for the storage type stored in
    ///    the [`RawValueRef`].
    #[inline]
    pub(super) unsafe fn concrete_type_id(&self, ptr: RawValueRef<'_, T>) -> TypeId {
        // SAFETY: We know that `self.concrete_type_id` points to the function
        // `concrete_type_id::<T, S>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.concrete_type_id)(ptr) }
    }

    /// Gets the type name of the concrete value.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ValueVtable`] must be a vtable for the storage type stored in
    ///    the [`RawValueRef`].
    #[inline]
    pub(super) unsafe fn concrete_type_name(&self, ptr: RawValueRef<'_, T>) -> &'static str {
        // SAFETY: We know that `self.concrete_type_name` points to the function
        // `concrete_type_name::<T, S>` below. That function's safety requirements
        // are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.concrete_type_name)(ptr) }
    }

    /// Gets a thin pointer to the concrete value.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ValueVtable`] must be a vtable for the storage type stored in
    ///    the [`RawValueRef`].
    #[inline]
    pub(super) unsafe fn concrete_ptr(&self, ptr: RawValueRef<'_, T>) -> NonNull<()> {
        // SAFETY: We know that `self.concrete_ptr` points to the function
        // `concrete_ptr::<T, S>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.concrete_ptr)(ptr) }
    }

    /// Gets a thin pointer to the concrete value valid for writes.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ValueVtable`] must be a vtable for the storage type stored in
    ///    the [`RawValueMut`].
    #[inline]
    pub(super) unsafe fn concrete_ptr_mut(&self, ptr: RawValueMut<'_, T>) -> NonNull<()> {
        // SAFETY: We know that `self.concrete_ptr_mut` points to the function
        // `concrete_ptr_mut::<T, S>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.concrete_ptr_mut)(ptr) }
    }
}

/// Drops the [`Box<ValueData<T, S>>`] instance pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`Box<ValueData<T, S>>`] via [`Box::into_raw`]
/// 2. The storage type `S` matches the actual storage type stored in the
///    [`ValueData`]
/// 3. This method drops the [`Box<ValueData<T, S>>`], so the caller must
///    ensure that the pointer has not previously been dropped, that it is able
///    to transfer ownership of the pointer, and that it will not use the
///    pointer after calling this method.
unsafe fn drop<T: ?Sized + 'static, S: 'static>(ptr: NonNull<ValueData<T, Erased>>) {
    let ptr: NonNull<ValueData<T, S>> = ptr.cast();
    let ptr = ptr.as_ptr();
    // SAFETY: Our pointer has the correct type as guaranteed by the caller, and it
    // came from a call to `Box::into_raw` as also guaranteed by our caller.
    let boxed = unsafe { Box::from_raw(ptr) };
    core::mem::drop(boxed);
}

/// Copies the value through [`Storage::duplicate`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `S` matches the actual storage type stored in the
///    [`ValueData`]
unsafe fn duplicate<T: ?Sized + 'static, S: Storage<T>>(ptr: RawValueRef<'_, T>) -> RawValue<T> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let storage: &S = unsafe { ptr.storage_downcast_unchecked::<S>() };
    RawValue::from_storage(storage.duplicate())
}

/// Views the value through [`Storage::base`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `S` matches the actual storage type stored in the
///    [`ValueData`]
unsafe fn base<T: ?Sized + 'static, S: Storage<T>>(ptr: RawValueRef<'_, T>) -> &'_ T {
    // SAFETY:
    // 1. Guaranteed by the caller
    let storage: &S = unsafe { ptr.storage_downcast_unchecked::<S>() };
    storage.base()
}

/// Views the value through [`Storage::base_mut`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `S` matches the actual storage type stored in the
///    [`ValueData`]
unsafe fn base_mut<T: ?Sized + 'static, S: Storage<T>>(ptr: RawValueMut<'_, T>) -> &'_ mut T {
    // SAFETY:
    // 1. Guaranteed by the caller
    let storage: &mut S = unsafe { ptr.storage_downcast_unchecked::<S>() };
    storage.base_mut()
}

/// Gets the concrete [`TypeId`] through [`Storage::concrete_type_id`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `S` matches the actual storage type stored in the
///    [`ValueData`]
unsafe fn concrete_type_id<T: ?Sized + 'static, S: Storage<T>>(ptr: RawValueRef<'_, T>) -> TypeId {
    // SAFETY:
    // 1. Guaranteed by the caller
    let storage: &S = unsafe { ptr.storage_downcast_unchecked::<S>() };
    storage.concrete_type_id()
}

/// Gets the concrete type name through [`Storage::concrete_type_name`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `S` matches the actual storage type stored in the
///    [`ValueData`]
unsafe fn concrete_type_name<T: ?Sized + 'static, S: Storage<T>>(
    ptr: RawValueRef<'_, T>,
) -> &'static str {
    // SAFETY:
    // 1. Guaranteed by the caller
    let storage: &S = unsafe { ptr.storage_downcast_unchecked::<S>() };
    storage.concrete_type_name()
}

/// Gets a thin pointer to the concrete value through
/// [`Storage::concrete_ptr`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `S` matches the actual storage type stored in the
///    [`ValueData`]
unsafe fn concrete_ptr<T: ?Sized + 'static, S: Storage<T>>(ptr: RawValueRef<'_, T>) -> NonNull<()> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let storage: &S = unsafe { ptr.storage_downcast_unchecked::<S>() };
    storage.concrete_ptr()
}

/// Gets a writable thin pointer to the concrete value through
/// [`Storage::concrete_ptr_mut`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `S` matches the actual storage type stored in the
///    [`ValueData`]
unsafe fn concrete_ptr_mut<T: ?Sized + 'static, S: Storage<T>>(
    ptr: RawValueMut<'_, T>,
) -> NonNull<()> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let storage: &mut S = unsafe { ptr.storage_downcast_unchecked::<S>() };
    storage.concrete_ptr_mut()
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::any::Any;

    use super::*;
    use crate::value::storage::Inline;

    #[test]
    fn test_value_vtable_storage_type_id() {
        let vtable = ValueVtable::<dyn Any>::new::<Inline<i32>>();
        assert_eq!(vtable.storage_type_id(), TypeId::of::<Inline<i32>>());
    }

    #[test]
    fn test_value_vtables_differ_per_storage() {
        let int_vtable = ValueVtable::<dyn Any>::new::<Inline<i32>>();
        let string_vtable = ValueVtable::<dyn Any>::new::<Inline<String>>();
        assert!(!core::ptr::eq(int_vtable, string_vtable));
        assert_ne!(int_vtable.storage_type_id(), string_vtable.storage_type_id());
    }
}
