//! This module encapsulates the fields of the [`ValueData`]. Since this is
//! the only place they are visible, this means that the type of the
//! [`ValueVtable`] is guaranteed to always be in sync with the type of the
//! actual storage. This follows from the fact that they are in sync
//! when created and that the API offers no way to change the
//! [`ValueVtable`] or storage type after creation.

use crate::value::{
    raw::{RawValueMut, RawValueRef},
    storage::Storage,
    vtable::ValueVtable,
};

/// Type-erased value data structure with vtable-based dispatch.
///
/// This struct uses `#[repr(C)]` to enable safe field access in type-erased
/// contexts, allowing access to the vtable field even when the storage type
/// `S` is unknown. The declared base type `T` is never erased.
#[repr(C)]
pub(crate) struct ValueData<T: ?Sized + 'static, S: 'static> {
    /// The Vtable of this value
    vtable: &'static ValueVtable<T>,
    /// The storage holding the actual value
    storage: S,
}

impl<T: ?Sized + 'static, S: Storage<T>> ValueData<T, S> {
    /// Creates a new [`ValueData`] around the specified storage.
    ///
    /// This method creates the vtable for type-erased dispatch and pairs it
    /// with the storage.
    #[inline]
    pub(super) fn new(storage: S) -> Self {
        Self {
            vtable: ValueVtable::new::<S>(),
            storage,
        }
    }
}

impl<'a, T: ?Sized + 'static> RawValueRef<'a, T> {
    /// Returns a reference to the [`ValueVtable`] of the [`ValueData`]
    /// instance.
    #[inline]
    pub(super) fn vtable(self) -> &'static ValueVtable<T> {
        let ptr = self.as_ptr();
        // SAFETY: We don't know the actual storage type, but we do know that it
        // points to an instance of `ValueData<T, S>` for some specific `S`. Since
        // `ValueData<T, S>` is `#[repr(C)]`, that means that it's safe to create
        // pointers to the fields before the actual storage.
        //
        // We need to take care to avoid creating an actual reference to
        // the `ValueData` itself though, as that would still be undefined behavior
        // since we don't have the right type.
        let vtable_ptr: *const &'static ValueVtable<T> = unsafe { &raw const (*ptr).vtable };

        // SAFETY: Deferencing the pointer and getting out the `&'static
        // ValueVtable` is valid for the same reasons
        unsafe { *vtable_ptr }
    }

    /// Accesses the storage of the [`ValueData`] instance as a reference to
    /// the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `S` matches the actual storage
    /// type stored in the [`ValueData`].
    #[inline]
    pub(super) unsafe fn storage_downcast_unchecked<S: 'static>(self) -> &'a S {
        // SAFETY: The inner function requires that `S` matches the type stored, but
        // that is guaranteed by our caller.
        let this = unsafe { self.cast_inner::<S>() };
        &this.storage
    }
}

impl<'a, T: ?Sized + 'static> RawValueMut<'a, T> {
    /// Accesses the storage of the [`ValueData`] instance as a mutable
    /// reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `S` matches the actual storage
    /// type stored in the [`ValueData`].
    #[inline]
    pub(super) unsafe fn storage_downcast_unchecked<S: 'static>(self) -> &'a mut S {
        // SAFETY: The inner function requires that `S` matches the type stored, but
        // that is guaranteed by our caller.
        let this = unsafe { self.cast_inner::<S>() };
        &mut this.storage
    }
}
