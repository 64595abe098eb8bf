//! Capability traits that relate an erased value to its declared base type
//! and control how it is copied and destroyed.
//!
//! Neither trait requires anything from the stored type itself: there is no
//! virtual `clone` method to implement and no common supertrait. The copy
//! operation is captured when the value is erased, and the base view is a
//! plain function on the base type.

use alloc::boxed::Box;

/// Declares that a `U` can be viewed as `Self`.
///
/// The trait is implemented on the *base* type, not on the concrete type.
/// This lets a crate that owns a trait declare the relationship once for
/// every implementor of that trait:
///
/// ```
/// use execution_chain_internals::strategies::Upcast;
///
/// trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// impl<U: Shape + 'static> Upcast<U> for dyn Shape {
///     fn upcast_ref(value: &U) -> &Self {
///         value
///     }
///
///     fn upcast_mut(value: &mut U) -> &mut Self {
///         value
///     }
/// }
/// ```
///
/// Every type is trivially viewable as itself, so `Upcast<T>` is implemented
/// for all `T`. Every `'static` type is viewable as `dyn Any` (optionally with
/// `Send` and `Sync`). Between two trait objects, trait upcasting can be used to
/// implement `Upcast<dyn Sub> for dyn Super`.
pub trait Upcast<U: ?Sized + 'static>: 'static {
    /// Views a shared reference to `U` as a shared reference to the base.
    fn upcast_ref(value: &U) -> &Self;

    /// Views a mutable reference to `U` as a mutable reference to the base.
    fn upcast_mut(value: &mut U) -> &mut Self;
}

impl<T: ?Sized + 'static> Upcast<T> for T {
    #[inline]
    fn upcast_ref(value: &T) -> &Self {
        value
    }

    #[inline]
    fn upcast_mut(value: &mut T) -> &mut Self {
        value
    }
}

impl<U: core::any::Any> Upcast<U> for dyn core::any::Any {
    #[inline]
    fn upcast_ref(value: &U) -> &Self {
        value
    }

    #[inline]
    fn upcast_mut(value: &mut U) -> &mut Self {
        value
    }
}

impl<U: core::any::Any + Send> Upcast<U> for dyn core::any::Any + Send {
    #[inline]
    fn upcast_ref(value: &U) -> &Self {
        value
    }

    #[inline]
    fn upcast_mut(value: &mut U) -> &mut Self {
        value
    }
}

impl<U: core::any::Any + Send + Sync> Upcast<U> for dyn core::any::Any + Send + Sync {
    #[inline]
    fn upcast_ref(value: &U) -> &Self {
        value
    }

    #[inline]
    fn upcast_mut(value: &mut U) -> &mut Self {
        value
    }
}

/// Copies and destroys a value that was handed over as a [`Box`].
///
/// A strategy is stored next to the value it manages and is itself cloned
/// whenever the value is copied, so it may carry state.
///
/// Closures of the shape `Fn(&U) -> Box<U>` are strategies. Because the
/// strategy receives the value through `&U`, `U` may be unsized, which makes
/// it possible to store a `Box<dyn Shape>` whose concrete type is not known
/// statically. In that case the strategy alone is responsible for producing
/// a faithful copy.
///
/// # Examples
///
/// ```
/// use execution_chain_internals::strategies::CopyStrategy;
///
/// #[derive(Clone)]
/// struct SliceCopy;
///
/// impl CopyStrategy<[u8]> for SliceCopy {
///     fn copy(&self, value: &[u8]) -> Box<[u8]> {
///         Box::from(value)
///     }
/// }
///
/// let original: Box<[u8]> = Box::new([1, 2, 3]);
/// let copy = SliceCopy.copy(&original[..]);
/// assert_eq!(&*copy, &[1, 2, 3]);
/// ```
pub trait CopyStrategy<U: ?Sized + 'static>: Clone + 'static {
    /// Produces an independent copy of `value`.
    fn copy(&self, value: &U) -> Box<U>;

    /// Destroys a value previously managed by this strategy.
    ///
    /// The default implementation simply drops the box.
    #[inline]
    fn dispose(&self, value: Box<U>) {
        core::mem::drop(value);
    }
}

/// The default [`CopyStrategy`]: copies through [`Clone`] and drops normally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DefaultCopy;

impl<U: Clone + 'static> CopyStrategy<U> for DefaultCopy {
    #[inline]
    fn copy(&self, value: &U) -> Box<U> {
        Box::new(value.clone())
    }
}

impl<U, F> CopyStrategy<U> for F
where
    U: ?Sized + 'static,
    F: Fn(&U) -> Box<U> + Clone + 'static,
{
    #[inline]
    fn copy(&self, value: &U) -> Box<U> {
        self(value)
    }
}
