use alloc::boxed::Box;
use core::{
    any::{Any, TypeId},
    fmt,
    ops::{Deref, DerefMut},
};

use execution_chain_internals::{
    RawValue,
    strategies::{CopyStrategy, DefaultCopy, Upcast},
};
use tracing::debug;

use crate::erased_value::TypeMismatch;

/// An owning, copyable container for one object viewed as the base type `T`.
///
/// The container is either empty or holds exactly one object. Its concrete
/// type `U` is chosen at construction and never changes until the container
/// is reset or replaced; `T` only has to be able to view a `U` (see
/// [`Upcast`]).
///
/// - [`Clone`] produces an independent object of the same concrete type, using
///   the copy operation captured at construction.
/// - Moving the container moves the object, [`take`](Self::take) moves it out
///   and leaves an empty container behind.
/// - [`Deref`] gives access to the object as a `T`. Dereferencing an empty
///   container panics; use [`get`](Self::get) when emptiness is possible.
///
/// # Examples
///
/// ```
/// use execution_chain::prelude::*;
///
/// trait Animal {
///     fn name(&self) -> String;
///     fn rename(&mut self, name: &str);
/// }
///
/// derive_upcast!(dyn Animal);
///
/// #[derive(Clone)]
/// struct Dog(String);
///
/// impl Animal for Dog {
///     fn name(&self) -> String {
///         self.0.clone()
///     }
///
///     fn rename(&mut self, name: &str) {
///         self.0 = name.to_string();
///     }
/// }
///
/// let original = ErasedValue::<dyn Animal>::new(Dog("rex".to_string()));
/// let mut copy = original.clone();
/// copy.rename("fido");
///
/// assert_eq!(original.name(), "rex");
/// assert_eq!(copy.name(), "fido");
/// assert_eq!(copy.concrete_type_id(), original.concrete_type_id());
/// ```
#[must_use]
pub struct ErasedValue<T: ?Sized + 'static> {
    raw: Option<RawValue<T>>,
}

impl<T: ?Sized + 'static> ErasedValue<T> {
    /// Creates an empty container.
    ///
    /// ```
    /// use execution_chain::ErasedValue;
    ///
    /// let value = ErasedValue::<str>::empty();
    /// assert!(value.is_empty());
    /// assert_eq!(value.concrete_type_id(), None);
    /// ```
    pub const fn empty() -> Self {
        Self { raw: None }
    }

    /// Creates a container holding `value`, copied through [`Clone`].
    ///
    /// ```
    /// use core::any::{Any, TypeId};
    ///
    /// use execution_chain::ErasedValue;
    ///
    /// let value = ErasedValue::<dyn Any>::new(7_u16);
    /// assert_eq!(value.concrete_type_id(), Some(TypeId::of::<u16>()));
    /// ```
    pub fn new<U>(value: U) -> Self
    where
        U: Clone + 'static,
        T: Upcast<U>,
    {
        Self {
            raw: Some(RawValue::new_inline(value)),
        }
    }

    /// Creates a container that takes over an already boxed `value`.
    ///
    /// The box is kept as is; copies are made through [`Clone`].
    pub fn from_box<U>(value: Box<U>) -> Self
    where
        U: Clone + 'static,
        T: Upcast<U>,
    {
        Self::from_box_with(value, DefaultCopy)
    }

    /// Creates a container that takes over a boxed `value` which is copied and
    /// destroyed by `strategy`.
    ///
    /// `U` may be unsized. This is how an object only known through an
    /// intermediate base (a `Box<dyn Shape>` whose concrete type is lost) can
    /// still be stored: the strategy is trusted to produce faithful copies and
    /// no type check is made.
    ///
    /// ```
    /// use execution_chain::prelude::*;
    ///
    /// trait Shape {
    ///     fn area(&self) -> f64;
    /// }
    ///
    /// derive_upcast!(dyn Shape);
    ///
    /// struct Square(f64);
    ///
    /// impl Shape for Square {
    ///     fn area(&self) -> f64 {
    ///         self.0 * self.0
    ///     }
    /// }
    ///
    /// let boxed: Box<dyn Shape> = Box::new(Square(2.0));
    /// let value = ErasedValue::<dyn Shape>::from_box_with(
    ///     boxed,
    ///     |shape: &(dyn Shape + 'static)| -> Box<dyn Shape> { Box::new(Square(shape.area().sqrt())) },
    /// );
    /// assert_eq!(value.clone().area(), 4.0);
    /// ```
    pub fn from_box_with<U, C>(value: Box<U>, strategy: C) -> Self
    where
        U: ?Sized + 'static,
        C: CopyStrategy<U>,
        T: Upcast<U>,
    {
        Self {
            raw: Some(RawValue::new_external(value, strategy)),
        }
    }

    /// Creates a container holding `value`, copied by `strategy` instead of
    /// [`Clone`].
    pub fn with_copier<U, C>(value: U, strategy: C) -> Self
    where
        U: 'static,
        C: CopyStrategy<U>,
        T: Upcast<U>,
    {
        Self::from_box_with(Box::new(value), strategy)
    }

    /// Creates a container from a dynamically typed box, checking that the
    /// runtime type of the object is exactly `U`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatch`] when the boxed object is not a `U`. Storing it
    /// anyway would make copies of the container produce a `U` rather than the
    /// object's real type.
    ///
    /// ```
    /// use core::any::Any;
    ///
    /// use execution_chain::ErasedValue;
    ///
    /// let boxed: Box<dyn Any> = Box::new(1.5_f32);
    /// assert!(ErasedValue::<dyn Any>::try_from_any::<f64>(boxed).is_err());
    ///
    /// let boxed: Box<dyn Any> = Box::new(1.5_f32);
    /// let value = ErasedValue::<dyn Any>::try_from_any::<f32>(boxed).unwrap();
    /// assert_eq!(value.downcast_ref::<f32>(), Some(&1.5));
    /// ```
    pub fn try_from_any<U>(value: Box<dyn Any>) -> Result<Self, TypeMismatch>
    where
        U: Clone + 'static,
        T: Upcast<U>,
    {
        match value.downcast::<U>() {
            Ok(value) => Ok(Self::from_box(value)),
            Err(value) => {
                let error = TypeMismatch::new::<U>((*value).type_id());
                debug!(
                    expected = error.expected_type_name(),
                    "rejected object whose runtime type differs from its static type"
                );
                Err(error)
            }
        }
    }

    /// Converts the container into a container of the broader base `B`.
    ///
    /// The object is neither copied nor re-erased: the new container wraps
    /// the old one and forwards to it, so the concrete type is preserved.
    ///
    /// ```
    /// use core::any::{Any, TypeId};
    ///
    /// use execution_chain::ErasedValue;
    ///
    /// let text = ErasedValue::<String>::new(String::from("chain"));
    /// let any: ErasedValue<dyn Any> = text.upcast();
    /// assert_eq!(any.concrete_type_id(), Some(TypeId::of::<String>()));
    /// ```
    pub fn upcast<B>(self) -> ErasedValue<B>
    where
        B: ?Sized + Upcast<T>,
    {
        ErasedValue {
            raw: self.raw.map(RawValue::new_delegate),
        }
    }

    /// Like [`upcast`](Self::upcast), but leaves `self` in place and converts
    /// a copy of it.
    pub fn upcast_cloned<B>(&self) -> ErasedValue<B>
    where
        B: ?Sized + Upcast<T>,
    {
        self.clone().upcast()
    }

    /// Whether the container holds an object.
    #[inline]
    pub fn has_value(&self) -> bool {
        self.raw.is_some()
    }

    /// Whether the container is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_none()
    }

    /// The held object, or `None` if the container is empty.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.raw.as_ref().map(|raw| raw.as_ref().base())
    }

    /// The held object mutably, or `None` if the container is empty.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.raw.as_mut().map(|raw| raw.as_mut().base_mut())
    }

    /// The held object, or `default` if the container is empty.
    ///
    /// ```
    /// use execution_chain::ErasedValue;
    ///
    /// let empty = ErasedValue::<str>::empty();
    /// assert_eq!(empty.get_or("fallback"), "fallback");
    /// ```
    pub fn get_or<'a>(&'a self, default: &'a T) -> &'a T {
        self.get().unwrap_or(default)
    }

    /// The [`TypeId`] of the held object, or `None` if the container is empty.
    pub fn concrete_type_id(&self) -> Option<TypeId> {
        self.raw.as_ref().map(|raw| raw.as_ref().concrete_type_id())
    }

    /// The type name of the held object, or `None` if the container is
    /// empty.
    pub fn concrete_type_name(&self) -> Option<&'static str> {
        self.raw.as_ref().map(|raw| raw.as_ref().concrete_type_name())
    }

    /// Whether the held object is a `U`.
    pub fn is<U: 'static>(&self) -> bool {
        self.concrete_type_id() == Some(TypeId::of::<U>())
    }

    /// The held object as a `U`, or `None` if the container is empty or holds
    /// an object of another type.
    ///
    /// ```
    /// use core::any::Any;
    ///
    /// use execution_chain::ErasedValue;
    ///
    /// let value = ErasedValue::<dyn Any>::new(vec![1, 2]);
    /// assert_eq!(value.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2]));
    /// assert_eq!(value.downcast_ref::<Vec<u8>>(), None);
    /// ```
    pub fn downcast_ref<U: 'static>(&self) -> Option<&U> {
        self.raw.as_ref()?.as_ref().downcast()
    }

    /// The held object as a mutable `U`, or `None` if the container is empty
    /// or holds an object of another type.
    pub fn downcast_mut<U: 'static>(&mut self) -> Option<&mut U> {
        self.raw.as_mut()?.as_mut().downcast_mut()
    }

    /// Moves the object out into a new container, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        Self {
            raw: self.raw.take(),
        }
    }

    /// Replaces the held object with the one held by `other`, returning the
    /// previous contents.
    pub fn replace(&mut self, other: Self) -> Self {
        core::mem::replace(self, other)
    }

    /// Destroys the held object, if any.
    pub fn reset(&mut self) {
        self.raw = None;
    }

    /// Exchanges the contents of two containers.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.raw, &mut other.raw);
    }
}

/// Creates an [`ErasedValue`] holding `value` viewed as `T`.
///
/// ```
/// use core::any::Any;
///
/// use execution_chain::{ErasedValue, make_erased};
///
/// let value: ErasedValue<dyn Any> = make_erased(5_i64);
/// assert!(value.is::<i64>());
/// ```
pub fn make_erased<T, U>(value: U) -> ErasedValue<T>
where
    T: ?Sized + Upcast<U>,
    U: Clone + 'static,
{
    ErasedValue::new(value)
}

impl<T: ?Sized + 'static> Default for ErasedValue<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized + 'static> Clone for ErasedValue<T> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.as_ref().map(|raw| raw.as_ref().duplicate()),
        }
    }
}

impl<T: ?Sized + 'static> Deref for ErasedValue<T> {
    type Target = T;

    #[track_caller]
    fn deref(&self) -> &T {
        match self.get() {
            Some(value) => value,
            None => empty_dereference(),
        }
    }
}

impl<T: ?Sized + 'static> DerefMut for ErasedValue<T> {
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        match self.get_mut() {
            Some(value) => value,
            None => empty_dereference(),
        }
    }
}

#[cold]
#[track_caller]
fn empty_dereference() -> ! {
    panic!("dereferenced an empty `ErasedValue`")
}

impl<T: ?Sized + 'static> fmt::Debug for ErasedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.concrete_type_name() {
            Some(name) => f
                .debug_tuple("ErasedValue")
                .field(&format_args!("{name}"))
                .finish(),
            None => f.write_str("ErasedValue(<empty>)"),
        }
    }
}
