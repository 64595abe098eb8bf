//! A value-semantic container for type-erased objects.
//!
//! [`ErasedValue<T>`] owns at most one object whose concrete type is hidden
//! behind the declared base type `T`. The base is usually a trait object
//! (`dyn Shape`), but any type works, including sized ones.
//!
//! The copy operation of the object is captured when the container is
//! created, so cloning an `ErasedValue<dyn Shape>` produces a new object of
//! the original concrete type even though `dyn Shape` knows nothing about
//! cloning. The relationship between the base and the concrete type is
//! expressed with [`Upcast`], usually declared once per trait through
//! [`derive_upcast!`].
//!
//! [`Upcast`]: crate::strategies::Upcast
//! [`derive_upcast!`]: crate::derive_upcast

mod cmp;
mod error;
mod owned;

pub use self::{
    cmp::NoValue,
    error::TypeMismatch,
    owned::{ErasedValue, make_erased},
};
