//! How erased values relate to their base type and how they are copied.
//!
//! [`Upcast`] connects a base type to the concrete types it can hold; most
//! code declares it with [`derive_upcast!`](crate::derive_upcast).
//! [`CopyStrategy`] replaces [`Clone`] for objects handed over as a box, see
//! [`ErasedValue::from_box_with`](crate::ErasedValue::from_box_with).

pub use execution_chain_internals::strategies::{CopyStrategy, DefaultCopy, Upcast};
