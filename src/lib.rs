#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Composable, type-checked pipelines of actions over a fixed set of mutable
//! arguments.
//!
//! ## Overview
//!
//! This crate provides two coupled building blocks:
//!
//! - [`ErasedValue<T>`], a value-semantic container that owns one object of
//!   some concrete type while exposing it as a declared base type (usually a
//!   trait object). Copying the container copies the object, without the
//!   object's type having to provide a virtual `clone`.
//! - Chains of actions. A [`StaticChain`] is a compile-time list of actions
//!   with no indirection at all, a [`DynamicChain`] is a runtime sequence of
//!   type-erased actions that all share one argument signature and can be
//!   appended to, cleared, copied and stored anywhere.
//!
//! On top of those, the [`flow`] module offers `if/then/else` and
//! `try/fallback` combinators that can be placed in either kind of chain.
//!
//! ## Quick Example
//!
//! ```
//! use execution_chain::prelude::*;
//!
//! let mut chain = DynamicChain::<(i32, i32, String)>::new();
//! chain
//!     .append(|a: &mut i32, b: &mut i32, c: &mut String| {
//!         *a = 1;
//!         *b = 2;
//!         c.push_str("hello");
//!     })
//!     .append(|a: &mut i32, b: &mut i32, c: &mut String| {
//!         *a *= 2;
//!         *b *= 2;
//!         c.push_str(" world");
//!     });
//!
//! let (mut x, mut y, mut z) = (0, 0, String::new());
//! chain.execute((&mut x, &mut y, &mut z));
//! assert_eq!((x, y, z.as_str()), (2, 4, "hello world"));
//! ```
//!
//! ## Signatures
//!
//! The arguments an action receives are described by a [`Signature`]: a tuple
//! of the argument types, such as `(i32, String)`. Actions always receive
//! mutable references to the arguments, so `DynamicChain<(i32, String)>` runs
//! actions of the shape `FnMut(&mut i32, &mut String)`. A single argument is
//! written as a one-element tuple, `(i32,)`.
//!
//! Closures used as actions need their parameter types written out, since
//! the chain cannot tell the compiler which of its possible signatures a
//! closure is meant for.
//!
//! ## Static and dynamic chains
//!
//! A [`StaticChain`] keeps the concrete type of every action. Composing it
//! with `|` produces a new chain and leaves the operands alone. A static chain
//! can be executed with *any* signature that every one of its actions
//! accepts, and it can be turned into a [`DynamicChain`] when its actions
//! accept that chain's signature:
//!
//! ```
//! use execution_chain::prelude::*;
//!
//! let steps = start_chain()
//!     .then(|a: &mut i32| *a += 2)
//!     .then(|a: &mut i32| *a *= 2);
//!
//! let mut chain = DynamicChain::<(i32,)>::from(steps);
//! let mut value = 2;
//! chain.execute(&mut value);
//! assert_eq!(value, 8);
//! ```
//!
//! A signature mismatch is a compile error, never a runtime failure:
//!
//! ```compile_fail
//! use execution_chain::prelude::*;
//!
//! let steps = start_chain().then(|_: &mut i32, _: &mut i32| {});
//! let chain = DynamicChain::<(i32, String)>::from(steps);
//! ```
//!
//! ## Erased values
//!
//! ```
//! use execution_chain::prelude::*;
//!
//! trait Shape {
//!     fn area(&self) -> f64;
//! }
//!
//! derive_upcast!(dyn Shape);
//!
//! #[derive(Clone)]
//! struct Square(f64);
//!
//! impl Shape for Square {
//!     fn area(&self) -> f64 {
//!         self.0 * self.0
//!     }
//! }
//!
//! let shape = ErasedValue::<dyn Shape>::new(Square(3.0));
//! let copy = shape.clone();
//! assert_eq!(copy.area(), 9.0);
//! assert!(copy.is::<Square>());
//! ```
//!
//! ## Features
//!
//! - `std`: forwards the `std` feature to the logging and error crates. The
//!   crate itself only needs `alloc`.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events at the `trace` and `debug` levels and
//! never installs a subscriber.

extern crate alloc;

#[macro_use]
mod macros;

pub mod action;
pub mod action_block;
pub mod dynamic_chain;
pub mod erased_value;
pub mod flow;
pub mod prelude;
pub mod signature;
pub mod static_chain;
pub mod strategies;

pub use self::{
    action::{Action, Predicate, Signal},
    action_block::ActionBlock,
    dynamic_chain::DynamicChain,
    erased_value::{ErasedValue, NoValue, TypeMismatch, make_erased},
    signature::{ArgRefs, Signature},
    static_chain::{StaticChain, start_chain},
};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    pub use execution_chain_internals::strategies::Upcast;
}
