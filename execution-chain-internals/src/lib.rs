#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`execution-chain`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased holder and the unsafe
//! operations that power the erased values of the [`execution-chain`]
//! library. A holder owns exactly one object of some concrete type `U` while
//! only exposing it through a declared base type `T` (usually a trait object
//! such as `dyn Shape`).
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`execution-chain`] crate, not this
//! one.
//!
//! # Architecture
//!
//! - **[`value`]**: Type-erased value storage
//!   - [`RawValue`]: Owned value with [`Box`]-based allocation
//!   - [`RawValueRef`]/[`RawValueMut`]: Borrowed references (shared/mutable)
//!   - [`ValueData`]: `#[repr(C)]` wrapper enabling field access on erased types
//!   - [`ValueVtable`]: Function pointers for type-erased dispatch
//!
//! - **[`strategies`]**: Capability traits supplied by users
//!   - [`Upcast`]: How a concrete `U` is viewed as the base `T`
//!   - [`CopyStrategy`]: How an externally-sourced value is copied and
//!     destroyed
//!
//! # Storage kinds
//!
//! Every [`RawValue`] holds one of three storage kinds behind the same vtable
//! layout:
//!
//! - **Inline**: the value lives directly inside the allocation and is copied
//!   through [`Clone`].
//! - **External**: the value arrives as a [`Box`] and is copied and destroyed
//!   by a user-supplied [`CopyStrategy`]. The boxed type may itself be unsized.
//! - **Delegate**: another [`RawValue`] of a more specific base type, whose
//!   base view is mapped through [`Upcast`]. This is how a value of a derived
//!   base is turned into a value of a broader base without re-erasing.
//!
//! # Safety Strategy
//!
//! When we erase a type like `ValueData<T, Inline<Circle>>` to
//! `ValueData<T, Erased>`, we must ensure that the vtable function pointers
//! still match the actual storage stored in memory.
//!
//! This crate maintains safety through:
//!
//! - **Module-based encapsulation**: Safety-critical types keep fields
//!   module-private, making invariants locally verifiable within a single file
//! - **`#[repr(C)]` layout**: Enables safe field projection on type-erased
//!   pointers without constructing invalid references
//! - **Documented vtable contracts**: Each vtable method specifies exactly when
//!   it can be safely called
//!
//! [`execution-chain`]: https://docs.rs/execution-chain/latest/execution_chain/
//! [`ValueData`]: value::data::ValueData
//! [`ValueVtable`]: value::vtable::ValueVtable
//! [`Upcast`]: strategies::Upcast
//! [`CopyStrategy`]: strategies::CopyStrategy
//! [`Box`]: alloc::boxed::Box

extern crate alloc;

pub mod strategies;
mod util;
mod value;

pub use value::{RawValue, RawValueMut, RawValueRef};
