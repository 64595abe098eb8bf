//! Commonly used items for convenient importing.
//!
//! ```
//! use execution_chain::prelude::*;
//!
//! let mut chain = DynamicChain::<(u32,)>::new();
//! chain |= start_chain() | If::new(|n: &u32| *n < 10).then(|n: &mut u32| *n += 1);
//!
//! let mut n = 9;
//! chain.execute(&mut n);
//! chain.execute(&mut n);
//! assert_eq!(n, 10);
//! ```

pub use crate::{
    Action, ActionBlock, DynamicChain, ErasedValue, NoValue, Predicate, Signal, Signature,
    StaticChain, TypeMismatch, derive_upcast,
    flow::{If, LogicFlow, Try},
    make_erased, start_chain, static_chain,
    strategies::{CopyStrategy, Upcast},
};
