//! Runtime chains of type-erased actions.
//!
//! A [`DynamicChain<S>`] owns an ordered sequence of [`ActionBlock`]s that all
//! accept the signature `S`. Unlike a [`StaticChain`], its type does not
//! depend on the actions it holds, so it can be stored in fields and
//! collections, appended to at runtime, cleared and copied.
//!
//! [`ActionBlock`]: crate::ActionBlock
//! [`StaticChain`]: crate::StaticChain

mod iter;
mod owned;

pub use self::{
    iter::{DynamicChainIntoIter, DynamicChainIter},
    owned::DynamicChain,
};
