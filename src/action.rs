//! The callable contracts that chains are made of.
//!
//! An [`Action<S>`] is anything that can be invoked with mutable references to
//! the arguments of the [`Signature`] `S`. It reports a continuation signal:
//! `true` means "continue", `false` means "this step failed". Plain chains
//! ignore the signal and always run every step; the [`flow`] combinators use
//! it to decide which branch to take.
//!
//! Closures are actions when every parameter is a mutable reference to the
//! matching argument type and the closure returns either `()` or `bool`:
//!
//! ```
//! use execution_chain::{Action, Signature};
//!
//! fn run_once<S: Signature, A: Action<S>>(mut action: A, args: S::Refs<'_>) -> bool {
//!     action.run(args)
//! }
//!
//! let mut total = 0_u32;
//! assert!(run_once::<(u32,), _>(|t: &mut u32| *t += 4, (&mut total,)));
//! assert!(!run_once::<(u32,), _>(|t: &mut u32| *t > 10, (&mut total,)));
//! assert_eq!(total, 4);
//! ```
//!
//! A type may implement [`Action`] for several signatures. A [`StaticChain`]
//! made of such actions can then be executed with each of those signatures.
//!
//! [`flow`]: crate::flow
//! [`StaticChain`]: crate::StaticChain

use execution_chain_internals::strategies::Upcast;

use crate::signature::Signature;

/// A step that can be executed with the arguments of the signature `S`.
pub trait Action<S: Signature> {
    /// Runs the action, returning `false` to report failure.
    fn run(&mut self, args: S::Refs<'_>) -> bool;
}

/// A read-only test over the arguments of the signature `S`.
///
/// Closures of the shape `FnMut(&A, &B, ...) -> bool` are predicates.
pub trait Predicate<S: Signature> {
    /// Evaluates the predicate.
    fn test(&mut self, args: S::Views<'_>) -> bool;
}

/// The return value of a closure used as an [`Action`].
///
/// `()` always continues, a `bool` is passed through.
pub trait Signal {
    /// Whether the chain step succeeded.
    fn proceed(self) -> bool;
}

impl Signal for () {
    #[inline]
    fn proceed(self) -> bool {
        true
    }
}

impl Signal for bool {
    #[inline]
    fn proceed(self) -> bool {
        self
    }
}

// Lets `ErasedValue<dyn Action<S>>` hold any action.
impl<S, A> Upcast<A> for dyn Action<S>
where
    S: Signature,
    A: Action<S> + 'static,
{
    #[inline]
    fn upcast_ref(value: &A) -> &Self {
        value
    }

    #[inline]
    fn upcast_mut(value: &mut A) -> &mut Self {
        value
    }
}

macro_rules! impl_closures {
    ($($ty:ident $idx:tt),*) => {
        impl<Func, Ret, $($ty: 'static),*> Action<($($ty,)*)> for Func
        where
            Func: FnMut($(&mut $ty),*) -> Ret,
            Ret: Signal,
        {
            #[inline]
            #[allow(unused_variables)]
            fn run(&mut self, args: <($($ty,)*) as Signature>::Refs<'_>) -> bool {
                (self)($(args.$idx),*).proceed()
            }
        }

        impl<Func, $($ty: 'static),*> Predicate<($($ty,)*)> for Func
        where
            Func: FnMut($(&$ty),*) -> bool,
        {
            #[inline]
            #[allow(unused_variables)]
            fn test(&mut self, args: <($($ty,)*) as Signature>::Views<'_>) -> bool {
                (self)($(args.$idx),*)
            }
        }
    };
}

impl_closures!();
impl_closures!(A 0);
impl_closures!(A 0, B 1);
impl_closures!(A 0, B 1, C 2);
impl_closures!(A 0, B 1, C 2, D 3);
impl_closures!(A 0, B 1, C 2, D 3, E 4);
impl_closures!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_closures!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_closures!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
