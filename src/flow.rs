//! Branching combinators.
//!
//! Each combinator wraps other actions and is itself an [`Action`], so it can
//! be placed in a [`StaticChain`](crate::StaticChain) or a
//! [`DynamicChain`](crate::DynamicChain) like any closure. Combinators hold
//! no state of their own between calls.
//!
//! The value an action returns decides what a combinator does next: `true`
//! means success, `false` means failure, and actions returning `()` always
//! succeed.
//!
//! ```
//! use execution_chain::prelude::*;
//!
//! let mut chain = start_chain()
//!     | If::new(|x: &i32| *x > 5)
//!         .then(|x: &mut i32| *x *= 2)
//!         .otherwise(|x: &mut i32| *x /= 2);
//!
//! let mut x = 10;
//! chain.execute(&mut x);
//! assert_eq!(x, 20);
//!
//! x = 4;
//! chain.execute(&mut x);
//! assert_eq!(x, 2);
//! ```

use crate::{
    action::{Action, Predicate},
    signature::Signature,
};

/// Marks the nodes built by the combinators of this module.
pub trait LogicFlow {}

/// The start of an `if` node: a predicate without branches yet.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct If<P> {
    predicate: P,
}

impl<P> If<P> {
    /// Starts an `if` node testing `predicate`.
    ///
    /// The predicate only sees shared references to the arguments, so it
    /// cannot change them. Work that has to happen before the test belongs
    /// in an earlier action of the chain.
    ///
    /// ```compile_fail
    /// use execution_chain::prelude::*;
    ///
    /// let mut chain = start_chain()
    ///     | If::new(|x: &mut i32| {
    ///         *x += 1;
    ///         *x > 5
    ///     })
    ///     .then(|x: &mut i32| *x *= 2);
    /// chain.execute(&mut 0);
    /// ```
    pub const fn new(predicate: P) -> Self {
        Self { predicate }
    }

    /// Runs `action` when the predicate holds.
    pub fn then<T>(self, action: T) -> IfThen<P, T> {
        IfThen {
            predicate: self.predicate,
            then: action,
        }
    }
}

/// Runs an action when a predicate holds.
///
/// Returns the action's result, or `true` when the predicate does not hold
/// and nothing ran.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct IfThen<P, T> {
    predicate: P,
    then: T,
}

impl<P, T> IfThen<P, T> {
    /// Runs `action` when the predicate does not hold.
    pub fn otherwise<E>(self, action: E) -> IfThenElse<P, T, E> {
        IfThenElse {
            predicate: self.predicate,
            then: self.then,
            otherwise: action,
        }
    }
}

impl<S, P, T> Action<S> for IfThen<P, T>
where
    S: Signature,
    P: Predicate<S>,
    T: Action<S>,
{
    fn run(&mut self, args: S::Refs<'_>) -> bool {
        if self.predicate.test(S::view(&args)) {
            self.then.run(args)
        } else {
            true
        }
    }
}

impl<P, T> LogicFlow for IfThen<P, T> {}

/// Runs one of two actions depending on a predicate.
///
/// Exactly one branch runs per call; its result is returned.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct IfThenElse<P, T, E> {
    predicate: P,
    then: T,
    otherwise: E,
}

impl<S, P, T, E> Action<S> for IfThenElse<P, T, E>
where
    S: Signature,
    P: Predicate<S>,
    T: Action<S>,
    E: Action<S>,
{
    fn run(&mut self, args: S::Refs<'_>) -> bool {
        if self.predicate.test(S::view(&args)) {
            self.then.run(args)
        } else {
            self.otherwise.run(args)
        }
    }
}

impl<P, T, E> LogicFlow for IfThenElse<P, T, E> {}

/// The start of a `try` node: a primary action without a fallback yet.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct Try<A> {
    primary: A,
}

impl<A> Try<A> {
    /// Starts a `try` node around `primary`.
    pub const fn new(primary: A) -> Self {
        Self { primary }
    }

    /// Runs `fallback` when the primary action fails.
    ///
    /// ```
    /// use execution_chain::prelude::*;
    ///
    /// let mut chain = start_chain()
    ///     | Try::new(|s: &mut String| s.parse::<u8>().is_ok())
    ///         .fallback(|s: &mut String| *s = String::from("0"));
    ///
    /// let mut input = String::from("12");
    /// chain.execute(&mut input);
    /// assert_eq!(input, "12");
    ///
    /// let mut input = String::from("twelve");
    /// chain.execute(&mut input);
    /// assert_eq!(input, "0");
    /// ```
    pub fn fallback<F>(self, fallback: F) -> TryFallback<A, F> {
        TryFallback {
            primary: self.primary,
            fallback,
        }
    }
}

/// Runs a fallback action when a primary action fails.
///
/// The fallback is skipped when the primary action succeeds. Otherwise the
/// fallback's result is returned.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct TryFallback<A, F> {
    primary: A,
    fallback: F,
}

impl<S, A, F> Action<S> for TryFallback<A, F>
where
    S: Signature,
    A: Action<S>,
    F: Action<S>,
{
    fn run(&mut self, mut args: S::Refs<'_>) -> bool {
        self.primary.run(S::reborrow(&mut args)) || self.fallback.run(args)
    }
}

impl<A, F> LogicFlow for TryFallback<A, F> {}
