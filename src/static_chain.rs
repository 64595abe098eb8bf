//! Compile-time chains of actions.
//!
//! A [`StaticChain`] stores its actions by value in a nested list
//! (`Link<Link<Nil, A>, B>` for the actions `A` then `B`), so running it is a
//! series of direct calls with no allocation and no dynamic dispatch.
//!
//! Chains are persistent: [`then`](StaticChain::then), `|` and
//! [`concat`](StaticChain::concat) consume their operands and return a new
//! chain, they never modify a chain in place. Since chains are [`Clone`]
//! whenever their actions are, keeping an operand around is a matter of
//! cloning it first.
//!
//! ```
//! use execution_chain::prelude::*;
//!
//! let base = start_chain() | (|x: &mut i32| *x += 1);
//! let mut longer = base.clone() | (|x: &mut i32| *x *= 10);
//!
//! let mut x = 1;
//! longer.execute(&mut x);
//! assert_eq!(x, 20);
//! assert_eq!(base.len(), 1);
//! assert_eq!(longer.len(), 2);
//! ```

use core::{any::type_name, fmt, ops::BitOr};

use crate::{
    action::Action,
    signature::{ArgRefs, Signature},
};

/// The end of a chain's list of actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Nil;

/// A list of actions `P` followed by the action `A`.
#[derive(Clone, Copy, Default)]
pub struct Link<P, A> {
    prefix: P,
    last: A,
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Nil {}
    impl<P: Sealed, A> Sealed for super::Link<P, A> {}
}

/// The list of actions held by a [`StaticChain`].
///
/// Implemented by [`Nil`] and [`Link`] only.
pub trait Links: sealed::Sealed {
    /// The number of actions in the list.
    const LEN: usize;

    #[doc(hidden)]
    fn debug_entries(&self, list: &mut fmt::DebugList<'_, '_>);
}

impl Links for Nil {
    const LEN: usize = 0;

    fn debug_entries(&self, _: &mut fmt::DebugList<'_, '_>) {}
}

impl<P: Links, A> Links for Link<P, A> {
    const LEN: usize = P::LEN + 1;

    fn debug_entries(&self, list: &mut fmt::DebugList<'_, '_>) {
        self.prefix.debug_entries(list);
        list.entry(&format_args!("{}", type_name::<A>()));
    }
}

/// A list of actions that can all be run with the signature `S`.
pub trait Sequence<S: Signature>: Links {
    /// Runs every action in order with the same arguments.
    fn run_all(&mut self, args: S::Refs<'_>);
}

impl<S: Signature> Sequence<S> for Nil {
    #[inline]
    fn run_all(&mut self, _: S::Refs<'_>) {}
}

impl<S, P, A> Sequence<S> for Link<P, A>
where
    S: Signature,
    P: Sequence<S>,
    A: Action<S>,
{
    #[inline]
    fn run_all(&mut self, mut args: S::Refs<'_>) {
        self.prefix.run_all(S::reborrow(&mut args));
        self.last.run(args);
    }
}

/// Appends the actions of one list to another.
pub trait Concat<R> {
    /// The combined list.
    type Output;

    /// Appends `other` to `self`.
    fn concat(self, other: R) -> Self::Output;
}

impl<L> Concat<Nil> for L {
    type Output = L;

    #[inline]
    fn concat(self, _: Nil) -> L {
        self
    }
}

impl<L, P, A> Concat<Link<P, A>> for L
where
    L: Concat<P>,
{
    type Output = Link<<L as Concat<P>>::Output, A>;

    #[inline]
    fn concat(self, other: Link<P, A>) -> Self::Output {
        Link {
            prefix: <L as Concat<P>>::concat(self, other.prefix),
            last: other.last,
        }
    }
}

/// A fixed list of actions of heterogeneous types.
///
/// A chain is itself an [`Action`] for every signature that all its actions
/// accept, so it can be executed with unrelated argument sets, nested in other
/// chains, or turned into a [`DynamicChain`](crate::DynamicChain).
///
/// ```
/// use execution_chain::prelude::*;
///
/// #[derive(Clone)]
/// struct Double;
///
/// impl Action<(i32,)> for Double {
///     fn run(&mut self, (x,): (&mut i32,)) -> bool {
///         *x *= 2;
///         true
///     }
/// }
///
/// impl Action<(String,)> for Double {
///     fn run(&mut self, (s,): (&mut String,)) -> bool {
///         *s = s.repeat(2);
///         true
///     }
/// }
///
/// let mut chain = static_chain![Double, Double];
///
/// let mut number = 3;
/// chain.execute(&mut number);
/// assert_eq!(number, 12);
///
/// let mut text = String::from("ab");
/// chain.execute(&mut text);
/// assert_eq!(text, "abababab");
/// ```
#[derive(Clone, Copy, Default)]
#[must_use]
pub struct StaticChain<L = Nil> {
    links: L,
}

/// The empty chain that compositions start from.
///
/// ```
/// use execution_chain::prelude::*;
///
/// let mut chain = start_chain().then(|s: &mut String| s.push('!'));
/// let mut s = String::from("hey");
/// chain.execute(&mut s);
/// assert_eq!(s, "hey!");
/// ```
pub const fn start_chain() -> StaticChain<Nil> {
    StaticChain::new()
}

impl StaticChain<Nil> {
    /// Creates an empty chain, the same as [`start_chain`].
    pub const fn new() -> Self {
        Self { links: Nil }
    }
}

impl<L> StaticChain<L> {
    /// Returns a new chain that runs `action` after the actions of `self`.
    pub fn then<A>(self, action: A) -> StaticChain<Link<L, A>> {
        StaticChain {
            links: Link {
                prefix: self.links,
                last: action,
            },
        }
    }

    /// Returns a new chain with the actions of `self` followed by the actions
    /// of `other`.
    ///
    /// Unlike `self | other`, which adds `other` as a single nested step, the
    /// lists are flattened. Concatenating with an empty chain returns the
    /// chain unchanged.
    ///
    /// ```
    /// use execution_chain::prelude::*;
    ///
    /// let head = start_chain().then(|x: &mut u8| *x += 1);
    /// let tail = start_chain().then(|x: &mut u8| *x *= 3).then(|x: &mut u8| *x -= 1);
    ///
    /// let mut chain = head.concat(tail);
    /// assert_eq!(chain.len(), 3);
    ///
    /// let mut x = 1;
    /// chain.execute(&mut x);
    /// assert_eq!(x, 5);
    /// ```
    pub fn concat<R>(self, other: StaticChain<R>) -> StaticChain<<L as Concat<R>>::Output>
    where
        L: Concat<R>,
    {
        StaticChain {
            links: Concat::concat(self.links, other.links),
        }
    }

    /// The number of actions in the chain.
    pub const fn len(&self) -> usize
    where
        L: Links,
    {
        L::LEN
    }

    /// Whether the chain has no actions.
    pub const fn is_empty(&self) -> bool
    where
        L: Links,
    {
        L::LEN == 0
    }

    /// Runs every action in order with the references in `args`.
    ///
    /// Any signature accepted by every action can be used.
    pub fn execute<'a, R>(&mut self, args: R)
    where
        R: ArgRefs<'a>,
        L: Sequence<R::Signature>,
    {
        self.links.run_all(args.into_refs());
    }
}

impl<S, L> Action<S> for StaticChain<L>
where
    S: Signature,
    L: Sequence<S>,
{
    #[inline]
    fn run(&mut self, args: S::Refs<'_>) -> bool {
        self.links.run_all(args);
        true
    }
}

/// `chain | action` is the same as [`chain.then(action)`](StaticChain::then).
///
/// The right operand always becomes a single step, even when it is itself a
/// `StaticChain`: `start_chain() | two_step_chain` has a [`len`] of 1 and its
/// [`Debug`](fmt::Debug) output shows the nested chain. The actions still run in the same
/// order with the same effects. Use [`concat`](StaticChain::concat) to get the
/// flattened list instead.
///
/// ```
/// use execution_chain::prelude::*;
///
/// let two = start_chain() | (|x: &mut i32| *x += 1) | (|x: &mut i32| *x *= 2);
///
/// let mut nested = start_chain() | two;
/// let mut flat = start_chain().concat(two);
/// assert_eq!((nested.len(), flat.len()), (1, 2));
///
/// let (mut a, mut b) = (1, 1);
/// nested.execute(&mut a);
/// flat.execute(&mut b);
/// assert_eq!(a, b);
/// ```
///
/// [`len`]: StaticChain::len
impl<L, A> BitOr<A> for StaticChain<L> {
    type Output = StaticChain<Link<L, A>>;

    #[inline]
    fn bitor(self, action: A) -> Self::Output {
        self.then(action)
    }
}

impl<L: Links> fmt::Debug for StaticChain<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticChain")?;
        let mut list = f.debug_list();
        self.links.debug_entries(&mut list);
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String, vec::Vec};
    use core::cell::RefCell;

    use super::*;

    #[test]
    fn test_actions_run_in_order() {
        let log = RefCell::new(Vec::new());
        let mut chain = start_chain()
            .then(|_: &mut u8| log.borrow_mut().push(1))
            .then(|_: &mut u8| log.borrow_mut().push(2))
            .then(|_: &mut u8| log.borrow_mut().push(3));

        chain.execute(&mut 0_u8);
        assert_eq!(*log.borrow(), [1, 2, 3]);
    }

    #[test]
    fn test_composition_leaves_operands_alone() {
        let one = start_chain() | (|x: &mut i32| *x += 1);
        let mut two = one | (|x: &mut i32| *x += 2);
        let mut one_again = one;

        let mut x = 0;
        two.execute(&mut x);
        assert_eq!(x, 3);

        one_again.execute(&mut x);
        assert_eq!(x, 4);
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let mut chain = start_chain();
        assert!(chain.is_empty());

        let (mut a, mut b) = (7, String::from("same"));
        chain.execute((&mut a, &mut b));
        assert_eq!((a, b.as_str()), (7, "same"));

        let concatenated = start_chain().concat(start_chain().then(|x: &mut i32| *x = 0));
        assert_eq!(concatenated.len(), 1);
    }

    #[test]
    fn test_several_arguments() {
        let mut chain = start_chain()
            .then(|a: &mut i32, b: &mut i32, c: &mut String| {
                *a = 1;
                *b = 2;
                c.push_str("hello");
            })
            .then(|a: &mut i32, b: &mut i32, c: &mut String| {
                *a *= 2;
                *b *= 2;
                c.push_str(" world");
            });

        let (mut x, mut y, mut z) = (0, 0, String::new());
        chain.execute((&mut x, &mut y, &mut z));
        assert_eq!((x, y, z.as_str()), (2, 4, "hello world"));
    }

    #[test]
    fn test_pipe_nests_chains_and_concat_flattens() {
        let two = start_chain() | (|x: &mut i32| *x += 1) | (|x: &mut i32| *x *= 3);

        let mut nested = start_chain() | two;
        let mut doubled = two | two;
        let mut flat = two.concat(two);
        assert_eq!(nested.len(), 1);
        assert_eq!(doubled.len(), 3);
        assert_eq!(flat.len(), 4);

        let mut x = 0;
        nested.execute(&mut x);
        assert_eq!(x, 3);

        let (mut a, mut b) = (0, 0);
        doubled.execute(&mut a);
        flat.execute(&mut b);
        assert_eq!((a, b), (12, 12));
    }

    #[test]
    fn test_debug_lists_action_types() {
        #[derive(Clone, Copy)]
        struct Step;

        impl Action<(u8,)> for Step {
            fn run(&mut self, _: (&mut u8,)) -> bool {
                true
            }
        }

        let chain = start_chain() | Step | Step;
        let debug = format!("{chain:?}");
        assert!(debug.starts_with("StaticChain["));
        assert_eq!(debug.matches("Step").count(), 2);
    }
}
