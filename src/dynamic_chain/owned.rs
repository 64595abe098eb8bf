use alloc::vec::Vec;
use core::{
    any::type_name,
    fmt,
    ops::{BitOr, BitOrAssign},
};

use tracing::trace;

use crate::{
    action::Action,
    action_block::ActionBlock,
    dynamic_chain::{DynamicChainIntoIter, DynamicChainIter},
    signature::{ArgRefs, Signature},
    static_chain::{Sequence, StaticChain},
};

/// An ordered, growable sequence of actions sharing the signature `S`.
///
/// Every action is checked against `S` when it is added, so executing the
/// chain cannot fail. Execution runs the blocks in insertion order with the
/// same arguments; later blocks see the changes made by earlier ones.
///
/// Cloning a chain clones every action in it, and the copies evolve
/// independently.
///
/// # Examples
///
/// ```
/// use execution_chain::prelude::*;
///
/// let mut chain = DynamicChain::<(i32,)>::from(start_chain() | (|a: &mut i32| *a += 5));
/// let mut copy = chain.clone();
/// copy.append(|a: &mut i32| *a -= 10);
///
/// let mut x = 0;
/// chain.execute(&mut x);
/// assert_eq!(x, 5);
///
/// x = 0;
/// copy.execute(&mut x);
/// assert_eq!(x, -5);
/// ```
#[must_use]
pub struct DynamicChain<S: Signature> {
    blocks: Vec<ActionBlock<S>>,
}

impl<S: Signature> DynamicChain<S> {
    /// Creates an empty chain.
    pub const fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Adds `action` at the end of the chain.
    ///
    /// A [`StaticChain`] is added as a single block that runs all of its
    /// actions.
    pub fn append<A>(&mut self, action: A) -> &mut Self
    where
        A: Action<S> + Clone + 'static,
    {
        trace!(
            action = type_name::<A>(),
            position = self.blocks.len(),
            "appending action block"
        );
        self.blocks.push(ActionBlock::new(action));
        self
    }

    /// Adds an already wrapped block at the end of the chain.
    pub fn append_block(&mut self, block: ActionBlock<S>) -> &mut Self {
        trace!(
            action = block.action_type_name(),
            position = self.blocks.len(),
            "appending action block"
        );
        self.blocks.push(block);
        self
    }

    /// Adds copies of the blocks of `other` at the end of the chain, keeping
    /// their order.
    ///
    /// ```
    /// use execution_chain::DynamicChain;
    ///
    /// let mut first = DynamicChain::<(String,)>::new();
    /// first.append(|s: &mut String| s.push('a'));
    ///
    /// let mut second = DynamicChain::<(String,)>::new();
    /// second.append(|s: &mut String| s.push('b'));
    ///
    /// first.append_chain(&second).append_chain(&second);
    ///
    /// let mut s = String::new();
    /// first.execute(&mut s);
    /// assert_eq!(s, "abb");
    /// assert_eq!(second.len(), 1);
    /// ```
    pub fn append_chain(&mut self, other: &Self) -> &mut Self {
        trace!(
            appended = other.blocks.len(),
            position = self.blocks.len(),
            "concatenating dynamic chain"
        );
        self.blocks.extend_from_slice(&other.blocks);
        self
    }

    /// Adds copies of the blocks of every chain in `chains`, in order.
    pub fn append_chains<'c, I>(&mut self, chains: I) -> &mut Self
    where
        I: IntoIterator<Item = &'c Self>,
    {
        for chain in chains {
            self.append_chain(chain);
        }
        self
    }

    /// Replaces the contents of the chain with the single `action`.
    pub fn assign<A>(&mut self, action: A) -> &mut Self
    where
        A: Action<S> + Clone + 'static,
    {
        self.clear();
        self.append(action)
    }

    /// Replaces the contents of the chain with copies of the blocks of
    /// `other`.
    pub fn assign_chain(&mut self, other: &Self) -> &mut Self {
        self.blocks.clone_from(&other.blocks);
        self
    }

    /// Removes every block.
    pub fn clear(&mut self) {
        trace!(removed = self.blocks.len(), "clearing dynamic chain");
        self.blocks.clear();
    }

    /// The number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the chain has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over the blocks in execution order.
    pub fn iter(&self) -> DynamicChainIter<'_, S> {
        DynamicChainIter::new(&self.blocks)
    }

    /// Runs every block in insertion order with the references in `args`.
    ///
    /// `args` is either a single `&mut A` for a one-argument signature or a
    /// tuple of mutable references.
    ///
    /// ```
    /// use execution_chain::DynamicChain;
    ///
    /// let mut chain = DynamicChain::<(i32, i32)>::new();
    /// chain.append(|a: &mut i32, b: &mut i32| {
    ///     *a += 1;
    ///     *b += 1;
    /// });
    ///
    /// let (mut x, mut y) = (0, 0);
    /// chain.execute((&mut x, &mut y));
    /// assert_eq!((x, y), (1, 1));
    /// ```
    pub fn execute<'a, R>(&mut self, args: R)
    where
        R: ArgRefs<'a, Signature = S>,
    {
        self.run(args.into_refs());
    }

    /// Runs every block in insertion order with an already built reference
    /// tuple.
    pub fn run(&mut self, mut args: S::Refs<'_>) {
        trace!(
            blocks = self.blocks.len(),
            arity = S::ARITY,
            "executing dynamic chain"
        );
        for block in &mut self.blocks {
            block.execute(S::reborrow(&mut args));
        }
    }
}

impl<S: Signature> Action<S> for DynamicChain<S> {
    #[inline]
    fn run(&mut self, args: S::Refs<'_>) -> bool {
        DynamicChain::run(self, args);
        true
    }
}

impl<S: Signature> Default for DynamicChain<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Signature> Clone for DynamicChain<S> {
    fn clone(&self) -> Self {
        Self {
            blocks: self.blocks.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.blocks.clone_from(&source.blocks);
    }
}

impl<S: Signature> fmt::Debug for DynamicChain<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicChain")
            .field("blocks", &self.blocks)
            .finish()
    }
}

/// Captures the whole static chain as one block.
impl<S, L> From<StaticChain<L>> for DynamicChain<S>
where
    S: Signature,
    L: Sequence<S> + Clone + 'static,
{
    fn from(chain: StaticChain<L>) -> Self {
        let mut this = Self::new();
        this.append(chain);
        this
    }
}

impl<S: Signature> From<ActionBlock<S>> for DynamicChain<S> {
    fn from(block: ActionBlock<S>) -> Self {
        Self {
            blocks: alloc::vec![block],
        }
    }
}

impl<S: Signature> FromIterator<ActionBlock<S>> for DynamicChain<S> {
    fn from_iter<I: IntoIterator<Item = ActionBlock<S>>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

impl<S: Signature> Extend<ActionBlock<S>> for DynamicChain<S> {
    fn extend<I: IntoIterator<Item = ActionBlock<S>>>(&mut self, iter: I) {
        self.blocks.extend(iter);
    }
}

impl<S: Signature> IntoIterator for DynamicChain<S> {
    type Item = ActionBlock<S>;
    type IntoIter = DynamicChainIntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        DynamicChainIntoIter::new(self.blocks)
    }
}

impl<'a, S: Signature> IntoIterator for &'a DynamicChain<S> {
    type Item = &'a ActionBlock<S>;
    type IntoIter = DynamicChainIter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S, L> BitOrAssign<StaticChain<L>> for DynamicChain<S>
where
    S: Signature,
    L: Sequence<S> + Clone + 'static,
{
    fn bitor_assign(&mut self, chain: StaticChain<L>) {
        self.append(chain);
    }
}

impl<S: Signature> BitOrAssign<ActionBlock<S>> for DynamicChain<S> {
    fn bitor_assign(&mut self, block: ActionBlock<S>) {
        self.append_block(block);
    }
}

impl<S: Signature> BitOrAssign<DynamicChain<S>> for DynamicChain<S> {
    fn bitor_assign(&mut self, other: DynamicChain<S>) {
        trace!(
            appended = other.blocks.len(),
            position = self.blocks.len(),
            "concatenating dynamic chain"
        );
        self.blocks.extend(other.blocks);
    }
}

impl<S: Signature> BitOrAssign<&DynamicChain<S>> for DynamicChain<S> {
    fn bitor_assign(&mut self, other: &DynamicChain<S>) {
        self.append_chain(other);
    }
}

impl<S: Signature> BitOr<DynamicChain<S>> for DynamicChain<S> {
    type Output = DynamicChain<S>;

    fn bitor(mut self, other: DynamicChain<S>) -> Self::Output {
        self |= other;
        self
    }
}

impl<S: Signature> BitOr<&DynamicChain<S>> for DynamicChain<S> {
    type Output = DynamicChain<S>;

    fn bitor(mut self, other: &DynamicChain<S>) -> Self::Output {
        self.append_chain(other);
        self
    }
}

impl<S: Signature> BitOr<&DynamicChain<S>> for &DynamicChain<S> {
    type Output = DynamicChain<S>;

    fn bitor(self, other: &DynamicChain<S>) -> Self::Output {
        let mut chain = self.clone();
        chain.append_chain(other);
        chain
    }
}
