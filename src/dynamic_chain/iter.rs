use alloc::vec;
use core::{iter::FusedIterator, slice};

use crate::{action_block::ActionBlock, signature::Signature};

/// An iterator over the blocks of a [`DynamicChain`], in execution order.
///
/// ```
/// use execution_chain::DynamicChain;
///
/// let mut chain = DynamicChain::<(u8,)>::new();
/// chain.append(|_: &mut u8| {}).append(|_: &mut u8| true);
///
/// let names: Vec<_> = chain.iter().map(|block| block.action_type_name()).collect();
/// assert_eq!(names.len(), 2);
/// ```
///
/// [`DynamicChain`]: crate::DynamicChain
#[must_use]
pub struct DynamicChainIter<'a, S: Signature> {
    blocks: slice::Iter<'a, ActionBlock<S>>,
}

impl<'a, S: Signature> DynamicChainIter<'a, S> {
    pub(crate) fn new(blocks: &'a [ActionBlock<S>]) -> Self {
        Self {
            blocks: blocks.iter(),
        }
    }
}

impl<'a, S: Signature> Iterator for DynamicChainIter<'a, S> {
    type Item = &'a ActionBlock<S>;

    fn next(&mut self) -> Option<Self::Item> {
        self.blocks.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.blocks.size_hint()
    }
}

impl<S: Signature> DoubleEndedIterator for DynamicChainIter<'_, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.blocks.next_back()
    }
}

impl<S: Signature> ExactSizeIterator for DynamicChainIter<'_, S> {
    fn len(&self) -> usize {
        self.blocks.len()
    }
}

impl<S: Signature> FusedIterator for DynamicChainIter<'_, S> {}

/// An iterator that moves the blocks out of a [`DynamicChain`].
///
/// [`DynamicChain`]: crate::DynamicChain
#[must_use]
pub struct DynamicChainIntoIter<S: Signature> {
    blocks: vec::IntoIter<ActionBlock<S>>,
}

impl<S: Signature> DynamicChainIntoIter<S> {
    pub(crate) fn new(blocks: alloc::vec::Vec<ActionBlock<S>>) -> Self {
        Self {
            blocks: blocks.into_iter(),
        }
    }
}

impl<S: Signature> Iterator for DynamicChainIntoIter<S> {
    type Item = ActionBlock<S>;

    fn next(&mut self) -> Option<Self::Item> {
        self.blocks.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.blocks.size_hint()
    }
}

impl<S: Signature> DoubleEndedIterator for DynamicChainIntoIter<S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.blocks.next_back()
    }
}

impl<S: Signature> ExactSizeIterator for DynamicChainIntoIter<S> {
    fn len(&self) -> usize {
        self.blocks.len()
    }
}

impl<S: Signature> FusedIterator for DynamicChainIntoIter<S> {}
