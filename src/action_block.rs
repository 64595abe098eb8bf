//! A single type-erased step of a [`DynamicChain`](crate::DynamicChain).

use core::{any::TypeId, fmt};

use crate::{action::Action, erased_value::ErasedValue, signature::Signature};

/// One action, with its concrete type erased behind [`Action<S>`].
///
/// The action is held in an [`ErasedValue`], so a block is cloned by cloning
/// the action itself.
///
/// ```
/// use execution_chain::ActionBlock;
///
/// let mut block = ActionBlock::<(u32,)>::new(|n: &mut u32| *n += 1);
/// let mut copy = block.clone();
///
/// let mut n = 0;
/// assert!(block.execute((&mut n,)));
/// assert!(copy.execute((&mut n,)));
/// assert_eq!(n, 2);
/// ```
pub struct ActionBlock<S: Signature> {
    action: ErasedValue<dyn Action<S>>,
}

impl<S: Signature> ActionBlock<S> {
    /// Wraps `action`.
    pub fn new<A>(action: A) -> Self
    where
        A: Action<S> + Clone + 'static,
    {
        Self {
            action: ErasedValue::new(action),
        }
    }

    /// Runs the action with `args` and returns its continuation signal.
    #[inline]
    pub fn execute(&mut self, args: S::Refs<'_>) -> bool {
        self.action.run(args)
    }

    /// The type name of the wrapped action.
    pub fn action_type_name(&self) -> &'static str {
        self.action.concrete_type_name().unwrap_or("<empty>")
    }

    /// The [`TypeId`] of the wrapped action.
    pub fn action_type_id(&self) -> Option<TypeId> {
        self.action.concrete_type_id()
    }

    /// The wrapped action as an `A`, if that is its type.
    pub fn downcast_ref<A: 'static>(&self) -> Option<&A> {
        self.action.downcast_ref()
    }

    /// The wrapped action as a mutable `A`, if that is its type.
    pub fn downcast_mut<A: 'static>(&mut self) -> Option<&mut A> {
        self.action.downcast_mut()
    }
}

impl<S: Signature> Action<S> for ActionBlock<S> {
    #[inline]
    fn run(&mut self, args: S::Refs<'_>) -> bool {
        self.execute(args)
    }
}

impl<S: Signature> Clone for ActionBlock<S> {
    fn clone(&self) -> Self {
        Self {
            action: self.action.clone(),
        }
    }
}

impl<S: Signature> fmt::Debug for ActionBlock<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionBlock")
            .field(&format_args!("{}", self.action_type_name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        calls: u32,
    }

    impl Action<(i32,)> for Counter {
        fn run(&mut self, (value,): (&mut i32,)) -> bool {
            self.calls += 1;
            *value += 1;
            *value > 0
        }
    }

    #[test]
    fn test_state_lives_in_block() {
        let mut block = ActionBlock::<(i32,)>::new(Counter { calls: 0 });
        let mut value = -2;

        assert!(!block.execute((&mut value,)));
        assert!(!block.execute((&mut value,)));
        assert!(block.execute((&mut value,)));

        assert_eq!(value, 1);
        assert_eq!(block.downcast_ref::<Counter>(), Some(&Counter { calls: 3 }));
        assert_eq!(block.action_type_id(), Some(TypeId::of::<Counter>()));
    }

    #[test]
    fn test_clone_copies_state() {
        let mut block = ActionBlock::<(i32,)>::new(Counter { calls: 0 });
        block.execute((&mut 0,));

        let mut copy = block.clone();
        copy.execute((&mut 0,));

        assert_eq!(block.downcast_ref::<Counter>().map(|c| c.calls), Some(1));
        assert_eq!(copy.downcast_ref::<Counter>().map(|c| c.calls), Some(2));

        if let Some(counter) = copy.downcast_mut::<Counter>() {
            counter.calls = 10;
        }
        assert_eq!(copy.downcast_ref::<Counter>().map(|c| c.calls), Some(10));
    }

    #[test]
    fn test_debug_names_action() {
        let block = ActionBlock::<(i32,)>::new(Counter { calls: 0 });
        assert!(format!("{block:?}").contains("Counter"));
        assert!(block.action_type_name().ends_with("Counter"));
    }
}
