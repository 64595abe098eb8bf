//! Integration tests for the execution-chain-internals crate.
//!
//! The tests exercise the raw holder through its public API only:
//!
//! ## Construction and views
//! - `test_inline_value_base_view`: Inline values seen through a trait object
//! - `test_identity_base`: Values whose base type is their own type
//! - `test_mutation_through_base`: Writes through `base_mut` are visible to
//!   downcasts
//!
//! ## Copying
//! - `test_duplicate_keeps_concrete_type`: Copies report the same concrete type
//!   and are independent
//! - `test_external_unsized_with_closure_strategy`: Boxed trait objects copied
//!   by a user closure
//! - `test_strategy_state_is_copied`: Stateful strategies travel with copies
//! - `test_default_copy_strategy`: Boxed values copied through `Clone`
//!
//! ## Delegation
//! - `test_delegate_forwards_everything`: Narrow-to-broad conversion keeps the
//!   concrete type and the value
//! - `test_nested_delegates`: Delegates of delegates
//!
//! ## Lifetime management
//! - `test_drop_tracking_inline`: Every created value is dropped exactly once
//! - `test_drop_tracking_delegate`: Dropping a delegate drops the inner value
//! - `test_custom_dispose_runs`: `CopyStrategy::dispose` is used for external
//!   values

use std::{
    any::{Any, TypeId},
    cell::{Cell, RefCell},
    rc::Rc,
};

use execution_chain_internals::{
    RawValue,
    strategies::{CopyStrategy, DefaultCopy, Upcast},
};

trait Shape {
    fn area(&self) -> f64;
    fn scale(&mut self, factor: f64);
}

trait Round: Shape {
    fn radius(&self) -> f64;
}

impl<U: Shape + 'static> Upcast<U> for dyn Shape {
    fn upcast_ref(value: &U) -> &Self {
        value
    }

    fn upcast_mut(value: &mut U) -> &mut Self {
        value
    }
}

impl<U: Round + 'static> Upcast<U> for dyn Round {
    fn upcast_ref(value: &U) -> &Self {
        value
    }

    fn upcast_mut(value: &mut U) -> &mut Self {
        value
    }
}

impl Upcast<dyn Round> for dyn Shape {
    fn upcast_ref<'a>(value: &'a (dyn Round + 'static)) -> &'a Self {
        value
    }

    fn upcast_mut<'a>(value: &'a mut (dyn Round + 'static)) -> &'a mut Self {
        value
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Square {
    side: f64,
}

impl Shape for Square {
    fn area(&self) -> f64 {
        self.side * self.side
    }

    fn scale(&mut self, factor: f64) {
        self.side *= factor;
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Circle {
    radius: f64,
}

impl Shape for Circle {
    fn area(&self) -> f64 {
        3.0 * self.radius * self.radius
    }

    fn scale(&mut self, factor: f64) {
        self.radius *= factor;
    }
}

impl Round for Circle {
    fn radius(&self) -> f64 {
        self.radius
    }
}

#[test]
fn test_inline_value_base_view() {
    let square = RawValue::<dyn Shape>::new_inline(Square { side: 3.0 });
    let circle = RawValue::<dyn Shape>::new_inline(Circle { radius: 1.0 });

    assert_eq!(square.as_ref().base().area(), 9.0);
    assert_eq!(circle.as_ref().base().area(), 3.0);

    assert_eq!(square.as_ref().concrete_type_id(), TypeId::of::<Square>());
    assert_eq!(circle.as_ref().concrete_type_id(), TypeId::of::<Circle>());
    assert!(square.as_ref().concrete_type_name().ends_with("Square"));

    assert_eq!(
        square.as_ref().downcast::<Square>(),
        Some(&Square { side: 3.0 })
    );
    assert!(square.as_ref().downcast::<Circle>().is_none());
}

#[test]
fn test_identity_base() {
    let mut value = RawValue::<String>::new_inline(String::from("step"));
    value.as_mut().base_mut().push_str("ped");
    assert_eq!(value.as_ref().base(), "stepped");
    assert_eq!(value.as_ref().concrete_type_id(), TypeId::of::<String>());
}

#[test]
fn test_mutation_through_base() {
    let mut value = RawValue::<dyn Shape>::new_inline(Square { side: 2.0 });
    value.as_mut().base_mut().scale(2.0);

    assert_eq!(value.as_ref().base().area(), 16.0);
    assert_eq!(
        value.as_mut().downcast_mut::<Square>().map(|s| s.side),
        Some(4.0)
    );
}

#[test]
fn test_duplicate_keeps_concrete_type() {
    let mut original = RawValue::<dyn Shape>::new_inline(Circle { radius: 2.0 });
    let copy = original.as_ref().duplicate();

    assert_eq!(
        copy.as_ref().concrete_type_id(),
        original.as_ref().concrete_type_id()
    );

    original.as_mut().base_mut().scale(10.0);

    assert_eq!(
        original.as_ref().downcast::<Circle>(),
        Some(&Circle { radius: 20.0 })
    );
    assert_eq!(
        copy.as_ref().downcast::<Circle>(),
        Some(&Circle { radius: 2.0 })
    );
}

#[test]
fn test_external_unsized_with_closure_strategy() {
    // The static type of the box is the trait object itself, so the strategy is
    // the only thing that knows how to produce a copy.
    let boxed: Box<dyn Shape> = Box::new(Square { side: 5.0 });
    let strategy = |shape: &(dyn Shape + 'static)| -> Box<dyn Shape> {
        Box::new(Square {
            side: shape.area().sqrt(),
        })
    };

    let original = RawValue::<dyn Shape>::new_external(boxed, strategy);
    let mut copy = original.as_ref().duplicate();
    copy.as_mut().base_mut().scale(2.0);

    assert_eq!(original.as_ref().base().area(), 25.0);
    assert_eq!(copy.as_ref().base().area(), 100.0);

    // The concrete type recorded for an unsized box is the unsized type.
    assert_eq!(
        original.as_ref().concrete_type_id(),
        TypeId::of::<dyn Shape>()
    );
    assert!(original.as_ref().downcast::<Square>().is_none());
}

#[test]
fn test_strategy_state_is_copied() {
    #[derive(Clone)]
    struct Tagged {
        copies: Rc<Cell<usize>>,
    }

    impl CopyStrategy<u32> for Tagged {
        fn copy(&self, value: &u32) -> Box<u32> {
            self.copies.set(self.copies.get() + 1);
            Box::new(*value + 1)
        }
    }

    let copies = Rc::new(Cell::new(0));
    let first = RawValue::<dyn Any>::new_external(
        Box::new(1_u32),
        Tagged {
            copies: copies.clone(),
        },
    );
    let second = first.as_ref().duplicate();
    let third = second.as_ref().duplicate();

    assert_eq!(copies.get(), 2);
    assert_eq!(first.as_ref().downcast::<u32>(), Some(&1));
    assert_eq!(second.as_ref().downcast::<u32>(), Some(&2));
    assert_eq!(third.as_ref().downcast::<u32>(), Some(&3));
}

#[test]
fn test_delegate_forwards_everything() {
    let round = RawValue::<dyn Round>::new_inline(Circle { radius: 1.5 });
    assert_eq!(round.as_ref().base().radius(), 1.5);

    let mut shape = RawValue::<dyn Shape>::new_delegate(round);
    assert_eq!(shape.as_ref().concrete_type_id(), TypeId::of::<Circle>());
    assert!(shape.as_ref().concrete_type_name().ends_with("Circle"));
    assert_eq!(shape.as_ref().base().area(), 6.75);

    shape.as_mut().base_mut().scale(2.0);
    assert_eq!(
        shape.as_ref().downcast::<Circle>(),
        Some(&Circle { radius: 3.0 })
    );

    let copy = shape.as_ref().duplicate();
    shape.as_mut().base_mut().scale(0.0);
    assert_eq!(copy.as_ref().base().area(), 27.0);
    assert_eq!(shape.as_ref().base().area(), 0.0);
}

#[test]
fn test_nested_delegates() {
    let inner = RawValue::<Circle>::new_inline(Circle { radius: 1.0 });
    let round = RawValue::<dyn Round>::new_delegate(inner);
    let shape = RawValue::<dyn Shape>::new_delegate(round);

    assert_eq!(shape.as_ref().concrete_type_id(), TypeId::of::<Circle>());
    assert_eq!(shape.as_ref().base().area(), 3.0);
    assert!(shape.as_ref().downcast::<Circle>().is_some());
}

/// A value that records its creation, copies and destruction.
#[derive(Debug)]
struct DropCounter {
    name: String,
    log: Rc<RefCell<Vec<String>>>,
}

impl DropCounter {
    fn new(name: &str, log: Rc<RefCell<Vec<String>>>) -> Self {
        log.borrow_mut().push(format!("Created: {name}"));
        Self {
            name: name.to_string(),
            log,
        }
    }
}

impl Clone for DropCounter {
    fn clone(&self) -> Self {
        Self::new(&format!("{}'", self.name), self.log.clone())
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("Dropped: {}", self.name));
    }
}

#[test]
fn test_drop_tracking_inline() {
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    {
        let original = RawValue::<dyn Any>::new_inline(DropCounter::new("value", log.clone()));
        let copy = original.as_ref().duplicate();

        assert_eq!(*log.borrow(), ["Created: value", "Created: value'"]);

        drop(original);
        assert_eq!(log.borrow().last().map(String::as_str), Some("Dropped: value"));

        assert_eq!(
            copy.as_ref().downcast::<DropCounter>().map(|c| c.name.as_str()),
            Some("value'")
        );
    }

    let log = log.borrow();
    assert_eq!(log.len(), 4);
    assert_eq!(log[3], "Dropped: value'");
}

#[test]
fn test_drop_tracking_delegate() {
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    let inner = RawValue::<DropCounter>::new_inline(DropCounter::new("inner", log.clone()));
    let outer = RawValue::<dyn Any>::new_delegate(inner);
    assert_eq!(log.borrow().len(), 1);

    drop(outer);

    assert_eq!(*log.borrow(), ["Created: inner", "Dropped: inner"]);
}

#[test]
fn test_custom_dispose_runs() {
    #[derive(Clone)]
    struct Recycler {
        disposed: Rc<RefCell<Vec<u8>>>,
    }

    impl CopyStrategy<u8> for Recycler {
        fn copy(&self, value: &u8) -> Box<u8> {
            Box::new(*value)
        }

        fn dispose(&self, value: Box<u8>) {
            self.disposed.borrow_mut().push(*value);
        }
    }

    let disposed = Rc::new(RefCell::new(Vec::new()));
    let strategy = Recycler {
        disposed: disposed.clone(),
    };

    let first = RawValue::<dyn Any>::new_external(Box::new(1_u8), strategy.clone());
    let second = RawValue::<dyn Any>::new_external(Box::new(2_u8), strategy);
    let copy = second.as_ref().duplicate();

    drop(second);
    drop(first);
    assert_eq!(*disposed.borrow(), [2, 1]);

    drop(copy);
    assert_eq!(*disposed.borrow(), [2, 1, 2]);
}

#[test]
fn test_default_copy_strategy() {
    let original = RawValue::<dyn Any>::new_external(Box::new(vec![1, 2, 3]), DefaultCopy);
    let copy = original.as_ref().duplicate();

    assert_eq!(
        copy.as_ref().downcast::<Vec<i32>>().map(Vec::as_slice),
        Some(&[1, 2, 3][..])
    );
    assert_eq!(
        copy.as_ref().concrete_type_id(),
        TypeId::of::<Vec<i32>>()
    );
}
