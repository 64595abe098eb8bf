//! Integration tests for `ErasedValue`.
//!
//! ## Value semantics
//! - `test_copy_keeps_concrete_type`: Copies are independent objects of the
//!   same concrete type, without a `clone` method on the trait
//! - `test_move_leaves_donor_empty`: Taking moves without copying
//! - `test_no_double_free`: Every object is dropped exactly once
//!
//! ## Conversions
//! - `test_upcast_between_trait_objects`: Narrow-to-broad conversion
//! - `test_custom_copier_for_lost_type`: Boxed trait objects with a copier
//! - `test_runtime_checked_construction`: `TypeMismatch` on slicing
//!
//! ## Observers
//! - `test_equality_through_base`, `test_no_value_sentinel`
//! - `test_get_or_and_downcast`

use std::{
    any::{Any, TypeId},
    cell::RefCell,
    fmt,
    rc::Rc,
};

use execution_chain::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

trait Shape: fmt::Display {
    fn area(&self) -> f64;
    fn scale(&mut self, factor: f64);
}

trait Round: Shape {
    fn radius(&self) -> f64;
}

derive_upcast!(dyn Shape);
derive_upcast!(dyn Round);

impl Upcast<dyn Round> for dyn Shape {
    fn upcast_ref<'a>(value: &'a (dyn Round + 'static)) -> &'a Self {
        value
    }

    fn upcast_mut<'a>(value: &'a mut (dyn Round + 'static)) -> &'a mut Self {
        value
    }
}

impl PartialEq for dyn Shape {
    fn eq(&self, other: &Self) -> bool {
        self.area() == other.area()
    }
}

#[derive(Clone, Debug, PartialEq, derive_more::Display)]
#[display("square({side})")]
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

#[derive(Clone, Debug, PartialEq, derive_more::Display, derive_more::From)]
#[display("circle({radius})")]
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
fn test_copy_keeps_concrete_type() {
    let original = ErasedValue::<dyn Shape>::new(Square { side: 2.0 });
    let mut copy = original.clone();

    assert_eq!(copy.concrete_type_id(), original.concrete_type_id());
    assert_eq!(copy.concrete_type_id(), Some(TypeId::of::<Square>()));

    copy.scale(3.0);
    assert_eq!(original.area(), 4.0);
    assert_eq!(copy.area(), 36.0);
    assert_eq!(copy.to_string(), "square(6)");
}

#[test]
fn test_move_leaves_donor_empty() {
    let mut donor = ErasedValue::<dyn Shape>::new(Circle::from(1.0));
    let moved = donor.take();

    assert!(donor.is_empty());
    assert!(donor == NoValue);
    assert!(moved.is::<Circle>());
    assert_eq!(moved.area(), 3.0);
}

#[test]
fn test_upcast_between_trait_objects() {
    let round = ErasedValue::<dyn Round>::new(Circle { radius: 2.0 });
    assert_eq!(round.radius(), 2.0);

    let shape: ErasedValue<dyn Shape> = round.upcast();
    assert_eq!(shape.area(), 12.0);
    assert_eq!(
        shape.downcast_ref::<Circle>(),
        Some(&Circle { radius: 2.0 })
    );

    let mut copy = shape.clone();
    copy.scale(0.5);
    assert_eq!(copy.downcast_ref::<Circle>().map(|c| c.radius), Some(1.0));
    assert_eq!(shape.downcast_ref::<Circle>().map(|c| c.radius), Some(2.0));

    let any: ErasedValue<dyn Any> =
        ErasedValue::<Circle>::new(Circle { radius: 1.0 }).upcast();
    assert!(any.is::<Circle>());
}

#[test]
fn test_custom_copier_for_lost_type() {
    let boxed: Box<dyn Shape> = Box::new(Square { side: 3.0 });
    let value = ErasedValue::<dyn Shape>::from_box_with(
        boxed,
        |shape: &(dyn Shape + 'static)| -> Box<dyn Shape> {
            Box::new(Square {
                side: shape.area().sqrt(),
            })
        },
    );

    let copy = value.clone();
    assert_eq!(copy.area(), 9.0);
    assert_eq!(copy.concrete_type_id(), Some(TypeId::of::<dyn Shape>()));
    assert!(copy.downcast_ref::<Square>().is_none());
}

#[test]
fn test_custom_dispose_runs_once() {
    #[derive(Clone)]
    struct Recycle {
        recycled: Rc<RefCell<Vec<u32>>>,
    }

    impl CopyStrategy<u32> for Recycle {
        fn copy(&self, value: &u32) -> Box<u32> {
            Box::new(*value + 100)
        }

        fn dispose(&self, value: Box<u32>) {
            self.recycled.borrow_mut().push(*value);
        }
    }

    let recycled = Rc::new(RefCell::new(Vec::new()));
    let value = ErasedValue::<dyn Any>::with_copier(
        1_u32,
        Recycle {
            recycled: recycled.clone(),
        },
    );
    let copy = value.clone();
    assert_eq!(copy.downcast_ref::<u32>(), Some(&101));

    drop(value);
    drop(copy);
    assert_eq!(*recycled.borrow(), [1, 101]);
}

#[test]
fn test_runtime_checked_construction() {
    init_tracing();

    let boxed: Box<dyn Any> = Box::new(Circle { radius: 1.0 });
    let error = match ErasedValue::<dyn Shape>::try_from_any::<Square>(boxed) {
        Ok(_) => panic!("a circle must not be accepted as a square"),
        Err(error) => error,
    };
    assert_eq!(error.expected_type_id(), TypeId::of::<Square>());
    assert_eq!(error.found_type_id(), TypeId::of::<Circle>());
    assert!(error.expected_type_name().ends_with("Square"));
    assert!(error.to_string().contains("Square"));

    let boxed: Box<dyn Any> = Box::new(Circle { radius: 1.0 });
    let value = ErasedValue::<dyn Shape>::try_from_any::<Circle>(boxed);
    assert!(value.is_ok_and(|value| value.is::<Circle>()));
}

#[test]
fn test_equality_through_base() {
    let a = make_erased::<dyn Shape, _>(Square { side: 2.0 });
    let b = make_erased::<dyn Shape, _>(Square { side: 2.0 });
    let c = make_erased::<dyn Shape, _>(Circle { radius: 2.0 });

    assert!(a == b);
    assert!(a != c);
    assert!(a != ErasedValue::<dyn Shape>::empty());
    assert!(ErasedValue::<dyn Shape>::empty() == ErasedValue::<dyn Shape>::empty());
}

#[test]
fn test_no_value_sentinel() {
    let mut value = ErasedValue::<dyn Shape>::new(Square { side: 1.0 });
    assert!(value != NoValue);
    assert!(NoValue != value);

    value = NoValue.into();
    assert!(value == NoValue);
    assert_eq!(value.concrete_type_id(), None);
    assert_eq!(format!("{value:?}"), "ErasedValue(<empty>)");
}

#[test]
fn test_get_or_and_downcast() {
    let fallback = Square { side: 10.0 };
    let empty = ErasedValue::<dyn Shape>::empty();
    assert_eq!(empty.get_or(&fallback).area(), 100.0);

    let mut value = ErasedValue::<dyn Shape>::new(Circle { radius: 1.0 });
    assert_eq!(value.get_or(&fallback).area(), 3.0);

    if let Some(circle) = value.downcast_mut::<Circle>() {
        circle.radius = 2.0;
    }
    assert_eq!(value.get().map(|shape| shape.area()), Some(12.0));
    assert!(value.downcast_ref::<Square>().is_none());
}

/// Records creation, copies and destruction of a value.
#[derive(derive_more::Display)]
#[display("{name}")]
struct Tracked {
    name: String,
    log: Rc<RefCell<Vec<String>>>,
}

impl Tracked {
    fn new(name: &str, log: Rc<RefCell<Vec<String>>>) -> Self {
        log.borrow_mut().push(format!("created {name}"));
        Self {
            name: name.to_string(),
            log,
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Self::new(&format!("{self}'"), self.log.clone())
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("dropped {self}"));
    }
}

impl Shape for Tracked {
    fn area(&self) -> f64 {
        0.0
    }

    fn scale(&mut self, _: f64) {}
}

#[test]
fn test_no_double_free() {
    let log = Rc::new(RefCell::new(Vec::new()));

    {
        let mut first = ErasedValue::<dyn Shape>::new(Tracked::new("a", log.clone()));
        let second = first.clone();
        let mut third = first.take();
        third.swap(&mut first);
        let _upcast: ErasedValue<dyn Any> =
            ErasedValue::<Tracked>::new(Tracked::new("b", log.clone())).upcast();
        drop(second);
    }

    let log = log.borrow();
    let created = log.iter().filter(|entry| entry.starts_with("created")).count();
    let dropped = log.iter().filter(|entry| entry.starts_with("dropped")).count();
    assert_eq!(created, 3);
    assert_eq!(dropped, 3);
    assert!(log.contains(&String::from("dropped a'")));
}
