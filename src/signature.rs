//! Argument signatures shared by chains and the actions they run.
//!
//! A [`Signature`] is a tuple of argument types, like `(i32, String)`. It
//! fixes the shape of the reference tuple an action receives
//! ([`Signature::Refs`], here `(&mut i32, &mut String)`) and the shape of the
//! read-only view a predicate receives ([`Signature::Views`]).
//!
//! [`ArgRefs`] goes the other way: it recovers the signature from the
//! references a caller hands to `execute`, so that both
//! `chain.execute(&mut x)` and `chain.execute((&mut x, &mut y))` work without
//! naming the signature again.

/// A tuple of argument types that actions are invoked with.
///
/// Implemented for tuples of up to eight `'static` types, including the empty
/// tuple.
pub trait Signature: 'static {
    /// The tuple of mutable references an action receives.
    type Refs<'a>
    where
        Self: 'a;

    /// The tuple of shared references a predicate receives.
    type Views<'a>
    where
        Self: 'a;

    /// The number of arguments.
    const ARITY: usize;

    /// Reborrows every reference in `refs` for a shorter lifetime, so the
    /// same arguments can be handed to several actions in turn.
    fn reborrow<'s>(refs: &'s mut Self::Refs<'_>) -> Self::Refs<'s>;

    /// Produces read-only views of every reference in `refs`.
    fn view<'s>(refs: &'s Self::Refs<'_>) -> Self::Views<'s>;
}

/// References to arguments, as passed by a caller to `execute`.
///
/// Implemented for a single `&mut A` (signature `(A,)`) and for tuples of
/// mutable references.
pub trait ArgRefs<'a>: Sized {
    /// The signature these references belong to.
    type Signature: Signature;

    /// Converts the references into the signature's reference tuple.
    fn into_refs(self) -> <Self::Signature as Signature>::Refs<'a>;
}

impl<'a, A: 'static> ArgRefs<'a> for &'a mut A {
    type Signature = (A,);

    #[inline]
    fn into_refs(self) -> (&'a mut A,) {
        (self,)
    }
}

macro_rules! impl_signature {
    ($arity:literal; $($ty:ident $idx:tt),*) => {
        impl<$($ty: 'static),*> Signature for ($($ty,)*) {
            type Refs<'a> = ($(&'a mut $ty,)*) where Self: 'a;
            type Views<'a> = ($(&'a $ty,)*) where Self: 'a;

            const ARITY: usize = $arity;

            #[inline]
            #[allow(clippy::unused_unit)]
            fn reborrow<'s>(refs: &'s mut Self::Refs<'_>) -> Self::Refs<'s> {
                let _ = &refs;
                ($(&mut *refs.$idx,)*)
            }

            #[inline]
            #[allow(clippy::unused_unit)]
            fn view<'s>(refs: &'s Self::Refs<'_>) -> Self::Views<'s> {
                let _ = &refs;
                ($(&*refs.$idx,)*)
            }
        }

        impl<'a, $($ty: 'static),*> ArgRefs<'a> for ($(&'a mut $ty,)*) {
            type Signature = ($($ty,)*);

            #[inline]
            fn into_refs(self) -> ($(&'a mut $ty,)*) {
                self
            }
        }
    };
}

impl_signature!(0;);
impl_signature!(1; A 0);
impl_signature!(2; A 0, B 1);
impl_signature!(3; A 0, B 1, C 2);
impl_signature!(4; A 0, B 1, C 2, D 3);
impl_signature!(5; A 0, B 1, C 2, D 3, E 4);
impl_signature!(6; A 0, B 1, C 2, D 3, E 4, F 5);
impl_signature!(7; A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_signature!(8; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
