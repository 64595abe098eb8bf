/// Declares that every implementor of a trait can be held by an
/// [`ErasedValue`] of that trait object.
///
/// `derive_upcast!(dyn Shape)` expands to an implementation of
/// [`Upcast<U>`] for `dyn Shape` covering every `U: Shape + 'static`. It must
/// be invoked in the crate that defines the trait.
///
/// Extra auto traits can be added to the object type, in which case they are
/// also required from the implementors.
///
/// [`ErasedValue`]: crate::ErasedValue
/// [`Upcast<U>`]: crate::strategies::Upcast
///
/// # Examples
///
/// ```
/// use execution_chain::prelude::*;
///
/// trait Greeter {
///     fn greet(&self) -> String;
/// }
///
/// derive_upcast!(dyn Greeter);
/// derive_upcast!(dyn Greeter + Send);
///
/// #[derive(Clone)]
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// let greeter = ErasedValue::<dyn Greeter>::new(English);
/// assert_eq!(greeter.greet(), "hello");
///
/// let sendable = ErasedValue::<dyn Greeter + Send>::new(English);
/// assert_eq!(sendable.greet(), "hello");
/// ```
#[macro_export]
macro_rules! derive_upcast {
    (dyn $($bound:tt)+) => {
        impl<__U: $($bound)+ + 'static> $crate::__private::Upcast<__U> for dyn $($bound)+ {
            #[inline]
            fn upcast_ref(value: &__U) -> &Self {
                value
            }

            #[inline]
            fn upcast_mut(value: &mut __U) -> &mut Self {
                value
            }
        }
    };
}

/// Builds a [`StaticChain`] from a list of actions.
///
/// `static_chain![a, b, c]` is the same as `start_chain().then(a).then(b).then(c)`,
/// and `static_chain![]` is the empty chain.
///
/// [`StaticChain`]: crate::StaticChain
///
/// # Examples
///
/// ```
/// use execution_chain::prelude::*;
///
/// let mut chain = static_chain![
///     |v: &mut Vec<u8>| v.push(1),
///     |v: &mut Vec<u8>| v.push(2),
/// ];
///
/// let mut v = Vec::new();
/// chain.execute(&mut v);
/// assert_eq!(v, [1, 2]);
/// assert_eq!(chain.len(), 2);
/// ```
#[macro_export]
macro_rules! static_chain {
    () => {
        $crate::StaticChain::new()
    };
    ($($action:expr),+ $(,)?) => {
        $crate::StaticChain::new()$(.then($action))+
    };
}
