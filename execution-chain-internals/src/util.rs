//! Internal utility types.

/// Marker type used when type-erasing the storage of a value.
///
/// This zero-sized type serves as a placeholder in generic type parameters
/// when the actual storage type has been erased. For example,
/// `ValueData<T, Erased>` represents a value whose storage (and therefore
/// concrete type) is unknown at the current scope, while the declared base
/// type `T` is still known.
///
/// Using a distinct marker type (rather than `()`) makes the intent clearer
/// in type signatures and error messages.
pub(crate) struct Erased;
