use core::any::{TypeId, type_name};

/// The runtime type of an object did not match the static type it was
/// stored as.
///
/// Returned by [`ErasedValue::try_from_any`](crate::ErasedValue::try_from_any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("expected an object of type `{expected}`, found an object of another type")]
pub struct TypeMismatch {
    expected: &'static str,
    expected_id: TypeId,
    found: TypeId,
}

impl TypeMismatch {
    pub(crate) fn new<U: 'static>(found: TypeId) -> Self {
        Self {
            expected: type_name::<U>(),
            expected_id: TypeId::of::<U>(),
            found,
        }
    }

    /// The name of the type the object was expected to have.
    pub fn expected_type_name(&self) -> &'static str {
        self.expected
    }

    /// The [`TypeId`] of the type the object was expected to have.
    pub fn expected_type_id(&self) -> TypeId {
        self.expected_id
    }

    /// The [`TypeId`] of the object's actual type.
    pub fn found_type_id(&self) -> TypeId {
        self.found
    }
}
