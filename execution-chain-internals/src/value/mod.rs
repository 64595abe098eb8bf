//! Module containing the erased value holder.

pub(crate) mod data;
mod raw;
mod storage;
pub(crate) mod vtable;

pub use self::raw::{RawValue, RawValueMut, RawValueRef};
