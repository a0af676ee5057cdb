//! The "no factory registered" fallback.
//!
//! There is no `OpaqueControlFactory` type: a [`crate::model::Control`]'s
//! `control_value` already carries the raw octets whether or not a
//! factory decoded them, so leaving `CodecRegistry::control(oid)` at
//! `None` *is* the opaque path. [`OpaqueValue`] exists for callers that
//! want to hold onto raw bytes behind the same
//! [`crate::registry::DecodedValue`] trait object other factories use
//! (e.g. to cache a lookup miss uniformly).

use crate::registry::DecodedValue;
use std::any::Any;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueValue(pub Vec<u8>);

impl DecodedValue for OpaqueValue {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
