//! Encoding of the `Controls` envelope list (spec §4.1.11/§4.5).
//!
//! `Controls ::= [0] SEQUENCE OF Control`, `Control ::= SEQUENCE {
//! controlType LDAPOID, criticality BOOLEAN DEFAULT FALSE, controlValue
//! OCTET STRING OPTIONAL }`. The list is pushed in reverse insertion
//! order (Design Note 3) so that after the buffer's single global
//! reversal controls reappear in their original order.

use super::{encode_context, encode_sequence, push_boolean, push_octet_string, push_utf8};
use crate::ber::tag::Class;
use crate::ber::Asn1Buffer;
use crate::error::EncodeResult;
use crate::model::Control;
use crate::registry::CodecRegistry;

pub fn encode_controls(
    buf: &mut Asn1Buffer,
    controls: &[Control<'_>],
    registry: &CodecRegistry,
) -> EncodeResult<()> {
    if controls.is_empty() {
        return Ok(());
    }
    encode_context(buf, 0, |buf| {
        for control in controls.iter().rev() {
            encode_control(buf, control, registry)?;
        }
        Ok(())
    })
}

fn encode_control(
    buf: &mut Asn1Buffer,
    control: &Control<'_>,
    registry: &CodecRegistry,
) -> EncodeResult<()> {
    encode_sequence(buf, |buf| {
        encode_control_value(buf, control, registry)?;
        if control.criticality {
            push_boolean(buf, true)?;
        }
        push_utf8(buf, control.control_type.as_str())
    })
}

/// Prefers re-encoding `control.decoded` through its registered factory
/// over replaying the raw `control_value` bytes; falls back to the raw
/// bytes when either is absent (an opaque control, or a `decoded` value
/// whose registry this particular call doesn't carry a factory for).
fn encode_control_value(
    buf: &mut Asn1Buffer,
    control: &Control<'_>,
    registry: &CodecRegistry,
) -> EncodeResult<()> {
    if let Some(decoded) = &control.decoded {
        if let Some(factory) = registry.control(control.oid()) {
            return buf.encode_primitive_wrapped(Class::Universal, 0x04, |buf| {
                factory.encode_value(decoded.as_ref(), buf)
            });
        }
    }
    if let Some(value) = &control.control_value {
        push_octet_string(buf, value)?;
    }
    Ok(())
}
