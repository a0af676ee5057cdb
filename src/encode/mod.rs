//! The reverse-order BER encoder (spec §4.5): per-operation encoders that
//! push a message's fields into an [`crate::ber::Asn1Buffer`] from
//! innermost field outward, in each constructed value's *reverse*
//! declared order, so that the buffer's single final reversal
//! ([`crate::ber::Asn1Buffer::into_bytes`]) produces canonical forward
//! BER with no second length-sizing pass.
//!
//! This module has no direct analog in the teacher crate (a decode-only
//! parser); it is grounded on the same RFC 4511 ASN.1 productions the
//! teacher's decode side documents, run in reverse, per Design Note 1 and
//! 3 (threaded buffer instead of decorator state; reverse index-order
//! iteration instead of list-iterator recursion).

pub mod control;
pub mod filter;
pub mod message;

use crate::ber::tag::Class;
use crate::ber::{primitives::minimal_integer_bytes, Asn1Buffer};
use crate::error::EncodeResult;

pub fn push_integer(buf: &mut Asn1Buffer, v: i64) -> EncodeResult<()> {
    let bytes = minimal_integer_bytes(v);
    buf.encode_primitive(Class::Universal, 0x02, &bytes)
}

pub fn push_enumerated(buf: &mut Asn1Buffer, v: i32) -> EncodeResult<()> {
    let bytes = minimal_integer_bytes(v as i64);
    buf.encode_primitive(Class::Universal, 0x0A, &bytes)
}

pub fn push_boolean(buf: &mut Asn1Buffer, v: bool) -> EncodeResult<()> {
    buf.encode_primitive(Class::Universal, 0x01, &[if v { 0xFF } else { 0x00 }])
}

pub fn push_octet_string(buf: &mut Asn1Buffer, bytes: &[u8]) -> EncodeResult<()> {
    buf.encode_primitive(Class::Universal, 0x04, bytes)
}

pub fn push_utf8(buf: &mut Asn1Buffer, s: &str) -> EncodeResult<()> {
    push_octet_string(buf, s.as_bytes())
}

pub fn push_context_octet_string(buf: &mut Asn1Buffer, tag: u32, bytes: &[u8]) -> EncodeResult<()> {
    buf.encode_primitive(Class::ContextSpecific, tag, bytes)
}

pub fn push_context_utf8(buf: &mut Asn1Buffer, tag: u32, s: &str) -> EncodeResult<()> {
    push_context_octet_string(buf, tag, s.as_bytes())
}

/// Writes a primitive (not constructed) APPLICATION tag carrying raw
/// content octets directly, for the two protocolOp variants whose
/// content is an implicitly-tagged scalar rather than a SEQUENCE
/// (`DelRequest`'s LDAPDN, `AbandonRequest`'s INTEGER).
pub fn push_application_primitive(buf: &mut Asn1Buffer, tag: u32, bytes: &[u8]) -> EncodeResult<()> {
    buf.encode_primitive(Class::Application, tag, bytes)
}

pub fn encode_sequence(
    buf: &mut Asn1Buffer,
    body: impl FnOnce(&mut Asn1Buffer) -> EncodeResult<()>,
) -> EncodeResult<()> {
    buf.encode_constructed(Class::Universal, 0x10, body)
}

pub fn encode_set(
    buf: &mut Asn1Buffer,
    body: impl FnOnce(&mut Asn1Buffer) -> EncodeResult<()>,
) -> EncodeResult<()> {
    buf.encode_constructed(Class::Universal, 0x11, body)
}

pub fn encode_application(
    buf: &mut Asn1Buffer,
    tag: u32,
    body: impl FnOnce(&mut Asn1Buffer) -> EncodeResult<()>,
) -> EncodeResult<()> {
    buf.encode_constructed(Class::Application, tag, body)
}

pub fn encode_context(
    buf: &mut Asn1Buffer,
    tag: u32,
    body: impl FnOnce(&mut Asn1Buffer) -> EncodeResult<()>,
) -> EncodeResult<()> {
    buf.encode_constructed(Class::ContextSpecific, tag, body)
}
