//! The reverse-order BER writer (spec §4.5).
//!
//! `Asn1Buffer` is appended to from innermost value outward; the finished
//! message is obtained by reversing the accumulated bytes exactly once.
//! Every push method below pushes bytes in "push order" — the order that,
//! after that single final reversal, yields the canonical forward BER
//! encoding. Concretely: a primitive's content bytes are pushed back to
//! front, a constructed value's children are pushed last-child-first, and
//! the length/tag are always pushed after (i.e. end up first after
//! reversal, in front of) the body they describe.

use super::length::push_length;
use super::tag::{write_tag_byte, Class};
use crate::error::EncodeResult;

#[derive(Debug, Default)]
pub struct Asn1Buffer {
    buf: Vec<u8>,
}

impl Asn1Buffer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Current write position. Subtracting a position recorded before
    /// writing a body from the position after gives the body's length.
    pub fn pos(&self) -> usize {
        self.buf.len()
    }

    /// Pushes the content octets of a primitive value.
    pub fn push_content(&mut self, bytes: &[u8]) {
        for &b in bytes.iter().rev() {
            self.buf.push(b);
        }
    }

    /// Pushes a single already-final-order byte (used for tags).
    fn push_byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    /// Closes a TLV whose body was written since `mark`: writes the
    /// length (computed from `pos() - mark`) and then the identifier
    /// octet, in that push order.
    pub fn close_tlv(&mut self, mark: usize, class: Class, constructed: bool, tag: u32) -> EncodeResult<()> {
        let len = self.pos() - mark;
        push_length(&mut self.buf, len)?;
        self.push_byte(write_tag_byte(class, constructed, tag));
        Ok(())
    }

    /// Encodes a primitive TLV (tag, length, raw content) in one step.
    pub fn encode_primitive(
        &mut self,
        class: Class,
        tag: u32,
        content: &[u8],
    ) -> EncodeResult<()> {
        let mark = self.pos();
        self.push_content(content);
        self.close_tlv(mark, class, false, tag)
    }

    /// Runs `body` to write a constructed value's children (which must
    /// push themselves in reverse child order), then closes the TLV.
    pub fn encode_constructed(
        &mut self,
        class: Class,
        tag: u32,
        body: impl FnOnce(&mut Self) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        let mark = self.pos();
        body(self)?;
        self.close_tlv(mark, class, true, tag)
    }

    /// Runs `body` to write a primitive value's content, then wraps it in
    /// a `class`/`tag` TLV — *unless* `body` wrote nothing, in which case
    /// the wrapper itself is omitted. This is how a registry factory's
    /// `encode_value` (which only knows how to write content, not the
    /// enclosing OPTIONAL OCTET STRING) composes with a valueless marker
    /// control/extended op: zero bytes written means the field is absent
    /// on the wire, not present-but-empty.
    pub fn encode_primitive_wrapped(
        &mut self,
        class: Class,
        tag: u32,
        body: impl FnOnce(&mut Self) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        let mark = self.pos();
        body(self)?;
        if self.pos() == mark {
            return Ok(());
        }
        self.close_tlv(mark, class, false, tag)
    }

    /// Consumes the buffer, producing the final wire-order bytes.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buf.reverse();
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_primitive_round_trips_forward_order() {
        let mut buf = Asn1Buffer::new();
        buf.encode_primitive(Class::Universal, 0x04, b"cn").unwrap();
        assert_eq!(buf.into_bytes(), vec![0x04, 0x02, b'c', b'n']);
    }

    #[test]
    fn constructed_wraps_children_in_declared_order() {
        let mut buf = Asn1Buffer::new();
        buf.encode_constructed(Class::Universal, 0x10, |buf| {
            // push last-declared-field-first so that after the single
            // global reversal the fields read in declared order.
            buf.encode_primitive(Class::Universal, 0x02, &[0x05])?;
            buf.encode_primitive(Class::Universal, 0x02, &[0x01])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(
            buf.into_bytes(),
            vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x05]
        );
    }
}
