//! Simple Paged Results (RFC 2696), OID `1.2.840.113556.1.4.319`.
//!
//! `realSearchControlValue ::= SEQUENCE { size INTEGER (0..maxInt),
//! cookie OCTET STRING }`. Chosen as the registry's worked example of a
//! control whose `controlValue` drives a genuine nested grammar rather
//! than returning raw bytes untouched.

use crate::ber::tag::Class;
use crate::ber::Asn1Buffer;
use crate::engine::{expect_done, Reader};
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::registry::{ControlFactory, DecodedValue};
use std::any::Any;

pub const OID: &str = "1.2.840.113556.1.4.319";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResultsValue {
    pub size: u32,
    pub cookie: Vec<u8>,
}

impl DecodedValue for PagedResultsValue {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn DecodedValue> {
        Box::new(self.clone())
    }
}

pub struct PagedResultsFactory;

impl ControlFactory for PagedResultsFactory {
    fn oid(&self) -> &'static str {
        OID
    }

    fn decode_value(&self, raw: Option<&[u8]>) -> DecodeResult<Box<dyn DecodedValue>> {
        let raw = raw.ok_or(DecodeError::Protocol {
            offset: 0,
            state: "PagedResultsControl",
            reason: "controlValue is required",
        })?;
        let mut outer = Reader::new(raw, 0, true);
        let mut body = expect_done(outer.enter_sequence(), "truncated PagedResultsControl value")?;
        let size =
            expect_done(body.read_integer_range(0, u32::MAX as i64), "truncated PagedResultsControl size")?
                as u32;
        let cookie =
            expect_done(body.read_octet_string(), "truncated PagedResultsControl cookie")?.to_vec();
        if !body.is_empty() {
            return Err(DecodeError::Protocol {
                offset: 0,
                state: "PagedResultsControl",
                reason: "unexpected trailing bytes",
            });
        }
        Ok(Box::new(PagedResultsValue { size, cookie }))
    }

    fn encode_value(&self, value: &dyn DecodedValue, buf: &mut Asn1Buffer) -> EncodeResult<()> {
        let v = value
            .as_any()
            .downcast_ref::<PagedResultsValue>()
            .expect("registry guarantees matching DecodedValue type");
        buf.encode_constructed(Class::Universal, 0x10, |buf| {
            buf.encode_primitive(Class::Universal, 0x04, &v.cookie)?;
            let size_bytes = crate::ber::primitives::minimal_integer_bytes(v.size as i64);
            buf.encode_primitive(Class::Universal, 0x02, &size_bytes)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_size_and_cookie() {
        let factory = PagedResultsFactory;
        // SEQUENCE { size=10, cookie="abc" }
        let wire: &[u8] = &[0x30, 0x08, 0x02, 0x01, 0x0A, 0x04, 0x03, b'a', b'b', b'c'];
        let decoded = factory.decode_value(Some(wire)).unwrap();
        let v = decoded.as_any().downcast_ref::<PagedResultsValue>().unwrap();
        assert_eq!(v.size, 10);
        assert_eq!(v.cookie, b"abc");

        let mut buf = Asn1Buffer::new();
        factory.encode_value(decoded.as_ref(), &mut buf).unwrap();
        assert_eq!(buf.into_bytes(), wire);
    }

    #[test]
    fn empty_cookie_round_trips() {
        let factory = PagedResultsFactory;
        let wire: &[u8] = &[0x30, 0x05, 0x02, 0x01, 0x00, 0x04, 0x00];
        let decoded = factory.decode_value(Some(wire)).unwrap();
        let mut buf = Asn1Buffer::new();
        factory.encode_value(decoded.as_ref(), &mut buf).unwrap();
        assert_eq!(buf.into_bytes(), wire);
    }
}
