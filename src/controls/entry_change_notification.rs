//! EntryChangeNotification (RFC 4528 §3), OID `2.16.840.1.113730.3.4.7`.
//!
//! Resolves the spec's first Open Question: the wire value `-1` for
//! `changeNumber` and an altogether-absent `changeNumber` are kept
//! distinguishable on decode (`ChangeNumber::Undefined` vs
//! `ChangeNumber::Absent`), since a caller may care which one the peer
//! actually sent. On encode, both `Absent` and `Undefined` omit the field
//! — RFC 4528 defines `-1` purely as "value unknown", which is exactly
//! what omission already means, so there is no wire difference to
//! preserve in that direction. Any other negative `changeNumber` is
//! rejected as malformed.

use crate::ber::tag::Class;
use crate::ber::Asn1Buffer;
use crate::engine::{expect_done, Reader};
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::registry::{ControlFactory, DecodedValue};
use std::any::Any;

pub const OID: &str = "2.16.840.1.113730.3.4.7";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Add,
    Delete,
    Modify,
    ModDn,
}

impl ChangeType {
    fn from_wire(v: i32) -> Option<ChangeType> {
        match v {
            1 => Some(ChangeType::Add),
            2 => Some(ChangeType::Delete),
            4 => Some(ChangeType::Modify),
            8 => Some(ChangeType::ModDn),
            _ => None,
        }
    }

    fn to_wire(self) -> i32 {
        match self {
            ChangeType::Add => 1,
            ChangeType::Delete => 2,
            ChangeType::Modify => 4,
            ChangeType::ModDn => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeNumber {
    /// `changeNumber` was not present on the wire at all.
    Absent,
    /// `changeNumber` was present and carried the sentinel value `-1`.
    Undefined,
    Value(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryChangeNotificationValue {
    pub change_type: ChangeType,
    pub previous_dn: Option<String>,
    pub change_number: ChangeNumber,
}

impl DecodedValue for EntryChangeNotificationValue {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn DecodedValue> {
        Box::new(self.clone())
    }
}

pub struct EntryChangeNotificationFactory;

impl ControlFactory for EntryChangeNotificationFactory {
    fn oid(&self) -> &'static str {
        OID
    }

    fn decode_value(&self, raw: Option<&[u8]>) -> DecodeResult<Box<dyn DecodedValue>> {
        let raw = raw.ok_or(DecodeError::Protocol {
            offset: 0,
            state: "EntryChangeNotification",
            reason: "controlValue is required",
        })?;
        let mut outer = Reader::new(raw, 0, true);
        let mut body = expect_done(outer.enter_sequence(), "truncated EntryChangeNotification value")?;

        let change_type_raw = expect_done(body.read_enumerated(1, 8), "truncated changeType")?;
        let change_type = ChangeType::from_wire(change_type_raw).ok_or(DecodeError::Protocol {
            offset: 0,
            state: "EntryChangeNotification",
            reason: "unknown changeType",
        })?;

        let mut previous_dn = None;
        if let Some(header) = expect_done(body.peek_optional_header(), "truncated field header")? {
            if header.class == Class::Universal && header.tag == 0x04 {
                previous_dn = Some(expect_done(body.read_utf8_string(), "truncated previousDN")?.to_string());
            }
        }

        let change_number = if body.is_empty() {
            ChangeNumber::Absent
        } else {
            let n = expect_done(body.read_integer(), "truncated changeNumber")?;
            if n == -1 {
                ChangeNumber::Undefined
            } else if n < 0 {
                return Err(DecodeError::Protocol {
                    offset: 0,
                    state: "EntryChangeNotification",
                    reason: "changeNumber negative but not -1",
                });
            } else {
                ChangeNumber::Value(n as u64)
            }
        };

        if !body.is_empty() {
            return Err(DecodeError::Protocol {
                offset: 0,
                state: "EntryChangeNotification",
                reason: "unexpected trailing bytes",
            });
        }

        Ok(Box::new(EntryChangeNotificationValue {
            change_type,
            previous_dn,
            change_number,
        }))
    }

    fn encode_value(&self, value: &dyn DecodedValue, buf: &mut Asn1Buffer) -> EncodeResult<()> {
        let v = value
            .as_any()
            .downcast_ref::<EntryChangeNotificationValue>()
            .expect("registry guarantees matching DecodedValue type");
        buf.encode_constructed(Class::Universal, 0x10, |buf| {
            if let ChangeNumber::Value(n) = v.change_number {
                let bytes = crate::ber::primitives::minimal_integer_bytes(n as i64);
                buf.encode_primitive(Class::Universal, 0x02, &bytes)?;
            }
            if let Some(dn) = &v.previous_dn {
                buf.encode_primitive(Class::Universal, 0x04, dn.as_bytes())?;
            }
            let ct_bytes = crate::ber::primitives::minimal_integer_bytes(v.change_type.to_wire() as i64);
            buf.encode_primitive(Class::Universal, 0x0A, &ct_bytes)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_change_number_round_trips() {
        let factory = EntryChangeNotificationFactory;
        // SEQUENCE { changeType ENUMERATED add(1) }
        let wire: &[u8] = &[0x30, 0x03, 0x0A, 0x01, 0x01];
        let decoded = factory.decode_value(Some(wire)).unwrap();
        let v = decoded
            .as_any()
            .downcast_ref::<EntryChangeNotificationValue>()
            .unwrap();
        assert_eq!(v.change_number, ChangeNumber::Absent);
        let mut buf = Asn1Buffer::new();
        factory.encode_value(decoded.as_ref(), &mut buf).unwrap();
        assert_eq!(buf.into_bytes(), wire);
    }

    #[test]
    fn sentinel_change_number_is_distinguishable_from_absent() {
        let factory = EntryChangeNotificationFactory;
        // SEQUENCE { changeType=delete(2), changeNumber=-1 }
        let wire: &[u8] = &[0x30, 0x06, 0x0A, 0x01, 0x02, 0x02, 0x01, 0xFF];
        let decoded = factory.decode_value(Some(wire)).unwrap();
        let v = decoded
            .as_any()
            .downcast_ref::<EntryChangeNotificationValue>()
            .unwrap();
        assert_eq!(v.change_number, ChangeNumber::Undefined);
        // encoding it back omits changeNumber: -1 on the wire means absent.
        let mut buf = Asn1Buffer::new();
        factory.encode_value(decoded.as_ref(), &mut buf).unwrap();
        assert_eq!(buf.into_bytes(), &[0x30, 0x03, 0x0A, 0x01, 0x02]);
    }

    #[test]
    fn other_negative_change_numbers_are_rejected() {
        let factory = EntryChangeNotificationFactory;
        let wire: &[u8] = &[0x30, 0x06, 0x0A, 0x01, 0x01, 0x02, 0x01, 0xFE];
        assert!(factory.decode_value(Some(wire)).is_err());
    }
}
