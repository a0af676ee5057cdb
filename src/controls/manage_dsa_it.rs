//! ManageDsaIT (RFC 3296), OID `2.16.840.1.113730.3.4.2` — the worked
//! example from spec §8 scenario 2. A valueless marker control: its
//! presence is the entire signal, so decode/encode are no-ops beyond
//! asserting the value is absent.

use crate::ber::Asn1Buffer;
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::registry::{ControlFactory, DecodedValue};
use std::any::Any;

pub const OID: &str = "2.16.840.1.113730.3.4.2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManageDsaIt;

impl DecodedValue for ManageDsaIt {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn DecodedValue> {
        Box::new(*self)
    }
}

pub struct ManageDsaItFactory;

impl ControlFactory for ManageDsaItFactory {
    fn oid(&self) -> &'static str {
        OID
    }

    fn decode_value(&self, raw: Option<&[u8]>) -> DecodeResult<Box<dyn DecodedValue>> {
        if raw.is_some_and(|v| !v.is_empty()) {
            return Err(DecodeError::Protocol {
                offset: 0,
                state: "ManageDsaIT",
                reason: "controlValue must be absent",
            });
        }
        Ok(Box::new(ManageDsaIt))
    }

    fn encode_value(&self, _value: &dyn DecodedValue, _buf: &mut Asn1Buffer) -> EncodeResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_empty_value() {
        let factory = ManageDsaItFactory;
        let v = factory.decode_value(None).unwrap();
        assert!(v.as_any().downcast_ref::<ManageDsaIt>().is_some());
    }

    #[test]
    fn rejects_nonempty_value() {
        let factory = ManageDsaItFactory;
        assert!(factory.decode_value(Some(&[0x01])).is_err());
    }
}
