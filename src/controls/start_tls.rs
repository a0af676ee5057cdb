//! StartTLS extended operation (RFC 4511 §4.14.1), OID
//! `1.3.6.1.4.1.1466.20037`. Neither the request nor the response carries
//! a value; this mirrors the teacher crate's own
//! `test_parse_extended_req` test vector, which uses this exact OID.

use crate::ber::Asn1Buffer;
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::registry::{DecodedValue, ExtendedOperationFactory};
use std::any::Any;

pub const OID: &str = "1.3.6.1.4.1.1466.20037";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartTls;

impl DecodedValue for StartTls {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn DecodedValue> {
        Box::new(*self)
    }
}

pub struct StartTlsFactory;

impl ExtendedOperationFactory for StartTlsFactory {
    fn oid(&self) -> &'static str {
        OID
    }

    fn decode_request_value(&self, raw: Option<&[u8]>) -> DecodeResult<Box<dyn DecodedValue>> {
        reject_nonempty(raw)?;
        Ok(Box::new(StartTls))
    }

    fn encode_request_value(
        &self,
        _value: &dyn DecodedValue,
        _buf: &mut Asn1Buffer,
    ) -> EncodeResult<()> {
        Ok(())
    }

    fn decode_response_value(&self, raw: Option<&[u8]>) -> DecodeResult<Box<dyn DecodedValue>> {
        reject_nonempty(raw)?;
        Ok(Box::new(StartTls))
    }

    fn encode_response_value(
        &self,
        _value: &dyn DecodedValue,
        _buf: &mut Asn1Buffer,
    ) -> EncodeResult<()> {
        Ok(())
    }
}

fn reject_nonempty(raw: Option<&[u8]>) -> DecodeResult<()> {
    if raw.is_some_and(|v| !v.is_empty()) {
        return Err(DecodeError::Protocol {
            offset: 0,
            state: "StartTLS",
            reason: "requestValue/responseValue must be absent",
        });
    }
    Ok(())
}
