//! The codec's public entry point (spec §4.1–§4.6): [`Codec`] bundles a
//! [`CodecConfig`], a [`CodecRegistry`], and a [`BinaryAttributeDetector`]
//! and exposes `decode_message`/`encode_message`.
//!
//! `Codec` plays the role the teacher's free functions
//! (`parse_ldap_message`) play, but as a value so registry/config/detector
//! can be constructed once and shared across a connection's lifetime. It
//! is `Send` but not `Sync`: `CodecRegistry` and `BinaryAttributeDetector`
//! are themselves `Send + Sync` and meant to be shared behind an `Arc` by
//! callers that want one `Codec` per connection but one registry process
//! wide.

use crate::ber::tag::Class;
use crate::ber::{primitives, ReadOutcome};
use crate::binary_attrs::BinaryAttributeDetector;
use crate::config::CodecConfig;
use crate::encode::message::encode_ldap_message;
use crate::engine::Reader;
use crate::error::{DecodeError, EncodeError};
use crate::grammar::message::decode_ldap_message;
use crate::model::LdapMessage;
use crate::registry::CodecRegistry;

/// Outcome of one `decode_message` attempt (spec Design Note 5): a
/// genuine parse error, a complete message (plus the number of input
/// bytes it consumed), or a request for more bytes. Distinct from
/// [`DecodeError`] so that buffer underflow never has to be represented
/// as an error variant a caller must match past.
#[derive(Debug)]
pub enum DecodeOutcome<'a> {
    Done {
        message: LdapMessage<'a>,
        consumed: usize,
    },
    Incomplete,
}

/// Bundles the pieces a connection needs to decode/encode a stream of
/// `LDAPMessage`s: resource limits, the extensibility registry, and the
/// binary-attribute classifier.
#[derive(Debug)]
pub struct Codec {
    pub config: CodecConfig,
    pub registry: CodecRegistry,
    pub binary_attributes: BinaryAttributeDetector,
}

impl Default for Codec {
    fn default() -> Self {
        Codec {
            config: CodecConfig::default(),
            registry: CodecRegistry::with_builtins(),
            binary_attributes: BinaryAttributeDetector::default(),
        }
    }
}

impl Codec {
    pub fn new(config: CodecConfig, registry: CodecRegistry) -> Self {
        Codec {
            config,
            registry,
            binary_attributes: BinaryAttributeDetector::default(),
        }
    }

    /// Decodes one `LDAPMessage` from the front of `input`. `input` need
    /// not hold a complete PDU: an incomplete outer TLV or a length that
    /// overruns the buffer both yield [`DecodeOutcome::Incomplete`] rather
    /// than an error, so the caller can buffer more bytes and retry from
    /// the same offset (nothing is consumed until a full PDU is in hand).
    pub fn decode_message<'a>(&self, input: &'a [u8]) -> Result<DecodeOutcome<'a>, DecodeError> {
        let header = match primitives::read_header(input, 0, self.config.strict_minimal_ber)? {
            ReadOutcome::Done(h, _) => h,
            ReadOutcome::Incomplete => return Ok(DecodeOutcome::Incomplete),
        };
        if header.class != Class::Universal || header.tag != 0x10 || !header.constructed {
            return Err(DecodeError::MalformedBer {
                offset: 0,
                reason: "expected a UNIVERSAL SEQUENCE (LDAPMessage envelope)",
            });
        }
        if header.length > self.config.max_pdu_size {
            return Err(DecodeError::PduTooLarge {
                len: header.length,
                max: self.config.max_pdu_size,
            });
        }

        let mut reader = Reader::new(input, 0, self.config.strict_minimal_ber);
        let (_, mut body) = match reader.read_tlv()? {
            crate::engine::DecodeStep::Done(v) => v,
            crate::engine::DecodeStep::Incomplete => return Ok(DecodeOutcome::Incomplete),
        };
        let consumed = reader.offset();
        let message = decode_ldap_message(&mut body, self.config.max_filter_depth, &self.registry)?;
        Ok(DecodeOutcome::Done { message, consumed })
    }

    /// Encodes one `LDAPMessage` to its canonical BER wire form.
    pub fn encode_message(&self, message: &LdapMessage<'_>) -> Result<Vec<u8>, EncodeError> {
        let mut buf = crate::ber::Asn1Buffer::new();
        encode_ldap_message(&mut buf, message, &self.registry)?;
        Ok(buf.into_bytes())
    }
}
