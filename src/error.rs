//! Error taxonomy for the codec core.
//!
//! Decode and encode failures are modeled as two distinct enums; buffer
//! underflow is not an error at all, but a control-flow signal returned
//! alongside [`DecodeError`] from [`crate::container::DecodeOutcome`].

use thiserror::Error;

/// Grammar state name, used only for diagnostics.
pub type StateName = &'static str;

/// Errors produced while decoding a BER-encoded LDAP PDU.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DecodeError {
    /// Malformed tag, length, or content octets; also covers indefinite
    /// lengths and (when `strict_minimal_ber` is set) non-minimal integers.
    #[error("malformed BER at offset {offset}: {reason}")]
    MalformedBer { offset: usize, reason: &'static str },

    /// The outer PDU length exceeds the configured `max_pdu_size`.
    #[error("PDU length {len} exceeds max_pdu_size {max}")]
    PduTooLarge { len: u32, max: u32 },

    /// A value violates an RFC 4511 constraint (empty AND/OR, bad enum,
    /// missing required field, wrong component count, ...).
    #[error("protocol error at offset {offset} in state {state}: {reason}")]
    Protocol {
        offset: usize,
        state: StateName,
        reason: &'static str,
    },

    /// An OID string failed the `arc (. arc)+` dotted-decimal grammar.
    #[error("invalid OID {value:?} at offset {offset}")]
    InvalidOid { offset: usize, value: String },

    /// A control marked critical carries an OID with no registered factory.
    /// Unknown non-critical controls are not an error (see spec §7).
    #[error("unknown critical control {oid}")]
    UnknownControlCritical { oid: String },

    /// Filter nesting exceeded `max_filter_depth`.
    #[error("filter nesting exceeded max depth {max} at offset {offset}")]
    FilterTooDeep { offset: usize, max: u16 },
}

impl DecodeError {
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::MalformedBer { offset, .. }
            | DecodeError::Protocol { offset, .. }
            | DecodeError::InvalidOid { offset, .. }
            | DecodeError::FilterTooDeep { offset, .. } => Some(*offset),
            DecodeError::PduTooLarge { .. } | DecodeError::UnknownControlCritical { .. } => None,
        }
    }
}

/// Errors produced while encoding a message to BER.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EncodeError {
    /// The length of some constructed value does not fit the writer's
    /// four-octet long-form length model.
    #[error("length {len} does not fit the BER length encoding")]
    Overflow { len: u64 },

    /// A grammar invariant was violated by the value being encoded (e.g. an
    /// empty AND/OR filter, or an empty AddRequest attribute list).
    #[error("cannot encode: {reason}")]
    Invalid { reason: &'static str },
}

pub type DecodeResult<T> = Result<T, DecodeError>;
pub type EncodeResult<T> = Result<T, EncodeError>;
