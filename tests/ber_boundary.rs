//! Boundary properties from spec §8 that aren't exercised by the
//! operation-shaped round-trip/scenario tests: encoded-integer and
//! length-prefix boundaries at the whole-message level, indefinite-length
//! rejection, and the `max_filter_depth` cutoff.

use ldap_codec_core::model::*;
use ldap_codec_core::{Codec, CodecConfig, DecodeOutcome};

#[test]
fn messageid_integer_boundaries_round_trip() {
    let codec = Codec::default();
    for id in [1u32, 127, 128, i32::MAX as u32] {
        let message = LdapMessage {
            message_id: MessageID(id),
            protocol_op: ProtocolOp::UnbindRequest,
            controls: None,
        };
        let encoded = codec.encode_message(&message).unwrap();
        let DecodeOutcome::Done { message: decoded, .. } =
            codec.decode_message(&encoded).unwrap()
        else {
            panic!("expected a complete message");
        };
        assert_eq!(decoded.message_id, MessageID(id));
    }
}

#[test]
fn outer_sequence_length_crosses_short_to_long_form() {
    // An UnbindRequest with enough controls that the outer LDAPMessage's
    // SEQUENCE length must switch from short form (<128) to long form
    // (>=128), exercising the length-prefix boundary at §8.
    let codec = Codec::default();
    let mut controls = Vec::new();
    for i in 0..10u32 {
        controls.push(Control {
            control_type: LdapOID(format!("1.2.3.4.{i}").into()),
            criticality: false,
            control_value: None,
            decoded: None,
        });
    }
    let message = LdapMessage {
        message_id: MessageID(1),
        protocol_op: ProtocolOp::UnbindRequest,
        controls: Some(controls),
    };
    let encoded = codec.encode_message(&message).unwrap();
    assert!(encoded.len() >= 128, "expected a long-form outer length");
    assert_eq!(encoded[1] & 0x80, 0x80, "expected long-form length octet");
    let DecodeOutcome::Done { message: decoded, .. } =
        codec.decode_message(&encoded).unwrap()
    else {
        panic!("expected a complete message");
    };
    assert_eq!(decoded, message);
}

#[test]
fn indefinite_length_outer_sequence_is_rejected() {
    let codec = Codec::default();
    // SEQUENCE with indefinite length (0x80), which RFC 4511 BER forbids.
    let data = [0x30, 0x80, 0x02, 0x01, 0x01];
    let err = codec.decode_message(&data).unwrap_err();
    assert!(matches!(err, ldap_codec_core::DecodeError::MalformedBer { .. }));
}

#[test]
fn filter_nesting_past_max_depth_is_a_protocol_error() {
    let max_depth = 4u16;
    let codec = Codec::new(
        CodecConfig {
            max_filter_depth: max_depth,
            ..CodecConfig::default()
        },
        ldap_codec_core::registry::CodecRegistry::with_builtins(),
    );

    // Build a NOT(NOT(NOT(...))) chain one level deeper than allowed.
    let mut filter = Filter::Present(LdapString("objectClass".into()));
    for _ in 0..=(max_depth as usize + 1) {
        filter = Filter::Not(Box::new(filter));
    }

    let message = LdapMessage {
        message_id: MessageID(1),
        protocol_op: ProtocolOp::SearchRequest(SearchRequest {
            base_object: LdapDN("dc=example,dc=com".into()),
            scope: SearchScope::WholeSubtree,
            deref_aliases: DerefAliases::NeverDerefAliases,
            size_limit: 0,
            time_limit: 0,
            types_only: false,
            filter,
            attributes: vec![],
        }),
        controls: None,
    };

    // Encoding has no depth limit of its own; the bound is enforced on
    // decode, so round-trip the bytes through a codec with a shallow
    // `max_filter_depth` and expect a `FilterTooDeep` protocol error.
    let encoded = codec.encode_message(&message).unwrap();
    let err = codec.decode_message(&encoded).unwrap_err();
    assert!(matches!(
        err,
        ldap_codec_core::DecodeError::FilterTooDeep { max, .. } if max == max_depth
    ));
}

#[test]
fn filter_nesting_within_max_depth_decodes_fine() {
    let max_depth = 4u16;
    let codec = Codec::new(
        CodecConfig {
            max_filter_depth: max_depth,
            ..CodecConfig::default()
        },
        ldap_codec_core::registry::CodecRegistry::with_builtins(),
    );

    let mut filter = Filter::Present(LdapString("objectClass".into()));
    for _ in 0..max_depth {
        filter = Filter::Not(Box::new(filter));
    }

    let message = LdapMessage {
        message_id: MessageID(1),
        protocol_op: ProtocolOp::SearchRequest(SearchRequest {
            base_object: LdapDN("dc=example,dc=com".into()),
            scope: SearchScope::WholeSubtree,
            deref_aliases: DerefAliases::NeverDerefAliases,
            size_limit: 0,
            time_limit: 0,
            types_only: false,
            filter,
            attributes: vec![],
        }),
        controls: None,
    };

    let encoded = codec.encode_message(&message).unwrap();
    let DecodeOutcome::Done { message: decoded, .. } =
        codec.decode_message(&encoded).unwrap()
    else {
        panic!("expected a complete message");
    };
    assert_eq!(decoded, message);
}

#[test]
fn pdu_exceeding_max_pdu_size_is_rejected() {
    let codec = Codec::new(
        CodecConfig {
            max_pdu_size: 8,
            ..CodecConfig::default()
        },
        ldap_codec_core::registry::CodecRegistry::with_builtins(),
    );
    let message = LdapMessage {
        message_id: MessageID(1),
        protocol_op: ProtocolOp::DelRequest(LdapDN(
            "cn=someone,ou=people,dc=example,dc=com".into(),
        )),
        controls: None,
    };
    // Encode with a codec that has no size limit, then feed the oversized
    // bytes to the restrictive one.
    let permissive = Codec::default();
    let encoded = permissive.encode_message(&message).unwrap();
    let err = codec.decode_message(&encoded).unwrap_err();
    assert!(matches!(err, ldap_codec_core::DecodeError::PduTooLarge { .. }));
}
