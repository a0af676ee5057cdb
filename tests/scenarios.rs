//! The six concrete decode/encode scenarios used as acceptance vectors.

use hex_literal::hex;
use ldap_codec_core::model::*;
use ldap_codec_core::Codec;

#[test]
fn abandon_pdu() {
    let codec = Codec::default();
    let data = hex!("30 06 02 01 02 50 01 2A");
    let outcome = codec.decode_message(&data).unwrap();
    let ldap_codec_core::DecodeOutcome::Done { message, consumed } = outcome else {
        panic!("expected a complete message");
    };
    assert_eq!(consumed, data.len());
    assert_eq!(message.message_id, MessageID(2));
    assert_eq!(message.protocol_op, ProtocolOp::AbandonRequest(MessageID(42)));
}

#[test]
fn unbind_request_with_manage_dsa_it_control() {
    let codec = Codec::default();
    let oid = b"2.16.840.1.113730.3.4.2";
    let mut data = hex!("30 22 02 01 01 42 00 A0 1B 30 19 04 17").to_vec();
    data.extend_from_slice(oid);
    assert_eq!(data.len(), 0x24);

    let ldap_codec_core::DecodeOutcome::Done { message, .. } =
        codec.decode_message(&data).unwrap()
    else {
        panic!("expected a complete message");
    };
    assert_eq!(message.message_id, MessageID(1));
    assert_eq!(message.protocol_op, ProtocolOp::UnbindRequest);
    let control = message.control("2.16.840.1.113730.3.4.2").expect("control present");
    assert!(!control.criticality);
    assert!(control.control_value.is_none());

    let re_encoded = codec.encode_message(&message).unwrap();
    assert_eq!(re_encoded, data);
}

#[test]
fn search_request_equality_filter() {
    let codec = Codec::default();
    let mut data = hex!("30 28 02 01 05 63 23 04 07").to_vec();
    data.extend_from_slice(b"dc=test");
    data.extend_from_slice(&hex!("0A 01 00 0A 01 03 02 01 00 02 01 00 01 01 00 A3 0B 04 02"));
    data.extend_from_slice(b"cn");
    data.extend_from_slice(&hex!("04 03"));
    data.extend_from_slice(b"foo");
    data.extend_from_slice(&hex!("30 00"));

    let ldap_codec_core::DecodeOutcome::Done { message, .. } =
        codec.decode_message(&data).unwrap()
    else {
        panic!("expected a complete message");
    };
    let ProtocolOp::SearchRequest(req) = message.protocol_op else {
        panic!("expected SearchRequest");
    };
    assert_eq!(req.base_object.0, "dc=test");
    assert_eq!(req.scope, SearchScope::BaseObject);
    assert_eq!(req.deref_aliases, DerefAliases::DerefAlways);
    assert_eq!(req.size_limit, 0);
    assert_eq!(req.time_limit, 0);
    assert!(!req.types_only);
    assert!(req.attributes.is_empty());
    match req.filter {
        Filter::EqualityMatch(ava) => {
            assert_eq!(ava.attribute_desc.0, "cn");
            assert_eq!(&ava.assertion_value[..], b"foo");
        }
        other => panic!("expected EqualityMatch, got {other:?}"),
    }
}

#[test]
fn bind_response_success() {
    let codec = Codec::default();
    let data = hex!("30 0C 02 01 01 61 07 0A 01 00 04 00 04 00");
    let ldap_codec_core::DecodeOutcome::Done { message, .. } =
        codec.decode_message(&data).unwrap()
    else {
        panic!("expected a complete message");
    };
    let ProtocolOp::BindResponse(resp) = message.protocol_op else {
        panic!("expected BindResponse");
    };
    assert_eq!(resp.result.result_code, ResultCode::Success);
    assert_eq!(resp.result.matched_dn.0, "");
    assert_eq!(resp.result.diagnostic_message.0, "");
    assert!(resp.server_sasl_creds.is_none());

    let re_encoded = codec.encode_message(&message).unwrap();
    assert_eq!(re_encoded, data);
}

#[test]
fn extended_request_with_unregistered_oid_round_trips_opaque() {
    let codec = Codec::default();
    let message = LdapMessage {
        message_id: MessageID(7),
        protocol_op: ProtocolOp::ExtendedRequest(ExtendedRequest {
            request_name: LdapOID("1.3.6.1.4.1.999.1".into()),
            request_value: Some(vec![0x01, 0x02].into()),
            decoded: None,
        }),
        controls: None,
    };
    let encoded = codec.encode_message(&message).unwrap();
    let ldap_codec_core::DecodeOutcome::Done {
        message: decoded, ..
    } = codec.decode_message(&encoded).unwrap()
    else {
        panic!("expected a complete message");
    };
    assert_eq!(decoded, message);
    let ProtocolOp::ExtendedRequest(req) = decoded.protocol_op else {
        panic!("expected ExtendedRequest");
    };
    assert!(codec.registry.extended(req.request_name.as_str()).is_none());
}

#[test]
fn nested_and_not_filter_round_trips_byte_identical() {
    let codec = Codec::default();
    let filter = Filter::And(vec![
        Filter::EqualityMatch(AttributeValueAssertion {
            attribute_desc: LdapString("objectClass".into()),
            assertion_value: b"person".to_vec().into(),
        }),
        Filter::Not(Box::new(Filter::EqualityMatch(AttributeValueAssertion {
            attribute_desc: LdapString("uid".into()),
            assertion_value: b"root".to_vec().into(),
        }))),
    ]);
    let message = LdapMessage {
        message_id: MessageID(9),
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
    let encoded_once = codec.encode_message(&message).unwrap();
    let ldap_codec_core::DecodeOutcome::Done {
        message: decoded, ..
    } = codec.decode_message(&encoded_once).unwrap()
    else {
        panic!("expected a complete message");
    };
    assert_eq!(decoded, message);
    let encoded_twice = codec.encode_message(&decoded).unwrap();
    assert_eq!(encoded_once, encoded_twice);
}
