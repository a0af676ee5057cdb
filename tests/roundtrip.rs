//! Round-trip laws (spec §8): `decode(encode(m)) == m` for one message per
//! operation, covering the fields each operation's grammar table treats
//! specially (optional fields, SET vs SEQUENCE, open enums).

use ldap_codec_core::model::*;
use ldap_codec_core::registry::DecodedValue;
use ldap_codec_core::{Codec, DecodeOutcome};

fn round_trip(message: &LdapMessage<'_>) {
    let codec = Codec::default();
    let encoded = codec.encode_message(message).unwrap();
    let DecodeOutcome::Done { message: decoded, .. } = codec.decode_message(&encoded).unwrap()
    else {
        panic!("expected a complete message");
    };
    assert_eq!(&decoded, message);
    let re_encoded = codec.encode_message(&decoded).unwrap();
    assert_eq!(encoded, re_encoded);
}

#[test]
fn bind_request_simple_auth() {
    let message = LdapMessage {
        message_id: MessageID(1),
        protocol_op: ProtocolOp::BindRequest(BindRequest {
            version: 3,
            name: LdapDN("cn=admin,dc=example,dc=com".into()),
            authentication: AuthenticationChoice::Simple(b"secret".to_vec().into()),
        }),
        controls: None,
    };
    round_trip(&message);
}

#[test]
fn bind_request_sasl_auth_without_credentials() {
    let message = LdapMessage {
        message_id: MessageID(2),
        protocol_op: ProtocolOp::BindRequest(BindRequest {
            version: 3,
            name: LdapDN("".into()),
            authentication: AuthenticationChoice::Sasl(SaslCredentials {
                mechanism: LdapString("GSSAPI".into()),
                credentials: None,
            }),
        }),
        controls: None,
    };
    round_trip(&message);
}

#[test]
fn search_request_with_substrings_filter_and_attributes() {
    let message = LdapMessage {
        message_id: MessageID(3),
        protocol_op: ProtocolOp::SearchRequest(SearchRequest {
            base_object: LdapDN("ou=people,dc=example,dc=com".into()),
            scope: SearchScope::SingleLevel,
            deref_aliases: DerefAliases::DerefInSearching,
            size_limit: 100,
            time_limit: 30,
            types_only: false,
            filter: Filter::Substrings(SubstringFilter {
                filter_type: LdapString("cn".into()),
                substrings: vec![
                    Substring::Initial(AssertionValue(b"al".to_vec().into())),
                    Substring::Any(AssertionValue(b"ce".to_vec().into())),
                    Substring::Final(AssertionValue(b"son".to_vec().into())),
                ],
            }),
            attributes: vec![LdapString("cn".into()), LdapString("mail".into())],
        }),
        controls: None,
    };
    round_trip(&message);
}

#[test]
fn search_request_with_extensible_match_and_dn_attributes() {
    let message = LdapMessage {
        message_id: MessageID(4),
        protocol_op: ProtocolOp::SearchRequest(SearchRequest {
            base_object: LdapDN("dc=example,dc=com".into()),
            scope: SearchScope::WholeSubtree,
            deref_aliases: DerefAliases::DerefAlways,
            size_limit: 0,
            time_limit: 0,
            types_only: true,
            filter: Filter::ExtensibleMatch(MatchingRuleAssertion {
                matching_rule: Some(LdapString("caseIgnoreMatch".into())),
                rule_type: Some(AttributeDescription("cn".into())),
                assertion_value: AssertionValue(b"smith".to_vec().into()),
                dn_attributes: true,
            }),
            attributes: vec![],
        }),
        controls: None,
    };
    round_trip(&message);
}

#[test]
fn search_result_entry_with_multivalued_attribute() {
    let message = LdapMessage {
        message_id: MessageID(5),
        protocol_op: ProtocolOp::SearchResultEntry(SearchResultEntry {
            object_name: LdapDN("cn=alice,dc=example,dc=com".into()),
            attributes: vec![PartialAttribute {
                attr_type: LdapString("objectClass".into()),
                attr_vals: vec![
                    AttributeValue(b"top".to_vec().into()),
                    AttributeValue(b"person".to_vec().into()),
                ],
            }],
        }),
        controls: None,
    };
    round_trip(&message);
}

#[test]
fn modify_request_with_multiple_changes() {
    let message = LdapMessage {
        message_id: MessageID(6),
        protocol_op: ProtocolOp::ModifyRequest(ModifyRequest {
            object: LdapDN("cn=alice,dc=example,dc=com".into()),
            changes: vec![
                Change {
                    operation: Operation::Add,
                    modification: PartialAttribute {
                        attr_type: LdapString("mail".into()),
                        attr_vals: vec![AttributeValue(b"alice@example.com".to_vec().into())],
                    },
                },
                Change {
                    operation: Operation::Delete,
                    modification: PartialAttribute {
                        attr_type: LdapString("description".into()),
                        attr_vals: vec![],
                    },
                },
            ],
        }),
        controls: None,
    };
    round_trip(&message);
}

#[test]
fn add_request_rejects_empty_attribute_list_on_encode() {
    let codec = Codec::default();
    let message = LdapMessage {
        message_id: MessageID(7),
        protocol_op: ProtocolOp::AddRequest(AddRequest {
            entry: LdapDN("cn=bob,dc=example,dc=com".into()),
            attributes: vec![],
        }),
        controls: None,
    };
    assert!(codec.encode_message(&message).is_err());
}

#[test]
fn moddn_request_with_new_superior() {
    let message = LdapMessage {
        message_id: MessageID(8),
        protocol_op: ProtocolOp::ModDnRequest(ModDnRequest {
            entry: LdapDN("cn=alice,ou=old,dc=example,dc=com".into()),
            newrdn: RelativeLdapDN("cn=alice2".into()),
            deleteoldrdn: true,
            newsuperior: Some(LdapDN("ou=new,dc=example,dc=com".into())),
        }),
        controls: None,
    };
    round_trip(&message);
}

#[test]
fn compare_request() {
    let message = LdapMessage {
        message_id: MessageID(9),
        protocol_op: ProtocolOp::CompareRequest(CompareRequest {
            entry: LdapDN("cn=alice,dc=example,dc=com".into()),
            ava: AttributeValueAssertion {
                attribute_desc: LdapString("mail".into()),
                assertion_value: b"alice@example.com".to_vec().into(),
            },
        }),
        controls: None,
    };
    round_trip(&message);
}

#[test]
fn search_result_done_with_referral() {
    let message = LdapMessage {
        message_id: MessageID(10),
        protocol_op: ProtocolOp::SearchResultDone(LdapResult {
            result_code: ResultCode::Referral,
            matched_dn: LdapDN("dc=example,dc=com".into()),
            diagnostic_message: LdapString("".into()),
            referral: Some(vec![LdapString("ldap://other.example.com".into())]),
        }),
        controls: None,
    };
    round_trip(&message);
}

#[test]
fn message_with_critical_and_non_critical_controls() {
    // SEQUENCE { size=10, cookie="abc" } — RFC 2696 realSearchControlValue.
    let message = LdapMessage {
        message_id: MessageID(11),
        protocol_op: ProtocolOp::UnbindRequest,
        controls: Some(vec![
            Control {
                control_type: LdapOID("1.2.840.113556.1.4.319".into()),
                criticality: true,
                control_value: Some(
                    vec![0x30, 0x08, 0x02, 0x01, 0x0A, 0x04, 0x03, b'a', b'b', b'c'].into(),
                ),
                decoded: None,
            },
            Control {
                control_type: LdapOID("2.16.840.1.113730.3.4.2".into()),
                criticality: false,
                control_value: None,
                decoded: None,
            },
        ]),
    };
    round_trip(&message);

    let codec = Codec::default();
    let encoded = codec.encode_message(&message).unwrap();
    let DecodeOutcome::Done { message: decoded, .. } = codec.decode_message(&encoded).unwrap()
    else {
        panic!("expected a complete message");
    };
    let paged = decoded
        .control("1.2.840.113556.1.4.319")
        .and_then(|c| c.decoded.as_ref())
        .and_then(|v| v.as_any().downcast_ref::<ldap_codec_core::controls::paged_results::PagedResultsValue>())
        .expect("PagedResultsControl should decode through the registry");
    assert_eq!(paged.size, 10);
    assert_eq!(paged.cookie, b"abc");
}
