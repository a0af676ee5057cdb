//! The LDAP message grammar (spec §4.3): `LDAPMessage ::= SEQUENCE {
//! messageID, protocolOp CHOICE { ... APPLICATION tags ... }, controls
//! [0] SEQUENCE OF Control OPTIONAL }`.
//!
//! Grounded directly on the teacher's `ldap_parser.rs` tag dispatch
//! (`match header.tag.0 { 0 => ..., ... }`) and `ldap.rs`'s
//! `ProtocolOpTag`, re-expressed against [`crate::engine::Reader`]
//! instead of `nom` combinators. Every nested read here uses
//! [`expect_done`] rather than propagating [`crate::engine::DecodeStep`]:
//! once the outer `LDAPMessage` SEQUENCE's full content has been read off
//! a complete PDU (checked once, at the top, by
//! [`crate::container::Codec::decode_message`]), every BER length inside
//! it is by construction already fully buffered, so a genuine
//! `Incomplete` below this point could only mean a child's declared
//! length overran its parent — which is a malformed-input error, not a
//! request for more bytes.

use crate::ber::tag::Class;
use crate::engine::{expect_done, Reader};
use crate::error::{DecodeError, DecodeResult};
use crate::grammar::filter::decode_filter;
use crate::model::*;
use crate::oid::validate_oid;
use crate::registry::CodecRegistry;
use std::borrow::Cow;

/// Decodes the body of an `LDAPMessage` SEQUENCE (messageID, protocolOp,
/// controls) given a reader already scoped to its content.
pub fn decode_ldap_message<'a>(
    body: &mut Reader<'a>,
    max_filter_depth: u16,
    registry: &CodecRegistry,
) -> DecodeResult<LdapMessage<'a>> {
    let message_id = expect_done(
        body.read_integer_range(1, (i32::MAX) as i64),
        "truncated messageID",
    )? as u32;

    let op_header = expect_done(body.peek_header(), "truncated protocolOp")?;
    if op_header.class != Class::Application {
        return Err(DecodeError::Protocol {
            offset: body.offset(),
            state: "protocolOp",
            reason: "expected an APPLICATION-tagged protocolOp",
        });
    }
    let protocol_op = decode_protocol_op(op_header.tag, body, max_filter_depth, registry)?;

    let mut controls = None;
    if expect_done(body.peek_context_tag(), "truncated controls")? == Some(0) {
        let mut inner = expect_done(body.enter_context(0), "truncated controls sequence")?;
        let mut list = Vec::new();
        while !inner.is_empty() {
            list.push(decode_control(&mut inner, registry)?);
        }
        controls = Some(list);
    }

    if !body.is_empty() {
        return Err(DecodeError::Protocol {
            offset: body.offset(),
            state: "LDAPMessage",
            reason: "unexpected trailing bytes after controls",
        });
    }

    for c in controls.iter().flatten() {
        if c.criticality && registry.control(c.oid()).is_none() {
            return Err(DecodeError::UnknownControlCritical {
                oid: c.oid().to_string(),
            });
        }
    }

    Ok(LdapMessage {
        message_id: MessageID(message_id),
        protocol_op,
        controls,
    })
}

fn decode_protocol_op<'a>(
    tag: u32,
    body: &mut Reader<'a>,
    max_filter_depth: u16,
    registry: &CodecRegistry,
) -> DecodeResult<ProtocolOp<'a>> {
    match tag {
        0 => Ok(ProtocolOp::BindRequest(decode_bind_request(body)?)),
        1 => Ok(ProtocolOp::BindResponse(decode_bind_response(body)?)),
        2 => {
            // UnbindRequest ::= [APPLICATION 2] NULL — a primitive tag.
            let mut inner =
                expect_done(body.enter_application(2, false), "truncated UnbindRequest")?;
            if !inner.is_empty() {
                return Err(DecodeError::Protocol {
                    offset: inner.offset(),
                    state: "UnbindRequest",
                    reason: "UnbindRequest must be empty",
                });
            }
            Ok(ProtocolOp::UnbindRequest)
        }
        3 => Ok(ProtocolOp::SearchRequest(decode_search_request(
            body,
            max_filter_depth,
        )?)),
        4 => Ok(ProtocolOp::SearchResultEntry(decode_search_result_entry(
            body,
        )?)),
        5 => {
            let mut inner =
                expect_done(body.enter_application(5, true), "truncated SearchResultDone")?;
            Ok(ProtocolOp::SearchResultDone(decode_ldap_result(
                &mut inner,
            )?))
        }
        6 => Ok(ProtocolOp::ModifyRequest(decode_modify_request(body)?)),
        7 => {
            let mut inner =
                expect_done(body.enter_application(7, true), "truncated ModifyResponse")?;
            Ok(ProtocolOp::ModifyResponse(ModifyResponse {
                result: decode_ldap_result(&mut inner)?,
            }))
        }
        8 => Ok(ProtocolOp::AddRequest(decode_add_request(body)?)),
        9 => {
            let mut inner = expect_done(body.enter_application(9, true), "truncated AddResponse")?;
            Ok(ProtocolOp::AddResponse(decode_ldap_result(&mut inner)?))
        }
        10 => {
            // DelRequest ::= [APPLICATION 10] LDAPDN (the whole content is the DN string)
            let inner =
                expect_done(body.enter_application(10, false), "truncated DelRequest")?;
            let dn = std::str::from_utf8(inner.remaining()).map_err(|_| DecodeError::MalformedBer {
                offset: inner.offset(),
                reason: "DelRequest DN is not valid UTF-8",
            })?;
            Ok(ProtocolOp::DelRequest(LdapDN(Cow::Borrowed(dn))))
        }
        11 => {
            let mut inner =
                expect_done(body.enter_application(11, true), "truncated DelResponse")?;
            Ok(ProtocolOp::DelResponse(decode_ldap_result(&mut inner)?))
        }
        12 => Ok(ProtocolOp::ModDnRequest(decode_moddn_request(body)?)),
        13 => {
            let mut inner =
                expect_done(body.enter_application(13, true), "truncated ModDnResponse")?;
            Ok(ProtocolOp::ModDnResponse(decode_ldap_result(&mut inner)?))
        }
        14 => Ok(ProtocolOp::CompareRequest(decode_compare_request(body)?)),
        15 => {
            let mut inner =
                expect_done(body.enter_application(15, true), "truncated CompareResponse")?;
            Ok(ProtocolOp::CompareResponse(decode_ldap_result(
                &mut inner,
            )?))
        }
        16 => {
            // AbandonRequest ::= [APPLICATION 16] MessageID — a primitive tag.
            let inner =
                expect_done(body.enter_application(16, false), "truncated AbandonRequest")?;
            let id = crate::ber::primitives::read_integer_range(
                inner.remaining(),
                inner.offset(),
                true,
                1,
                i32::MAX as i64,
            )?;
            Ok(ProtocolOp::AbandonRequest(MessageID(id as u32)))
        }
        19 => {
            let mut inner = expect_done(
                body.enter_application(19, true),
                "truncated SearchResultReference",
            )?;
            let mut uris = Vec::new();
            while !inner.is_empty() {
                let s = expect_done(inner.read_utf8_string(), "truncated referral URI")?;
                uris.push(LdapString(Cow::Borrowed(s)));
            }
            if uris.is_empty() {
                return Err(DecodeError::Protocol {
                    offset: inner.offset(),
                    state: "SearchResultReference",
                    reason: "must contain at least one URI",
                });
            }
            Ok(ProtocolOp::SearchResultReference(uris))
        }
        23 => Ok(ProtocolOp::ExtendedRequest(decode_extended_request(
            body, registry,
        )?)),
        24 => Ok(ProtocolOp::ExtendedResponse(decode_extended_response(
            body, registry,
        )?)),
        25 => Ok(ProtocolOp::IntermediateResponse(
            decode_intermediate_response(body, registry)?,
        )),
        _ => Err(DecodeError::Protocol {
            offset: body.offset(),
            state: "protocolOp",
            reason: "unknown protocolOp APPLICATION tag",
        }),
    }
}

fn decode_ldap_dn<'a>(reader: &mut Reader<'a>) -> DecodeResult<LdapDN<'a>> {
    let s = expect_done(reader.read_utf8_string(), "truncated LDAPDN")?;
    Ok(LdapDN(Cow::Borrowed(s)))
}

fn decode_ldap_string<'a>(reader: &mut Reader<'a>) -> DecodeResult<LdapString<'a>> {
    let s = expect_done(reader.read_utf8_string(), "truncated LDAPString")?;
    Ok(LdapString(Cow::Borrowed(s)))
}

fn decode_ldap_oid<'a>(reader: &mut Reader<'a>) -> DecodeResult<LdapOID<'a>> {
    let offset = reader.offset();
    let s = expect_done(reader.read_utf8_string(), "truncated LDAPOID")?;
    validate_oid(s, offset)?;
    Ok(LdapOID(Cow::Borrowed(s)))
}

/// `LDAPResult ::= SEQUENCE { resultCode ENUMERATED, matchedDN LDAPDN,
/// diagnosticMessage LDAPString, referral [3] Referral OPTIONAL }`.
fn decode_ldap_result<'a>(reader: &mut Reader<'a>) -> DecodeResult<LdapResult<'a>> {
    let result_code = expect_done(reader.read_enumerated(0, i32::MAX), "truncated resultCode")?;
    let matched_dn = decode_ldap_dn(reader)?;
    let diagnostic_message = decode_ldap_string(reader)?;
    let mut referral = None;
    if expect_done(reader.peek_context_tag(), "truncated referral")? == Some(3) {
        let mut inner = expect_done(reader.enter_context(3), "truncated referral sequence")?;
        let mut urls = Vec::new();
        while !inner.is_empty() {
            urls.push(decode_ldap_string(&mut inner)?);
        }
        if urls.is_empty() {
            return Err(DecodeError::Protocol {
                offset: inner.offset(),
                state: "Referral",
                reason: "referral must be non-empty when present",
            });
        }
        referral = Some(urls);
    }
    Ok(LdapResult {
        result_code: ResultCode(result_code as u32),
        matched_dn,
        diagnostic_message,
        referral,
    })
}

/// `BindRequest ::= [APPLICATION 0] SEQUENCE { version INTEGER (1..127),
/// name LDAPDN, authentication AuthenticationChoice }`.
fn decode_bind_request<'a>(body: &mut Reader<'a>) -> DecodeResult<BindRequest<'a>> {
    let mut inner = expect_done(body.enter_application(0, true), "truncated BindRequest")?;
    let version = expect_done(inner.read_integer_range(1, 127), "truncated version")? as u8;
    let name = decode_ldap_dn(&mut inner)?;
    let authentication = decode_authentication_choice(&mut inner)?;
    if !inner.is_empty() {
        return Err(DecodeError::Protocol {
            offset: inner.offset(),
            state: "BindRequest",
            reason: "unexpected trailing bytes",
        });
    }
    Ok(BindRequest {
        version,
        name,
        authentication,
    })
}

/// `AuthenticationChoice ::= CHOICE { simple [0] OCTET STRING, sasl [3]
/// SaslCredentials }`.
fn decode_authentication_choice<'a>(
    reader: &mut Reader<'a>,
) -> DecodeResult<AuthenticationChoice<'a>> {
    let tag = expect_done(reader.peek_context_tag(), "truncated authentication")?;
    match tag {
        Some(0) => {
            let bytes = expect_done(reader.read_context_octet_string(0), "truncated simple creds")?;
            Ok(AuthenticationChoice::Simple(Cow::Borrowed(bytes)))
        }
        Some(3) => {
            let mut inner = expect_done(reader.enter_context(3), "truncated SaslCredentials")?;
            let mechanism = decode_ldap_string(&mut inner)?;
            let credentials = if !inner.is_empty() {
                Some(Cow::Borrowed(expect_done(
                    inner.read_octet_string(),
                    "truncated sasl credentials",
                )?))
            } else {
                None
            };
            Ok(AuthenticationChoice::Sasl(SaslCredentials {
                mechanism,
                credentials,
            }))
        }
        _ => Err(DecodeError::Protocol {
            offset: reader.offset(),
            state: "AuthenticationChoice",
            reason: "expected simple [0] or sasl [3]",
        }),
    }
}

/// `BindResponse ::= [APPLICATION 1] SEQUENCE { COMPONENTS OF LDAPResult,
/// serverSaslCreds [7] OCTET STRING OPTIONAL }`.
fn decode_bind_response<'a>(body: &mut Reader<'a>) -> DecodeResult<BindResponse<'a>> {
    let mut inner = expect_done(body.enter_application(1, true), "truncated BindResponse")?;
    let result = decode_ldap_result(&mut inner)?;
    let server_sasl_creds = if expect_done(inner.peek_context_tag(), "truncated serverSaslCreds")?
        == Some(7)
    {
        Some(Cow::Borrowed(expect_done(
            inner.read_context_octet_string(7),
            "truncated serverSaslCreds",
        )?))
    } else {
        None
    };
    Ok(BindResponse {
        result,
        server_sasl_creds,
    })
}

/// `SearchRequest ::= [APPLICATION 3] SEQUENCE { baseObject LDAPDN, scope
/// ENUMERATED, derefAliases ENUMERATED, sizeLimit INTEGER, timeLimit
/// INTEGER, typesOnly BOOLEAN, filter Filter, attributes
/// AttributeSelection }`.
fn decode_search_request<'a>(
    body: &mut Reader<'a>,
    max_filter_depth: u16,
) -> DecodeResult<SearchRequest<'a>> {
    let mut inner = expect_done(body.enter_application(3, true), "truncated SearchRequest")?;
    let base_object = decode_ldap_dn(&mut inner)?;
    let scope = expect_done(inner.read_enumerated(0, 2), "truncated scope")? as u32;
    let deref_aliases = expect_done(inner.read_enumerated(0, 3), "truncated derefAliases")? as u32;
    let size_limit = expect_done(inner.read_integer_range(0, u32::MAX as i64), "truncated sizeLimit")?
        as u32;
    let time_limit = expect_done(inner.read_integer_range(0, u32::MAX as i64), "truncated timeLimit")?
        as u32;
    let types_only = expect_done(inner.read_boolean(), "truncated typesOnly")?;
    let filter = decode_filter(&mut inner, 0, max_filter_depth)?;
    let mut seq = expect_done(inner.enter_sequence(), "truncated attribute selection")?;
    let mut attributes = Vec::new();
    while !seq.is_empty() {
        attributes.push(decode_ldap_string(&mut seq)?);
    }
    Ok(SearchRequest {
        base_object,
        scope: SearchScope(scope),
        deref_aliases: DerefAliases(deref_aliases),
        size_limit,
        time_limit,
        types_only,
        filter,
        attributes,
    })
}

fn decode_partial_attribute<'a>(reader: &mut Reader<'a>) -> DecodeResult<PartialAttribute<'a>> {
    let mut seq = expect_done(reader.enter_sequence(), "truncated PartialAttribute")?;
    let attr_type = decode_ldap_string(&mut seq)?;
    let mut set = expect_done(seq.enter_set(), "truncated attribute value set")?;
    let mut attr_vals = Vec::new();
    while !set.is_empty() {
        let v = expect_done(set.read_octet_string(), "truncated attribute value")?;
        attr_vals.push(AttributeValue(Cow::Borrowed(v)));
    }
    Ok(PartialAttribute {
        attr_type,
        attr_vals,
    })
}

fn decode_attribute<'a>(reader: &mut Reader<'a>) -> DecodeResult<Attribute<'a>> {
    let pa = decode_partial_attribute(reader)?;
    if pa.attr_vals.is_empty() {
        return Err(DecodeError::Protocol {
            offset: reader.offset(),
            state: "Attribute",
            reason: "Attribute must have at least one value",
        });
    }
    Ok(Attribute {
        attr_type: pa.attr_type,
        attr_vals: pa.attr_vals,
    })
}

/// `SearchResultEntry ::= [APPLICATION 4] SEQUENCE { objectName LDAPDN,
/// attributes PartialAttributeList }`.
fn decode_search_result_entry<'a>(body: &mut Reader<'a>) -> DecodeResult<SearchResultEntry<'a>> {
    let mut inner = expect_done(body.enter_application(4, true), "truncated SearchResultEntry")?;
    let object_name = decode_ldap_dn(&mut inner)?;
    let mut seq = expect_done(inner.enter_sequence(), "truncated PartialAttributeList")?;
    let mut attributes = Vec::new();
    while !seq.is_empty() {
        attributes.push(decode_partial_attribute(&mut seq)?);
    }
    Ok(SearchResultEntry {
        object_name,
        attributes,
    })
}

/// `ModifyRequest ::= [APPLICATION 6] SEQUENCE { object LDAPDN, changes
/// SEQUENCE OF change }`.
fn decode_modify_request<'a>(body: &mut Reader<'a>) -> DecodeResult<ModifyRequest<'a>> {
    let mut inner = expect_done(body.enter_application(6, true), "truncated ModifyRequest")?;
    let object = decode_ldap_dn(&mut inner)?;
    let mut seq = expect_done(inner.enter_sequence(), "truncated changes sequence")?;
    let mut changes = Vec::new();
    while !seq.is_empty() {
        let mut change_seq = expect_done(seq.enter_sequence(), "truncated change")?;
        let operation = expect_done(change_seq.read_enumerated(0, 3), "truncated operation")? as u32;
        let modification = decode_partial_attribute(&mut change_seq)?;
        changes.push(Change {
            operation: Operation(operation),
            modification,
        });
    }
    Ok(ModifyRequest { object, changes })
}

/// `AddRequest ::= [APPLICATION 8] SEQUENCE { entry LDAPDN, attributes
/// AttributeList }` — a non-empty sequence of [`Attribute`].
fn decode_add_request<'a>(body: &mut Reader<'a>) -> DecodeResult<AddRequest<'a>> {
    let mut inner = expect_done(body.enter_application(8, true), "truncated AddRequest")?;
    let entry = decode_ldap_dn(&mut inner)?;
    let mut seq = expect_done(inner.enter_sequence(), "truncated AttributeList")?;
    let mut attributes = Vec::new();
    while !seq.is_empty() {
        attributes.push(decode_attribute(&mut seq)?);
    }
    if attributes.is_empty() {
        return Err(DecodeError::Protocol {
            offset: inner.offset(),
            state: "AddRequest",
            reason: "attributes must be non-empty",
        });
    }
    Ok(AddRequest { entry, attributes })
}

/// `ModifyDNRequest ::= [APPLICATION 12] SEQUENCE { entry LDAPDN, newrdn
/// RelativeLDAPDN, deleteoldrdn BOOLEAN, newSuperior [0] LDAPDN OPTIONAL }`.
fn decode_moddn_request<'a>(body: &mut Reader<'a>) -> DecodeResult<ModDnRequest<'a>> {
    let mut inner = expect_done(body.enter_application(12, true), "truncated ModifyDNRequest")?;
    let entry = decode_ldap_dn(&mut inner)?;
    let newrdn_s = expect_done(inner.read_utf8_string(), "truncated newrdn")?;
    let newrdn = RelativeLdapDN(Cow::Borrowed(newrdn_s));
    let deleteoldrdn = expect_done(inner.read_boolean(), "truncated deleteoldrdn")?;
    let newsuperior = if expect_done(inner.peek_context_tag(), "truncated newSuperior")? == Some(0) {
        let s = expect_done(inner.read_context_utf8(0), "truncated newSuperior")?;
        Some(LdapDN(Cow::Borrowed(s)))
    } else {
        None
    };
    Ok(ModDnRequest {
        entry,
        newrdn,
        deleteoldrdn,
        newsuperior,
    })
}

/// `CompareRequest ::= [APPLICATION 14] SEQUENCE { entry LDAPDN, ava
/// AttributeValueAssertion }`.
fn decode_compare_request<'a>(body: &mut Reader<'a>) -> DecodeResult<CompareRequest<'a>> {
    let mut inner = expect_done(body.enter_application(14, true), "truncated CompareRequest")?;
    let entry = decode_ldap_dn(&mut inner)?;
    let mut seq = expect_done(inner.enter_sequence(), "truncated AttributeValueAssertion")?;
    let attribute_desc = decode_ldap_string(&mut seq)?;
    let assertion_value = expect_done(seq.read_octet_string(), "truncated assertion")?;
    let ava = AttributeValueAssertion {
        attribute_desc,
        assertion_value: Cow::Borrowed(assertion_value),
    };
    Ok(CompareRequest { entry, ava })
}

/// `ExtendedRequest ::= [APPLICATION 23] SEQUENCE { requestName [0]
/// LDAPOID, requestValue [1] OCTET STRING OPTIONAL }`. Once `requestName`
/// is known, a registered [`crate::registry::ExtendedOperationFactory`]
/// decodes `requestValue` further; an unregistered OID (the
/// `OpaqueExtendedRequest` fallback) just keeps the raw bytes.
fn decode_extended_request<'a>(
    body: &mut Reader<'a>,
    registry: &CodecRegistry,
) -> DecodeResult<ExtendedRequest<'a>> {
    let mut inner = expect_done(body.enter_application(23, true), "truncated ExtendedRequest")?;
    let offset = inner.offset();
    let name_s = expect_done(inner.read_context_utf8(0), "truncated requestName")?;
    validate_oid(name_s, offset)?;
    let request_name = LdapOID(Cow::Borrowed(name_s));
    let request_value = if expect_done(inner.peek_context_tag(), "truncated requestValue")? == Some(1)
    {
        Some(Cow::Borrowed(expect_done(
            inner.read_context_octet_string(1),
            "truncated requestValue",
        )?))
    } else {
        None
    };
    let decoded = match registry.extended(request_name.as_str()) {
        Some(factory) => Some(factory.decode_request_value(request_value.as_deref())?),
        None => None,
    };
    Ok(ExtendedRequest {
        request_name,
        request_value,
        decoded,
    })
}

/// `ExtendedResponse ::= [APPLICATION 24] SEQUENCE { COMPONENTS OF
/// LDAPResult, responseName [10] LDAPOID OPTIONAL, responseValue [11]
/// OCTET STRING OPTIONAL }`. Dispatches on `responseName` the same way
/// [`decode_extended_request`] dispatches on `requestName`; with no
/// `responseName` there is nothing to look up and the response stays
/// opaque.
fn decode_extended_response<'a>(
    body: &mut Reader<'a>,
    registry: &CodecRegistry,
) -> DecodeResult<ExtendedResponse<'a>> {
    let mut inner = expect_done(body.enter_application(24, true), "truncated ExtendedResponse")?;
    let result = decode_ldap_result(&mut inner)?;
    let response_name = if expect_done(inner.peek_context_tag(), "truncated responseName")?
        == Some(10)
    {
        let offset = inner.offset();
        let s = expect_done(inner.read_context_utf8(10), "truncated responseName")?;
        validate_oid(s, offset)?;
        Some(LdapOID(Cow::Borrowed(s)))
    } else {
        None
    };
    let response_value = if expect_done(inner.peek_context_tag(), "truncated responseValue")?
        == Some(11)
    {
        Some(Cow::Borrowed(expect_done(
            inner.read_context_octet_string(11),
            "truncated responseValue",
        )?))
    } else {
        None
    };
    let decoded = match response_name.as_ref().and_then(|n| registry.extended(n.as_str())) {
        Some(factory) => Some(factory.decode_response_value(response_value.as_deref())?),
        None => None,
    };
    Ok(ExtendedResponse {
        result,
        response_name,
        response_value,
        decoded,
    })
}

/// `IntermediateResponse ::= [APPLICATION 25] SEQUENCE { responseName
/// [0] LDAPOID OPTIONAL, responseValue [1] OCTET STRING OPTIONAL }`.
/// Dispatches through a registered
/// [`crate::registry::IntermediateResponseFactory`] the same way
/// [`decode_extended_response`] does.
fn decode_intermediate_response<'a>(
    body: &mut Reader<'a>,
    registry: &CodecRegistry,
) -> DecodeResult<IntermediateResponse<'a>> {
    let mut inner = expect_done(body.enter_application(25, true), "truncated IntermediateResponse")?;
    let response_name = if expect_done(inner.peek_context_tag(), "truncated responseName")?
        == Some(0)
    {
        let offset = inner.offset();
        let s = expect_done(inner.read_context_utf8(0), "truncated responseName")?;
        validate_oid(s, offset)?;
        Some(LdapOID(Cow::Borrowed(s)))
    } else {
        None
    };
    let response_value = if expect_done(inner.peek_context_tag(), "truncated responseValue")?
        == Some(1)
    {
        Some(Cow::Borrowed(expect_done(
            inner.read_context_octet_string(1),
            "truncated responseValue",
        )?))
    } else {
        None
    };
    let decoded = match response_name.as_ref().and_then(|n| registry.intermediate(n.as_str())) {
        Some(factory) => Some(factory.decode_value(response_value.as_deref())?),
        None => None,
    };
    Ok(IntermediateResponse {
        response_name,
        response_value,
        decoded,
    })
}

/// `Control ::= SEQUENCE { controlType LDAPOID, criticality BOOLEAN
/// DEFAULT FALSE, controlValue OCTET STRING OPTIONAL }`. Once
/// `controlType` is known, a registered
/// [`crate::registry::ControlFactory`] decodes `controlValue` further
/// (spec §4.6); an unregistered OID just keeps the raw bytes.
fn decode_control<'a>(
    reader: &mut Reader<'a>,
    registry: &CodecRegistry,
) -> DecodeResult<Control<'a>> {
    let mut seq = expect_done(reader.enter_sequence(), "truncated Control")?;
    let control_type = decode_ldap_oid(&mut seq)?;
    let mut criticality = false;
    if let Some(header) = expect_done(seq.peek_optional_header(), "truncated control")? {
        if header.class == Class::Universal && header.tag == 0x01 {
            criticality = expect_done(seq.read_boolean(), "truncated criticality")?;
        }
    }
    let control_value = if !seq.is_empty() {
        Some(Cow::Borrowed(expect_done(
            seq.read_octet_string(),
            "truncated controlValue",
        )?))
    } else {
        None
    };
    let decoded = match registry.control(control_type.as_str()) {
        Some(factory) => Some(factory.decode_value(control_value.as_deref())?),
        None => None,
    };
    Ok(Control {
        control_type,
        criticality,
        control_value,
        decoded,
    })
}
