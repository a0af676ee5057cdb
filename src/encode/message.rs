//! Reverse encoding of the LDAP message grammar (spec §4.3/§4.5).
//!
//! Mirrors [`crate::grammar::message`] operation-for-operation. Every
//! constructed value here pushes its fields in reverse declared order,
//! the same convention [`crate::ber::Asn1Buffer`]'s own tests document.

use super::control::encode_controls;
use super::filter::encode_filter;
use super::{
    encode_application, encode_context, encode_sequence, encode_set, push_application_primitive,
    push_boolean, push_context_octet_string, push_context_utf8, push_enumerated, push_integer,
    push_octet_string, push_utf8,
};
use crate::ber::primitives::minimal_integer_bytes;
use crate::ber::tag::Class;
use crate::ber::Asn1Buffer;
use crate::error::{EncodeError, EncodeResult};
use crate::model::*;
use crate::registry::CodecRegistry;

pub fn encode_ldap_message(
    buf: &mut Asn1Buffer,
    msg: &LdapMessage<'_>,
    registry: &CodecRegistry,
) -> EncodeResult<()> {
    encode_sequence(buf, |buf| {
        if let Some(controls) = &msg.controls {
            encode_controls(buf, controls, registry)?;
        }
        encode_protocol_op(buf, &msg.protocol_op, registry)?;
        push_integer(buf, msg.message_id.0 as i64)
    })
}

fn encode_protocol_op(
    buf: &mut Asn1Buffer,
    op: &ProtocolOp<'_>,
    registry: &CodecRegistry,
) -> EncodeResult<()> {
    match op {
        ProtocolOp::BindRequest(r) => encode_bind_request(buf, r),
        ProtocolOp::BindResponse(r) => encode_bind_response(buf, r),
        // UnbindRequest ::= [APPLICATION 2] NULL — a primitive tag with
        // empty content, not a constructed SEQUENCE; encode_application
        // would wrongly set the constructed bit, giving 0x62 instead of
        // the 0x42 spec §6/§8 scenario 2 requires.
        ProtocolOp::UnbindRequest => push_application_primitive(buf, 2, &[]),
        ProtocolOp::SearchRequest(r) => encode_search_request(buf, r),
        ProtocolOp::SearchResultEntry(r) => encode_search_result_entry(buf, r),
        ProtocolOp::SearchResultDone(r) => encode_application(buf, 5, |buf| encode_ldap_result(buf, r)),
        ProtocolOp::SearchResultReference(uris) => encode_application(buf, 19, |buf| {
            if uris.is_empty() {
                return Err(EncodeError::Invalid {
                    reason: "SearchResultReference must contain at least one URI",
                });
            }
            for uri in uris.iter().rev() {
                push_utf8(buf, &uri.0)?;
            }
            Ok(())
        }),
        ProtocolOp::ModifyRequest(r) => encode_modify_request(buf, r),
        ProtocolOp::ModifyResponse(r) => {
            encode_application(buf, 7, |buf| encode_ldap_result(buf, &r.result))
        }
        ProtocolOp::AddRequest(r) => encode_add_request(buf, r),
        ProtocolOp::AddResponse(r) => encode_application(buf, 9, |buf| encode_ldap_result(buf, r)),
        ProtocolOp::DelRequest(dn) => {
            push_application_primitive(buf, 10, dn.0.as_bytes())
        }
        ProtocolOp::DelResponse(r) => encode_application(buf, 11, |buf| encode_ldap_result(buf, r)),
        ProtocolOp::ModDnRequest(r) => encode_moddn_request(buf, r),
        ProtocolOp::ModDnResponse(r) => encode_application(buf, 13, |buf| encode_ldap_result(buf, r)),
        ProtocolOp::CompareRequest(r) => encode_compare_request(buf, r),
        ProtocolOp::CompareResponse(r) => {
            encode_application(buf, 15, |buf| encode_ldap_result(buf, r))
        }
        ProtocolOp::AbandonRequest(id) => {
            push_application_primitive(buf, 16, &minimal_integer_bytes(id.0 as i64))
        }
        ProtocolOp::ExtendedRequest(r) => encode_extended_request(buf, r, registry),
        ProtocolOp::ExtendedResponse(r) => encode_extended_response(buf, r, registry),
        ProtocolOp::IntermediateResponse(r) => encode_intermediate_response(buf, r, registry),
    }
}

/// `LDAPResult ::= SEQUENCE { resultCode, matchedDN, diagnosticMessage,
/// referral [3] OPTIONAL }`, pushed directly onto the caller's buffer
/// (not wrapped in its own SEQUENCE) so it can be reused both standalone
/// and flattened into BindResponse/ExtendedResponse via COMPONENTS OF.
fn encode_ldap_result(buf: &mut Asn1Buffer, result: &LdapResult<'_>) -> EncodeResult<()> {
    if let Some(referral) = &result.referral {
        if referral.is_empty() {
            return Err(EncodeError::Invalid {
                reason: "referral must be non-empty when present",
            });
        }
        encode_context(buf, 3, |buf| {
            for url in referral.iter().rev() {
                push_utf8(buf, &url.0)?;
            }
            Ok(())
        })?;
    }
    push_utf8(buf, &result.diagnostic_message.0)?;
    push_utf8(buf, &result.matched_dn.0)?;
    push_enumerated(buf, result.result_code.0 as i32)
}

fn encode_bind_request(buf: &mut Asn1Buffer, r: &BindRequest<'_>) -> EncodeResult<()> {
    encode_application(buf, 0, |buf| {
        encode_authentication_choice(buf, &r.authentication)?;
        push_utf8(buf, &r.name.0)?;
        push_integer(buf, r.version as i64)
    })
}

fn encode_authentication_choice(
    buf: &mut Asn1Buffer,
    choice: &AuthenticationChoice<'_>,
) -> EncodeResult<()> {
    match choice {
        AuthenticationChoice::Simple(bytes) => push_context_octet_string(buf, 0, bytes),
        AuthenticationChoice::Sasl(creds) => encode_context(buf, 3, |buf| {
            if let Some(c) = &creds.credentials {
                push_octet_string(buf, c)?;
            }
            push_utf8(buf, &creds.mechanism.0)
        }),
    }
}

fn encode_bind_response(buf: &mut Asn1Buffer, r: &BindResponse<'_>) -> EncodeResult<()> {
    encode_application(buf, 1, |buf| {
        if let Some(creds) = &r.server_sasl_creds {
            push_context_octet_string(buf, 7, creds)?;
        }
        encode_ldap_result(buf, &r.result)
    })
}

fn encode_search_request(buf: &mut Asn1Buffer, r: &SearchRequest<'_>) -> EncodeResult<()> {
    encode_application(buf, 3, |buf| {
        encode_sequence(buf, |buf| {
            for a in r.attributes.iter().rev() {
                push_utf8(buf, &a.0)?;
            }
            Ok(())
        })?;
        encode_filter(buf, &r.filter)?;
        push_boolean(buf, r.types_only)?;
        push_integer(buf, r.time_limit as i64)?;
        push_integer(buf, r.size_limit as i64)?;
        push_enumerated(buf, r.deref_aliases.0 as i32)?;
        push_enumerated(buf, r.scope.0 as i32)?;
        push_utf8(buf, &r.base_object.0)
    })
}

fn encode_partial_attribute(buf: &mut Asn1Buffer, pa: &PartialAttribute<'_>) -> EncodeResult<()> {
    encode_attribute_values(buf, &pa.attr_type.0, &pa.attr_vals)
}

fn encode_attribute(buf: &mut Asn1Buffer, a: &Attribute<'_>) -> EncodeResult<()> {
    if a.attr_vals.is_empty() {
        return Err(EncodeError::Invalid {
            reason: "Attribute must have at least one value",
        });
    }
    encode_attribute_values(buf, &a.attr_type.0, &a.attr_vals)
}

fn encode_attribute_values(
    buf: &mut Asn1Buffer,
    attr_type: &str,
    attr_vals: &[AttributeValue<'_>],
) -> EncodeResult<()> {
    encode_sequence(buf, |buf| {
        encode_set(buf, |buf| {
            for v in attr_vals.iter().rev() {
                push_octet_string(buf, &v.0)?;
            }
            Ok(())
        })?;
        push_utf8(buf, attr_type)
    })
}

fn encode_search_result_entry(buf: &mut Asn1Buffer, r: &SearchResultEntry<'_>) -> EncodeResult<()> {
    encode_application(buf, 4, |buf| {
        encode_sequence(buf, |buf| {
            for a in r.attributes.iter().rev() {
                encode_partial_attribute(buf, a)?;
            }
            Ok(())
        })?;
        push_utf8(buf, &r.object_name.0)
    })
}

fn encode_modify_request(buf: &mut Asn1Buffer, r: &ModifyRequest<'_>) -> EncodeResult<()> {
    encode_application(buf, 6, |buf| {
        encode_sequence(buf, |buf| {
            for c in r.changes.iter().rev() {
                encode_sequence(buf, |buf| {
                    encode_partial_attribute(buf, &c.modification)?;
                    push_enumerated(buf, c.operation.0 as i32)
                })?;
            }
            Ok(())
        })?;
        push_utf8(buf, &r.object.0)
    })
}

fn encode_add_request(buf: &mut Asn1Buffer, r: &AddRequest<'_>) -> EncodeResult<()> {
    if r.attributes.is_empty() {
        return Err(EncodeError::Invalid {
            reason: "AddRequest attributes must be non-empty",
        });
    }
    encode_application(buf, 8, |buf| {
        encode_sequence(buf, |buf| {
            for a in r.attributes.iter().rev() {
                encode_attribute(buf, a)?;
            }
            Ok(())
        })?;
        push_utf8(buf, &r.entry.0)
    })
}

fn encode_moddn_request(buf: &mut Asn1Buffer, r: &ModDnRequest<'_>) -> EncodeResult<()> {
    encode_application(buf, 12, |buf| {
        if let Some(s) = &r.newsuperior {
            push_context_utf8(buf, 0, &s.0)?;
        }
        push_boolean(buf, r.deleteoldrdn)?;
        push_utf8(buf, &r.newrdn.0)?;
        push_utf8(buf, &r.entry.0)
    })
}

fn encode_compare_request(buf: &mut Asn1Buffer, r: &CompareRequest<'_>) -> EncodeResult<()> {
    encode_application(buf, 14, |buf| {
        encode_sequence(buf, |buf| {
            push_octet_string(buf, &r.ava.assertion_value)?;
            push_utf8(buf, &r.ava.attribute_desc.0)
        })?;
        push_utf8(buf, &r.entry.0)
    })
}

fn encode_extended_request(
    buf: &mut Asn1Buffer,
    r: &ExtendedRequest<'_>,
    registry: &CodecRegistry,
) -> EncodeResult<()> {
    encode_application(buf, 23, |buf| {
        match (&r.decoded, registry.extended(r.request_name.as_str())) {
            (Some(decoded), Some(factory)) => {
                buf.encode_primitive_wrapped(Class::ContextSpecific, 1, |buf| {
                    factory.encode_request_value(decoded.as_ref(), buf)
                })?;
            }
            _ => {
                if let Some(v) = &r.request_value {
                    push_context_octet_string(buf, 1, v)?;
                }
            }
        }
        push_context_utf8(buf, 0, &r.request_name.0)
    })
}

fn encode_extended_response(
    buf: &mut Asn1Buffer,
    r: &ExtendedResponse<'_>,
    registry: &CodecRegistry,
) -> EncodeResult<()> {
    encode_application(buf, 24, |buf| {
        let factory = r.response_name.as_ref().and_then(|n| registry.extended(n.as_str()));
        match (&r.decoded, factory) {
            (Some(decoded), Some(factory)) => {
                buf.encode_primitive_wrapped(Class::ContextSpecific, 11, |buf| {
                    factory.encode_response_value(decoded.as_ref(), buf)
                })?;
            }
            _ => {
                if let Some(v) = &r.response_value {
                    push_context_octet_string(buf, 11, v)?;
                }
            }
        }
        if let Some(n) = &r.response_name {
            push_context_utf8(buf, 10, &n.0)?;
        }
        encode_ldap_result(buf, &r.result)
    })
}

fn encode_intermediate_response(
    buf: &mut Asn1Buffer,
    r: &IntermediateResponse<'_>,
    registry: &CodecRegistry,
) -> EncodeResult<()> {
    encode_application(buf, 25, |buf| {
        let factory = r.response_name.as_ref().and_then(|n| registry.intermediate(n.as_str()));
        match (&r.decoded, factory) {
            (Some(decoded), Some(factory)) => {
                buf.encode_primitive_wrapped(Class::ContextSpecific, 1, |buf| {
                    factory.encode_value(decoded.as_ref(), buf)
                })?;
            }
            _ => {
                if let Some(v) = &r.response_value {
                    push_context_octet_string(buf, 1, v)?;
                }
            }
        }
        if let Some(n) = &r.response_name {
            push_context_utf8(buf, 0, &n.0)?;
        }
        Ok(())
    })
}
