//! `protocolOp` variants and the top-level `LDAPMessage` envelope.

use super::common::*;
use super::control::Control;
use super::filter::Filter;
use super::filter::{Attribute, PartialAttribute};
use crate::registry::DecodedValue;
use rusticata_macros::newtype_enum;
use std::borrow::Cow;

/// APPLICATION tag of a `protocolOp` variant (spec §6 tag table). Unknown
/// values round-trip rather than being rejected, the same open-enum
/// treatment as [`ResultCode`].
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct ProtocolOpTag(pub u32);

newtype_enum! {
impl display ProtocolOpTag {
    BindRequest = 0,
    BindResponse = 1,
    UnbindRequest = 2,
    SearchRequest = 3,
    SearchResultEntry = 4,
    SearchResultDone = 5,
    ModifyRequest = 6,
    ModifyResponse = 7,
    AddRequest = 8,
    AddResponse = 9,
    DelRequest = 10,
    DelResponse = 11,
    ModDnRequest = 12,
    ModDnResponse = 13,
    CompareRequest = 14,
    CompareResponse = 15,
    AbandonRequest = 16,
    SearchResultReference = 19,
    ExtendedRequest = 23,
    ExtendedResponse = 24,
    IntermediateResponse = 25,
}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BindRequest<'a> {
    pub version: u8,
    pub name: LdapDN<'a>,
    pub authentication: AuthenticationChoice<'a>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaslCredentials<'a> {
    pub mechanism: LdapString<'a>,
    pub credentials: Option<Cow<'a, [u8]>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AuthenticationChoice<'a> {
    Simple(Cow<'a, [u8]>),
    Sasl(SaslCredentials<'a>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BindResponse<'a> {
    pub result: LdapResult<'a>,
    pub server_sasl_creds: Option<Cow<'a, [u8]>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchRequest<'a> {
    pub base_object: LdapDN<'a>,
    pub scope: SearchScope,
    pub deref_aliases: DerefAliases,
    pub size_limit: u32,
    pub time_limit: u32,
    pub types_only: bool,
    pub filter: Filter<'a>,
    pub attributes: Vec<LdapString<'a>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchResultEntry<'a> {
    pub object_name: LdapDN<'a>,
    pub attributes: Vec<PartialAttribute<'a>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModifyRequest<'a> {
    pub object: LdapDN<'a>,
    pub changes: Vec<Change<'a>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModifyResponse<'a> {
    pub result: LdapResult<'a>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Change<'a> {
    pub operation: Operation,
    pub modification: PartialAttribute<'a>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddRequest<'a> {
    pub entry: LdapDN<'a>,
    pub attributes: Vec<Attribute<'a>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModDnRequest<'a> {
    pub entry: LdapDN<'a>,
    pub newrdn: RelativeLdapDN<'a>,
    pub deleteoldrdn: bool,
    pub newsuperior: Option<LdapDN<'a>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompareRequest<'a> {
    pub entry: LdapDN<'a>,
    pub ava: super::filter::AttributeValueAssertion<'a>,
}

/// `ExtendedRequest ::= [APPLICATION 23] SEQUENCE { requestName [0]
/// LDAPOID, requestValue [1] OCTET STRING OPTIONAL }`.
///
/// `decoded` mirrors [`Control::decoded`]: populated from a registered
/// [`crate::registry::ExtendedOperationFactory`] when one matches
/// `request_name`, excluded from equality.
#[derive(Clone, Debug)]
pub struct ExtendedRequest<'a> {
    pub request_name: LdapOID<'a>,
    pub request_value: Option<Cow<'a, [u8]>>,
    pub decoded: Option<Box<dyn DecodedValue>>,
}

impl PartialEq for ExtendedRequest<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.request_name == other.request_name && self.request_value == other.request_value
    }
}

impl Eq for ExtendedRequest<'_> {}

/// `ExtendedResponse ::= [APPLICATION 24] SEQUENCE { COMPONENTS OF
/// LDAPResult, responseName [10] LDAPOID OPTIONAL, responseValue [11]
/// OCTET STRING OPTIONAL }`. `decoded` mirrors [`Control::decoded`].
#[derive(Clone, Debug)]
pub struct ExtendedResponse<'a> {
    pub result: LdapResult<'a>,
    pub response_name: Option<LdapOID<'a>>,
    pub response_value: Option<Cow<'a, [u8]>>,
    pub decoded: Option<Box<dyn DecodedValue>>,
}

impl PartialEq for ExtendedResponse<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.result == other.result
            && self.response_name == other.response_name
            && self.response_value == other.response_value
    }
}

impl Eq for ExtendedResponse<'_> {}

/// `IntermediateResponse ::= [APPLICATION 25] SEQUENCE { responseName
/// [0] LDAPOID OPTIONAL, responseValue [1] OCTET STRING OPTIONAL }`.
/// `decoded` mirrors [`Control::decoded`].
#[derive(Clone, Debug)]
pub struct IntermediateResponse<'a> {
    pub response_name: Option<LdapOID<'a>>,
    pub response_value: Option<Cow<'a, [u8]>>,
    pub decoded: Option<Box<dyn DecodedValue>>,
}

impl PartialEq for IntermediateResponse<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.response_name == other.response_name && self.response_value == other.response_value
    }
}

impl Eq for IntermediateResponse<'_> {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProtocolOp<'a> {
    BindRequest(BindRequest<'a>),
    BindResponse(BindResponse<'a>),
    UnbindRequest,
    SearchRequest(SearchRequest<'a>),
    SearchResultEntry(SearchResultEntry<'a>),
    SearchResultDone(LdapResult<'a>),
    SearchResultReference(Vec<LdapString<'a>>),
    ModifyRequest(ModifyRequest<'a>),
    ModifyResponse(ModifyResponse<'a>),
    AddRequest(AddRequest<'a>),
    AddResponse(LdapResult<'a>),
    DelRequest(LdapDN<'a>),
    DelResponse(LdapResult<'a>),
    ModDnRequest(ModDnRequest<'a>),
    ModDnResponse(LdapResult<'a>),
    CompareRequest(CompareRequest<'a>),
    CompareResponse(LdapResult<'a>),
    AbandonRequest(MessageID),
    ExtendedRequest(ExtendedRequest<'a>),
    ExtendedResponse(ExtendedResponse<'a>),
    IntermediateResponse(IntermediateResponse<'a>),
}

impl ProtocolOp<'_> {
    /// APPLICATION tag for this variant (spec §6).
    pub fn tag(&self) -> ProtocolOpTag {
        let op = match self {
            ProtocolOp::BindRequest(_) => 0,
            ProtocolOp::BindResponse(_) => 1,
            ProtocolOp::UnbindRequest => 2,
            ProtocolOp::SearchRequest(_) => 3,
            ProtocolOp::SearchResultEntry(_) => 4,
            ProtocolOp::SearchResultDone(_) => 5,
            ProtocolOp::ModifyRequest(_) => 6,
            ProtocolOp::ModifyResponse(_) => 7,
            ProtocolOp::AddRequest(_) => 8,
            ProtocolOp::AddResponse(_) => 9,
            ProtocolOp::DelRequest(_) => 10,
            ProtocolOp::DelResponse(_) => 11,
            ProtocolOp::ModDnRequest(_) => 12,
            ProtocolOp::ModDnResponse(_) => 13,
            ProtocolOp::CompareRequest(_) => 14,
            ProtocolOp::CompareResponse(_) => 15,
            ProtocolOp::AbandonRequest(_) => 16,
            ProtocolOp::SearchResultReference(_) => 19,
            ProtocolOp::ExtendedRequest(_) => 23,
            ProtocolOp::ExtendedResponse(_) => 24,
            ProtocolOp::IntermediateResponse(_) => 25,
        };
        ProtocolOpTag(op)
    }

    /// The embedded [`LdapResult`], for the variants that carry one.
    pub fn result(&self) -> Option<&LdapResult> {
        match self {
            ProtocolOp::BindResponse(r) => Some(&r.result),
            ProtocolOp::ModifyResponse(r) => Some(&r.result),
            ProtocolOp::ExtendedResponse(r) => Some(&r.result),
            ProtocolOp::SearchResultDone(r)
            | ProtocolOp::AddResponse(r)
            | ProtocolOp::DelResponse(r)
            | ProtocolOp::ModDnResponse(r)
            | ProtocolOp::CompareResponse(r) => Some(r),
            _ => None,
        }
    }
}

/// `LDAPMessage ::= SEQUENCE { messageID, protocolOp, controls [0]
/// OPTIONAL }` (RFC 4511 §4.1.1).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LdapMessage<'a> {
    pub message_id: MessageID,
    pub protocol_op: ProtocolOp<'a>,
    /// Controls in wire (insertion) order; see [`Control`] and
    /// [`crate::registry::CodecRegistry`] for OID dispatch.
    pub controls: Option<Vec<Control<'a>>>,
}

impl<'a> LdapMessage<'a> {
    /// Looks up a control by OID; linear scan, which is cheap at the
    /// control-list sizes LDAP messages actually carry.
    pub fn control(&self, oid: &str) -> Option<&Control<'a>> {
        self.controls
            .as_ref()
            .and_then(|cs| cs.iter().find(|c| c.oid() == oid))
    }
}
