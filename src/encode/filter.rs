//! Reverse encoding of the filter sub-grammar (spec §4.4/§4.5).
//!
//! Mirrors [`crate::grammar::filter`] tag-for-tag; within And/Or/
//! Substrings, children are pushed in reverse index order (Design Note
//! 3) so the buffer's single final reversal restores declared order.

use super::{encode_context, push_context_octet_string, push_context_utf8};
use crate::ber::Asn1Buffer;
use crate::error::{EncodeError, EncodeResult};
use crate::model::filter::*;

pub fn encode_filter(buf: &mut Asn1Buffer, filter: &Filter<'_>) -> EncodeResult<()> {
    match filter {
        Filter::And(children) => encode_filter_set(buf, 0, children),
        Filter::Or(children) => encode_filter_set(buf, 1, children),
        Filter::Not(child) => encode_context(buf, 2, |buf| encode_filter(buf, child)),
        Filter::EqualityMatch(ava) => encode_context(buf, 3, |buf| encode_ava(buf, ava)),
        Filter::Substrings(sf) => encode_context(buf, 4, |buf| encode_substrings(buf, sf)),
        Filter::GreaterOrEqual(ava) => encode_context(buf, 5, |buf| encode_ava(buf, ava)),
        Filter::LessOrEqual(ava) => encode_context(buf, 6, |buf| encode_ava(buf, ava)),
        Filter::Present(attr) => push_context_utf8(buf, 7, &attr.0),
        Filter::ApproxMatch(ava) => encode_context(buf, 8, |buf| encode_ava(buf, ava)),
        Filter::ExtensibleMatch(mra) => encode_context(buf, 9, |buf| encode_mra(buf, mra)),
    }
}

fn encode_filter_set(buf: &mut Asn1Buffer, tag: u32, children: &[Filter<'_>]) -> EncodeResult<()> {
    if children.is_empty() {
        return Err(EncodeError::Invalid {
            reason: "AND/OR filter must have at least one component",
        });
    }
    encode_context(buf, tag, |buf| {
        for child in children.iter().rev() {
            encode_filter(buf, child)?;
        }
        Ok(())
    })
}

fn encode_ava(buf: &mut Asn1Buffer, ava: &AttributeValueAssertion<'_>) -> EncodeResult<()> {
    super::push_octet_string(buf, &ava.assertion_value)?;
    super::push_utf8(buf, &ava.attribute_desc.0)
}

fn encode_substrings(buf: &mut Asn1Buffer, sf: &SubstringFilter<'_>) -> EncodeResult<()> {
    if sf.substrings.is_empty() {
        return Err(EncodeError::Invalid {
            reason: "substrings filter must have at least one component",
        });
    }
    crate::encode::encode_sequence(buf, |buf| {
        for s in sf.substrings.iter().rev() {
            match s {
                Substring::Initial(v) => push_context_octet_string(buf, 0, &v.0)?,
                Substring::Any(v) => push_context_octet_string(buf, 1, &v.0)?,
                Substring::Final(v) => push_context_octet_string(buf, 2, &v.0)?,
            }
        }
        Ok(())
    })?;
    super::push_utf8(buf, &sf.filter_type.0)
}

fn encode_mra(buf: &mut Asn1Buffer, mra: &MatchingRuleAssertion<'_>) -> EncodeResult<()> {
    // dnAttributes is DEFAULT FALSE and context-tagged [4]; omit when false.
    if mra.dn_attributes {
        push_context_octet_string(buf, 4, &[0xFF])?;
    }
    push_context_octet_string(buf, 3, &mra.assertion_value.0)?;
    if let Some(t) = &mra.rule_type {
        push_context_utf8(buf, 2, &t.0)?;
    }
    if let Some(r) = &mra.matching_rule {
        push_context_utf8(buf, 1, &r.0)?;
    }
    Ok(())
}
