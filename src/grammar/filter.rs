//! The filter sub-grammar (spec §4.4): `Filter ::= CHOICE { and [0], or
//! [1], not [2], equalityMatch [3], substrings [4], greaterOrEqual [5],
//! lessOrEqual [6], present [7], approxMatch [8], extensibleMatch [9] }`.
//!
//! Grounded on the teacher's `filter_parser.rs`, which recurses through
//! `Filter::from_ber` via `nom`'s own call stack. Here the same recursive
//! shape is kept (every nested filter's content is already fully
//! buffered once the enclosing SearchRequest's SEQUENCE was read off a
//! complete PDU, so there is nothing left to stream), but depth is
//! checked explicitly before each descent against `max_filter_depth`
//! rather than relying on the native stack to fail safe — this gives the
//! bound spec §5 asks for without hand-rolling a parallel non-recursive
//! stack machine purely to re-implement what bounded recursion already
//! guarantees in Rust.

use crate::ber::tag::Class;
use crate::engine::{expect_done, Reader};
use crate::error::{DecodeError, DecodeResult};
use crate::model::filter::*;
use crate::model::LdapString;
use std::borrow::Cow;

pub fn decode_filter<'a>(
    reader: &mut Reader<'a>,
    depth: u16,
    max_depth: u16,
) -> DecodeResult<Filter<'a>> {
    if depth > max_depth {
        return Err(DecodeError::FilterTooDeep {
            offset: reader.offset(),
            max: max_depth,
        });
    }
    let header = expect_done(reader.peek_header(), "truncated filter")?;
    if header.class != Class::ContextSpecific {
        return Err(DecodeError::Protocol {
            offset: reader.offset(),
            state: "Filter",
            reason: "expected a context-specific filter tag",
        });
    }
    match header.tag {
        0 => {
            let mut inner = expect_done(reader.enter_context(0), "truncated AND filter")?;
            let children = decode_filter_set(&mut inner, depth, max_depth)?;
            if children.is_empty() {
                return Err(DecodeError::Protocol {
                    offset: reader.offset(),
                    state: "Filter::And",
                    reason: "AND must have at least one component",
                });
            }
            Ok(Filter::And(children))
        }
        1 => {
            let mut inner = expect_done(reader.enter_context(1), "truncated OR filter")?;
            let children = decode_filter_set(&mut inner, depth, max_depth)?;
            if children.is_empty() {
                return Err(DecodeError::Protocol {
                    offset: reader.offset(),
                    state: "Filter::Or",
                    reason: "OR must have at least one component",
                });
            }
            Ok(Filter::Or(children))
        }
        2 => {
            let mut inner = expect_done(reader.enter_context(2), "truncated NOT filter")?;
            let child = decode_filter(&mut inner, depth + 1, max_depth)?;
            if !inner.is_empty() {
                return Err(DecodeError::Protocol {
                    offset: inner.offset(),
                    state: "Filter::Not",
                    reason: "NOT must have exactly one component",
                });
            }
            Ok(Filter::Not(Box::new(child)))
        }
        3 => {
            let mut inner = expect_done(reader.enter_context(3), "truncated equalityMatch")?;
            Ok(Filter::EqualityMatch(decode_ava(&mut inner)?))
        }
        4 => {
            let mut inner = expect_done(reader.enter_context(4), "truncated substrings filter")?;
            Ok(Filter::Substrings(decode_substrings(&mut inner)?))
        }
        5 => {
            let mut inner = expect_done(reader.enter_context(5), "truncated greaterOrEqual")?;
            Ok(Filter::GreaterOrEqual(decode_ava(&mut inner)?))
        }
        6 => {
            let mut inner = expect_done(reader.enter_context(6), "truncated lessOrEqual")?;
            Ok(Filter::LessOrEqual(decode_ava(&mut inner)?))
        }
        7 => {
            let s = expect_done(reader.read_context_utf8(7), "truncated present filter")?;
            Ok(Filter::Present(LdapString(Cow::Borrowed(s))))
        }
        8 => {
            let mut inner = expect_done(reader.enter_context(8), "truncated approxMatch")?;
            Ok(Filter::ApproxMatch(decode_ava(&mut inner)?))
        }
        9 => {
            let mut inner = expect_done(reader.enter_context(9), "truncated extensibleMatch")?;
            Ok(Filter::ExtensibleMatch(decode_mra(&mut inner)?))
        }
        _ => Err(DecodeError::Protocol {
            offset: reader.offset(),
            state: "Filter",
            reason: "unknown filter choice tag",
        }),
    }
}

/// Decodes the children of an AND/OR set: every element is itself a
/// `Filter`, so this just loops `decode_filter` until the enclosing
/// constructed value's content is exhausted.
fn decode_filter_set<'a>(
    reader: &mut Reader<'a>,
    depth: u16,
    max_depth: u16,
) -> DecodeResult<Vec<Filter<'a>>> {
    let mut out = Vec::new();
    while !reader.is_empty() {
        out.push(decode_filter(reader, depth + 1, max_depth)?);
    }
    Ok(out)
}

fn decode_ava<'a>(reader: &mut Reader<'a>) -> DecodeResult<AttributeValueAssertion<'a>> {
    let attribute_desc = expect_done(reader.read_utf8_string(), "truncated attributeDesc")?;
    let assertion_value = expect_done(reader.read_octet_string(), "truncated assertionValue")?;
    if !reader.is_empty() {
        return Err(DecodeError::Protocol {
            offset: reader.offset(),
            state: "AttributeValueAssertion",
            reason: "unexpected trailing bytes",
        });
    }
    Ok(AttributeValueAssertion {
        attribute_desc: LdapString(Cow::Borrowed(attribute_desc)),
        assertion_value: Cow::Borrowed(assertion_value),
    })
}

/// `SubstringFilter ::= SEQUENCE { type AttributeDescription, substrings
/// SEQUENCE SIZE (1..MAX) OF CHOICE { initial [0], any [1], final [2] } }`
/// — at most one `initial` (first only) and one `final` (last only).
fn decode_substrings<'a>(reader: &mut Reader<'a>) -> DecodeResult<SubstringFilter<'a>> {
    let filter_type = expect_done(reader.read_utf8_string(), "truncated substrings type")?;
    let mut seq = expect_done(reader.enter_sequence(), "truncated substrings sequence")?;
    let mut substrings = Vec::new();
    let mut saw_initial = false;
    let mut saw_final = false;
    while !seq.is_empty() {
        let header = expect_done(seq.peek_header(), "truncated substring choice")?;
        if header.class != Class::ContextSpecific {
            return Err(DecodeError::Protocol {
                offset: seq.offset(),
                state: "SubstringFilter",
                reason: "expected a substring context tag",
            });
        }
        match header.tag {
            0 => {
                if saw_initial || saw_final || !substrings.is_empty() {
                    return Err(DecodeError::Protocol {
                        offset: seq.offset(),
                        state: "SubstringFilter",
                        reason: "initial must be the first and only initial component",
                    });
                }
                let v = expect_done(seq.read_context_octet_string(0), "truncated initial")?;
                substrings.push(Substring::Initial(AssertionValue(Cow::Borrowed(v))));
                saw_initial = true;
            }
            1 => {
                if saw_final {
                    return Err(DecodeError::Protocol {
                        offset: seq.offset(),
                        state: "SubstringFilter",
                        reason: "any component after final",
                    });
                }
                let v = expect_done(seq.read_context_octet_string(1), "truncated any")?;
                substrings.push(Substring::Any(AssertionValue(Cow::Borrowed(v))));
            }
            2 => {
                if saw_final {
                    return Err(DecodeError::Protocol {
                        offset: seq.offset(),
                        state: "SubstringFilter",
                        reason: "final must occur at most once",
                    });
                }
                let v = expect_done(seq.read_context_octet_string(2), "truncated final")?;
                substrings.push(Substring::Final(AssertionValue(Cow::Borrowed(v))));
                saw_final = true;
            }
            _ => {
                return Err(DecodeError::Protocol {
                    offset: seq.offset(),
                    state: "SubstringFilter",
                    reason: "unknown substring choice tag",
                })
            }
        }
    }
    if substrings.is_empty() {
        return Err(DecodeError::Protocol {
            offset: reader.offset(),
            state: "SubstringFilter",
            reason: "at least one of initial/any/final must be present",
        });
    }
    Ok(SubstringFilter {
        filter_type: LdapString(Cow::Borrowed(filter_type)),
        substrings,
    })
}

/// `MatchingRuleAssertion ::= SEQUENCE { matchingRule [1] OPTIONAL, type
/// [2] OPTIONAL, matchValue [3], dnAttributes [4] BOOLEAN DEFAULT FALSE }`.
fn decode_mra<'a>(reader: &mut Reader<'a>) -> DecodeResult<MatchingRuleAssertion<'a>> {
    let mut matching_rule = None;
    if expect_done(reader.peek_context_tag(), "truncated MRA")? == Some(1) {
        let s = expect_done(reader.read_context_utf8(1), "truncated matchingRule")?;
        matching_rule = Some(LdapString(Cow::Borrowed(s)));
    }
    let mut rule_type = None;
    if expect_done(reader.peek_context_tag(), "truncated MRA")? == Some(2) {
        let s = expect_done(reader.read_context_utf8(2), "truncated type")?;
        rule_type = Some(AttributeDescription(Cow::Borrowed(s)));
    }
    let match_value = expect_done(reader.read_context_octet_string(3), "truncated matchValue")?;
    let mut dn_attributes = false;
    if expect_done(reader.peek_context_tag(), "truncated MRA")? == Some(4) {
        let raw = expect_done(reader.read_context_octet_string(4), "truncated dnAttributes")?;
        dn_attributes = crate::ber::primitives::read_boolean(raw, reader.offset())?;
    }
    if !reader.is_empty() {
        return Err(DecodeError::Protocol {
            offset: reader.offset(),
            state: "MatchingRuleAssertion",
            reason: "unexpected trailing bytes",
        });
    }
    Ok(MatchingRuleAssertion {
        matching_rule,
        rule_type,
        assertion_value: AssertionValue(Cow::Borrowed(match_value)),
        dn_attributes,
    })
}
