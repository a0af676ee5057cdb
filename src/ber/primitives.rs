//! Primitive BER value codecs: INTEGER, BOOLEAN, ENUMERATED, OCTET STRING.

use super::{ReadOutcome, ReadResult};
use crate::error::DecodeError;

/// Reads a BER INTEGER content (already tag/length-stripped) as an
/// `i64`, enforcing minimal two's-complement encoding when `strict`.
pub fn read_integer(content: &[u8], offset: usize, strict: bool) -> Result<i64, DecodeError> {
    if content.is_empty() {
        return Err(DecodeError::MalformedBer {
            offset,
            reason: "empty INTEGER content",
        });
    }
    if content.len() > 8 {
        return Err(DecodeError::MalformedBer {
            offset,
            reason: "INTEGER wider than 64 bits",
        });
    }
    if strict && content.len() > 1 {
        let b0 = content[0];
        let b1 = content[1];
        let non_minimal = (b0 == 0x00 && b1 & 0x80 == 0) || (b0 == 0xFF && b1 & 0x80 != 0);
        if non_minimal {
            return Err(DecodeError::MalformedBer {
                offset,
                reason: "non-minimal INTEGER encoding",
            });
        }
    }
    let negative = content[0] & 0x80 != 0;
    let mut value: i64 = if negative { -1 } else { 0 };
    for &b in content {
        value = (value << 8) | b as i64;
    }
    Ok(value)
}

/// Reads a BER INTEGER and range-checks it against `[min, max]`.
pub fn read_integer_range(
    content: &[u8],
    offset: usize,
    strict: bool,
    min: i64,
    max: i64,
) -> Result<i64, DecodeError> {
    let v = read_integer(content, offset, strict)?;
    if v < min || v > max {
        return Err(DecodeError::MalformedBer {
            offset,
            reason: "INTEGER value out of declared range",
        });
    }
    Ok(v)
}

/// Reads a BER BOOLEAN: any non-zero octet is true, per spec §4.1.
pub fn read_boolean(content: &[u8], offset: usize) -> Result<bool, DecodeError> {
    match content {
        [b] => Ok(*b != 0),
        _ => Err(DecodeError::MalformedBer {
            offset,
            reason: "BOOLEAN content must be exactly one octet",
        }),
    }
}

/// Reads a BER ENUMERATED content as a range-checked `i32`.
pub fn read_enumerated(
    content: &[u8],
    offset: usize,
    strict: bool,
    min: i32,
    max: i32,
) -> Result<i32, DecodeError> {
    let v = read_integer_range(content, offset, strict, min as i64, max as i64)?;
    Ok(v as i32)
}

/// An OCTET STRING's content is returned as-is: the caller decides
/// whether to interpret it as UTF-8, binary, or a nested structure.
pub fn read_octet_string(content: &[u8]) -> &[u8] {
    content
}

/// Minimal two's-complement big-endian bytes for `n`, matching the
/// boundary properties in spec §8 (`encode_integer(0) == [0x00]`, etc.).
pub fn minimal_integer_bytes(n: i64) -> Vec<u8> {
    let mut bytes = n.to_be_bytes().to_vec();
    while bytes.len() > 1 {
        let b0 = bytes[0];
        let b1 = bytes[1];
        let redundant = (b0 == 0x00 && b1 & 0x80 == 0) || (b0 == 0xFF && b1 & 0x80 != 0);
        if redundant {
            bytes.remove(0);
        } else {
            break;
        }
    }
    bytes
}

/// Reads the TLV header (tag + length) at the start of `input`, without
/// consuming content. Used by the grammar engine to peek the next
/// transition key before dispatching.
pub fn read_header(
    input: &[u8],
    offset: usize,
    strict_minimal: bool,
) -> ReadResult<super::tag::Header> {
    use super::length::read_length;
    use super::tag::read_tag;

    let (class, constructed, tag, tag_len) = match read_tag(input, offset)? {
        ReadOutcome::Done(v, n) => (v.0, v.1, v.2, n),
        ReadOutcome::Incomplete => return Ok(ReadOutcome::Incomplete),
    };
    let (length, len_len) = match read_length(&input[tag_len..], offset + tag_len, strict_minimal)?
    {
        ReadOutcome::Done(v, n) => (v, n),
        ReadOutcome::Incomplete => return Ok(ReadOutcome::Incomplete),
    };
    let header = super::tag::Header {
        class,
        constructed,
        tag,
        length,
    };
    Ok(ReadOutcome::Done(header, tag_len + len_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_boundaries_match_spec() {
        assert_eq!(minimal_integer_bytes(0), vec![0x00]);
        assert_eq!(minimal_integer_bytes(127), vec![0x7F]);
        assert_eq!(minimal_integer_bytes(128), vec![0x00, 0x80]);
        assert_eq!(minimal_integer_bytes(-1), vec![0xFF]);
    }

    #[test]
    fn boolean_any_nonzero_is_true() {
        assert!(read_boolean(&[0x01], 0).unwrap());
        assert!(read_boolean(&[0xFF], 0).unwrap());
        assert!(!read_boolean(&[0x00], 0).unwrap());
    }

    #[test]
    fn non_minimal_integer_rejected_when_strict() {
        let err = read_integer(&[0x00, 0x01], 0, true).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedBer { .. }));
        // same bytes are fine when not strict
        assert_eq!(read_integer(&[0x00, 0x01], 0, false).unwrap(), 1);
    }
}
