//! Codec-wide configuration knobs (spec §6).

/// Plain, `Copy`-able decoder configuration. Small and flat enough that no
/// builder crate is warranted — the teacher carries no config/builder
/// dependency either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Reject PDUs whose outer SEQUENCE length exceeds this.
    pub max_pdu_size: u32,
    /// Reject filters nested deeper than this.
    pub max_filter_depth: u16,
    /// When true (the default), enforce minimal integer/length encoding
    /// on decode, per RFC 4511's restricted BER profile.
    pub strict_minimal_ber: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            max_pdu_size: 4 * 1024 * 1024,
            max_filter_depth: 100,
            strict_minimal_ber: true,
        }
    }
}
