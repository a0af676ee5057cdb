//! # LDAP Codec Core
//!
//! A Lightweight Directory Access Protocol (LDAP) ([RFC4511]) BER wire
//! codec: a streaming decoder driven by a table-of-states grammar, a
//! reverse-order encoder, and an OID-keyed extensibility registry for
//! Controls, Extended operations, and Intermediate responses.
//!
//! It is written in pure Rust and makes extensive use of zero-copy
//! (`Cow`-borrowed strings and byte slices). A lot of care is taken to
//! ensure security and safety of this crate, including design (bounded
//! filter recursion, restricted-BER parsing, no panics on attacker input)
//! and fuzzing.
//!
//! [`container::Codec`] is the entry point: construct one with a
//! [`config::CodecConfig`] and a [`registry::CodecRegistry`], then call
//! [`container::Codec::decode_message`] / [`container::Codec::encode_message`].

#![deny(/*missing_docs,*/
        unstable_features,
        unused_import_braces, unused_qualifications)]
#![warn(
    missing_debug_implementations,
    /* missing_docs,
    rust_2018_idioms,*/
    unreachable_pub
)]
#![forbid(unsafe_code)]
#![deny(broken_intra_doc_links)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod ber;
pub mod binary_attrs;
pub mod config;
pub mod container;
pub mod controls;
pub mod encode;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod model;
pub mod oid;
pub mod registry;

pub use config::CodecConfig;
pub use container::{Codec, DecodeOutcome};
pub use error::{DecodeError, EncodeError};
