//! Concrete grammar tables instantiating [`crate::engine`] for the LDAP
//! message grammar (spec §4.3) and the filter sub-grammar (spec §4.4).
//!
//! `message` dispatches on the outer `protocolOp` APPLICATION tag and
//! implements each operation's field sequence directly against a
//! [`crate::engine::Reader`]; `filter` implements the recursive filter
//! CHOICE, enforcing `max_filter_depth` before each descent.

pub mod filter;
pub mod message;
