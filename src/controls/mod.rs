//! Built-in OID factories for the extensibility registry (spec §4.6).
//!
//! Unregistered OIDs never reach these modules at all: a `Control`,
//! `ExtendedRequest`/`ExtendedResponse`, or `IntermediateResponse` with no
//! matching factory simply keeps its raw octets in the model type — that
//! *is* the "Opaque" fallback (see [`opaque`]), since the model's
//! `control_value` / `request_value` / `response_value` fields are always
//! populated with the untouched bytes regardless of whether a factory
//! decoded them further.

pub mod entry_change_notification;
pub mod manage_dsa_it;
pub mod opaque;
pub mod paged_results;
pub mod start_tls;
