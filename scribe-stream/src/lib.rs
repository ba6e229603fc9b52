//! Stream event protocol for scribe: type + payload + envelope.
//!
//! This crate defines the wire shape of a single stream event and envelope injection.
//! It does not depend on scribe. Scribe bridges `StreamEvent<S>` into `ProtocolEvent`
//! and calls `to_json`.
//!
//! The `state_delta` event is the predictive-state surface: while the model is still
//! composing the `write_document` arguments, the in-progress value of the `document`
//! argument is published under the state key `document` so a frontend can render the
//! document as it is being written.

pub mod envelope;
pub mod event;

pub use envelope::{to_json, Envelope, EnvelopeState};
pub use event::ProtocolEvent;
