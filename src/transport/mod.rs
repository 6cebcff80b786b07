//! Transport module - single-shot UDP exchanges.
//!
//! One request, one correlated reply, one ephemeral socket per call.

mod udp;

pub use udp::exchange;
