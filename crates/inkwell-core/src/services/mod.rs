//! Application services built on the ports.

pub mod publishing;
pub mod tags;

pub use publishing::PostPublisher;
pub use tags::{MalformedPayloadError, Reconciliation, parse_payload, reconcile};

#[cfg(test)]
mod fake;
