//! # Inkwell Core
//!
//! The domain layer of the Inkwell blog backend.
//! Entities, ports and the post publishing workflow, free of any
//! infrastructure dependency.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
