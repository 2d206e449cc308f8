//! # Inkwell Shared
//!
//! Wire types shared by the server and its clients: submitted forms and
//! response envelopes.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
