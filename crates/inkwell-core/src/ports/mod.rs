//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
pub mod forms;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use forms::{FieldErrors, FormValidator, NON_FIELD_ERRORS};
pub use repository::{
    BaseRepository, PostRepository, PublishingTx, TagRepository, UnitOfWork, UserRepository,
};
