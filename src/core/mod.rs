//! Core types shared by every resolver component
//!
//! - [`ResolverError`], [`ErrorContext`], [`user_friendly_error`]: typed errors
//!   and their CLI presentation
//! - [`ContentType`]: the functional category of an artifact file

pub mod error;
pub mod resource;

pub use error::{ErrorContext, ResolverError, user_friendly_error};
pub use resource::ContentType;
