//! # Connector Specification Framework
//!
//! Core abstractions for wharf's connector specifications and the
//! secret-aware configuration pipeline.
//!
//! A [`spec::ConnectorSpecification`] carries the JSON Schema describing a
//! connector's valid configuration documents, with schema annotations marking
//! which leaves are credentials. The pipeline built on top guarantees that
//! plaintext credentials are never observable on any outward path and never
//! lost on partial updates:
//!
//! - [`secrets::SecretsProcessor::mask_for_output`] replaces every secret
//!   leaf with a fixed placeholder before a document leaves the system.
//! - [`secrets::SecretsProcessor::reconcile_secrets`] restores
//!   placeholder-valued leaves from the previously stored document so callers
//!   never resubmit unchanged credentials.
//! - [`oauth::OAuthParamsMasker`] masks OAuth-sourced fields on the write
//!   path, independent of general output masking.
//!
//! ## Crate Organization
//!
//! - [`spec`] - Specification types and secret-field classification
//! - [`secrets`] - Masking and reconciliation engine
//! - [`oauth`] - OAuth-sourced field masking
//! - [`error`] - Error types

pub mod error;
pub mod oauth;
pub mod secrets;
pub mod spec;

/// Prelude module for convenient imports.
///
/// ```
/// use wharf_connector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{SecretsError, SecretsResult};
    pub use crate::oauth::OAuthParamsMasker;
    pub use crate::secrets::{SecretsProcessor, UnknownFieldPolicy, SECRET_PLACEHOLDER};
    pub use crate::spec::{
        ConnectorSpecification, FieldPath, PathSegment, SecretFields, OAUTH_ANNOTATION,
        SECRET_ANNOTATION,
    };
}
