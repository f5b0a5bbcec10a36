//! Domain error taxonomy.
//!
//! `ComposeError` enumerates the construction-time failure modes of topology
//! composition. All variants are fatal and non-retried: composition is
//! all-or-nothing. `ComposeResult<T>` is the crate-wide result alias.

use thiserror::Error;

/// The construction-time error taxonomy for topology composition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// Malformed or missing configuration input (e.g. blank identifier/tag,
    /// or no viable network-resolution strategy).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A lookup strategy matched zero networks.
    #[error("not found: {0}")]
    NotFound(String),

    /// A tag lookup matched more than one network.
    #[error("ambiguous match: tag '{tag}' matched {matches} networks")]
    AmbiguousMatch { tag: String, matches: usize },

    /// A data-model invariant was violated (duplicate listener-rule priority,
    /// or re-binding an already-bound routing target).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An opaque quota failure surfaced unchanged from an external collaborator.
    #[error("quota error: {0}")]
    Quota(String),

    /// An opaque platform failure surfaced unchanged from an external collaborator.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Crate-wide result alias for fallible composition operations.
pub type ComposeResult<T> = Result<T, ComposeError>;
