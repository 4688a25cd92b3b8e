//! Shared error types for the services crate.

use thiserror::Error;

use workshop_core::model::TechniqueId;

/// Errors emitted by `WorkshopSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WorkshopError {
    #[error("unknown technique: {0}")]
    UnknownTechnique(TechniqueId),
}
