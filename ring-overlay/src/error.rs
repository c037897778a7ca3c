//! Error types for the ring overlay.

use thiserror::Error;

use crate::config::ConfigField;
use crate::scene::SceneError;

/// Errors surfaced by configuration edits and overlay rebuilds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    /// A field value violates its bound. The previous value stays in effect.
    #[error("{field} rejected: {reason}")]
    ValidationRejected {
        /// Field the edit targeted.
        field: ConfigField,
        /// Why the value was refused.
        reason: String,
    },

    /// Resolution above the per-ring vertex budget.
    #[error("resolution {resolution} exceeds the maximum of {max} points per ring")]
    ResolutionExceeded {
        /// Requested resolution.
        resolution: u32,
        /// Largest accepted resolution.
        max: u32,
    },

    /// Spacing and max radius together ask for more vertices than one
    /// overlay may hold.
    #[error("{rings} rings need {vertices} vertices, more than the budget of {max}")]
    VertexBudgetExceeded {
        rings: u32,
        /// `rings × (resolution + 1)`.
        vertices: u64,
        max: u64,
    },

    /// The scene graph could not create an object.
    #[error("scene graph error: {0}")]
    Scene(#[from] SceneError),
}

impl OverlayError {
    /// Creates a validation rejection for `field`.
    #[must_use]
    pub fn rejected(field: ConfigField, reason: impl Into<String>) -> Self {
        Self::ValidationRejected {
            field,
            reason: reason.into(),
        }
    }

    /// Creates a resolution overflow error.
    #[must_use]
    pub const fn resolution_exceeded(resolution: u32, max: u32) -> Self {
        Self::ResolutionExceeded { resolution, max }
    }
}

/// Result type for overlay operations.
pub type Result<T> = std::result::Result<T, OverlayError>;
