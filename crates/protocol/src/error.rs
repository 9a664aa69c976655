//! Error types for the questa-protocol crate.
//!
//! These errors describe why an entity rejected an input or a mutation.
//! They fall in two families: validation errors (the input itself is bad)
//! and state errors (the input is fine but the task's current status forbids
//! it). [`ProtocolError::is_state_error`] tells them apart.

use thiserror::Error;

use crate::vocabulary::TaskStatus;

/// Errors raised by task and player entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A field value failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A raw value did not name any known variant.
    #[error("unknown {kind} `{value}`")]
    UnknownValue {
        /// Which vocabulary was being parsed.
        kind: &'static str,
        /// The text that was supplied.
        value: String,
    },

    /// An update named a field that is not editable.
    #[error("field `{field}` cannot be changed")]
    ImmutableField {
        /// The offending field.
        field: String,
    },

    /// An update named a field that does not exist.
    #[error("unknown field `{field}`")]
    UnknownField {
        /// The offending field.
        field: String,
    },

    /// A status change that the transition table does not list.
    #[error("illegal status transition from {from} to {to}")]
    IllegalTransition {
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// A field that is frozen because the task is completed.
    #[error("`{field}` is frozen on a completed task")]
    FrozenField {
        /// The offending field.
        field: &'static str,
    },

    /// The task has already been completed.
    #[error("task is already completed")]
    AlreadyCompleted,
}

impl ProtocolError {
    /// Returns `true` if the error comes from the task's state rather than
    /// from a malformed input.
    #[must_use]
    pub const fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::IllegalTransition { .. } | Self::FrozenField { .. } | Self::AlreadyCompleted
        )
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
