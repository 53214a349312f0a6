//! Error types for rule construction and the service layer.

use itertools::Itertools;

use crate::functional::validation_rules::RuleKind;

/// Errors raised while building or evaluating rules.
///
/// A failing rule is not an error: it is reported as an invalid
/// [`RuleOutcome`](crate::functional::validation_rules::RuleOutcome). These
/// variants describe misconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid regular expression '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Rule {kind} cannot validate {value_type} value '{value}'")]
    TypeMismatch {
        kind: RuleKind,
        value_type: &'static str,
        value: String,
    },

    #[error("Subject '{subject}' references unknown related subject '{related}'")]
    UnknownRelatedSubject { subject: String, related: String },
}

/// Errors raised by domain and application services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Entity of type {entity} is not valid: {}", .messages.iter().join("; "))]
    InvalidEntity {
        entity: &'static str,
        messages: Vec<String>,
    },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Failed to adapt {from} into {to}: {message}")]
    Adapter {
        from: &'static str,
        to: &'static str,
        message: String,
    },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Invalid entity error carrying the entity's type name.
    pub fn invalid_entity<E: ?Sized>(messages: Vec<String>) -> Self {
        ServiceError::InvalidEntity {
            entity: std::any::type_name::<E>(),
            messages,
        }
    }

    pub fn not_found<E: ?Sized>(id: i64) -> Self {
        ServiceError::NotFound {
            entity: std::any::type_name::<E>(),
            id,
        }
    }

    /// Adapter failure converting `S` into `D`.
    pub fn adapter<S: ?Sized, D: ?Sized>(message: impl Into<String>) -> Self {
        ServiceError::Adapter {
            from: std::any::type_name::<S>(),
            to: std::any::type_name::<D>(),
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        ServiceError::Persistence(message.into())
    }

    pub fn is_invalid_entity(&self) -> bool {
        matches!(self, ServiceError::InvalidEntity { .. })
    }
}
