//! Shared error types for specimen generation

use thiserror::Error;

/// Main error type for specimen operations
#[derive(Debug, Error)]
pub enum SpecimenError {
    /// Precondition violation when constructing a strategy or parsing input
    #[error("invalid argument: {argument}: {value}")]
    InvalidArgument {
        argument: &'static str,
        value: String,
    },

    /// Generic-argument accessors were called on a non-generic descriptor
    #[error("{type_name} is not a parameterized type")]
    NotGenericType { type_name: String },

    /// Component-type accessor was called on a non-array descriptor
    #[error("{type_name} is not an array")]
    NotAnArray { type_name: String },

    /// Enum-constant accessor was called on a non-enum descriptor
    #[error("{type_name} is not an enum")]
    NotAnEnum { type_name: String },

    /// An indexed generic accessor exceeded the available arguments
    #[error("index {index} out of range for {type_name} ({available} available)")]
    IndexOutOfRange {
        type_name: String,
        index: usize,
        available: usize,
    },

    /// A stand-in cannot be synthesized for this type; recoverable, the
    /// caller falls back to manufacturing
    #[error("cannot synthesize a stand-in for {type_name}: {reason}")]
    CannotSynthesize { type_name: String, reason: String },

    /// Manufacturing fallback exhausted; terminal failure for the type
    #[error("cannot manufacture {type_name}: {reason}")]
    CannotManufacture { type_name: String, reason: String },

    /// A type name was requested that has no registration
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// A stand-in was asked for a member its type does not declare
    #[error("{type_name} has no member named {member}")]
    UnknownMember { type_name: String, member: String },

    /// Wrapped errors from user-supplied construction closures
    #[error(transparent)]
    External(#[from] anyhow::Error),
}

impl SpecimenError {
    /// Create an invalid-argument error naming the offending argument
    pub fn invalid_argument(argument: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            value: value.into(),
        }
    }

    pub fn cannot_synthesize(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CannotSynthesize {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn cannot_manufacture(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CannotManufacture {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, SpecimenError>;
