use crate::{foundation::core::HandleId, resolve::kind::Kind};

/// Convenience result type used across fuwrap.
pub type FuResult<T> = Result<T, FuError>;

/// Top-level error taxonomy used by resolver and wrapper APIs.
#[derive(thiserror::Error, Debug)]
pub enum FuError {
    /// No candidate was given and the requested kind has no default slot.
    #[error("missing reference: cannot build a {requested} without a handle")]
    MissingReference {
        /// Kind the caller asked for.
        requested: Kind,
    },

    /// The default slot for the requested kind was consulted but held nothing.
    #[error("no default reference available for {requested}")]
    NoDefaultAvailable {
        /// Kind the caller asked for.
        requested: Kind,
    },

    /// A raw handle was given but neither its attributes nor its label identify a kind.
    #[error("unresolvable reference: handle {handle} ('{label}') matches no known kind")]
    UnresolvableReference {
        /// Handle that failed inference.
        handle: HandleId,
        /// Debug label reported by the host for the handle.
        label: String,
    },

    /// The handle resolved to a kind that is not compatible with the requested one.
    #[error("type mismatch: requested {requested} but reference resolved to {resolved}")]
    TypeMismatch {
        /// Kind the caller asked for.
        requested: Kind,
        /// Kind the handle actually resolved to.
        resolved: Kind,
    },

    /// The candidate is neither a wrapper, a remote handle, nor absent.
    #[error("invalid handle type: expected a remote handle, got {found}")]
    InvalidHandleType {
        /// Short description of what was passed instead.
        found: String,
    },

    /// A call into the remote host failed.
    #[error("remote error: {0}")]
    Remote(String),

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FuError {
    /// Build a [`FuError::MissingReference`] value.
    pub fn missing_reference(requested: Kind) -> Self {
        Self::MissingReference { requested }
    }

    /// Build a [`FuError::NoDefaultAvailable`] value.
    pub fn no_default(requested: Kind) -> Self {
        Self::NoDefaultAvailable { requested }
    }

    /// Build a [`FuError::UnresolvableReference`] value.
    pub fn unresolvable(handle: HandleId, label: impl Into<String>) -> Self {
        Self::UnresolvableReference {
            handle,
            label: label.into(),
        }
    }

    /// Build a [`FuError::TypeMismatch`] value.
    pub fn type_mismatch(requested: Kind, resolved: Kind) -> Self {
        Self::TypeMismatch {
            requested,
            resolved,
        }
    }

    /// Build a [`FuError::InvalidHandleType`] value.
    pub fn invalid_handle(found: impl Into<String>) -> Self {
        Self::InvalidHandleType {
            found: found.into(),
        }
    }

    /// Build a [`FuError::Remote`] value.
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Build a [`FuError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FuError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
