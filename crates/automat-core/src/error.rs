//! Typed failures for descriptor resolution and activation.
//!
//! Every resolution-level variant carries the offending context name, the
//! rendered descriptor, and the operation that was being performed, so a
//! failure deep in an ancestor chain is attributable from the message alone.

use crate::descriptor::{Descriptor, Namespace};

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Resolution exhausted its timeout without finding an unambiguous
    /// matching handle.
    #[error("element not found: op={op}, context={context}, desc={descriptor}")]
    ElementNotFound {
        context: String,
        descriptor: String,
        op: &'static str,
    },

    /// A resolved handle's type is incompatible with the requested action.
    #[error("invalid operation: op={op}, context={context}, desc={descriptor}")]
    InvalidOperation {
        context: String,
        descriptor: String,
        op: &'static str,
    },

    /// The backend accepted the target but the native action failed.
    #[error("operation failed: op={op}, context={context}, desc={descriptor}: {reason}")]
    OperationFailure {
        context: String,
        descriptor: String,
        op: &'static str,
        reason: String,
    },

    /// A container in the ancestor chain could not be brought into an
    /// active state.
    #[error("activation failed: context={context}, desc={descriptor}: {reason}")]
    ActivationFailure {
        context: String,
        descriptor: String,
        reason: String,
    },

    /// The selected context does not implement the requested capability.
    #[error("operation {op} is not supported by context {context}")]
    UnsupportedOperation {
        context: String,
        op: &'static str,
    },

    /// No registered context claims the descriptor's namespace.
    #[error("no context registered for namespace {namespace} (op={op})")]
    NoContextFound {
        namespace: Namespace,
        op: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn element_not_found(context: &str, descriptor: &Descriptor, op: &'static str) -> Self {
        Error::ElementNotFound {
            context: context.to_string(),
            descriptor: descriptor.to_string(),
            op,
        }
    }

    pub fn invalid_operation(context: &str, descriptor: &Descriptor, op: &'static str) -> Self {
        Error::InvalidOperation {
            context: context.to_string(),
            descriptor: descriptor.to_string(),
            op,
        }
    }

    pub fn operation_failure(
        context: &str,
        descriptor: &Descriptor,
        op: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Error::OperationFailure {
            context: context.to_string(),
            descriptor: descriptor.to_string(),
            op,
            reason: reason.into(),
        }
    }

    pub fn activation_failure(
        context: &str,
        descriptor: &Descriptor,
        reason: impl Into<String>,
    ) -> Self {
        Error::ActivationFailure {
            context: context.to_string(),
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(context: &str, op: &'static str) -> Self {
        Error::UnsupportedOperation {
            context: context.to_string(),
            op,
        }
    }
}
