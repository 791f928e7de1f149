//! Error types for code generation.

use shadegen_ir::{ShaderResourceKind, SourceLocation};

/// Why a structure could not be pulled from the front-end's symbol space.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryFailure {
    /// No declaration with this name exists.
    #[error("no declaration found")]
    NotFound,
    /// More than one declaration claims this name.
    #[error("{0} declarations found, expected exactly one")]
    Ambiguous(usize),
    /// The single declaration is not a structure.
    #[error("declared as {0}, not a struct")]
    NotAStructure(&'static str),
}

/// Errors that abort one generation request.
///
/// None of these are transient; generating the same request against the
/// same IR fails the same way. A failed request leaves the compilation unit
/// unchanged apart from structures it had already discovered successfully.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// A type has no backend mapping and is not a discoverable structure.
    #[error("no mapping for type `{name}`")]
    UnknownType {
        /// Canonical type name.
        name: String,
    },

    /// A construct has no lowering on the active backend.
    #[error("unsupported construct at {location}: {kind}")]
    UnsupportedConstruct {
        /// What was found.
        kind: String,
        /// Innermost statement containing it.
        location: SourceLocation,
    },

    /// The requested entry function is not in the compilation unit.
    #[error("couldn't find entry function `{name}`")]
    EntryPointNotFound {
        /// Requested entry name.
        name: String,
    },

    /// A resource carries a kind the backend does not recognize.
    #[error("illegal resource kind {kind} on `{resource}`")]
    IllegalResourceKind {
        /// Resource name.
        resource: String,
        /// The offending kind.
        kind: ShaderResourceKind,
    },

    /// A fragment entry does not return a 4-component float vector.
    #[error("fragment entry `{function}` must return a 4-component vector, found `{found}`")]
    InvalidReturnType {
        /// Entry function name.
        function: String,
        /// Canonical name of the declared return type.
        found: String,
    },

    /// A vertex entry's output structure has no position field.
    #[error("vertex entry `{function}` returns `{structure}`, which has no position field")]
    MissingPositionSemantic {
        /// Entry function name.
        function: String,
        /// Canonical name of the output structure.
        structure: String,
    },

    /// Structure discovery could not resolve a type the entry point requires.
    #[error("type `{name}` could not be resolved: {reason}")]
    UnresolvedType {
        /// Canonical type name.
        name: String,
        /// Why discovery failed.
        reason: DiscoveryFailure,
    },

    /// An entry function's parameters or attributes do not fit its stage.
    #[error("invalid signature for entry `{function}`: {reason}")]
    InvalidEntrySignature {
        /// Entry function name.
        function: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl GenerationError {
    pub(crate) fn unsupported(kind: impl Into<String>, location: SourceLocation) -> Self {
        Self::UnsupportedConstruct {
            kind: kind.into(),
            location,
        }
    }

    pub(crate) fn entry_signature(function: &str, reason: impl Into<String>) -> Self {
        Self::InvalidEntrySignature {
            function: function.to_owned(),
            reason: reason.into(),
        }
    }
}
