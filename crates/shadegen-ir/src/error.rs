//! Error types for the shadegen IR.

/// Errors that can occur when constructing a compilation unit.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    /// A structure, resource, or function with this name is already registered.
    #[error("duplicate name `{0}` in compilation unit")]
    DuplicateName(String),

    /// More than `u32::MAX` values were appended to one arena.
    #[error("arena overflow: more than u32::MAX items")]
    ArenaOverflow,
}
