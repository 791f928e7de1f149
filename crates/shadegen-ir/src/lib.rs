//! Shadegen intermediate representation.
//!
//! A tree-shaped IR for shader programs written in a host language:
//! structures, resources, and functions with statement/expression bodies.
//! Every node carries the canonical host name of its types; backends map
//! those names to target-language spellings.

pub mod arena;
mod display;
mod error;
mod expr;
mod func;
pub mod known;
mod resource;
mod stmt;
mod structures;
mod symbols;
mod types;
mod unit;
mod validation;

pub use arena::{Handle, Named, NamedArena};
pub use display::dump_unit;
pub use error::IrError;
pub use expr::{BinaryOp, Expression, Literal, UnaryOp};
pub use func::{ParameterDefinition, ShaderFunction, ShaderFunctionAndBody, ShaderFunctionType};
pub use resource::{ResourceDefinition, ShaderResourceKind};
pub use stmt::{AssignOp, Block, SourceLocation, Statement, StatementKind, SwitchCase};
pub use structures::StructureSet;
pub use symbols::{Declaration, NoSymbols, SymbolSource, SymbolTable};
pub use types::{FieldDefinition, SemanticType, StructureDefinition, TypeReference};
pub use unit::CompilationUnit;
pub use validation::{ValidationIssue, validate_unit};
