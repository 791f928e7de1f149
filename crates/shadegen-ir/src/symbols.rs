//! The front-end's symbol space, as seen by structure discovery.

use std::collections::HashMap;

use crate::types::StructureDefinition;

/// A type declaration found in the front-end's symbol space.
#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    /// A value type the front-end could lower to a structure.
    Structure(StructureDefinition),
    /// A reference type.
    Class { name: String },
    /// An enumeration.
    Enum { name: String },
    /// An interface.
    Interface { name: String },
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Self::Structure(sd) => &sd.name,
            Self::Class { name } | Self::Enum { name } | Self::Interface { name } => name,
        }
    }

    /// A short description of the declaration kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Structure(_) => "struct",
            Self::Class { .. } => "class",
            Self::Enum { .. } => "enum",
            Self::Interface { .. } => "interface",
        }
    }
}

/// Symbol resolution callback supplied by the front-end.
pub trait SymbolSource: Send + Sync {
    /// Returns every declaration of the type with this canonical name.
    fn declarations(&self, type_name: &str) -> Vec<Declaration>;
}

/// A symbol source with no symbols; discovery through it always fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSymbols;

impl SymbolSource for NoSymbols {
    fn declarations(&self, _type_name: &str) -> Vec<Declaration> {
        Vec::new()
    }
}

/// An in-memory symbol space.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    declarations: HashMap<String, Vec<Declaration>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration under its own name. Repeated names accumulate.
    pub fn declare(&mut self, declaration: Declaration) {
        self.declarations
            .entry(declaration.name().to_owned())
            .or_default()
            .push(declaration);
    }

    /// Shorthand for declaring a structure.
    pub fn declare_structure(&mut self, structure: StructureDefinition) {
        self.declare(Declaration::Structure(structure));
    }
}

impl SymbolSource for SymbolTable {
    fn declarations(&self, type_name: &str) -> Vec<Declaration> {
        self.declarations.get(type_name).cloned().unwrap_or_default()
    }
}
