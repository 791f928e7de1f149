//! Shader functions, parameters, and entry-point kinds.

use crate::arena::Named;
use crate::stmt::Block;
use crate::types::TypeReference;

/// A function parameter declaration.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ParameterDefinition {
    pub name: String,
    pub ty: TypeReference,
}

impl ParameterDefinition {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeReference>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// The pipeline role of a shader function.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub enum ShaderFunctionType {
    /// A helper callable from other shader functions.
    #[default]
    Normal,
    /// A vertex stage entry point.
    VertexEntryPoint,
    /// A fragment stage entry point.
    FragmentEntryPoint,
    /// A compute stage entry point.
    ComputeEntryPoint,
}

impl ShaderFunctionType {
    /// Returns `true` for the three pipeline entry kinds.
    pub fn is_entry_point(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

/// The signature of a shader function.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ShaderFunction {
    pub name: String,
    pub return_type: TypeReference,
    pub parameters: Vec<ParameterDefinition>,
    pub function_type: ShaderFunctionType,
    /// Workgroup dimensions `[x, y, z]`; only meaningful for compute entries.
    pub workgroup_size: [u32; 3],
}

impl ShaderFunction {
    /// Creates a parameterless function.
    pub fn new(
        name: impl Into<String>,
        return_type: impl Into<TypeReference>,
        function_type: ShaderFunctionType,
    ) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            parameters: Vec::new(),
            function_type,
            workgroup_size: [1, 1, 1],
        }
    }

    /// Returns this function with an extra trailing parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, ty: impl Into<TypeReference>) -> Self {
        self.parameters.push(ParameterDefinition::new(name, ty));
        self
    }
}

/// A function together with its parsed body.
#[derive(Clone, Debug)]
pub struct ShaderFunctionAndBody {
    pub function: ShaderFunction,
    pub body: Block,
}

impl ShaderFunctionAndBody {
    pub fn new(function: ShaderFunction, body: Block) -> Self {
        Self { function, body }
    }
}

impl Named for ShaderFunctionAndBody {
    fn name(&self) -> &str {
        &self.function.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known;

    #[test]
    fn function_new() {
        let f = ShaderFunction::new("VS", "Game.VertexOutput", ShaderFunctionType::VertexEntryPoint)
            .with_parameter("input", "Game.VertexInput");
        assert_eq!(f.parameters.len(), 1);
        assert_eq!(f.parameters[0].ty.name(), "Game.VertexInput");
        assert_eq!(f.workgroup_size, [1, 1, 1]);
        assert!(f.function_type.is_entry_point());
    }

    #[test]
    fn normal_is_not_entry() {
        let f = ShaderFunction::new("Helper", known::FLOAT, ShaderFunctionType::Normal);
        assert!(!f.function_type.is_entry_point());
        assert_eq!(ShaderFunctionType::default(), ShaderFunctionType::Normal);
    }
}
