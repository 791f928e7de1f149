//! The compilation unit: everything reachable from the requested entry points.

use std::sync::Arc;

use crate::arena::{Handle, NamedArena};
use crate::error::IrError;
use crate::func::ShaderFunctionAndBody;
use crate::resource::ResourceDefinition;
use crate::structures::StructureSet;
use crate::types::StructureDefinition;

/// The IR of one compilation run.
///
/// Resources and functions are fixed once the front-end hands the unit over;
/// structures may still be appended by discovery, through [`StructureSet`].
/// Nothing is ever removed or mutated after insertion.
#[derive(Debug, Default)]
pub struct CompilationUnit {
    pub structures: StructureSet,
    pub resources: NamedArena<ResourceDefinition>,
    pub functions: NamedArena<ShaderFunctionAndBody>,
}

impl CompilationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a structure.
    pub fn add_structure(&self, structure: StructureDefinition) -> Result<Arc<StructureDefinition>, IrError> {
        self.structures.insert(structure)
    }

    /// Registers a resource. Use [`next_binding`](Self::next_binding) for
    /// resources without an explicit slot.
    pub fn add_resource(&mut self, resource: ResourceDefinition) -> Result<Handle<ResourceDefinition>, IrError> {
        self.resources.insert(resource)
    }

    /// Registers a function with its body.
    pub fn add_function(
        &mut self,
        function: ShaderFunctionAndBody,
    ) -> Result<Handle<ShaderFunctionAndBody>, IrError> {
        self.functions.insert(function)
    }

    /// The binding slot the next resource gets in discovery order.
    pub fn next_binding(&self) -> u32 {
        self.resources.len() as u32
    }

    pub fn function(&self, name: &str) -> Option<&ShaderFunctionAndBody> {
        self.functions.get(name)
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceDefinition> {
        self.resources.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::{ShaderFunction, ShaderFunctionType};
    use crate::known;
    use crate::resource::ShaderResourceKind;

    #[test]
    fn discovery_order_bindings() {
        let mut unit = CompilationUnit::new();
        let slot = unit.next_binding();
        unit.add_resource(ResourceDefinition::uniform("View", known::MATRIX4X4, slot))
            .unwrap();
        let slot = unit.next_binding();
        unit.add_resource(ResourceDefinition::new("Tex", ShaderResourceKind::Texture2D, slot))
            .unwrap();
        assert_eq!(unit.resource("View").unwrap().binding, 0);
        assert_eq!(unit.resource("Tex").unwrap().binding, 1);
    }

    #[test]
    fn duplicate_function_rejected() {
        let mut unit = CompilationUnit::new();
        let f = ShaderFunction::new("Helper", known::FLOAT, ShaderFunctionType::Normal);
        unit.add_function(ShaderFunctionAndBody::new(f.clone(), vec![]))
            .unwrap();
        assert!(unit.add_function(ShaderFunctionAndBody::new(f, vec![])).is_err());
        assert_eq!(unit.functions.len(), 1);
        assert!(unit.function("Helper").is_some());
    }
}
