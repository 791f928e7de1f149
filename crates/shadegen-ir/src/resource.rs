//! Shader resources: uniform blocks, textures, samplers, and buffers.

use crate::arena::Named;
use crate::types::TypeReference;

/// The kind of a shader resource.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ShaderResourceKind {
    /// A uniform (constant) block holding one value of `value_type`.
    Uniform,
    /// A 2D texture.
    Texture2D,
    /// A cube texture.
    TextureCube,
    /// A texture sampler.
    Sampler,
    /// A read-only buffer of `value_type` elements.
    StructuredBuffer,
    /// A read-write buffer of `value_type` elements.
    RWStructuredBuffer,
    /// A kind value the front-end produced that this IR has no name for.
    Other(u32),
}

/// A module-scope resource binding.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ResourceDefinition {
    pub name: String,
    pub kind: ShaderResourceKind,
    /// Binding slot, either declared in source or assigned in discovery order.
    pub binding: u32,
    /// Block type for uniforms, element type for structured buffers.
    pub value_type: Option<TypeReference>,
}

impl ResourceDefinition {
    pub fn new(name: impl Into<String>, kind: ShaderResourceKind, binding: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            binding,
            value_type: None,
        }
    }

    /// A uniform block of type `ty` at `binding`.
    pub fn uniform(name: impl Into<String>, ty: impl Into<TypeReference>, binding: u32) -> Self {
        Self {
            value_type: Some(ty.into()),
            ..Self::new(name, ShaderResourceKind::Uniform, binding)
        }
    }

    /// Returns this resource with `ty` as its value type.
    pub fn with_value_type(mut self, ty: impl Into<TypeReference>) -> Self {
        self.value_type = Some(ty.into());
        self
    }
}

impl Named for ResourceDefinition {
    fn name(&self) -> &str {
        &self.name
    }
}
