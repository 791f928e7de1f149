//! Type references, structure fields, and structure definitions.

use crate::arena::Named;

/// A reference to a type by its canonical (fully qualified) name.
///
/// Immutable once created.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct TypeReference {
    name: String,
    is_array: bool,
}

impl TypeReference {
    /// Creates a reference to a non-array type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_array: false,
        }
    }

    /// Creates a reference to an array of `name`.
    pub fn array_of(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_array: true,
        }
    }

    /// The canonical name, e.g. `System.Numerics.Vector4`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this reference denotes an array of the named type.
    pub fn is_array(&self) -> bool {
        self.is_array
    }
}

impl From<&str> for TypeReference {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The fixed-function binding role of a structure field.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub enum SemanticType {
    /// An ordinary user value.
    #[default]
    None,
    /// Vertex position (clip space on vertex outputs).
    Position,
    /// Texture coordinate.
    TextureCoordinate,
    /// Vertex or fragment color.
    Color,
    /// Surface normal.
    Normal,
    /// Surface tangent.
    Tangent,
}

/// A field of a [`StructureDefinition`].
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: TypeReference,
    /// Fixed array length; `0` means the field is not an array.
    pub array_element_count: u32,
    pub semantic: SemanticType,
}

impl FieldDefinition {
    /// Creates a non-array field without a semantic tag.
    pub fn new(name: impl Into<String>, ty: impl Into<TypeReference>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            array_element_count: 0,
            semantic: SemanticType::None,
        }
    }

    /// Returns this field tagged with `semantic`.
    pub fn with_semantic(mut self, semantic: SemanticType) -> Self {
        self.semantic = semantic;
        self
    }

    /// Returns this field as a fixed-size array of `count` elements.
    pub fn with_array_count(mut self, count: u32) -> Self {
        self.array_element_count = count;
        self
    }

    /// Whether this field is a fixed-size array.
    pub fn is_fixed_array(&self) -> bool {
        self.array_element_count > 0
    }
}

/// A structure type. Field order is significant: it fixes both the memory
/// layout and the in/out variable slots of entry points.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct StructureDefinition {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

impl StructureDefinition {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Iterates over the fields tagged [`SemanticType::Position`], in declaration order.
    pub fn position_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields
            .iter()
            .filter(|f| f.semantic == SemanticType::Position)
    }
}

impl Named for StructureDefinition {
    fn name(&self) -> &str {
        &self.name
    }
}
