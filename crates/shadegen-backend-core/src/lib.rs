#![warn(missing_docs)]
//! Backend contract and shared code generation for shadegen.
//!
//! Defines the [`Backend`] trait that every target shading language
//! implements, along with supporting types ([`BackendOptions`],
//! [`GeneratedShader`], [`GenerationError`]) and a [`BackendRegistry`] for
//! target dispatch. Everything that is not target syntax lives here once:
//! structure discovery, the lowering visitor, entry-point synthesis, and the
//! [`generate_full_text`] driver.

use std::fmt::{self, Debug};

use shadegen_ir::{ResourceDefinition, ShaderFunctionType};

mod discovery;
mod entry_point;
mod error;
mod generator;
mod lowering;
pub mod tables;
mod walk;

#[cfg(test)]
mod testing;

pub use discovery::discover_structure;
pub use entry_point::{Direction, EntryPointLayout, InOutVariable};
pub use error::{DiscoveryFailure, GenerationError};
pub use generator::generate_full_text;
pub use tables::{IdentifierTable, Intrinsic, IntrinsicArgument, IntrinsicTable, SwizzleTable, TypeTable};

/// A programmable pipeline stage.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ShaderStage {
    /// Per-vertex stage.
    Vertex,
    /// Per-fragment stage.
    Fragment,
    /// Compute dispatch.
    Compute,
}

impl ShaderStage {
    /// The stage an entry function runs in, or `None` for helpers.
    pub fn of(function_type: ShaderFunctionType) -> Option<Self> {
        match function_type {
            ShaderFunctionType::Normal => None,
            ShaderFunctionType::VertexEntryPoint => Some(Self::Vertex),
            ShaderFunctionType::FragmentEntryPoint => Some(Self::Fragment),
            ShaderFunctionType::ComputeEntryPoint => Some(Self::Compute),
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Compute => "compute",
        })
    }
}

/// Default floating-point precision for targets that declare one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FloatPrecision {
    /// Lowest precision the target offers.
    Low,
    /// Medium precision.
    Medium,
    /// Full precision.
    #[default]
    High,
}

impl fmt::Display for FloatPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

/// Options passed to a backend for every generation request.
#[derive(Clone, Debug)]
pub struct BackendOptions {
    /// Spaces per nesting level in emitted code.
    pub indent: usize,
    /// Default precision qualifiers; only GLSL ES headers use this.
    pub float_precision: FloatPrecision,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            float_precision: FloatPrecision::default(),
        }
    }
}

impl BackendOptions {
    /// Leading whitespace for `level` levels of nesting.
    pub fn pad(&self, level: usize) -> String {
        " ".repeat(self.indent * level)
    }
}

impl fmt::Display for BackendOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BackendOptions {{ indent: {}, float_precision: {} }}",
            self.indent, self.float_precision
        )
    }
}

/// The result of a successful generation request.
#[derive(Clone, Debug)]
pub struct GeneratedShader {
    /// The complete shader source.
    pub text: String,
    /// Non-fatal diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for GeneratedShader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} line(s), {} diagnostic(s)",
            self.text.lines().count(),
            self.diagnostics.len()
        )
    }
}

/// A non-fatal diagnostic message from code generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level.
    pub level: DiagnosticLevel,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Severity level for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// Suspicious input that still produced a shader.
    Warning,
    /// An informational note.
    Info,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "Warning",
            Self::Info => "Info",
        })
    }
}

/// A structure field ready for emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDeclaration {
    /// Target type token.
    pub ty: String,
    /// Reserved-word-corrected field name.
    pub name: String,
    /// Fixed array length, `0` for scalars.
    pub array_count: u32,
}

/// A structure ready for emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureDeclaration {
    /// Target type name.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDeclaration>,
}

/// A resource ready for emission.
#[derive(Clone, Debug)]
pub struct ResourceDeclaration<'a> {
    /// The IR resource.
    pub resource: &'a ResourceDefinition,
    /// Reserved-word-corrected resource name.
    pub name: String,
    /// Target type token of the block or element type, if the kind has one.
    pub value_type: Option<String>,
}

impl ResourceDeclaration<'_> {
    /// The value type, or an error naming the resource when it has none.
    pub fn require_value_type(&self) -> Result<&str, GenerationError> {
        self.value_type
            .as_deref()
            .ok_or_else(|| GenerationError::UnknownType {
                name: format!("<value type of `{}`>", self.resource.name),
            })
    }
}

/// A target shading language.
///
/// Implementors supply lookup tables and the syntax hooks below; the shared
/// driver ([`generate_full_text`]) owns traversal order, discovery, and
/// entry-point layout.
pub trait Backend: Debug + Send + Sync {
    /// Human-readable name (e.g. "GLSL ES 3.00").
    fn name(&self) -> &str;

    /// Target identifiers this backend handles.
    fn targets(&self) -> &[&str];

    /// Primitive type spellings.
    fn type_table(&self) -> &TypeTable;

    /// Member spellings and reserved words.
    fn identifier_table(&self) -> &IdentifierTable;

    /// Host library calls this backend can lower.
    fn intrinsics(&self) -> &IntrinsicTable;

    /// Whether this target can express entry points of `stage`.
    fn supports_stage(&self, stage: ShaderStage) -> bool;

    /// Maps a canonical primitive type name; structures are not mapped here.
    fn map_type_core(&self, canonical: &str) -> Option<String> {
        self.type_table().get(canonical).map(str::to_owned)
    }

    /// Maps a member of a known (non-structure) type.
    fn map_identifier_core(&self, declaring_type: &str, member: &str) -> Option<String> {
        self.identifier_table().member(declaring_type, member)
    }

    /// Renames identifiers that collide with the target's reserved words.
    fn correct_identifier(&self, identifier: &str) -> String {
        self.identifier_table().correct(identifier)
    }

    /// The target name of a user structure.
    fn structure_type_name(&self, canonical: &str) -> String {
        self.correct_identifier(&canonical.replace('.', "_"))
    }

    /// The zero value of `ty`, or `None` to have structures built field by field.
    fn zero_value(&self, ty: &str, is_structure: bool) -> Option<String>;

    /// A constructor expression, or `None` if the target has no such form.
    fn construct(&self, ty: &str, is_structure: bool, args: &[String]) -> Option<String> {
        let _ = is_structure;
        Some(format!("{ty}({})", args.join(", ")))
    }

    /// `left % right` on floating-point operands, truncating toward zero.
    /// Both operands arrive parenthesized where needed.
    fn float_remainder(&self, left: &str, right: &str) -> String {
        format!("{left} % {right}")
    }

    /// How function bodies refer to a resource.
    fn resource_reference(&self, resource: &ResourceDefinition) -> String {
        self.correct_identifier(&resource.name)
    }

    /// Version line, extensions, default precisions.
    fn write_header(&self, out: &mut String, stage: ShaderStage, opts: &BackendOptions);

    /// A C-style structure declaration followed by a blank line.
    fn write_structure(&self, out: &mut String, structure: &StructureDeclaration, opts: &BackendOptions) {
        let pad = opts.pad(1);
        out.push_str(&format!("struct {}\n{{\n", structure.name));
        for field in &structure.fields {
            let array = if field.array_count > 0 {
                format!("[{}]", field.array_count)
            } else {
                String::new()
            };
            out.push_str(&format!("{pad}{} {}{array};\n", field.ty, field.name));
        }
        out.push_str("};\n\n");
    }

    /// A uniform block holding one value.
    fn write_uniform(
        &self,
        out: &mut String,
        decl: &ResourceDeclaration<'_>,
        opts: &BackendOptions,
    ) -> Result<(), GenerationError>;

    /// A sampler object.
    fn write_sampler(&self, out: &mut String, decl: &ResourceDeclaration<'_>, opts: &BackendOptions);

    /// A 2D texture.
    fn write_texture_2d(&self, out: &mut String, decl: &ResourceDeclaration<'_>, opts: &BackendOptions);

    /// A cube texture.
    fn write_texture_cube(&self, out: &mut String, decl: &ResourceDeclaration<'_>, opts: &BackendOptions);

    /// A structured buffer; `writable` selects the read-write form.
    fn write_structured_buffer(
        &self,
        out: &mut String,
        decl: &ResourceDeclaration<'_>,
        writable: bool,
        opts: &BackendOptions,
    ) -> Result<(), GenerationError>;

    /// Opens the group of stage variables flowing in `direction`.
    fn write_interface_begin(&self, out: &mut String, direction: Direction, layout: &EntryPointLayout) {
        let _ = (out, direction, layout);
    }

    /// One stage input or output variable.
    fn write_in_out_variable(&self, out: &mut String, var: &InOutVariable, opts: &BackendOptions);

    /// Declares the clip-space position output of a vertex entry, if the
    /// target needs a declaration for it.
    fn write_position_output(&self, out: &mut String, layout: &EntryPointLayout, opts: &BackendOptions) {
        let _ = (out, layout, opts);
    }

    /// Closes the group opened by [`write_interface_begin`](Self::write_interface_begin).
    fn write_interface_end(&self, out: &mut String, direction: Direction, layout: &EntryPointLayout) {
        let _ = (out, direction, layout);
    }

    /// Anything that precedes the `main` signature (compute workgroup size).
    fn write_main_attributes(&self, out: &mut String, layout: &EntryPointLayout) {
        let _ = (out, layout);
    }

    /// The `main` signature line.
    fn main_signature(&self, layout: &EntryPointLayout) -> String;

    /// How `main` reads or writes a stage variable.
    fn interface_access(&self, var: &InOutVariable) -> String {
        var.name.clone()
    }

    /// Where `main` stores the clip-space position of a vertex entry.
    fn position_target(&self) -> &str;

    /// Statements opening the body of `main`.
    fn main_prologue(&self, layout: &EntryPointLayout) -> Vec<String> {
        let _ = layout;
        Vec::new()
    }

    /// Statements closing the body of `main`.
    fn main_epilogue(&self, layout: &EntryPointLayout) -> Vec<String> {
        let _ = layout;
        Vec::new()
    }
}

/// Registry of available backends, used for target dispatch.
pub struct BackendRegistry {
    backends: Vec<Box<dyn Backend>>,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Registers a backend.
    pub fn register(&mut self, backend: Box<dyn Backend>) {
        self.backends.push(backend);
    }

    /// Finds a backend that handles the given target identifier.
    pub fn find(&self, target: &str) -> Option<&dyn Backend> {
        self.backends
            .iter()
            .find(|b| b.targets().contains(&target))
            .map(|b| &**b)
    }

    /// Lists all supported target identifiers.
    pub fn list_targets(&self) -> Vec<&str> {
        self.backends
            .iter()
            .flat_map(|b| b.targets().iter().copied())
            .collect()
    }
}
