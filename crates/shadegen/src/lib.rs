//! Retargetable shader code generation.
//!
//! Turns a [`CompilationUnit`] of host-language shader functions into GLSL
//! or HLSL source, one entry point and one target at a time. Requests are
//! independent: [`generate_batch`] runs many of them in parallel against the
//! same unit, discovering shared structures at most once.

use std::fmt;

use rayon::prelude::*;

pub use shadegen_backend_core::{
    Backend, BackendOptions, BackendRegistry, Diagnostic, DiagnosticLevel, DiscoveryFailure,
    FloatPrecision, GeneratedShader, GenerationError, ShaderStage, generate_full_text,
};
pub use shadegen_backend_glsl::{GlslBackend, GlslVariant};
pub use shadegen_backend_hlsl::HlslBackend;
pub use shadegen_ir as ir;

use shadegen_ir::{CompilationUnit, SymbolSource};

/// The built-in targets.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum BackendKind {
    /// GLSL ES 3.00 (WebGL 2, GLES 3).
    GlslEs300,
    /// Desktop GLSL 3.30 core.
    Glsl330,
    /// GLSL 4.50 with Vulkan-style set/binding layout.
    Glsl450,
    /// HLSL, shader model 5 register syntax.
    Hlsl,
}

impl BackendKind {
    /// Every built-in target, in registry order.
    pub const ALL: [Self; 4] = [Self::GlslEs300, Self::Glsl330, Self::Glsl450, Self::Hlsl];

    /// A fresh backend for this target.
    pub fn backend(self) -> Box<dyn Backend> {
        match self {
            Self::GlslEs300 => Box::new(GlslBackend::es300()),
            Self::Glsl330 => Box::new(GlslBackend::glsl330()),
            Self::Glsl450 => Box::new(GlslBackend::glsl450()),
            Self::Hlsl => Box::new(HlslBackend::new()),
        }
    }

    /// Position of this kind in [`BackendKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::GlslEs300 => 0,
            Self::Glsl330 => 1,
            Self::Glsl450 => 2,
            Self::Hlsl => 3,
        }
    }

    /// The primary target identifier.
    pub fn target(self) -> &'static str {
        match self {
            Self::GlslEs300 => "glsl-es300",
            Self::Glsl330 => "glsl330",
            Self::Glsl450 => "glsl450",
            Self::Hlsl => "hlsl",
        }
    }

    /// Looks up a target identifier, including aliases such as `essl300`.
    pub fn from_target(target: &str) -> Option<Self> {
        match target {
            "glsl-es300" | "essl300" => Some(Self::GlslEs300),
            "glsl330" => Some(Self::Glsl330),
            "glsl450" => Some(Self::Glsl450),
            "hlsl" => Some(Self::Hlsl),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}

/// A registry holding every built-in backend.
pub fn builtin_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    for kind in BackendKind::ALL {
        registry.register(kind.backend());
    }
    registry
}

/// Generates the shader for one entry point on one target.
pub fn generate(
    unit: &CompilationUnit,
    symbols: &dyn SymbolSource,
    entry: &str,
    kind: BackendKind,
    opts: &BackendOptions,
) -> Result<GeneratedShader, GenerationError> {
    generate_full_text(kind.backend().as_ref(), unit, symbols, entry, opts)
}

/// One (entry point, target) pair of a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Name of the entry function.
    pub entry: String,
    /// Target to generate for.
    pub backend: BackendKind,
}

impl GenerationRequest {
    /// Creates a request.
    pub fn new(entry: impl Into<String>, backend: BackendKind) -> Self {
        Self {
            entry: entry.into(),
            backend,
        }
    }
}

/// Runs independent requests in parallel.
///
/// Results come back in request order, one per request; a failed request
/// does not affect the others.
pub fn generate_batch(
    unit: &CompilationUnit,
    symbols: &dyn SymbolSource,
    requests: &[GenerationRequest],
    opts: &BackendOptions,
) -> Vec<Result<GeneratedShader, GenerationError>> {
    let backends = BackendKind::ALL.map(BackendKind::backend);
    log::debug!("generating {} request(s)", requests.len());

    requests
        .par_iter()
        .map(|request| {
            let backend = backends[request.backend.index()].as_ref();
            let result = generate_full_text(backend, unit, symbols, &request.entry, opts);
            if let Err(err) = &result {
                log::debug!("`{}` on {} failed: {err}", request.entry, request.backend);
            }
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shadegen_ir::{
        AssignOp, Expression, FieldDefinition, SemanticType, ShaderFunction, ShaderFunctionAndBody,
        ShaderFunctionType, Statement, StatementKind, StructureDefinition, SymbolTable, known,
    };

    /// A vertex and a fragment entry whose structures live only in the
    /// symbol table, so every request has to discover them.
    fn passthrough() -> (CompilationUnit, SymbolTable) {
        let mut unit = CompilationUnit::new();
        let vs = ShaderFunction::new("VS", "Demo.Varyings", ShaderFunctionType::VertexEntryPoint)
            .with_parameter("input", "Demo.Attributes");
        let vs_body = vec![
            Statement::at(
                10,
                9,
                StatementKind::VariableDeclaration {
                    name: "v".into(),
                    ty: "Demo.Varyings".into(),
                    array_length: 0,
                    init: None,
                },
            ),
            Statement::at(
                11,
                9,
                StatementKind::Assign {
                    target: Expression::member(Expression::local("v"), "Demo.Varyings", "Position"),
                    op: AssignOp::Assign,
                    value: Expression::member(Expression::local("input"), "Demo.Attributes", "Position"),
                },
            ),
            Statement::at(
                12,
                9,
                StatementKind::Assign {
                    target: Expression::member(Expression::local("v"), "Demo.Varyings", "Color"),
                    op: AssignOp::Assign,
                    value: Expression::member(Expression::local("input"), "Demo.Attributes", "Color"),
                },
            ),
            Statement::at(13, 9, StatementKind::Return(Some(Expression::local("v")))),
        ];
        unit.add_function(ShaderFunctionAndBody::new(vs, vs_body)).unwrap();

        let fs = ShaderFunction::new("FS", known::VECTOR4, ShaderFunctionType::FragmentEntryPoint)
            .with_parameter("input", "Demo.Varyings");
        let fs_body = vec![Statement::at(
            18,
            9,
            StatementKind::Return(Some(Expression::member(
                Expression::local("input"),
                "Demo.Varyings",
                "Color",
            ))),
        )];
        unit.add_function(ShaderFunctionAndBody::new(fs, fs_body)).unwrap();

        let mut symbols = SymbolTable::new();
        symbols.declare_structure(StructureDefinition::new(
            "Demo.Attributes",
            vec![
                FieldDefinition::new("Position", known::VECTOR4),
                FieldDefinition::new("Color", known::VECTOR4),
            ],
        ));
        symbols.declare_structure(StructureDefinition::new(
            "Demo.Varyings",
            vec![
                FieldDefinition::new("Position", known::VECTOR4).with_semantic(SemanticType::Position),
                FieldDefinition::new("Color", known::VECTOR4).with_semantic(SemanticType::Color),
            ],
        ));
        (unit, symbols)
    }

    #[test]
    fn target_identifiers() {
        for kind in BackendKind::ALL {
            assert_eq!(BackendKind::from_target(kind.target()), Some(kind));
            assert!(kind.backend().targets().contains(&kind.target()));
        }
        assert_eq!(BackendKind::from_target("essl300"), Some(BackendKind::GlslEs300));
        assert_eq!(BackendKind::from_target("metal"), None);
        assert_eq!(BackendKind::Glsl450.to_string(), "glsl450");
    }

    #[test]
    fn index_matches_all() {
        for (i, kind) in BackendKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(BackendKind::ALL[kind.index()], kind);
        }
    }

    #[test]
    fn registry_holds_builtins() {
        let registry = builtin_registry();
        assert_eq!(
            registry.list_targets(),
            ["glsl-es300", "essl300", "glsl330", "glsl450", "hlsl"]
        );
        assert_eq!(registry.find("essl300").map(|b| b.name()), Some("GLSL ES 3.00"));
        assert_eq!(registry.find("hlsl").map(|b| b.name()), Some("HLSL"));
    }

    #[test]
    fn batch_matches_sequential_generation() {
        let (unit, symbols) = passthrough();
        let opts = BackendOptions::default();
        let requests: Vec<_> = BackendKind::ALL
            .into_iter()
            .flat_map(|kind| {
                [
                    GenerationRequest::new("VS", kind),
                    GenerationRequest::new("FS", kind),
                ]
            })
            .collect();

        let batch = generate_batch(&unit, &symbols, &requests, &opts);
        assert_eq!(batch.len(), requests.len());
        assert_eq!(unit.structures.len(), 2);

        for (request, result) in requests.iter().zip(&batch) {
            let sequential = generate(&unit, &symbols, &request.entry, request.backend, &opts).unwrap();
            let parallel = result.as_ref().unwrap();
            assert_eq!(parallel.text, sequential.text, "{} on {}", request.entry, request.backend);
        }
    }

    #[test]
    fn failed_request_leaves_others_intact() {
        let (unit, symbols) = passthrough();
        let requests = [
            GenerationRequest::new("FS", BackendKind::Hlsl),
            GenerationRequest::new("Missing", BackendKind::Hlsl),
            GenerationRequest::new("FS", BackendKind::Glsl330),
        ];
        let results = generate_batch(&unit, &symbols, &requests, &BackendOptions::default());

        assert!(results[0].is_ok());
        assert!(matches!(
            &results[1],
            Err(GenerationError::EntryPointNotFound { name }) if name == "Missing"
        ));
        let glsl = results[2].as_ref().unwrap();
        assert!(glsl.text.starts_with("#version 330 core\n"));
        assert!(glsl.diagnostics.is_empty());
    }
}
