//! The shared generation driver.
//!
//! A request runs in two phases. Resolution walks everything the entry point
//! reaches and maps (or discovers) every type it names; this is the only
//! phase that may append to the compilation unit. Emission then writes the
//! document from the resolved state without touching the unit again.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use shadegen_ir::{
    CompilationUnit, Expression, ShaderFunctionAndBody, ShaderResourceKind, SourceLocation,
    StatementKind, StructureDefinition, SymbolSource, TypeReference,
};

use crate::discovery::discover_structure;
use crate::error::{DiscoveryFailure, GenerationError};
use crate::walk::{Node, walk_block};
use crate::{
    Backend, BackendOptions, Diagnostic, FieldDeclaration, GeneratedShader, ResourceDeclaration,
    ShaderStage, StructureDeclaration, entry_point, lowering,
};

/// Per-request state shared by resolution and emission.
pub(crate) struct Context<'a> {
    pub(crate) backend: &'a dyn Backend,
    pub(crate) unit: &'a CompilationUnit,
    symbols: &'a dyn SymbolSource,
    /// Structures this request uses, each after the structures its fields name.
    structures: IndexMap<String, Arc<StructureDefinition>>,
    /// Target structure name to the canonical name that claimed it.
    target_names: HashMap<String, String>,
    in_progress: HashSet<String>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        backend: &'a dyn Backend,
        unit: &'a CompilationUnit,
        symbols: &'a dyn SymbolSource,
    ) -> Self {
        Self {
            backend,
            unit,
            symbols,
            structures: IndexMap::new(),
            target_names: HashMap::new(),
            in_progress: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Maps `ty`, resolving (and if needed discovering) it as a structure
    /// when the backend has no primitive mapping.
    pub(crate) fn resolve_type(&mut self, ty: &TypeReference) -> Result<String, GenerationError> {
        if let Some(mapped) = self.backend.map_type_core(ty.name()) {
            return Ok(mapped);
        }
        self.resolve_structure(ty.name(), |_| GenerationError::UnknownType {
            name: ty.name().to_owned(),
        })?;
        Ok(self.backend.structure_type_name(ty.name()))
    }

    /// Resolves a structure the entry point cannot do without.
    pub(crate) fn require_structure(
        &mut self,
        name: &str,
    ) -> Result<Arc<StructureDefinition>, GenerationError> {
        self.resolve_structure(name, |reason| GenerationError::UnresolvedType {
            name: name.to_owned(),
            reason,
        })
    }

    fn resolve_structure(
        &mut self,
        name: &str,
        on_failure: impl FnOnce(DiscoveryFailure) -> GenerationError,
    ) -> Result<Arc<StructureDefinition>, GenerationError> {
        if let Some(sd) = self.structures.get(name) {
            return Ok(Arc::clone(sd));
        }
        if self.in_progress.contains(name) {
            return Err(GenerationError::unsupported(
                format!("structure `{name}` contains itself"),
                SourceLocation::UNKNOWN,
            ));
        }

        let sd = discover_structure(&self.unit.structures, self.symbols, name).map_err(on_failure)?;
        self.in_progress.insert(name.to_owned());
        for field in &sd.fields {
            self.resolve_type(&field.ty)?;
        }
        self.in_progress.remove(name);

        let target = self.backend.structure_type_name(name);
        if let Some(other) = self.target_names.get(&target) {
            return Err(GenerationError::unsupported(
                format!("structures `{other}` and `{name}` both lower to `{target}`"),
                SourceLocation::UNKNOWN,
            ));
        }
        self.target_names.insert(target, name.to_owned());
        self.structures.insert(name.to_owned(), Arc::clone(&sd));
        Ok(sd)
    }

    /// Resolves every type a function's signature and body name.
    fn resolve_function(&mut self, f: &ShaderFunctionAndBody) -> Result<(), GenerationError> {
        self.resolve_type(&f.function.return_type)?;
        for param in &f.function.parameters {
            self.resolve_type(&param.ty)?;
        }
        walk_block(&f.body, &mut |node, _| {
            let ty = match node {
                Node::Statement(stmt) => match &stmt.kind {
                    StatementKind::VariableDeclaration { ty, .. } => ty,
                    _ => return Ok(()),
                },
                Node::Expression(Expression::Construct { ty, .. } | Expression::Cast { ty, .. }) => ty,
                Node::Expression(Expression::Member { declaring_type, .. })
                    if !self
                        .backend
                        .identifier_table()
                        .knows_type(declaring_type.name()) =>
                {
                    declaring_type
                }
                Node::Expression(_) => return Ok(()),
            };
            self.resolve_type(ty).map(drop)
        })
    }

    /// A structure resolved by this request.
    pub(crate) fn structure(&self, name: &str) -> Option<&Arc<StructureDefinition>> {
        self.structures.get(name)
    }

    /// Maps a type that resolution has already seen.
    pub(crate) fn mapped_type(&self, ty: &TypeReference) -> Result<String, GenerationError> {
        if let Some(mapped) = self.backend.map_type_core(ty.name()) {
            Ok(mapped)
        } else if self.structures.contains_key(ty.name()) {
            Ok(self.backend.structure_type_name(ty.name()))
        } else {
            Err(GenerationError::UnknownType {
                name: ty.name().to_owned(),
            })
        }
    }
}

/// Generates the complete shader for entry function `entry` on `backend`.
///
/// Emits, in order: the header, every structure the request reaches (in
/// dependency order), every resource of the unit, every function reachable
/// from the entry (callees first), and the synthesized `main`.
pub fn generate_full_text(
    backend: &dyn Backend,
    unit: &CompilationUnit,
    symbols: &dyn SymbolSource,
    entry: &str,
    opts: &BackendOptions,
) -> Result<GeneratedShader, GenerationError> {
    let entry_fn = unit
        .function(entry)
        .ok_or_else(|| GenerationError::EntryPointNotFound {
            name: entry.to_owned(),
        })?;
    let stage = ShaderStage::of(entry_fn.function.function_type)
        .ok_or_else(|| GenerationError::entry_signature(entry, "not marked as an entry point"))?;
    if !backend.supports_stage(stage) {
        return Err(GenerationError::unsupported(
            format!("{stage} entry points on {}", backend.name()),
            SourceLocation::UNKNOWN,
        ));
    }
    log::debug!("generating `{entry}` ({stage}) for {} with {opts}", backend.name());

    let functions = reachable_functions(unit, entry_fn)?;

    let mut ctx = Context::new(backend, unit, symbols);
    let layout = entry_point::plan(&mut ctx, &entry_fn.function, stage)?;
    for f in &functions {
        ctx.resolve_function(f)?;
    }
    for (_, rd) in unit.resources.iter() {
        if let Some(ty) = &rd.value_type {
            ctx.resolve_type(ty)?;
        }
    }
    log::debug!(
        "`{entry}` reaches {} function(s) and {} structure(s)",
        functions.len(),
        ctx.structures.len()
    );

    let mut out = String::new();
    backend.write_header(&mut out, stage, opts);
    write_structures(&ctx, &mut out, opts)?;
    write_resources(&ctx, &mut out, opts)?;
    for f in &functions {
        lowering::write_function(&ctx, f, stage, &mut out, opts)?;
    }
    entry_point::write_main(&ctx, &layout, &mut out, opts);

    Ok(GeneratedShader {
        text: out,
        diagnostics: ctx.diagnostics,
    })
}

/// Functions reachable from `entry`, callees before callers, in first-call
/// order; `entry` itself comes last.
fn reachable_functions<'u>(
    unit: &'u CompilationUnit,
    entry: &'u ShaderFunctionAndBody,
) -> Result<Vec<&'u ShaderFunctionAndBody>, GenerationError> {
    let mut order = Vec::new();
    let mut done = HashSet::new();
    let mut stack = Vec::new();
    visit_function(unit, entry, &mut stack, &mut done, &mut order)?;
    Ok(order)
}

fn visit_function<'u>(
    unit: &'u CompilationUnit,
    f: &'u ShaderFunctionAndBody,
    stack: &mut Vec<&'u str>,
    done: &mut HashSet<&'u str>,
    order: &mut Vec<&'u ShaderFunctionAndBody>,
) -> Result<(), GenerationError> {
    stack.push(&f.function.name);
    walk_block(&f.body, &mut |node, loc| {
        let Node::Expression(Expression::Call { function, .. }) = node else {
            return Ok(());
        };
        let Some(callee) = unit.function(function) else {
            return Ok(());
        };
        if stack.contains(&function.as_str()) {
            return Err(GenerationError::unsupported(
                format!("recursive call to `{function}`"),
                loc,
            ));
        }
        if !done.contains(function.as_str()) {
            visit_function(unit, callee, stack, done, order)?;
        }
        Ok(())
    })?;
    stack.pop();
    done.insert(&f.function.name);
    order.push(f);
    Ok(())
}

fn write_structures(
    ctx: &Context<'_>,
    out: &mut String,
    opts: &BackendOptions,
) -> Result<(), GenerationError> {
    for (name, sd) in &ctx.structures {
        let fields = sd
            .fields
            .iter()
            .map(|field| {
                Ok(FieldDeclaration {
                    ty: ctx.mapped_type(&field.ty)?,
                    name: ctx.backend.correct_identifier(&field.name),
                    array_count: field.array_element_count,
                })
            })
            .collect::<Result<Vec<_>, GenerationError>>()?;
        let decl = StructureDeclaration {
            name: ctx.backend.structure_type_name(name),
            fields,
        };
        ctx.backend.write_structure(out, &decl, opts);
    }
    Ok(())
}

fn write_resources(
    ctx: &Context<'_>,
    out: &mut String,
    opts: &BackendOptions,
) -> Result<(), GenerationError> {
    let backend = ctx.backend;
    for (_, rd) in ctx.unit.resources.iter() {
        let decl = ResourceDeclaration {
            resource: rd,
            name: backend.correct_identifier(&rd.name),
            value_type: rd
                .value_type
                .as_ref()
                .map(|ty| ctx.mapped_type(ty))
                .transpose()?,
        };
        match rd.kind {
            ShaderResourceKind::Uniform => backend.write_uniform(out, &decl, opts)?,
            ShaderResourceKind::Texture2D => backend.write_texture_2d(out, &decl, opts),
            ShaderResourceKind::TextureCube => backend.write_texture_cube(out, &decl, opts),
            ShaderResourceKind::Sampler => backend.write_sampler(out, &decl, opts),
            ShaderResourceKind::StructuredBuffer => {
                backend.write_structured_buffer(out, &decl, false, opts)?;
            }
            ShaderResourceKind::RWStructuredBuffer => {
                backend.write_structured_buffer(out, &decl, true, opts)?;
            }
            ShaderResourceKind::Other(_) => {
                return Err(GenerationError::IllegalResourceKind {
                    resource: rd.name.clone(),
                    kind: rd.kind,
                });
            }
        }
    }
    Ok(())
}
