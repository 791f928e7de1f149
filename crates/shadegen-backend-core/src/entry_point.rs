//! Entry-point synthesis: stage variables and the `main` wrapper.
//!
//! [`plan`] fixes the stage interface of an entry function (which variables
//! exist, their slots, where the clip-space position comes from) and checks
//! the entry's shape. [`write_main`] then emits the interface and a `main`
//! that copies inputs into the entry's input structure, calls the entry, and
//! scatters its result, using backend hooks for every piece of syntax.

use std::fmt;

use shadegen_ir::{FieldDefinition, SemanticType, ShaderFunction, SourceLocation, known};

use crate::error::GenerationError;
use crate::generator::Context;
use crate::{BackendOptions, Diagnostic, DiagnosticLevel, ShaderStage};

/// Name of the single fragment output variable.
const FRAGMENT_OUTPUT: &str = "_outputColor_";

/// Prefix of vertex output variables.
const VERTEX_OUTPUT_PREFIX: &str = "out_";

/// Which way a stage variable flows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Read by `main`.
    In,
    /// Written by `main`.
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::In => "in",
            Self::Out => "out",
        })
    }
}

/// One stage input or output variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InOutVariable {
    /// Flow direction.
    pub direction: Direction,
    /// Stage of the entry point this variable belongs to.
    pub stage: ShaderStage,
    /// Target type token.
    pub ty: String,
    /// Variable name.
    pub name: String,
    /// Corrected name of the structure field the variable carries; `None`
    /// for the fragment color output, which carries the whole result.
    pub field: Option<String>,
    /// Location slot, counted per direction from 0.
    pub slot: u32,
    /// Semantic tag of the source field.
    pub semantic: SemanticType,
}

/// The stage interface and call shape of one entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPointLayout {
    /// Stage of the entry function.
    pub stage: ShaderStage,
    /// Target name of the entry function.
    pub entry: String,
    /// Target name of the input structure; `None` for compute entries.
    pub input_type: Option<String>,
    /// Target name of the entry's return type.
    pub output_type: String,
    /// Input variables in field order.
    pub inputs: Vec<InOutVariable>,
    /// Output variables in field order, without the clip-space position.
    pub outputs: Vec<InOutVariable>,
    /// Corrected name of the output field bound to clip-space position.
    pub position_field: Option<String>,
    /// Name of the local holding the assembled input inside `main`.
    pub input_local: String,
    /// Name of the local holding the entry's result inside `main`.
    pub output_local: String,
    /// Compute workgroup size.
    pub workgroup_size: [u32; 3],
}

/// Checks the entry's shape and lays out its stage interface.
pub(crate) fn plan(
    ctx: &mut Context<'_>,
    f: &ShaderFunction,
    stage: ShaderStage,
) -> Result<EntryPointLayout, GenerationError> {
    let backend = ctx.backend;
    let mut layout = EntryPointLayout {
        stage,
        entry: backend.correct_identifier(&f.name),
        input_type: None,
        output_type: String::new(),
        inputs: Vec::new(),
        outputs: Vec::new(),
        position_field: None,
        input_local: String::new(),
        output_local: String::new(),
        workgroup_size: f.workgroup_size,
    };

    if stage == ShaderStage::Compute {
        if !f.parameters.is_empty() {
            return Err(GenerationError::entry_signature(
                &f.name,
                "compute entries take no parameters",
            ));
        }
        if f.workgroup_size.contains(&0) {
            let [x, y, z] = f.workgroup_size;
            return Err(GenerationError::entry_signature(
                &f.name,
                format!("workgroup size ({x}, {y}, {z}) has a zero dimension"),
            ));
        }
        layout.output_type = ctx.resolve_type(&f.return_type)?;
        return Ok(layout);
    }

    let [param] = f.parameters.as_slice() else {
        return Err(GenerationError::entry_signature(
            &f.name,
            format!(
                "{stage} entries take exactly one parameter, found {}",
                f.parameters.len()
            ),
        ));
    };
    if backend.map_type_core(param.ty.name()).is_some() || param.ty.is_array() {
        return Err(GenerationError::entry_signature(
            &f.name,
            format!("parameter `{}` must be a structure, found `{}`", param.name, param.ty),
        ));
    }

    let input = ctx.require_structure(param.ty.name())?;
    layout.input_type = Some(backend.structure_type_name(param.ty.name()));
    for (slot, field) in (0u32..).zip(&input.fields) {
        let name = backend.correct_identifier(&field.name);
        let var = interface_variable(ctx, Direction::In, stage, field, name, slot)?;
        layout.inputs.push(var);
    }

    match stage {
        ShaderStage::Vertex => plan_vertex_outputs(ctx, f, &mut layout)?,
        _ => plan_fragment_output(ctx, f, &mut layout)?,
    }

    layout.input_local = unique_local(ctx, "input", &layout);
    layout.output_local = unique_local(ctx, "output", &layout);
    Ok(layout)
}

fn plan_vertex_outputs(
    ctx: &mut Context<'_>,
    f: &ShaderFunction,
    layout: &mut EntryPointLayout,
) -> Result<(), GenerationError> {
    let backend = ctx.backend;
    if backend.map_type_core(f.return_type.name()).is_some() || f.return_type.is_array() {
        return Err(GenerationError::entry_signature(
            &f.name,
            format!("vertex entries return a structure, found `{}`", f.return_type),
        ));
    }
    let output = ctx.require_structure(f.return_type.name())?;
    layout.output_type = backend.structure_type_name(f.return_type.name());

    let Some(position) = output
        .fields
        .iter()
        .position(|field| field.semantic == SemanticType::Position)
    else {
        return Err(GenerationError::MissingPositionSemantic {
            function: f.name.clone(),
            structure: output.name.clone(),
        });
    };

    let tagged = output.position_fields().count();
    if tagged > 1 {
        let message = format!(
            "`{}` has {tagged} position fields; `{}` is the clip-space output, the rest are ordinary outputs",
            output.name, output.fields[position].name
        );
        log::warn!("{}: {message}", f.name);
        ctx.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Warning,
            message,
        });
    }

    layout.position_field = Some(backend.correct_identifier(&output.fields[position].name));
    let ordinary = output
        .fields
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != position)
        .map(|(_, field)| field);
    for (slot, field) in (0u32..).zip(ordinary) {
        let name = format!("{VERTEX_OUTPUT_PREFIX}{}", backend.correct_identifier(&field.name));
        let var = interface_variable(ctx, Direction::Out, ShaderStage::Vertex, field, name, slot)?;
        layout.outputs.push(var);
    }
    Ok(())
}

fn plan_fragment_output(
    ctx: &mut Context<'_>,
    f: &ShaderFunction,
    layout: &mut EntryPointLayout,
) -> Result<(), GenerationError> {
    let backend = ctx.backend;
    let expected = backend.map_type_core(known::VECTOR4);
    let found = backend.map_type_core(f.return_type.name());
    let ty = match (expected, found) {
        (Some(expected), Some(found)) if expected == found && !f.return_type.is_array() => found,
        _ => {
            return Err(GenerationError::InvalidReturnType {
                function: f.name.clone(),
                found: f.return_type.to_string(),
            });
        }
    };

    layout.output_type = ty.clone();
    layout.outputs.push(InOutVariable {
        direction: Direction::Out,
        stage: ShaderStage::Fragment,
        ty,
        name: FRAGMENT_OUTPUT.to_owned(),
        field: None,
        slot: 0,
        semantic: SemanticType::Color,
    });
    Ok(())
}

fn interface_variable(
    ctx: &mut Context<'_>,
    direction: Direction,
    stage: ShaderStage,
    field: &FieldDefinition,
    name: String,
    slot: u32,
) -> Result<InOutVariable, GenerationError> {
    if field.is_fixed_array() {
        return Err(GenerationError::unsupported(
            format!("array field `{}` as a {stage} {direction}put", field.name),
            SourceLocation::UNKNOWN,
        ));
    }
    Ok(InOutVariable {
        direction,
        stage,
        ty: ctx.resolve_type(&field.ty)?,
        name,
        field: Some(ctx.backend.correct_identifier(&field.name)),
        slot,
        semantic: field.semantic,
    })
}

/// A local name for `main` that no stage variable shadows.
fn unique_local(ctx: &Context<'_>, base: &str, layout: &EntryPointLayout) -> String {
    let mut name = ctx.backend.correct_identifier(base);
    let taken = |name: &str| {
        layout
            .inputs
            .iter()
            .chain(&layout.outputs)
            .any(|var| var.name == name)
            || layout.input_local == name
    };
    while taken(&name) {
        name.push('_');
    }
    name
}

/// Emits the stage interface and `main`.
pub(crate) fn write_main(
    ctx: &Context<'_>,
    layout: &EntryPointLayout,
    out: &mut String,
    opts: &BackendOptions,
) {
    let backend = ctx.backend;

    if layout.stage != ShaderStage::Compute {
        backend.write_interface_begin(out, Direction::In, layout);
        for var in &layout.inputs {
            backend.write_in_out_variable(out, var, opts);
        }
        backend.write_interface_end(out, Direction::In, layout);

        backend.write_interface_begin(out, Direction::Out, layout);
        for var in &layout.outputs {
            backend.write_in_out_variable(out, var, opts);
        }
        if layout.stage == ShaderStage::Vertex {
            backend.write_position_output(out, layout, opts);
        }
        backend.write_interface_end(out, Direction::Out, layout);
        out.push('\n');
    }

    backend.write_main_attributes(out, layout);
    out.push_str(&backend.main_signature(layout));
    out.push_str("\n{\n");

    let mut body = backend.main_prologue(layout);
    match &layout.input_type {
        None => body.push(format!("{}();", layout.entry)),
        Some(input_type) => {
            let input = &layout.input_local;
            let output = &layout.output_local;
            body.push(format!("{input_type} {input};"));
            for var in &layout.inputs {
                if let Some(field) = &var.field {
                    body.push(format!("{input}.{field} = {};", backend.interface_access(var)));
                }
            }
            body.push(format!(
                "{} {output} = {}({input});",
                layout.output_type, layout.entry
            ));
            for var in &layout.outputs {
                let target = backend.interface_access(var);
                match &var.field {
                    Some(field) => body.push(format!("{target} = {output}.{field};")),
                    None => body.push(format!("{target} = {output};")),
                }
            }
            if let Some(position) = &layout.position_field {
                body.push(format!("{} = {output}.{position};", backend.position_target()));
            }
        }
    }
    body.extend(backend.main_epilogue(layout));

    let pad = opts.pad(1);
    for line in body {
        out.push_str(&format!("{pad}{line}\n"));
    }
    out.push_str("}\n");
}
