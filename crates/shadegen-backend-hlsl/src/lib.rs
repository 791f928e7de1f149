//! HLSL backend for shadegen.
//!
//! Emits shader model 5 style source: `cbuffer` blocks and explicit
//! `register` slots, stage interfaces as semantic-annotated structs, and a
//! `main` that takes and returns those structs.

use shadegen_backend_core::{
    Backend, BackendOptions, Direction, EntryPointLayout, GenerationError, IdentifierTable,
    InOutVariable, IntrinsicTable, ResourceDeclaration, ShaderStage, TypeTable,
};

mod tables;

/// Parameter name of the synthesized `main`.
const STAGE_INPUT: &str = "stage_input";
/// Local `main` fills and returns.
const STAGE_OUTPUT: &str = "stage_output";
/// Interface member carrying clip-space position.
const POSITION_MEMBER: &str = "_position_";

/// HLSL backend.
#[derive(Debug)]
pub struct HlslBackend {
    types: TypeTable,
    identifiers: IdentifierTable,
    intrinsics: IntrinsicTable,
}

impl Default for HlslBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HlslBackend {
    /// Creates the backend and its lookup tables.
    pub fn new() -> Self {
        Self {
            types: tables::types(),
            identifiers: tables::identifiers(),
            intrinsics: tables::intrinsics(),
        }
    }

    fn interface_type(layout: &EntryPointLayout, direction: Direction) -> String {
        match direction {
            Direction::In => format!("{}_StageInput", layout.entry),
            Direction::Out => format!("{}_StageOutput", layout.entry),
        }
    }
}

impl Backend for HlslBackend {
    fn name(&self) -> &str {
        "HLSL"
    }

    fn targets(&self) -> &[&str] {
        &["hlsl"]
    }

    fn type_table(&self) -> &TypeTable {
        &self.types
    }

    fn identifier_table(&self) -> &IdentifierTable {
        &self.identifiers
    }

    fn intrinsics(&self) -> &IntrinsicTable {
        &self.intrinsics
    }

    fn supports_stage(&self, _stage: ShaderStage) -> bool {
        true
    }

    fn zero_value(&self, ty: &str, _is_structure: bool) -> Option<String> {
        Some(format!("({ty})0"))
    }

    fn construct(&self, ty: &str, is_structure: bool, args: &[String]) -> Option<String> {
        (!is_structure).then(|| format!("{ty}({})", args.join(", ")))
    }

    fn write_header(&self, _out: &mut String, _stage: ShaderStage, _opts: &BackendOptions) {}

    fn write_uniform(
        &self,
        out: &mut String,
        decl: &ResourceDeclaration<'_>,
        opts: &BackendOptions,
    ) -> Result<(), GenerationError> {
        let ty = decl.require_value_type()?;
        out.push_str(&format!(
            "cbuffer {name}Buffer : register(b{})\n{{\n{}{ty} {name};\n}};\n\n",
            decl.resource.binding,
            opts.pad(1),
            name = decl.name,
        ));
        Ok(())
    }

    fn write_sampler(&self, out: &mut String, decl: &ResourceDeclaration<'_>, _opts: &BackendOptions) {
        out.push_str(&format!(
            "SamplerState {} : register(s{});\n\n",
            decl.name, decl.resource.binding
        ));
    }

    fn write_texture_2d(&self, out: &mut String, decl: &ResourceDeclaration<'_>, _opts: &BackendOptions) {
        out.push_str(&format!(
            "Texture2D {} : register(t{});\n\n",
            decl.name, decl.resource.binding
        ));
    }

    fn write_texture_cube(&self, out: &mut String, decl: &ResourceDeclaration<'_>, _opts: &BackendOptions) {
        out.push_str(&format!(
            "TextureCube {} : register(t{});\n\n",
            decl.name, decl.resource.binding
        ));
    }

    fn write_structured_buffer(
        &self,
        out: &mut String,
        decl: &ResourceDeclaration<'_>,
        writable: bool,
        _opts: &BackendOptions,
    ) -> Result<(), GenerationError> {
        let ty = decl.require_value_type()?;
        let (kind, register) = if writable {
            ("RWStructuredBuffer", 'u')
        } else {
            ("StructuredBuffer", 't')
        };
        out.push_str(&format!(
            "{kind}<{ty}> {} : register({register}{});\n\n",
            decl.name, decl.resource.binding
        ));
        Ok(())
    }

    fn write_interface_begin(&self, out: &mut String, direction: Direction, layout: &EntryPointLayout) {
        out.push_str(&format!("struct {}\n{{\n", Self::interface_type(layout, direction)));
    }

    fn write_in_out_variable(&self, out: &mut String, var: &InOutVariable, opts: &BackendOptions) {
        let semantic = if var.stage == ShaderStage::Fragment && var.direction == Direction::Out {
            format!("SV_Target{}", var.slot)
        } else {
            format!("TEXCOORD{}", var.slot)
        };
        out.push_str(&format!("{}{} {} : {semantic};\n", opts.pad(1), var.ty, var.name));
    }

    fn write_position_output(&self, out: &mut String, _layout: &EntryPointLayout, opts: &BackendOptions) {
        out.push_str(&format!("{}float4 {POSITION_MEMBER} : SV_Position;\n", opts.pad(1)));
    }

    fn write_interface_end(&self, out: &mut String, direction: Direction, _layout: &EntryPointLayout) {
        match direction {
            Direction::In => out.push_str("};\n\n"),
            Direction::Out => out.push_str("};\n"),
        }
    }

    fn write_main_attributes(&self, out: &mut String, layout: &EntryPointLayout) {
        if layout.stage == ShaderStage::Compute {
            let [x, y, z] = layout.workgroup_size;
            out.push_str(&format!("[numthreads({x}, {y}, {z})]\n"));
        }
    }

    fn main_signature(&self, layout: &EntryPointLayout) -> String {
        if layout.stage == ShaderStage::Compute {
            return "void main()".to_owned();
        }
        format!(
            "{} main({} {STAGE_INPUT})",
            Self::interface_type(layout, Direction::Out),
            Self::interface_type(layout, Direction::In)
        )
    }

    fn interface_access(&self, var: &InOutVariable) -> String {
        let owner = match var.direction {
            Direction::In => STAGE_INPUT,
            Direction::Out => STAGE_OUTPUT,
        };
        format!("{owner}.{}", var.name)
    }

    fn position_target(&self) -> &str {
        "stage_output._position_"
    }

    fn main_prologue(&self, layout: &EntryPointLayout) -> Vec<String> {
        if layout.stage == ShaderStage::Compute {
            return Vec::new();
        }
        vec![format!(
            "{} {STAGE_OUTPUT};",
            Self::interface_type(layout, Direction::Out)
        )]
    }

    fn main_epilogue(&self, layout: &EntryPointLayout) -> Vec<String> {
        if layout.stage == ShaderStage::Compute {
            return Vec::new();
        }
        vec![format!("return {STAGE_OUTPUT};")]
    }
}
