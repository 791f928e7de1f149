//! GLSL backends for shadegen.
//!
//! One [`GlslBackend`] type covers three dialects, picked by [`GlslVariant`]:
//! OpenGL ES 3.00, desktop GLSL 3.30, and Vulkan-flavoured GLSL 4.50 with
//! explicit set/binding layout and separate sampler objects.
//!
//! Stage variables on ES 3.00 and 3.30 carry a `location` only where those
//! dialects allow one (vertex inputs, fragment outputs); the rest link by
//! name. Vertex outputs are named `out_<field>` while fragment inputs keep
//! the plain field name, so a vertex and a fragment shader generated from
//! the same structure do not link by name on those two dialects. GLSL 4.50
//! gives every stage variable a location and links by slot.

use shadegen_backend_core::{
    Backend, BackendOptions, Direction, EntryPointLayout, FloatPrecision, GenerationError,
    IdentifierTable, InOutVariable, IntrinsicTable, ResourceDeclaration, ShaderStage, TypeTable,
};
use shadegen_ir::{ResourceDefinition, ShaderResourceKind, SourceLocation};

mod tables;

/// A GLSL dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlslVariant {
    /// OpenGL ES 3.00 (`#version 300 es`).
    Es300,
    /// Desktop OpenGL 3.30 (`#version 330 core`).
    Glsl330,
    /// GLSL 4.50 with Vulkan-style `set`/`binding` layout (`#version 450`).
    Glsl450,
}

impl GlslVariant {
    /// Textures and samplers are distinct objects combined at sample sites.
    fn separate_samplers(self) -> bool {
        self == Self::Glsl450
    }

    /// Resources carry `set`/`binding` qualifiers and every stage variable a location.
    fn explicit_layout(self) -> bool {
        self == Self::Glsl450
    }
}

/// A GLSL backend for one [`GlslVariant`].
#[derive(Debug)]
pub struct GlslBackend {
    variant: GlslVariant,
    types: TypeTable,
    identifiers: IdentifierTable,
    intrinsics: IntrinsicTable,
}

impl GlslBackend {
    /// Creates a backend emitting `variant`.
    pub fn new(variant: GlslVariant) -> Self {
        Self {
            variant,
            types: tables::types(variant),
            identifiers: tables::identifiers(),
            intrinsics: tables::intrinsics(variant),
        }
    }

    /// OpenGL ES 3.00.
    pub fn es300() -> Self {
        Self::new(GlslVariant::Es300)
    }

    /// Desktop GLSL 3.30.
    pub fn glsl330() -> Self {
        Self::new(GlslVariant::Glsl330)
    }

    /// GLSL 4.50.
    pub fn glsl450() -> Self {
        Self::new(GlslVariant::Glsl450)
    }

    /// The dialect this backend emits.
    pub fn variant(&self) -> GlslVariant {
        self.variant
    }

    fn binding(&self, resource: &ResourceDefinition) -> String {
        format!("layout(set = 0, binding = {}) ", resource.binding)
    }
}

fn precision(p: FloatPrecision) -> &'static str {
    match p {
        FloatPrecision::Low => "lowp",
        FloatPrecision::Medium => "mediump",
        FloatPrecision::High => "highp",
    }
}

/// The member name of the block wrapping a uniform or buffer resource.
fn block_member(resource: &ResourceDefinition) -> String {
    format!("field_{}", resource.name)
}

impl Backend for GlslBackend {
    fn name(&self) -> &str {
        match self.variant {
            GlslVariant::Es300 => "GLSL ES 3.00",
            GlslVariant::Glsl330 => "GLSL 3.30",
            GlslVariant::Glsl450 => "GLSL 4.50",
        }
    }

    fn targets(&self) -> &[&str] {
        match self.variant {
            GlslVariant::Es300 => &["glsl-es300", "essl300"],
            GlslVariant::Glsl330 => &["glsl330"],
            GlslVariant::Glsl450 => &["glsl450"],
        }
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

    fn supports_stage(&self, stage: ShaderStage) -> bool {
        stage != ShaderStage::Compute || self.variant == GlslVariant::Glsl450
    }

    fn zero_value(&self, ty: &str, is_structure: bool) -> Option<String> {
        (!is_structure).then(|| format!("{ty}(0)"))
    }

    fn float_remainder(&self, left: &str, right: &str) -> String {
        // `%` is integer-only in GLSL.
        format!("{left} - {right} * trunc({left} / {right})")
    }

    fn resource_reference(&self, resource: &ResourceDefinition) -> String {
        match resource.kind {
            ShaderResourceKind::Uniform
            | ShaderResourceKind::StructuredBuffer
            | ShaderResourceKind::RWStructuredBuffer => block_member(resource),
            _ => self.correct_identifier(&resource.name),
        }
    }

    fn write_header(&self, out: &mut String, _stage: ShaderStage, opts: &BackendOptions) {
        match self.variant {
            GlslVariant::Es300 => {
                let p = precision(opts.float_precision);
                out.push_str(&format!(
                    "#version 300 es\nprecision {p} float;\nprecision {p} int;\n\n"
                ));
            }
            GlslVariant::Glsl330 => out.push_str("#version 330 core\n\n"),
            GlslVariant::Glsl450 => out.push_str("#version 450\n\n"),
        }
    }

    fn write_uniform(
        &self,
        out: &mut String,
        decl: &ResourceDeclaration<'_>,
        opts: &BackendOptions,
    ) -> Result<(), GenerationError> {
        let ty = decl.require_value_type()?;
        let qualifiers = if self.variant.explicit_layout() {
            format!("std140, set = 0, binding = {}", decl.resource.binding)
        } else {
            "std140".to_owned()
        };
        out.push_str(&format!(
            "layout({qualifiers}) uniform {}\n{{\n{}{ty} {};\n}};\n\n",
            decl.name,
            opts.pad(1),
            block_member(decl.resource)
        ));
        Ok(())
    }

    fn write_sampler(&self, out: &mut String, decl: &ResourceDeclaration<'_>, _opts: &BackendOptions) {
        if self.variant.separate_samplers() {
            out.push_str(&format!(
                "{}uniform sampler {};\n\n",
                self.binding(decl.resource),
                decl.name
            ));
        } else {
            log::debug!(
                "sampler `{}` not declared on {}; textures carry their own sampling state",
                decl.name,
                self.name()
            );
        }
    }

    fn write_texture_2d(&self, out: &mut String, decl: &ResourceDeclaration<'_>, _opts: &BackendOptions) {
        if self.variant.separate_samplers() {
            out.push_str(&format!(
                "{}uniform texture2D {};\n\n",
                self.binding(decl.resource),
                decl.name
            ));
        } else {
            out.push_str(&format!("uniform sampler2D {};\n\n", decl.name));
        }
    }

    fn write_texture_cube(&self, out: &mut String, decl: &ResourceDeclaration<'_>, _opts: &BackendOptions) {
        if self.variant.separate_samplers() {
            out.push_str(&format!(
                "{}uniform textureCube {};\n\n",
                self.binding(decl.resource),
                decl.name
            ));
        } else {
            out.push_str(&format!("uniform samplerCube {};\n\n", decl.name));
        }
    }

    fn write_structured_buffer(
        &self,
        out: &mut String,
        decl: &ResourceDeclaration<'_>,
        writable: bool,
        opts: &BackendOptions,
    ) -> Result<(), GenerationError> {
        if !self.variant.explicit_layout() {
            return Err(GenerationError::UnsupportedConstruct {
                kind: format!("structured buffer `{}` on {}", decl.resource.name, self.name()),
                location: SourceLocation::UNKNOWN,
            });
        }
        let ty = decl.require_value_type()?;
        let access = if writable { "" } else { "readonly " };
        out.push_str(&format!(
            "layout(std430, set = 0, binding = {}) {access}buffer {}\n{{\n{}{ty} {}[];\n}};\n\n",
            decl.resource.binding,
            decl.name,
            opts.pad(1),
            block_member(decl.resource)
        ));
        Ok(())
    }

    fn write_in_out_variable(&self, out: &mut String, var: &InOutVariable, _opts: &BackendOptions) {
        // ES 3.00 and 3.30 only allow locations on vertex inputs and fragment outputs.
        let located = self.variant.explicit_layout()
            || matches!(
                (var.stage, var.direction),
                (ShaderStage::Vertex, Direction::In) | (ShaderStage::Fragment, Direction::Out)
            );
        if located {
            out.push_str(&format!("layout(location = {}) ", var.slot));
        }
        out.push_str(&format!("{} {} {};\n", var.direction, var.ty, var.name));
    }

    fn write_main_attributes(&self, out: &mut String, layout: &EntryPointLayout) {
        if layout.stage == ShaderStage::Compute {
            let [x, y, z] = layout.workgroup_size;
            out.push_str(&format!(
                "layout(local_size_x = {x}, local_size_y = {y}, local_size_z = {z}) in;\n\n"
            ));
        }
    }

    fn main_signature(&self, _layout: &EntryPointLayout) -> String {
        "void main()".to_owned()
    }

    fn position_target(&self) -> &str {
        "gl_Position"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shadegen_backend_core::generate_full_text;
    use shadegen_ir::{
        AssignOp, CompilationUnit, Expression, FieldDefinition, NoSymbols, ResourceDefinition,
        SemanticType, ShaderFunction, ShaderFunctionAndBody, ShaderFunctionType, Statement,
        StatementKind, StructureDefinition, known,
    };

    fn textured_unit() -> CompilationUnit {
        let mut unit = CompilationUnit::new();
        unit.add_structure(StructureDefinition::new(
            "Game.VertexInput",
            vec![
                FieldDefinition::new("Position", known::VECTOR3),
                FieldDefinition::new("TexCoord", known::VECTOR2),
            ],
        ))
        .unwrap();
        unit.add_structure(StructureDefinition::new(
            "Game.FragmentInput",
            vec![
                FieldDefinition::new("Position", known::VECTOR4).with_semantic(SemanticType::Position),
                FieldDefinition::new("TexCoord", known::VECTOR2)
                    .with_semantic(SemanticType::TextureCoordinate),
            ],
        ))
        .unwrap();
        unit.add_resource(ResourceDefinition::uniform("Projection", known::MATRIX4X4, 0))
            .unwrap();
        unit.add_resource(ResourceDefinition::new("SurfaceTexture", ShaderResourceKind::Texture2D, 1))
            .unwrap();
        unit.add_resource(ResourceDefinition::new("Sampler", ShaderResourceKind::Sampler, 2))
            .unwrap();

        let input = || Expression::local("input");
        let output = || Expression::local("output");
        let vs = ShaderFunction::new("VS", "Game.FragmentInput", ShaderFunctionType::VertexEntryPoint)
            .with_parameter("input", "Game.VertexInput");
        let vs_body = vec![
            Statement::at(
                14,
                9,
                StatementKind::VariableDeclaration {
                    name: "output".into(),
                    ty: "Game.FragmentInput".into(),
                    array_length: 0,
                    init: None,
                },
            ),
            Statement::at(
                15,
                9,
                StatementKind::Assign {
                    target: Expression::member(output(), "Game.FragmentInput", "Position"),
                    op: AssignOp::Assign,
                    value: Expression::call(
                        "Shadegen.ShaderBuiltins.Mul",
                        vec![
                            Expression::resource("Projection"),
                            Expression::construct(
                                known::VECTOR4,
                                vec![
                                    Expression::member(input(), "Game.VertexInput", "Position"),
                                    Expression::float(1.0),
                                ],
                            ),
                        ],
                    ),
                },
            ),
            Statement::at(
                16,
                9,
                StatementKind::Assign {
                    target: Expression::member(output(), "Game.FragmentInput", "TexCoord"),
                    op: AssignOp::Assign,
                    value: Expression::member(input(), "Game.VertexInput", "TexCoord"),
                },
            ),
            Statement::at(17, 9, StatementKind::Return(Some(output()))),
        ];
        unit.add_function(ShaderFunctionAndBody::new(vs, vs_body)).unwrap();

        let fs = ShaderFunction::new("FS", known::VECTOR4, ShaderFunctionType::FragmentEntryPoint)
            .with_parameter("input", "Game.FragmentInput");
        let fs_body = vec![Statement::at(
            23,
            9,
            StatementKind::Return(Some(Expression::call(
                "Shadegen.ShaderBuiltins.Sample",
                vec![
                    Expression::resource("SurfaceTexture"),
                    Expression::resource("Sampler"),
                    Expression::member(input(), "Game.FragmentInput", "TexCoord"),
                ],
            ))),
        )];
        unit.add_function(ShaderFunctionAndBody::new(fs, fs_body)).unwrap();
        unit
    }

    fn generate(backend: &GlslBackend, unit: &CompilationUnit, entry: &str) -> String {
        generate_full_text(backend, unit, &NoSymbols, entry, &BackendOptions::default())
            .unwrap()
            .text
    }

    #[test]
    fn backend_metadata() {
        let es = GlslBackend::es300();
        assert_eq!(es.name(), "GLSL ES 3.00");
        assert!(es.targets().contains(&"essl300"));
        assert_eq!(GlslBackend::glsl330().targets(), ["glsl330"]);
        assert_eq!(GlslBackend::glsl450().variant(), GlslVariant::Glsl450);
        assert!(!es.supports_stage(ShaderStage::Compute));
        assert!(GlslBackend::glsl450().supports_stage(ShaderStage::Compute));
    }

    #[test]
    fn float_remainder_truncates() {
        assert_eq!(
            GlslBackend::glsl330().float_remainder("a", "(-b)"),
            "a - (-b) * trunc(a / (-b))"
        );
    }

    #[test]
    fn vertex_shader_330() {
        let unit = textured_unit();
        let expected = "\
#version 330 core

struct Game_VertexInput
{
    vec3 Position;
    vec2 TexCoord;
};

struct Game_FragmentInput
{
    vec4 Position;
    vec2 TexCoord;
};

layout(std140) uniform Projection
{
    mat4 field_Projection;
};

uniform sampler2D SurfaceTexture;

Game_FragmentInput VS(Game_VertexInput input_)
{
    Game_FragmentInput output_;
    output_.Position = (field_Projection * vec4(input_.Position, 1.0));
    output_.TexCoord = input_.TexCoord;
    return output_;
}

layout(location = 0) in vec3 Position;
layout(location = 1) in vec2 TexCoord;
out vec2 out_TexCoord;

void main()
{
    Game_VertexInput input_;
    input_.Position = Position;
    input_.TexCoord = TexCoord;
    Game_FragmentInput output_ = VS(input_);
    out_TexCoord = output_.TexCoord;
    gl_Position = output_.Position;
}
";
        assert_eq!(generate(&GlslBackend::glsl330(), &unit, "VS"), expected);
    }

    #[test]
    fn fragment_shader_330() {
        let unit = textured_unit();
        let expected = "\
#version 330 core

struct Game_FragmentInput
{
    vec4 Position;
    vec2 TexCoord;
};

layout(std140) uniform Projection
{
    mat4 field_Projection;
};

uniform sampler2D SurfaceTexture;

vec4 FS(Game_FragmentInput input_)
{
    return texture(SurfaceTexture, input_.TexCoord);
}

in vec4 Position;
in vec2 TexCoord;
layout(location = 0) out vec4 _outputColor_;

void main()
{
    Game_FragmentInput input_;
    input_.Position = Position;
    input_.TexCoord = TexCoord;
    vec4 output_ = FS(input_);
    _outputColor_ = output_;
}
";
        assert_eq!(generate(&GlslBackend::glsl330(), &unit, "FS"), expected);
    }

    #[test]
    fn es300_header_follows_precision() {
        let unit = textured_unit();
        let opts = BackendOptions {
            float_precision: FloatPrecision::Medium,
            ..BackendOptions::default()
        };
        let text = generate_full_text(&GlslBackend::es300(), &unit, &NoSymbols, "FS", &opts)
            .unwrap()
            .text;
        assert!(text.starts_with("#version 300 es\nprecision mediump float;\nprecision mediump int;\n\n"));

        let desktop = generate_full_text(&GlslBackend::glsl330(), &unit, &NoSymbols, "FS", &opts)
            .unwrap()
            .text;
        assert!(!desktop.contains("precision"));
    }

    #[test]
    fn glsl450_explicit_layout() {
        let unit = textured_unit();
        let backend = GlslBackend::glsl450();
        let fs = generate(&backend, &unit, "FS");
        assert!(fs.starts_with("#version 450\n\n"));
        assert!(fs.contains("layout(std140, set = 0, binding = 0) uniform Projection\n"));
        assert!(fs.contains("layout(set = 0, binding = 1) uniform texture2D SurfaceTexture;\n"));
        assert!(fs.contains("layout(set = 0, binding = 2) uniform sampler Sampler;\n"));
        assert!(fs.contains("    return texture(sampler2D(SurfaceTexture, Sampler), input_.TexCoord);\n"));
        assert!(fs.contains("layout(location = 0) in vec4 Position;\nlayout(location = 1) in vec2 TexCoord;\n"));

        let vs = generate(&backend, &unit, "VS");
        assert!(vs.contains("layout(location = 0) out vec2 out_TexCoord;\n"));
    }

    fn compute_unit() -> CompilationUnit {
        let mut unit = CompilationUnit::new();
        unit.add_resource(
            ResourceDefinition::new("Input", ShaderResourceKind::StructuredBuffer, 0)
                .with_value_type(known::FLOAT),
        )
        .unwrap();
        unit.add_resource(
            ResourceDefinition::new("Output", ShaderResourceKind::RWStructuredBuffer, 1)
                .with_value_type(known::FLOAT),
        )
        .unwrap();
        let mut cs = ShaderFunction::new("CS", known::VOID, ShaderFunctionType::ComputeEntryPoint);
        cs.workgroup_size = [64, 1, 1];
        let body = vec![Statement::at(
            5,
            9,
            StatementKind::Assign {
                target: Expression::index(Expression::resource("Output"), Expression::int(0)),
                op: AssignOp::Assign,
                value: Expression::binary(
                    shadegen_ir::BinaryOp::Multiply,
                    Expression::index(Expression::resource("Input"), Expression::int(0)),
                    Expression::float(2.0),
                ),
            },
        )];
        unit.add_function(ShaderFunctionAndBody::new(cs, body)).unwrap();
        unit
    }

    #[test]
    fn compute_shader_450() {
        let unit = compute_unit();
        let expected = "\
#version 450

layout(std430, set = 0, binding = 0) readonly buffer Input
{
    float field_Input[];
};

layout(std430, set = 0, binding = 1) buffer Output
{
    float field_Output[];
};

void CS()
{
    field_Output[0] = field_Input[0] * 2.0;
}

layout(local_size_x = 64, local_size_y = 1, local_size_z = 1) in;

void main()
{
    CS();
}
";
        assert_eq!(generate(&GlslBackend::glsl450(), &unit, "CS"), expected);
    }

    #[test]
    fn compute_and_buffers_need_450() {
        let unit = compute_unit();
        for backend in [GlslBackend::es300(), GlslBackend::glsl330()] {
            let err = generate_full_text(&backend, &unit, &NoSymbols, "CS", &BackendOptions::default())
                .unwrap_err();
            assert!(
                matches!(err, GenerationError::UnsupportedConstruct { ref kind, .. } if kind.starts_with("compute")),
                "{err}"
            );
        }

        // A buffer alone is enough to fail a graphics entry on 3.30.
        let mut unit = textured_unit();
        unit.add_resource(
            ResourceDefinition::new("Lights", ShaderResourceKind::StructuredBuffer, 3)
                .with_value_type(known::VECTOR4),
        )
        .unwrap();
        let err = generate_full_text(&GlslBackend::glsl330(), &unit, &NoSymbols, "FS", &BackendOptions::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported construct at <unknown>: structured buffer `Lights` on GLSL 3.30"
        );
    }
}
