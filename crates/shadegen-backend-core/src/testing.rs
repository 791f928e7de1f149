//! A minimal backend with a made-up syntax, for exercising the shared driver.

use shadegen_ir::{ShaderResourceKind, known};

use crate::{
    Backend, BackendOptions, EntryPointLayout, GenerationError, IdentifierTable, InOutVariable,
    Intrinsic, IntrinsicTable, ResourceDeclaration, ShaderStage, SwizzleTable, TypeTable,
};

#[derive(Debug)]
pub(crate) struct TestBackend {
    types: TypeTable,
    identifiers: IdentifierTable,
    intrinsics: IntrinsicTable,
    compute: bool,
}

impl TestBackend {
    pub(crate) fn new() -> Self {
        let types = TypeTable::new(&[
            (known::VOID, "void"),
            (known::BOOL, "bool"),
            (known::INT, "int"),
            (known::UINT, "uint"),
            (known::FLOAT, "float"),
            (known::VECTOR2, "float2"),
            (known::VECTOR3, "float3"),
            (known::VECTOR4, "float4"),
            (known::MATRIX4X4, "float4x4"),
        ]);
        let identifiers = IdentifierTable::new(SwizzleTable::xyzw())
            .with_reserved(&["main"])
            .with_static(known::VECTOR4, "Zero", "float4(0)")
            .with_static(known::VECTOR4, "One", "float4(1)");

        let mut intrinsics = IntrinsicTable::new();
        intrinsics.insert_vector("Dot", Intrinsic::Rename("dot"));
        intrinsics.insert_builtin(
            "Mul",
            Intrinsic::Custom(|args| match args {
                [a, b] => Some(format!("({} * {})", a.operand(), b.operand())),
                _ => None,
            }),
        );
        intrinsics.insert_builtin(
            "Sample",
            Intrinsic::Custom(|args| match args {
                [t, uv] if t.resource == Some(ShaderResourceKind::Texture2D) => {
                    Some(format!("sample2d({}, {})", t.text, uv.text))
                }
                _ => None,
            }),
        );

        Self {
            types,
            identifiers,
            intrinsics,
            compute: true,
        }
    }

    pub(crate) fn without_compute() -> Self {
        Self {
            compute: false,
            ..Self::new()
        }
    }
}

impl Backend for TestBackend {
    fn name(&self) -> &str {
        "test"
    }

    fn targets(&self) -> &[&str] {
        &["test"]
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
        stage != ShaderStage::Compute || self.compute
    }

    fn zero_value(&self, ty: &str, is_structure: bool) -> Option<String> {
        (!is_structure).then(|| format!("{ty}(0)"))
    }

    fn write_header(&self, out: &mut String, _stage: ShaderStage, _opts: &BackendOptions) {
        out.push_str("// test\n");
    }

    fn write_uniform(
        &self,
        out: &mut String,
        decl: &ResourceDeclaration<'_>,
        _opts: &BackendOptions,
    ) -> Result<(), GenerationError> {
        let ty = decl.require_value_type()?;
        out.push_str(&format!(
            "uniform {ty} {} : {};\n",
            decl.name, decl.resource.binding
        ));
        Ok(())
    }

    fn write_sampler(&self, out: &mut String, decl: &ResourceDeclaration<'_>, _opts: &BackendOptions) {
        out.push_str(&format!("sampler {} : {};\n", decl.name, decl.resource.binding));
    }

    fn write_texture_2d(&self, out: &mut String, decl: &ResourceDeclaration<'_>, _opts: &BackendOptions) {
        out.push_str(&format!("texture2d {} : {};\n", decl.name, decl.resource.binding));
    }

    fn write_texture_cube(&self, out: &mut String, decl: &ResourceDeclaration<'_>, _opts: &BackendOptions) {
        out.push_str(&format!("texturecube {} : {};\n", decl.name, decl.resource.binding));
    }

    fn write_structured_buffer(
        &self,
        out: &mut String,
        decl: &ResourceDeclaration<'_>,
        writable: bool,
        _opts: &BackendOptions,
    ) -> Result<(), GenerationError> {
        let ty = decl.require_value_type()?;
        let kind = if writable { "rwbuffer" } else { "buffer" };
        out.push_str(&format!(
            "{kind}<{ty}> {} : {};\n",
            decl.name, decl.resource.binding
        ));
        Ok(())
    }

    fn write_in_out_variable(&self, out: &mut String, var: &InOutVariable, _opts: &BackendOptions) {
        out.push_str(&format!(
            "{} {} {} @{};\n",
            var.direction, var.ty, var.name, var.slot
        ));
    }

    fn write_main_attributes(&self, out: &mut String, layout: &EntryPointLayout) {
        if layout.stage == ShaderStage::Compute {
            let [x, y, z] = layout.workgroup_size;
            out.push_str(&format!("[compute {x} {y} {z}]\n"));
        }
    }

    fn main_signature(&self, _layout: &EntryPointLayout) -> String {
        "void main()".to_owned()
    }

    fn position_target(&self) -> &str {
        "POSITION"
    }
}
