//! HLSL spellings of host types, members, and library calls.

use shadegen_backend_core::{IdentifierTable, Intrinsic, IntrinsicArgument, IntrinsicTable, SwizzleTable, TypeTable};
use shadegen_ir::known;

const RESERVED: &[&str] = &[
    "AppendStructuredBuffer", "BlendState", "Buffer", "ByteAddressBuffer", "ComputeShader",
    "ConsumeStructuredBuffer", "DepthStencilState", "DomainShader", "GeometryShader", "HullShader",
    "InputPatch", "LineStream", "NULL", "OutputPatch", "PixelShader", "PointStream",
    "RWBuffer", "RWByteAddressBuffer", "RWStructuredBuffer", "RWTexture2D", "RasterizerState",
    "SamplerComparisonState", "SamplerState", "StructuredBuffer", "Texture1D", "Texture2D",
    "Texture3D", "TextureCube", "TriangleStream", "VertexShader", "asm", "bool", "break",
    "case", "cbuffer", "centroid", "class", "column_major", "compile", "const", "continue",
    "default", "discard", "do", "double", "dword", "else", "export", "extern", "false",
    "float", "float2", "float3", "float4", "float4x4", "for", "groupshared", "half", "if",
    "in", "inline", "inout", "int", "interface", "line", "lineadj", "linear", "main",
    "matrix", "namespace", "nointerpolation", "noperspective", "out", "packoffset", "pass",
    "point", "precise", "register", "return", "row_major", "sample", "sampler", "shared",
    "snorm", "static", "string", "struct", "switch", "tbuffer", "technique", "texture",
    "triangle", "triangleadj", "true", "typedef", "uint", "uniform", "unorm", "unsigned",
    "vector", "void", "volatile", "while",
];

pub(crate) fn types() -> TypeTable {
    TypeTable::new(&[
        (known::VOID, "void"),
        (known::BOOL, "bool"),
        (known::INT, "int"),
        (known::UINT, "uint"),
        (known::FLOAT, "float"),
        (known::VECTOR2, "float2"),
        (known::VECTOR3, "float3"),
        (known::VECTOR4, "float4"),
        (known::MATRIX4X4, "float4x4"),
        (known::TEXTURE2D_RESOURCE, "Texture2D"),
        (known::TEXTURE_CUBE_RESOURCE, "TextureCube"),
        (known::SAMPLER_RESOURCE, "SamplerState"),
    ])
}

pub(crate) fn identifiers() -> IdentifierTable {
    IdentifierTable::new(SwizzleTable::xyzw())
        .with_reserved(RESERVED)
        .with_static(known::VECTOR2, "Zero", "float2(0.0, 0.0)")
        .with_static(known::VECTOR2, "One", "float2(1.0, 1.0)")
        .with_static(known::VECTOR3, "Zero", "float3(0.0, 0.0, 0.0)")
        .with_static(known::VECTOR3, "One", "float3(1.0, 1.0, 1.0)")
        .with_static(known::VECTOR4, "Zero", "float4(0.0, 0.0, 0.0, 0.0)")
        .with_static(known::VECTOR4, "One", "float4(1.0, 1.0, 1.0, 1.0)")
        .with_static(
            known::MATRIX4X4,
            "Identity",
            "float4x4(1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1)",
        )
        .with_static(known::MATHF, "PI", "3.14159265358979")
        .with_static(known::MATHF, "E", "2.71828182845905")
}

pub(crate) fn intrinsics() -> IntrinsicTable {
    let mut table = IntrinsicTable::new();
    for (method, target) in [
        ("Dot", "dot"),
        ("Normalize", "normalize"),
        ("Length", "length"),
        ("Distance", "distance"),
        ("Lerp", "lerp"),
        ("Min", "min"),
        ("Max", "max"),
        ("Abs", "abs"),
        ("Clamp", "clamp"),
        ("SquareRoot", "sqrt"),
        ("Reflect", "reflect"),
    ] {
        table.insert_vector(method, Intrinsic::Rename(target));
    }
    table.insert(format!("{}.Cross", known::VECTOR3), Intrinsic::Rename("cross"));

    for (method, target) in [
        ("Sin", "sin"),
        ("Cos", "cos"),
        ("Tan", "tan"),
        ("Asin", "asin"),
        ("Acos", "acos"),
        ("Atan", "atan"),
        ("Atan2", "atan2"),
        ("Pow", "pow"),
        ("Sqrt", "sqrt"),
        ("Abs", "abs"),
        ("Floor", "floor"),
        ("Ceiling", "ceil"),
        ("Exp", "exp"),
        ("Log", "log"),
        ("Min", "min"),
        ("Max", "max"),
        ("Clamp", "clamp"),
    ] {
        table.insert_math(method, Intrinsic::Rename(target));
    }

    for (method, target) in [
        ("Mul", "mul"),
        ("Saturate", "saturate"),
        ("Frac", "frac"),
        ("Ddx", "ddx"),
        ("Ddy", "ddy"),
    ] {
        table.insert_builtin(method, Intrinsic::Rename(target));
    }
    table.insert_builtin("Mod", Intrinsic::Custom(floored_mod));
    table.insert_builtin("Sample", Intrinsic::Custom(sample));
    table
}

/// `Mod(x, y)` rounds the quotient down, like GLSL `mod`; `fmod` truncates.
fn floored_mod(args: &[IntrinsicArgument]) -> Option<String> {
    match args {
        [x, y] => {
            let (x, y) = (x.operand(), y.operand());
            Some(format!("({x} - {y} * floor({x} / {y}))"))
        }
        _ => None,
    }
}

/// `Sample(texture, sampler, coords)` as a texture object method.
fn sample(args: &[IntrinsicArgument]) -> Option<String> {
    match args {
        [texture, sampler, coords] => Some(format!(
            "{}.Sample({}, {})",
            texture.operand(),
            sampler.text,
            coords.text
        )),
        _ => None,
    }
}
