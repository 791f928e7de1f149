//! GLSL spellings of host types, members, and library calls.

use shadegen_backend_core::{IdentifierTable, Intrinsic, IntrinsicArgument, IntrinsicTable, SwizzleTable, TypeTable};
use shadegen_ir::{ShaderResourceKind, known};

use crate::GlslVariant;

/// Words a user identifier must not collide with: GLSL keywords, reserved
/// words, and the names the synthesized `main` uses.
const RESERVED: &[&str] = &[
    "active", "asm", "atomic_uint", "attribute", "bool", "break", "buffer", "bvec2", "bvec3",
    "bvec4", "case", "cast", "centroid", "class", "coherent", "common", "const", "continue",
    "default", "discard", "dmat2", "dmat3", "dmat4", "do", "double", "dvec2", "dvec3", "dvec4",
    "else", "enum", "extern", "external", "false", "filter", "fixed", "flat", "float", "for",
    "goto", "half", "highp", "if", "in", "inline", "input", "int", "interface", "invariant",
    "inout", "isampler2D", "isamplerCube", "ivec2", "ivec3", "ivec4", "layout", "long", "lowp",
    "main", "mat2", "mat3", "mat4", "mediump", "namespace", "noinline", "noperspective", "out",
    "output", "partition", "patch", "precise", "precision", "public", "readonly", "resource",
    "restrict", "return", "sample", "sampler", "sampler2D", "samplerCube", "shared", "short",
    "sizeof", "smooth", "static", "struct", "subroutine", "superp", "switch", "template",
    "texture2D", "textureCube", "this", "true", "typedef", "uint", "uniform", "union",
    "unsigned", "using", "uvec2", "uvec3", "uvec4", "varying", "vec2", "vec3", "vec4", "void",
    "volatile", "while", "writeonly",
];

pub(crate) fn types(variant: GlslVariant) -> TypeTable {
    let (texture_2d, texture_cube) = if variant.separate_samplers() {
        ("texture2D", "textureCube")
    } else {
        ("sampler2D", "samplerCube")
    };
    let mut entries = vec![
        (known::VOID, "void"),
        (known::BOOL, "bool"),
        (known::INT, "int"),
        (known::UINT, "uint"),
        (known::FLOAT, "float"),
        (known::VECTOR2, "vec2"),
        (known::VECTOR3, "vec3"),
        (known::VECTOR4, "vec4"),
        (known::MATRIX4X4, "mat4"),
        (known::TEXTURE2D_RESOURCE, texture_2d),
        (known::TEXTURE_CUBE_RESOURCE, texture_cube),
    ];
    if variant.separate_samplers() {
        entries.push((known::SAMPLER_RESOURCE, "sampler"));
    }
    TypeTable::new(&entries)
}

pub(crate) fn identifiers() -> IdentifierTable {
    IdentifierTable::new(SwizzleTable::xyzw())
        .with_reserved(RESERVED)
        .with_static(known::VECTOR2, "Zero", "vec2(0.0)")
        .with_static(known::VECTOR2, "One", "vec2(1.0)")
        .with_static(known::VECTOR3, "Zero", "vec3(0.0)")
        .with_static(known::VECTOR3, "One", "vec3(1.0)")
        .with_static(known::VECTOR4, "Zero", "vec4(0.0)")
        .with_static(known::VECTOR4, "One", "vec4(1.0)")
        .with_static(known::MATRIX4X4, "Identity", "mat4(1.0)")
        .with_static(known::MATHF, "PI", "3.14159265358979")
        .with_static(known::MATHF, "E", "2.71828182845905")
}

pub(crate) fn intrinsics(variant: GlslVariant) -> IntrinsicTable {
    let mut table = IntrinsicTable::new();
    for (method, target) in [
        ("Dot", "dot"),
        ("Normalize", "normalize"),
        ("Length", "length"),
        ("Distance", "distance"),
        ("Lerp", "mix"),
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
        ("Atan2", "atan"),
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

    table.insert_builtin("Mul", Intrinsic::Custom(mul));
    table.insert_builtin("Saturate", Intrinsic::Custom(saturate));
    table.insert_builtin("Frac", Intrinsic::Rename("fract"));
    table.insert_builtin("Mod", Intrinsic::Rename("mod"));
    table.insert_builtin("Ddx", Intrinsic::Rename("dFdx"));
    table.insert_builtin("Ddy", Intrinsic::Rename("dFdy"));
    let sample: fn(&[IntrinsicArgument]) -> Option<String> = if variant.separate_samplers() {
        sample_separate
    } else {
        sample_combined
    };
    table.insert_builtin("Sample", Intrinsic::Custom(sample));
    table
}

fn mul(args: &[IntrinsicArgument]) -> Option<String> {
    match args {
        [a, b] => Some(format!("({} * {})", a.operand(), b.operand())),
        _ => None,
    }
}

fn saturate(args: &[IntrinsicArgument]) -> Option<String> {
    match args {
        [x] => Some(format!("clamp({}, 0.0, 1.0)", x.text)),
        _ => None,
    }
}

/// `Sample(texture, sampler, coords)` where textures carry their sampler.
fn sample_combined(args: &[IntrinsicArgument]) -> Option<String> {
    match args {
        [texture, _sampler, coords] => Some(format!("texture({}, {})", texture.text, coords.text)),
        _ => None,
    }
}

/// `Sample(texture, sampler, coords)` with separate objects, combined at the call.
fn sample_separate(args: &[IntrinsicArgument]) -> Option<String> {
    let [texture, sampler, coords] = args else {
        return None;
    };
    let combined = match texture.resource? {
        ShaderResourceKind::Texture2D => "sampler2D",
        ShaderResourceKind::TextureCube => "samplerCube",
        _ => return None,
    };
    Some(format!(
        "texture({combined}({}, {}), {})",
        texture.text, sampler.text, coords.text
    ))
}
