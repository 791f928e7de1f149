//! Canonical names of the host types every backend knows how to map.

pub const VOID: &str = "System.Void";
pub const BOOL: &str = "System.Boolean";
pub const INT: &str = "System.Int32";
pub const UINT: &str = "System.UInt32";
pub const FLOAT: &str = "System.Single";

pub const VECTOR2: &str = "System.Numerics.Vector2";
pub const VECTOR3: &str = "System.Numerics.Vector3";
pub const VECTOR4: &str = "System.Numerics.Vector4";
pub const MATRIX4X4: &str = "System.Numerics.Matrix4x4";

/// Static math functions and constants (`MathF.Sin`, `MathF.PI`, ...).
pub const MATHF: &str = "System.MathF";

/// Shader-only helper functions (`Mul`, `Sample`, `Saturate`, ...).
pub const SHADER_BUILTINS: &str = "Shadegen.ShaderBuiltins";

pub const TEXTURE2D_RESOURCE: &str = "Shadegen.Texture2DResource";
pub const TEXTURE_CUBE_RESOURCE: &str = "Shadegen.TextureCubeResource";
pub const SAMPLER_RESOURCE: &str = "Shadegen.SamplerResource";

/// Returns the component count of a known floating-point vector type.
pub fn vector_width(name: &str) -> Option<usize> {
    match name {
        VECTOR2 => Some(2),
        VECTOR3 => Some(3),
        VECTOR4 => Some(4),
        _ => None,
    }
}
