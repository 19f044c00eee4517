use log::*;

use crate::shaders::json::TypeName;

/// Translates a linker reflection type code (hex, as printed in the dump) into a type name
///
/// Codes without a table entry become `undefined`.
pub fn translate_type_code(code: &str) -> TypeName {
    let digits = code.trim().trim_start_matches("0x");
    let Ok(code) = u32::from_str_radix(digits, 16) else {
        debug!("unparseable reflection type code: {code}");
        return TypeName::Undefined;
    };

    match code {
        0x8b5c => TypeName::Mat4,
        0x8b5b => TypeName::Mat3,
        0x8b51 => TypeName::Vec3,
        0x8b50 => TypeName::Vec2,
        0x8b5e => TypeName::Sampler2D,
        0x8b52 => TypeName::Vec4,
        0x904d => TypeName::Image2D,
        0x8b60 => TypeName::SamplerCube,
        0x1406 => TypeName::Float,
        0x1404 => TypeName::Int,
        unknown => {
            debug!("no type name for reflection type code {unknown:#x}");
            TypeName::Undefined
        }
    }
}
