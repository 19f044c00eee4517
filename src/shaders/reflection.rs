use super::{Backend, ExtractError, ShaderStage, json::*, source::structs::scan_structs};

pub mod linker_dump;
pub mod locations;
pub mod spirv_json;
pub mod type_codes;

pub use linker_dump::parse_linker_dump;
pub use spirv_json::parse_analyzer_output;

/// Builds the interface from a linker reflection dump and the shader's source
///
/// The dump supplies uniforms and reflected attributes; source supplies explicit
/// locations, attributes the dump left out, and the struct table.
pub fn linker_reflection(
    dump: &str,
    source: &str,
    stage: ShaderStage,
) -> Result<ShaderInterface, ExtractError> {
    if stage.is_raytracing() {
        return Err(ExtractError::UnsupportedStage {
            stage,
            backend: Backend::LinkerReflection,
        });
    }

    let mut interface = parse_linker_dump(dump);
    if !stage.has_attributes() {
        interface.in_attributes.clear();
        interface.out_attributes.clear();
    }

    locations::apply_source_declarations(&mut interface, source, stage);
    interface.structs = scan_structs(source);

    Ok(interface)
}
