//! Declaration-level extraction from raw shader source text

use super::{ExtractError, ShaderStage, json::ShaderInterface};

mod declarations;
pub use declarations::*;

mod flatten;
pub use flatten::*;

pub mod lines;
pub mod structs;

/// raw-source extraction with struct-typed uniforms flattened
pub fn scan(source: &str, stage: ShaderStage) -> Result<ShaderInterface, ExtractError> {
    let mut interface = extract_declarations(source, stage)?;

    let uniforms = std::mem::take(&mut interface.uniforms);
    interface.uniforms = flatten_struct_uniforms(uniforms, &interface.structs);

    Ok(interface)
}
