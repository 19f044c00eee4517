use serde::Deserialize;

use crate::shaders::{ExtractError, json::*};

/// The analyzer's reflection document; all four arrays are required
#[derive(Debug, Deserialize)]
pub struct AnalyzerDocument {
    pub inputs: Vec<Attribute>,
    pub outputs: Vec<Attribute>,
    pub structs: Vec<StructDef>,
    pub uniforms: Vec<Uniform>,
}

impl From<AnalyzerDocument> for ShaderInterface {
    fn from(document: AnalyzerDocument) -> Self {
        Self {
            uniforms: document.uniforms,
            in_attributes: document.inputs,
            out_attributes: document.outputs,
            structs: document.structs,
        }
    }
}

pub fn parse_analyzer_output(stdout: &str) -> Result<ShaderInterface, ExtractError> {
    let document: AnalyzerDocument = serde_json::from_str(stdout)?;
    Ok(document.into())
}
