use log::*;

use crate::shaders::{Backend, ExtractError, ShaderStage, json::*};

use super::lines::{LogicalLine, logical_lines};
use super::structs::StructScanner;

/// Collects uniform, `in` and `out` declarations and the struct table from raw source
///
/// Uniforms are returned as declared; struct-typed ones are not flattened yet.
pub fn extract_declarations(
    source: &str,
    stage: ShaderStage,
) -> Result<ShaderInterface, ExtractError> {
    if stage.is_raytracing() {
        return Err(ExtractError::UnsupportedStage {
            stage,
            backend: Backend::Source,
        });
    }

    let mut interface = ShaderInterface::default();
    let mut struct_scanner = StructScanner::default();

    for line in logical_lines(source) {
        if let Some(struct_def) = struct_scanner.feed(line.text) {
            interface.structs.push(struct_def);
        }

        if let Some((type_token, name)) = declaration(&line, "uniform") {
            interface
                .uniforms
                .push(Uniform::new(TypeName::parse(type_token), name));
        }

        if !stage.has_attributes() {
            continue;
        }

        if let Some((type_token, name)) = declaration(&line, "in") {
            interface
                .in_attributes
                .push(Attribute::new(TypeName::parse(type_token), name));
        }

        if let Some((type_token, name)) = declaration(&line, "out") {
            interface
                .out_attributes
                .push(Attribute::new(TypeName::parse(type_token), name));
        }
    }

    Ok(interface)
}

/// (type, name) following `keyword`, if the line declares one
fn declaration<'a>(line: &LogicalLine<'a>, keyword: &str) -> Option<(&'a str, &'a str)> {
    let index = line.qualifier_index(keyword)?;

    let Some((type_token, name_token)) = line.declaration_after(index) else {
        debug!("skipping malformed '{keyword}' declaration: {}", line.text);
        return None;
    };

    let name = declared_name(name_token);
    if !is_identifier(type_token) || !is_identifier(name) {
        debug!("skipping malformed '{keyword}' declaration: {}", line.text);
        return None;
    }

    Some((type_token, name))
}

/// strips an array suffix or list separator from a declared name
fn declared_name(token: &str) -> &str {
    let token = token.trim_end_matches(',');
    match token.find('[') {
        Some(index) => &token[..index],
        None => token,
    }
}

pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
