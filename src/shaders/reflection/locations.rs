use log::*;

use crate::shaders::{
    ShaderStage,
    json::*,
    source::{is_identifier, structs::strip_line_comment},
};

/// An interface declaration recovered from source, with its explicit location if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDeclaration {
    pub qualifier: Qualifier,
    pub attribute: Attribute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    In,
    Out,
}

/// the `;`-separated declarations before `void main`
///
/// The first line (the version directive) is dropped, as are preprocessor
/// lines and trailing `//` comments.
pub fn interface_clauses(source: &str) -> Vec<String> {
    let mut text = String::new();
    for line in source.lines().skip(1) {
        if line.contains("void main") {
            break;
        }

        let code = strip_line_comment(line).trim();
        if code.is_empty() || code.starts_with('#') {
            continue;
        }

        text.push_str(code);
        text.push(' ');
    }

    text.split(';')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(str::to_string)
        .collect()
}

/// the integer assigned to `location` in a clause's parenthesized qualifier list
pub fn explicit_location(clause: &str) -> Option<u32> {
    let open = clause.find('(')?;
    let close = open + clause[open..].find(')')?;

    clause[open + 1..close].split(',').find_map(|assignment| {
        let (key, value) = assignment.split_once('=')?;
        if key.trim() != "location" {
            return None;
        }
        value.trim().parse().ok()
    })
}

pub fn parse_declaration(clause: &str) -> Option<InterfaceDeclaration> {
    let declaration = match clause.rfind(')') {
        Some(close) => &clause[close + 1..],
        None => clause,
    };
    let tokens: Vec<&str> = declaration.split_whitespace().collect();

    let (index, qualifier) = tokens.iter().enumerate().find_map(|(i, token)| match *token {
        "in" => Some((i, Qualifier::In)),
        "out" => Some((i, Qualifier::Out)),
        _ => None,
    })?;

    let type_token = *tokens.get(index + 1)?;
    let name = *tokens.get(index + 2)?;
    if !is_identifier(type_token) || !is_identifier(name) {
        debug!("skipping malformed interface declaration: {clause}");
        return None;
    }

    let mut attribute = Attribute::new(TypeName::parse(type_token), name);
    attribute.location = explicit_location(clause);

    Some(InterfaceDeclaration {
        qualifier,
        attribute,
    })
}

/// Merges source-declared interface variables into a reflected interface
///
/// Reflected entries win. Vertex inputs take their explicit locations from
/// source; fragment inputs and non-fragment outputs are added from source when
/// the dump left them out.
pub fn apply_source_declarations(
    interface: &mut ShaderInterface,
    source: &str,
    stage: ShaderStage,
) {
    if !stage.has_attributes() {
        return;
    }

    for clause in interface_clauses(source) {
        let Some(InterfaceDeclaration {
            qualifier,
            mut attribute,
        }) = parse_declaration(&clause)
        else {
            continue;
        };

        match qualifier {
            Qualifier::In if stage == ShaderStage::Vertex => {
                let reflected = interface
                    .in_attributes
                    .iter_mut()
                    .find(|reflected| reflected.name == attribute.name);

                match reflected {
                    Some(reflected) => {
                        if reflected.location.is_none() {
                            reflected.location = attribute.location;
                        }
                    }
                    None => interface.in_attributes.push(attribute),
                }
            }
            Qualifier::In => {
                attribute.location = None;
                add_missing(&mut interface.in_attributes, attribute);
            }
            Qualifier::Out if stage != ShaderStage::Fragment => {
                attribute.location = None;
                add_missing(&mut interface.out_attributes, attribute);
            }
            Qualifier::Out => {}
        }
    }
}

fn add_missing(attributes: &mut Vec<Attribute>, attribute: Attribute) {
    if attributes.iter().any(|existing| existing.name == attribute.name) {
        return;
    }
    attributes.push(attribute);
}
