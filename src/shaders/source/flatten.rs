use crate::shaders::json::*;

/// nested struct members deeper than this are kept as-is
const MAX_STRUCT_DEPTH: usize = 8;

/// Replaces every struct-typed uniform with one uniform per struct member
///
/// Plain uniforms keep their order; flattened sets are appended after them,
/// named `{uniform}.{member}`. Nested struct members are expanded the same way.
pub fn flatten_struct_uniforms(uniforms: Vec<Uniform>, structs: &[StructDef]) -> Vec<Uniform> {
    let mut flattened = Vec::with_capacity(uniforms.len());
    let mut struct_uniforms = vec![];

    for uniform in uniforms {
        match find_struct(structs, &uniform.type_name) {
            Some(struct_def) => struct_uniforms.push((uniform, struct_def)),
            None => flattened.push(uniform),
        }
    }

    for (uniform, struct_def) in struct_uniforms {
        flatten_members(&uniform.name, struct_def, structs, 0, &mut flattened);
    }

    flattened
}

/// the last struct defined with this type's name
fn find_struct<'a>(structs: &'a [StructDef], type_name: &TypeName) -> Option<&'a StructDef> {
    let TypeName::Custom(name) = type_name else {
        return None;
    };

    structs.iter().rev().find(|def| &def.name == name)
}

fn flatten_members(
    prefix: &str,
    struct_def: &StructDef,
    structs: &[StructDef],
    depth: usize,
    out: &mut Vec<Uniform>,
) {
    for member in &struct_def.members {
        let name = format!("{prefix}.{}", member.name);

        match find_struct(structs, &member.type_name) {
            Some(nested) if depth < MAX_STRUCT_DEPTH => {
                flatten_members(&name, nested, structs, depth + 1, out)
            }
            _ => out.push(Uniform::new(member.type_name.clone(), name)),
        }
    }
}
