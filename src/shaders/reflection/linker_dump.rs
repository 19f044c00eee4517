use log::*;

use crate::shaders::json::*;

use super::type_codes::translate_type_code;

/// The dump section a line belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    None,
    Uniform,
    UniformBlock,
    BufferVariable,
    BufferBlock,
    PipelineInput,
    PipelineOutput,
}

impl Section {
    /// the section introduced by a header line, if `line` is one
    pub fn from_header(line: &str) -> Option<Self> {
        let line = line.trim();
        let section = if line.starts_with("Uniform reflection") {
            Self::Uniform
        } else if line.starts_with("Uniform block reflection") {
            Self::UniformBlock
        } else if line.starts_with("Buffer variable reflection") {
            Self::BufferVariable
        } else if line.starts_with("Buffer block reflection") {
            Self::BufferBlock
        } else if line.starts_with("Pipeline input reflection") {
            Self::PipelineInput
        } else if line.starts_with("Pipeline output reflection") {
            Self::PipelineOutput
        } else {
            return None;
        };

        Some(section)
    }
}

/// A data line of the dump: `name: field value, field value, ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpEntry<'a> {
    pub name: &'a str,
    pub type_name: TypeName,
    pub size: Option<u32>,
}

impl<'a> DumpEntry<'a> {
    pub fn parse(line: &'a str) -> Option<Self> {
        let (name, fields) = line.split_once(':')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut type_name = TypeName::Undefined;
        let mut size = None;
        for field in fields.split(',').map(str::trim) {
            let mut words = field.split_whitespace();
            match (words.next(), words.next()) {
                (Some("type"), Some(code)) => type_name = translate_type_code(code),
                (Some("size"), Some(value)) => size = value.parse().ok(),
                _ => {}
            }
        }

        Some(Self {
            name,
            type_name,
            size,
        })
    }
}

/// Section-tracking parser over a linker's reflection dump
#[derive(Debug, Default)]
pub struct LinkerDumpParser {
    section: Section,
    uniforms: Vec<Uniform>,
    in_attributes: Vec<Attribute>,
    out_attributes: Vec<Attribute>,
}

impl LinkerDumpParser {
    pub fn section(&self) -> Section {
        self.section
    }

    pub fn feed(&mut self, line: &str) {
        if let Some(section) = Section::from_header(line) {
            self.section = section;
            return;
        }

        let record_section = matches!(
            self.section,
            Section::Uniform | Section::PipelineInput | Section::PipelineOutput
        );
        if !record_section {
            return;
        }

        let Some(entry) = DumpEntry::parse(line) else {
            return;
        };
        trace!("{:?} reflection entry: {entry:?}", self.section);

        match self.section {
            Section::Uniform => self.uniforms.push(Uniform {
                count: entry.size.unwrap_or(0),
                ..Uniform::new(entry.type_name, entry.name)
            }),
            Section::PipelineInput => self
                .in_attributes
                .push(Attribute::new(entry.type_name, entry.name)),
            Section::PipelineOutput => self
                .out_attributes
                .push(Attribute::new(entry.type_name, entry.name)),
            _ => {}
        }
    }

    /// the reflected uniforms and attributes; structs are not part of the dump
    pub fn finish(self) -> ShaderInterface {
        ShaderInterface {
            uniforms: self.uniforms,
            in_attributes: self.in_attributes,
            out_attributes: self.out_attributes,
            structs: vec![],
        }
    }
}

pub fn parse_linker_dump(dump: &str) -> ShaderInterface {
    let mut parser = LinkerDumpParser::default();
    for line in dump.lines() {
        parser.feed(line);
    }

    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
shaders/source/model.vert
Uniform reflection:
model: offset -1, type 8b5c, size 1, index -1, binding -1, stages 1
bones: offset -1, type 8b5c, size 32, index -1, binding -1, stages 1
tint: offset -1, type ffff, index -1, binding -1, stages 1

Uniform block reflection:
Matrices: offset -1, type ffffffff, size 128, index -1, binding 0, stages 1

Buffer variable reflection:

Buffer block reflection:

Pipeline input reflection:
aPos: offset 0, type 8b51, size 1, index 0, binding -1, stages 1
aTexCoords: offset 0, type 8b50, size 1, index 0, binding -1, stages 1

Pipeline output reflection:
";

    #[test]
    fn section_transitions() {
        let mut parser = LinkerDumpParser::default();
        assert_eq!(parser.section(), Section::None);

        parser.feed("Uniform reflection:");
        assert_eq!(parser.section(), Section::Uniform);
        parser.feed("Uniform block reflection:");
        assert_eq!(parser.section(), Section::UniformBlock);
        parser.feed("Buffer variable reflection:");
        assert_eq!(parser.section(), Section::BufferVariable);
        parser.feed("Buffer block reflection:");
        assert_eq!(parser.section(), Section::BufferBlock);
        parser.feed("Pipeline input reflection:");
        assert_eq!(parser.section(), Section::PipelineInput);
        parser.feed("Pipeline output reflection:");
        assert_eq!(parser.section(), Section::PipelineOutput);

        let interface = parser.finish();
        assert!(interface.is_empty());
    }

    #[test]
    fn dump_entries() {
        let interface = parse_linker_dump(DUMP);

        assert_eq!(
            interface.uniforms,
            vec![
                Uniform::new(TypeName::Mat4, "model"),
                Uniform {
                    count: 32,
                    ..Uniform::new(TypeName::Mat4, "bones")
                },
                Uniform {
                    count: 0,
                    ..Uniform::new(TypeName::Undefined, "tint")
                },
            ]
        );
        assert_eq!(
            interface.in_attributes,
            vec![
                Attribute::new(TypeName::Vec3, "aPos"),
                Attribute::new(TypeName::Vec2, "aTexCoords"),
            ]
        );
        assert!(interface.out_attributes.is_empty());
    }

    #[test]
    fn block_sections_record_nothing() {
        let dump = "\
Uniform block reflection:
Matrices: offset -1, type ffffffff, size 128, index -1, binding 0, stages 1
Buffer block reflection:
Particles: offset -1, type ffffffff, size 0, index -1, binding 1, stages 32";

        assert!(parse_linker_dump(dump).is_empty());
    }

    #[test]
    fn lines_before_any_header_are_ignored() {
        let interface = parse_linker_dump("shader.frag: compiled\nWARNING: 0:1: something");

        assert!(interface.is_empty());
    }

    #[test]
    fn entry_type_translation() {
        let entry = DumpEntry::parse("view: offset -1, type 8b5c, size 1").unwrap();
        assert_eq!(entry.type_name, TypeName::Mat4);

        let entry = DumpEntry::parse("mystery: offset -1, type ffff").unwrap();
        assert_eq!(entry.type_name, TypeName::Undefined);
        assert_eq!(entry.size, None);
    }
}
