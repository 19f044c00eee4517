use crate::shaders::json::*;

/// Collects `struct Name { ... };` spans that may cover several lines
#[derive(Debug, Default)]
pub enum StructScanner {
    #[default]
    Idle,
    CapturingStruct { buffer: String },
}

impl StructScanner {
    /// feeds one raw source line, returning a struct when its span closes on this line
    pub fn feed(&mut self, line: &str) -> Option<StructDef> {
        let code = strip_line_comment(line);
        if matches!(self, Self::Idle) && keyword_position(code, "struct").is_some() {
            *self = Self::CapturingStruct {
                buffer: String::new(),
            };
        }

        let Self::CapturingStruct { buffer } = self else {
            return None;
        };

        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(code);

        if !code.contains("};") {
            return None;
        }

        let captured = std::mem::take(buffer);
        *self = Self::Idle;

        parse_struct(&captured)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::CapturingStruct { .. })
    }
}

/// the struct table of a whole source file
pub fn scan_structs(source: &str) -> Vec<StructDef> {
    let mut scanner = StructScanner::default();
    source.lines().filter_map(|line| scanner.feed(line)).collect()
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn strip_line_comment(line: &str) -> &str {
    match line.find("//") {
        Some(index) => &line[..index],
        None => line,
    }
}

/// byte offset of `keyword` where it stands as a whole word
pub fn keyword_position(text: &str, keyword: &str) -> Option<usize> {
    text.match_indices(keyword).map(|(index, _)| index).find(|&index| {
        let before = text[..index].chars().next_back();
        let after = text[index + keyword.len()..].chars().next();
        !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
    })
}

/// parses a captured `struct Name { type name; ... };` span
pub fn parse_struct(captured: &str) -> Option<StructDef> {
    let after_keyword = &captured[keyword_position(captured, "struct")? + "struct".len()..];
    let open = after_keyword.find('{')?;

    let name: String = after_keyword[..open]
        .chars()
        .filter(|c| is_identifier_char(*c))
        .collect();
    if name.is_empty() {
        log::debug!("skipping anonymous struct: {captured}");
        return None;
    }

    let body = &after_keyword[open + 1..];
    let body = match body.find('}') {
        Some(close) => &body[..close],
        None => body,
    };
    let body: String = body
        .chars()
        .filter(|c| is_identifier_char(*c) || *c == ' ' || *c == ';')
        .collect();

    let members = body
        .split(';')
        .filter_map(|clause| {
            let mut tokens = clause.split_whitespace();
            let type_token = tokens.next()?;
            let name_token = tokens.next()?;

            Some(StructMember {
                type_name: TypeName::parse(type_token),
                name: name_token.to_string(),
            })
        })
        .collect();

    Some(StructDef::new(name, members))
}
