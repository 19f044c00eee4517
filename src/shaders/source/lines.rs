/// One physical source line, with its untouched text kept for struct capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    pub text: &'a str,
    /// whitespace-delimited tokens with `;` terminators removed
    pub tokens: Vec<&'a str>,
}

impl<'a> LogicalLine<'a> {
    pub fn new(text: &'a str) -> Self {
        let tokens = text
            .split_whitespace()
            .flat_map(split_comment)
            .map(|token| token.trim_matches(';'))
            .filter(|token| !token.is_empty())
            .collect();

        Self { text, tokens }
    }

    /// index of the first token that opens a `//` comment
    pub fn comment_index(&self) -> Option<usize> {
        self.tokens.iter().position(|token| token.starts_with("//"))
    }

    /// index of `keyword` when it appears before any `//` comment
    pub fn qualifier_index(&self, keyword: &str) -> Option<usize> {
        let index = self.tokens.iter().position(|token| *token == keyword)?;
        match self.comment_index() {
            Some(comment_index) if comment_index < index => None,
            _ => Some(index),
        }
    }

    /// the two tokens following the qualifier at `index`, as (type, name)
    pub fn declaration_after(&self, index: usize) -> Option<(&'a str, &'a str)> {
        let type_token = *self.tokens.get(index + 1)?;
        let name_token = *self.tokens.get(index + 2)?;
        if type_token.starts_with("//") || name_token.starts_with("//") {
            return None;
        }

        Some((type_token, name_token))
    }
}

/// splits `name;//comment` so the comment opens its own token
fn split_comment(token: &str) -> [&str; 2] {
    match token.find("//") {
        Some(index) if index > 0 => [&token[..index], &token[index..]],
        _ => [token, ""],
    }
}

pub fn logical_lines(source: &str) -> impl Iterator<Item = LogicalLine<'_>> {
    source.lines().map(LogicalLine::new)
}
