/// Character-count wrapping parameters for one text block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextWrap {
    /// Maximum characters per line (a single longer word still gets its own line).
    pub max_chars: usize,
    /// Extra pixels added to the representative glyph height between lines.
    pub line_spacing: f32,
}

impl TextWrap {
    /// Construct wrap parameters.
    pub const fn new(max_chars: usize, line_spacing: f32) -> Self {
        Self {
            max_chars,
            line_spacing,
        }
    }
}

/// Split on explicit newlines, then greedily wrap each paragraph on whitespace.
///
/// Words are never split. Runs of whitespace collapse to one space and blank paragraphs
/// produce no lines.
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0usize;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if line.is_empty() {
                line.push_str(word);
                line_len = word_len;
            } else if line_len + 1 + word_len <= max_chars {
                line.push(' ');
                line.push_str(word);
                line_len += 1 + word_len;
            } else {
                out.push(std::mem::take(&mut line));
                line.push_str(word);
                line_len = word_len;
            }
        }
        if !line.is_empty() {
            out.push(line);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
