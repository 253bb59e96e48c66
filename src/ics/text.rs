//! Content-line handling: folding, unfolding, splitting, and text escaping.

use std::collections::HashMap;

/// RFC 5545 recommends folding content lines at 75 octets.
pub const FOLD_WIDTH: usize = 75;

/// Normalize line endings to `\n` and join folded continuation lines
/// (a newline followed by a single space or tab).
pub fn unfold_lines(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(normalized.len());
    let mut chars = normalized.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' && matches!(chars.peek(), Some(' ') | Some('\t')) {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// Fold a single content line at [`FOLD_WIDTH`] octets, breaking only at
/// character boundaries. Continuation lines begin with one space, which
/// counts toward their width.
pub fn fold_line(line: &str) -> String {
    if line.len() <= FOLD_WIDTH {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + 3 * (line.len() / FOLD_WIDTH));
    let mut width = 0;
    for c in line.chars() {
        let octets = c.len_utf8();
        if width + octets > FOLD_WIDTH {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += octets;
    }
    out
}

/// One unfolded property line: `NAME;PARAM=VALUE;...:value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    pub name: String,
    pub params: HashMap<String, String>,
    pub value: String,
}

impl ContentLine {
    /// Split at the first colon. A line without one yields an empty name and
    /// the whole line as the value; parameter tokens without `=` are omitted.
    pub fn parse(line: &str) -> Self {
        let Some(colon) = line.find(':') else {
            return Self {
                name: String::new(),
                params: HashMap::new(),
                value: line.to_string(),
            };
        };

        let name_part = &line[..colon];
        let value = line[colon + 1..].to_string();

        let mut segments = name_part.split(';');
        let name = segments.next().unwrap_or_default().to_string();
        let mut params = HashMap::new();
        for segment in segments {
            if let Some((key, param_value)) = segment.split_once('=') {
                params.insert(key.to_string(), param_value.to_string());
            }
        }

        Self { name, params, value }
    }
}

/// Escape text for emission: `\` `;` `,` and newline.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Exact inverse of [`escape_text`]; additionally accepts `\N` as a newline.
/// Unknown escape sequences are preserved verbatim.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(';') => out.push(';'),
            Some(',') => out.push(','),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
