//! Splicing of literal host-code sections into the generated artifacts.

use fpc_ir::{Module, SectionKind};

/// Returns the verbatim text of a section, if the document declares it.
/// Section text is spliced byte-for-byte, embedded whitespace included;
/// whatever line structure the author wrote is what the artifact gets.
pub fn text(module: &Module, kind: SectionKind) -> Option<&str> {
    module.section(kind).map(|s| s.text.as_str())
}

/// Whether `word` occurs in `text` as a whole identifier.
pub fn contains_ident(text: &str, word: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = text[start..].find(word) {
        let i = start + pos;
        let before_ok = i == 0 || !is_ident_char(text.as_bytes()[i - 1]);
        let after = i + word.len();
        let after_ok = after >= text.len() || !is_ident_char(text.as_bytes()[after]);
        if before_ok && after_ok {
            return true;
        }
        start = i + 1;
    }
    false
}

/// Rewrites identifier occurrences of `declared` to `actual` in section
/// text, respecting identifier boundaries so that `d` never rewrites
/// the middle of `pdman`.
pub fn bind_param(text: &str, declared: &str, actual: &str) -> String {
    if declared == actual || declared.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if text[i..].starts_with(declared) {
            let before_ok = i == 0 || !is_ident_char(bytes[i - 1]);
            let after = i + declared.len();
            let after_ok = after >= bytes.len() || !is_ident_char(bytes[after]);
            if before_ok && after_ok {
                out.push_str(actual);
                i = after;
                continue;
            }
        }
        let ch = text[i..].chars().next().unwrap_or('\0');
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

fn is_ident_char(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// Extracts the argument names from a `@constructorParams` parameter
/// list: the last identifier of each comma-separated declaration.
pub fn param_names(text: &str) -> Vec<String> {
    text.split(',')
        .filter_map(|decl| {
            decl.split_whitespace()
                .last()
                .map(|name| name.trim_start_matches(['*', '&']).to_string())
        })
        .filter(|name| !name.is_empty())
        .collect()
}
