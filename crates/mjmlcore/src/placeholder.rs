use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{-?\s*(.*?)\s*-?\}\}")
        .expect("Invalid PLACEHOLDER regex pattern");
}

/// A `{{ ... }}` templating action found in a line of template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Byte range of the whole action, braces included.
    pub range: Range<usize>,
    /// The trimmed expression between the braces, e.g. `.Name`.
    pub expr: String,
}

impl Placeholder {
    /// Whether the action reads a field of the render data (`.Field`).
    pub fn is_field(&self) -> bool {
        self.expr.starts_with('.')
    }
}

/// Finds every templating action in `src`, in order of appearance.
///
/// Actions never nest, so matches are disjoint. An unterminated `{{`
/// is plain text.
pub fn placeholders(src: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .captures_iter(src)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let expr = caps.get(1).map_or("", |m| m.as_str());
            Some(Placeholder {
                range: whole.range(),
                expr: expr.to_string(),
            })
        })
        .collect()
}

/// Field names referenced by the template, deduplicated, in order of first use.
pub fn field_names(src: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for placeholder in placeholders(src) {
        if !placeholder.is_field() {
            continue;
        }
        let name = placeholder.expr.trim_start_matches('.');
        let name = name.split_whitespace().next().unwrap_or("");
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
