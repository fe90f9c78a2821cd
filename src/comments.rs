//! Heuristic comment removal keyed on file extension.
//!
//! This is line-oriented pattern matching, not parsing: comment markers
//! inside string literals are removed too.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::selector::file_extension;

const C_STYLE_EXTENSIONS: &[&str] = &[
    ".js", ".jsx", ".ts", ".tsx", ".java", ".cs", ".cpp", ".c", ".h", ".go", ".rs", ".dart",
    ".kt", ".scala", ".swift", ".php", ".css", ".scss", ".less",
];

const HASH_STYLE_EXTENSIONS: &[&str] = &[
    ".py", ".rb", ".pl", ".sh", ".yaml", ".yml", ".toml", ".dockerfile",
];

const MARKUP_EXTENSIONS: &[&str] = &[".html", ".xml", ".svg"];

// A `//` right after a colon is left alone so `http://` survives.
static C_STYLE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)/\*[\s\S]*?\*/|([^:]|^)//.*$").expect("valid regex"));

static HASH_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|[^\\])#.*$").expect("valid regex"));

static MARKUP_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--[\s\S]*?-->").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    CStyle,
    Hash,
    Markup,
}

impl CommentStyle {
    pub fn for_path(path: &str) -> Option<Self> {
        let ext = file_extension(path);
        let ext = ext.as_str();
        if C_STYLE_EXTENSIONS.contains(&ext) {
            Some(Self::CStyle)
        } else if HASH_STYLE_EXTENSIONS.contains(&ext) {
            Some(Self::Hash)
        } else if MARKUP_EXTENSIONS.contains(&ext) {
            Some(Self::Markup)
        } else {
            None
        }
    }
}

/// Strips comments from `content` according to `path`'s extension.
///
/// Recognized files come back trimmed; anything else is returned unchanged.
pub fn strip_comments(content: &str, path: &str) -> String {
    match CommentStyle::for_path(path) {
        Some(CommentStyle::CStyle) => C_STYLE_COMMENT
            .replace_all(content, "${1}")
            .trim()
            .to_string(),
        Some(CommentStyle::Hash) => HASH_COMMENT
            .replace_all(content, "${1}")
            .trim()
            .to_string(),
        Some(CommentStyle::Markup) => MARKUP_COMMENT.replace_all(content, "").trim().to_string(),
        None => content.to_string(),
    }
}
