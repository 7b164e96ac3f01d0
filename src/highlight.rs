//! Syntax highlighting of paste text into HTML fragments.

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::AppError;

/// Every paste is rendered with this theme.
pub const THEME: &str = "base16-ocean.dark";

pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    /// Load the bundled grammars and [`THEME`].
    pub fn new() -> crate::AppResult<Self> {
        let theme = ThemeSet::load_defaults()
            .themes
            .remove(THEME)
            .ok_or(AppError::MissingTheme(THEME))?;

        Ok(Highlighter {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    /// Render `text` as highlighted HTML, using plain text for unknown `lang`s.
    pub fn highlight(&self, lang: &str, text: &str) -> crate::AppResult<String> {
        let html = highlighted_html_for_string(text, &self.syntaxes, self.syntax(lang), &self.theme)?;
        Ok(html)
    }

    /// Name of the grammar `lang` resolves to.
    pub fn syntax_name(&self, lang: &str) -> &str {
        &self.syntax(lang).name
    }

    // by name or file extension, case-insensitive
    fn syntax(&self, lang: &str) -> &SyntaxReference {
        self.syntaxes
            .find_syntax_by_token(lang.trim())
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_languages_resolve() {
        let highlighter = Highlighter::new().unwrap();
        assert_eq!(highlighter.syntax_name("rust"), "Rust");
        assert_eq!(highlighter.syntax_name("rs"), "Rust");
        assert_eq!(highlighter.syntax_name("go"), "Go");
        assert_eq!(highlighter.syntax_name("Python"), "Python");
    }

    #[test]
    fn unknown_languages_fall_back_to_plain_text() {
        let highlighter = Highlighter::new().unwrap();
        assert_eq!(highlighter.syntax_name("text"), "Plain Text");
        assert_eq!(highlighter.syntax_name("no-such-language"), "Plain Text");
    }

    #[test]
    fn plain_text_is_kept_verbatim() {
        let highlighter = Highlighter::new().unwrap();
        let html = highlighter.highlight("text", "Hello world!").unwrap();
        assert!(html.starts_with("<pre"), "{html}");
        assert!(html.contains("Hello world!"), "{html}");
    }

    #[test]
    fn markup_is_escaped() {
        let highlighter = Highlighter::new().unwrap();
        let html = highlighter
            .highlight("text", "<script>alert(1)</script>")
            .unwrap();
        assert!(!html.contains("<script>"), "{html}");
        assert!(html.contains("&lt;script&gt;"), "{html}");
    }

    #[test]
    fn code_gets_styled_spans() {
        let highlighter = Highlighter::new().unwrap();
        let html = highlighter
            .highlight("rust", "fn main() {\n    println!(\"hi\");\n}\n")
            .unwrap();
        assert!(html.matches("<span").count() > 3, "{html}");
    }
}
