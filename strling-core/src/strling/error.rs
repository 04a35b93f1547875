//! Parse errors with source context and editor diagnostics
//!
//! Every failure in the pipeline is a [`ParseError`]. Errors raised by the
//! parser are "rich": they carry the source text they point into and, when
//! the [hint engine](crate::strling::hints) knows the message, an instructional
//! hint.
//!
//! Rendering:
//!
//!     STRling Parse Error: Unterminated group
//!
//!     > 1 | (abc
//!     >   |     ^
//!
//!     Hint: This group was opened with '(' but never closed. ...
//!
//! Positions are counted in chars, not bytes.

use crate::strling::hints;
use lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};
use std::fmt;

pub type ParseResult<T> = Result<T, ParseError>;

/// Source name reported on editor diagnostics.
pub const DIAGNOSTIC_SOURCE: &str = "STRling";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// Char offset into `text`.
    pub pos: usize,
    pub text: String,
    pub hint: Option<String>,
}

impl ParseError {
    /// A bare error with no source attached.
    pub fn new(message: impl Into<String>, pos: usize) -> Self {
        ParseError {
            message: message.into(),
            pos,
            text: String::new(),
            hint: None,
        }
    }

    /// Attach the source text and look up a hint for the message.
    pub fn with_context(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self.hint = hints::get_hint(&self.message, text, self.pos);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn without_hint(mut self) -> Self {
        self.hint = None;
        self
    }

    /// 1-based line number and 0-based column of `pos`.
    ///
    /// A position past the end clamps to the end of the last line.
    pub fn line_col(&self) -> (usize, usize) {
        let (line, col, _) = self.locate();
        (line, col)
    }

    fn locate(&self) -> (usize, usize, &str) {
        let mut start = 0;
        let mut last = (1, 0, "");
        for (idx, line) in self.text.lines().enumerate() {
            let len = line.chars().count();
            // +1 for the newline that `lines()` strips
            if self.pos < start + len + 1 {
                return (idx + 1, self.pos - start, line);
            }
            last = (idx + 1, len, line);
            start += len + 1;
        }
        last
    }

    /// The multi-line diagnostic with source line, caret and hint.
    pub fn to_formatted_string(&self) -> String {
        if self.text.is_empty() {
            return format!("{} at position {}", self.message, self.pos);
        }

        let (line_num, col, line_text) = self.locate();
        let mut parts = vec![
            format!("STRling Parse Error: {}", self.message),
            String::new(),
            format!("> {} | {}", line_num, line_text),
            format!(">   | {}^", " ".repeat(col)),
        ];
        if let Some(hint) = &self.hint {
            parts.push(String::new());
            parts.push(format!("Hint: {}", hint));
        }
        parts.join("\n")
    }

    /// Stable machine-readable code derived from the message, e.g.
    /// `"Unterminated group"` -> `"unterminated_group"`.
    pub fn code(&self) -> String {
        let mut code = String::with_capacity(self.message.len());
        for ch in self.message.chars() {
            if ch.is_ascii_alphanumeric() {
                code.push(ch.to_ascii_lowercase());
            } else if !code.ends_with('_') {
                code.push('_');
            }
        }
        code.trim_matches('_').to_string()
    }

    /// Convert to an LSP diagnostic spanning the offending character.
    pub fn to_lsp_diagnostic(&self) -> Diagnostic {
        let (line, col) = self.line_col();
        let start = Position::new(line.saturating_sub(1) as u32, col as u32);
        let end = Position::new(start.line, start.character + 1);

        let message = match &self.hint {
            Some(hint) => format!("{}\n\nHint: {}", self.message, hint),
            None => self.message.clone(),
        };

        Diagnostic {
            range: Range::new(start, end),
            severity: Some(DiagnosticSeverity::ERROR),
            code: Some(NumberOrString::String(self.code())),
            code_description: None,
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message,
            related_information: None,
            tags: None,
            data: None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_formatted_string())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(message: &str, pos: usize, text: &str) -> ParseError {
        ParseError::new(message, pos).with_context(text)
    }

    #[test]
    fn test_bare_error_display() {
        let err = ParseError::new("Unexpected trailing input", 3);
        assert_eq!(err.to_string(), "Unexpected trailing input at position 3");
    }

    #[test]
    fn test_formatted_with_hint() {
        let err = error("Unterminated group", 4, "(abc");
        assert_eq!(
            err.to_formatted_string(),
            "STRling Parse Error: Unterminated group\n\n> 1 | (abc\n>   |     ^\n\nHint: This group was opened with '(' but never closed. Add a matching ')' to close the group."
        );
    }

    #[test]
    fn test_formatted_without_hint() {
        let err = ParseError::new("Something odd", 1).with_context("ab");
        assert_eq!(
            err.to_formatted_string(),
            "STRling Parse Error: Something odd\n\n> 1 | ab\n>   |  ^"
        );
    }

    #[test]
    fn test_line_col_multiline() {
        let err = ParseError::new("x", 5).with_context("ab\ncdef\ng");
        assert_eq!(err.line_col(), (2, 2));
        let first = ParseError::new("x", 2).with_context("ab\ncd");
        assert_eq!(first.line_col(), (1, 2));
    }

    #[test]
    fn test_position_past_end_clamps_to_last_line() {
        let err = ParseError::new("x", 99).with_context("ab\ncd");
        assert_eq!(err.line_col(), (2, 2));
    }

    #[test]
    fn test_positions_count_chars() {
        let err = ParseError::new("x", 2).with_context("éé(");
        assert_eq!(err.line_col(), (1, 2));
    }

    #[test]
    fn test_code() {
        assert_eq!(
            ParseError::new("Unterminated group", 0).code(),
            "unterminated_group"
        );
        assert_eq!(
            ParseError::new("Unterminated \\x{...}", 0).code(),
            "unterminated_x"
        );
        assert_eq!(
            ParseError::new("Invalid quantifier '*'", 0).code(),
            "invalid_quantifier"
        );
    }

    #[test]
    fn test_lsp_diagnostic() {
        let diag = error("Unterminated character class", 3, "ab\n[cd").to_lsp_diagnostic();
        assert_eq!(diag.range.start, Position::new(1, 0));
        assert_eq!(diag.range.end, Position::new(1, 1));
        assert_eq!(diag.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diag.source.as_deref(), Some("STRling"));
        assert_eq!(
            diag.code,
            Some(NumberOrString::String(
                "unterminated_character_class".to_string()
            ))
        );
        assert!(diag
            .message
            .starts_with("Unterminated character class\n\nHint: "));
    }
}
