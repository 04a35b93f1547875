//! Flags and the `%`-directive preprocessor
//!
//! A pattern may start with directive lines:
//!
//!     # comment lines and blank lines are skipped
//!     %flags i, m
//!     %future-directive ignored
//!     abc
//!
//! The preprocessor consumes those leading lines, folds every `%flags` letter
//! into a [`Flags`] record and hands the remainder (the pattern body) to the
//! parser. The first line that is not blank, a comment or a directive ends
//! preprocessing.

use crate::strling::error::{ParseError, ParseResult};
use serde::{Deserialize, Serialize};

/// Compilation flags. Immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub extended: bool,
}

impl Flags {
    /// Fold flag letters into a flag set. Commas, brackets and whitespace are
    /// separators. Returns the offending character (and its char offset within
    /// `letters`) on an unknown letter.
    pub fn from_letters(letters: &str) -> Result<Flags, (char, usize)> {
        let mut flags = Flags::default();
        for (idx, ch) in letters.chars().enumerate() {
            match ch {
                'i' => flags.ignore_case = true,
                'm' => flags.multiline = true,
                's' => flags.dot_all = true,
                'u' => flags.unicode = true,
                'x' => flags.extended = true,
                ',' | '[' | ']' => {}
                c if c.is_whitespace() => {}
                other => return Err((other, idx)),
            }
        }
        Ok(flags)
    }

    /// Union of two flag sets.
    pub fn merge(self, other: Flags) -> Flags {
        Flags {
            ignore_case: self.ignore_case || other.ignore_case,
            multiline: self.multiline || other.multiline,
            dot_all: self.dot_all || other.dot_all,
            unicode: self.unicode || other.unicode,
            extended: self.extended || other.extended,
        }
    }

    /// Set letters in `i, m, s, u, x` order.
    pub fn letters(&self) -> String {
        [
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.extended, 'x'),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, letter)| *letter)
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == Flags::default()
    }
}

/// Result of directive preprocessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    pub flags: Flags,
    /// The pattern body the parser sees.
    pub source: String,
}

/// Strip leading directive lines from `text`.
///
/// Errors:
/// - `Invalid flag 'q'` for an unknown letter, positioned at the letter within
///   the original `text` (the error carries the original text).
/// - `Directive after pattern content` for a `%flags` line inside the pattern
///   body, positioned at the `%` within the body (the error carries the body).
pub fn preprocess(text: &str) -> ParseResult<Preprocessed> {
    let mut flags = Flags::default();
    // Offsets are counted in chars so they line up with parser positions.
    let mut consumed_bytes = 0;
    let mut consumed_chars = 0;

    for line in text.split_inclusive('\n') {
        let stripped = line.trim();
        let line_chars = line.chars().count();

        if stripped.is_empty() || stripped.starts_with('#') {
            consumed_bytes += line.len();
            consumed_chars += line_chars;
            continue;
        }

        if let Some(rest) = stripped.strip_prefix("%flags") {
            let lead = line.chars().take_while(|c| c.is_whitespace()).count();
            let letters_offset = consumed_chars + lead + "%flags".len();
            let parsed = Flags::from_letters(rest).map_err(|(ch, idx)| {
                ParseError::new(format!("Invalid flag '{}'", ch), letters_offset + idx)
                    .with_context(text)
            })?;
            flags = flags.merge(parsed);
            consumed_bytes += line.len();
            consumed_chars += line_chars;
            continue;
        }

        if stripped.starts_with('%') {
            log::debug!("skipping unknown directive line {:?}", stripped);
            consumed_bytes += line.len();
            consumed_chars += line_chars;
            continue;
        }

        break;
    }

    let source = &text[consumed_bytes..];
    reject_late_directives(source)?;

    log::debug!(
        "preprocessed directives: flags={:?}, body starts at char {}",
        flags,
        consumed_chars
    );

    Ok(Preprocessed {
        flags,
        source: source.to_string(),
    })
}

fn reject_late_directives(source: &str) -> ParseResult<()> {
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        let lead = line.chars().take_while(|c| c.is_whitespace()).count();
        if line.trim_start().starts_with("%flags") {
            return Err(
                ParseError::new("Directive after pattern content", offset + lead)
                    .with_context(source),
            );
        }
        offset += line.chars().count();
    }
    Ok(())
}
