//! Character scanner for the parser
//!
//! The cursor indexes chars, not bytes, so every position it reports can be
//! used directly as a [`ParseError`](crate::strling::error::ParseError)
//! position.
//!
//! Free-spacing mode (`%flags x`) makes whitespace and `#` comments
//! insignificant, but only outside character classes: inside `[...]` a space
//! or `#` is data. The cursor tracks class nesting so
//! [`Cursor::skip_ws_and_comments`] can tell the two apart.

#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pub index: usize,
    pub extended_mode: bool,
    pub class_depth: usize,
}

impl Cursor {
    pub fn new(text: &str, extended_mode: bool) -> Self {
        Cursor {
            chars: text.chars().collect(),
            index: 0,
            extended_mode,
            class_depth: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    pub fn take(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.index += 1;
        Some(ch)
    }

    /// Consume `ch` if it is next.
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Consume `s` if the input continues with it.
    pub fn match_str(&mut self, s: &str) -> bool {
        let mut offset = 0;
        for expected in s.chars() {
            if self.peek_at(offset) != Some(expected) {
                return false;
            }
            offset += 1;
        }
        self.index += offset;
        true
    }

    /// Consume chars while `pred` holds.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            out.push(ch);
            self.index += 1;
        }
        out
    }

    /// Skip insignificant whitespace and `#` comments.
    ///
    /// No-op unless in free-spacing mode and outside any character class.
    pub fn skip_ws_and_comments(&mut self) {
        if !self.extended_mode || self.class_depth > 0 {
            return;
        }
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => self.index += 1,
                '#' => {
                    while matches!(self.peek(), Some(c) if c != '\r' && c != '\n') {
                        self.index += 1;
                    }
                }
                _ => break,
            }
        }
    }
}
