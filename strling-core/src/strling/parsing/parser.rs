//! Recursive-descent parser
//!
//! Grammar, lowest precedence first:
//!
//!     Alt  := Seq ('|' Seq)*
//!     Seq  := Term*
//!     Term := Atom Quant?
//!     Atom := '.' | '^' | '$' | Group | CharClass | Escape | Literal
//!
//! All validation happens while parsing: group names are checked for
//! uniqueness as they open, backreferences must resolve to a group that has
//! already been opened, and quantifier and class ranges must be ascending. The
//! first violation aborts the parse with an error positioned at the offending
//! char.
//!
//! Capturing groups (named or not) are numbered by the order of their opening
//! parenthesis, so `\1` can refer to a named group, and a group can refer to
//! itself from inside its own body.

use crate::strling::ast::{ClassItem, Node};
use crate::strling::error::{ParseError, ParseResult};
use crate::strling::flags::{preprocess, Flags};
use crate::strling::kinds::{AnchorKind, ClassEscapeKind, LookDir, Max, QuantMode};
use crate::strling::parsing::cursor::Cursor;
use std::collections::HashSet;

pub struct Parser {
    flags: Flags,
    src: String,
    cur: Cursor,
    cap_count: u32,
    cap_names: HashSet<String>,
}

impl Parser {
    /// Preprocess directives and prepare to parse the remaining pattern.
    pub fn new(text: &str) -> ParseResult<Self> {
        let pre = preprocess(text)?;
        Ok(Parser::from_source(pre.source, pre.flags))
    }

    /// Parser over an already preprocessed pattern body.
    pub fn from_source(src: String, flags: Flags) -> Self {
        let cur = Cursor::new(&src, flags.extended);
        Parser {
            flags,
            src,
            cur,
            cap_count: 0,
            cap_names: HashSet::new(),
        }
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The pattern body, after directives were stripped.
    pub fn source(&self) -> &str {
        &self.src
    }

    /// Capturing groups opened so far.
    pub fn capture_count(&self) -> u32 {
        self.cap_count
    }

    pub fn parse(&mut self) -> ParseResult<Node> {
        let node = self.parse_alt()?;
        self.cur.skip_ws_and_comments();
        if let Some(ch) = self.cur.peek() {
            let message = if ch == ')' {
                "Unmatched ')'"
            } else {
                "Unexpected trailing input"
            };
            return Err(self.error(message, self.cur.index));
        }
        log::debug!(
            "parsed {} chars, {} capturing group(s)",
            self.cur.len(),
            self.cap_count
        );
        Ok(node)
    }

    fn error(&self, message: impl Into<String>, pos: usize) -> ParseError {
        ParseError::new(message, pos).with_context(&self.src)
    }

    // Alternation

    fn parse_alt(&mut self) -> ParseResult<Node> {
        self.cur.skip_ws_and_comments();
        if self.cur.peek() == Some('|') {
            return Err(self.error("Alternation lacks left-hand side", self.cur.index));
        }

        let mut branches = vec![self.parse_seq()?];
        loop {
            self.cur.skip_ws_and_comments();
            if self.cur.peek() != Some('|') {
                break;
            }
            let pipe = self.cur.index;
            self.cur.take();
            self.cur.skip_ws_and_comments();
            match self.cur.peek() {
                None | Some(')') => {
                    return Err(self.error("Alternation lacks right-hand side", pipe))
                }
                Some('|') => return Err(self.error("Empty alternation branch", pipe)),
                _ => {}
            }
            branches.push(self.parse_seq()?);
        }

        Ok(if branches.len() == 1 {
            branches.remove(0)
        } else {
            Node::alt(branches)
        })
    }

    fn parse_seq(&mut self) -> ParseResult<Node> {
        let mut parts = Vec::new();
        loop {
            self.cur.skip_ws_and_comments();
            match self.cur.peek() {
                None | Some('|') | Some(')') => break,
                Some(_) => {}
            }
            let atom = self.parse_atom()?;
            parts.push(self.parse_quant_if_any(atom)?);
        }

        Ok(if parts.len() == 1 {
            parts.remove(0)
        } else {
            Node::seq(parts)
        })
    }

    // Quantifiers

    fn quantifier_follows(&self) -> bool {
        match self.cur.peek() {
            Some('*' | '+' | '?') => true,
            Some('{') => matches!(self.cur.peek_at(1), Some(c) if c.is_ascii_digit()),
            _ => false,
        }
    }

    fn parse_quant_if_any(&mut self, child: Node) -> ParseResult<Node> {
        if !self.quantifier_follows() {
            if self.cur.peek() == Some('{') {
                log::trace!("'{{' at {} is not a quantifier, read as literal", self.cur.index);
            }
            return Ok(child);
        }

        let quant_start = self.cur.index;
        if child.is_anchor() {
            return Err(self.error("Cannot quantify anchor", quant_start));
        }
        if let Some(name) = child.group_name() {
            return Err(self.error(
                format!("Cannot quantify named group <{}>", name),
                quant_start,
            ));
        }

        let (min, max) = match self.cur.take() {
            Some('*') => (0, Max::Inf),
            Some('+') => (1, Max::Inf),
            Some('?') => (0, Max::Finite(1)),
            _ => self.parse_brace_quant(quant_start)?,
        };

        let mode = if self.cur.eat('?') {
            QuantMode::Lazy
        } else if self.cur.eat('+') {
            QuantMode::Possessive
        } else {
            QuantMode::Greedy
        };

        Ok(Node::quant(child, min, max, mode))
    }

    /// `{m}`, `{m,}` or `{m,n}`, with the `{` already consumed.
    fn parse_brace_quant(&mut self, open: usize) -> ParseResult<(u32, Max)> {
        let min = self.read_bound()?;

        if !self.cur.eat(',') {
            if !self.cur.eat('}') {
                return Err(self.error("Unterminated {n}", self.cur.index));
            }
            return Ok((min, Max::Finite(min)));
        }

        let max = match self.cur.peek() {
            Some(c) if c.is_ascii_digit() => Some(self.read_bound()?),
            _ => None,
        };
        if !self.cur.eat('}') {
            return Err(self.error("Unterminated {m,n}", self.cur.index));
        }

        match max {
            None => Ok((min, Max::Inf)),
            Some(max) if min > max => Err(self.error("Invalid quantifier range", open)),
            Some(max) => Ok((min, Max::Finite(max))),
        }
    }

    fn read_bound(&mut self) -> ParseResult<u32> {
        let start = self.cur.index;
        let digits = self.cur.take_while(|c| c.is_ascii_digit());
        digits
            .parse::<u32>()
            .map_err(|_| self.error("Quantifier bound too large", start))
    }

    // Atoms

    fn parse_atom(&mut self) -> ParseResult<Node> {
        let start = self.cur.index;
        let Some(ch) = self.cur.peek() else {
            return Err(self.error("Unexpected end of pattern", start));
        };

        match ch {
            '.' => {
                self.cur.take();
                Ok(Node::Dot)
            }
            '^' => {
                self.cur.take();
                Ok(Node::anchor(AnchorKind::Start))
            }
            '$' => {
                self.cur.take();
                Ok(Node::anchor(AnchorKind::End))
            }
            '(' => self.parse_group(),
            '[' => self.parse_class(),
            '\\' => self.parse_escape(),
            '*' | '+' | '?' => Err(self.error(format!("Invalid quantifier '{}'", ch), start)),
            '{' if self.quantifier_follows() => {
                Err(self.error("Invalid quantifier '{'", start))
            }
            _ => {
                self.cur.take();
                Ok(Node::lit(ch.to_string()))
            }
        }
    }

    // Escapes

    fn parse_escape(&mut self) -> ParseResult<Node> {
        let start = self.cur.index;
        self.cur.take();
        let Some(next) = self.cur.peek() else {
            return Err(self.error("Incomplete escape at end of pattern", start));
        };

        if next.is_ascii_digit() && next != '0' {
            let digits = self.cur.take_while(|c| c.is_ascii_digit());
            return match digits.parse::<u32>() {
                Ok(index) if index <= self.cap_count => Ok(Node::Backref {
                    by_index: Some(index),
                    by_name: None,
                }),
                _ => Err(self.error(
                    format!("Backreference to undefined group \\{}", digits),
                    start,
                )),
            };
        }

        if let Some(kind) = ClassEscapeKind::from_letter(next) {
            self.cur.take();
            let property = if kind.is_property() {
                Some(self.parse_property_name()?)
            } else {
                None
            };
            return Ok(Node::shorthand(kind, property));
        }

        self.cur.take();
        let anchor = match next {
            'b' => Some(AnchorKind::WordBoundary),
            'B' => Some(AnchorKind::NotWordBoundary),
            'A' => Some(AnchorKind::AbsoluteStart),
            'Z' => Some(AnchorKind::EndBeforeFinalNewline),
            'z' => Some(AnchorKind::AbsoluteEnd),
            _ => None,
        };
        if let Some(at) = anchor {
            return Ok(Node::anchor(at));
        }

        let ch = match next {
            'k' => return self.parse_named_backref(start),
            '0' => '\0',
            'x' => self.parse_hex_escape(start)?,
            'u' | 'U' => self.parse_unicode_escape(next, start)?,
            c => match control_escape(c) {
                Some(ctrl) => ctrl,
                None if c.is_ascii_alphabetic() => {
                    return Err(
                        self.error(format!("Unknown escape sequence \\{}", c), start)
                    );
                }
                None => c,
            },
        };
        Ok(Node::lit(ch.to_string()))
    }

    fn parse_named_backref(&mut self, start: usize) -> ParseResult<Node> {
        if !self.cur.eat('<') {
            return Err(self.error("Expected '<' after \\k", start));
        }
        let name = self.cur.take_while(|c| c != '>');
        if !self.cur.eat('>') {
            return Err(self.error("Unterminated named backref", start));
        }
        if !self.cap_names.contains(&name) {
            return Err(self.error(
                format!("Backreference to undefined group <{}>", name),
                start,
            ));
        }
        Ok(Node::Backref {
            by_index: None,
            by_name: Some(name),
        })
    }

    /// `{Name}` after `\p` / `\P`.
    fn parse_property_name(&mut self) -> ParseResult<String> {
        let brace = self.cur.index;
        if !self.cur.eat('{') {
            return Err(self.error("Expected { after \\p/\\P", brace));
        }
        let name = self.cur.take_while(|c| c != '}');
        if !self.cur.eat('}') {
            return Err(self.error("Unterminated \\p{...}", brace));
        }
        Ok(name)
    }

    /// `\xHH` or `\x{H+}`, with `\x` already consumed.
    fn parse_hex_escape(&mut self, start: usize) -> ParseResult<char> {
        if self.cur.eat('{') {
            let hex = self.cur.take_while(|c| c.is_ascii_hexdigit());
            if !self.cur.eat('}') {
                return Err(self.error("Unterminated \\x{...}", start));
            }
            return self.code_point(&hex, start);
        }
        match self.take_hex_digits(2) {
            Some(hex) => self.code_point(&hex, start),
            None => Err(self.error("Invalid \\xHH escape", start)),
        }
    }

    /// `\uHHHH`, `\u{H+}` or `\UHHHHHHHH`, with `\u` / `\U` already consumed.
    fn parse_unicode_escape(&mut self, letter: char, start: usize) -> ParseResult<char> {
        if letter == 'U' {
            return match self.take_hex_digits(8) {
                Some(hex) => self.code_point(&hex, start),
                None => Err(self.error("Invalid \\UHHHHHHHH", start)),
            };
        }
        if self.cur.eat('{') {
            let hex = self.cur.take_while(|c| c.is_ascii_hexdigit());
            if !self.cur.eat('}') {
                return Err(self.error("Unterminated \\u{...}", start));
            }
            return self.code_point(&hex, start);
        }
        match self.take_hex_digits(4) {
            Some(hex) => self.code_point(&hex, start),
            None => Err(self.error("Invalid \\uHHHH", start)),
        }
    }

    fn take_hex_digits(&mut self, count: usize) -> Option<String> {
        let mut hex = String::with_capacity(count);
        for _ in 0..count {
            match self.cur.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.cur.take();
                }
                _ => return None,
            }
        }
        Some(hex)
    }

    fn code_point(&self, hex: &str, start: usize) -> ParseResult<char> {
        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error("Invalid code point", start))
    }

    // Character classes

    fn parse_class(&mut self) -> ParseResult<Node> {
        self.cur.take();
        self.cur.class_depth += 1;
        let result = self.parse_class_items();
        self.cur.class_depth -= 1;
        result
    }

    fn parse_class_items(&mut self) -> ParseResult<Node> {
        let negated = self.cur.eat('^');
        let first = self.cur.index;
        let mut items: Vec<ClassItem> = Vec::new();

        loop {
            let Some(ch) = self.cur.peek() else {
                return Err(self.error("Unterminated character class", self.cur.index));
            };

            // `]` right after `[` or `[^` is data
            if ch == ']' && self.cur.index > first {
                self.cur.take();
                return Ok(Node::CharClass { negated, items });
            }

            let after_literal = matches!(items.last(), Some(ClassItem::Literal { .. }));
            if ch == '-' && after_literal && self.cur.peek_at(1) != Some(']') {
                let dash = self.cur.index;
                self.cur.take();
                let end = self.read_class_item()?;
                match (end, items.pop()) {
                    (ClassItem::Literal { ch: to }, Some(ClassItem::Literal { ch: from })) => {
                        if from > to {
                            return Err(self.error(
                                format!("Invalid character range [{}-{}]", from, to),
                                dash,
                            ));
                        }
                        items.push(ClassItem::Range { from, to });
                    }
                    (end, prev) => {
                        // an escape cannot end a range: keep the dash literal
                        items.extend(prev);
                        items.push(ClassItem::Literal { ch: '-' });
                        items.push(end);
                    }
                }
                continue;
            }

            let item = self.read_class_item()?;
            items.push(item);
        }
    }

    fn read_class_item(&mut self) -> ParseResult<ClassItem> {
        let start = self.cur.index;
        match self.cur.take() {
            None => Err(self.error("Unterminated character class", start)),
            Some('\\') => self.read_class_escape(start),
            Some(ch) => Ok(ClassItem::Literal { ch }),
        }
    }

    fn read_class_escape(&mut self, start: usize) -> ParseResult<ClassItem> {
        let Some(next) = self.cur.take() else {
            return Err(self.error("Unterminated character class", self.cur.index));
        };

        if let Some(kind) = ClassEscapeKind::from_letter(next) {
            let property = if kind.is_property() {
                Some(self.parse_property_name()?)
            } else {
                None
            };
            return Ok(ClassItem::Escape { kind, property });
        }

        let ch = match next {
            'x' => self.parse_hex_escape(start)?,
            'u' | 'U' => self.parse_unicode_escape(next, start)?,
            '0' => '\0',
            'b' => '\u{8}',
            c => control_escape(c).unwrap_or(c),
        };
        Ok(ClassItem::Literal { ch })
    }

    // Groups

    fn parse_group(&mut self) -> ParseResult<Node> {
        let start = self.cur.index;
        self.cur.take();

        if self.cur.match_str("?:") {
            let body = self.parse_group_body("Unterminated group")?;
            return Ok(Node::non_capturing(body));
        }
        // lookbehind before the named form, both start with `?<`
        if self.cur.match_str("?<=") {
            let body = self.parse_group_body("Unterminated lookbehind")?;
            return Ok(Node::look(LookDir::Behind, false, body));
        }
        if self.cur.match_str("?<!") {
            let body = self.parse_group_body("Unterminated lookbehind")?;
            return Ok(Node::look(LookDir::Behind, true, body));
        }
        if self.cur.match_str("?<") {
            return self.parse_named_group(start);
        }
        if self.cur.match_str("?>") {
            let body = self.parse_group_body("Unterminated atomic group")?;
            return Ok(Node::atomic(body));
        }
        if self.cur.match_str("?=") {
            let body = self.parse_group_body("Unterminated lookahead")?;
            return Ok(Node::look(LookDir::Ahead, false, body));
        }
        if self.cur.match_str("?!") {
            let body = self.parse_group_body("Unterminated lookahead")?;
            return Ok(Node::look(LookDir::Ahead, true, body));
        }
        if self.cur.peek() == Some('?') {
            return Err(match self.cur.peek_at(1) {
                Some('i' | 'm' | 's' | 'u' | 'x' | '-') => self.error(
                    "Inline modifiers `(?imsx)` are not supported",
                    start + 1,
                ),
                _ => self.error("Unrecognized group syntax", start),
            });
        }

        self.cap_count += 1;
        let body = self.parse_group_body("Unterminated group")?;
        Ok(Node::capture(body))
    }

    fn parse_named_group(&mut self, start: usize) -> ParseResult<Node> {
        let name_start = self.cur.index;
        let name = self.cur.take_while(|c| c != '>');
        if !self.cur.eat('>') {
            return Err(self.error("Unterminated group name", self.cur.index));
        }
        if !is_identifier(&name) {
            return Err(self.error(format!("Invalid group name <{}>", name), name_start));
        }
        if self.cap_names.contains(&name) {
            return Err(self.error(format!("Duplicate group name <{}>", name), start));
        }

        self.cap_count += 1;
        self.cap_names.insert(name.clone());
        let body = self.parse_group_body("Unterminated group")?;
        Ok(Node::named(name, body))
    }

    fn parse_group_body(&mut self, unterminated: &str) -> ParseResult<Node> {
        let body = self.parse_alt()?;
        if !self.cur.eat(')') {
            return Err(self.error(unterminated, self.cur.index));
        }
        Ok(body)
    }
}

fn control_escape(ch: char) -> Option<char> {
    match ch {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'f' => Some('\u{c}'),
        'v' => Some('\u{b}'),
        _ => None,
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Node {
        Parser::new(src).unwrap().parse().unwrap()
    }

    fn parse_err(src: &str) -> ParseError {
        match Parser::new(src).and_then(|mut p| p.parse()) {
            Ok(node) => panic!("expected an error for {:?}, got {:?}", src, node),
            Err(err) => err,
        }
    }

    #[test]
    fn test_sequence_of_literals() {
        assert_eq!(
            parse("ab"),
            Node::seq(vec![Node::lit("a"), Node::lit("b")])
        );
        assert_eq!(parse("a"), Node::lit("a"));
        assert_eq!(parse(""), Node::seq(vec![]));
    }

    #[test]
    fn test_quantifier_binds_to_atom() {
        assert_eq!(
            parse("ab*"),
            Node::seq(vec![
                Node::lit("a"),
                Node::quant(Node::lit("b"), 0, Max::Inf, QuantMode::Greedy),
            ])
        );
    }

    #[test]
    fn test_quantifier_modes() {
        assert_eq!(
            parse("a{2,}?"),
            Node::quant(Node::lit("a"), 2, Max::Inf, QuantMode::Lazy)
        );
        assert_eq!(
            parse("a?+"),
            Node::quant(Node::lit("a"), 0, Max::Finite(1), QuantMode::Possessive)
        );
        assert_eq!(
            parse("a{3}"),
            Node::quant(Node::lit("a"), 3, Max::Finite(3), QuantMode::Greedy)
        );
    }

    #[test]
    fn test_brace_without_digits_is_literal() {
        assert_eq!(
            parse("a{x"),
            Node::seq(vec![Node::lit("a"), Node::lit("{"), Node::lit("x")])
        );
    }

    #[test]
    fn test_group_numbering_includes_named_groups() {
        let mut parser = Parser::new("(?<a>x)(y)\\2\\1").unwrap();
        parser.parse().unwrap();
        assert_eq!(parser.capture_count(), 2);
    }

    #[test]
    fn test_self_reference_resolves() {
        assert!(Parser::new("(a\\1)").unwrap().parse().is_ok());
    }

    #[test]
    fn test_forward_reference_fails() {
        let err = parse_err("\\1(a)");
        assert_eq!(err.message, "Backreference to undefined group \\1");
        assert_eq!(err.pos, 0);
    }

    #[test]
    fn test_class_range_and_trailing_dash() {
        assert_eq!(
            parse("[a-z-]"),
            Node::CharClass {
                negated: false,
                items: vec![
                    ClassItem::Range { from: 'a', to: 'z' },
                    ClassItem::Literal { ch: '-' },
                ],
            }
        );
    }

    #[test]
    fn test_class_dash_before_escape_stays_literal() {
        assert_eq!(
            parse("[a-\\d]"),
            Node::CharClass {
                negated: false,
                items: vec![
                    ClassItem::Literal { ch: 'a' },
                    ClassItem::Literal { ch: '-' },
                    ClassItem::escape(ClassEscapeKind::Digit),
                ],
            }
        );
    }

    #[test]
    fn test_leading_bracket_is_literal() {
        assert_eq!(
            parse("[]]"),
            Node::CharClass {
                negated: false,
                items: vec![ClassItem::Literal { ch: ']' }],
            }
        );
        assert_eq!(parse_err("[]").message, "Unterminated character class");
    }

    #[test]
    fn test_free_spacing_outside_class_only() {
        assert_eq!(
            parse("%flags x\na b # comment\n[ #]"),
            Node::seq(vec![
                Node::lit("a"),
                Node::lit("b"),
                Node::CharClass {
                    negated: false,
                    items: vec![ClassItem::Literal { ch: ' ' }, ClassItem::Literal { ch: '#' }],
                },
            ])
        );
    }

    #[test]
    fn test_escape_literals() {
        assert_eq!(parse("\\x41"), Node::lit("A"));
        assert_eq!(parse("\\u{1F600}"), Node::lit("\u{1F600}"));
        assert_eq!(parse("\\U0001F600"), Node::lit("\u{1F600}"));
        assert_eq!(parse("\\u00e9"), Node::lit("é"));
        assert_eq!(parse("\\0"), Node::lit("\0"));
        assert_eq!(parse("\\t"), Node::lit("\t"));
        assert_eq!(parse("\\."), Node::lit("."));
    }

    #[test]
    fn test_error_positions() {
        assert_eq!(parse_err("abc{2,").pos, 6);
        assert_eq!(parse_err("a{5,2}").pos, 1);
        assert_eq!(parse_err("(abc").pos, 4);
        assert_eq!(parse_err("a||b").pos, 1);
        assert_eq!(parse_err("[z-a]").pos, 2);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(parse_err("|a").message, "Alternation lacks left-hand side");
        assert_eq!(parse_err("a|").message, "Alternation lacks right-hand side");
        assert_eq!(parse_err("(a|)").message, "Alternation lacks right-hand side");
        assert_eq!(parse_err("a)").message, "Unmatched ')'");
        assert_eq!(parse_err("*a").message, "Invalid quantifier '*'");
        assert_eq!(parse_err("^*").message, "Cannot quantify anchor");
        assert_eq!(
            parse_err("(?<n>a)+").message,
            "Cannot quantify named group <n>"
        );
        assert_eq!(parse_err("\\q").message, "Unknown escape sequence \\q");
        assert_eq!(parse_err("a\\").message, "Incomplete escape at end of pattern");
        assert_eq!(
            parse_err("(?i)a").message,
            "Inline modifiers `(?imsx)` are not supported"
        );
        assert_eq!(parse_err("(?P<x>a)").message, "Unrecognized group syntax");
        assert_eq!(parse_err("(?<1a>x)").message, "Invalid group name <1a>");
        assert_eq!(parse_err("\\x{110000}").message, "Invalid code point");
        assert_eq!(
            parse_err("a{99999999999}").message,
            "Quantifier bound too large"
        );
    }

    #[test]
    fn test_identifier() {
        assert!(is_identifier("_a1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9a"));
        assert!(!is_identifier("a-b"));
    }
}
