//! PCRE2 code generation
//!
//! Turns an IR tree into a PCRE2 pattern string. The tree is read-only and
//! the emitter keeps no state between patterns.
//!
//! Precedence is preserved by inserting `(?:...)` only where needed:
//!
//! - a quantified child that is a multi-char literal, a sequence, an
//!   alternation, a lookaround or another quantifier;
//! - an alternation sitting directly inside a sequence;
//! - a numbered backreference followed by a digit.
//!
//! Other single atoms (classes, `.`, groups, anchors, named backreferences)
//! are never wrapped.

use crate::strling::emitters::Emitter;
use crate::strling::flags::Flags;
use crate::strling::ir::{IrClassItem, IrNode};
use crate::strling::kinds::{AnchorKind, ClassEscapeKind, LookDir, Max, QuantMode};

/// Chars escaped in literals outside classes.
const LITERAL_METACHARS: &str = ".^$|()?*+{}[]\\";
/// Chars escaped inside `[...]`.
const CLASS_METACHARS: &str = "]-\\^";

#[derive(Debug, Clone)]
pub struct Pcre2Emitter {
    flags_prefix: bool,
}

impl Default for Pcre2Emitter {
    fn default() -> Self {
        Pcre2Emitter { flags_prefix: true }
    }
}

impl Pcre2Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether to render set flags as a leading `(?imsux)`.
    pub fn with_flags_prefix(mut self, enabled: bool) -> Self {
        self.flags_prefix = enabled;
        self
    }
}

impl Emitter for Pcre2Emitter {
    fn name(&self) -> &'static str {
        "pcre2"
    }

    fn emit(&self, ir: &IrNode, flags: Option<&Flags>) -> String {
        let flags = flags.copied().unwrap_or_default();
        let writer = Writer {
            extended: flags.extended,
        };
        let mut out = if self.flags_prefix {
            flags_prefix(&flags)
        } else {
            String::new()
        };
        writer.node(ir, Parent::Root, &mut out);
        log::debug!("emitted {} chars of PCRE2", out.len());
        out
    }
}

/// `(?imsux)` with the set letters in fixed order, or nothing.
pub fn flags_prefix(flags: &Flags) -> String {
    let letters = flags.letters();
    if letters.is_empty() {
        String::new()
    } else {
        format!("(?{})", letters)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Root,
    Seq,
    Alt,
    Quant,
    Group,
    Look,
}

struct Writer {
    /// Free-spacing output: literal whitespace and `#` must be escaped.
    extended: bool,
}

impl Writer {
    fn node(&self, node: &IrNode, parent: Parent, out: &mut String) {
        match node {
            IrNode::Lit { value } => self.literal(value, out),
            IrNode::Dot => out.push('.'),
            IrNode::Anchor { at } => out.push_str(anchor(*at)),
            IrNode::Backref { by_index, by_name } => match (by_name, by_index) {
                (Some(name), _) => {
                    out.push_str("\\k<");
                    out.push_str(name);
                    out.push('>');
                }
                (None, Some(index)) => {
                    out.push('\\');
                    out.push_str(&index.to_string());
                }
                (None, None) => {}
            },
            IrNode::CharClass { negated, items } => class(*negated, items, out),
            IrNode::Seq { parts } => {
                // Span of a numbered backreference written just before.
                let mut backref: Option<(usize, usize)> = None;
                for part in parts {
                    let start = out.len();
                    self.node(part, Parent::Seq, out);
                    if let Some((from, to)) = backref.take() {
                        // `\1` then `0` would read back as `\10`
                        if out[start..].starts_with(|c: char| c.is_ascii_digit()) {
                            out.insert(to, ')');
                            out.insert_str(from, "(?:");
                        }
                    }
                    if let IrNode::Backref {
                        by_index: Some(_),
                        by_name: None,
                    } = part
                    {
                        backref = Some((start, out.len()));
                    }
                }
            }
            IrNode::Alt { branches } => {
                let wrap = parent == Parent::Seq;
                if wrap {
                    out.push_str("(?:");
                }
                for (idx, branch) in branches.iter().enumerate() {
                    if idx > 0 {
                        out.push('|');
                    }
                    self.node(branch, Parent::Alt, out);
                }
                if wrap {
                    out.push(')');
                }
            }
            IrNode::Quant {
                child,
                min,
                max,
                mode,
            } => {
                let wrap = needs_group(child);
                if wrap {
                    out.push_str("(?:");
                }
                self.node(child, Parent::Quant, out);
                if wrap {
                    out.push(')');
                }
                out.push_str(&quant_suffix(*min, *max, *mode));
            }
            IrNode::Group {
                capturing,
                body,
                name,
                atomic,
            } => {
                match (atomic, capturing, name) {
                    (true, _, _) => out.push_str("(?>"),
                    (false, true, Some(name)) => {
                        out.push_str("(?<");
                        out.push_str(name);
                        out.push('>');
                    }
                    (false, true, None) => out.push('('),
                    (false, false, _) => out.push_str("(?:"),
                }
                self.node(body, Parent::Group, out);
                out.push(')');
            }
            IrNode::Look { dir, neg, body } => {
                out.push_str(match (dir, neg) {
                    (LookDir::Ahead, false) => "(?=",
                    (LookDir::Ahead, true) => "(?!",
                    (LookDir::Behind, false) => "(?<=",
                    (LookDir::Behind, true) => "(?<!",
                });
                self.node(body, Parent::Look, out);
                out.push(')');
            }
        }
    }

    fn literal(&self, value: &str, out: &mut String) {
        for ch in value.chars() {
            if LITERAL_METACHARS.contains(ch) {
                out.push('\\');
                out.push(ch);
            } else if self.extended && (ch.is_whitespace() || ch == '#') {
                match ch {
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    '\r' => out.push_str("\\r"),
                    '\u{c}' => out.push_str("\\f"),
                    '\u{b}' => out.push_str("\\x{b}"),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
            } else {
                out.push(ch);
            }
        }
    }
}

fn anchor(at: AnchorKind) -> &'static str {
    match at {
        AnchorKind::Start => "^",
        AnchorKind::End => "$",
        AnchorKind::WordBoundary => "\\b",
        AnchorKind::NotWordBoundary => "\\B",
        AnchorKind::AbsoluteStart => "\\A",
        AnchorKind::EndBeforeFinalNewline => "\\Z",
        AnchorKind::AbsoluteEnd => "\\z",
    }
}

/// Whether a quantified child must be wrapped to keep the quantifier on all
/// of it.
fn needs_group(child: &IrNode) -> bool {
    match child {
        IrNode::Lit { value } => value.chars().count() != 1,
        IrNode::Seq { .. } | IrNode::Alt { .. } | IrNode::Look { .. } | IrNode::Quant { .. } => {
            true
        }
        IrNode::CharClass { .. }
        | IrNode::Dot
        | IrNode::Group { .. }
        | IrNode::Backref { .. }
        | IrNode::Anchor { .. } => false,
    }
}

fn quant_suffix(min: u32, max: Max, mode: QuantMode) -> String {
    let mut suffix = match (min, max) {
        (0, Max::Inf) => "*".to_string(),
        (1, Max::Inf) => "+".to_string(),
        (0, Max::Finite(1)) => "?".to_string(),
        (min, Max::Finite(max)) if min == max => format!("{{{}}}", min),
        (min, Max::Inf) => format!("{{{},}}", min),
        (min, Max::Finite(max)) => format!("{{{},{}}}", min, max),
    };
    match mode {
        QuantMode::Greedy => {}
        QuantMode::Lazy => suffix.push('?'),
        QuantMode::Possessive => suffix.push('+'),
    }
    suffix
}

fn class(negated: bool, items: &[IrClassItem], out: &mut String) {
    if let [IrClassItem::Escape { kind, property }] = items {
        if let Some(shorthand) = shorthand(negated, *kind, property.as_deref()) {
            out.push_str(&shorthand);
            return;
        }
    }

    out.push('[');
    if negated {
        out.push('^');
    }
    for item in items {
        match item {
            IrClassItem::Literal { ch } => class_char(*ch, out),
            IrClassItem::Range { from, to } => {
                class_char(*from, out);
                out.push('-');
                class_char(*to, out);
            }
            IrClassItem::Escape { kind, property } => {
                out.push('\\');
                out.push(kind.letter());
                if let Some(property) = property.as_deref().filter(|_| kind.is_property()) {
                    out.push('{');
                    out.push_str(property);
                    out.push('}');
                }
            }
        }
    }
    out.push(']');
}

/// A one-escape class written without brackets, negation folded into the
/// escape letter.
fn shorthand(negated: bool, kind: ClassEscapeKind, property: Option<&str>) -> Option<String> {
    let kind = if negated { kind.negate() } else { kind };
    if kind.is_property() {
        let property = property.filter(|p| !p.is_empty())?;
        return Some(format!("\\{}{{{}}}", kind.letter(), property));
    }
    Some(format!("\\{}", kind.letter()))
}

fn class_char(ch: char, out: &mut String) {
    if CLASS_METACHARS.contains(ch) {
        out.push('\\');
    }
    out.push(ch);
}
