//! Fluent assertions for trees and errors
//!
//! Tests describe the expected shape instead of walking nodes by hand:
//!
//! ```rust,ignore
//! use strling_core::strling::testing::{assert_ast, assert_parse_error};
//!
//! assert_ast("(?<num>\\d+)-\\k<num>")
//!     .seq(3)
//!     .part(0, |g| {
//!         g.group().named("num").body(|q| {
//!             q.quant(1, Max::Inf, QuantMode::Greedy);
//!         });
//!     })
//!     .part(1, |lit| {
//!         lit.lit("-");
//!     })
//!     .part(2, |b| {
//!         b.backref_name("num");
//!     });
//!
//! assert_parse_error("a{5,2}")
//!     .message("Invalid quantifier range")
//!     .at(1)
//!     .hint_contains("m ≤ n");
//! ```
//!
//! Each assertion carries a path (`root.parts[0].body`) so a failure points at
//! the node that did not match.

use crate::strling::ast::{ClassItem, Node};
use crate::strling::error::ParseError;
use crate::strling::ir::IrNode;
use crate::strling::kinds::{AnchorKind, LookDir, Max, QuantMode};
use crate::strling::parsing::parse;

/// Parse `src` and start asserting on its AST root. Panics on parse failure.
pub fn assert_ast(src: &str) -> NodeAssertion {
    match parse(src) {
        Ok((_, root)) => NodeAssertion {
            node: root,
            path: "root".to_string(),
        },
        Err(err) => panic!("expected {:?} to parse, got:\n{}", src, err),
    }
}

/// Compile `src` to normalised IR and start asserting on it.
pub fn assert_ir(src: &str) -> IrAssertion {
    match crate::strling::compile(src) {
        Ok(compiled) => IrAssertion {
            node: compiled.ir,
            path: "ir".to_string(),
        },
        Err(err) => panic!("expected {:?} to compile, got:\n{}", src, err),
    }
}

/// Parse `src`, expecting failure.
pub fn assert_parse_error(src: &str) -> ErrorAssertion {
    match parse(src) {
        Ok((_, root)) => panic!("expected {:?} to fail, parsed as {:?}", src, root),
        Err(error) => ErrorAssertion { error },
    }
}

pub struct NodeAssertion {
    node: Node,
    path: String,
}

impl NodeAssertion {
    fn nested(&self, node: &Node, segment: &str) -> NodeAssertion {
        NodeAssertion {
            node: node.clone(),
            path: format!("{}.{}", self.path, segment),
        }
    }

    fn fail(&self, expected: &str) -> ! {
        panic!(
            "{}: expected {}, found {:?}",
            self.path, expected, self.node
        )
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn kind(self, expected: &str) -> Self {
        if self.node.kind_name() != expected {
            self.fail(expected);
        }
        self
    }

    pub fn lit(self, expected: &str) -> Self {
        if !matches!(
            &self.node,
            Node::Lit { value } if value == expected
        ) {
            self.fail(&format!("Lit({:?})", expected));
        }
        self
    }

    pub fn dot(self) -> Self {
        self.kind("Dot")
    }

    pub fn anchor(self, expected: AnchorKind) -> Self {
        if !matches!(
            &self.node,
            Node::Anchor { at } if *at == expected
        ) {
            self.fail(&format!("Anchor({:?})", expected));
        }
        self
    }

    /// A sequence of `count` parts.
    pub fn seq(self, count: usize) -> Self {
        if !matches!(
            &self.node,
            Node::Seq { parts } if parts.len() == count
        ) {
            self.fail(&format!("Seq with {} parts", count));
        }
        self
    }

    /// An alternation of `count` branches.
    pub fn alt(self, count: usize) -> Self {
        if !matches!(
            &self.node,
            Node::Alt { branches } if branches.len() == count
        ) {
            self.fail(&format!("Alt with {} branches", count));
        }
        self
    }

    pub fn part<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion),
    {
        let nested = match &self.node {
            Node::Seq { parts } => match parts.get(index) {
                Some(part) => self.nested(part, &format!("parts[{}]", index)),
                None => self.fail(&format!("a part at index {}", index)),
            },
            _ => self.fail("Seq"),
        };
        check(nested);
        self
    }

    pub fn branch<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion),
    {
        let nested = match &self.node {
            Node::Alt { branches } => match branches.get(index) {
                Some(branch) => self.nested(branch, &format!("branches[{}]", index)),
                None => self.fail(&format!("a branch at index {}", index)),
            },
            _ => self.fail("Alt"),
        };
        check(nested);
        self
    }

    pub fn quant(self, min: u32, max: Max, mode: QuantMode) -> Self {
        if !matches!(
            &self.node,
            Node::Quant { min: m, max: x, mode: o, .. } if *m == min && *x == max && *o == mode
        ) {
            self.fail(&format!("Quant({}, {}, {:?})", min, max, mode));
        }
        self
    }

    pub fn group(self) -> Self {
        self.kind("Group")
    }

    pub fn capturing(self, expected: bool) -> Self {
        if !matches!(
            &self.node,
            Node::Group { capturing, .. } if *capturing == expected
        ) {
            self.fail(&format!("Group with capturing={}", expected));
        }
        self
    }

    pub fn named(self, expected: &str) -> Self {
        if !matches!(
            self.node.group_name(),
            Some(name) if name == expected
        ) {
            self.fail(&format!("group named {:?}", expected));
        }
        self
    }

    pub fn atomic(self) -> Self {
        if !matches!(&self.node, Node::Group { atomic: true, .. }) {
            self.fail("atomic Group");
        }
        self
    }

    pub fn look(self, dir: LookDir, neg: bool) -> Self {
        if !matches!(
            &self.node,
            Node::Look { dir: d, neg: n, .. } if *d == dir && *n == neg
        ) {
            self.fail(&format!("Look({:?}, neg={})", dir, neg));
        }
        self
    }

    /// Descend into the quantified child, group body or lookaround body.
    pub fn body<F>(self, check: F) -> Self
    where
        F: FnOnce(NodeAssertion),
    {
        let nested = match &self.node {
            Node::Quant { child, .. } => self.nested(child, "child"),
            Node::Group { body, .. } | Node::Look { body, .. } => self.nested(body, "body"),
            _ => self.fail("Quant, Group or Look"),
        };
        check(nested);
        self
    }

    pub fn class(self, negated: bool, items: &[ClassItem]) -> Self {
        if !matches!(
            &self.node,
            Node::CharClass { negated: n, items: i } if *n == negated && i.as_slice() == items
        ) {
            self.fail(&format!("CharClass(negated={}, {:?})", negated, items));
        }
        self
    }

    pub fn backref_index(self, expected: u32) -> Self {
        if !matches!(
            &self.node,
            Node::Backref { by_index: Some(index), .. } if *index == expected
        ) {
            self.fail(&format!("Backref(\\{})", expected));
        }
        self
    }

    pub fn backref_name(self, expected: &str) -> Self {
        if !matches!(
            &self.node,
            Node::Backref { by_name: Some(name), .. } if name == expected
        ) {
            self.fail(&format!("Backref(<{}>)", expected));
        }
        self
    }
}

pub struct IrAssertion {
    node: IrNode,
    path: String,
}

impl IrAssertion {
    fn fail(&self, expected: &str) -> ! {
        panic!(
            "{}: expected {}, found {:?}",
            self.path, expected, self.node
        )
    }

    pub fn node(&self) -> &IrNode {
        &self.node
    }

    pub fn kind(self, expected: &str) -> Self {
        if self.node.kind_name() != expected {
            self.fail(expected);
        }
        self
    }

    pub fn lit(self, expected: &str) -> Self {
        if !matches!(
            &self.node,
            IrNode::Lit { value } if value == expected
        ) {
            self.fail(&format!("Lit({:?})", expected));
        }
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        if self.node.children().len() != expected {
            self.fail(&format!("{} children", expected));
        }
        self
    }

    pub fn child<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(IrAssertion),
    {
        let nested = match self.node.children().get(index) {
            Some(child) => IrAssertion {
                node: (*child).clone(),
                path: format!("{}[{}]", self.path, index),
            },
            None => self.fail(&format!("a child at index {}", index)),
        };
        check(nested);
        self
    }
}

pub struct ErrorAssertion {
    error: ParseError,
}

impl ErrorAssertion {
    pub fn error(&self) -> &ParseError {
        &self.error
    }

    pub fn message(self, expected: &str) -> Self {
        assert_eq!(self.error.message, expected, "unexpected error message");
        self
    }

    pub fn message_contains(self, fragment: &str) -> Self {
        assert!(
            self.error.message.contains(fragment),
            "message {:?} does not contain {:?}",
            self.error.message,
            fragment
        );
        self
    }

    pub fn at(self, pos: usize) -> Self {
        assert_eq!(
            self.error.pos, pos,
            "error {:?} at unexpected position",
            self.error.message
        );
        self
    }

    pub fn hint_contains(self, fragment: &str) -> Self {
        if !matches!(&self.error.hint, Some(hint) if hint.contains(fragment)) {
            panic!(
                "hint {:?} does not contain {:?}",
                self.error.hint, fragment
            );
        }
        self
    }

    pub fn has_hint(self) -> Self {
        assert!(
            self.error.hint.is_some(),
            "no hint for {:?}",
            self.error.message
        );
        self
    }
}
