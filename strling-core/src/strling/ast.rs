//! Abstract syntax tree produced by the parser
//!
//! The AST is a closed sum type: one variant per construct of the language.
//! Nodes are built once by the parser and never mutated afterwards; the
//! compiler lowers them into a separate [`IrNode`](crate::strling::ir::IrNode)
//! tree.
//!
//! Serialisation follows the compilation artifact format: every node is an
//! object tagged with `"kind"`, class items are tagged `Char`, `Range` and `Esc`.

use crate::strling::kinds::{AnchorKind, ClassEscapeKind, LookDir, Max, QuantMode};
use serde::{Deserialize, Serialize};

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}

/// A node of the STRling syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    /// `a|b|c`
    Alt { branches: Vec<Node> },
    /// Concatenation of terms.
    Seq { parts: Vec<Node> },
    /// Literal text. The parser yields one character per node; the compiler
    /// fuses runs of them.
    Lit { value: String },
    /// `.`
    Dot,
    Anchor { at: AnchorKind },
    CharClass {
        negated: bool,
        items: Vec<ClassItem>,
    },
    Quant {
        child: Box<Node>,
        min: u32,
        max: Max,
        mode: QuantMode,
    },
    Group {
        capturing: bool,
        body: Box<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "is_false")]
        atomic: bool,
    },
    Backref {
        #[serde(
            rename = "byIndex",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        by_index: Option<u32>,
        #[serde(rename = "byName", default, skip_serializing_if = "Option::is_none")]
        by_name: Option<String>,
    },
    Look {
        dir: LookDir,
        neg: bool,
        body: Box<Node>,
    },
}

/// One member of a character class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClassItem {
    #[serde(rename = "Char")]
    Literal {
        #[serde(rename = "char")]
        ch: char,
    },
    Range { from: char, to: char },
    #[serde(rename = "Esc")]
    Escape {
        #[serde(rename = "type")]
        kind: ClassEscapeKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property: Option<String>,
    },
}

impl ClassItem {
    pub fn escape(kind: ClassEscapeKind) -> Self {
        ClassItem::Escape {
            kind,
            property: None,
        }
    }
}

impl Node {
    pub fn lit(value: impl Into<String>) -> Self {
        Node::Lit {
            value: value.into(),
        }
    }

    pub fn seq(parts: Vec<Node>) -> Self {
        Node::Seq { parts }
    }

    pub fn alt(branches: Vec<Node>) -> Self {
        Node::Alt { branches }
    }

    pub fn anchor(at: AnchorKind) -> Self {
        Node::Anchor { at }
    }

    pub fn quant(child: Node, min: u32, max: Max, mode: QuantMode) -> Self {
        Node::Quant {
            child: Box::new(child),
            min,
            max,
            mode,
        }
    }

    /// A plain capturing group `( ... )`.
    pub fn capture(body: Node) -> Self {
        Node::Group {
            capturing: true,
            body: Box::new(body),
            name: None,
            atomic: false,
        }
    }

    pub fn named(name: impl Into<String>, body: Node) -> Self {
        Node::Group {
            capturing: true,
            body: Box::new(body),
            name: Some(name.into()),
            atomic: false,
        }
    }

    pub fn non_capturing(body: Node) -> Self {
        Node::Group {
            capturing: false,
            body: Box::new(body),
            name: None,
            atomic: false,
        }
    }

    pub fn atomic(body: Node) -> Self {
        Node::Group {
            capturing: false,
            body: Box::new(body),
            name: None,
            atomic: true,
        }
    }

    pub fn look(dir: LookDir, neg: bool, body: Node) -> Self {
        Node::Look {
            dir,
            neg,
            body: Box::new(body),
        }
    }

    /// Single-escape class such as `\d` or `\p{L}`.
    pub fn shorthand(kind: ClassEscapeKind, property: Option<String>) -> Self {
        Node::CharClass {
            negated: false,
            items: vec![ClassItem::Escape { kind, property }],
        }
    }

    /// The tag this node serialises under.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Alt { .. } => "Alt",
            Node::Seq { .. } => "Seq",
            Node::Lit { .. } => "Lit",
            Node::Dot => "Dot",
            Node::Anchor { .. } => "Anchor",
            Node::CharClass { .. } => "CharClass",
            Node::Quant { .. } => "Quant",
            Node::Group { .. } => "Group",
            Node::Backref { .. } => "Backref",
            Node::Look { .. } => "Look",
        }
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, Node::Anchor { .. })
    }

    /// Name of a named capturing group, if this is one.
    pub fn group_name(&self) -> Option<&str> {
        match self {
            Node::Group {
                name: Some(name), ..
            } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let node = Node::seq(vec![
            Node::lit("a"),
            Node::quant(Node::Dot, 1, Max::Inf, QuantMode::Lazy),
        ]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "Seq",
                "parts": [
                    {"kind": "Lit", "value": "a"},
                    {"kind": "Quant", "child": {"kind": "Dot"}, "min": 1, "max": "Inf", "mode": "Lazy"}
                ]
            })
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let group = serde_json::to_value(Node::capture(Node::Dot)).unwrap();
        assert!(group.get("name").is_none());
        assert!(group.get("atomic").is_none());

        let atomic = serde_json::to_value(Node::atomic(Node::Dot)).unwrap();
        assert_eq!(atomic["atomic"], true);

        let backref = serde_json::to_value(Node::Backref {
            by_index: None,
            by_name: Some("x".into()),
        })
        .unwrap();
        assert_eq!(backref, serde_json::json!({"kind": "Backref", "byName": "x"}));
    }

    #[test]
    fn test_class_items_round_trip() {
        let class = Node::CharClass {
            negated: true,
            items: vec![
                ClassItem::Literal { ch: '-' },
                ClassItem::Range { from: 'a', to: 'z' },
                ClassItem::Escape {
                    kind: ClassEscapeKind::Property,
                    property: Some("Lu".into()),
                },
            ],
        };
        let json = serde_json::to_string(&class).unwrap();
        assert!(json.contains(r#"{"kind":"Char","char":"-"}"#));
        assert!(json.contains(r#"{"kind":"Esc","type":"p","property":"Lu"}"#));
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, class);
    }
}
