//! Intermediate representation consumed by emitters
//!
//! The IR mirrors the AST variant for variant, but it is only ever produced by
//! the [compiler](crate::strling::compiler) and only ever read by
//! [emitters](crate::strling::emitters). Keeping it a separate type lets new
//! emitters target the IR without depending on parse-time concerns, and keeps
//! the parser free of emission concerns.
//!
//! IR nodes serialise tagged with `"ir"` instead of `"kind"`.

use crate::strling::ast::is_false;
use crate::strling::kinds::{AnchorKind, ClassEscapeKind, LookDir, Max, QuantMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ir")]
pub enum IrNode {
    Alt {
        branches: Vec<IrNode>,
    },
    Seq {
        parts: Vec<IrNode>,
    },
    Lit {
        value: String,
    },
    Dot,
    Anchor {
        at: AnchorKind,
    },
    CharClass {
        negated: bool,
        items: Vec<IrClassItem>,
    },
    Quant {
        child: Box<IrNode>,
        min: u32,
        max: Max,
        mode: QuantMode,
    },
    Group {
        capturing: bool,
        body: Box<IrNode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "is_false")]
        atomic: bool,
    },
    Backref {
        #[serde(rename = "byIndex", default, skip_serializing_if = "Option::is_none")]
        by_index: Option<u32>,
        #[serde(rename = "byName", default, skip_serializing_if = "Option::is_none")]
        by_name: Option<String>,
    },
    Look {
        dir: LookDir,
        neg: bool,
        body: Box<IrNode>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ir")]
pub enum IrClassItem {
    #[serde(rename = "Char")]
    Literal {
        #[serde(rename = "char")]
        ch: char,
    },
    Range {
        from: char,
        to: char,
    },
    #[serde(rename = "Esc")]
    Escape {
        #[serde(rename = "type")]
        kind: ClassEscapeKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property: Option<String>,
    },
}

impl IrNode {
    pub fn lit(value: impl Into<String>) -> Self {
        IrNode::Lit {
            value: value.into(),
        }
    }

    pub fn seq(parts: Vec<IrNode>) -> Self {
        IrNode::Seq { parts }
    }

    pub fn alt(branches: Vec<IrNode>) -> Self {
        IrNode::Alt { branches }
    }

    pub fn quant(child: IrNode, min: u32, max: Max, mode: QuantMode) -> Self {
        IrNode::Quant {
            child: Box::new(child),
            min,
            max,
            mode,
        }
    }

    pub fn group(capturing: bool, body: IrNode, name: Option<String>, atomic: bool) -> Self {
        IrNode::Group {
            capturing,
            body: Box::new(body),
            name,
            atomic,
        }
    }

    pub fn look(dir: LookDir, neg: bool, body: IrNode) -> Self {
        IrNode::Look {
            dir,
            neg,
            body: Box::new(body),
        }
    }

    pub fn class(negated: bool, items: Vec<IrClassItem>) -> Self {
        IrNode::CharClass { negated, items }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            IrNode::Alt { .. } => "Alt",
            IrNode::Seq { .. } => "Seq",
            IrNode::Lit { .. } => "Lit",
            IrNode::Dot => "Dot",
            IrNode::Anchor { .. } => "Anchor",
            IrNode::CharClass { .. } => "CharClass",
            IrNode::Quant { .. } => "Quant",
            IrNode::Group { .. } => "Group",
            IrNode::Backref { .. } => "Backref",
            IrNode::Look { .. } => "Look",
        }
    }

    /// Direct children, in order.
    pub fn children(&self) -> Vec<&IrNode> {
        match self {
            IrNode::Alt { branches } => branches.iter().collect(),
            IrNode::Seq { parts } => parts.iter().collect(),
            IrNode::Quant { child, .. } => vec![child.as_ref()],
            IrNode::Group { body, .. } | IrNode::Look { body, .. } => vec![body.as_ref()],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ir_tag() {
        let node = IrNode::class(
            false,
            vec![IrClassItem::Escape {
                kind: ClassEscapeKind::Digit,
                property: None,
            }],
        );
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            serde_json::json!({
                "ir": "CharClass",
                "negated": false,
                "items": [{"ir": "Esc", "type": "d"}]
            })
        );
    }

    #[test]
    fn test_children() {
        let node = IrNode::seq(vec![
            IrNode::Dot,
            IrNode::quant(IrNode::lit("a"), 0, Max::Inf, QuantMode::Greedy),
        ]);
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[1].children()[0], &IrNode::lit("a"));
        assert!(IrNode::Dot.children().is_empty());
    }
}
