//! Feature usage analysis
//!
//! Tags which engine features an IR tree relies on. Emission ignores this; it
//! feeds capability reporting (`metadata.features_used`).

use crate::strling::ir::{IrClassItem, IrNode};
use crate::strling::kinds::{LookDir, QuantMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Variants are declared alphabetically so set order is name order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    AtomicGroup,
    Backreference,
    Lookahead,
    Lookbehind,
    NamedGroup,
    PossessiveQuantifier,
    UnicodeProperty,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::AtomicGroup => "atomic_group",
            Feature::Backreference => "backreference",
            Feature::Lookahead => "lookahead",
            Feature::Lookbehind => "lookbehind",
            Feature::NamedGroup => "named_group",
            Feature::PossessiveQuantifier => "possessive_quantifier",
            Feature::UnicodeProperty => "unicode_property",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every feature used anywhere in the tree.
pub fn analyze(root: &IrNode) -> BTreeSet<Feature> {
    let mut found = BTreeSet::new();
    visit(root, &mut found);
    found
}

fn visit(node: &IrNode, found: &mut BTreeSet<Feature>) {
    match node {
        IrNode::Group { name, atomic, .. } => {
            if *atomic {
                found.insert(Feature::AtomicGroup);
            }
            if name.is_some() {
                found.insert(Feature::NamedGroup);
            }
        }
        IrNode::Quant {
            mode: QuantMode::Possessive,
            ..
        } => {
            found.insert(Feature::PossessiveQuantifier);
        }
        IrNode::Look { dir, .. } => {
            found.insert(match dir {
                LookDir::Ahead => Feature::Lookahead,
                LookDir::Behind => Feature::Lookbehind,
            });
        }
        IrNode::Backref { .. } => {
            found.insert(Feature::Backreference);
        }
        IrNode::CharClass { items, .. } => {
            let has_property = items.iter().any(|item| {
                matches!(item, IrClassItem::Escape { kind, .. } if kind.is_property())
            });
            if has_property {
                found.insert(Feature::UnicodeProperty);
            }
        }
        _ => {}
    }

    for child in node.children() {
        visit(child, found);
    }
}
