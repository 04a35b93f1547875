//! AST to IR compilation
//!
//! Compilation runs three passes:
//!
//! 1. [`lower`]: a 1:1 structural copy of the AST into IR. No validation, the
//!    parser already did it.
//! 2. [`normalize`]: bottom-up canonicalisation. Nested `Seq`/`Alt` nodes are
//!    flattened into their parent, runs of adjacent `Lit` nodes in a sequence
//!    are fused into one, and single-element `Seq`/`Alt` nodes collapse to
//!    their element. Normalising a normalised tree is a no-op.
//! 3. [`features::analyze`]: collects the feature tags used by the tree, for
//!    capability reporting only.

pub mod features;

pub use features::{analyze, Feature};

use crate::strling::artifact::{IrArtifact, Metadata};
use crate::strling::ast::{ClassItem, Node};
use crate::strling::ir::{IrClassItem, IrNode};

/// Lower then normalise.
pub fn compile(root: &Node) -> IrNode {
    let ir = normalize(lower(root));
    log::debug!("compiled IR root: {}", ir.kind_name());
    ir
}

/// Compile and attach the sorted feature list.
pub fn compile_with_metadata(root: &Node) -> IrArtifact {
    let ir = compile(root);
    let features_used: Vec<Feature> = analyze(&ir).into_iter().collect();
    log::debug!("features used: {:?}", features_used);
    IrArtifact {
        ir,
        metadata: Metadata { features_used },
    }
}

pub fn lower(node: &Node) -> IrNode {
    match node {
        Node::Alt { branches } => IrNode::alt(branches.iter().map(lower).collect()),
        Node::Seq { parts } => IrNode::seq(parts.iter().map(lower).collect()),
        Node::Lit { value } => IrNode::lit(value.clone()),
        Node::Dot => IrNode::Dot,
        Node::Anchor { at } => IrNode::Anchor { at: *at },
        Node::CharClass { negated, items } => {
            IrNode::class(*negated, items.iter().map(lower_class_item).collect())
        }
        Node::Quant {
            child,
            min,
            max,
            mode,
        } => IrNode::quant(lower(child), *min, *max, *mode),
        Node::Group {
            capturing,
            body,
            name,
            atomic,
        } => IrNode::group(*capturing, lower(body), name.clone(), *atomic),
        Node::Backref { by_index, by_name } => IrNode::Backref {
            by_index: *by_index,
            by_name: by_name.clone(),
        },
        Node::Look { dir, neg, body } => IrNode::look(*dir, *neg, lower(body)),
    }
}

fn lower_class_item(item: &ClassItem) -> IrClassItem {
    match item {
        ClassItem::Literal { ch } => IrClassItem::Literal { ch: *ch },
        ClassItem::Range { from, to } => IrClassItem::Range {
            from: *from,
            to: *to,
        },
        ClassItem::Escape { kind, property } => IrClassItem::Escape {
            kind: *kind,
            property: property.clone(),
        },
    }
}

pub fn normalize(node: IrNode) -> IrNode {
    match node {
        IrNode::Seq { parts } => {
            let mut flat = Vec::with_capacity(parts.len());
            for part in parts {
                match normalize(part) {
                    IrNode::Seq { parts } => flat.extend(parts),
                    other => flat.push(other),
                }
            }
            collapse(fuse_literals(flat), IrNode::seq)
        }
        IrNode::Alt { branches } => {
            let mut flat = Vec::with_capacity(branches.len());
            for branch in branches {
                match normalize(branch) {
                    IrNode::Alt { branches } => flat.extend(branches),
                    other => flat.push(other),
                }
            }
            collapse(flat, IrNode::alt)
        }
        IrNode::Quant {
            child,
            min,
            max,
            mode,
        } => IrNode::quant(normalize(*child), min, max, mode),
        IrNode::Group {
            capturing,
            body,
            name,
            atomic,
        } => IrNode::group(capturing, normalize(*body), name, atomic),
        IrNode::Look { dir, neg, body } => IrNode::look(dir, neg, normalize(*body)),
        leaf => leaf,
    }
}

/// Merge each run of adjacent literals into one. Empty literals vanish.
fn fuse_literals(parts: Vec<IrNode>) -> Vec<IrNode> {
    let mut fused = Vec::with_capacity(parts.len());
    let mut run = String::new();
    for part in parts {
        match part {
            IrNode::Lit { value } => run.push_str(&value),
            other => {
                if !run.is_empty() {
                    fused.push(IrNode::lit(std::mem::take(&mut run)));
                }
                fused.push(other);
            }
        }
    }
    if !run.is_empty() {
        fused.push(IrNode::lit(run));
    }
    fused
}

fn collapse(mut nodes: Vec<IrNode>, rebuild: fn(Vec<IrNode>) -> IrNode) -> IrNode {
    if nodes.len() == 1 {
        nodes.remove(0)
    } else {
        rebuild(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strling::kinds::{Max, QuantMode};

    #[test]
    fn test_lower_is_structural() {
        let ast = Node::seq(vec![Node::lit("a"), Node::lit("b")]);
        assert_eq!(
            lower(&ast),
            IrNode::seq(vec![IrNode::lit("a"), IrNode::lit("b")])
        );
    }

    #[test]
    fn test_fuses_adjacent_literals() {
        let ir = IrNode::seq(vec![
            IrNode::lit("a"),
            IrNode::lit("b"),
            IrNode::Dot,
            IrNode::lit("c"),
        ]);
        assert_eq!(
            normalize(ir),
            IrNode::seq(vec![IrNode::lit("ab"), IrNode::Dot, IrNode::lit("c")])
        );
    }

    #[test]
    fn test_flattens_and_collapses() {
        let ir = IrNode::alt(vec![
            IrNode::alt(vec![IrNode::lit("a"), IrNode::lit("b")]),
            IrNode::seq(vec![IrNode::seq(vec![IrNode::lit("c")])]),
        ]);
        assert_eq!(
            normalize(ir),
            IrNode::alt(vec![IrNode::lit("a"), IrNode::lit("b"), IrNode::lit("c")])
        );
    }

    #[test]
    fn test_literals_fuse_across_flattened_sequences() {
        let ir = IrNode::seq(vec![
            IrNode::lit("a"),
            IrNode::seq(vec![IrNode::lit("b"), IrNode::Dot]),
        ]);
        assert_eq!(
            normalize(ir),
            IrNode::seq(vec![IrNode::lit("ab"), IrNode::Dot])
        );
    }

    #[test]
    fn test_normalizes_inside_quantifiers_and_groups() {
        let ir = IrNode::quant(
            IrNode::group(
                false,
                IrNode::seq(vec![IrNode::lit("a"), IrNode::lit("b")]),
                None,
                false,
            ),
            0,
            Max::Inf,
            QuantMode::Greedy,
        );
        assert_eq!(
            normalize(ir),
            IrNode::quant(
                IrNode::group(false, IrNode::lit("ab"), None, false),
                0,
                Max::Inf,
                QuantMode::Greedy,
            )
        );
    }

    #[test]
    fn test_empty_sequence_survives() {
        assert_eq!(normalize(IrNode::seq(vec![])), IrNode::seq(vec![]));
    }

    #[test]
    fn test_compile_with_metadata_sorts_features() {
        let ast = Node::seq(vec![
            Node::named("n", Node::lit("a")),
            Node::atomic(Node::lit("b")),
        ]);
        let artifact = compile_with_metadata(&ast);
        assert_eq!(
            artifact.metadata.features_used,
            vec![Feature::AtomicGroup, Feature::NamedGroup]
        );
    }
}
