//! Property-based tests for compilation and validation
//!
//! - normalisation is idempotent and leaves no nested or single-element
//!   sequences, no nested alternations and no adjacent literals
//! - emitting, re-parsing and emitting again is a fixpoint
//! - every ill-formed construct (undefined backreference, inverted ranges,
//!   duplicate names) is rejected at the right position

use proptest::prelude::*;
use strling_core::strling::compiler::normalize;
use strling_core::strling::ir::IrNode;
use strling_core::strling::kinds::{AnchorKind, Max, QuantMode};
use strling_core::strling::testing::assert_parse_error;
use strling_core::{compile, to_pcre2};

/// Raw, possibly non-canonical IR trees
fn ir_strategy() -> impl Strategy<Value = IrNode> {
    let leaf = prop_oneof![
        "[a-c]{0,2}".prop_map(|value| IrNode::lit(value)),
        Just(IrNode::Dot),
        Just(IrNode::Anchor {
            at: AnchorKind::Start
        }),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(IrNode::seq),
            prop::collection::vec(inner.clone(), 1..4).prop_map(IrNode::alt),
            inner
                .clone()
                .prop_map(|child| IrNode::quant(child, 0, Max::Inf, QuantMode::Greedy)),
            inner.prop_map(|body| IrNode::group(false, body, None, false)),
        ]
    })
}

/// Well-formed STRling sources without backreferences or named groups
fn pattern_strategy() -> impl Strategy<Value = String> {
    let atom = prop_oneof![
        "[a-z]",
        Just(".".to_string()),
        Just("\\d".to_string()),
        Just("[a-c]".to_string()),
        Just("[^x\\s]".to_string()),
    ];
    let quant = prop_oneof![
        Just(""),
        Just("*"),
        Just("+"),
        Just("?"),
        Just("{2}"),
        Just("{1,3}"),
        Just("*?"),
        Just("++"),
    ];
    let term = (atom, quant).prop_map(|(atom, quant)| format!("{}{}", atom, quant));
    let seq = prop::collection::vec(term, 1..4).prop_map(|terms| terms.concat());
    let alt = prop::collection::vec(seq, 1..3).prop_map(|seqs| seqs.join("|"));

    alt.prop_recursive(3, 16, 3, |inner| {
        let open = prop_oneof![Just("("), Just("(?:"), Just("(?="), Just("(?>")];
        let quant = prop_oneof![Just(""), Just("*"), Just("{2}")];
        (
            "[a-z]{0,2}",
            open,
            inner,
            quant,
            prop::collection::vec("[a-z]", 0..2),
        )
            .prop_map(|(before, open, body, quant, after)| {
                format!("{}{}{}){}{}", before, open, body, quant, after.concat())
            })
    })
}

fn is_canonical(node: &IrNode) -> bool {
    match node {
        IrNode::Seq { parts } => {
            parts.len() != 1
                && parts.iter().all(|part| {
                    !matches!(part, IrNode::Seq { .. })
                        && !matches!(part, IrNode::Lit { value } if value.is_empty())
                })
                && parts.windows(2).all(|pair| {
                    !matches!(pair, [IrNode::Lit { .. }, IrNode::Lit { .. }])
                })
                && parts.iter().all(is_canonical)
        }
        IrNode::Alt { branches } => {
            branches.len() != 1
                && branches
                    .iter()
                    .all(|branch| !matches!(branch, IrNode::Alt { .. }))
                && branches.iter().all(is_canonical)
        }
        other => other.children().into_iter().all(is_canonical),
    }
}

proptest! {
    #[test]
    fn test_normalize_is_idempotent(ir in ir_strategy()) {
        let once = normalize(ir);
        let twice = normalize(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_output_is_canonical(ir in ir_strategy()) {
        let normalized = normalize(ir);
        prop_assert!(is_canonical(&normalized), "not canonical: {:?}", normalized);
    }

    #[test]
    fn test_well_formed_patterns_compile(src in pattern_strategy()) {
        let compiled = compile(&src);
        prop_assert!(compiled.is_ok(), "{:?} failed: {:?}", src, compiled.as_ref().err());
        if let Ok(compiled) = compiled {
            prop_assert!(is_canonical(&compiled.ir));
            prop_assert_eq!(normalize(compiled.ir.clone()), compiled.ir);
        }
    }

    #[test]
    fn test_emission_is_a_fixpoint(src in pattern_strategy()) {
        let first = to_pcre2(&src).unwrap();
        let second = to_pcre2(&first).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_inverted_quantifier_range_is_rejected(min in 1u32..1000, delta in 1u32..1000) {
        let src = format!("a{{{},{}}}", min + delta, min);
        assert_parse_error(&src)
            .message("Invalid quantifier range")
            .at(1)
            .hint_contains("m ≤ n");
    }

    #[test]
    fn test_inverted_class_range_is_rejected(offset in 0u32..24, gap in 1u32..3) {
        let lo = char::from_u32('a' as u32 + offset).unwrap();
        let hi = char::from_u32('a' as u32 + offset + gap).unwrap();
        let src = format!("[{}-{}]", hi, lo);
        assert_parse_error(&src)
            .message(&format!("Invalid character range [{}-{}]", hi, lo))
            .at(2);
    }

    #[test]
    fn test_backreference_must_follow_its_group(groups in 0u32..5, extra in 1u32..5) {
        let index = groups + extra;
        let src = format!("{}\\{}", "(a)".repeat(groups as usize), index);
        assert_parse_error(&src)
            .message(&format!("Backreference to undefined group \\{}", index))
            .at(3 * groups as usize);
    }

    #[test]
    fn test_backreference_to_opened_group_is_accepted(groups in 1u32..5, pick in 0u32..5) {
        let index = pick % groups + 1;
        let src = format!("{}\\{}", "(a)".repeat(groups as usize), index);
        prop_assert!(compile(&src).is_ok());
    }

    #[test]
    fn test_duplicate_group_name_is_rejected(name in "[a-z_][a-z0-9_]{0,8}") {
        let first = format!("(?<{}>a)", name);
        let src = format!("{}(?<{}>b)", first, name);
        assert_parse_error(&src)
            .message(&format!("Duplicate group name <{}>", name))
            .at(first.chars().count());
    }
}
