//! End-to-end emission: STRling source in, PCRE2 out

use rstest::rstest;
use strling_core::strling::emitters::{for_target, Emitter, Pcre2Emitter};
use strling_core::to_pcre2;

#[rstest]
#[case("ab*c", "ab*c")]
#[case("a|b", "a|b")]
#[case("(?<num>\\d+)-\\k<num>", "(?<num>\\d+)-\\k<num>")]
#[case("(a)\\1", "(a)\\1")]
#[case("(?:ab)*", "(?:ab)*")]
#[case("x(?:a|b)y", "x(?:a|b)y")]
#[case("(?>a+)b", "(?>a+)b")]
#[case("(?<=x)y(?!z)", "(?<=x)y(?!z)")]
#[case("\\bword\\b", "\\bword\\b")]
#[case("^\\Aa\\Z\\z$", "^\\Aa\\Z\\z$")]
#[case(".", ".")]
#[case("", "")]
fn test_round_trips(#[case] src: &str, #[case] expected: &str) {
    assert_eq!(to_pcre2(src).unwrap(), expected);
}

#[rstest]
#[case("a{2,5}?", "a{2,5}?")]
#[case("a?+", "a?+")]
#[case("a{3}", "a{3}")]
#[case("a{0,0}", "a{0}")]
#[case("a{1,}", "a+")]
#[case("a{0,1}", "a?")]
#[case("a{2,}+", "a{2,}+")]
fn test_quantifier_forms(#[case] src: &str, #[case] expected: &str) {
    assert_eq!(to_pcre2(src).unwrap(), expected);
}

#[rstest]
#[case("\\d", "\\d")]
#[case("[^\\d]", "\\D")]
#[case("[^\\W]", "\\w")]
#[case("\\p{Lu}", "\\p{Lu}")]
#[case("\\P{Lu}", "\\P{Lu}")]
#[case("[^\\p{Lu}]", "\\P{Lu}")]
#[case("[^\\P{Lu}]", "\\p{Lu}")]
#[case("[^a-c\\d]", "[^a-c\\d]")]
#[case("[]]", "[\\]]")]
#[case("[a\\-z]", "[a\\-z]")]
#[case("[\\^x]", "[\\^x]")]
fn test_classes(#[case] src: &str, #[case] expected: &str) {
    assert_eq!(to_pcre2(src).unwrap(), expected);
}

#[rstest]
#[case("\\.", "\\.")]
#[case("a\\+b", "a\\+b")]
#[case("a{", "a\\{")]
#[case("\\x{263A}", "☺")]
#[case("\\u0041\\u0042", "AB")]
fn test_literal_escaping(#[case] src: &str, #[case] expected: &str) {
    assert_eq!(to_pcre2(src).unwrap(), expected);
}

#[test]
fn test_quantified_lookaround_is_wrapped() {
    assert_eq!(to_pcre2("(?=a)+").unwrap(), "(?:(?=a))+");
}

#[test]
fn test_quantified_literal_run_is_wrapped() {
    assert_eq!(to_pcre2("(?:abc){2}").unwrap(), "(?:abc){2}");
    assert_eq!(to_pcre2("(?:a|b)+").unwrap(), "(?:a|b)+");
}

#[rstest]
#[case("(a)\\1\\x30", "(a)(?:\\1)0")]
#[case("%flags x\n(a) \\1 0", "(?x)(a)(?:\\1)0")]
#[case("(a)\\1\\d", "(a)\\1\\d")]
#[case("(a)\\1b", "(a)\\1b")]
#[case("(?<n>a)\\k<n>0", "(?<n>a)\\k<n>0")]
fn test_numbered_backref_before_digit(#[case] src: &str, #[case] expected: &str) {
    assert_eq!(to_pcre2(src).unwrap(), expected);
}

#[test]
fn test_numbered_backref_before_digit_reparses() {
    let emitted = to_pcre2("(a)\\1\\x30").unwrap();
    assert_eq!(to_pcre2(&emitted).unwrap(), emitted);
}

#[test]
fn test_flags_prefix() {
    assert_eq!(to_pcre2("%flags i, m\nabc").unwrap(), "(?im)abc");
    assert_eq!(to_pcre2("%flags [x, s, u]\na").unwrap(), "(?sux)a");
}

#[test]
fn test_free_spacing_source_and_output() {
    assert_eq!(to_pcre2("%flags x\na b # comment\n").unwrap(), "(?x)ab");
    assert_eq!(to_pcre2("%flags x\n\\ \\#").unwrap(), "(?x)\\ \\#");
}

#[test]
fn test_invalid_range_reports_hint() {
    let err = to_pcre2("a{5,2}").unwrap_err();
    assert_eq!(err.message, "Invalid quantifier range");
    assert_eq!(err.pos, 1);
    assert!(err.hint.as_deref().unwrap_or("").contains("m ≤ n"));
}

#[test]
fn test_emitter_lookup_by_target() {
    let emitter = for_target("pcre2").unwrap();
    assert_eq!(emitter.name(), "pcre2");
    assert!(for_target("ecmascript").is_none());

    let compiled = strling_core::compile("%flags i\nab").unwrap();
    assert_eq!(emitter.emit(&compiled.ir, Some(&compiled.flags)), "(?i)ab");
    assert_eq!(
        Pcre2Emitter::new()
            .with_flags_prefix(false)
            .emit(&compiled.ir, Some(&compiled.flags)),
        "ab"
    );
}
