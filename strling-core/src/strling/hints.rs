//! Instructional hints for parse errors
//!
//! The [`HintEngine`] maps an error message to a short explanation of how to
//! fix it. Rules are matched in declaration order by substring, so a more
//! specific message ("Unterminated group name") must be declared before a
//! more general one ("Unterminated group") that it contains.
//!
//! Generators receive the message, the source text and the error position.
//! Several quote the offending token (the quantifier, escape letter, flag,
//! group name) instead of returning canned text.

use once_cell::sync::Lazy;
use regex::Regex;

type HintFn = fn(&str, &str, usize) -> String;

/// One entry of the hint table.
pub struct HintRule {
    pub pattern: &'static str,
    generate: HintFn,
}

impl HintRule {
    const fn new(pattern: &'static str, generate: HintFn) -> Self {
        HintRule { pattern, generate }
    }
}

pub struct HintEngine {
    rules: Vec<HintRule>,
}

static HINT_ENGINE: Lazy<HintEngine> = Lazy::new(HintEngine::new);

/// Look up a hint with the shared engine.
pub fn get_hint(message: &str, text: &str, pos: usize) -> Option<String> {
    HINT_ENGINE.get_hint(message, text, pos)
}

impl Default for HintEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HintEngine {
    pub fn new() -> Self {
        HintEngine {
            rules: vec![
                HintRule::new("Unterminated group name", unterminated_group_name),
                HintRule::new("Unterminated group", unterminated_group),
                HintRule::new("Unterminated character class", unterminated_class),
                HintRule::new("Unterminated named backref", unterminated_named_backref),
                HintRule::new("Unterminated lookahead", unterminated_lookahead),
                HintRule::new("Unterminated lookbehind", unterminated_lookbehind),
                HintRule::new("Unterminated atomic group", unterminated_atomic_group),
                HintRule::new("Unterminated {m,n}", unterminated_brace_quant),
                HintRule::new("Unterminated {n}", unterminated_brace_quant),
                HintRule::new("Unterminated \\x{...}", unterminated_hex_brace),
                HintRule::new("Unterminated \\u{...}", unterminated_unicode_brace),
                HintRule::new("Unterminated \\p{...}", unterminated_property),
                HintRule::new("Invalid quantifier range", invalid_quantifier_range),
                HintRule::new("Invalid quantifier", invalid_quantifier),
                HintRule::new("Quantifier bound too large", bound_too_large),
                HintRule::new("Invalid character range", invalid_character_range),
                HintRule::new("Invalid flag", invalid_flag),
                HintRule::new("Directive after pattern content", directive_after_pattern),
                HintRule::new("Unknown escape sequence", unknown_escape),
                HintRule::new("Incomplete escape", incomplete_escape),
                HintRule::new("Unmatched ')'", unmatched_paren),
                HintRule::new("Unexpected trailing input", unexpected_trailing),
                HintRule::new("Cannot quantify anchor", cannot_quantify_anchor),
                HintRule::new("Cannot quantify named group", cannot_quantify_named_group),
                HintRule::new("Backreference to undefined group", undefined_backref),
                HintRule::new("Duplicate group name", duplicate_group_name),
                HintRule::new("Invalid group name", invalid_group_name),
                HintRule::new("Empty alternation branch", empty_alternation),
                HintRule::new("Alternation lacks left-hand side", alternation_no_lhs),
                HintRule::new("Alternation lacks right-hand side", alternation_no_rhs),
                HintRule::new("Expected '<' after \\k", incomplete_named_backref),
                HintRule::new("Inline modifiers", inline_modifiers),
                HintRule::new("Unrecognized group syntax", unrecognized_group),
                HintRule::new("Invalid \\xHH escape", invalid_hex),
                HintRule::new("Invalid \\uHHHH", invalid_unicode),
                HintRule::new("Invalid \\UHHHHHHHH", invalid_long_unicode),
                HintRule::new("Invalid code point", invalid_code_point),
                HintRule::new("Expected { after \\p/\\P", property_missing_brace),
            ],
        }
    }

    /// Hint for the first rule whose pattern occurs in `message`.
    pub fn get_hint(&self, message: &str, text: &str, pos: usize) -> Option<String> {
        self.rules
            .iter()
            .find(|rule| message.contains(rule.pattern))
            .map(|rule| (rule.generate)(message, text, pos))
    }

    pub fn rules(&self) -> &[HintRule] {
        &self.rules
    }
}

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^']+)'").expect("static regex"));
static ESCAPE_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(.)").expect("static regex"));
static RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.)-(.)\]").expect("static regex"));
static TRAILING_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S+)$").expect("static regex"));

fn quoted(message: &str) -> Option<&str> {
    QUOTED
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn trailing_word(message: &str) -> Option<&str> {
    TRAILING_WORD
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Group name from a message ending in `<name>`.
fn group_name(message: &str) -> Option<&str> {
    trailing_word(message).map(|word| word.trim_start_matches('<').trim_end_matches('>'))
}

fn char_at(text: &str, pos: usize) -> Option<char> {
    text.chars().nth(pos)
}

fn unterminated_group_name(_: &str, _: &str, _: usize) -> String {
    "Named groups use the syntax (?<name>...). \
     Make sure to close the '<name>' with '>' before the group content."
        .to_string()
}

fn unterminated_group(_: &str, _: &str, _: usize) -> String {
    "This group was opened with '(' but never closed. \
     Add a matching ')' to close the group."
        .to_string()
}

fn unterminated_class(_: &str, _: &str, _: usize) -> String {
    "This character class was opened with '[' but never closed. \
     Add a matching ']' to close the character class."
        .to_string()
}

fn unterminated_named_backref(_: &str, _: &str, _: usize) -> String {
    "Named backreferences use the syntax \\k<name>. \
     Make sure to close the '<name>' with '>'."
        .to_string()
}

fn unterminated_lookahead(_: &str, _: &str, _: usize) -> String {
    "This lookahead was opened with '(?=' or '(?!' but never closed. \
     Add a matching ')' to close the lookahead."
        .to_string()
}

fn unterminated_lookbehind(_: &str, _: &str, _: usize) -> String {
    "This lookbehind was opened with '(?<=' or '(?<!' but never closed. \
     Add a matching ')' to close the lookbehind."
        .to_string()
}

fn unterminated_atomic_group(_: &str, _: &str, _: usize) -> String {
    "This atomic group was opened with '(?>' but never closed. \
     Add a matching ')' to close the atomic group."
        .to_string()
}

fn unterminated_brace_quant(_: &str, _: &str, _: usize) -> String {
    "Brace quantifiers use the syntax {m,n} or {n}. \
     Make sure to close the quantifier with '}'."
        .to_string()
}

fn unterminated_hex_brace(_: &str, _: &str, _: usize) -> String {
    "Variable-length hex escapes use the syntax \\x{...}. \
     Make sure to close the escape with '}'."
        .to_string()
}

fn unterminated_unicode_brace(_: &str, _: &str, _: usize) -> String {
    "Variable-length unicode escapes use the syntax \\u{...}. \
     Make sure to close the escape with '}'."
        .to_string()
}

fn unterminated_property(_: &str, _: &str, _: usize) -> String {
    "Unicode property escapes use the syntax \\p{Property} or \\P{Property}. \
     Make sure to close the property name with '}'."
        .to_string()
}

fn invalid_quantifier_range(_: &str, _: &str, _: usize) -> String {
    "Quantifier range {m,n} must have m ≤ n. \
     Check that the minimum value is not greater than the maximum value."
        .to_string()
}

fn invalid_quantifier(message: &str, _: &str, _: usize) -> String {
    let quant = quoted(message).unwrap_or("*");
    format!(
        "The quantifier '{}' cannot be at the start of a pattern or group. \
         It must follow a character or group it can quantify.",
        quant
    )
}

fn bound_too_large(_: &str, _: &str, _: usize) -> String {
    format!(
        "Quantifier bounds must fit in {} repetitions. \
         Use '*' or '+' (or {{m,}}) for an unbounded repeat.",
        u32::MAX
    )
}

fn invalid_character_range(message: &str, _: &str, _: usize) -> String {
    match RANGE.captures(message) {
        Some(caps) => format!(
            "Character ranges must be in ascending order. \
             Use [{}-{}] instead of [{}-{}].",
            &caps[2], &caps[1], &caps[1], &caps[2]
        ),
        None => "Character ranges must be in ascending order. \
                 For example, use [a-z] instead of [z-a], or [0-9] instead of [9-0]."
            .to_string(),
    }
}

fn invalid_flag(message: &str, _: &str, _: usize) -> String {
    let prefix = match quoted(message) {
        Some(flag) => format!("'{}' is not a known flag.", flag),
        None => "Unknown flag.".to_string(),
    };
    format!(
        "{} Valid flags are: i (case-insensitive), m (multiline), s (dotAll), \
         u (unicode), x (extended/free-spacing).",
        prefix
    )
}

fn directive_after_pattern(_: &str, _: &str, _: usize) -> String {
    "Directives like %flags must appear at the start of the pattern, \
     before any regex content."
        .to_string()
}

fn unknown_escape(message: &str, _: &str, _: usize) -> String {
    let Some(ch) = ESCAPE_LETTER
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
    else {
        return "This is not a recognized escape sequence.".to_string();
    };
    if ch.is_uppercase() {
        format!(
            "'\\{}' is not a recognized escape sequence. \
             To match literal '{}', use '{}' without the backslash.",
            ch, ch, ch
        )
    } else {
        format!(
            "'\\{}' is not a recognized escape sequence. \
             To match literal '{}', use '{}' or escape special characters with '\\'.",
            ch, ch, ch
        )
    }
}

fn incomplete_escape(_: &str, _: &str, _: usize) -> String {
    "A backslash must be followed by the character it escapes. \
     Use '\\\\' to match a literal backslash."
        .to_string()
}

fn unmatched_paren(_: &str, _: &str, _: usize) -> String {
    "This ')' character does not have a matching opening '('. \
     Did you mean to escape it with '\\)'?"
        .to_string()
}

fn unexpected_trailing(_: &str, text: &str, pos: usize) -> String {
    match char_at(text, pos) {
        Some(ch) => format!(
            "There is unexpected content starting at '{}' after the pattern ended. \
             Check for unmatched parentheses or extra characters.",
            ch
        ),
        None => "There is unexpected content after the pattern ended. \
                 Check for unmatched parentheses or extra characters."
            .to_string(),
    }
}

fn cannot_quantify_anchor(_: &str, _: &str, _: usize) -> String {
    "Anchors like ^, $, \\b, \\B match positions, not characters, \
     so they cannot be quantified with *, +, ?, or {}."
        .to_string()
}

fn cannot_quantify_named_group(message: &str, _: &str, _: usize) -> String {
    let name = group_name(message).unwrap_or("name");
    format!(
        "Group names must be unique, so the group '{}' cannot be repeated. \
         Move the quantifier inside the group, or use an unnamed group (...) if the name is not needed.",
        name
    )
}

fn undefined_backref(message: &str, _: &str, _: usize) -> String {
    let target = trailing_word(message).unwrap_or("the group");
    format!(
        "{} refers to a group that has not been captured yet. \
         Backreferences refer to previously captured groups. \
         Make sure the group is defined before referencing it. \
         STRling does not support forward references.",
        target
    )
}

fn duplicate_group_name(message: &str, _: &str, _: usize) -> String {
    let name = group_name(message).unwrap_or("name");
    format!(
        "The name '{}' is already used by another group. \
         Each named group must have a unique name. \
         Use different names for different groups, or use unnamed groups ().",
        name
    )
}

fn invalid_group_name(_: &str, _: &str, _: usize) -> String {
    "Group names must follow the IDENTIFIER rule: start with a letter or \
     underscore, followed by letters, digits, or underscores. \
     Use (?<name>...) with a valid identifier."
        .to_string()
}

fn empty_alternation(_: &str, _: &str, _: usize) -> String {
    "Empty alternation branch detected (consecutive '|' operators). \
     Use 'a|b' instead of 'a||b', or '(a|)b' if you want to match optional 'a'."
        .to_string()
}

fn alternation_no_lhs(_: &str, _: &str, _: usize) -> String {
    "The alternation operator '|' requires an expression on the left side. \
     Use 'a|b' to match either 'a' or 'b'."
        .to_string()
}

fn alternation_no_rhs(_: &str, _: &str, _: usize) -> String {
    "The alternation operator '|' requires an expression on the right side. \
     Use 'a|b' to match either 'a' or 'b'."
        .to_string()
}

fn incomplete_named_backref(_: &str, _: &str, _: usize) -> String {
    "Named backreferences use the syntax \\k<name>. \
     The '<' is required after \\k, like \\k<groupname>."
        .to_string()
}

fn inline_modifiers(_: &str, _: &str, _: usize) -> String {
    "STRling does not support inline modifiers like (?i) for case-insensitivity. \
     Instead, use the %flags directive at the start of your pattern: '%flags i'"
        .to_string()
}

fn unrecognized_group(_: &str, text: &str, pos: usize) -> String {
    let shown = text.chars().skip(pos).take(3).collect::<String>();
    format!(
        "'{}' does not start a known group. Supported forms are (?:...), (?<name>...), \
         (?>...), (?=...), (?!...), (?<=...) and (?<!...).",
        shown
    )
}

fn invalid_hex(_: &str, _: &str, _: usize) -> String {
    "Hex escapes must use valid hexadecimal digits (0-9, A-F). \
     Use \\xHH for 2-digit hex codes (e.g., \\x41 for 'A')."
        .to_string()
}

fn invalid_unicode(_: &str, _: &str, _: usize) -> String {
    "Unicode escapes must use valid hexadecimal digits (0-9, A-F). \
     Use \\uHHHH for 4-digit codes or \\u{...} for variable-length codes."
        .to_string()
}

fn invalid_long_unicode(_: &str, _: &str, _: usize) -> String {
    "\\U escapes take exactly 8 hexadecimal digits, like \\U0001F600. \
     Use \\u{...} for variable-length codes."
        .to_string()
}

fn invalid_code_point(_: &str, _: &str, _: usize) -> String {
    "Escaped code points must be valid Unicode scalar values: at most 10FFFF \
     and outside the surrogate range D800-DFFF."
        .to_string()
}

fn property_missing_brace(_: &str, _: &str, _: usize) -> String {
    "Unicode property escapes require braces: \\p{Letter} or \\P{Letter}. \
     Use \\p{L} for letters, \\p{N} for numbers, etc."
        .to_string()
}
