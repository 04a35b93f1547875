//! Prebuilt pipelines
//!
//! All are `once_cell::sync::Lazy` statics, built on first use and shared
//! across threads.

use crate::strling::transforms::stages::{
    Compiled, Lowering, Normalizing, Parsed, Parsing, Pcre2Emission,
};
use crate::strling::transforms::Transform;
use once_cell::sync::Lazy;

pub type AstTransform = Transform<String, Parsed>;
pub type IrTransform = Transform<String, Compiled>;
pub type EmitTransform = Transform<String, String>;

/// Source to flags and AST.
///
/// ```rust,ignore
/// let parsed = STRING_TO_AST.run("%flags i\nabc".to_string())?;
/// assert!(parsed.flags.ignore_case);
/// ```
pub static STRING_TO_AST: Lazy<AstTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(Parsing::new()));

/// Source to normalised IR.
pub static STRING_TO_IR: Lazy<IrTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then_transform(Lazy::force(&STRING_TO_AST))
        .then(Lowering::new())
        .then(Normalizing::new())
});

/// Source to a PCRE2 pattern string.
///
/// ```rust,ignore
/// assert_eq!(STRING_TO_PCRE2.run("a|b".to_string())?, "a|b");
/// ```
pub static STRING_TO_PCRE2: Lazy<EmitTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then_transform(Lazy::force(&STRING_TO_IR))
        .then(Pcre2Emission::new())
});
