//! STRling compilation pipeline
//!
//!     source -> flags::preprocess -> parsing -> ast
//!            -> compiler (lower, normalize, analyze) -> ir
//!            -> emitters::pcre2 -> PCRE2 string
//!
//! Any parse failure short-circuits into a [`ParseError`](error::ParseError)
//! carrying the position, source line and hint.
//!
//! The functions below are the usual entry points. The [`transforms`] module
//! exposes the same pipeline as composable stages.

pub mod artifact;
pub mod ast;
pub mod compiler;
pub mod emitters;
pub mod error;
pub mod flags;
pub mod hints;
pub mod ir;
pub mod kinds;
pub mod parsing;
pub mod testing;
pub mod transforms;

use artifact::{Artifact, IrArtifact};
use error::ParseResult;
use transforms::stages::Compiled;
use transforms::standard::{STRING_TO_AST, STRING_TO_IR, STRING_TO_PCRE2};

pub use parsing::parse;

/// Parse into the serialisable compilation artifact.
pub fn parse_to_artifact(src: &str) -> ParseResult<Artifact> {
    let parsed = STRING_TO_AST.run(src.to_string())?;
    Ok(Artifact::new(parsed.flags, parsed.root))
}

/// Parse and compile to normalised IR.
pub fn compile(src: &str) -> ParseResult<Compiled> {
    STRING_TO_IR.run(src.to_string())
}

/// Compile to IR plus the features it uses.
pub fn compile_with_metadata(src: &str) -> ParseResult<IrArtifact> {
    let parsed = STRING_TO_AST.run(src.to_string())?;
    Ok(compiler::compile_with_metadata(&parsed.root))
}

/// Full pipeline: source to PCRE2 pattern string.
pub fn to_pcre2(src: &str) -> ParseResult<String> {
    STRING_TO_PCRE2.run(src.to_string())
}
