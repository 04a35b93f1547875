//! # strling-core
//!
//! Compiler for STRling, a readable pattern language, to PCRE2 regular
//! expressions.
//!
//! File Layout
//!
//! src/strling
//!   ├── flags       `%flags` directives and the Flags record
//!   ├── parsing     Cursor and recursive-descent parser
//!   ├── ast / ir    Node models (parser output, emitter input)
//!   ├── compiler    Lowering, normalisation, feature analysis
//!   ├── emitters    PCRE2 code generation
//!   ├── error       ParseError, formatting, LSP diagnostics
//!   ├── hints       Instructional hints for errors
//!   └── transforms  The pipeline as composable stages
//!
//! The whole pipeline is synchronous and keeps no shared mutable state: each
//! call builds its own parser, so independent threads can compile patterns
//! concurrently.
//!
//! For test helpers, see the [testing module](strling::testing).

pub mod strling;

pub use strling::artifact::{Artifact, IrArtifact};
pub use strling::ast::{ClassItem, Node};
pub use strling::error::{ParseError, ParseResult};
pub use strling::flags::Flags;
pub use strling::ir::{IrClassItem, IrNode};
pub use strling::{compile, compile_with_metadata, parse, parse_to_artifact, to_pcre2};
