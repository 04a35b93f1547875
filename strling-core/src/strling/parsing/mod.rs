//! Parsing: directive preprocessing, scanning and the recursive-descent parser
//!
//! [`parse`] is the usual entry point. It strips `%` directives, then parses
//! the remaining pattern body into an AST.

pub mod cursor;
pub mod parser;

pub use cursor::Cursor;
pub use parser::Parser;

use crate::strling::ast::Node;
use crate::strling::error::ParseResult;
use crate::strling::flags::Flags;

/// Parse a full STRling source (directives included).
pub fn parse(text: &str) -> ParseResult<(Flags, Node)> {
    let mut parser = Parser::new(text)?;
    let root = parser.parse()?;
    Ok((parser.flags(), root))
}
