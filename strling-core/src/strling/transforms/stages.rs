//! Pipeline stages
//!
//! `String -> Parsed -> Compiled -> String`

use crate::strling::ast::Node;
use crate::strling::compiler::{lower, normalize};
use crate::strling::emitters::{Emitter, Pcre2Emitter};
use crate::strling::error::ParseError;
use crate::strling::flags::Flags;
use crate::strling::ir::IrNode;
use crate::strling::parsing::Parser;
use crate::strling::transforms::Runnable;

/// Output of [`Parsing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub flags: Flags,
    pub root: Node,
}

/// Output of [`Lowering`] and [`Normalizing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub flags: Flags,
    pub ir: IrNode,
}

/// Directives and pattern source to AST.
#[derive(Debug, Default)]
pub struct Parsing;

impl Parsing {
    pub fn new() -> Self {
        Self
    }
}

impl Runnable<String, Parsed> for Parsing {
    fn run(&self, input: String) -> Result<Parsed, ParseError> {
        let mut parser = Parser::new(&input)?;
        let root = parser.parse()?;
        Ok(Parsed {
            flags: parser.flags(),
            root,
        })
    }
}

/// AST to raw IR.
#[derive(Debug, Default)]
pub struct Lowering;

impl Lowering {
    pub fn new() -> Self {
        Self
    }
}

impl Runnable<Parsed, Compiled> for Lowering {
    fn run(&self, input: Parsed) -> Result<Compiled, ParseError> {
        Ok(Compiled {
            flags: input.flags,
            ir: lower(&input.root),
        })
    }
}

#[derive(Debug, Default)]
pub struct Normalizing;

impl Normalizing {
    pub fn new() -> Self {
        Self
    }
}

impl Runnable<Compiled, Compiled> for Normalizing {
    fn run(&self, input: Compiled) -> Result<Compiled, ParseError> {
        Ok(Compiled {
            flags: input.flags,
            ir: normalize(input.ir),
        })
    }
}

/// IR to a PCRE2 pattern string.
#[derive(Debug, Default)]
pub struct Pcre2Emission {
    emitter: Pcre2Emitter,
}

impl Pcre2Emission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_emitter(emitter: Pcre2Emitter) -> Self {
        Pcre2Emission { emitter }
    }
}

impl Runnable<Compiled, String> for Pcre2Emission {
    fn run(&self, input: Compiled) -> Result<String, ParseError> {
        Ok(self.emitter.emit(&input.ir, Some(&input.flags)))
    }
}
