//! Emitters turn IR into a target regex dialect
//!
//! Only PCRE2 is implemented. Emitters consume IR exclusively, never the AST,
//! so a new target never needs to know about parsing.

pub mod pcre2;

pub use pcre2::Pcre2Emitter;

use crate::strling::flags::Flags;
use crate::strling::ir::IrNode;

pub trait Emitter {
    /// Target name, as used by configuration (`emit.target`).
    fn name(&self) -> &'static str;

    /// Render `ir`. Pure: no side effects, no state carried between calls.
    fn emit(&self, ir: &IrNode, flags: Option<&Flags>) -> String;
}

/// Emit PCRE2 with the default settings.
pub fn emit(ir: &IrNode, flags: Option<&Flags>) -> String {
    Pcre2Emitter::default().emit(ir, flags)
}

/// Emitter for a configured target name.
pub fn for_target(name: &str) -> Option<Box<dyn Emitter + Send + Sync>> {
    match name {
        "pcre2" => Some(Box::new(Pcre2Emitter::default())),
        _ => None,
    }
}
