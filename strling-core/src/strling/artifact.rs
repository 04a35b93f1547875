//! Serialised compilation outputs
//!
//! [`Artifact`] is the parse result exchanged with schema validators and other
//! tools: flags plus the AST. [`IrArtifact`] is the normalised IR with the
//! features it uses.

use crate::strling::ast::Node;
use crate::strling::compiler::Feature;
use crate::strling::flags::Flags;
use crate::strling::ir::IrNode;
use serde::{Deserialize, Serialize};

pub const ARTIFACT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub version: String,
    pub flags: Flags,
    pub root: Node,
    /// Reserved for non-fatal findings; always empty today.
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Artifact {
    pub fn new(flags: Flags, root: Node) -> Self {
        Artifact {
            version: ARTIFACT_VERSION.to_string(),
            flags,
            root,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub features_used: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrArtifact {
    pub ir: IrNode,
    pub metadata: Metadata,
}

impl IrArtifact {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
