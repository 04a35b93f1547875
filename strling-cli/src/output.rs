//! Rendering of each output mode and of parse errors

use lsp_types::Diagnostic;
use serde::Serialize;
use std::fmt;
use strling_config::{DiagnosticsConfig, DiagnosticsFormat, StrlingConfig};
use strling_core::strling::emitters::{Emitter, Pcre2Emitter};
use strling_core::{compile, compile_with_metadata, parse, parse_to_artifact, ParseError};

/// Version of the `--diagnostics` JSON protocol.
pub const DIAGNOSTICS_VERSION: &str = "1.0.0";

#[derive(Debug)]
pub enum CliError {
    Parse(ParseError),
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Parse(err) => write!(f, "{}", err),
            CliError::Json(err) => write!(f, "JSON serialization failed: {}", err),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ParseError> for CliError {
    fn from(err: ParseError) -> Self {
        CliError::Parse(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err)
    }
}

/// The PCRE2 pattern.
pub fn emit(source: &str, config: &StrlingConfig) -> Result<String, CliError> {
    let compiled = compile(source)?;
    let emitter = Pcre2Emitter::new().with_flags_prefix(config.emit.flags_prefix);
    Ok(emitter.emit(&compiled.ir, Some(&compiled.flags)))
}

/// The compilation artifact as JSON.
pub fn artifact(source: &str, config: &StrlingConfig) -> Result<String, CliError> {
    let artifact = parse_to_artifact(source)?;
    Ok(artifact.to_json(config.artifact.pretty)?)
}

/// Normalised IR plus feature metadata as JSON.
pub fn ir(source: &str, config: &StrlingConfig) -> Result<String, CliError> {
    let mut artifact = compile_with_metadata(source)?;
    if !config.artifact.include_features {
        artifact.metadata.features_used.clear();
    }
    Ok(artifact.to_json(config.artifact.pretty)?)
}

#[derive(Debug, Serialize)]
struct DiagnosticsReport {
    success: bool,
    diagnostics: Vec<Diagnostic>,
    version: &'static str,
}

/// LSP diagnostics for `source`, and whether it parsed.
pub fn diagnostics(source: &str, config: &StrlingConfig) -> Result<(bool, String), CliError> {
    let diagnostics = match parse(source) {
        Ok(_) => Vec::new(),
        Err(err) => vec![with_hint_setting(err, &config.diagnostics).to_lsp_diagnostic()],
    };
    let report = DiagnosticsReport {
        success: diagnostics.is_empty(),
        diagnostics,
        version: DIAGNOSTICS_VERSION,
    };
    let json = if config.artifact.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok((report.success, json))
}

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    message: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
}

/// A parse error in the configured diagnostics format.
pub fn render_error(err: &ParseError, config: &DiagnosticsConfig) -> String {
    let err = with_hint_setting(err.clone(), config);
    let json = match config.format {
        DiagnosticsFormat::Text => return err.to_formatted_string(),
        DiagnosticsFormat::Json => {
            let (line, column) = err.line_col();
            serde_json::to_string_pretty(&ErrorReport {
                message: &err.message,
                pos: err.pos,
                line,
                column,
                hint: err.hint.as_deref(),
            })
        }
        DiagnosticsFormat::Lsp => serde_json::to_string_pretty(&err.to_lsp_diagnostic()),
    };
    json.unwrap_or_else(|_| err.to_formatted_string())
}

fn with_hint_setting(err: ParseError, config: &DiagnosticsConfig) -> ParseError {
    if config.hints {
        err
    } else {
        err.without_hint()
    }
}
