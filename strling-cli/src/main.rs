//! Command-line interface for STRling
//! This binary compiles a STRling pattern and prints the PCRE2 regex, the
//! compilation artifact, the IR or editor diagnostics.
//!
//! Usage:
//!   strling [PATH]                   - Print the PCRE2 pattern (default)
//!   strling [PATH] --artifact        - Print the compilation artifact as JSON
//!   strling [PATH] --ir              - Print the IR with feature metadata
//!   strling [PATH] --diagnostics     - Print LSP diagnostics as JSON
//!
//! PATH may be `-` or omitted to read stdin. Exit codes: 0 success, 1 usage,
//! IO or configuration failure, 2 parse error.

mod output;

use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use output::CliError;
use std::io::Read;
use std::process;
use strling_config::{ConfigError, Loader, StrlingConfig};
use strling_core::strling::emitters;

const EXIT_FAILURE: i32 = 1;
const EXIT_PARSE_ERROR: i32 = 2;

/// Picked up from the working directory when present.
const LOCAL_CONFIG: &str = "strling.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Emit,
    Artifact,
    Ir,
    Diagnostics,
}

fn build_cli() -> Command {
    Command::new("strling")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile STRling patterns to PCRE2 regular expressions")
        .arg(
            Arg::new("path")
                .help("Pattern file to compile ('-' or omitted reads stdin)")
                .index(1),
        )
        .arg(
            Arg::new("emit")
                .long("emit")
                .help("Print the PCRE2 pattern (default)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("artifact")
                .long("artifact")
                .help("Print the compilation artifact (flags and AST) as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ir")
                .long("ir")
                .help("Print the normalised IR and the features it uses as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("diagnostics")
                .long("diagnostics")
                .help("Print LSP diagnostics as JSON")
                .action(ArgAction::SetTrue),
        )
        .group(
            ArgGroup::new("mode")
                .args(["emit", "artifact", "ir", "diagnostics"])
                .multiple(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline stages to stderr")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = build_cli().try_get_matches().unwrap_or_else(|e| {
        let code = if e.use_stderr() { EXIT_FAILURE } else { 0 };
        let _ = e.print();
        process::exit(code);
    });

    init_logging(matches.get_flag("verbose"));

    let config = load_config(matches.get_one::<String>("config")).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(EXIT_FAILURE);
    });
    if emitters::for_target(&config.emit.target).is_none() {
        eprintln!(
            "Unsupported emit target '{}' (available: pcre2)",
            config.emit.target
        );
        process::exit(EXIT_FAILURE);
    }

    let path = matches.get_one::<String>("path").map(String::as_str);
    let source = read_source(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path.unwrap_or("stdin"), e);
        process::exit(EXIT_FAILURE);
    });

    process::exit(run(selected_mode(&matches), &source, &config));
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn load_config(path: Option<&String>) -> Result<StrlingConfig, ConfigError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    let config = loader.build()?;
    log::debug!("loaded configuration: {:?}", config);
    Ok(config)
}

/// Read the pattern, dropping the final line break editors append.
fn read_source(path: Option<&str>) -> std::io::Result<String> {
    let mut source = match path {
        None | Some("-") => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            source
        }
        Some(path) => std::fs::read_to_string(path)?,
    };
    if source.ends_with('\n') {
        source.pop();
        if source.ends_with('\r') {
            source.pop();
        }
    }
    Ok(source)
}

fn selected_mode(matches: &ArgMatches) -> Mode {
    if matches.get_flag("artifact") {
        Mode::Artifact
    } else if matches.get_flag("ir") {
        Mode::Ir
    } else if matches.get_flag("diagnostics") {
        Mode::Diagnostics
    } else {
        Mode::Emit
    }
}

/// Run one mode, print its output and return the exit code.
fn run(mode: Mode, source: &str, config: &StrlingConfig) -> i32 {
    log::debug!("running {:?} on {} chars", mode, source.chars().count());
    let result = match mode {
        Mode::Emit => output::emit(source, config),
        Mode::Artifact => output::artifact(source, config),
        Mode::Ir => output::ir(source, config),
        Mode::Diagnostics => match output::diagnostics(source, config) {
            Ok((success, json)) => {
                println!("{}", json);
                return if success { 0 } else { EXIT_PARSE_ERROR };
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(CliError::Parse(err)) => {
            eprintln!("{}", output::render_error(&err, &config.diagnostics));
            EXIT_PARSE_ERROR
        }
        Err(e) => {
            eprintln!("{}", e);
            EXIT_FAILURE
        }
    }
}
