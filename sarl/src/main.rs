//! SARL Compiler Core CLI

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use sarl::ast::Program;
use sarl::config::SarlConfig;
use sarl::error::{report_diagnostic, report_error};
use sarl::numeric::{promotion_table, OperatorSymbol};
use sarl::{CompileError, Diagnostic};

const QUERY_NAME: &str = "<query>";

#[derive(Parser)]
#[command(name = "sarl", version, about = "SARL compiler core - numeric lowering and early-exit analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an operator query and print its Java lowering
    Lower {
        /// Query such as "left: Short - right: AtomicInteger!" or "x: AtomicLong as byte"
        query: String,
        /// Print the lowering descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a serialized compilation unit
    Check {
        /// JSON compilation unit
        file: PathBuf,
        /// sarl.toml configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// SARL source the unit's spans point into, for labelled reports
        #[arg(long)]
        source: Option<PathBuf>,
    },
    /// Dump the promotion table (debug)
    Table {
        /// Restrict to one operator: + - * / % ** neg
        #[arg(long)]
        op: Option<String>,
    },
    /// Tokenize a query and dump tokens (debug)
    Tokens {
        query: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Lower { query, json } => lower_query(&query, json),
        Command::Check { file, config, source } => check_file(&file, config.as_deref(), source.as_deref()),
        Command::Table { op } => dump_table(op.as_deref()),
        Command::Tokens { query } => dump_tokens(&query),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the query produced an error diagnostic
fn lower_query(query: &str, json: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let parsed = match sarl::lexer::tokenize(query).and_then(|tokens| sarl::parser::parse_query(query, tokens)) {
        Ok(parsed) => parsed,
        Err(e) => {
            report_error(QUERY_NAME, query, &e)?;
            return Ok(false);
        }
    };

    let lowering = match parsed.resolve() {
        Ok(lowering) => lowering,
        Err(e) => {
            match e.to_diagnostic() {
                Some(diagnostic) => report_diagnostic(QUERY_NAME, query, &diagnostic.with_span(parsed.span))?,
                None => report_error(QUERY_NAME, query, &e)?,
            }
            return Ok(false);
        }
    };
    let lowered = parsed.render(&lowering);

    if json {
        let report = serde_json::json!({
            "query": query,
            "lowered": lowered,
            "descriptor": lowering,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &lowered {
            Some(expr) => println!("{expr} : {}", lowering.result),
            None => println!("<no lowering> : {}", lowering.result),
        }
    }

    if let Some(diagnostic) = &lowering.diagnostic {
        report_diagnostic(QUERY_NAME, query, &diagnostic.clone().with_span(parsed.span))?;
    }
    Ok(!lowering.diagnostic.as_ref().is_some_and(Diagnostic::is_error))
}

fn check_file(path: &Path, config: Option<&Path>, source: Option<&Path>) -> Result<bool, Box<dyn std::error::Error>> {
    let unit = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let program: Program =
        serde_json::from_str(&unit).map_err(|e| CompileError::json_error(format!("{filename}: {e}")))?;
    let config = match config {
        Some(config) => SarlConfig::load(config)?,
        None => SarlConfig::default(),
    };

    let diagnostics = sarl::validate::check_program(&program, &config)?;
    // Without the SARL source, spans cannot be labelled
    let (report_name, report_source) = match source {
        Some(source) => (source.display().to_string(), std::fs::read_to_string(source)?),
        None => (filename.clone(), String::new()),
    };
    for diagnostic in &diagnostics {
        let diagnostic = match source {
            Some(_) => diagnostic.clone(),
            None => Diagnostic {
                span: None,
                ..diagnostic.clone()
            },
        };
        report_diagnostic(&report_name, &report_source, &diagnostic)?;
    }
    for title in sarl::validate::fall_through_items(&program, &config) {
        println!("{title}: synthetic return required");
    }

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    if errors > 0 {
        println!("✗ {filename}: {errors} error(s), {} diagnostic(s)", diagnostics.len());
        return Ok(false);
    }
    println!("✓ {filename} checks successfully ({} diagnostic(s))", diagnostics.len());
    Ok(true)
}

fn dump_table(op: Option<&str>) -> Result<bool, Box<dyn std::error::Error>> {
    let symbol = match op {
        Some(text) => Some(
            OperatorSymbol::parse(text)
                .ok_or_else(|| CompileError::unsupported_operator(format!("unknown operator '{text}'")))?,
        ),
        None => None,
    };
    for (spec, promotion) in promotion_table().entries(symbol) {
        println!("{spec} => {} ({promotion:?})", promotion.result());
    }
    Ok(true)
}

fn dump_tokens(query: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let tokens = sarl::lexer::tokenize(query)?;
    for (tok, span) in &tokens {
        println!("{:?} @ {}..{}", tok, span.start, span.end);
    }
    Ok(true)
}
