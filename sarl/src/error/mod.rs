//! Error types and reporting

mod diagnostic;

pub use diagnostic::{Diagnostic, IssueCode, Severity};

use crate::ast::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CompileError>;

/// Compile error
///
/// Fatal for the unit of work that produced it: one query, one expression,
/// or one configuration load. User-facing cast problems are [`Diagnostic`]s
/// instead.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    /// Operator/kind combination absent from the promotion table
    #[error("Unsupported operator: {message}")]
    UnsupportedOperator { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("JSON error: {message}")]
    Json { message: String },
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn unsupported_operator(message: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn json_error(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. } => Some(*span),
            Self::Parser { span, .. } => Some(*span),
            Self::UnsupportedOperator { .. } | Self::Config { .. } | Self::Io { .. } | Self::Json { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexer { message, .. } => message,
            Self::Parser { message, .. } => message,
            Self::UnsupportedOperator { message } => message,
            Self::Config { message } => message,
            Self::Io { message } => message,
            Self::Json { message } => message,
        }
    }

    /// Error-severity `UNSUPPORTED_OPERATOR` diagnostic for the validator, so
    /// one failing expression does not stop the pass. Other errors have no
    /// issue code and yield `None`.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        let Self::UnsupportedOperator { message } = self else {
            return None;
        };
        Some(Diagnostic::new(IssueCode::UnsupportedOperator, message.as_str()).with_severity(Severity::Error))
    }
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, error: &CompileError) -> std::io::Result<()> {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = match error {
        CompileError::Lexer { .. } => "Lexer",
        CompileError::Parser { .. } => "Parser",
        CompileError::UnsupportedOperator { .. } => "Operator",
        CompileError::Config { .. } => "Config",
        CompileError::Io { .. } => "IO",
        CompileError::Json { .. } => "JSON",
    };

    if let Some(span) = error.span() {
        Report::build(ReportKind::Error, (filename, span.start..span.end))
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_message(error.message())
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename, Source::from(source)))
    } else {
        Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind} error: {}", error.message()))
            .finish()
            .eprint((filename, Source::from(source)))
    }
}

/// Report a diagnostic with ariadne
pub fn report_diagnostic(filename: &str, source: &str, diagnostic: &Diagnostic) -> std::io::Result<()> {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let (kind, color) = match diagnostic.severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warning => (ReportKind::Warning, Color::Yellow),
        Severity::Info => (ReportKind::Advice, Color::Blue),
    };
    let range = diagnostic.span.map_or(0..0, |span| span.start..span.end);

    let mut report = Report::build(kind, (filename, range.clone()))
        .with_code(diagnostic.code.as_str())
        .with_message(&diagnostic.message);
    if diagnostic.span.is_some() {
        let mut label = Label::new((filename, range)).with_color(color);
        if let Some(accessor) = &diagnostic.offending_accessor {
            label = label.with_message(match diagnostic.code {
                IssueCode::DiscouragedCall => format!("call to '{accessor}'"),
                _ => format!("converted with '{accessor}'"),
            });
        }
        report = report.with_label(label);
    }
    report.finish().eprint((filename, Source::from(source)))
}
