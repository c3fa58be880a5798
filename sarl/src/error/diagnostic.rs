//! Non-fatal compiler issues
//!
//! Diagnostics are returned as data; the validator decides how to render
//! them. Issue codes are part of the tooling contract and must not change.

use serde::{Deserialize, Serialize};

use crate::ast::{CallableId, Span};

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Issue code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// A value conversion through an accessor or helper call
    PotentialInefficientValueConversion,
    /// A cast that changes nothing
    ObsoleteCast,
    /// A cast with no defined conversion
    InvalidCast,
    /// Operator not defined for the operand kinds
    UnsupportedOperator,
    /// Statement after a definite early exit
    UnreachableCode,
    /// Call to a callable that carries a call-site issue
    DiscouragedCall,
}

impl IssueCode {
    pub const ALL: [IssueCode; 6] = [
        IssueCode::PotentialInefficientValueConversion,
        IssueCode::ObsoleteCast,
        IssueCode::InvalidCast,
        IssueCode::UnsupportedOperator,
        IssueCode::UnreachableCode,
        IssueCode::DiscouragedCall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::PotentialInefficientValueConversion => "POTENTIAL_INEFFICIENT_VALUE_CONVERSION",
            IssueCode::ObsoleteCast => "OBSOLETE_CAST",
            IssueCode::InvalidCast => "INVALID_CAST",
            IssueCode::UnsupportedOperator => "UNSUPPORTED_OPERATOR",
            IssueCode::UnreachableCode => "UNREACHABLE_CODE",
            IssueCode::DiscouragedCall => "DISCOURAGED_CALL",
        }
    }

    pub fn parse(code: &str) -> Option<IssueCode> {
        IssueCode::ALL.into_iter().find(|c| c.as_str() == code)
    }

    /// Severity used when no preference overrides it
    pub fn default_severity(&self) -> Severity {
        match self {
            IssueCode::InvalidCast | IssueCode::UnsupportedOperator => Severity::Error,
            IssueCode::PotentialInefficientValueConversion
            | IssueCode::ObsoleteCast
            | IssueCode::UnreachableCode
            | IssueCode::DiscouragedCall => Severity::Warning,
        }
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiler issue attached to an expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    /// Accessor or conversion helper the issue is about (`byteValue`, `toByte`)
    pub offending_accessor: Option<String>,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            offending_accessor: None,
            span: None,
        }
    }

    pub fn inefficient_conversion(source: &str, target: &str, accessor: &str) -> Self {
        Self {
            offending_accessor: Some(accessor.to_string()),
            ..Self::new(
                IssueCode::PotentialInefficientValueConversion,
                format!(
                    "Potentially inefficient value conversion from {source} to {target}: the value is converted with '{accessor}'"
                ),
            )
        }
    }

    pub fn obsolete_cast(source: &str, target: &str) -> Self {
        Self::new(IssueCode::ObsoleteCast, format!("Unnecessary cast from {source} to {target}"))
    }

    pub fn invalid_cast(source: &str, target: &str) -> Self {
        Self::new(IssueCode::InvalidCast, format!("Cannot cast from {source} to {target}"))
    }

    pub fn unreachable_code(span: Span) -> Self {
        Self::new(IssueCode::UnreachableCode, "Unreachable code").with_span(span)
    }

    /// `'legacy' is discouraged: <message>`, keeping the qualified callable
    pub fn discouraged_call(callable: &CallableId, message: &str, severity: Severity) -> Self {
        Self {
            severity,
            offending_accessor: Some(callable.to_string()),
            ..Self::new(
                IssueCode::DiscouragedCall,
                format!("'{}' is discouraged: {message}", callable.member_name()),
            )
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(span) = self.span {
            write!(f, " @ {span}")?;
        }
        Ok(())
    }
}
