//! Operator-query parser using lalrpop
//!
//! `!` marks an operand proven non-null, `?` a nullable one. Reference
//! kinds are nullable unless marked.

use serde::Serialize;

use crate::ast::{BinOp, Span, TypeRef};
use crate::error::{CompileError, Result};
use crate::lexer::Token;
use crate::numeric::{self, LoweringDescriptor, NumericKind, OperandDescriptor, Operator};
use crate::util::{format_suggestion_hint, suggest_numeric_kind};

#[cfg(test)]
mod tests;

lalrpop_util::lalrpop_mod!(
    #[allow(clippy::all)]
    grammar
);

/// One operand of a query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOperand {
    /// Source expression used when rendering, `left` or `right` by default
    pub name: String,
    pub kind: NumericKind,
    pub nullable: bool,
    pub span: Span,
}

impl QueryOperand {
    pub fn descriptor(&self) -> OperandDescriptor {
        OperandDescriptor {
            kind: self.kind,
            nullable: self.nullable,
        }
    }
}

/// A parsed operator query
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub operator: Operator,
    pub left: QueryOperand,
    pub right: Option<QueryOperand>,
    pub span: Span,
}

impl Query {
    pub fn resolve(&self) -> Result<LoweringDescriptor> {
        numeric::resolve(
            &self.operator,
            self.left.descriptor(),
            self.right.as_ref().map(QueryOperand::descriptor),
        )
    }

    /// Lowered Java expression over the operand names
    pub fn render(&self, lowering: &LoweringDescriptor) -> Option<String> {
        lowering.render(&self.left.name, self.right.as_ref().map(|r| r.name.as_str()))
    }
}

pub(crate) enum Marker {
    NonNull,
    Nullable,
}

/// Operand as written, before its type name is checked
pub(crate) struct RawOperand {
    pub name: Option<String>,
    pub type_name: String,
    pub type_span: Span,
    pub marker: Option<Marker>,
    pub span: Span,
}

pub(crate) enum RawOperator {
    Binary(BinOp),
    Negate,
    Cast(String),
}

pub(crate) struct RawQuery {
    pub operator: RawOperator,
    pub left: RawOperand,
    pub right: Option<RawOperand>,
    pub span: Span,
}

/// Parse a query from its tokens
pub fn parse_query(_source: &str, tokens: Vec<(Token, Span)>) -> Result<Query> {
    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| (span.start, tok, span.end));

    let raw = grammar::QueryParser::new().parse(token_iter).map_err(|e| {
        let (message, span) = match e {
            lalrpop_util::ParseError::InvalidToken { location } => {
                ("invalid token".to_string(), Span::new(location, location + 1))
            }
            lalrpop_util::ParseError::UnrecognizedEof { location, expected } => (
                format!("unexpected end of query{}", expected_hint(&expected)),
                Span::new(location, location),
            ),
            lalrpop_util::ParseError::UnrecognizedToken {
                token: (start, token, end),
                expected,
            } => (format!("unexpected '{token}'{}", expected_hint(&expected)), Span::new(start, end)),
            lalrpop_util::ParseError::ExtraToken { token: (start, token, end) } => {
                (format!("unexpected '{token}' after query"), Span::new(start, end))
            }
            lalrpop_util::ParseError::User { error } => (error.to_string(), Span::new(0, 1)),
        };
        CompileError::parser(message, span)
    })?;

    let left = operand(raw.left, "left")?;
    let right = match raw.right {
        Some(right) => Some(operand(right, "right")?),
        None => None,
    };
    let operator = match raw.operator {
        RawOperator::Binary(op) => Operator::Binary(op),
        RawOperator::Negate => Operator::Negate,
        RawOperator::Cast(target) => Operator::Cast(TypeRef::from_name(&target)),
    };
    Ok(Query {
        operator,
        left,
        right,
        span: raw.span,
    })
}

fn expected_hint(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(", expected one of {}", expected.join(", "))
    }
}

/// Check the written type name and nullability of an operand
fn operand(raw: RawOperand, default_name: &str) -> Result<QueryOperand> {
    let kind = NumericKind::from_java_name(&raw.type_name).ok_or_else(|| {
        CompileError::parser(
            format!(
                "unknown numeric type '{}'{}",
                raw.type_name,
                format_suggestion_hint(suggest_numeric_kind(&raw.type_name))
            ),
            raw.type_span,
        )
    })?;

    let nullable = match raw.marker {
        Some(Marker::NonNull) => false,
        Some(Marker::Nullable) if !kind.is_reference() => {
            return Err(CompileError::parser(
                format!("primitive type '{kind}' cannot be nullable"),
                Span::new(raw.type_span.start, raw.span.end),
            ));
        }
        Some(Marker::Nullable) => true,
        None => kind.is_reference(),
    };

    Ok(QueryOperand {
        name: raw.name.unwrap_or_else(|| default_name.to_string()),
        kind,
        nullable,
        span: raw.span,
    })
}
