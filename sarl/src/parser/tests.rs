//! Operator-query parser tests

use crate::ast::{BinOp, Span, TypeRef};
use crate::error::IssueCode;
use crate::lexer::tokenize;
use crate::numeric::{NumericKind, Operator};
use crate::parser::{parse_query, Query};

fn parse(source: &str) -> crate::Result<Query> {
    let tokens = tokenize(source)?;
    parse_query(source, tokens)
}

fn parse_ok(source: &str) -> Query {
    parse(source).expect("query should parse")
}

fn parse_err(source: &str) -> String {
    parse(source).expect_err("query should fail").message().to_string()
}

// ============================================
// Query shapes
// ============================================

#[test]
fn test_parse_named_binary() {
    let query = parse_ok("left: Short - right: AtomicInteger!");
    assert_eq!(query.operator, Operator::Binary(BinOp::Sub));
    assert_eq!(query.left.name, "left");
    assert_eq!(query.left.kind, NumericKind::BoxedShort);
    assert!(query.left.nullable);
    let right = query.right.as_ref().unwrap();
    assert_eq!(right.kind, NumericKind::AtomicInt);
    assert!(!right.nullable);
}

#[test]
fn test_parse_default_names() {
    let query = parse_ok("int ** long");
    assert_eq!(query.left.name, "left");
    assert_eq!(query.right.as_ref().unwrap().name, "right");
    assert_eq!(query.operator, Operator::Binary(BinOp::Pow));
}

#[test]
fn test_parse_all_binary_operators() {
    for (text, op) in [
        ("+", BinOp::Add),
        ("-", BinOp::Sub),
        ("*", BinOp::Mul),
        ("/", BinOp::Div),
        ("%", BinOp::Mod),
        ("**", BinOp::Pow),
    ] {
        let query = parse_ok(&format!("int {text} int"));
        assert_eq!(query.operator, Operator::Binary(op), "operator {text}");
    }
}

#[test]
fn test_parse_negation() {
    let query = parse_ok("-x: Short!");
    assert_eq!(query.operator, Operator::Negate);
    assert_eq!(query.left.name, "x");
    assert!(query.right.is_none());
}

#[test]
fn test_parse_cast() {
    let query = parse_ok("left: AtomicLong as byte");
    assert_eq!(query.operator, Operator::Cast(TypeRef::Numeric(NumericKind::Byte)));
    let query = parse_ok("AtomicLong as java.util.UUID");
    assert_eq!(query.operator, Operator::Cast(TypeRef::Named("java.util.UUID".into())));
}

#[test]
fn test_parse_qualified_operand_type() {
    let query = parse_ok("a: java.util.concurrent.atomic.AtomicLong? + b: java.math.BigInteger");
    assert_eq!(query.left.kind, NumericKind::AtomicLong);
    assert_eq!(query.right.as_ref().unwrap().kind, NumericKind::BigInteger);
}

#[test]
fn test_operand_span_covers_name_and_marker() {
    let query = parse_ok("x: Long! as int");
    assert_eq!(query.left.span, Span::new(0, 8));
}

// ============================================
// Errors
// ============================================

#[test]
fn test_unknown_type_suggests() {
    let message = parse_err("left: AtomicLonng as byte");
    assert!(message.contains("unknown numeric type 'AtomicLonng'"));
    assert!(message.contains("did you mean `AtomicLong`?"));
}

#[test]
fn test_non_numeric_operand_rejected() {
    let message = parse_err("String + int");
    assert!(message.contains("unknown numeric type 'String'"));
}

#[test]
fn test_nullable_primitive_rejected() {
    assert!(parse_err("int? + int").contains("cannot be nullable"));
}

#[test]
fn test_missing_operator() {
    let err = parse("int").unwrap_err();
    assert!(err.message().contains("unexpected end of query"));
    assert_eq!(err.span(), Some(Span::new(3, 3)));
    assert!(parse_err("int int").contains("unexpected 'int'"));
}

#[test]
fn test_trailing_tokens() {
    let err = parse("int + int int").unwrap_err();
    assert!(err.message().contains("unexpected 'int'"));
    assert_eq!(err.span(), Some(Span::new(10, 13)));
}

#[test]
fn test_missing_cast_target() {
    let err = parse("AtomicLong as").unwrap_err();
    assert!(err.message().contains("end of query"));
    assert_eq!(err.span(), Some(Span::new(13, 13)));
}

#[test]
fn test_expected_tokens_listed() {
    assert!(parse_err("x: +").contains("expected one of"));
}

#[test]
fn test_empty_query() {
    let err = parse("").unwrap_err();
    assert!(err.message().contains("unexpected end of query"));
}

#[test]
fn test_left_operand_checked_first() {
    assert!(parse_err("Strng + Foo").contains("'Strng'"));
}

// ============================================
// Parse and resolve
// ============================================

#[test]
fn test_resolve_and_render() {
    let query = parse_ok("left: Short! - right: AtomicInteger!");
    let lowering = query.resolve().unwrap();
    assert_eq!(lowering.result_kind(), Some(NumericKind::Int));
    assert_eq!(
        query.render(&lowering).as_deref(),
        Some("(left.shortValue() - right.intValue())")
    );
}

#[test]
fn test_resolve_invalid_cast() {
    let query = parse_ok("left: AtomicLong as UUID");
    let lowering = query.resolve().unwrap();
    assert_eq!(lowering.diagnostic.as_ref().map(|d| d.code), Some(IssueCode::InvalidCast));
    assert_eq!(query.render(&lowering), None);
}
