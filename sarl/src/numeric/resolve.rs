//! Operator resolution
//!
//! Turns an operator and the static descriptors of its operands into a
//! [`LoweringDescriptor`]. Arithmetic goes through the promotion table;
//! casts are planned in [`super::cast`].

use serde::Serialize;
use tracing::trace;

use super::cast::lower_cast;
use super::kind::{NumericKind, Primitive};
use super::lowering::{Accessor, AccessorChain, LoweringDescriptor, NullGuard, Shape, Side};
use super::table::{promotion_table, OperatorSpec, OperatorSymbol, Promotion};
use crate::ast::{BinOp, TypeRef};
use crate::error::{CompileError, Result};

/// Static facts about one operand at a call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OperandDescriptor {
    pub kind: NumericKind,
    pub nullable: bool,
}

impl OperandDescriptor {
    /// Nullable exactly when `kind` is a reference kind
    pub fn new(kind: NumericKind) -> Self {
        Self {
            kind,
            nullable: kind.is_reference(),
        }
    }

    /// Operand proven non-null by the front-end
    pub fn non_null(kind: NumericKind) -> Self {
        Self { kind, nullable: false }
    }

    fn guarded(&self) -> bool {
        self.nullable && self.kind.is_reference()
    }
}

/// Operator of an expression node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Binary(BinOp),
    Negate,
    /// `expr as Type`
    Cast(TypeRef),
}

impl Operator {
    pub fn symbol(&self) -> OperatorSymbol {
        match self {
            Operator::Binary(op) => OperatorSymbol::from_binop(*op),
            Operator::Negate => OperatorSymbol::UnaryMinus,
            Operator::Cast(_) => OperatorSymbol::Cast,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Operator::Binary(_) => 2,
            Operator::Negate | Operator::Cast(_) => 1,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Binary(op) => write!(f, "{op}"),
            Operator::Negate => write!(f, "-"),
            Operator::Cast(target) => write!(f, "as {target}"),
        }
    }
}

/// Resolve an operator expression.
///
/// Cast problems are reported as diagnostics inside the descriptor. Operator
/// and kind combinations missing from the promotion table, and operand counts
/// that do not match the operator, are errors.
pub fn resolve(op: &Operator, left: OperandDescriptor, right: Option<OperandDescriptor>) -> Result<LoweringDescriptor> {
    let lowering = match (op, right) {
        (Operator::Binary(bin), Some(right)) => lower_binary(*bin, left, right)?,
        (Operator::Negate, None) => lower_negate(left)?,
        (Operator::Cast(target), None) => lower_cast(left, target),
        (op, right) => {
            return Err(CompileError::unsupported_operator(format!(
                "operator '{}' takes {} operand(s), got {}",
                op.symbol(),
                op.arity(),
                1 + usize::from(right.is_some())
            )));
        }
    };
    trace!(operator = %op, left = %left.kind, result = %lowering.result, "resolved operator");
    Ok(lowering)
}

fn lower_binary(op: BinOp, left: OperandDescriptor, right: OperandDescriptor) -> Result<LoweringDescriptor> {
    let spec = OperatorSpec::binary(op, left.kind, right.kind);
    let promotion = lookup(&spec)?;
    let (left_chain, right_chain, shape) = match promotion {
        Promotion::Primitive(_) => (unbox_chain(left.kind), unbox_chain(right.kind), Shape::Infix(op)),
        Promotion::Power => (unbox_chain(left.kind), unbox_chain(right.kind), Shape::Power),
        Promotion::Big(kind) => (
            big_chain(left.kind, kind),
            big_chain(right.kind, kind),
            Shape::BigMethod { op, kind },
        ),
    };
    let guards: Vec<NullGuard> = [(Side::Left, left), (Side::Right, right)]
        .into_iter()
        .filter(|(_, operand)| operand.guarded())
        .map(|(operand, _)| NullGuard { operand })
        .collect();
    let result = promotion.result();
    Ok(LoweringDescriptor {
        result: result.into(),
        result_nullable: result.is_reference() && !guards.is_empty(),
        left: left_chain,
        right: Some(right_chain),
        guards,
        diagnostic: None,
        shape,
    })
}

fn lower_negate(operand: OperandDescriptor) -> Result<LoweringDescriptor> {
    let promotion = lookup(&OperatorSpec::unary_minus(operand.kind))?;
    let guards = if operand.guarded() {
        vec![NullGuard { operand: Side::Left }]
    } else {
        Vec::new()
    };
    Ok(LoweringDescriptor {
        result: promotion.result().into(),
        result_nullable: false,
        left: unbox_chain(operand.kind),
        right: None,
        guards,
        diagnostic: None,
        shape: Shape::Negate,
    })
}

fn lookup(spec: &OperatorSpec) -> Result<Promotion> {
    promotion_table()
        .lookup(spec)
        .ok_or_else(|| CompileError::unsupported_operator(format!("{spec} is not defined")))
}

/// Primitive operands are used as is; boxed and atomic ones through their own accessor
pub(super) fn unbox_chain(kind: NumericKind) -> AccessorChain {
    match kind.primitive() {
        Some(p) if kind.is_reference() => AccessorChain::of([Accessor::Value(p)]),
        _ => AccessorChain::identity(),
    }
}

/// Conversion of any numeric operand to `BigInteger` or `BigDecimal`
pub(super) fn big_chain(source: NumericKind, target: NumericKind) -> AccessorChain {
    use Accessor::*;

    if source == target {
        return AccessorChain::identity();
    }
    match (source, target) {
        (NumericKind::BigInteger, NumericKind::BigDecimal) => AccessorChain::of([NewInstance(target)]),
        (NumericKind::BigDecimal, NumericKind::BigInteger) => AccessorChain::of([ToBigInteger]),
        (source, NumericKind::BigInteger) if source.is_primitive() && source.is_floating() => {
            AccessorChain::of([Narrow(Primitive::Long), ValueOf(target)])
        }
        (source, _) if source.is_primitive() => AccessorChain::of([ValueOf(target)]),
        (source, _) => {
            let width = if source.is_floating() && target == NumericKind::BigDecimal {
                Primitive::Double
            } else {
                Primitive::Long
            };
            AccessorChain::of([Value(width), ValueOf(target)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn binary(op: BinOp, left: OperandDescriptor, right: OperandDescriptor) -> LoweringDescriptor {
        resolve(&Operator::Binary(op), left, Some(right)).unwrap()
    }

    #[test]
    fn test_short_minus_atomic_integer() {
        let d = binary(
            BinOp::Sub,
            OperandDescriptor::non_null(NumericKind::BoxedShort),
            OperandDescriptor::non_null(NumericKind::AtomicInt),
        );
        assert_eq!(d.result_kind(), Some(NumericKind::Int));
        assert!(!d.null_guard_required());
        assert_snapshot!(d.render("left", Some("right")).unwrap(), @"(left.shortValue() - right.intValue())");
    }

    #[test]
    fn test_nullable_operands_are_guarded() {
        let d = binary(
            BinOp::Sub,
            OperandDescriptor::new(NumericKind::BoxedShort),
            OperandDescriptor::new(NumericKind::AtomicInt),
        );
        assert_eq!(d.guards.len(), 2);
        assert_snapshot!(
            d.render("left", Some("right")).unwrap(),
            @"(left == null || right == null ? 0 : left.shortValue() - right.intValue())"
        );
    }

    #[test]
    fn test_short_minus_number_is_double() {
        let d = binary(
            BinOp::Sub,
            OperandDescriptor::non_null(NumericKind::BoxedShort),
            OperandDescriptor::non_null(NumericKind::Number),
        );
        assert_eq!(d.result_kind(), Some(NumericKind::Double));
        assert_snapshot!(d.render("left", Some("right")).unwrap(), @"(left.shortValue() - right.doubleValue())");
    }

    #[test]
    fn test_primitive_operands_need_no_accessor() {
        let d = binary(
            BinOp::Add,
            OperandDescriptor::new(NumericKind::Int),
            OperandDescriptor::new(NumericKind::Long),
        );
        assert_eq!(d.result_kind(), Some(NumericKind::Long));
        assert!(d.left.is_identity());
        assert_snapshot!(d.render("a", Some("b")).unwrap(), @"(a + b)");
    }

    #[test]
    fn test_power() {
        let d = binary(
            BinOp::Pow,
            OperandDescriptor::non_null(NumericKind::BoxedShort),
            OperandDescriptor::new(NumericKind::Int),
        );
        assert_eq!(d.result_kind(), Some(NumericKind::Double));
        assert_snapshot!(d.render("left", Some("right")).unwrap(), @"Math.pow(left.shortValue(), right)");
    }

    #[test]
    fn test_negate() {
        let d = resolve(&Operator::Negate, OperandDescriptor::non_null(NumericKind::BoxedShort), None).unwrap();
        assert_eq!(d.result_kind(), Some(NumericKind::Int));
        assert_snapshot!(d.render("left", None).unwrap(), @"(-(left.shortValue()))");
    }

    #[test]
    fn test_big_integer_plus_atomic_long() {
        let d = binary(
            BinOp::Add,
            OperandDescriptor::non_null(NumericKind::BigInteger),
            OperandDescriptor::non_null(NumericKind::AtomicLong),
        );
        assert_eq!(d.result_kind(), Some(NumericKind::BigInteger));
        assert_snapshot!(
            d.render("left", Some("right")).unwrap(),
            @"left.add(BigInteger.valueOf(right.longValue()))"
        );
    }

    #[test]
    fn test_big_integer_mod_big_decimal() {
        let d = binary(
            BinOp::Mod,
            OperandDescriptor::new(NumericKind::BigInteger),
            OperandDescriptor::non_null(NumericKind::BigDecimal),
        );
        assert_eq!(d.result_kind(), Some(NumericKind::BigDecimal));
        assert!(d.result_nullable);
        assert_snapshot!(
            d.render("left", Some("right")).unwrap(),
            @"(left == null ? null : new BigDecimal(left).remainder(right))"
        );
    }

    #[test]
    fn test_big_operators_unsupported() {
        let err = resolve(&Operator::Negate, OperandDescriptor::new(NumericKind::BigDecimal), None).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedOperator { .. }));
        let err = resolve(
            &Operator::Binary(BinOp::Pow),
            OperandDescriptor::new(NumericKind::BigInteger),
            Some(OperandDescriptor::new(NumericKind::Int)),
        )
        .unwrap_err();
        assert!(err.message().contains("BigInteger ** int"));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = resolve(&Operator::Binary(BinOp::Add), OperandDescriptor::new(NumericKind::Int), None).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedOperator { .. }));
    }

    #[test]
    fn test_big_chain_from_float_primitive() {
        assert_snapshot!(
            big_chain(NumericKind::Double, NumericKind::BigInteger).apply("x"),
            @"BigInteger.valueOf(((long) x))"
        );
        assert_snapshot!(
            big_chain(NumericKind::AtomicDouble, NumericKind::BigDecimal).apply("x"),
            @"BigDecimal.valueOf(x.doubleValue())"
        );
    }
}
