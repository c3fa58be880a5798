//! Lowering descriptors and their rendering to Java source

use serde::Serialize;

use super::kind::{NumericKind, Primitive};
use crate::ast::{BinOp, TypeRef};
use crate::error::Diagnostic;

/// One conversion step applied to an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Accessor {
    /// `x.intValue()`
    Value(Primitive),
    /// `((byte) x)`
    Narrow(Primitive),
    /// `Integer.valueOf(x)`, `BigInteger.valueOf(x)`
    ValueOf(NumericKind),
    /// `new AtomicLong(x)`, `new BigDecimal(x)`
    NewInstance(NumericKind),
    /// `x.toBigInteger()`
    ToBigInteger,
    /// `x.toString()`
    ToString,
    /// `Integer.toString(x)`
    StaticToString(Primitive),
}

impl Accessor {
    pub fn apply(&self, src: &str) -> String {
        match self {
            Accessor::Value(p) => format!("{src}.{}()", p.value_accessor()),
            Accessor::Narrow(p) => format!("(({}) {src})", p.name()),
            Accessor::ValueOf(kind) => format!("{kind}.valueOf({src})"),
            Accessor::NewInstance(kind) => format!("new {kind}({src})"),
            Accessor::ToBigInteger => format!("{src}.toBigInteger()"),
            Accessor::ToString => format!("{src}.toString()"),
            Accessor::StaticToString(p) => format!("{}.toString({src})", p.boxed()),
        }
    }
}

/// Conversion steps for one operand, applied innermost first.
/// An empty chain is the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccessorChain(Vec<Accessor>);

impl AccessorChain {
    pub fn identity() -> Self {
        Self(Vec::new())
    }

    pub fn of(accessors: impl IntoIterator<Item = Accessor>) -> Self {
        Self(accessors.into_iter().collect())
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_empty()
    }

    pub fn accessors(&self) -> &[Accessor] {
        &self.0
    }

    pub fn apply(&self, src: &str) -> String {
        self.0.iter().fold(src.to_string(), |acc, accessor| accessor.apply(&acc))
    }
}

/// Operand position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Left,
    Right,
}

/// Runtime `null` test on one operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NullGuard {
    pub operand: Side,
}

/// Target construct the renderer emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    /// `l op r`
    Infix(BinOp),
    /// `-(l)`
    Negate,
    /// `Math.pow(l, r)`
    Power,
    /// `l.add(r)` on `BigInteger`/`BigDecimal`
    BigMethod { op: BinOp, kind: NumericKind },
    /// The converted left operand itself (casts)
    Conversion,
    /// Nothing can be emitted (invalid cast)
    None,
}

/// Result of resolving one operator expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoweringDescriptor {
    pub result: TypeRef,
    pub result_nullable: bool,
    pub left: AccessorChain,
    pub right: Option<AccessorChain>,
    pub guards: Vec<NullGuard>,
    pub diagnostic: Option<Diagnostic>,
    pub shape: Shape,
}

impl LoweringDescriptor {
    pub fn null_guard_required(&self) -> bool {
        !self.guards.is_empty()
    }

    pub fn result_kind(&self) -> Option<NumericKind> {
        self.result.as_numeric()
    }

    /// Value a guarded expression short-circuits to
    pub fn default_value(&self) -> &'static str {
        match self.result.as_numeric() {
            Some(kind) if kind.is_primitive() => kind.primitive().map_or("null", Primitive::zero_literal),
            _ => "null",
        }
    }

    /// Lowered Java expression for the given operand sources.
    /// `None` for invalid casts, or when a binary lowering is missing its right operand.
    ///
    /// A guarded operand's source appears twice, in the `null` test and in
    /// the converted value, so sources must be side-effect free: a local, a
    /// parameter or a field read. The code generator binds anything else to a
    /// temporary first.
    pub fn render(&self, left: &str, right: Option<&str>) -> Option<String> {
        let l = self.left.apply(left);
        let r = match (&self.right, right) {
            (Some(chain), Some(src)) => Some(chain.apply(src)),
            (Some(_), None) => return None,
            (None, _) => None,
        };

        let core = match (self.shape, r) {
            (Shape::Infix(op), Some(r)) => format!("{l} {op} {r}"),
            (Shape::Negate, _) => format!("-({l})"),
            (Shape::Power, Some(r)) => format!("Math.pow({l}, {r})"),
            (Shape::BigMethod { op, kind }, Some(r)) => match big_method(op, kind) {
                Some((method, extra)) => format!("{l}.{method}({r}{extra})"),
                None => return None,
            },
            (Shape::Conversion, _) => l,
            _ => return None,
        };

        if self.guards.is_empty() {
            return Some(match self.shape {
                Shape::Infix(_) | Shape::Negate => format!("({core})"),
                _ => core,
            });
        }

        let conditions = self
            .guards
            .iter()
            .map(|guard| match guard.operand {
                Side::Left => format!("{left} == null"),
                Side::Right => format!("{} == null", right.unwrap_or_default()),
            })
            .collect::<Vec<_>>()
            .join(" || ");
        Some(format!("({conditions} ? {} : {core})", self.default_value()))
    }
}

fn big_method(op: BinOp, kind: NumericKind) -> Option<(&'static str, &'static str)> {
    let decimal = kind == NumericKind::BigDecimal;
    Some(match op {
        BinOp::Add => ("add", ""),
        BinOp::Sub => ("subtract", ""),
        BinOp::Mul => ("multiply", ""),
        BinOp::Div if decimal => ("divide", ", MathContext.DECIMAL128"),
        BinOp::Div => ("divide", ""),
        BinOp::Mod if decimal => ("remainder", ""),
        BinOp::Mod => ("mod", ""),
        BinOp::Pow => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn descriptor(shape: Shape, result: NumericKind) -> LoweringDescriptor {
        LoweringDescriptor {
            result: result.into(),
            result_nullable: false,
            left: AccessorChain::identity(),
            right: Some(AccessorChain::identity()),
            guards: Vec::new(),
            diagnostic: None,
            shape,
        }
    }

    #[test]
    fn test_chain_applies_innermost_first() {
        let chain = AccessorChain::of([Accessor::Value(Primitive::Byte), Accessor::ValueOf(NumericKind::BoxedByte)]);
        assert_snapshot!(chain.apply("left"), @"Byte.valueOf(left.byteValue())");
    }

    #[test]
    fn test_narrow_and_new_instance() {
        let chain = AccessorChain::of([
            Accessor::Narrow(Primitive::Int),
            Accessor::NewInstance(NumericKind::AtomicInt),
        ]);
        assert_snapshot!(chain.apply("x"), @"new AtomicInteger(((int) x))");
        assert_snapshot!(Accessor::StaticToString(Primitive::Int).apply("x"), @"Integer.toString(x)");
    }

    #[test]
    fn test_render_infix_unguarded() {
        let mut d = descriptor(Shape::Infix(BinOp::Sub), NumericKind::Int);
        d.left = AccessorChain::of([Accessor::Value(Primitive::Short)]);
        d.right = Some(AccessorChain::of([Accessor::Value(Primitive::Int)]));
        assert_snapshot!(d.render("left", Some("right")).unwrap(), @"(left.shortValue() - right.intValue())");
    }

    #[test]
    fn test_render_guards_compose() {
        let mut d = descriptor(Shape::Infix(BinOp::Add), NumericKind::Double);
        d.guards = vec![NullGuard { operand: Side::Left }, NullGuard { operand: Side::Right }];
        assert_snapshot!(d.render("a", Some("b")).unwrap(), @"(a == null || b == null ? 0.0 : a + b)");
    }

    #[test]
    fn test_render_big_decimal_divide() {
        let d = descriptor(
            Shape::BigMethod {
                op: BinOp::Div,
                kind: NumericKind::BigDecimal,
            },
            NumericKind::BigDecimal,
        );
        assert_snapshot!(d.render("a", Some("b")).unwrap(), @"a.divide(b, MathContext.DECIMAL128)");
    }

    #[test]
    fn test_render_missing_right_operand() {
        let d = descriptor(Shape::Power, NumericKind::Double);
        assert_eq!(d.render("a", None), None);
    }

    #[test]
    fn test_default_values() {
        assert_eq!(descriptor(Shape::Power, NumericKind::Float).default_value(), "0f");
        assert_eq!(descriptor(Shape::Power, NumericKind::Long).default_value(), "0");
        assert_eq!(descriptor(Shape::Power, NumericKind::BoxedLong).default_value(), "null");
        let mut d = descriptor(Shape::Conversion, NumericKind::Int);
        d.result = TypeRef::String;
        assert_eq!(d.default_value(), "null");
    }

    #[test]
    fn test_guarded_source_is_evaluated_twice() {
        let mut d = descriptor(Shape::Conversion, NumericKind::Byte);
        d.right = None;
        d.left = AccessorChain::of([Accessor::Value(Primitive::Byte)]);
        d.guards = vec![NullGuard { operand: Side::Left }];
        let rendered = d.render("tmp$0", None).unwrap();
        assert_snapshot!(rendered, @"(tmp$0 == null ? 0 : tmp$0.byteValue())");
        assert_eq!(rendered.matches("tmp$0").count(), 2);
    }
}
