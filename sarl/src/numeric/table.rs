//! Promotion table
//!
//! One entry per `(operator, left kind, right kind)` triple, generated from
//! the promotion rules instead of being written out pair by pair. The table
//! is built once per process and only read afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::debug;

use super::kind::{NumericKind, Primitive, Rank};
use crate::ast::BinOp;

/// Operator symbol of an [`OperatorSpec`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OperatorSymbol {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Power,
    UnaryMinus,
    Cast,
}

impl OperatorSymbol {
    pub fn from_binop(op: BinOp) -> Self {
        match op {
            BinOp::Add => OperatorSymbol::Plus,
            BinOp::Sub => OperatorSymbol::Minus,
            BinOp::Mul => OperatorSymbol::Multiply,
            BinOp::Div => OperatorSymbol::Divide,
            BinOp::Mod => OperatorSymbol::Modulo,
            BinOp::Pow => OperatorSymbol::Power,
        }
    }

    pub fn binop(self) -> Option<BinOp> {
        Some(match self {
            OperatorSymbol::Plus => BinOp::Add,
            OperatorSymbol::Minus => BinOp::Sub,
            OperatorSymbol::Multiply => BinOp::Mul,
            OperatorSymbol::Divide => BinOp::Div,
            OperatorSymbol::Modulo => BinOp::Mod,
            OperatorSymbol::Power => BinOp::Pow,
            OperatorSymbol::UnaryMinus | OperatorSymbol::Cast => return None,
        })
    }

    /// Parse the textual form used by `sarl table --op`
    pub fn parse(text: &str) -> Option<Self> {
        Some(match text {
            "+" => OperatorSymbol::Plus,
            "-" => OperatorSymbol::Minus,
            "*" => OperatorSymbol::Multiply,
            "/" => OperatorSymbol::Divide,
            "%" => OperatorSymbol::Modulo,
            "**" => OperatorSymbol::Power,
            "neg" | "unary-" => OperatorSymbol::UnaryMinus,
            "as" | "cast" => OperatorSymbol::Cast,
            _ => return None,
        })
    }
}

impl std::fmt::Display for OperatorSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorSymbol::UnaryMinus => write!(f, "unary -"),
            OperatorSymbol::Cast => write!(f, "as"),
            other => match other.binop() {
                Some(op) => write!(f, "{op}"),
                None => Ok(()),
            },
        }
    }
}

/// Lookup key: operator and operand kinds (`right` is absent for unary minus and cast)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OperatorSpec {
    pub symbol: OperatorSymbol,
    pub left: NumericKind,
    pub right: Option<NumericKind>,
}

impl OperatorSpec {
    pub fn binary(op: BinOp, left: NumericKind, right: NumericKind) -> Self {
        Self {
            symbol: OperatorSymbol::from_binop(op),
            left,
            right: Some(right),
        }
    }

    pub fn unary_minus(operand: NumericKind) -> Self {
        Self {
            symbol: OperatorSymbol::UnaryMinus,
            left: operand,
            right: None,
        }
    }
}

impl std::fmt::Display for OperatorSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.right {
            Some(right) => write!(f, "{} {} {}", self.left, self.symbol, right),
            None if self.symbol == OperatorSymbol::UnaryMinus => write!(f, "-{}", self.left),
            None => write!(f, "{} {}", self.symbol, self.left),
        }
    }
}

/// Code path chosen for an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Promotion {
    /// Plain Java arithmetic computed in the given primitive
    Primitive(Primitive),
    /// `Math.pow`, always `double`
    Power,
    /// `BigInteger`/`BigDecimal` method call
    Big(NumericKind),
}

impl Promotion {
    pub fn result(self) -> NumericKind {
        match self {
            Promotion::Primitive(p) => p.kind(),
            Promotion::Power => NumericKind::Double,
            Promotion::Big(kind) => kind,
        }
    }
}

fn binary_rule(op: BinOp, left: NumericKind, right: NumericKind) -> Option<Promotion> {
    if left.is_big() || right.is_big() {
        if op == BinOp::Pow {
            return None;
        }
        // BigInteger mixed with any fractional kind widens to BigDecimal
        let kind = if left.is_floating() || right.is_floating() {
            NumericKind::BigDecimal
        } else {
            NumericKind::BigInteger
        };
        return Some(Promotion::Big(kind));
    }
    if op == BinOp::Pow {
        return Some(Promotion::Power);
    }
    let rank = left.rank().max(right.rank()).max(Rank::Int);
    Primitive::from_rank(rank).map(Promotion::Primitive)
}

fn unary_minus_rule(operand: NumericKind) -> Option<Promotion> {
    if operand.is_big() {
        return None;
    }
    Primitive::from_rank(operand.rank().max(Rank::Int)).map(Promotion::Primitive)
}

/// The process-wide promotion table
#[derive(Debug)]
pub struct PromotionTable {
    entries: HashMap<OperatorSpec, Promotion>,
}

impl PromotionTable {
    /// Generate every entry from the promotion rules
    pub fn build() -> Self {
        let mut entries = HashMap::new();
        for op in BinOp::ALL {
            for left in NumericKind::ALL {
                for right in NumericKind::ALL {
                    if let Some(promotion) = binary_rule(op, left, right) {
                        entries.insert(OperatorSpec::binary(op, left, right), promotion);
                    }
                }
            }
        }
        for operand in NumericKind::ALL {
            if let Some(promotion) = unary_minus_rule(operand) {
                entries.insert(OperatorSpec::unary_minus(operand), promotion);
            }
        }
        debug!(entries = entries.len(), "built numeric promotion table");
        Self { entries }
    }

    pub fn lookup(&self, spec: &OperatorSpec) -> Option<Promotion> {
        self.entries.get(spec).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in a stable order, optionally restricted to one operator
    pub fn entries(&self, symbol: Option<OperatorSymbol>) -> Vec<(OperatorSpec, Promotion)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter(|(spec, _)| symbol.is_none_or(|s| spec.symbol == s))
            .map(|(spec, promotion)| (*spec, *promotion))
            .collect();
        entries.sort_by_key(|(spec, _)| *spec);
        entries
    }
}

static TABLE: OnceLock<PromotionTable> = OnceLock::new();

/// Shared promotion table, built on first use
pub fn promotion_table() -> &'static PromotionTable {
    TABLE.get_or_init(PromotionTable::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(op: BinOp, left: NumericKind, right: NumericKind) -> Option<NumericKind> {
        promotion_table()
            .lookup(&OperatorSpec::binary(op, left, right))
            .map(Promotion::result)
    }

    #[test]
    fn test_table_size() {
        // 6 operators over 18x18 pairs, minus power on the 68 pairs touching a
        // big kind, plus unary minus on the 16 non-big kinds
        assert_eq!(promotion_table().len(), 6 * 18 * 18 - 68 + 16);
    }

    #[test]
    fn test_integral_promotes_to_int() {
        assert_eq!(lookup(BinOp::Add, NumericKind::Byte, NumericKind::Short), Some(NumericKind::Int));
        assert_eq!(
            lookup(BinOp::Sub, NumericKind::BoxedShort, NumericKind::AtomicInt),
            Some(NumericKind::Int)
        );
        assert_eq!(lookup(BinOp::Mod, NumericKind::Int, NumericKind::AtomicLong), Some(NumericKind::Long));
    }

    #[test]
    fn test_floating_wins() {
        assert_eq!(lookup(BinOp::Mul, NumericKind::Long, NumericKind::Float), Some(NumericKind::Float));
        assert_eq!(
            lookup(BinOp::Sub, NumericKind::BoxedShort, NumericKind::Number),
            Some(NumericKind::Double)
        );
        assert_eq!(
            lookup(BinOp::Div, NumericKind::AtomicDouble, NumericKind::BoxedFloat),
            Some(NumericKind::Double)
        );
    }

    #[test]
    fn test_power_is_double() {
        for left in NumericKind::ALL.into_iter().filter(|k| !k.is_big()) {
            for right in NumericKind::ALL.into_iter().filter(|k| !k.is_big()) {
                assert_eq!(lookup(BinOp::Pow, left, right), Some(NumericKind::Double));
            }
        }
    }

    #[test]
    fn test_big_path() {
        assert_eq!(
            lookup(BinOp::Add, NumericKind::BigInteger, NumericKind::Int),
            Some(NumericKind::BigInteger)
        );
        assert_eq!(
            lookup(BinOp::Add, NumericKind::BigInteger, NumericKind::Double),
            Some(NumericKind::BigDecimal)
        );
        assert_eq!(
            lookup(BinOp::Mul, NumericKind::AtomicLong, NumericKind::BigDecimal),
            Some(NumericKind::BigDecimal)
        );
        assert_eq!(lookup(BinOp::Pow, NumericKind::BigInteger, NumericKind::Int), None);
    }

    #[test]
    fn test_unary_minus() {
        let table = promotion_table();
        assert_eq!(
            table.lookup(&OperatorSpec::unary_minus(NumericKind::BoxedShort)),
            Some(Promotion::Primitive(Primitive::Int))
        );
        assert_eq!(
            table.lookup(&OperatorSpec::unary_minus(NumericKind::AtomicDouble)),
            Some(Promotion::Primitive(Primitive::Double))
        );
        assert_eq!(table.lookup(&OperatorSpec::unary_minus(NumericKind::BigDecimal)), None);
    }

    #[test]
    fn test_entries_filtered_and_sorted() {
        let entries = promotion_table().entries(Some(OperatorSymbol::UnaryMinus));
        assert_eq!(entries.len(), 16);
        assert_eq!(entries[0].0.left, NumericKind::Byte);
    }

    #[test]
    fn test_symbol_parse_display() {
        for text in ["+", "-", "*", "/", "%", "**"] {
            let symbol = OperatorSymbol::parse(text).unwrap();
            assert_eq!(symbol.to_string(), text);
        }
        assert_eq!(OperatorSymbol::parse("^"), None);
    }
}
