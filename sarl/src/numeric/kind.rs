//! Numeric kinds and their promotion ranks

use serde::{Deserialize, Serialize};

/// Promotion rank. Totally ordered: the wider rank wins in binary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
}

/// Java primitive numeric type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::Byte,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
    ];

    pub fn rank(self) -> Rank {
        match self {
            Primitive::Byte => Rank::Byte,
            Primitive::Short => Rank::Short,
            Primitive::Int => Rank::Int,
            Primitive::Long => Rank::Long,
            Primitive::Float => Rank::Float,
            Primitive::Double => Rank::Double,
        }
    }

    /// Inverse of [`Primitive::rank`] for the primitive ranks
    pub fn from_rank(rank: Rank) -> Option<Primitive> {
        Some(match rank {
            Rank::Byte => Primitive::Byte,
            Rank::Short => Primitive::Short,
            Rank::Int => Primitive::Int,
            Rank::Long => Primitive::Long,
            Rank::Float => Primitive::Float,
            Rank::Double => Primitive::Double,
            Rank::BigInteger | Rank::BigDecimal => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    /// `Number` accessor returning this primitive: `byteValue`, `intValue`, ...
    pub fn value_accessor(self) -> &'static str {
        match self {
            Primitive::Byte => "byteValue",
            Primitive::Short => "shortValue",
            Primitive::Int => "intValue",
            Primitive::Long => "longValue",
            Primitive::Float => "floatValue",
            Primitive::Double => "doubleValue",
        }
    }

    pub fn is_floating(self) -> bool {
        matches!(self, Primitive::Float | Primitive::Double)
    }

    pub fn kind(self) -> NumericKind {
        match self {
            Primitive::Byte => NumericKind::Byte,
            Primitive::Short => NumericKind::Short,
            Primitive::Int => NumericKind::Int,
            Primitive::Long => NumericKind::Long,
            Primitive::Float => NumericKind::Float,
            Primitive::Double => NumericKind::Double,
        }
    }

    /// Wrapper class of this primitive
    pub fn boxed(self) -> NumericKind {
        match self {
            Primitive::Byte => NumericKind::BoxedByte,
            Primitive::Short => NumericKind::BoxedShort,
            Primitive::Int => NumericKind::BoxedInt,
            Primitive::Long => NumericKind::BoxedLong,
            Primitive::Float => NumericKind::BoxedFloat,
            Primitive::Double => NumericKind::BoxedDouble,
        }
    }

    /// Literal used when a null guard short-circuits to this type
    pub fn zero_literal(self) -> &'static str {
        match self {
            Primitive::Float => "0f",
            Primitive::Double => "0.0",
            _ => "0",
        }
    }
}

/// Numeric type of an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericKind {
    #[serde(rename = "byte")]
    Byte,
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "Byte")]
    BoxedByte,
    #[serde(rename = "Short")]
    BoxedShort,
    #[serde(rename = "Integer")]
    BoxedInt,
    #[serde(rename = "Long")]
    BoxedLong,
    #[serde(rename = "Float")]
    BoxedFloat,
    #[serde(rename = "Double")]
    BoxedDouble,
    #[serde(rename = "AtomicInteger")]
    AtomicInt,
    #[serde(rename = "AtomicLong")]
    AtomicLong,
    #[serde(rename = "AtomicDouble")]
    AtomicDouble,
    BigInteger,
    BigDecimal,
    /// `java.lang.Number`, read through `doubleValue()`
    Number,
}

impl NumericKind {
    pub const ALL: [NumericKind; 18] = [
        NumericKind::Byte,
        NumericKind::Short,
        NumericKind::Int,
        NumericKind::Long,
        NumericKind::Float,
        NumericKind::Double,
        NumericKind::BoxedByte,
        NumericKind::BoxedShort,
        NumericKind::BoxedInt,
        NumericKind::BoxedLong,
        NumericKind::BoxedFloat,
        NumericKind::BoxedDouble,
        NumericKind::AtomicInt,
        NumericKind::AtomicLong,
        NumericKind::AtomicDouble,
        NumericKind::BigInteger,
        NumericKind::BigDecimal,
        NumericKind::Number,
    ];

    /// Underlying primitive. `None` for the big kinds.
    pub fn primitive(self) -> Option<Primitive> {
        use NumericKind::*;
        Some(match self {
            Byte | BoxedByte => Primitive::Byte,
            Short | BoxedShort => Primitive::Short,
            Int | BoxedInt | AtomicInt => Primitive::Int,
            Long | BoxedLong | AtomicLong => Primitive::Long,
            Float | BoxedFloat => Primitive::Float,
            Double | BoxedDouble | AtomicDouble | Number => Primitive::Double,
            BigInteger | BigDecimal => return None,
        })
    }

    pub fn rank(self) -> Rank {
        match self {
            NumericKind::BigInteger => Rank::BigInteger,
            NumericKind::BigDecimal => Rank::BigDecimal,
            other => other.primitive().map_or(Rank::BigDecimal, Primitive::rank),
        }
    }

    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            NumericKind::Byte
                | NumericKind::Short
                | NumericKind::Int
                | NumericKind::Long
                | NumericKind::Float
                | NumericKind::Double
        )
    }

    pub fn is_boxed(self) -> bool {
        matches!(
            self,
            NumericKind::BoxedByte
                | NumericKind::BoxedShort
                | NumericKind::BoxedInt
                | NumericKind::BoxedLong
                | NumericKind::BoxedFloat
                | NumericKind::BoxedDouble
        )
    }

    pub fn is_atomic(self) -> bool {
        matches!(self, NumericKind::AtomicInt | NumericKind::AtomicLong | NumericKind::AtomicDouble)
    }

    pub fn is_big(self) -> bool {
        matches!(self, NumericKind::BigInteger | NumericKind::BigDecimal)
    }

    /// Reference kinds may be `null` at runtime
    pub fn is_reference(self) -> bool {
        !self.is_primitive()
    }

    /// Float-ranked kinds (including `Number`, read as a double)
    pub fn is_floating(self) -> bool {
        self.primitive().is_some_and(Primitive::is_floating) || self == NumericKind::BigDecimal
    }

    /// Simple Java name
    pub fn java_name(self) -> &'static str {
        match self {
            NumericKind::Byte => "byte",
            NumericKind::Short => "short",
            NumericKind::Int => "int",
            NumericKind::Long => "long",
            NumericKind::Float => "float",
            NumericKind::Double => "double",
            NumericKind::BoxedByte => "Byte",
            NumericKind::BoxedShort => "Short",
            NumericKind::BoxedInt => "Integer",
            NumericKind::BoxedLong => "Long",
            NumericKind::BoxedFloat => "Float",
            NumericKind::BoxedDouble => "Double",
            NumericKind::AtomicInt => "AtomicInteger",
            NumericKind::AtomicLong => "AtomicLong",
            NumericKind::AtomicDouble => "AtomicDouble",
            NumericKind::BigInteger => "BigInteger",
            NumericKind::BigDecimal => "BigDecimal",
            NumericKind::Number => "Number",
        }
    }

    /// Fully qualified name, `None` for primitives
    pub fn qualified_name(self) -> Option<&'static str> {
        Some(match self {
            NumericKind::BoxedByte => "java.lang.Byte",
            NumericKind::BoxedShort => "java.lang.Short",
            NumericKind::BoxedInt => "java.lang.Integer",
            NumericKind::BoxedLong => "java.lang.Long",
            NumericKind::BoxedFloat => "java.lang.Float",
            NumericKind::BoxedDouble => "java.lang.Double",
            NumericKind::AtomicInt => "java.util.concurrent.atomic.AtomicInteger",
            NumericKind::AtomicLong => "java.util.concurrent.atomic.AtomicLong",
            NumericKind::AtomicDouble => "com.google.common.util.concurrent.AtomicDouble",
            NumericKind::BigInteger => "java.math.BigInteger",
            NumericKind::BigDecimal => "java.math.BigDecimal",
            NumericKind::Number => "java.lang.Number",
            _ => return None,
        })
    }

    /// Parse a simple or fully qualified Java name
    pub fn from_java_name(name: &str) -> Option<NumericKind> {
        NumericKind::ALL
            .into_iter()
            .find(|kind| kind.java_name() == name || kind.qualified_name() == Some(name))
    }

    /// Name of the runtime helper converting any number to this kind:
    /// `toByte`, `toInteger`, `toAtomicLong`, `toBigDecimal`, ...
    pub fn conversion_helper(self) -> String {
        match self {
            NumericKind::BoxedInt => "toInteger".to_string(),
            other if other.is_primitive() => {
                let name = other.java_name();
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => format!("to{}{}", first.to_ascii_uppercase(), chars.as_str()),
                    None => String::new(),
                }
            }
            other => format!("to{}", other.java_name()),
        }
    }
}

impl std::fmt::Display for NumericKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.java_name())
    }
}
