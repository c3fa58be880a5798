//! Value semantics of lowered numeric casts
//!
//! Evaluates the accessor chain that [`super::cast`] emits for `x as T` on a
//! runtime value, with Java narrowing rules. Big numbers keep the exact value
//! they were built from.

use serde::Serialize;

use super::cast::lower_cast;
use super::kind::{NumericKind, Primitive};
use super::lowering::Accessor;
use super::resolve::OperandDescriptor;
use crate::ast::TypeRef;

/// A runtime number, tagged with its primitive width
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum NumberValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl NumberValue {
    /// `intValue()`, with Java semantics: floating values saturate and NaN is 0
    pub fn int_value(&self) -> i32 {
        match *self {
            NumberValue::Byte(v) => i32::from(v),
            NumberValue::Short(v) => i32::from(v),
            NumberValue::Int(v) => v,
            NumberValue::Long(v) => v as i32,
            NumberValue::Float(v) => v as i32,
            NumberValue::Double(v) => v as i32,
        }
    }

    pub fn long_value(&self) -> i64 {
        match *self {
            NumberValue::Byte(v) => i64::from(v),
            NumberValue::Short(v) => i64::from(v),
            NumberValue::Int(v) => i64::from(v),
            NumberValue::Long(v) => v,
            NumberValue::Float(v) => v as i64,
            NumberValue::Double(v) => v as i64,
        }
    }

    // Java narrows floating values to byte and short through int
    pub fn byte_value(&self) -> i8 {
        self.int_value() as i8
    }

    pub fn short_value(&self) -> i16 {
        self.int_value() as i16
    }

    pub fn float_value(&self) -> f32 {
        match *self {
            NumberValue::Float(v) => v,
            NumberValue::Double(v) => v as f32,
            NumberValue::Long(v) => v as f32,
            other => other.int_value() as f32,
        }
    }

    pub fn double_value(&self) -> f64 {
        match *self {
            NumberValue::Float(v) => f64::from(v),
            NumberValue::Double(v) => v,
            NumberValue::Long(v) => v as f64,
            other => f64::from(other.int_value()),
        }
    }

    /// Read through the accessor of the given width
    pub fn read(&self, width: Primitive) -> NumberValue {
        match width {
            Primitive::Byte => NumberValue::Byte(self.byte_value()),
            Primitive::Short => NumberValue::Short(self.short_value()),
            Primitive::Int => NumberValue::Int(self.int_value()),
            Primitive::Long => NumberValue::Long(self.long_value()),
            Primitive::Float => NumberValue::Float(self.float_value()),
            Primitive::Double => NumberValue::Double(self.double_value()),
        }
    }

    fn is_floating(&self) -> bool {
        matches!(self, NumberValue::Float(_) | NumberValue::Double(_))
    }

    fn step(self, accessor: &Accessor) -> NumberValue {
        match accessor {
            Accessor::Value(width) | Accessor::Narrow(width) => self.read(*width),
            Accessor::ToBigInteger if self.is_floating() => NumberValue::Long(self.long_value()),
            Accessor::ValueOf(_)
            | Accessor::NewInstance(_)
            | Accessor::ToBigInteger
            | Accessor::ToString
            | Accessor::StaticToString(_) => self,
        }
    }
}

/// Value of `value as target` for an operand of kind `source`.
///
/// `None` is a `null` operand. A guarded cast yields the primitive zero or
/// keeps `null` for reference targets. A cast to a primitive target ends at
/// that target's width.
pub fn convert(value: Option<NumberValue>, source: NumericKind, target: NumericKind) -> Option<NumberValue> {
    let lowering = lower_cast(OperandDescriptor::new(source), &TypeRef::Numeric(target));
    let value = match value {
        Some(value) => value,
        None if lowering.null_guard_required() && target.is_primitive() => NumberValue::Int(0),
        None => return None,
    };
    let converted = lowering
        .left
        .accessors()
        .iter()
        .fold(value, |value, accessor| value.step(accessor));
    match target.primitive() {
        Some(width) if target.is_primitive() => Some(converted.read(width)),
        _ => Some(converted),
    }
}
