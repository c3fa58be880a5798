//! Numeric operator resolution and lowering
//!
//! Value-type aware arithmetic and casts over primitive, boxed, atomic and
//! big-number operands. Every operator expression resolves to a
//! [`LoweringDescriptor`] that the code generator renders as Java source.

mod cast;
pub mod convert;
mod kind;
mod lowering;
mod resolve;
mod table;

pub use kind::{NumericKind, Primitive, Rank};
pub use lowering::{Accessor, AccessorChain, LoweringDescriptor, NullGuard, Shape, Side};
pub use resolve::{resolve, OperandDescriptor, Operator};
pub use table::{promotion_table, OperatorSpec, OperatorSymbol, Promotion, PromotionTable};
