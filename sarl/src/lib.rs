//! SARL Compiler Core
//!
//! Numeric operator resolution and lowering over primitive, boxed, atomic
//! and big-number operands, and early-exit analysis of behavior units.

pub mod ast;
pub mod config;
pub mod earlyexit;
pub mod error;
pub mod lexer;
pub mod numeric;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod util;
pub mod validate;

pub use ast::Span;
pub use error::{CompileError, Diagnostic, IssueCode, Result, Severity};
pub use numeric::{resolve, LoweringDescriptor, NumericKind, OperandDescriptor, Operator};
