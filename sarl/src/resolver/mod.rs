//! Type resolution
//!
//! Two query modes are exposed to the analyses. `resolved_type` computes the
//! static type of an expression and may run the type solver. `raw_feature_slot`
//! reads the feature reference stored in a call node as is and never resolves
//! anything; the early-exit classifier only ever uses the latter.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ast::{CallableId, Expr, FeatureCall, FeatureSlot, Param, Program, Spanned, TypeRef, UnOp};
use crate::numeric::{self, OperandDescriptor, Operator};

/// Static type information supplied by the front-end
pub trait TypeResolution {
    /// Static type of `expr`. May trigger type resolution.
    fn resolved_type(&self, expr: &Spanned<Expr>) -> Option<TypeRef>;

    /// Raw feature reference of a call. Never triggers type resolution.
    fn raw_feature_slot<'a>(&self, call: &'a FeatureCall) -> &'a FeatureSlot {
        &call.feature
    }

    /// Whether `expr` is known to never evaluate to `null`
    fn is_known_non_null(&self, expr: &Spanned<Expr>) -> bool {
        matches!(expr.node, Expr::IntLit(_) | Expr::FloatLit(_))
    }

    /// Operand descriptor of a numeric expression, `None` for non-numeric ones
    fn operand_descriptor(&self, expr: &Spanned<Expr>) -> Option<OperandDescriptor> {
        let kind = self.resolved_type(expr)?.as_numeric()?;
        Some(if self.is_known_non_null(expr) {
            OperandDescriptor::non_null(kind)
        } else {
            OperandDescriptor::new(kind)
        })
    }
}

/// Resolver over declared variable and callable types
#[derive(Debug, Default)]
pub struct StaticTypeResolver {
    env: HashMap<String, TypeRef>,
    non_null: HashSet<String>,
    features: HashMap<CallableId, TypeRef>,
    resolutions: AtomicUsize,
}

impl StaticTypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver knowing the callables declared by `program`
    pub fn for_program(program: &Program) -> Self {
        let mut resolver = Self::new();
        for decl in &program.features {
            resolver.declare_feature(decl.id.clone(), decl.ret_ty.clone());
        }
        resolver
    }

    pub fn declare(&mut self, name: impl Into<String>, ty: TypeRef) {
        self.env.insert(name.into(), ty);
    }

    pub fn declare_non_null(&mut self, name: impl Into<String>, ty: TypeRef) {
        let name = name.into();
        self.non_null.insert(name.clone());
        self.env.insert(name, ty);
    }

    pub fn declare_params(&mut self, params: &[Param]) {
        for param in params {
            if param.non_null {
                self.declare_non_null(param.name.node.clone(), param.ty.node.clone());
            } else {
                self.declare(param.name.node.clone(), param.ty.node.clone());
            }
        }
    }

    pub fn declare_feature(&mut self, id: CallableId, ret_ty: TypeRef) {
        self.features.insert(id, ret_ty);
    }

    /// Number of top-level `resolved_type` queries answered so far
    pub fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }

    fn type_of(&self, expr: &Spanned<Expr>) -> Option<TypeRef> {
        match &expr.node {
            Expr::IntLit(_) => Some(numeric::NumericKind::Int.into()),
            Expr::FloatLit(_) => Some(numeric::NumericKind::Double.into()),
            Expr::BoolLit(_) => Some(TypeRef::Boolean),
            Expr::StringLit(_) => Some(TypeRef::String),
            Expr::Var(name) => self.env.get(name).cloned(),
            Expr::Binary { left, op, right } => {
                let l = self.descriptor_of(left)?;
                let r = self.descriptor_of(right)?;
                numeric::resolve(&Operator::Binary(*op), l, Some(r)).ok().map(|d| d.result)
            }
            Expr::Unary { op: UnOp::Neg, expr } => {
                let operand = self.descriptor_of(expr)?;
                numeric::resolve(&Operator::Negate, operand, None).ok().map(|d| d.result)
            }
            Expr::Cast { target, .. } => Some(target.node.clone()),
            Expr::FeatureCall(call) => call.feature.linked().and_then(|id| self.features.get(id)).cloned(),
            Expr::Block(stmts) => match stmts.last() {
                Some(last) => self.type_of(last),
                None => Some(TypeRef::Void),
            },
            Expr::Synchronized { body, .. } => self.type_of(body),
            _ => None,
        }
    }

    fn descriptor_of(&self, expr: &Spanned<Expr>) -> Option<OperandDescriptor> {
        let kind = self.type_of(expr)?.as_numeric()?;
        Some(if self.is_known_non_null(expr) {
            OperandDescriptor::non_null(kind)
        } else {
            OperandDescriptor::new(kind)
        })
    }
}

impl TypeResolution for StaticTypeResolver {
    fn resolved_type(&self, expr: &Spanned<Expr>) -> Option<TypeRef> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        self.type_of(expr)
    }

    fn is_known_non_null(&self, expr: &Spanned<Expr>) -> bool {
        match &expr.node {
            Expr::IntLit(_) | Expr::FloatLit(_) => true,
            Expr::Var(name) => self.non_null.contains(name),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinOp;
    use crate::numeric::NumericKind;

    fn var(name: &str) -> Spanned<Expr> {
        Spanned::synthetic(Expr::Var(name.to_string()))
    }

    fn binary(left: Spanned<Expr>, op: BinOp, right: Spanned<Expr>) -> Spanned<Expr> {
        Spanned::synthetic(Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    #[test]
    fn test_literal_types() {
        let resolver = StaticTypeResolver::new();
        let int = Spanned::synthetic(Expr::IntLit(1));
        assert_eq!(resolver.resolved_type(&int), Some(NumericKind::Int.into()));
        let descriptor = resolver.operand_descriptor(&int).unwrap();
        assert!(!descriptor.nullable);
    }

    #[test]
    fn test_binary_type_through_engine() {
        let mut resolver = StaticTypeResolver::new();
        resolver.declare("a", TypeRef::from_name("Short"));
        resolver.declare("b", TypeRef::from_name("AtomicInteger"));
        let expr = binary(var("a"), BinOp::Sub, var("b"));
        assert_eq!(resolver.resolved_type(&expr), Some(NumericKind::Int.into()));
        assert_eq!(resolver.resolution_count(), 1);
    }

    #[test]
    fn test_non_null_declarations() {
        let mut resolver = StaticTypeResolver::new();
        resolver.declare_non_null("a", TypeRef::from_name("AtomicLong"));
        resolver.declare("b", TypeRef::from_name("AtomicLong"));
        assert!(!resolver.operand_descriptor(&var("a")).unwrap().nullable);
        assert!(resolver.operand_descriptor(&var("b")).unwrap().nullable);
    }

    #[test]
    fn test_unsupported_operator_has_no_type() {
        let mut resolver = StaticTypeResolver::new();
        resolver.declare("big", TypeRef::from_name("BigInteger"));
        let expr = Spanned::synthetic(Expr::Unary {
            op: UnOp::Neg,
            expr: Box::new(var("big")),
        });
        assert_eq!(resolver.resolved_type(&expr), None);
    }

    #[test]
    fn test_raw_feature_slot_does_not_resolve() {
        let resolver = StaticTypeResolver::new();
        let call = FeatureCall {
            receiver: None,
            feature: FeatureSlot::Proxy("killMe".into()),
            args: Vec::new(),
        };
        assert_eq!(resolver.raw_feature_slot(&call), &FeatureSlot::Proxy("killMe".into()));
        assert_eq!(resolver.resolution_count(), 0);
    }

    #[test]
    fn test_feature_return_type() {
        let mut resolver = StaticTypeResolver::new();
        let id = CallableId::new("my.Counter.next");
        resolver.declare_feature(id.clone(), TypeRef::from_name("Long"));
        let call = Spanned::synthetic(Expr::FeatureCall(FeatureCall {
            receiver: None,
            feature: FeatureSlot::Linked(id),
            args: Vec::new(),
        }));
        assert_eq!(resolver.resolved_type(&call), Some(NumericKind::BoxedLong.into()));
    }
}
