//! Cast planning

use super::kind::{NumericKind, Primitive};
use super::lowering::{Accessor, AccessorChain, LoweringDescriptor, NullGuard, Shape, Side};
use super::resolve::{big_chain, OperandDescriptor};
use crate::ast::TypeRef;
use crate::error::Diagnostic;

struct CastPlan {
    chain: AccessorChain,
    /// Whether a nullable source must be guarded
    guarded: bool,
    diagnostic: Option<Diagnostic>,
    shape: Shape,
}

impl CastPlan {
    fn obsolete(source: NumericKind, target: &TypeRef) -> Self {
        Self {
            chain: AccessorChain::identity(),
            guarded: false,
            diagnostic: Some(Diagnostic::obsolete_cast(source.java_name(), &target.simple_name())),
            shape: Shape::Conversion,
        }
    }

    fn invalid(source: NumericKind, target: &TypeRef) -> Self {
        Self {
            chain: AccessorChain::identity(),
            guarded: false,
            diagnostic: Some(Diagnostic::invalid_cast(source.java_name(), &target.simple_name())),
            shape: Shape::None,
        }
    }

    /// Native cast or boxing
    fn silent(chain: AccessorChain, guarded: bool) -> Self {
        Self {
            chain,
            guarded,
            diagnostic: None,
            shape: Shape::Conversion,
        }
    }

    fn conversion(chain: AccessorChain, source: NumericKind, target: &TypeRef, accessor: &str) -> Self {
        Self {
            chain,
            guarded: true,
            diagnostic: Some(Diagnostic::inefficient_conversion(
                source.java_name(),
                &target.simple_name(),
                accessor,
            )),
            shape: Shape::Conversion,
        }
    }
}

/// Lower `operand as target`
pub(super) fn lower_cast(operand: OperandDescriptor, target: &TypeRef) -> LoweringDescriptor {
    let plan = plan(operand.kind, target);
    let guards = if plan.guarded && operand.nullable && operand.kind.is_reference() {
        vec![NullGuard { operand: Side::Left }]
    } else {
        Vec::new()
    };
    LoweringDescriptor {
        result: target.clone(),
        result_nullable: plan.shape != Shape::None && target.is_reference() && operand.nullable,
        left: plan.chain,
        right: None,
        guards,
        diagnostic: plan.diagnostic,
        shape: plan.shape,
    }
}

fn plan(source: NumericKind, target: &TypeRef) -> CastPlan {
    match target {
        TypeRef::Numeric(dst) => numeric_plan(source, *dst, target),
        TypeRef::Object => match source.primitive() {
            Some(p) if source.is_primitive() => CastPlan::silent(AccessorChain::of([Accessor::ValueOf(p.boxed())]), false),
            _ => CastPlan::obsolete(source, target),
        },
        TypeRef::String => {
            let accessor = match source.primitive() {
                Some(p) if source.is_primitive() => Accessor::StaticToString(p),
                _ => Accessor::ToString,
            };
            CastPlan::conversion(AccessorChain::of([accessor]), source, target, "toString")
        }
        TypeRef::Boolean | TypeRef::Void | TypeRef::Named(_) => CastPlan::invalid(source, target),
    }
}

fn numeric_plan(source: NumericKind, dst: NumericKind, target: &TypeRef) -> CastPlan {
    if source == dst {
        return CastPlan::obsolete(source, target);
    }
    if dst == NumericKind::Number {
        return match source.primitive() {
            Some(p) if source.is_primitive() => CastPlan::silent(AccessorChain::of([Accessor::ValueOf(p.boxed())]), false),
            _ => CastPlan::obsolete(source, target),
        };
    }

    match (source.primitive(), dst.primitive()) {
        // primitive source
        (Some(p), Some(q)) if source.is_primitive() && dst.is_primitive() => {
            if q.rank() > p.rank() {
                CastPlan::obsolete(source, target)
            } else {
                CastPlan::silent(AccessorChain::of([Accessor::Narrow(q)]), false)
            }
        }
        (Some(p), _) if source.is_primitive() => {
            if dst == p.boxed() {
                return CastPlan::silent(AccessorChain::of([Accessor::ValueOf(dst)]), false);
            }
            let chain = primitive_to_reference(p, dst);
            CastPlan::conversion(chain, source, target, &dst.conversion_helper())
        }
        // reference source
        (_, Some(q)) if dst.is_primitive() => {
            let chain = AccessorChain::of([Accessor::Value(q)]);
            if source.is_boxed() && source.primitive() == Some(q) {
                CastPlan::silent(chain, true)
            } else {
                CastPlan::conversion(chain, source, target, q.value_accessor())
            }
        }
        _ => {
            let chain = reference_to_reference(source, dst);
            CastPlan::conversion(chain, source, target, &dst.conversion_helper())
        }
    }
}

fn narrowed(p: Primitive, q: Primitive) -> Option<Accessor> {
    (p.rank() > q.rank()).then_some(Accessor::Narrow(q))
}

fn primitive_to_reference(p: Primitive, dst: NumericKind) -> AccessorChain {
    match dst.primitive() {
        Some(q) if dst.is_boxed() => AccessorChain::of(narrowed(p, q).into_iter().chain([Accessor::ValueOf(dst)])),
        Some(q) if dst.is_atomic() => {
            AccessorChain::of(narrowed(p, q).into_iter().chain([Accessor::NewInstance(dst)]))
        }
        _ => big_chain(p.kind(), dst),
    }
}

fn reference_to_reference(source: NumericKind, dst: NumericKind) -> AccessorChain {
    match dst.primitive() {
        Some(q) if dst.is_boxed() => AccessorChain::of([Accessor::Value(q), Accessor::ValueOf(dst)]),
        Some(q) if dst.is_atomic() => AccessorChain::of([Accessor::Value(q), Accessor::NewInstance(dst)]),
        _ => big_chain(source, dst),
    }
}
