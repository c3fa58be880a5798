//! Early-exit classification
//!
//! Decides whether evaluating a statement is guaranteed to terminate the
//! enclosing behavior unit. The structural rules live in the default methods
//! of [`EarlyExitComputer`]; implementations add statement kinds through
//! [`EarlyExitComputer::is_early_exit_statement`], and the structural
//! recursion calls back into that hook, so a block ending in `killMe()` is an
//! early exit too.
//!
//! Classification is pure and conservative: unknown node shapes are never
//! early exits.

use serde::Serialize;

use crate::ast::{Expr, Spanned};
use crate::registry::FeatureRegistry;
use crate::resolver::TypeResolution;

/// Classification of one statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EarlyExitVerdict {
    /// The statement never falls through
    pub definite: bool,
    /// The exit is a deliberate construct (`return`, `throw`, an early-exit call)
    pub intentional: bool,
}

impl EarlyExitVerdict {
    /// Whether the generator must append a fall-through return
    pub fn needs_synthetic_return(&self) -> bool {
        !self.definite
    }
}

pub trait EarlyExitComputer {
    /// Statement kinds that terminate the unit on their own
    fn is_early_exit_statement(&self, _expr: &Spanned<Expr>) -> bool {
        false
    }

    fn is_definite_early_exit(&self, expr: &Spanned<Expr>) -> bool {
        let structural = match &expr.node {
            Expr::Return(_) | Expr::Throw(_) => true,
            Expr::Block(stmts) => stmts.iter().any(|stmt| self.is_definite_early_exit(stmt)),
            Expr::If {
                then_branch,
                else_branch: Some(else_branch),
                ..
            } => self.is_definite_early_exit(then_branch) && self.is_definite_early_exit(else_branch),
            Expr::TryCatch { body, catches, finally } => {
                finally.as_deref().is_some_and(|f| self.is_definite_early_exit(f))
                    || (self.is_definite_early_exit(body)
                        && catches.iter().all(|catch| self.is_definite_early_exit(catch)))
            }
            Expr::Synchronized { body, .. } | Expr::DoWhile { body, .. } => self.is_definite_early_exit(body),
            Expr::While { cond, body } => cond.node.is_true_literal() && !breaks_out(body),
            _ => false,
        };
        structural || self.is_early_exit_statement(expr)
    }

    fn is_intentional_early_exit(&self, expr: &Spanned<Expr>) -> bool {
        let structural = match &expr.node {
            Expr::Return(_) | Expr::Throw(_) => true,
            Expr::Block(stmts) => stmts.iter().any(|stmt| self.is_intentional_early_exit(stmt)),
            Expr::Synchronized { body, .. } => self.is_intentional_early_exit(body),
            _ => false,
        };
        structural || self.is_early_exit_statement(expr)
    }

    fn verdict(&self, expr: &Spanned<Expr>) -> EarlyExitVerdict {
        EarlyExitVerdict {
            definite: self.is_definite_early_exit(expr),
            intentional: self.is_intentional_early_exit(expr),
        }
    }
}

/// Whether `body` contains a `break` leaving the enclosing loop
fn breaks_out(body: &Spanned<Expr>) -> bool {
    match &body.node {
        Expr::Break => true,
        Expr::While { .. } | Expr::DoWhile { .. } => false,
        other => other.children().into_iter().any(breaks_out),
    }
}

/// Structural rules only
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericEarlyExitComputer;

impl EarlyExitComputer for GenericEarlyExitComputer {}

/// Structural rules plus calls to registered early-exit callables.
///
/// Calls are recognized from their raw feature slot, so classification never
/// runs the type solver.
pub struct SarlEarlyExitComputer<'a, R: TypeResolution + ?Sized> {
    registry: &'a FeatureRegistry,
    resolver: &'a R,
}

impl<'a, R: TypeResolution + ?Sized> SarlEarlyExitComputer<'a, R> {
    pub fn new(registry: &'a FeatureRegistry, resolver: &'a R) -> Self {
        Self { registry, resolver }
    }

    /// Whether firing `event` terminates the receiving behavior
    pub fn is_early_exit_event(&self, event: &str) -> bool {
        self.registry.is_early_exit_event(event)
    }
}

impl<R: TypeResolution + ?Sized> EarlyExitComputer for SarlEarlyExitComputer<'_, R> {
    fn is_early_exit_statement(&self, expr: &Spanned<Expr>) -> bool {
        match &expr.node {
            Expr::FeatureCall(call) => self
                .registry
                .is_early_exit_feature(self.resolver.raw_feature_slot(call)),
            _ => false,
        }
    }
}
