//! Behavior-unit validation
//!
//! Walks the items of a compilation unit and collects diagnostics:
//!
//! - cast and arithmetic issues reported by the numeric lowering engine
//! - `UNREACHABLE_CODE` for the first statement following a definite early exit
//! - `DISCOURAGED_CALL` for calls to callables carrying a call-site issue
//!
//! One failing expression never stops the walk. Diagnostics are also logged
//! via `tracing`.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::ast::{Expr, FeatureCall, Item, Program, Span, Spanned, TypeRef, UnOp};
use crate::config::{SarlConfig, SeverityLevel};
use crate::earlyexit::{EarlyExitComputer, EarlyExitVerdict, SarlEarlyExitComputer};
use crate::error::{Diagnostic, IssueCode, Result, Severity};
use crate::numeric::{self, Operator};
use crate::registry::{CallIssueLevel, FeatureRegistry};
use crate::resolver::{StaticTypeResolver, TypeResolution};

pub struct Validator<'a, R: TypeResolution + ?Sized> {
    resolver: &'a R,
    registry: &'a FeatureRegistry,
    overrides: HashMap<IssueCode, SeverityLevel>,
}

impl<'a, R: TypeResolution + ?Sized> Validator<'a, R> {
    pub fn new(resolver: &'a R, registry: &'a FeatureRegistry) -> Self {
        Self {
            resolver,
            registry,
            overrides: HashMap::new(),
        }
    }

    /// Re-level issue codes. Only codes whose default severity is below
    /// error can be changed.
    pub fn with_overrides(mut self, overrides: HashMap<IssueCode, SeverityLevel>) -> Self {
        self.overrides = overrides;
        self
    }

    fn early_exit(&self) -> SarlEarlyExitComputer<'a, R> {
        SarlEarlyExitComputer::new(self.registry, self.resolver)
    }

    pub fn validate_item(&self, item: &Item) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if let Item::Behavior(behavior) = item
            && let Some(guard) = &behavior.guard
        {
            self.walk(guard, &mut diagnostics);
        }
        self.walk(item.body(), &mut diagnostics);
        debug!(item = %item.title(), count = diagnostics.len(), "validated item");
        diagnostics
    }

    pub fn validate_expr(&self, expr: &Spanned<Expr>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        self.walk(expr, &mut diagnostics);
        diagnostics
    }

    /// Early-exit verdict of an item body, for the code generator
    pub fn verdict(&self, item: &Item) -> EarlyExitVerdict {
        self.early_exit().verdict(item.body())
    }

    /// Whether the generator must synthesize a fall-through return for `item`
    pub fn needs_synthetic_return(&self, item: &Item) -> bool {
        self.verdict(item).needs_synthetic_return()
    }

    fn walk(&self, expr: &Spanned<Expr>, out: &mut Vec<Diagnostic>) {
        match &expr.node {
            Expr::Binary { left, op, right } => {
                self.check_operator(expr.span, &Operator::Binary(*op), left, Some(right), out);
            }
            Expr::Unary { op: UnOp::Neg, expr: operand } => {
                self.check_operator(expr.span, &Operator::Negate, operand, None, out);
            }
            Expr::Cast { expr: operand, target } => {
                self.check_operator(expr.span, &Operator::Cast(target.node.clone()), operand, None, out);
            }
            Expr::FeatureCall(call) => self.check_call(expr.span, call, out),
            Expr::Block(stmts) => self.check_reachability(stmts, out),
            _ => {}
        }
        for child in expr.node.children() {
            self.walk(child, out);
        }
    }

    fn check_operator(
        &self,
        span: Span,
        op: &Operator,
        left: &Spanned<Expr>,
        right: Option<&Spanned<Expr>>,
        out: &mut Vec<Diagnostic>,
    ) {
        // Non-numeric operands are outside the numeric engine
        let Some(left) = self.resolver.operand_descriptor(left) else {
            return;
        };
        let right = match right {
            Some(right) => match self.resolver.operand_descriptor(right) {
                Some(descriptor) => Some(descriptor),
                None => return,
            },
            None => None,
        };
        match numeric::resolve(op, left, right) {
            Ok(lowering) => {
                if let Some(diagnostic) = lowering.diagnostic {
                    self.emit(diagnostic.with_span(span), true, out);
                }
            }
            Err(err) => match err.to_diagnostic() {
                Some(diagnostic) => self.emit(diagnostic.with_span(span), true, out),
                None => warn!(%err, "operator resolution failed"),
            },
        }
    }

    fn check_call(&self, span: Span, call: &FeatureCall, out: &mut Vec<Diagnostic>) {
        let slot = self.resolver.raw_feature_slot(call);
        let (Some(id), Some(issue)) = (slot.linked(), self.registry.discouraged(slot)) else {
            return;
        };
        let (severity, configurable) = match issue.level {
            CallIssueLevel::Error => (Severity::Error, false),
            CallIssueLevel::Warning => (Severity::Warning, false),
            CallIssueLevel::Info => (Severity::Info, false),
            CallIssueLevel::Preference => (IssueCode::DiscouragedCall.default_severity(), true),
        };
        let diagnostic = Diagnostic::discouraged_call(id, &issue.message, severity).with_span(span);
        self.emit(diagnostic, configurable, out);
    }

    fn check_reachability(&self, stmts: &[Spanned<Expr>], out: &mut Vec<Diagnostic>) {
        let computer = self.early_exit();
        if let Some(exit) = stmts.iter().position(|stmt| computer.is_definite_early_exit(stmt))
            && let Some(next) = stmts.get(exit + 1)
        {
            self.emit(Diagnostic::unreachable_code(next.span), true, out);
        }
    }

    fn emit(&self, mut diagnostic: Diagnostic, configurable: bool, out: &mut Vec<Diagnostic>) {
        if configurable
            && diagnostic.code.default_severity() != Severity::Error
            && let Some(level) = self.overrides.get(&diagnostic.code)
        {
            match level.severity() {
                Some(severity) => diagnostic.severity = severity,
                None => {
                    debug!(code = %diagnostic.code, "ignored diagnostic");
                    return;
                }
            }
        }
        match diagnostic.severity {
            Severity::Error | Severity::Warning => warn!(
                code = %diagnostic.code,
                span = ?diagnostic.span,
                "{}",
                diagnostic.message
            ),
            Severity::Info => debug!(code = %diagnostic.code, span = ?diagnostic.span, "{}", diagnostic.message),
        }
        out.push(diagnostic);
    }
}

/// Validate every item of `program` under `config`.
///
/// Each item gets its own resolver holding the program's callable
/// signatures and the item's parameters.
pub fn check_program(program: &Program, config: &SarlConfig) -> Result<Vec<Diagnostic>> {
    let registry = config.registry();
    let overrides = config.severity_overrides()?;
    let mut diagnostics = Vec::new();
    for item in &program.items {
        let mut resolver = StaticTypeResolver::for_program(program);
        match item {
            Item::Action(action) => resolver.declare_params(&action.params),
            Item::Behavior(behavior) => {
                resolver.declare_non_null("occurrence", behavior.event.node.clone());
            }
        }
        let validator = Validator::new(&resolver, &registry).with_overrides(overrides.clone());
        diagnostics.extend(validator.validate_item(item));
    }
    Ok(diagnostics)
}

/// Items whose body may fall through, by title
pub fn fall_through_items(program: &Program, config: &SarlConfig) -> Vec<String> {
    let registry = config.registry();
    let resolver = StaticTypeResolver::for_program(program);
    let validator = Validator::new(&resolver, &registry);
    program
        .items
        .iter()
        .filter(|item| match item {
            Item::Action(action) => {
                action.ret_ty.as_ref().is_some_and(|ty| ty.node != TypeRef::Void) && validator.needs_synthetic_return(item)
            }
            Item::Behavior(_) => false,
        })
        .map(Item::title)
        .collect()
}
