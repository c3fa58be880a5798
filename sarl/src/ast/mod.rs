//! Abstract Syntax Tree definitions
//!
//! Only the typed shapes consumed by the numeric lowering engine and the
//! early-exit analysis are modelled. Trees are produced by the front-end and
//! may be loaded from JSON.

mod expr;
mod span;
mod types;

pub use expr::*;
pub use span::*;
pub use types::*;

use serde::{Deserialize, Serialize};

/// A compilation unit: the behavior units and actions of one agent-like type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub items: Vec<Item>,
    /// Declared return types of callables invoked from the items
    #[serde(default)]
    pub features: Vec<FeatureDecl>,
}

/// Top-level item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Item {
    Behavior(BehaviorUnit),
    Action(ActionDef),
}

impl Item {
    pub fn body(&self) -> &Spanned<Expr> {
        match self {
            Item::Behavior(b) => &b.body,
            Item::Action(a) => &a.body,
        }
    }

    /// Display name: `on Initialize` or `def fct`
    pub fn title(&self) -> String {
        match self {
            Item::Behavior(b) => format!("on {}", b.event.node),
            Item::Action(a) => format!("def {}", a.name.node),
        }
    }
}

/// Behavior unit: `on Event [guard] { body }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorUnit {
    pub event: Spanned<TypeRef>,
    #[serde(default)]
    pub guard: Option<Spanned<Expr>>,
    pub body: Spanned<Expr>,
    #[serde(default)]
    pub span: Span,
}

/// Action definition: `def name(params) : ret { body }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: Spanned<String>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub ret_ty: Option<Spanned<TypeRef>>,
    pub body: Spanned<Expr>,
    #[serde(default)]
    pub span: Span,
}

/// Formal parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: Spanned<String>,
    pub ty: Spanned<TypeRef>,
    /// Set when the front-end proved the parameter is never `null`
    #[serde(default)]
    pub non_null: bool,
}

/// Declared signature of an invoked callable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureDecl {
    pub id: CallableId,
    pub ret_ty: TypeRef,
}
