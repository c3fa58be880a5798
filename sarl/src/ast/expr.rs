//! Expression AST nodes
//!
//! The typed expression tree handed over by the front-end. Statements are
//! expressions, as in SARL: a block's value is the value of its last entry.

use super::{Spanned, TypeRef};
use serde::{Deserialize, Serialize};

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal
    IntLit(i64),
    /// Floating point literal
    FloatLit(f64),
    /// Boolean literal
    BoolLit(bool),
    /// String literal
    StringLit(String),
    /// `null`
    Null,

    /// Local variable or parameter reference
    Var(String),

    /// Binary arithmetic operation
    Binary {
        left: Box<Spanned<Expr>>,
        op: BinOp,
        right: Box<Spanned<Expr>>,
    },

    /// Unary operation
    Unary {
        op: UnOp,
        expr: Box<Spanned<Expr>>,
    },

    /// Cast: `expr as Type`
    Cast {
        expr: Box<Spanned<Expr>>,
        target: Spanned<TypeRef>,
    },

    /// Method, capacity function or field access
    FeatureCall(FeatureCall),

    /// Block: `{ stmt1 stmt2 ... }`
    Block(Vec<Spanned<Expr>>),

    /// Conditional, with optional else branch
    If {
        cond: Box<Spanned<Expr>>,
        then_branch: Box<Spanned<Expr>>,
        else_branch: Option<Box<Spanned<Expr>>>,
    },

    /// `while (cond) body`
    While {
        cond: Box<Spanned<Expr>>,
        body: Box<Spanned<Expr>>,
    },

    /// `do body while (cond)`
    DoWhile {
        body: Box<Spanned<Expr>>,
        cond: Box<Spanned<Expr>>,
    },

    /// `break` out of the innermost loop
    Break,

    /// `return` with optional value
    Return(Option<Box<Spanned<Expr>>>),

    /// `throw expr`
    Throw(Box<Spanned<Expr>>),

    /// `try body catch ... finally ...`; each catch is the handler body
    TryCatch {
        body: Box<Spanned<Expr>>,
        catches: Vec<Spanned<Expr>>,
        finally: Option<Box<Spanned<Expr>>>,
    },

    /// `synchronized (lock) body`
    Synchronized {
        lock: Box<Spanned<Expr>>,
        body: Box<Spanned<Expr>>,
    },

    /// Node shape this core does not model (lambdas, switch, closures, ...)
    Opaque(String),
}

impl Expr {
    pub fn is_true_literal(&self) -> bool {
        matches!(self, Expr::BoolLit(true))
    }

    /// Direct sub-expressions, in evaluation order
    pub fn children(&self) -> Vec<&Spanned<Expr>> {
        match self {
            Expr::IntLit(_)
            | Expr::FloatLit(_)
            | Expr::BoolLit(_)
            | Expr::StringLit(_)
            | Expr::Null
            | Expr::Var(_)
            | Expr::Break
            | Expr::Opaque(_) => Vec::new(),
            Expr::Binary { left, right, .. } => vec![&**left, &**right],
            Expr::Unary { expr, .. } | Expr::Cast { expr, .. } | Expr::Throw(expr) => vec![&**expr],
            Expr::FeatureCall(call) => call.receiver.iter().map(|r| &**r).chain(call.args.iter()).collect(),
            Expr::Block(stmts) => stmts.iter().collect(),
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let mut children = vec![&**cond, &**then_branch];
                children.extend(else_branch.as_deref());
                children
            }
            Expr::While { cond, body } => vec![&**cond, &**body],
            Expr::DoWhile { body, cond } => vec![&**body, &**cond],
            Expr::Return(value) => value.as_deref().into_iter().collect(),
            Expr::TryCatch { body, catches, finally } => std::iter::once(&**body)
                .chain(catches.iter())
                .chain(finally.as_deref())
                .collect(),
            Expr::Synchronized { lock, body } => vec![&**lock, &**body],
        }
    }
}

/// A call to a feature (operation, capacity function, field).
///
/// The `feature` slot is the raw cross-reference as stored in the tree. It is
/// only read through [`crate::resolver::TypeResolution::raw_feature_slot`],
/// which never links it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCall {
    #[serde(default)]
    pub receiver: Option<Box<Spanned<Expr>>>,
    pub feature: FeatureSlot,
    #[serde(default)]
    pub args: Vec<Spanned<Expr>>,
}

/// Raw feature reference of a call site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureSlot {
    /// Reference already linked to its declaration
    Linked(CallableId),
    /// Unlinked reference, holding the text written at the call site
    Proxy(String),
}

impl FeatureSlot {
    pub fn linked(&self) -> Option<&CallableId> {
        match self {
            FeatureSlot::Linked(id) => Some(id),
            FeatureSlot::Proxy(_) => None,
        }
    }
}

/// Fully qualified identity of a callable: `io.sarl.api.core.Lifecycle.killMe`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallableId(String);

impl CallableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Member name, `killMe` for `...Lifecycle.killMe`
    pub fn member_name(&self) -> &str {
        self.0.rsplit_once('.').map_or(self.0.as_str(), |(_, name)| name)
    }
}

impl std::fmt::Display for CallableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// `**`
    Pow,
}

impl BinOp {
    pub const ALL: [BinOp; 6] = [BinOp::Add, BinOp::Sub, BinOp::Mul, BinOp::Div, BinOp::Mod, BinOp::Pow];

    pub fn is_commutative(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Mul)
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Mod => write!(f, "%"),
            BinOp::Pow => write!(f, "**"),
        }
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnOp {
    /// Negation (-)
    Neg,
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Neg => write!(f, "-"),
        }
    }
}
