//! Type AST nodes

use serde::{Deserialize, Serialize};

use crate::numeric::NumericKind;

/// Static type of an expression, as supplied by the front-end.
///
/// Serialized as its Java name (`"AtomicLong"`, `"int"`, `"java.util.UUID"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeRef {
    /// Any primitive, boxed, atomic or big numeric type, or `Number`
    Numeric(NumericKind),
    Boolean,
    String,
    Object,
    Void,
    /// Any other reference type, by (possibly qualified) name
    Named(String),
}

impl TypeRef {
    /// Map a Java type name to a type reference
    pub fn from_name(name: &str) -> TypeRef {
        if let Some(kind) = NumericKind::from_java_name(name) {
            return TypeRef::Numeric(kind);
        }
        match name {
            "boolean" => TypeRef::Boolean,
            "String" | "java.lang.String" => TypeRef::String,
            "Object" | "java.lang.Object" => TypeRef::Object,
            "void" => TypeRef::Void,
            other => TypeRef::Named(other.to_string()),
        }
    }

    pub fn as_numeric(&self) -> Option<NumericKind> {
        match self {
            TypeRef::Numeric(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Whether values of this type may hold `null`
    pub fn is_reference(&self) -> bool {
        match self {
            TypeRef::Numeric(kind) => kind.is_reference(),
            TypeRef::Boolean | TypeRef::Void => false,
            TypeRef::String | TypeRef::Object | TypeRef::Named(_) => true,
        }
    }

    /// Unqualified name, used in diagnostic messages
    pub fn simple_name(&self) -> String {
        match self {
            TypeRef::Named(name) => name.rsplit('.').next().unwrap_or(name).to_string(),
            other => other.to_string(),
        }
    }
}

impl From<NumericKind> for TypeRef {
    fn from(kind: NumericKind) -> Self {
        TypeRef::Numeric(kind)
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        TypeRef::from_name(&name)
    }
}

impl From<TypeRef> for String {
    fn from(ty: TypeRef) -> Self {
        ty.to_string()
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Numeric(kind) => write!(f, "{kind}"),
            TypeRef::Boolean => write!(f, "boolean"),
            TypeRef::String => write!(f, "String"),
            TypeRef::Object => write!(f, "Object"),
            TypeRef::Void => write!(f, "void"),
            TypeRef::Named(name) => write!(f, "{name}"),
        }
    }
}
