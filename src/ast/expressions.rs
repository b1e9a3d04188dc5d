use crate::ast::Type;
use crate::frontend::token::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Token),
    Identifier(Token),
    Unary { op: Token, expr: Box<Expr> },
    Binary { left: Box<Expr>, op: Token, right: Box<Expr> },
    Call { name: Token, args: Vec<Expr> },
    /// Conversion of the inner expression to the node's own type.
    Cast(Box<Expr>),
}

/// An expression together with its resolved type.
///
/// Literals are typed when built; everything else starts out `Unknown` and
/// gets its type from the annotation pass. The generator trusts `ty`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
}

impl Expr {
    pub fn literal(value: Token) -> Self {
        let ty = Type::from_token(value.kind);
        Self {
            kind: ExprKind::Literal(value),
            ty,
        }
    }

    pub fn identifier(name: Token) -> Self {
        Self::untyped(ExprKind::Identifier(name))
    }

    pub fn unary(op: Token, expr: Expr) -> Self {
        Self::untyped(ExprKind::Unary {
            op,
            expr: Box::new(expr),
        })
    }

    pub fn binary(left: Expr, op: Token, right: Expr) -> Self {
        Self::untyped(ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn call(name: Token, args: Vec<Expr>) -> Self {
        Self::untyped(ExprKind::Call { name, args })
    }

    pub fn cast(expr: Expr, ty: Type) -> Self {
        Self {
            kind: ExprKind::Cast(Box::new(expr)),
            ty,
        }
    }

    pub fn with_type(self, ty: Type) -> Self {
        Self { ty, ..self }
    }

    fn untyped(kind: ExprKind) -> Self {
        Self {
            kind,
            ty: Type::Unknown,
        }
    }

    /// The token a diagnostic about this expression should point at.
    pub fn anchor(&self) -> &Token {
        match &self.kind {
            ExprKind::Literal(token) | ExprKind::Identifier(token) => token,
            ExprKind::Unary { op, .. } | ExprKind::Binary { op, .. } => op,
            ExprKind::Call { name, .. } => name,
            ExprKind::Cast(inner) => inner.anchor(),
        }
    }
}
