//! Expressions, the value-producing nodes of a function body.

use crate::types::TypeReference;

/// A literal constant value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i32),
    UInt(u32),
    Float(f32),
}

/// A unary operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum UnaryOp {
    Negate,
    LogicalNot,
    BitwiseNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    /// The operator token, identical across C-family shading languages.
    pub fn token(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::LogicalNot => "!",
            Self::BitwiseNot => "~",
            Self::PreIncrement | Self::PostIncrement => "++",
            Self::PreDecrement | Self::PostDecrement => "--",
        }
    }

    /// Whether the operator is written after its operand.
    pub fn is_postfix(self) -> bool {
        matches!(self, Self::PostIncrement | Self::PostDecrement)
    }
}

/// A binary operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOp {
    /// The host-language operator token.
    pub fn token(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::BitwiseXor => "^",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
        }
    }
}

/// An expression node.
///
/// Children are evaluated left to right, in the order they appear in the
/// variant (receiver before arguments, left before right).
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// A literal constant.
    Literal(Literal),
    /// A reference to a parameter or local variable.
    Local(String),
    /// A reference to a module-scope resource.
    Resource(String),
    /// Instance member access (`base.member`), with the resolved type that declares `member`.
    Member {
        base: Box<Expression>,
        declaring_type: TypeReference,
        member: String,
    },
    /// Static member access (`Vector4.Zero`, `MathF.PI`).
    StaticMember { ty: TypeReference, member: String },
    /// Array or buffer indexing.
    Index {
        base: Box<Expression>,
        index: Box<Expression>,
    },
    /// Apply a unary operator.
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    /// Apply a binary operator.
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `condition ? accept : reject`.
    Conditional {
        condition: Box<Expression>,
        accept: Box<Expression>,
        reject: Box<Expression>,
    },
    /// A call to a shader function (by name) or an intrinsic (by canonical name).
    Call {
        function: String,
        arguments: Vec<Expression>,
    },
    /// Construct a value of `ty`; no arguments means the zero/default value.
    Construct {
        ty: TypeReference,
        arguments: Vec<Expression>,
    },
    /// Explicit numeric conversion.
    Cast {
        ty: TypeReference,
        operand: Box<Expression>,
    },
}

impl Expression {
    pub fn local(name: impl Into<String>) -> Self {
        Self::Local(name.into())
    }

    pub fn resource(name: impl Into<String>) -> Self {
        Self::Resource(name.into())
    }

    pub fn float(value: f32) -> Self {
        Self::Literal(Literal::Float(value))
    }

    pub fn int(value: i32) -> Self {
        Self::Literal(Literal::Int(value))
    }

    pub fn member(
        base: Expression,
        declaring_type: impl Into<TypeReference>,
        member: impl Into<String>,
    ) -> Self {
        Self::Member {
            base: Box::new(base),
            declaring_type: declaring_type.into(),
            member: member.into(),
        }
    }

    pub fn static_member(ty: impl Into<TypeReference>, member: impl Into<String>) -> Self {
        Self::StaticMember {
            ty: ty.into(),
            member: member.into(),
        }
    }

    pub fn index(base: Expression, index: Expression) -> Self {
        Self::Index {
            base: Box::new(base),
            index: Box::new(index),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn conditional(condition: Expression, accept: Expression, reject: Expression) -> Self {
        Self::Conditional {
            condition: Box::new(condition),
            accept: Box::new(accept),
            reject: Box::new(reject),
        }
    }

    pub fn call(function: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self::Call {
            function: function.into(),
            arguments,
        }
    }

    pub fn construct(ty: impl Into<TypeReference>, arguments: Vec<Expression>) -> Self {
        Self::Construct {
            ty: ty.into(),
            arguments,
        }
    }

    pub fn cast(ty: impl Into<TypeReference>, operand: Expression) -> Self {
        Self::Cast {
            ty: ty.into(),
            operand: Box::new(operand),
        }
    }

    /// Whether this node needs parentheses when used as an operand.
    ///
    /// Negative literals count: `-(-2.0)` must not print as `--2.0`.
    pub fn is_compound(&self) -> bool {
        match self {
            Self::Literal(Literal::Int(v)) => *v < 0,
            Self::Literal(Literal::Float(v)) => v.is_sign_negative(),
            Self::Binary { .. } | Self::Conditional { .. } | Self::Unary { .. } | Self::Cast { .. } => true,
            _ => false,
        }
    }
}
