//! Statements: side effects and control flow.

use std::fmt;

use crate::expr::{Expression, Literal};
use crate::types::TypeReference;

/// A block of statements, in source order.
pub type Block = Vec<Statement>;

/// A 1-based position in the host source file.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// Location of synthesized nodes with no source counterpart.
    pub const UNKNOWN: Self = Self { line: 0, column: 0 };

    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::UNKNOWN {
            f.write_str("<unknown>")
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Simple and compound assignment operators.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum AssignOp {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
}

impl AssignOp {
    pub fn token(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Subtract => "-=",
            Self::Multiply => "*=",
            Self::Divide => "/=",
            Self::Modulo => "%=",
            Self::BitwiseAnd => "&=",
            Self::BitwiseOr => "|=",
            Self::BitwiseXor => "^=",
            Self::ShiftLeft => "<<=",
            Self::ShiftRight => ">>=",
        }
    }
}

/// One `case` group of a switch; `is_default` adds a `default:` label after `labels`.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase {
    pub labels: Vec<Literal>,
    pub is_default: bool,
    pub body: Block,
}

/// A statement with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub location: SourceLocation,
}

impl Statement {
    pub fn new(kind: StatementKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    /// Shorthand for a statement at `line:column`.
    pub fn at(line: u32, column: u32, kind: StatementKind) -> Self {
        Self::new(kind, SourceLocation::new(line, column))
    }
}

/// The closed set of statement forms.
#[derive(Clone, Debug, PartialEq)]
pub enum StatementKind {
    /// A nested `{ ... }` scope.
    Block(Block),
    /// `T name[N] = init;`
    VariableDeclaration {
        name: String,
        ty: TypeReference,
        /// Fixed array length; `0` for a scalar variable.
        array_length: u32,
        init: Option<Expression>,
    },
    /// An expression evaluated for its side effects.
    Expression(Expression),
    /// `target op value;`
    Assign {
        target: Expression,
        op: AssignOp,
        value: Expression,
    },
    If {
        condition: Expression,
        accept: Block,
        reject: Block,
    },
    For {
        initializer: Option<Box<Statement>>,
        condition: Option<Expression>,
        incrementors: Vec<Statement>,
        body: Block,
    },
    While {
        condition: Expression,
        body: Block,
    },
    DoWhile {
        body: Block,
        condition: Expression,
    },
    Switch {
        selector: Expression,
        cases: Vec<SwitchCase>,
    },
    /// Iteration over a collection; kept so the front-end can report it faithfully.
    Foreach {
        variable: String,
        ty: TypeReference,
        collection: Expression,
        body: Block,
    },
    Break,
    Continue,
    Return(Option<Expression>),
    /// Fragment-stage pixel kill.
    Discard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display() {
        assert_eq!(SourceLocation::new(12, 5).to_string(), "12:5");
        assert_eq!(SourceLocation::UNKNOWN.to_string(), "<unknown>");
    }

    #[test]
    fn build_if_statement() {
        let stmt = Statement::at(
            3,
            9,
            StatementKind::If {
                condition: Expression::Literal(Literal::Bool(true)),
                accept: vec![Statement::at(4, 13, StatementKind::Break)],
                reject: vec![],
            },
        );
        let StatementKind::If { accept, reject, .. } = &stmt.kind else {
            panic!("expected If");
        };
        assert_eq!(accept.len(), 1);
        assert!(reject.is_empty());
        assert_eq!(stmt.location.line, 3);
    }

    #[test]
    fn compound_assign_tokens() {
        assert_eq!(AssignOp::Assign.token(), "=");
        assert_eq!(AssignOp::ShiftRight.token(), ">>=");
    }
}
