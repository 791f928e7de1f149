//! Lexical-order traversal of function bodies.

use shadegen_ir::{Expression, SourceLocation, Statement, StatementKind};

/// A node reached by [`walk_block`].
#[derive(Clone, Copy, Debug)]
pub(crate) enum Node<'a> {
    Statement(&'a Statement),
    Expression(&'a Expression),
}

/// Visits every statement and expression of `block` depth-first in source
/// order, passing the location of the innermost enclosing statement.
/// Stops at the first error.
pub(crate) fn walk_block<'a, E>(
    block: &'a [Statement],
    visit: &mut impl FnMut(Node<'a>, SourceLocation) -> Result<(), E>,
) -> Result<(), E> {
    for stmt in block {
        walk_statement(stmt, visit)?;
    }
    Ok(())
}

fn walk_statement<'a, E>(
    stmt: &'a Statement,
    visit: &mut impl FnMut(Node<'a>, SourceLocation) -> Result<(), E>,
) -> Result<(), E> {
    let loc = stmt.location;
    visit(Node::Statement(stmt), loc)?;
    match &stmt.kind {
        StatementKind::Block(block) => walk_block(block, visit)?,
        StatementKind::VariableDeclaration { init, .. } => {
            if let Some(init) = init {
                walk_expression(init, loc, visit)?;
            }
        }
        StatementKind::Expression(e) => walk_expression(e, loc, visit)?,
        StatementKind::Assign { target, value, .. } => {
            walk_expression(target, loc, visit)?;
            walk_expression(value, loc, visit)?;
        }
        StatementKind::If {
            condition,
            accept,
            reject,
        } => {
            walk_expression(condition, loc, visit)?;
            walk_block(accept, visit)?;
            walk_block(reject, visit)?;
        }
        StatementKind::For {
            initializer,
            condition,
            incrementors,
            body,
        } => {
            if let Some(init) = initializer {
                walk_statement(init, visit)?;
            }
            if let Some(c) = condition {
                walk_expression(c, loc, visit)?;
            }
            walk_block(incrementors, visit)?;
            walk_block(body, visit)?;
        }
        StatementKind::While { condition, body } => {
            walk_expression(condition, loc, visit)?;
            walk_block(body, visit)?;
        }
        StatementKind::DoWhile { body, condition } => {
            walk_block(body, visit)?;
            walk_expression(condition, loc, visit)?;
        }
        StatementKind::Switch { selector, cases } => {
            walk_expression(selector, loc, visit)?;
            for case in cases {
                walk_block(&case.body, visit)?;
            }
        }
        StatementKind::Foreach {
            collection, body, ..
        } => {
            walk_expression(collection, loc, visit)?;
            walk_block(body, visit)?;
        }
        StatementKind::Return(Some(e)) => walk_expression(e, loc, visit)?,
        StatementKind::Return(None)
        | StatementKind::Break
        | StatementKind::Continue
        | StatementKind::Discard => {}
    }
    Ok(())
}

fn walk_expression<'a, E>(
    expr: &'a Expression,
    loc: SourceLocation,
    visit: &mut impl FnMut(Node<'a>, SourceLocation) -> Result<(), E>,
) -> Result<(), E> {
    visit(Node::Expression(expr), loc)?;
    match expr {
        Expression::Literal(_)
        | Expression::Local(_)
        | Expression::Resource(_)
        | Expression::StaticMember { .. } => {}
        Expression::Member { base, .. } => walk_expression(base, loc, visit)?,
        Expression::Index { base, index } => {
            walk_expression(base, loc, visit)?;
            walk_expression(index, loc, visit)?;
        }
        Expression::Unary { operand, .. } | Expression::Cast { operand, .. } => {
            walk_expression(operand, loc, visit)?;
        }
        Expression::Binary { left, right, .. } => {
            walk_expression(left, loc, visit)?;
            walk_expression(right, loc, visit)?;
        }
        Expression::Conditional {
            condition,
            accept,
            reject,
        } => {
            walk_expression(condition, loc, visit)?;
            walk_expression(accept, loc, visit)?;
            walk_expression(reject, loc, visit)?;
        }
        Expression::Call { arguments, .. } | Expression::Construct { arguments, .. } => {
            for arg in arguments {
                walk_expression(arg, loc, visit)?;
            }
        }
    }
    Ok(())
}
