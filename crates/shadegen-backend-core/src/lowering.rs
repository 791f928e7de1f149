//! The lowering visitor: IR function bodies to target source text.
//!
//! Layout (Allman braces, one statement per line, parenthesized compound
//! operands) is shared by every backend; spellings come from the backend's
//! tables and hooks.

use std::collections::HashMap;

use shadegen_ir::{
    AssignOp, BinaryOp, Expression, Literal, ShaderFunctionAndBody, SourceLocation, Statement,
    StatementKind, SwitchCase, TypeReference, known,
};

use crate::error::GenerationError;
use crate::generator::Context;
use crate::tables::IntrinsicArgument;
use crate::walk::{Node, walk_block};
use crate::{BackendOptions, ShaderStage};

/// Emits one shader function: signature, body, and a trailing blank line.
pub(crate) fn write_function(
    ctx: &Context<'_>,
    f: &ShaderFunctionAndBody,
    stage: ShaderStage,
    out: &mut String,
    opts: &BackendOptions,
) -> Result<(), GenerationError> {
    let function = &f.function;
    let backend = ctx.backend;

    if function.return_type.is_array() {
        return Err(GenerationError::unsupported(
            format!("array return type of `{}`", function.name),
            SourceLocation::UNKNOWN,
        ));
    }
    let params = function
        .parameters
        .iter()
        .map(|p| {
            if p.ty.is_array() {
                return Err(GenerationError::unsupported(
                    format!("array parameter `{}` of `{}`", p.name, function.name),
                    SourceLocation::UNKNOWN,
                ));
            }
            Ok(format!(
                "{} {}",
                ctx.mapped_type(&p.ty)?,
                backend.correct_identifier(&p.name)
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut locals: HashMap<String, TypeReference> = function
        .parameters
        .iter()
        .map(|p| (p.name.clone(), p.ty.clone()))
        .collect();
    walk_block(&f.body, &mut |node, _| {
        if let Node::Statement(Statement {
            kind: StatementKind::VariableDeclaration { name, ty, .. },
            ..
        }) = node
        {
            locals.insert(name.clone(), ty.clone());
        }
        Ok::<_, GenerationError>(())
    })?;
    let lowerer = Lowerer {
        ctx,
        stage,
        opts,
        locals,
    };

    out.push_str(&format!(
        "{} {}({})\n{{\n",
        ctx.mapped_type(&function.return_type)?,
        backend.correct_identifier(&function.name),
        params.join(", ")
    ));
    lowerer.block(out, &f.body, 1)?;
    out.push_str("}\n\n");
    Ok(())
}

struct Lowerer<'c, 'a> {
    ctx: &'c Context<'a>,
    stage: ShaderStage,
    opts: &'c BackendOptions,
    /// Declared type of every parameter and local of the function.
    locals: HashMap<String, TypeReference>,
}

impl Lowerer<'_, '_> {
    fn block(&self, out: &mut String, block: &[Statement], level: usize) -> Result<(), GenerationError> {
        for stmt in block {
            self.statement(out, stmt, level)?;
        }
        Ok(())
    }

    fn braced(&self, out: &mut String, block: &[Statement], level: usize) -> Result<(), GenerationError> {
        let pad = self.opts.pad(level);
        out.push_str(&format!("{pad}{{\n"));
        self.block(out, block, level + 1)?;
        out.push_str(&format!("{pad}}}\n"));
        Ok(())
    }

    fn statement(&self, out: &mut String, stmt: &Statement, level: usize) -> Result<(), GenerationError> {
        let pad = self.opts.pad(level);
        let loc = stmt.location;
        match &stmt.kind {
            StatementKind::Block(block) => self.braced(out, block, level)?,
            StatementKind::VariableDeclaration { .. }
            | StatementKind::Expression(_)
            | StatementKind::Assign { .. } => {
                let text = self.simple_statement(stmt)?;
                out.push_str(&format!("{pad}{text};\n"));
            }
            StatementKind::If { .. } => self.if_chain(out, stmt, level)?,
            StatementKind::For {
                initializer,
                condition,
                incrementors,
                body,
            } => {
                let init = match initializer {
                    Some(init) => self.simple_statement(init)?,
                    None => String::new(),
                };
                let cond = match condition {
                    Some(c) => self.expr(c, loc)?,
                    None => String::new(),
                };
                let step = incrementors
                    .iter()
                    .map(|s| self.simple_statement(s))
                    .collect::<Result<Vec<_>, _>>()?
                    .join(", ");
                let header = if init.is_empty() && cond.is_empty() && step.is_empty() {
                    ";;".to_owned()
                } else {
                    format!("{init}; {cond}; {step}").trim().to_owned()
                };
                out.push_str(&format!("{pad}for ({header})\n"));
                self.braced(out, body, level)?;
            }
            StatementKind::While { condition, body } => {
                out.push_str(&format!("{pad}while ({})\n", self.expr(condition, loc)?));
                self.braced(out, body, level)?;
            }
            StatementKind::DoWhile { body, condition } => {
                out.push_str(&format!("{pad}do\n{pad}{{\n"));
                self.block(out, body, level + 1)?;
                out.push_str(&format!("{pad}}} while ({});\n", self.expr(condition, loc)?));
            }
            StatementKind::Switch { selector, cases } => {
                out.push_str(&format!("{pad}switch ({})\n{pad}{{\n", self.expr(selector, loc)?));
                for case in cases {
                    self.switch_case(out, case, loc, level + 1)?;
                }
                out.push_str(&format!("{pad}}}\n"));
            }
            StatementKind::Foreach { .. } => {
                return Err(GenerationError::unsupported("foreach statement", loc));
            }
            StatementKind::Break => out.push_str(&format!("{pad}break;\n")),
            StatementKind::Continue => out.push_str(&format!("{pad}continue;\n")),
            StatementKind::Return(None) => out.push_str(&format!("{pad}return;\n")),
            StatementKind::Return(Some(e)) => {
                out.push_str(&format!("{pad}return {};\n", self.expr(e, loc)?));
            }
            StatementKind::Discard => {
                if self.stage != ShaderStage::Fragment {
                    return Err(GenerationError::unsupported(
                        format!("discard in a {} shader", self.stage),
                        loc,
                    ));
                }
                out.push_str(&format!("{pad}discard;\n"));
            }
        }
        Ok(())
    }

    /// `if`, with an `else` that holds nothing but another `if` folded into
    /// `else if`.
    fn if_chain(&self, out: &mut String, stmt: &Statement, level: usize) -> Result<(), GenerationError> {
        let pad = self.opts.pad(level);
        let mut keyword = "if";
        let mut current = stmt;
        while let StatementKind::If {
            condition,
            accept,
            reject,
        } = &current.kind
        {
            let cond = self.expr(condition, current.location)?;
            out.push_str(&format!("{pad}{keyword} ({cond})\n"));
            self.braced(out, accept, level)?;
            match reject.as_slice() {
                [] => break,
                [
                    next @ Statement {
                        kind: StatementKind::If { .. },
                        ..
                    },
                ] => {
                    keyword = "else if";
                    current = next;
                }
                _ => {
                    out.push_str(&format!("{pad}else\n"));
                    self.braced(out, reject, level)?;
                    break;
                }
            }
        }
        Ok(())
    }

    fn switch_case(
        &self,
        out: &mut String,
        case: &SwitchCase,
        loc: SourceLocation,
        level: usize,
    ) -> Result<(), GenerationError> {
        let pad = self.opts.pad(level);
        for label in &case.labels {
            let text = match label {
                Literal::Int(v) => v.to_string(),
                Literal::UInt(v) => format!("{v}u"),
                Literal::Bool(_) | Literal::Float(_) => {
                    return Err(GenerationError::unsupported(
                        "non-integer switch label",
                        loc,
                    ));
                }
            };
            out.push_str(&format!("{pad}case {text}:\n"));
        }
        if case.is_default {
            out.push_str(&format!("{pad}default:\n"));
        }
        self.block(out, &case.body, level + 1)
    }

    /// Statements that may also appear in a `for` header; no trailing `;`.
    fn simple_statement(&self, stmt: &Statement) -> Result<String, GenerationError> {
        let loc = stmt.location;
        match &stmt.kind {
            StatementKind::VariableDeclaration {
                name,
                ty,
                array_length,
                init,
            } => {
                if ty.is_array() {
                    return Err(GenerationError::unsupported(
                        format!("unsized array variable `{name}`"),
                        loc,
                    ));
                }
                let mut text = format!(
                    "{} {}",
                    self.ctx.mapped_type(ty)?,
                    self.ctx.backend.correct_identifier(name)
                );
                if *array_length > 0 {
                    text.push_str(&format!("[{array_length}]"));
                }
                if let Some(init) = init {
                    text.push_str(&format!(" = {}", self.expr(init, loc)?));
                }
                Ok(text)
            }
            StatementKind::Expression(e) => self.expr(e, loc),
            StatementKind::Assign {
                target,
                op: AssignOp::Modulo,
                value,
            } if self.is_float(target) || self.is_float(value) => {
                let remainder = self
                    .ctx
                    .backend
                    .float_remainder(&self.operand(target, loc)?, &self.operand(value, loc)?);
                Ok(format!("{} = {remainder}", self.expr(target, loc)?))
            }
            StatementKind::Assign { target, op, value } => Ok(format!(
                "{} {} {}",
                self.expr(target, loc)?,
                op.token(),
                self.expr(value, loc)?
            )),
            _ => Err(GenerationError::unsupported(
                "compound statement in a for header",
                loc,
            )),
        }
    }

    fn operand(&self, e: &Expression, loc: SourceLocation) -> Result<String, GenerationError> {
        let text = self.expr(e, loc)?;
        Ok(if e.is_compound() { format!("({text})") } else { text })
    }

    fn expr(&self, e: &Expression, loc: SourceLocation) -> Result<String, GenerationError> {
        let backend = self.ctx.backend;
        let text = match e {
            Expression::Literal(lit) => literal(*lit, loc)?,
            Expression::Local(name) => backend.correct_identifier(name),
            Expression::Resource(name) => match self.ctx.unit.resource(name) {
                Some(rd) => backend.resource_reference(rd),
                None => {
                    return Err(GenerationError::unsupported(
                        format!("reference to unknown resource `{name}`"),
                        loc,
                    ));
                }
            },
            Expression::Member {
                base,
                declaring_type,
                member,
            } => {
                let base = self.operand(base, loc)?;
                let member = self.member(declaring_type, member, loc)?;
                format!("{base}.{member}")
            }
            Expression::StaticMember { ty, member } => {
                match backend.identifier_table().static_member(ty.name(), member) {
                    Some(text) => text.to_owned(),
                    None => {
                        return Err(GenerationError::unsupported(
                            format!("static member `{}.{member}`", ty.name()),
                            loc,
                        ));
                    }
                }
            }
            Expression::Index { base, index } => {
                format!("{}[{}]", self.operand(base, loc)?, self.expr(index, loc)?)
            }
            Expression::Unary { op, operand } => {
                let operand = self.operand(operand, loc)?;
                if op.is_postfix() {
                    format!("{operand}{}", op.token())
                } else {
                    format!("{}{operand}", op.token())
                }
            }
            Expression::Binary {
                op: BinaryOp::Modulo,
                left,
                right,
            } if self.is_float(left) || self.is_float(right) => {
                backend.float_remainder(&self.operand(left, loc)?, &self.operand(right, loc)?)
            }
            Expression::Binary { op, left, right } => format!(
                "{} {} {}",
                self.operand(left, loc)?,
                op.token(),
                self.operand(right, loc)?
            ),
            Expression::Conditional {
                condition,
                accept,
                reject,
            } => format!(
                "{} ? {} : {}",
                self.operand(condition, loc)?,
                self.operand(accept, loc)?,
                self.operand(reject, loc)?
            ),
            Expression::Call {
                function,
                arguments,
            } => self.call(function, arguments, loc)?,
            Expression::Construct { ty, arguments } => self.construct(ty, arguments, loc)?,
            Expression::Cast { ty, operand } => {
                let mapped = self.scalar_type(ty, loc)?;
                let operand = self.expr(operand, loc)?;
                backend
                    .construct(&mapped, false, &[operand])
                    .ok_or_else(|| {
                        GenerationError::unsupported(format!("conversion to `{}`", ty.name()), loc)
                    })?
            }
        };
        Ok(text)
    }

    fn member(
        &self,
        declaring_type: &TypeReference,
        member: &str,
        loc: SourceLocation,
    ) -> Result<String, GenerationError> {
        let backend = self.ctx.backend;
        if let Some(sd) = self.ctx.structure(declaring_type.name()) {
            return match sd.field(member) {
                Some(field) => Ok(backend.correct_identifier(&field.name)),
                None => Err(GenerationError::unsupported(
                    format!("`{}` has no field `{member}`", sd.name),
                    loc,
                )),
            };
        }
        backend
            .map_identifier_core(declaring_type.name(), member)
            .ok_or_else(|| {
                GenerationError::unsupported(
                    format!("member `{member}` of `{}`", declaring_type.name()),
                    loc,
                )
            })
    }

    fn call(
        &self,
        function: &str,
        arguments: &[Expression],
        loc: SourceLocation,
    ) -> Result<String, GenerationError> {
        let backend = self.ctx.backend;
        if self.ctx.unit.function(function).is_some() {
            let args = arguments
                .iter()
                .map(|a| self.expr(a, loc))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(format!(
                "{}({})",
                backend.correct_identifier(function),
                args.join(", ")
            ));
        }

        let Some(intrinsic) = backend.intrinsics().get(function) else {
            return Err(GenerationError::unsupported(
                format!("call to `{function}`"),
                loc,
            ));
        };
        let args = arguments
            .iter()
            .map(|a| {
                let resource = match a {
                    Expression::Resource(name) => self.ctx.unit.resource(name).map(|rd| rd.kind),
                    _ => None,
                };
                Ok(IntrinsicArgument {
                    text: self.expr(a, loc)?,
                    compound: a.is_compound(),
                    resource,
                })
            })
            .collect::<Result<Vec<_>, GenerationError>>()?;
        intrinsic.apply(&args).ok_or_else(|| {
            GenerationError::unsupported(
                format!("`{function}` with {} argument(s) on {}", args.len(), backend.name()),
                loc,
            )
        })
    }

    fn construct(
        &self,
        ty: &TypeReference,
        arguments: &[Expression],
        loc: SourceLocation,
    ) -> Result<String, GenerationError> {
        if arguments.is_empty() {
            return self.zero_value(ty, loc);
        }
        let mapped = self.scalar_type(ty, loc)?;
        let is_structure = self.ctx.structure(ty.name()).is_some();
        let args = arguments
            .iter()
            .map(|a| self.expr(a, loc))
            .collect::<Result<Vec<_>, _>>()?;
        self.ctx
            .backend
            .construct(&mapped, is_structure, &args)
            .ok_or_else(|| {
                GenerationError::unsupported(format!("constructor of `{}`", ty.name()), loc)
            })
    }

    /// The default value of `ty`; structures the backend cannot zero in one
    /// expression are built field by field.
    fn zero_value(&self, ty: &TypeReference, loc: SourceLocation) -> Result<String, GenerationError> {
        let backend = self.ctx.backend;
        let mapped = self.scalar_type(ty, loc)?;
        let structure = self.ctx.structure(ty.name());
        if let Some(zero) = backend.zero_value(&mapped, structure.is_some()) {
            return Ok(zero);
        }
        let unsupported =
            || GenerationError::unsupported(format!("default value of `{}`", ty.name()), loc);
        let Some(sd) = structure else {
            return Err(unsupported());
        };

        let mut fields = Vec::with_capacity(sd.fields.len());
        for field in &sd.fields {
            let zero = self.zero_value(&field.ty, loc)?;
            if field.is_fixed_array() {
                let element = self.scalar_type(&field.ty, loc)?;
                let count = field.array_element_count;
                let elements = vec![zero; count as usize];
                let array = backend
                    .construct(&format!("{element}[{count}]"), false, &elements)
                    .ok_or_else(unsupported)?;
                fields.push(array);
            } else {
                fields.push(zero);
            }
        }
        backend.construct(&mapped, true, &fields).ok_or_else(unsupported)
    }

    /// The host type of `e` where declarations alone tell it.
    fn value_type<'s>(&'s self, e: &'s Expression) -> Option<&'s str> {
        match e {
            Expression::Literal(lit) => Some(match lit {
                Literal::Bool(_) => known::BOOL,
                Literal::Int(_) => known::INT,
                Literal::UInt(_) => known::UINT,
                Literal::Float(_) => known::FLOAT,
            }),
            Expression::Local(name) => self.locals.get(name).map(TypeReference::name),
            Expression::Resource(name) => self
                .ctx
                .unit
                .resource(name)?
                .value_type
                .as_ref()
                .map(TypeReference::name),
            Expression::Member {
                declaring_type,
                member,
                ..
            } => {
                if let Some(sd) = self.ctx.structure(declaring_type.name()) {
                    return sd.field(member).map(|f| f.ty.name());
                }
                match (declaring_type.name(), member.len()) {
                    (known::MATRIX4X4, _) | (_, 1) => Some(known::FLOAT),
                    (_, 2) => Some(known::VECTOR2),
                    (_, 3) => Some(known::VECTOR3),
                    (_, 4) => Some(known::VECTOR4),
                    _ => None,
                }
            }
            Expression::StaticMember { ty, .. } if ty.name() == known::MATHF => Some(known::FLOAT),
            Expression::StaticMember { ty, .. } => Some(ty.name()),
            Expression::Index { base, .. } | Expression::Unary { operand: base, .. } => {
                self.value_type(base)
            }
            Expression::Binary { left, right, .. } => {
                self.value_type(left).or_else(|| self.value_type(right))
            }
            Expression::Conditional { accept, reject, .. } => {
                self.value_type(accept).or_else(|| self.value_type(reject))
            }
            Expression::Call { function, .. } => self
                .ctx
                .unit
                .function(function)
                .map(|f| f.function.return_type.name()),
            Expression::Construct { ty, .. } | Expression::Cast { ty, .. } => Some(ty.name()),
        }
    }

    /// Whether `e` is known to be floating point (scalar, vector or matrix).
    fn is_float(&self, e: &Expression) -> bool {
        self.value_type(e).is_some_and(|ty| {
            ty == known::FLOAT || ty == known::MATRIX4X4 || known::vector_width(ty).is_some()
        })
    }

    fn scalar_type(&self, ty: &TypeReference, loc: SourceLocation) -> Result<String, GenerationError> {
        if ty.is_array() {
            return Err(GenerationError::unsupported(
                format!("array value of `{}`", ty.name()),
                loc,
            ));
        }
        self.ctx.mapped_type(ty)
    }
}

fn literal(lit: Literal, loc: SourceLocation) -> Result<String, GenerationError> {
    Ok(match lit {
        Literal::Bool(v) => v.to_string(),
        Literal::Int(v) => v.to_string(),
        Literal::UInt(v) => format!("{v}u"),
        Literal::Float(v) if v.is_finite() => format!("{v:?}"),
        Literal::Float(v) => {
            return Err(GenerationError::unsupported(
                format!("non-finite float literal {v}"),
                loc,
            ));
        }
    })
}
