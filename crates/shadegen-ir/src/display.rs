//! Display implementations and text dump for debugging.

use std::fmt;

use crate::expr::{BinaryOp, Expression, Literal, UnaryOp};
use crate::func::{ShaderFunction, ShaderFunctionType};
use crate::resource::ShaderResourceKind;
use crate::stmt::{Statement, StatementKind};
use crate::types::{SemanticType, StructureDefinition, TypeReference};
use crate::unit::CompilationUnit;

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array() {
            write!(f, "{}[]", self.name())
        } else {
            f.write_str(self.name())
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Position => write!(f, "position"),
            Self::TextureCoordinate => write!(f, "texcoord"),
            Self::Color => write!(f, "color"),
            Self::Normal => write!(f, "normal"),
            Self::Tangent => write!(f, "tangent"),
        }
    }
}

impl fmt::Display for ShaderResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Texture2D => write!(f, "texture2d"),
            Self::TextureCube => write!(f, "texture_cube"),
            Self::Sampler => write!(f, "sampler"),
            Self::StructuredBuffer => write!(f, "structured_buffer"),
            Self::RWStructuredBuffer => write!(f, "rw_structured_buffer"),
            Self::Other(raw) => write!(f, "unknown({raw})"),
        }
    }
}

impl fmt::Display for ShaderFunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "function"),
            Self::VertexEntryPoint => write!(f, "vertex"),
            Self::FragmentEntryPoint => write!(f, "fragment"),
            Self::ComputeEntryPoint => write!(f, "compute"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}u"),
            Self::Float(v) => write!(f, "{v:?}f"),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Host-like rendering; every compound subexpression is parenthesized.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Local(name) => f.write_str(name),
            Self::Resource(name) => write!(f, "@{name}"),
            Self::Member { base, member, .. } => write!(f, "{}.{member}", Operand(base)),
            Self::StaticMember { ty, member } => write!(f, "{ty}.{member}"),
            Self::Index { base, index } => write!(f, "{}[{index}]", Operand(base)),
            Self::Unary { op, operand } if op.is_postfix() => write!(f, "{}{op}", Operand(operand)),
            Self::Unary { op, operand } => write!(f, "{op}{}", Operand(operand)),
            Self::Binary { op, left, right } => {
                write!(f, "{} {op} {}", Operand(left), Operand(right))
            }
            Self::Conditional {
                condition,
                accept,
                reject,
            } => write!(
                f,
                "{} ? {} : {}",
                Operand(condition),
                Operand(accept),
                Operand(reject)
            ),
            Self::Call {
                function,
                arguments,
            } => write!(f, "{function}({})", join(arguments)),
            Self::Construct { ty, arguments } => write!(f, "new {ty}({})", join(arguments)),
            Self::Cast { ty, operand } => write!(f, "({ty}){}", Operand(operand)),
        }
    }
}

struct Operand<'a>(&'a Expression);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_compound() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn join(exprs: &[Expression]) -> String {
    exprs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_block(out: &mut String, block: &[Statement], indent: usize) {
    for s in block {
        write_stmt(out, s, indent);
    }
}

fn write_stmt(out: &mut String, stmt: &Statement, indent: usize) {
    let pad = " ".repeat(indent);
    match &stmt.kind {
        StatementKind::Block(block) => {
            out.push_str(&format!("{pad}Block {{\n"));
            write_block(out, block, indent + 4);
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::VariableDeclaration {
            name,
            ty,
            array_length,
            init,
        } => {
            let array = if *array_length > 0 {
                format!("[{array_length}]")
            } else {
                String::new()
            };
            let init = match init {
                Some(e) => format!(" = {e}"),
                None => String::new(),
            };
            out.push_str(&format!("{pad}Var {name}: {ty}{array}{init}\n"));
        }
        StatementKind::Expression(e) => {
            out.push_str(&format!("{pad}Eval {e}\n"));
        }
        StatementKind::Assign { target, op, value } => {
            out.push_str(&format!("{pad}Assign {target} {} {value}\n", op.token()));
        }
        StatementKind::If {
            condition,
            accept,
            reject,
        } => {
            out.push_str(&format!("{pad}If ({condition}) {{\n"));
            write_block(out, accept, indent + 4);
            if !reject.is_empty() {
                out.push_str(&format!("{pad}}} else {{\n"));
                write_block(out, reject, indent + 4);
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::For {
            initializer,
            condition,
            incrementors,
            body,
        } => {
            out.push_str(&format!("{pad}For {{\n"));
            if let Some(init) = initializer {
                out.push_str(&format!("{pad}  Init:\n"));
                write_stmt(out, init, indent + 4);
            }
            if let Some(c) = condition {
                out.push_str(&format!("{pad}  Condition {c}\n"));
            }
            if !incrementors.is_empty() {
                out.push_str(&format!("{pad}  Step:\n"));
                write_block(out, incrementors, indent + 4);
            }
            out.push_str(&format!("{pad}  Body:\n"));
            write_block(out, body, indent + 4);
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::While { condition, body } => {
            out.push_str(&format!("{pad}While ({condition}) {{\n"));
            write_block(out, body, indent + 4);
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::DoWhile { body, condition } => {
            out.push_str(&format!("{pad}Do {{\n"));
            write_block(out, body, indent + 4);
            out.push_str(&format!("{pad}}} While ({condition})\n"));
        }
        StatementKind::Switch { selector, cases } => {
            out.push_str(&format!("{pad}Switch ({selector}) {{\n"));
            for case in cases {
                let mut labels: Vec<_> = case.labels.iter().map(|l| l.to_string()).collect();
                if case.is_default {
                    labels.push("default".into());
                }
                out.push_str(&format!("{pad}  Case {}:\n", labels.join(", ")));
                write_block(out, &case.body, indent + 4);
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::Foreach {
            variable,
            ty,
            collection,
            body,
        } => {
            out.push_str(&format!("{pad}Foreach {variable}: {ty} in {collection} {{\n"));
            write_block(out, body, indent + 4);
            out.push_str(&format!("{pad}}}\n"));
        }
        StatementKind::Break => out.push_str(&format!("{pad}Break\n")),
        StatementKind::Continue => out.push_str(&format!("{pad}Continue\n")),
        StatementKind::Return(value) => match value {
            Some(v) => out.push_str(&format!("{pad}Return {v}\n")),
            None => out.push_str(&format!("{pad}Return\n")),
        },
        StatementKind::Discard => out.push_str(&format!("{pad}Discard\n")),
    }
}

fn dump_structure(out: &mut String, sd: &StructureDefinition) {
    out.push_str(&format!("  struct {} {{\n", sd.name));
    for field in &sd.fields {
        let array = if field.is_fixed_array() {
            format!("[{}]", field.array_element_count)
        } else {
            String::new()
        };
        let semantic = if field.semantic == SemanticType::None {
            String::new()
        } else {
            format!("  @{}", field.semantic)
        };
        out.push_str(&format!("    {}: {}{array}{semantic}\n", field.name, field.ty));
    }
    out.push_str("  }\n");
}

fn dump_function(out: &mut String, func: &ShaderFunction, body: &[Statement]) {
    let params: Vec<_> = func
        .parameters
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty))
        .collect();
    let workgroup = if func.function_type == ShaderFunctionType::ComputeEntryPoint {
        let [x, y, z] = func.workgroup_size;
        format!(" @workgroup_size({x}, {y}, {z})")
    } else {
        String::new()
    };
    out.push_str(&format!(
        "  fn {}({}) -> {}  [{}]{workgroup} {{\n",
        func.name,
        params.join(", "),
        func.return_type,
        func.function_type
    ));
    write_block(out, body, 4);
    out.push_str("  }\n");
}

/// Produces a human-readable text dump of a [`CompilationUnit`] for debugging.
///
/// The dump is deterministic: sections follow insertion order.
pub fn dump_unit(unit: &CompilationUnit) -> String {
    let mut out = String::new();

    let structures = unit.structures.snapshot();
    out.push_str("Structures:\n");
    for sd in &structures {
        dump_structure(&mut out, sd);
    }

    if !unit.resources.is_empty() {
        out.push_str("\nResources:\n");
        for (_, rd) in unit.resources.iter() {
            let value = match &rd.value_type {
                Some(ty) => format!(": {ty}"),
                None => String::new(),
            };
            out.push_str(&format!(
                "  @binding({}) {} {}{value}\n",
                rd.binding, rd.kind, rd.name
            ));
        }
    }

    if !unit.functions.is_empty() {
        out.push_str("\nFunctions:\n");
        for (_, f) in unit.functions.iter() {
            dump_function(&mut out, &f.function, &f.body);
        }
    }

    out
}
