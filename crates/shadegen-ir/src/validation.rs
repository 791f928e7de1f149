//! Compilation unit validation.
//!
//! Checks structural invariants of a unit before any backend sees it and
//! logs a warning for every problem found. The unit is never modified; code
//! generation reports the same problems as hard errors when they matter for
//! the requested entry point.

use std::collections::HashSet;
use std::fmt;

use crate::func::{ShaderFunction, ShaderFunctionType};
use crate::known;
use crate::resource::{ResourceDefinition, ShaderResourceKind};
use crate::types::StructureDefinition;
use crate::unit::CompilationUnit;

/// A problem found by [`validate_unit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The structure, resource, or function the problem belongs to.
    pub subject: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

struct Issues(Vec<ValidationIssue>);

impl Issues {
    fn push(&mut self, subject: &str, message: String) {
        log::warn!("{subject}: {message}");
        self.0.push(ValidationIssue {
            subject: subject.to_owned(),
            message,
        });
    }
}

/// Validates `unit` and returns every issue found, in a deterministic order.
pub fn validate_unit(unit: &CompilationUnit) -> Vec<ValidationIssue> {
    let mut issues = Issues(Vec::new());

    for sd in unit.structures.snapshot() {
        validate_structure(&sd, &mut issues);
    }
    for (_, rd) in unit.resources.iter() {
        validate_resource(rd, &mut issues);
    }
    for (_, f) in unit.functions.iter() {
        validate_function(unit, &f.function, &mut issues);
    }

    issues.0
}

fn validate_structure(sd: &StructureDefinition, issues: &mut Issues) {
    let mut seen = HashSet::new();
    for field in &sd.fields {
        if !seen.insert(field.name.as_str()) {
            issues.push(&sd.name, format!("duplicate field `{}`", field.name));
        }
    }
}

fn validate_resource(rd: &ResourceDefinition, issues: &mut Issues) {
    match rd.kind {
        ShaderResourceKind::Other(raw) => {
            issues.push(&rd.name, format!("unknown resource kind {raw}"));
        }
        ShaderResourceKind::Uniform
        | ShaderResourceKind::StructuredBuffer
        | ShaderResourceKind::RWStructuredBuffer
            if rd.value_type.is_none() =>
        {
            issues.push(&rd.name, format!("{} resource has no value type", rd.kind));
        }
        _ => {}
    }
}

fn validate_function(unit: &CompilationUnit, f: &ShaderFunction, issues: &mut Issues) {
    match f.function_type {
        ShaderFunctionType::Normal => {}
        ShaderFunctionType::VertexEntryPoint => {
            expect_single_parameter(f, issues);
            if let Some(out) = unit.structures.get(f.return_type.name()) {
                match out.position_fields().count() {
                    0 => issues.push(
                        &f.name,
                        format!("output structure `{}` has no position field", out.name),
                    ),
                    1 => {}
                    n => issues.push(
                        &f.name,
                        format!(
                            "output structure `{}` has {n} position fields; only the first is used",
                            out.name
                        ),
                    ),
                }
            }
        }
        ShaderFunctionType::FragmentEntryPoint => {
            expect_single_parameter(f, issues);
            if f.return_type.name() != known::VECTOR4 || f.return_type.is_array() {
                issues.push(
                    &f.name,
                    format!("fragment entry returns `{}`, expected `{}`", f.return_type, known::VECTOR4),
                );
            }
        }
        ShaderFunctionType::ComputeEntryPoint => {
            if !f.parameters.is_empty() {
                issues.push(&f.name, "compute entry takes no parameters".to_owned());
            }
            for (i, &size) in f.workgroup_size.iter().enumerate() {
                if size == 0 {
                    issues.push(&f.name, format!("workgroup_size[{i}] = 0"));
                }
            }
        }
    }
}

fn expect_single_parameter(f: &ShaderFunction, issues: &mut Issues) {
    if f.parameters.len() != 1 {
        issues.push(
            &f.name,
            format!(
                "{} entry takes exactly one parameter, found {}",
                f.function_type,
                f.parameters.len()
            ),
        );
    }
}
