use shadegen::{BackendKind, BackendOptions, GeneratedShader, GenerationError};
use shadegen_ir::{
    AssignOp, BinaryOp, CompilationUnit, Expression, FieldDefinition, NoSymbols, ResourceDefinition,
    SemanticType, ShaderFunction, ShaderFunctionAndBody, ShaderFunctionType, ShaderResourceKind,
    Statement, StatementKind, StructureDefinition, SymbolTable, UnaryOp, known,
};

/// Generate with default options and no front-end symbols.
#[allow(dead_code)]
pub fn generate(unit: &CompilationUnit, entry: &str, kind: BackendKind) -> Result<GeneratedShader, GenerationError> {
    shadegen::generate(unit, &NoSymbols, entry, kind, &BackendOptions::default())
}

/// Generate and return the text, panicking on failure.
#[allow(dead_code)]
pub fn text(unit: &CompilationUnit, entry: &str, kind: BackendKind) -> String {
    generate(unit, entry, kind)
        .unwrap_or_else(|e| panic!("`{entry}` on {kind} failed: {e}"))
        .text
}

fn declare(name: &str, ty: &str, line: u32) -> Statement {
    Statement::at(
        line,
        9,
        StatementKind::VariableDeclaration {
            name: name.into(),
            ty: ty.into(),
            array_length: 0,
            init: None,
        },
    )
}

fn assign(target: Expression, value: Expression, line: u32) -> Statement {
    Statement::at(
        line,
        9,
        StatementKind::Assign {
            target,
            op: AssignOp::Assign,
            value,
        },
    )
}

fn ret(value: Expression, line: u32) -> Statement {
    Statement::at(line, 9, StatementKind::Return(Some(value)))
}

fn textured_structures() -> [StructureDefinition; 2] {
    [
        StructureDefinition::new(
            "Demo.VertexInput",
            vec![
                FieldDefinition::new("Position", known::VECTOR3),
                FieldDefinition::new("TexCoord", known::VECTOR2),
            ],
        ),
        StructureDefinition::new(
            "Demo.FragmentInput",
            vec![
                FieldDefinition::new("Position", known::VECTOR4).with_semantic(SemanticType::Position),
                FieldDefinition::new("TexCoord", known::VECTOR2)
                    .with_semantic(SemanticType::TextureCoordinate),
            ],
        ),
    ]
}

/// A textured quad: `VS` transforms by a uniform matrix, `FS` samples a
/// texture and tints it through a helper function.
#[allow(dead_code)]
pub fn textured() -> CompilationUnit {
    let mut unit = CompilationUnit::new();
    for structure in textured_structures() {
        unit.add_structure(structure).unwrap();
    }
    add_textured_program(&mut unit);
    unit
}

/// [`textured`] with its structures left to discovery.
#[allow(dead_code)]
pub fn textured_discovered() -> (CompilationUnit, SymbolTable) {
    let mut unit = CompilationUnit::new();
    add_textured_program(&mut unit);
    let mut symbols = SymbolTable::new();
    for structure in textured_structures() {
        symbols.declare_structure(structure);
    }
    (unit, symbols)
}

fn add_textured_program(unit: &mut CompilationUnit) {
    unit.add_resource(ResourceDefinition::uniform("WorldViewProjection", known::MATRIX4X4, 0))
        .unwrap();
    unit.add_resource(ResourceDefinition::uniform("Tint", known::VECTOR4, 1))
        .unwrap();
    unit.add_resource(ResourceDefinition::new("Albedo", ShaderResourceKind::Texture2D, 2))
        .unwrap();
    unit.add_resource(ResourceDefinition::new("Linear", ShaderResourceKind::Sampler, 3))
        .unwrap();

    let input = || Expression::local("input");
    let output = || Expression::local("output");
    let vs = ShaderFunction::new("VS", "Demo.FragmentInput", ShaderFunctionType::VertexEntryPoint)
        .with_parameter("input", "Demo.VertexInput");
    let vs_body = vec![
        declare("output", "Demo.FragmentInput", 20),
        assign(
            Expression::member(output(), "Demo.FragmentInput", "Position"),
            Expression::call(
                "Shadegen.ShaderBuiltins.Mul",
                vec![
                    Expression::resource("WorldViewProjection"),
                    Expression::construct(
                        known::VECTOR4,
                        vec![
                            Expression::member(input(), "Demo.VertexInput", "Position"),
                            Expression::float(1.0),
                        ],
                    ),
                ],
            ),
            21,
        ),
        assign(
            Expression::member(output(), "Demo.FragmentInput", "TexCoord"),
            Expression::member(input(), "Demo.VertexInput", "TexCoord"),
            22,
        ),
        ret(output(), 23),
    ];
    unit.add_function(ShaderFunctionAndBody::new(vs, vs_body)).unwrap();

    let tinted = ShaderFunction::new("Tinted", known::VECTOR4, ShaderFunctionType::Normal)
        .with_parameter("color", known::VECTOR4);
    let tinted_body = vec![ret(
        Expression::binary(
            BinaryOp::Multiply,
            Expression::local("color"),
            Expression::resource("Tint"),
        ),
        30,
    )];
    unit.add_function(ShaderFunctionAndBody::new(tinted, tinted_body)).unwrap();

    let fs = ShaderFunction::new("FS", known::VECTOR4, ShaderFunctionType::FragmentEntryPoint)
        .with_parameter("input", "Demo.FragmentInput");
    let sample = Expression::call(
        "Shadegen.ShaderBuiltins.Sample",
        vec![
            Expression::resource("Albedo"),
            Expression::resource("Linear"),
            Expression::member(input(), "Demo.FragmentInput", "TexCoord"),
        ],
    );
    let fs_body = vec![ret(Expression::call("Tinted", vec![sample]), 36)];
    unit.add_function(ShaderFunctionAndBody::new(fs, fs_body)).unwrap();
}

/// A vertex entry `VS(Demo.In) -> Demo.Out` where `Demo.Out` has `outputs`.
#[allow(dead_code)]
pub fn vertex_outputs(outputs: Vec<FieldDefinition>) -> CompilationUnit {
    let mut unit = CompilationUnit::new();
    unit.add_structure(StructureDefinition::new(
        "Demo.In",
        vec![
            FieldDefinition::new("Position", known::VECTOR3),
            FieldDefinition::new("Color", known::VECTOR4),
        ],
    ))
    .unwrap();
    unit.add_structure(StructureDefinition::new("Demo.Out", outputs)).unwrap();
    let vs = ShaderFunction::new("VS", "Demo.Out", ShaderFunctionType::VertexEntryPoint)
        .with_parameter("input", "Demo.In");
    let body = vec![declare("result", "Demo.Out", 8), ret(Expression::local("result"), 9)];
    unit.add_function(ShaderFunctionAndBody::new(vs, body)).unwrap();
    unit
}

/// A `Vector4` field carrying `semantic`.
#[allow(dead_code)]
pub fn varying(name: &str, semantic: SemanticType) -> FieldDefinition {
    FieldDefinition::new(name, known::VECTOR4).with_semantic(semantic)
}

/// A fragment entry reading a field literally named `input`.
#[allow(dead_code)]
pub fn keyword_field() -> CompilationUnit {
    let mut unit = CompilationUnit::new();
    unit.add_structure(StructureDefinition::new(
        "Demo.Surface",
        vec![FieldDefinition::new("input", known::VECTOR4)],
    ))
    .unwrap();
    let fs = ShaderFunction::new("FS", known::VECTOR4, ShaderFunctionType::FragmentEntryPoint)
        .with_parameter("s", "Demo.Surface");
    let body = vec![ret(
        Expression::member(Expression::local("s"), "Demo.Surface", "input"),
        5,
    )];
    unit.add_function(ShaderFunctionAndBody::new(fs, body)).unwrap();
    unit
}

/// A compute entry doubling a read-only buffer into a writable one.
#[allow(dead_code)]
pub fn doubling() -> CompilationUnit {
    let mut unit = CompilationUnit::new();
    unit.add_resource(
        ResourceDefinition::new("Source", ShaderResourceKind::StructuredBuffer, 0)
            .with_value_type(known::FLOAT),
    )
    .unwrap();
    unit.add_resource(
        ResourceDefinition::new("Target", ShaderResourceKind::RWStructuredBuffer, 1)
            .with_value_type(known::FLOAT),
    )
    .unwrap();
    let mut cs = ShaderFunction::new("Double", known::VOID, ShaderFunctionType::ComputeEntryPoint);
    cs.workgroup_size = [64, 1, 1];
    let body = vec![assign(
        Expression::index(Expression::resource("Target"), Expression::int(0)),
        Expression::binary(
            BinaryOp::Multiply,
            Expression::index(Expression::resource("Source"), Expression::int(0)),
            Expression::float(2.0),
        ),
        4,
    )];
    unit.add_function(ShaderFunctionAndBody::new(cs, body)).unwrap();
    unit
}

/// A fragment entry negating a negative literal and taking remainders of
/// negative floats through both `Mod` and `%`.
#[allow(dead_code)]
pub fn remainders() -> CompilationUnit {
    let mut unit = CompilationUnit::new();
    unit.add_structure(StructureDefinition::new(
        "Demo.Surface",
        vec![FieldDefinition::new("Value", known::FLOAT)],
    ))
    .unwrap();
    let fs = ShaderFunction::new("FS", known::VECTOR4, ShaderFunctionType::FragmentEntryPoint)
        .with_parameter("s", "Demo.Surface");
    let x = || Expression::local("x");
    let body = vec![
        Statement::at(
            4,
            9,
            StatementKind::VariableDeclaration {
                name: "x".into(),
                ty: known::FLOAT.into(),
                array_length: 0,
                init: Some(Expression::member(Expression::local("s"), "Demo.Surface", "Value")),
            },
        ),
        ret(
            Expression::construct(
                known::VECTOR4,
                vec![
                    Expression::unary(UnaryOp::Negate, Expression::float(-2.0)),
                    Expression::call("Shadegen.ShaderBuiltins.Mod", vec![x(), Expression::float(-3.0)]),
                    Expression::binary(BinaryOp::Modulo, x(), Expression::float(2.0)),
                    Expression::float(1.0),
                ],
            ),
            5,
        ),
    ];
    unit.add_function(ShaderFunctionAndBody::new(fs, body)).unwrap();
    unit
}
