// Integration tests for the shader parser

use wgsl_parse::*;

fn function_body(decls: &[Declaration]) -> &[Statement] {
    match &decls[0] {
        Declaration::Function(decl) => &decl.body,
        other => panic!("Expected function, got {:?}", other),
    }
}

#[test]
fn test_empty_module() {
    assert_eq!(parse("").unwrap().len(), 0);
    assert_eq!(parse_optional(None).unwrap().len(), 0);
    assert_eq!(parse_tokens(Vec::new()).unwrap().len(), 0);
    assert_eq!(parse(";;;;").unwrap().len(), 0);
}

#[test]
fn test_enable() {
    let decls = parse("enable foo;").expect("Parsing failed");
    assert!(matches!(&decls[0], Declaration::Enable { name, .. } if name == "foo"));
}

#[test]
fn test_alias_forms() {
    let decls = parse("alias foo = i32;").expect("Parsing failed");
    match &decls[0] {
        Declaration::Alias { name, ty, .. } => {
            assert_eq!(name, "foo");
            assert_eq!(ty.name, "i32");
        }
        other => panic!("Expected alias, got {:?}", other),
    }

    let decls = parse("alias foo = vec3<f32>;").expect("Parsing failed");
    match &decls[0] {
        Declaration::Alias { ty, .. } => {
            assert_eq!(ty.name, "vec3");
            assert_eq!(ty.format.as_ref().unwrap().name, "f32");
        }
        other => panic!("Expected alias, got {:?}", other),
    }

    let decls = parse("alias foo = array<f32, 5>;").expect("Parsing failed");
    match &decls[0] {
        Declaration::Alias { ty, .. } => {
            assert_eq!(ty.name, "array");
            assert_eq!(ty.format.as_ref().unwrap().name, "f32");
            assert_eq!(ty.count_literal(), Some("5"));
        }
        other => panic!("Expected alias, got {:?}", other),
    }

    assert_eq!(
        parse("alias foo = @stride(16) array<vec4<f32>>;").unwrap().len(),
        1
    );
}

#[test]
fn test_module_variables() {
    assert_eq!(parse("var<private> decibels: f32;").unwrap().len(), 1);
    assert_eq!(
        parse("var<workgroup> worklist: array<i32,10>;").unwrap().len(),
        1
    );
    assert_eq!(
        parse("@group(0) @binding(2) var<uniform> param: Params;")
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        parse("var W_out_origX0X : texture_storage_2d<rgba16float, write>;")
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_binding_attributes() {
    let decls = parse("@group(0) @binding(0) var<storage,read_write> pbuf: PositionsBuffer;")
        .expect("Parsing failed");

    match &decls[0] {
        Declaration::Variable(decl) => {
            assert_eq!(decl.kind, VariableKind::Var);
            assert_eq!(decl.name, "pbuf");
            assert_eq!(decl.attributes.len(), 2);
            assert_eq!(decl.attributes[0].name, "group");
            assert_eq!(decl.attributes[0].value(), Some("0"));
            assert_eq!(decl.attributes[1].name, "binding");
            assert_eq!(decl.attributes[1].value(), Some("0"));
            assert_eq!(
                find_attribute(&decl.attributes, "binding").and_then(|a| a.value()),
                Some("0")
            );
        }
        other => panic!("Expected variable, got {:?}", other),
    }
}

#[test]
fn test_let_keeps_literal_text() {
    let decls = parse("let golden: f32 = 1.61803398875;").expect("Parsing failed");
    match &decls[0] {
        Declaration::Variable(decl) => {
            assert_eq!(decl.kind, VariableKind::Let);
            assert_eq!(decl.name, "golden");
            assert_eq!(decl.ty.as_ref().unwrap().name, "f32");
            match decl.initializer.as_ref().unwrap() {
                Expression::Literal { value, kind, .. } => {
                    assert_eq!(value, "1.61803398875");
                    assert_eq!(*kind, LiteralKind::AbstractFloat);
                }
                other => panic!("Expected literal, got {:?}", other),
            }
        }
        other => panic!("Expected let, got {:?}", other),
    }
}

#[test]
fn test_let_with_templated_constructor() {
    let decls = parse("let e2 = vec3<i32>(0,1,0);").expect("Parsing failed");
    match &decls[0] {
        Declaration::Variable(decl) => {
            assert_eq!(decl.name, "e2");
            assert!(decl.ty.is_none());
            match decl.initializer.as_ref().unwrap() {
                Expression::Construct { ty, args, .. } => {
                    assert_eq!(ty.name, "vec3");
                    assert_eq!(ty.format.as_ref().unwrap().name, "i32");
                    assert_eq!(args.len(), 3);
                }
                other => panic!("Expected constructor, got {:?}", other),
            }
        }
        other => panic!("Expected let, got {:?}", other),
    }
}

#[test]
fn test_struct_with_trailing_comma() {
    let source = r#"
struct S {
    @offset(0) a: f32,
    b: f32,
    data: RTArr,
}"#;
    let decls = parse(source).expect("Parsing failed");
    assert_eq!(decls.len(), 1);
    match &decls[0] {
        Declaration::Struct(decl) => assert_eq!(decl.members.len(), 3),
        other => panic!("Expected struct, got {:?}", other),
    }
}

#[test]
fn test_functions() {
    let decls = parse("let x : i32 = 42;").expect("Parsing failed");
    assert!(matches!(&decls[0], Declaration::Variable(decl) if decl.name == "x"));

    assert_eq!(parse("fn it() { let x : i32 = 42; }").unwrap().len(), 1);

    let decls = parse("@vertex fn vert_main() -> @builtin(position) vec4<f32> {}")
        .expect("Parsing failed");
    match &decls[0] {
        Declaration::Function(decl) => {
            assert_eq!(decl.attributes[0].name, "vertex");
            assert_eq!(decl.return_attributes[0].value(), Some("position"));
        }
        other => panic!("Expected function, got {:?}", other),
    }

    let decls = parse("fn foo (a:i32,) {}").expect("Parsing failed");
    match &decls[0] {
        Declaration::Function(decl) => assert_eq!(decl.params.len(), 1),
        other => panic!("Expected function, got {:?}", other),
    }
}

#[test]
fn test_if_and_switch() {
    assert_eq!(parse("fn it() { if (foo) { } }").unwrap().len(), 1);
    assert_eq!(parse("fn it() { if foo { } }").unwrap().len(), 1);

    let decls = parse("fn it() { switch foo { case 0: {} default: {} } }").expect("Parsing failed");
    match &function_body(&decls)[0] {
        Statement::Switch { clauses, .. } => {
            assert_eq!(clauses.len(), 2);
            assert!(matches!(clauses[0], SwitchClause::Case { .. }));
            assert!(matches!(clauses[1], SwitchClause::Default { .. }));
        }
        other => panic!("Expected switch, got {:?}", other),
    }

    assert_eq!(
        parse("fn it() { switch foo { default: { } } }").unwrap().len(),
        1
    );
}

#[test]
fn test_assignment_operators() {
    let decls = parse(
        r#"fn foo() {
            var b = 1;
            b+=1;
            b-=1;
            b*=1;
            b/=1;
            b&=1;
            b|=1;
            b^=1;
            b>>=1;
            b<<=1;
            b++;
            b--;
        }"#,
    )
    .expect("Parsing failed");

    let body = function_body(&decls);
    assert_eq!(body.len(), 12);
    assert!(matches!(body[0], Statement::Declaration(_)));
    assert!(matches!(body[8], Statement::Assign { op: AssignOp::Shr, .. }));
    assert!(matches!(body[11], Statement::Increment { op: IncrementOp::Decrement, .. }));
}

#[test]
fn test_static_assert_in_function() {
    let decls = parse(
        r#"fn foo() {
            const x = 1;
            const y = 2;
            static_assert x < y; // valid at module-scope.
            static_assert(y != 0); // parentheses are optional.
        }"#,
    )
    .expect("Parsing failed");

    let body = function_body(&decls);
    assert_eq!(body.len(), 4);
    assert!(matches!(body[2], Statement::StaticAssert { .. }));
}

#[test]
fn test_for_incrementers() {
    let decls = parse(
        r#"fn foo() {
            for (var i = 0; i < 10; i++) {
            }

            for (var i = 0; i < 10; i += 5) {
            }

            for (var i = 0; i < 10; i = 20) {
            }

            for (var i = 0; i < 10; f(i)) {
            }
        }"#,
    )
    .expect("Parsing failed");

    let body = function_body(&decls);
    assert_eq!(body.len(), 4);

    let increments: Vec<&Statement> = body
        .iter()
        .map(|stmt| match stmt {
            Statement::For { increment, .. } => increment.as_deref().unwrap(),
            other => panic!("Expected for, got {:?}", other),
        })
        .collect();

    assert!(matches!(increments[0], Statement::Increment { .. }));
    assert!(matches!(increments[1], Statement::Assign { op: AssignOp::Add, .. }));
    assert!(matches!(increments[2], Statement::Assign { op: AssignOp::Assign, .. }));
    assert!(matches!(increments[3], Statement::Call { callee, .. } if callee == "f"));
}

#[test]
fn test_inferred_type_arrays() {
    let decls = parse(
        r#"
        @vertex fn vs(@builtin(vertex_index) vertexIndex : u32) -> @builtin(position) vec4f {
        let pos = array(
          vec2f( 0.0,  0.5),  // top center
          vec2f(-0.5, -0.5),  // bottom left
          vec2f( 0.5, -0.5)   // bottom right
        );

        return vec4f(pos[vertexIndex], 0.0, 1.0);
      }"#,
    )
    .expect("Parsing failed");

    let body = function_body(&decls);
    assert_eq!(body.len(), 2);
    match &body[0] {
        Statement::Declaration(decl) => match decl.initializer.as_ref().unwrap() {
            Expression::Construct { ty, args, .. } => {
                assert_eq!(ty.name, "array");
                assert!(ty.format.is_none());
                assert_eq!(args.len(), 3);
            }
            other => panic!("Expected constructor, got {:?}", other),
        },
        other => panic!("Expected let, got {:?}", other),
    }
}

#[test]
fn test_else_if_counts() {
    let decls = parse("fn test() { if (foo < 0.33333) { } else if foo < 0.66667 {} else {} }")
        .expect("Parsing failed");
    match &function_body(&decls)[0] {
        Statement::If { else_if, .. } => assert_eq!(else_if.len(), 1),
        other => panic!("Expected if, got {:?}", other),
    }

    let decls = parse(
        "fn test() { if (foo < 0.33333) { } else if foo < 0.66667 {}  else if (foo < 0.86667) {} else {} }",
    )
    .expect("Parsing failed");
    match &function_body(&decls)[0] {
        Statement::If { else_if, .. } => assert_eq!(else_if.len(), 2),
        other => panic!("Expected if, got {:?}", other),
    }
}

#[test]
fn test_compute_shader() {
    let source = r#"
enable f16;

struct Particle {
    pos: vec2<f32>,
    vel: vec2<f32>,
}

struct SimParams {
    deltaT: f32,
    rule1Distance: f32,
}

@binding(0) @group(0) var<uniform> params: SimParams;
@binding(1) @group(0) var<storage, read> particlesA: array<Particle>;
@binding(2) @group(0) var<storage, read_write> particlesB: array<Particle>;

override blockSize: u32 = 64;
const_assert blockSize > 0;

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) GlobalInvocationID: vec3<u32>) {
    var index = GlobalInvocationID.x;
    if (index >= arrayLength(&particlesA)) {
        return;
    }

    var vPos = particlesA[index].pos;
    var cMass = vec2(0.0);
    var cMassCount = 0u;
    var i = 0u;
    loop {
        if i >= arrayLength(&particlesA) { break; }
        if (i == index) {
            continue;
        }
        let pos = particlesA[i].pos;
        if (distance(pos, vPos) < params.rule1Distance) {
            cMass += pos;
            cMassCount++;
        }
        continuing {
            i = i + 1u;
            break if i > 1024u;
        }
    }

    if (cMassCount > 0u) {
        cMass = (cMass / vec2(f32(cMassCount))) - vPos;
    }

    let mask = (index >> 2u) & 0xFFu;
    particlesB[index].pos = vPos + cMass * params.deltaT;
    _ = mask;
}
"#;

    let decls = parse(source).expect("Parsing failed");
    let kinds: Vec<&str> = decls.iter().map(|d| d.kind_name()).collect();
    assert_eq!(
        kinds,
        vec![
            "enable",
            "struct",
            "struct",
            "var",
            "var",
            "var",
            "override",
            "static_assert",
            "function",
        ]
    );

    match decls.last().unwrap() {
        Declaration::Function(decl) => {
            assert_eq!(decl.name, "main");
            let attrs = index_attributes(&decl.attributes);
            assert!(attrs.contains_key("compute"));
            assert_eq!(attrs["workgroup_size"][0].value(), Some("64"));
        }
        other => panic!("Expected function, got {:?}", other),
    }
}

#[test]
fn test_preserve_parentheses_option() {
    let source = "const x = (1 + 2) * 3;";

    let plain = parse(source).unwrap();
    let grouped = parse_with_options(source, ParseOptions::new().with_preserved_parentheses()).unwrap();
    assert_ne!(plain, grouped);

    fn left(decls: &[Declaration]) -> Expression {
        match &decls[0] {
            Declaration::Variable(decl) => match decl.initializer.clone().unwrap() {
                Expression::Binary { left, .. } => *left,
                other => panic!("Expected binary, got {:?}", other),
            },
            other => panic!("Expected const, got {:?}", other),
        }
    }

    assert!(matches!(left(&plain), Expression::Binary { op: BinaryOp::Add, .. }));
    assert!(matches!(left(&grouped), Expression::Grouped { .. }));
    assert_eq!(left(&grouped).ungrouped(), left(&plain));
}

#[test]
fn test_condition_parentheses_are_transparent() {
    let options = ParseOptions::new().with_preserved_parentheses();
    let with = parse_with_options("fn f() { if (a) {} }", options).unwrap();
    let without = parse_with_options("fn f() { if a {} }", options).unwrap();

    match (&function_body(&with)[0], &function_body(&without)[0]) {
        (Statement::If { condition: a, .. }, Statement::If { condition: b, .. }) => {
            assert!(matches!(a, Expression::Identifier { name, .. } if name == "a"));
            assert!(matches!(b, Expression::Identifier { name, .. } if name == "a"));
        }
        other => panic!("Expected if statements, got {:?}", other),
    }
}

#[test]
fn test_errors_report_location() {
    let err = parse("fn f() {\n  let x = ;\n}").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
    assert_eq!(err.location(), SourceLocation::new(2, 11));

    let err = parse("fn f() { let x = 1 # 2; }").unwrap_err();
    assert!(matches!(err, ParseError::Lexical { .. }));

    let err = parse("fn f() { if (a) {").unwrap_err();
    assert!(err.to_string().contains("end of file"));
}

#[test]
fn test_incomplete_numbers_are_lexical_errors() {
    for source in ["fn f() { let a = 0x; }", "fn f() { let a = 1e; }"] {
        let err = parse(source).unwrap_err();
        assert!(
            matches!(err, ParseError::Lexical { .. }),
            "Expected lexical error for {:?}, got {:?}",
            source,
            err
        );
        assert_eq!(err.location(), SourceLocation::new(1, 18));
    }
}

#[test]
fn test_shifted_array_count_in_constructor() {
    let decls = parse("fn f() { let a = array<f32, 1 << 2>(); }").expect("Parsing failed");
    match &function_body(&decls)[0] {
        Statement::Declaration(decl) => match decl.initializer.as_ref().unwrap() {
            Expression::Construct { ty, .. } => assert!(matches!(
                ty.count.as_deref(),
                Some(Expression::Binary { op: BinaryOp::Shl, .. })
            )),
            other => panic!("Expected constructor, got {:?}", other),
        },
        other => panic!("Expected let, got {:?}", other),
    }

    assert_eq!(parse("var<private> w: array<u32, N & 3>;").unwrap().len(), 1);
}

#[test]
fn test_diagnostic_attribute_on_if() {
    let decls = parse("fn f() { @diagnostic(off, derivative_uniformity) if a {} }")
        .expect("Parsing failed");
    let body = function_body(&decls);
    assert!(matches!(body[0], Statement::If { .. }));
    let attrs = index_attributes(body[0].attributes());
    assert_eq!(attrs["diagnostic"][0].arguments.len(), 2);
}

#[test]
fn test_enable_extension_list() {
    let decls = parse("enable f16, subgroups;").expect("Parsing failed");
    match &decls[0] {
        Declaration::Enable { name, additional, .. } => {
            assert_eq!(name, "f16");
            assert_eq!(additional, &vec!["subgroups".to_string()]);
        }
        other => panic!("Expected enable, got {:?}", other),
    }
}
