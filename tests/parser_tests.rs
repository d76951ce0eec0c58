//! Tests for the parser and canonical rendering

use monkey::{parse, Expression, Identifier, InfixOp, Node, Parser, PrefixOp, Statement};

fn parse_ok(source: &str) -> monkey::Program {
    let (program, errors) = parse(source);
    assert!(errors.is_empty(), "errors for {:?}: {:?}", source, errors);
    program
}

#[test]
fn test_operator_precedence() {
    assert_eq!(parse_ok("-a * b").render(), "((-a) * b)");
    assert_eq!(
        parse_ok("a + b * c + d / e - f").render(),
        "(((a + (b * c)) + (d / e)) - f)"
    );
}

#[test]
fn test_precedence_table() {
    let cases = [
        ("a + b - c", "((a + b) - c)"),
        ("a * b * c", "((a * b) * c)"),
        ("a + b / c", "(a + (b / c))"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
        ("true", "true"),
        ("3 > 5 == false", "((3 > 5) == false)"),
        ("2 / (5 + 5)", "(2 / (5 + 5))"),
        ("-a * b + c", "(((-a) * b) + c)"),
    ];
    for (input, expected) in cases {
        assert_eq!(parse_ok(input).to_string(), expected, "input: {}", input);
    }
}

#[test]
fn test_prefix_and_infix_nodes() {
    let program = parse_ok("!5; 5 * 5;");
    assert_eq!(
        program.statements[0],
        Statement::Expression(Expression::Prefix {
            operator: PrefixOp::Bang,
            right: Box::new(Expression::IntegerLiteral(5)),
        })
    );
    assert_eq!(
        program.statements[1],
        Statement::Expression(Expression::Infix {
            operator: InfixOp::Asterisk,
            left: Box::new(Expression::IntegerLiteral(5)),
            right: Box::new(Expression::IntegerLiteral(5)),
        })
    );
}

#[test]
fn test_call_on_function_literal() {
    let program = parse_ok("fn(x) { x + 10; }(5)");
    match &program.statements[0] {
        Statement::Expression(Expression::Call {
            function,
            arguments,
        }) => {
            assert!(matches!(**function, Expression::FunctionLiteral { .. }));
            assert_eq!(arguments, &vec![Expression::IntegerLiteral(5)]);
        }
        other => panic!("expected call expression, got {:?}", other),
    }
}

#[test]
fn test_token_literals() {
    let program = parse_ok("let x = 5; return x; add(1); if (x) { 1 }; fn() { };");
    let literals: Vec<String> = program.statements.iter().map(|s| s.token_literal()).collect();
    assert_eq!(literals, vec!["let", "return", "(", "if", "fn"]);
    assert_eq!(program.token_literal(), "let");
    assert_eq!(Identifier::new("abc").token_literal(), "abc");
}

#[test]
fn test_render_reparses_to_same_rendering() {
    let sources = [
        "let a = 5; let b = a; b;",
        "let add = fn(x, y) { x + y; }; add(1, 2 * 3);",
        "if (a < b) { return a; } else { b }",
        "let f = fn() { return; }; f()",
        "a; b; c",
        "\"hello\" + \" \" + \"world\"",
        "fn(x) { fn(y) { x + y } }(1)(2)",
        "!-a == --b",
    ];

    for source in sources {
        let first = parse_ok(source).render();
        let second = parse_ok(&first).render();
        assert_eq!(first, second, "source: {}", source);
    }
}

#[test]
fn test_errors_have_no_panics_and_are_ordered() {
    let mut parser = Parser::from_source("let = 1; let y 2; ) ; let z = 3;");
    let program = parser.parse_program();
    assert_eq!(
        parser.error_messages(),
        vec![
            "expected next token to be IDENT, got = instead",
            "expected next token to be =, got INT instead",
            "no prefix parse function for ) found",
        ]
    );
    // Only the well-formed statement survives.
    assert_eq!(program.statements.len(), 1);
    assert_eq!(program.to_string(), "let z = 3;");
}

#[test]
fn test_program_serializes_to_json() {
    let program = parse_ok("let x = 1;");
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json["statements"][0]["Let"]["name"]["name"], "x");
    assert_eq!(json["statements"][0]["Let"]["value"]["IntegerLiteral"], 1);
}

#[test]
fn test_deeply_nested_groups() {
    let depth = 10_000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(parse_ok(&source).render(), "1");
}

#[test]
fn test_unclosed_groups_report_one_error() {
    let (program, errors) = parse(&"(".repeat(100_000));
    assert!(program.statements.is_empty());
    assert_eq!(
        errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec!["no prefix parse function for EOF found"]
    );
}

#[test]
fn test_deep_prefix_chain_renders_and_serializes() {
    let depth = 20_000;
    let program = parse_ok(&format!("{}x", "-".repeat(depth)));

    let rendered = program.render();
    assert!(rendered.starts_with("(-(-"));
    assert_eq!(rendered.len(), depth * 3 + 1);
    assert_eq!(parse_ok(&rendered).render(), rendered);

    let cloned = program.clone();
    assert!(serde_json::to_string(&cloned).is_ok());
}

#[test]
fn test_deeply_nested_blocks() {
    let depth = 5_000;
    let source = format!("{}1{}", "if (x) { ".repeat(depth), " }".repeat(depth));
    let program = parse_ok(&source);
    assert_eq!(program.render(), format!("{}1{}", "if (x) { ".repeat(depth), " }".repeat(depth)));
}

#[test]
fn test_long_operator_chain() {
    let source = vec!["a"; 20_000].join(" + ");
    let rendered = parse_ok(&source).render();
    assert!(rendered.starts_with(&"(".repeat(19_999)));
    assert!(rendered.ends_with("+ a)"));
}
