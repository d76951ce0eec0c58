//! End-to-end tests: source text through lexer, parser and evaluator

use monkey::{
    eval, parse, run, Environment, Error, EvalConfig, Evaluator, Expression, RuntimeError,
    Statement, Value,
};

fn eval_monkey(source: &str) -> Value {
    let (program, errors) = parse(source);
    assert!(errors.is_empty(), "errors for {:?}: {:?}", source, errors);
    let env = Environment::new().into_shared();
    eval(&program, &env)
}

#[test]
fn test_let_bindings() {
    assert_eq!(eval_monkey("let a = 5; let b = a; b;"), Value::Integer(5));
    assert_eq!(
        eval_monkey("let a = 5; let b = a; let c = a + b + 5; c;"),
        Value::Integer(15)
    );
    assert_eq!(eval_monkey("let a = 5;"), Value::Null);
}

#[test]
fn test_immediate_call() {
    assert_eq!(eval_monkey("fn(x) { x + 10; }(5)"), Value::Integer(15));
    assert_eq!(
        eval_monkey("let add = fn(a, b) { a + b }; add(5 + 5, add(5, 5));"),
        Value::Integer(20)
    );
}

#[test]
fn test_closure_outlives_defining_call() {
    let source = "
        let makeCounter = fn(start) { fn(step) { start + step } };
        let fromTen = makeCounter(10);
        let fromHundred = makeCounter(100);
        fromTen(1) + fromHundred(2);
    ";
    assert_eq!(eval_monkey(source), Value::Integer(113));
}

#[test]
fn test_closure_captures_by_reference() {
    // Bindings added to the defining scope after the closure is created are visible.
    let source = "
        let getLater = fn() { later };
        let later = 42;
        getLater();
    ";
    assert_eq!(eval_monkey(source), Value::Integer(42));

    let source = "
        let x = 1;
        let getX = fn() { x };
        let x = 2;
        getX();
    ";
    assert_eq!(eval_monkey(source), Value::Integer(2));
}

#[test]
fn test_parameters_shadow_outer_bindings() {
    let source = "
        let x = 10;
        let f = fn(x) { let y = x * 2; y };
        f(3) + x;
    ";
    assert_eq!(eval_monkey(source), Value::Integer(16));

    // Binding inside a call does not leak into the global scope.
    let env = Environment::new().into_shared();
    let (program, _) = parse("let f = fn() { let inner = 1; inner }; f();");
    assert_eq!(eval(&program, &env), Value::Integer(1));
    assert!(!env.borrow().exists("inner"));
}

#[test]
fn test_return_does_not_escape_call() {
    let source = "
        let f = fn() { return 1; 2 };
        f() + 10;
    ";
    assert_eq!(eval_monkey(source), Value::Integer(11));
}

#[test]
fn test_recursion() {
    let source = "
        let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } };
        fib(15);
    ";
    assert_eq!(eval_monkey(source), Value::Integer(610));
}

#[test]
fn test_if_expressions() {
    assert_eq!(eval_monkey("if (false) { 10 }"), Value::Null);
    assert_eq!(eval_monkey("if (true) { 10 } else { 20 }"), Value::Integer(10));
    assert_eq!(eval_monkey("if (1 < 2) { 10 }"), Value::Integer(10));
    assert_eq!(eval_monkey("if (if (false) { 1 }) { 10 } else { 20 }"), Value::Integer(20));
}

#[test]
fn test_strings() {
    assert_eq!(
        eval_monkey(r#""Hello" + " " + "World!""#),
        Value::String("Hello World!".to_string())
    );
    assert_eq!(eval_monkey(r#""a" == "a""#), Value::Boolean(true));
    assert_eq!(eval_monkey(r#""a" != "a""#), Value::Boolean(false));
}

#[test]
fn test_runtime_errors() {
    assert_eq!(
        eval_monkey("5 + true;"),
        Value::Error(RuntimeError::TypeMismatch {
            left: "INTEGER",
            op: "+".to_string(),
            right: "BOOLEAN",
        })
    );
    assert_eq!(
        eval_monkey("foobar;"),
        Value::Error(RuntimeError::IdentifierNotFound("foobar".to_string()))
    );
    assert_eq!(
        eval_monkey("5 == true").to_string(),
        "ERROR: type mismatch: INTEGER == BOOLEAN"
    );
}

#[test]
fn test_error_stops_program() {
    let env = Environment::new().into_shared();
    let (program, _) = parse("let a = 1; let b = missing; let c = 3;");
    assert!(eval(&program, &env).is_error());
    assert!(env.borrow().exists("a"));
    assert!(!env.borrow().exists("b"));
    assert!(!env.borrow().exists("c"));
}

#[test]
fn test_argument_error_stops_call() {
    let source = "let f = fn(a, b) { a }; f(1, nope, undefined_too)";
    assert_eq!(
        eval_monkey(source).to_string(),
        "ERROR: identifier not found: nope"
    );
}

#[test]
fn test_arity_mismatch() {
    assert_eq!(
        eval_monkey("fn(a, b) { a }(1)").to_string(),
        "ERROR: wrong number of arguments: want=2, got=1"
    );
}

#[test]
fn test_environment_persists_across_evaluations() {
    let env = Environment::new().into_shared();
    let mut evaluator = Evaluator::new();
    for line in ["let x = 3;", "let double = fn(n) { n * 2 };"] {
        let (program, _) = parse(line);
        assert_eq!(evaluator.eval(&program, &env), Value::Null);
    }
    let (program, _) = parse("double(x)");
    assert_eq!(evaluator.eval(&program, &env), Value::Integer(6));
}

#[test]
fn test_eval_single_nodes() {
    let env = Environment::new().into_shared();
    env.borrow_mut().set("n", Value::Integer(4));

    let (program, _) = parse("n * n");
    let Statement::Expression(expr) = &program.statements[0] else {
        panic!("expected expression statement");
    };
    assert_eq!(eval(expr, &env), Value::Integer(16));
    assert_eq!(eval(&program.statements[0], &env), Value::Integer(16));
    assert_eq!(eval(&Expression::Boolean(false), &env), Value::Boolean(false));
}

#[test]
fn test_run_api() {
    assert_eq!(run("let x = 2; x * 3").unwrap(), Value::Integer(6));
    assert!(matches!(run("let = 2;"), Err(Error::Parse(_))));
    assert_eq!(
        run("-true"),
        Err(Error::Runtime(RuntimeError::UnknownPrefixOperator {
            op: "-".to_string(),
            operand: "BOOLEAN",
        }))
    );
}

#[test]
fn test_configured_call_depth() {
    let (program, _) = parse("let loop = fn(n) { loop(n + 1) }; loop(0);");
    let env = Environment::new().into_shared();
    let mut evaluator = Evaluator::with_config(EvalConfig::default().with_max_call_depth(32));
    assert_eq!(
        evaluator.eval(&program, &env),
        Value::Error(RuntimeError::CallDepthExceeded(32))
    );
    assert_eq!(evaluator.config().max_call_depth, 32);
}

#[test]
fn test_long_sum() {
    let source = vec!["1"; 10_000].join(" + ");
    assert_eq!(eval_monkey(&source), Value::Integer(10_000));
}

#[test]
fn test_deep_nesting_evaluates() {
    let depth = 10_000;

    let negations = format!("{}7", "-".repeat(depth));
    assert_eq!(eval_monkey(&negations), Value::Integer(7));

    let groups = format!("{}2 * 3{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(eval_monkey(&groups), Value::Integer(6));

    let nested_args = format!(
        "let id = fn(x) {{ x }}; {}5{}",
        "id(".repeat(depth),
        ")".repeat(depth)
    );
    assert_eq!(eval_monkey(&nested_args), Value::Integer(5));

    let blocks = format!("{}9{}", "if (true) { ".repeat(depth), " }".repeat(depth));
    assert_eq!(eval_monkey(&blocks), Value::Integer(9));
}

#[test]
fn test_deeply_nested_function_literal() {
    let depth = 5_000;
    let source = format!("{}1{}", "fn() { ".repeat(depth), " }".repeat(depth));
    let val = eval_monkey(&source);
    assert_eq!(val.type_name(), "FUNCTION");
    assert!(val.to_string().starts_with("fn() { fn() {"));
}

#[test]
fn test_cleared_global_scope_is_freed() {
    let env = Environment::new().into_shared();
    let weak = std::rc::Rc::downgrade(&env);
    let (program, _) = parse("let f = fn() { 1 }; f();");
    assert_eq!(eval(&program, &env), Value::Integer(1));

    env.borrow_mut().clear();
    drop(env);
    assert!(weak.upgrade().is_none());
}
