use std::fs;

use pretty_assertions::assert_eq;
use quip::{
    Config, Error, Interpreter, Value,
    ast::{Statement, doc_comments},
    error::RuntimeError,
    interpreter::value::native::{Arity, NativeFunction},
    parse, run_script,
};
use walkdir::WalkDir;

#[test]
fn scripts_return_true() {
    let mut count = 0;

    for entry in WalkDir::new("tests/scripts").into_iter()
                                               .filter_map(Result::ok)
                                               .filter(|e| e.path().extension().is_some_and(|ext| ext == "quip"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        match Interpreter::with_config(Config::default().with_debug(true)).run(&source) {
            Ok(Value::Bool(true)) => {},
            Ok(other) => panic!("Script {path:?} returned {other} instead of true"),
            Err(e) => panic!("Script {path:?} failed: {e}"),
        }
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

fn eval(src: &str) -> Value {
    Interpreter::new().run(src)
                      .unwrap_or_else(|e| panic!("Script failed: {e}\n{src}"))
}

fn assert_true(src: &str) {
    assert_eq!(eval(src), Value::Bool(true), "{src}");
}

fn failure(src: &str) -> Error {
    match Interpreter::new().run(src) {
        Ok(value) => panic!("Script returned {value} but was expected to fail"),
        Err(e) => e,
    }
}

#[test]
fn integer_arithmetic() {
    for (a, b) in [(0, 1), (7, 3), (-7, 2), (12, -5), (1_000_000, 999)] {
        assert_eq!(eval(&format!("return {a} + {b}")), Value::Int(a + b));
        assert_eq!(eval(&format!("return {a} * {b}")), Value::Int(a * b));
        assert_eq!(eval(&format!("return {a} / {b}")), Value::Int(a / b));
    }
}

#[test]
fn division_by_zero() {
    let error = failure("x = 0\nreturn 4 / x");

    assert!(matches!(error, Error::Runtime(RuntimeError::DivideByZero { position })
                            if position.line == 1));
}

#[test]
fn overflow_is_an_error() {
    let error = failure("return 9223372036854775807 + 1");

    assert!(matches!(error, Error::Runtime(RuntimeError::Overflow { .. })));
}

#[test]
fn scoping() {
    let mut interpreter = Interpreter::new();

    interpreter.assign("a", Value::Int(1));
    interpreter.push_scope();
    interpreter.assign("a", Value::Int(2));
    assert_eq!(interpreter.lookup("a"), Some(&Value::Int(2)));
    interpreter.pop_scope();
    assert_eq!(interpreter.lookup("a"), Some(&Value::Int(1)));

    interpreter.push_scope();
    interpreter.assign("b", Value::Int(3));
    interpreter.pop_scope();
    assert_eq!(interpreter.lookup("b"), None);
}

#[test]
fn functions_are_isolated() {
    let f = "f(n){ if n<1 { return n } return f(n-1) }\n";

    for n in [0, 1, 5, 40] {
        assert_eq!(eval(&format!("{f}return f({n})")), Value::Int(0));
    }
    assert_true(&format!("{f}return f(5) == 0"));
}

#[test]
fn default_call_depth_is_reachable() {
    let f = "f(n){ if n<1 { return n } return f(n-1) }\n";

    assert_eq!(eval(&format!("{f}return f(199)")), Value::Int(0));
    assert!(matches!(failure(&format!("{f}return f(200)")),
                     Error::Runtime(RuntimeError::RecursionLimit { limit: 200, .. })));
}

#[test]
fn deep_nesting_parses_and_runs() {
    let depth = 1000;
    let source = format!("return {}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(eval(&source), Value::Int(1));

    let nested = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    assert_eq!(eval(&format!("x = {nested}\nreturn len(x)")), Value::Int(1));

    let negations = format!("return {}5", "-".repeat(depth + 1));
    assert_eq!(eval(&negations), Value::Int(-5));
}

#[test]
fn functions_cannot_see_caller_locals() {
    let source = "peek() {\n  return secret\n}\nouter() {\n  secret = 1\n  return peek()\n}\nreturn outer()";

    assert!(matches!(failure(source), Error::Runtime(RuntimeError::Name { name, .. }) if name == "secret"));
}

#[test]
fn membership() {
    assert_eq!(eval("return 2 in [2]"), Value::Bool(true));
    assert_eq!(eval("return 2 in [1]"), Value::Bool(false));
    assert_eq!(eval("return 2 not in [2]"), Value::Bool(false));
    assert_true("return [1, {a = 'x'}] in [[1, {a = 'x'}]]");
    assert_true("return 'a' in {a = 1}");
}

#[test]
fn mapping_field_access() {
    assert_eq!(eval("m={a=1}\nreturn m['a']"), Value::Int(1));
    assert_eq!(eval("m={a=1}\nb='a'\nreturn m[b]"), Value::Int(1));
}

#[test]
fn end_to_end() {
    assert_eq!(eval("a=1\nb=2\nc=a+b\np(x,y){return x+y}\nd=p(a,b)\nreturn d-1"),
               Value::Int(2));
    assert_eq!(eval("if 2>1 { return 2 } else { return 1 }"), Value::Int(2));
    assert_eq!(eval("return (1 + 2) + 3"), Value::Int(6));
    assert_eq!(eval("x = 3\nif x < 2 { return 'a' } else if x < 4 { return 'b' } else { return 'c' }"),
               Value::from("b"));
}

#[test]
fn structural_equality() {
    assert_true("return [1, [2, 'x']] == [1, [2, 'x']]");
    assert_true("return {a = [1]} == {a = [1]}");
    assert_eq!(eval("return [1] == [1, 1]"), Value::Bool(false));
    assert_eq!(eval("return 1 == '1'"), Value::Bool(false));
}

#[test]
fn collection_operators() {
    assert_eq!(eval("return [1, 2, 3, 2] - [2]").to_string(), "[1, 3]");
    assert_eq!(eval("return {a = 1\nb = 2} + {b = 3}").to_string(), "{a = 1, b = 3}");
    assert_eq!(eval("return [1, 2] + [3]").to_string(), "[1, 2, 3]");
    assert_eq!(eval("return [1, 2, 3] - {a = 2}").to_string(), "[1, 3]");
    assert_eq!(eval("return {a = 1\nb = 2} - {a = 1}").to_string(), "{b = 2}");
    assert_eq!(eval("return {a = 1\nb = 2} - {a = 5}").to_string(), "{a = 1, b = 2}");
    assert_eq!(eval("return 'ab' + 'c'"), Value::from("abc"));
}

#[test]
fn not_and_negation() {
    assert_true("return not false");
    assert_true("return -3 + 5 == 2");
    assert_true("return not (1 > 2)");
}

#[test]
fn natives_and_regexes() {
    assert_true("return regexMatch('^[a-z]+$', 'quip')");
    assert_true("return regexMapValue({}, 'x') == regexMapValue({}, 'y')");
    assert_eq!(eval("m = {}\nm['^a'] = 1\nm['b$'] = 2\nreturn regexMapValue(m, 'cab')"),
               Value::Int(2));
}

#[test]
fn host_registered_natives() {
    let mut interpreter = Interpreter::new();
    let shout = NativeFunction::new("shout", |interpreter, args| {
                    let [value] = args else {
                        return Err(RuntimeError::Arity { name:     "shout".to_string(),
                                                         expected: "1".to_string(),
                                                         found:    args.len(),
                                                         position: interpreter.call_site(), });
                    };
                    Ok(Value::Str(value.to_string().to_uppercase()))
                }).with_arity(Arity::Exact(1));

    interpreter.register_function(shout.clone()).unwrap();

    assert_eq!(interpreter.run("return shout('hey')").unwrap(), Value::from("HEY"));
    assert_eq!(interpreter.register_function(shout),
               Err(RuntimeError::DuplicateName { name: "shout".to_string() }));
}

#[test]
fn errors_carry_positions() {
    assert_eq!(failure("x = 1\nreturn x + 'a'").to_string(),
               "Error at 2:10: Cannot apply '+' to int and string.");
    assert_eq!(failure("return nope(1)").to_string(), "Error at 1:8: 'nope' is not defined.");
    assert!(matches!(failure("x = $"), Error::Parse(_)));
    assert_eq!(failure("return 1 not in 2").to_string(),
               "Error at 1:10: Cannot apply 'not in' to int and int.");
}

#[test]
fn run_script_reports_unless_debugging() {
    let quiet = Config::default();
    let loud = quiet.with_debug(true);

    assert_eq!(run_script("return 1 / 0", &quiet).unwrap(), Value::Nil);
    assert!(run_script("return 1 / 0", &loud).is_err());
    assert!(run_script("debug = true\nreturn 1 / 0", &quiet).is_err());
    assert!(run_script("return [", &quiet).is_err());
}

#[test]
fn runs_parsed_programs_and_statements() {
    let program = parse("x = 5\nx * 2").unwrap();
    let mut interpreter = Interpreter::new();

    assert_eq!(interpreter.run(&program).unwrap(), Value::Nil);
    assert_eq!(interpreter.run(&program.statements[2]).unwrap(), Value::Int(10));
}

#[test]
fn doc_comments_attach_to_declarations() {
    let source = "// unrelated\n\n// Adds two numbers.\n// Returns their sum.\nadd(a, b) {\n  return a + b\n}";
    let program = parse(source).unwrap();

    let function = program.statements
                          .iter()
                          .find_map(|statement| match statement {
                              Statement::Function(function) => Some(function),
                              _ => None,
                          })
                          .unwrap();
    let docs: Vec<&str> = doc_comments(&program.statements, function.position).into_iter()
                                                                               .map(|c| c.text.as_str())
                                                                               .collect();

    assert_eq!(docs, vec![" Adds two numbers.", " Returns their sum."]);
}
