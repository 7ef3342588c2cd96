mod support;

use basalt::BasaltError;

#[test]
fn call_captures_return_value_into_target() {
    let src = r#"
fn greet(name) {
    return name
}
call greet("hi") -> r
printf("[r]")
"#;
    assert_eq!(support::run_ok_output(src), "hi");
}

#[test]
fn call_without_arrow_discards_the_return_value() {
    let src = r#"
fn f() {
    return 5
}
call f()
let x = 1
printf("[x]")
"#;
    assert_eq!(support::run_ok_output(src), "1");
}

#[test]
fn parameters_are_not_visible_outside_the_call() {
    let src = r#"
fn f(n) {
    n = 99
}
let n = 1
call f(5)
printf("[n]")
"#;
    assert_eq!(support::run_ok_output(src), "1");
}

#[test]
fn call_to_an_undefined_function_is_a_name_error() {
    let (flow, _host) = support::run("call nope()\n");
    assert!(matches!(flow.unwrap_err(), BasaltError::UndefinedFunction(name, _) if name == "nope"));
}

#[test]
fn return_outside_a_function_is_fatal() {
    let (flow, _host) = support::run("return 1\n");
    assert!(matches!(flow.unwrap_err(), BasaltError::ReturnOutsideFunction(_)));
}

#[test]
fn factorial_matches_spec_end_to_end_scenario() {
    // spec.md §8 scenario 1: `fn f(n) { ... } call f(5) -> r; println(r)`
    // prints 120. The core's `let` only resolves a single token on its
    // right-hand side (no binary-expression grammar), so the body
    // accumulates with `*=`/`-=` rather than `n * (n - 1)`-style exprs.
    let src = r#"
fn fact(n) {
    let mut result = 1
    let mut i = n
    while i > 1 {
        result *= i
        i -= 1
    }
    return result
}
call fact(5) -> r
printf("[r]")
"#;
    assert_eq!(support::run_ok_output(src), "120");
}
