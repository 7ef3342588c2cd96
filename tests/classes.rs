mod support;

use basalt::BasaltError;

#[test]
fn class_init_and_method_matches_spec_end_to_end_scenario() {
    // spec.md §8 scenario 5.
    let src = r#"
class P(a) {
    fn init(a) {
        self set(a, a)
    }
    fn show() {
        printf("[a]")
    }
}
@class(P) new(7) -> p
@class_variable(p) call show()
"#;
    assert_eq!(support::run_ok_output(src), "7");
}

#[test]
fn method_can_read_and_return_self_state() {
    let src = r#"
class Counter(start) {
    fn init(start) {
        self set(n, start)
    }
    fn value() {
        return n
    }
}
@class(Counter) new(3) -> c
@class_variable(c) call value() -> v
printf("[v]")
"#;
    assert_eq!(support::run_ok_output(src), "3");
}

#[test]
fn instantiating_an_undefined_class_is_a_name_error() {
    let (flow, _host) = support::run("@class(Nope) new() -> x\n");
    assert!(matches!(flow.unwrap_err(), BasaltError::UndefinedClass(name, _) if name == "Nope"));
}

#[test]
fn class_without_init_fails_at_construction_time() {
    let (flow, _host) = support::run(
        r#"
class Bare() {
    fn other() {
        return 1
    }
}
"#,
    );
    assert!(matches!(
        flow.unwrap_err(),
        BasaltError::UndefinedMethod { method, .. } if method == "init"
    ));
}

#[test]
fn calling_an_undefined_method_is_a_name_error() {
    let src = r#"
class P(a) {
    fn init(a) {
        self set(a, a)
    }
}
@class(P) new(1) -> p
@class_variable(p) call missing()
"#;
    let (flow, _host) = support::run(src);
    assert!(matches!(
        flow.unwrap_err(),
        BasaltError::UndefinedMethod { method, .. } if method == "missing"
    ));
}
