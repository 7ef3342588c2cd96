//! The spec's end-to-end scenarios and the remaining testable properties
//! not already covered by a more focused test file (lexer.rs,
//! mutability.rs, control_flow.rs, functions.rs, classes.rs,
//! builtins.rs, modules.rs).

mod support;

#[test]
fn printf_substitutes_declared_variables() {
    let src = r#"
let x = 1
let y = "a"
printf("[x] and [y]")
"#;
    assert_eq!(support::run_ok_output(src), "1 and a");
}

#[test]
fn printf_renders_undefined_as_question_mark_and_keeps_running() {
    let src = r#"
let undef x
printf("value: [x]")
printf(" - done")
"#;
    assert_eq!(support::run_ok_output(src), "value: [?] - done");
}

#[test]
fn printf_renders_lists_and_dicts() {
    let src = r#"
let xs = [1 2 3]
let d = { "k": 1 }
printf("[xs] [d]")
"#;
    assert_eq!(support::run_ok_output(src), "[1 2 3] {\"k\": 1}");
}

#[test]
fn input_reads_a_line_into_a_mutable_target() {
    use support::RecordingHost;
    let host = RecordingHost::new().with_input(&["typed value"]);
    let src = r#"
let mut answer = ""
input("prompt: ", answer)
printf("[answer]")
"#;
    let (flow, host) = support::run_with_host(src, &[], host);
    flow.unwrap();
    assert_eq!(host.output(), "prompt: typed value");
}

#[test]
fn input_into_an_immutable_target_is_rejected() {
    use basalt::BasaltError;
    use support::RecordingHost;
    let host = RecordingHost::new().with_input(&["x"]);
    let src = r#"
let answer = ""
input("prompt: ", answer)
"#;
    let (flow, _host) = support::run_with_host(src, &[], host);
    assert!(matches!(flow.unwrap_err(), BasaltError::ImmutableWrite(_, _)));
}

#[test]
fn exit_builtin_terminates_with_its_argument_as_the_status() {
    let src = r#"
printf("before")
exit(7)
printf("after")
"#;
    let (flow, host) = support::run(src);
    assert!(matches!(flow.unwrap(), basalt::Flow::Exit(7)));
    assert_eq!(host.output(), "before");
}

#[test]
fn argv_and_argc_are_seeded_and_immutable() {
    use basalt::BasaltError;
    let (flow, _host) = support::run_with_args("argv = 1\n", &["a", "b"]);
    assert!(matches!(flow.unwrap_err(), BasaltError::ImmutableWrite(name, _) if name == "argv"));

    let src = r#"
printf("[argc]")
"#;
    let out = {
        let (flow, host) = support::run_with_args(src, &["a", "b"]);
        flow.unwrap();
        host.output()
    };
    assert_eq!(out, "2");
}

#[test]
fn random_uses_the_injected_host_uniform_int() {
    use support::RecordingHost;
    let host = RecordingHost::new();
    *host.next_random.borrow_mut() = 5;
    let src = r#"
let mut n = 0
random(n, 1, 10)
printf("[n]")
"#;
    let (flow, host) = support::run_with_host(src, &[], host);
    flow.unwrap();
    assert_eq!(host.output(), "5");
}
