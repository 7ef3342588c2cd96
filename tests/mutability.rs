mod support;

use basalt::BasaltError;

#[test]
fn immutable_assignment_is_rejected() {
    let (flow, _host) = support::run("let x = 1\nx = 2\n");
    let err = flow.unwrap_err();
    assert!(matches!(err, BasaltError::ImmutableWrite(name, _) if name == "x"));
}

#[test]
fn immutable_crementation_is_rejected() {
    let (flow, _host) = support::run("let x = 1\nx++\n");
    assert!(matches!(flow.unwrap_err(), BasaltError::ImmutableWrite(_, _)));
}

#[test]
fn immutable_arithmetic_assignment_is_rejected() {
    let (flow, _host) = support::run("let x = 1\nx += 1\n");
    assert!(matches!(flow.unwrap_err(), BasaltError::ImmutableWrite(_, _)));
}

#[test]
fn mut_declared_variable_can_be_written() {
    let (flow, host) = support::run("let mut x = 1\nx = 2\nprintf(\"[x]\")\n");
    flow.unwrap();
    assert_eq!(host.output(), "2");
}

#[test]
fn mut_then_immut_flip() {
    let (flow, _host) = support::run("let x = 1\nmut(x)\nx = 2\nimmut(x)\nx = 3\n");
    assert!(matches!(flow.unwrap_err(), BasaltError::ImmutableWrite(_, _)));
}

#[test]
fn undef_declares_a_mutable_null() {
    let (flow, _host) = support::run("let undef x\nx = 5\n");
    flow.unwrap();
}

#[test]
fn list_mutation_through_an_immutable_slot_is_rejected() {
    let (flow, _host) = support::run("let xs = [1 2 3]\nlist add(xs, 4)\n");
    assert!(matches!(flow.unwrap_err(), BasaltError::ImmutableWrite(name, _) if name == "xs"));
}

#[test]
fn dict_mutation_through_an_immutable_slot_is_rejected() {
    let (flow, _host) = support::run("let d = { \"k\": 1 }\ndict set(d, \"k\", 2)\n");
    assert!(matches!(flow.unwrap_err(), BasaltError::ImmutableWrite(name, _) if name == "d"));
}
