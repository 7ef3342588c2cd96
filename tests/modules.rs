mod support;

use support::RecordingHost;

#[test]
fn import_merges_functions_and_variables_caller_wins_on_conflict() {
    let lib_src = r#"
let shared_name = "from module"
let only_in_module = "module value"
fn helper() {
    return "helper result"
}
"#;
    let host = RecordingHost::new().with_file("lib.basalt", lib_src);

    let main_src = r#"
let shared_name = "from caller"
import "lib.basalt"
call helper() -> h
printf("[shared_name] [only_in_module] [h]")
"#;
    let (flow, host) = support::run_with_host(main_src, &[], host);
    flow.unwrap();
    assert_eq!(host.output(), "from caller module value helper result");
}

#[test]
fn import_of_a_missing_file_is_an_import_error() {
    use basalt::BasaltError;
    let (flow, _host) = support::run(r#"import "does-not-exist.basalt""#);
    assert!(matches!(flow.unwrap_err(), BasaltError::ImportFailed { .. }));
}
