pub mod recording_host;

pub use recording_host::RecordingHost;

use basalt::{BasaltResult, Flow};

/// Run a full program against a fresh [`RecordingHost`] and environment,
/// returning the final [`Flow`] plus whatever the host recorded.
pub fn run(source: &str) -> (BasaltResult<Flow>, RecordingHost) {
    run_with_args(source, &[])
}

pub fn run_with_args(source: &str, args: &[&str]) -> (BasaltResult<Flow>, RecordingHost) {
    run_with_host(source, args, RecordingHost::new())
}

pub fn run_with_host(source: &str, args: &[&str], host: RecordingHost) -> (BasaltResult<Flow>, RecordingHost) {
    let mut env = basalt::Environment::new();
    let owned: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    basalt::seed_globals(&mut env, &owned);
    let mut interpreter = basalt::Interpreter::new(&host);
    let flow = interpreter.run_source(source, &mut env);
    (flow, host)
}

/// Convenience for tests that only care about captured stdout and expect
/// the program to finish without error.
pub fn run_ok_output(source: &str) -> String {
    let (flow, host) = run(source);
    flow.unwrap_or_else(|e| panic!("unexpected error: {e}"));
    host.output()
}
