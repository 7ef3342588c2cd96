//! Exercises `NativeHost`'s file built-ins against a real temporary
//! directory (everything else in the test suite runs against the
//! `RecordingHost` double).

mod support;

use tempfile::TempDir;

#[test]
fn file_write_read_append_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("greeting.txt");
    let path_str = path.to_str().unwrap();

    let src = format!(
        r#"
file write("{path}", "hello")
file append("{path}", " world")
let mut contents = ""
file read("{path}", contents)
"#,
        path = path_str.replace('\\', "\\\\")
    );

    let host = basalt::NativeHost;
    let code = basalt::run_source(&src, &host, &[]).unwrap();
    assert_eq!(code, 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world");
}
