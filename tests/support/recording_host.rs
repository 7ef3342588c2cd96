//! A recording [`HostServices`] double, used by every integration test so
//! assertions can inspect exactly what a program printed/read/wrote
//! without touching the real terminal, filesystem, or clock.
//!
//! Grounded on `rhai`'s integration-test style of building a fresh
//! `Engine` per `#[test]` (no shared global state), adapted here to a
//! fresh `RecordingHost` per test instead.

use std::cell::RefCell;
use std::collections::HashMap;

use basalt::HostServices;

#[derive(Default)]
pub struct RecordingHost {
    pub printed: RefCell<Vec<String>>,
    pub input_lines: RefCell<Vec<String>>,
    pub files: RefCell<HashMap<String, String>>,
    pub next_random: RefCell<i64>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue lines to be handed back, in order, by successive `input()`
    /// calls (first call gets the first line pushed here).
    pub fn with_input(self, lines: &[&str]) -> Self {
        *self.input_lines.borrow_mut() = lines.iter().rev().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.files.borrow_mut().insert(path.to_string(), contents.to_string());
        self
    }

    /// Everything written via `print`/`println`/`printf`, concatenated.
    pub fn output(&self) -> String {
        self.printed.borrow().concat()
    }
}

impl HostServices for RecordingHost {
    fn print_line(&self, text: &str) {
        self.printed.borrow_mut().push(format!("{text}\n"));
    }

    fn print_raw(&self, text: &str) {
        self.printed.borrow_mut().push(text.to_string());
    }

    fn read_line(&self) -> std::io::Result<String> {
        Ok(self.input_lines.borrow_mut().pop().unwrap_or_default())
    }

    fn clear_terminal(&self) {}

    fn sleep_ms(&self, _millis: u64) {}

    fn exit_process(&self, code: i32) -> ! {
        panic!("exit_process({code}) called under test");
    }

    fn read_file(&self, path: &str) -> std::io::Result<String> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, path))
    }

    fn write_file(&self, path: &str, contents: &str) -> std::io::Result<()> {
        self.files.borrow_mut().insert(path.to_string(), contents.to_string());
        Ok(())
    }

    fn append_file(&self, path: &str, contents: &str) -> std::io::Result<()> {
        self.files.borrow_mut().entry(path.to_string()).or_default().push_str(contents);
        Ok(())
    }

    fn shell_exec(&self, _command: &str) -> std::io::Result<()> {
        Ok(())
    }

    fn uniform_int(&self, low: i64, high: i64) -> i64 {
        let wanted = *self.next_random.borrow();
        wanted.clamp(low, high)
    }

    fn now_millis(&self) -> u128 {
        0
    }
}
