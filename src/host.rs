//! Host services: the seam between the pure interpreter core and the
//! operating system.
//!
//! Grounded on the native-backend split `rhai-common::environment` draws
//! between a platform-agnostic trait and an OS-backed implementation, so
//! that `src/interpreter.rs` never calls `std::io`/`std::fs`/`std::process`
//! directly. `basalt.py` has no such seam — `clear`, `wait`, `exit`, `file`,
//! and `system` (lines 733-961) call straight into `os`/`time`/`sys`/
//! `subprocess` — so every method below is grounded on one of those blocks
//! while the trait boundary itself is new.

use std::fmt;
use std::io::Write as _;

use crate::position::Position;

/// Everything the interpreter needs from its environment, abstracted so
/// tests can run against a recording double instead of the real terminal,
/// filesystem, and process (see `tests/support/recording_host.rs`).
pub trait HostServices {
    /// `print`/`println`: a line of text, terminated with `\n`.
    fn print_line(&self, text: &str);
    /// `printf`: text with no trailing newline.
    fn print_raw(&self, text: &str);
    /// `input`: read one line from stdin, without its trailing newline.
    fn read_line(&self) -> std::io::Result<String>;
    /// `clear()`.
    fn clear_terminal(&self);
    /// `wait(n)`: sleep for `n` milliseconds.
    fn sleep_ms(&self, millis: u64);
    /// `exit(n)`: terminate the process with the given code. Never returns.
    fn exit_process(&self, code: i32) -> !;
    /// `file read(...)`.
    fn read_file(&self, path: &str) -> std::io::Result<String>;
    /// `file write(...)`.
    fn write_file(&self, path: &str, contents: &str) -> std::io::Result<()>;
    /// `file append(...)`.
    fn append_file(&self, path: &str, contents: &str) -> std::io::Result<()>;
    /// `system(...)`: run a shell command, discarding its output the way
    /// `basalt.py:961` does (`capture_output=False`).
    fn shell_exec(&self, command: &str) -> std::io::Result<()>;
    /// `random(low, high)`: an inclusive uniform integer in `[low, high]`.
    fn uniform_int(&self, low: i64, high: i64) -> i64;
    /// Milliseconds since the Unix epoch, used by the `random` builtin's
    /// default seed and by any future timing builtin.
    fn now_millis(&self) -> u128;
}

/// Wraps a host-service failure (I/O error, non-UTF-8 output, ...) with the
/// [`Position`] of the statement that triggered it, for translation into
/// [`crate::error::BasaltError::HostFailure`].
#[derive(Debug)]
pub struct HostError {
    pub message: String,
    pub pos: Position,
}

impl HostError {
    #[must_use]
    pub fn new(message: impl Into<String>, pos: Position) -> Self {
        Self {
            message: message.into(),
            pos,
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The OS-backed `HostServices` the `basalt` binary wires up (spec.md §6.2).
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeHost;

impl HostServices for NativeHost {
    fn print_line(&self, text: &str) {
        println!("{text}");
    }

    fn print_raw(&self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }

    fn read_line(&self) -> std::io::Result<String> {
        let mut buf = String::new();
        std::io::stdin().read_line(&mut buf)?;
        Ok(buf.trim_end_matches(['\n', '\r']).to_string())
    }

    fn clear_terminal(&self) {
        let cmd = if cfg!(windows) { "cls" } else { "clear" };
        let shell = if cfg!(windows) { "cmd" } else { "sh" };
        let flag = if cfg!(windows) { "/C" } else { "-c" };
        let _ = std::process::Command::new(shell).arg(flag).arg(cmd).status();
    }

    fn sleep_ms(&self, millis: u64) {
        std::thread::sleep(std::time::Duration::from_millis(millis));
    }

    fn exit_process(&self, code: i32) -> ! {
        std::process::exit(code);
    }

    fn read_file(&self, path: &str) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_file(&self, path: &str, contents: &str) -> std::io::Result<()> {
        std::fs::write(path, contents)
    }

    fn append_file(&self, path: &str, contents: &str) -> std::io::Result<()> {
        use std::fs::OpenOptions;
        let mut f = OpenOptions::new().create(true).append(true).open(path)?;
        f.write_all(contents.as_bytes())
    }

    fn shell_exec(&self, command: &str) -> std::io::Result<()> {
        let shell = if cfg!(windows) { "cmd" } else { "sh" };
        let flag = if cfg!(windows) { "/C" } else { "-c" };
        std::process::Command::new(shell).arg(flag).arg(command).status()?;
        Ok(())
    }

    fn uniform_int(&self, low: i64, high: i64) -> i64 {
        use rand::Rng;
        if low >= high {
            return low;
        }
        rand::thread_rng().gen_range(low..=high)
    }

    fn now_millis(&self) -> u128 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }
}
