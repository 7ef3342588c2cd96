//! Basalt: a tiny, embeddable scripting language and its tree-walking
//! interpreter.
//!
//! Mirrors the module layout of `rhai`'s crate root (`examples/rhaiscript-lsp/rhai/src/lib.rs`):
//! one `mod` per concern, re-exported flat at the crate root so a caller
//! never has to spell out `basalt::interpreter::Interpreter`.

mod block;
mod builtins;
mod class;
mod condition;
mod error;
mod function;
mod host;
mod interpreter;
mod module;
mod position;
mod scope;
mod token;
mod value;

pub use class::{Class, Instance};
pub use error::{BasaltError, BasaltResult, LexError, report_error, report_issue};
pub use function::Function;
pub use host::{HostServices, NativeHost};
pub use interpreter::{Flow, Interpreter};
pub use position::Position;
pub use scope::{Binding, Environment};
pub use token::{tokenize, Token};
pub use value::Value;

/// Basalt's integer kind, named the way `rhai::INT` is: a single place to
/// retarget the width if a future build needs it.
pub type INT = i64;
/// Basalt's floating-point kind (`rhai::FLOAT`'s counterpart).
pub type FLOAT = f64;

/// Install the top-level bindings every program starts with (spec.md §4.2):
/// `argv` (immutable list of program arguments), `argc` (immutable count),
/// and `null` (the immutable `Null` value looked up by bare `null`
/// references — the lexer has no dedicated `null` keyword, so this is the
/// only thing that makes the identifier resolve to anything).
pub fn seed_globals(env: &mut Environment, args: &[String]) {
    let argv = args.iter().map(|a| Value::Str(a.clone())).collect();
    env.declare("argv", Value::list(argv), false);
    env.declare("argc", Value::Int(args.len() as i64), false);
    env.declare("null", Value::Null, false);
}

/// Run a full source buffer to completion against a freshly seeded
/// environment, translating the final [`Flow`] into a process exit code:
/// `exit(n)` threads `n` out, a normal end-of-program is `0`. A stray
/// top-level `return` is a [`BasaltError::ReturnOutsideFunction`]; a stray
/// `break`/`continue` (no enclosing loop ever claimed it) is harmless and
/// treated the same as falling off the end.
pub fn run_source<H: HostServices>(source: &str, host: &H, args: &[String]) -> BasaltResult<i32> {
    let mut env = Environment::new();
    seed_globals(&mut env, args);
    let mut interpreter = Interpreter::new(host);
    match interpreter.run_source(source, &mut env)? {
        Flow::Exit(code) => Ok(code),
        Flow::Return(_) => Err(BasaltError::ReturnOutsideFunction(Position::default())),
        Flow::Normal | Flow::Break | Flow::Continue => Ok(0),
    }
}

/// Run one already-persistent [`Interpreter`]/[`Environment`] pair against a
/// single line of source, the way the REPL (`src/bin/basalt.rs`) feeds it
/// lines one at a time so definitions accumulate across the session.
pub fn run_line<H: HostServices>(
    interpreter: &mut Interpreter<'_, H>,
    env: &mut Environment,
    line: &str,
) -> BasaltResult<Flow> {
    interpreter.run_source(line, env)
}
