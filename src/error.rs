//! Error taxonomy for the lexer and interpreter.
//!
//! Mirrors the teacher's choice (`rhai::error::EvalAltResult`) to hand-roll
//! `Display`/`Error` rather than reach for `thiserror`: this crate is meant
//! to be embedded, so its error type stays a plain enum with no macro
//! dependency.

use std::fmt;

use crate::position::Position;

/// Errors raised while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LexError {
    /// A `"` was opened but never closed before end of input.
    UnterminatedString,
    /// A numeric literal did not parse (e.g. two decimal points).
    MalformedNumber(String),
}

impl std::error::Error for LexError {}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => f.write_str("unterminated string literal"),
            Self::MalformedNumber(s) => write!(f, "malformed number literal '{s}'"),
        }
    }
}

/// The runtime/semantic error taxonomy of the interpreter.
///
/// Every variant carries the [`Position`] of the offending statement so the
/// top-level driver can print `Error at line L: <message>` the way
/// `basalt.py`'s `Interpreter.error` does.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum BasaltError {
    /// Wraps a lexical error encountered while tokenizing.
    Lex(LexError, Position),
    /// A brace, bracket, or parenthesis was opened but never matched.
    UnbalancedBlock { what: &'static str, pos: Position },
    /// A `let` declaration is missing its `=`.
    MissingAssignment(Position),
    /// A `foreach` is missing its `in` keyword.
    MissingIn(Position),
    /// `return` used outside of a function body.
    ReturnOutsideFunction(Position),
    /// Reference to a name that does not exist in the active environment.
    UndefinedVariable(String, Position),
    /// Call to a function that was never defined.
    UndefinedFunction(String, Position),
    /// Instantiation of, or method call on, a class that was never defined.
    UndefinedClass(String, Position),
    /// Reference to a method that does not exist on a class/instance.
    UndefinedMethod { class: String, method: String, pos: Position },
    /// Write (assignment, crementation, coercion, input capture, file read)
    /// targeting a binding whose `mutable` flag is `false`.
    ImmutableWrite(String, Position),
    /// A built-in expected a value of one type but received another.
    TypeMismatch { expected: &'static str, pos: Position },
    /// Arithmetic attempted on operand types that cannot be combined.
    ArithmeticMismatch(Position),
    /// List or dictionary index/key was not present.
    IndexOutOfBounds { index: String, len: usize, pos: Position },
    /// `import` target file could not be opened or read.
    ImportFailed { path: String, reason: String, pos: Position },
    /// Host service reported a failure (file I/O, shell exec, ...).
    HostFailure(String, Position),
}

impl std::error::Error for BasaltError {}

impl fmt::Display for BasaltError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err, _) => write!(f, "{err}"),
            Self::UnbalancedBlock { what, .. } => write!(f, "unmatched {what}"),
            Self::MissingAssignment(_) => write!(
                f,
                "missing assignment operator (use 'undef' for a null variable)"
            ),
            Self::MissingIn(_) => write!(f, "missing 'in' keyword in foreach"),
            Self::ReturnOutsideFunction(_) => {
                write!(f, "'return' used outside of a function")
            }
            Self::UndefinedVariable(name, _) => write!(f, "inexistent variable '{name}'"),
            Self::UndefinedFunction(name, _) => write!(f, "inexistent function '{name}'"),
            Self::UndefinedClass(name, _) => write!(f, "inexistent class '{name}'"),
            Self::UndefinedMethod { class, method, .. } => {
                write!(f, "class '{class}' has no method '{method}'")
            }
            Self::ImmutableWrite(name, _) => {
                write!(f, "cannot change value of immutable variable '{name}'")
            }
            Self::TypeMismatch { expected, .. } => {
                write!(f, "expected a value of type {expected}")
            }
            Self::ArithmeticMismatch(_) => {
                write!(f, "incompatible operand types for arithmetic")
            }
            Self::IndexOutOfBounds { index, len, .. } => {
                write!(f, "index '{index}' out of bounds (length {len})")
            }
            Self::ImportFailed { path, reason, .. } => {
                write!(f, "could not import '{path}': {reason}")
            }
            Self::HostFailure(msg, _) => write!(f, "{msg}"),
        }
    }
}

impl BasaltError {
    /// The [`Position`] every variant carries, for the top-level reporter.
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::Lex(_, p)
            | Self::UnbalancedBlock { pos: p, .. }
            | Self::MissingAssignment(p)
            | Self::MissingIn(p)
            | Self::ReturnOutsideFunction(p)
            | Self::UndefinedVariable(_, p)
            | Self::UndefinedFunction(_, p)
            | Self::UndefinedClass(_, p)
            | Self::UndefinedMethod { pos: p, .. }
            | Self::ImmutableWrite(_, p)
            | Self::TypeMismatch { pos: p, .. }
            | Self::ArithmeticMismatch(p)
            | Self::IndexOutOfBounds { pos: p, .. }
            | Self::ImportFailed { pos: p, .. }
            | Self::HostFailure(_, p) => *p,
        }
    }
}

/// Result alias used throughout the crate.
pub type BasaltResult<T> = Result<T, BasaltError>;

/// Print a fatal error the way `basalt.py`'s `Interpreter.error` does:
/// red text naming the line, to stderr.
pub fn report_error(err: &BasaltError) {
    use colored::Colorize;
    eprintln!(
        "{} {}",
        format!("Error at line {}:", err.position()).red(),
        err.to_string().red()
    );
}

/// Print a non-fatal warning the way `basalt.py`'s `Interpreter.issue` does:
/// yellow text, execution continues.
pub fn report_issue(message: &str, pos: Position) {
    use colored::Colorize;
    eprintln!("{}", format!("Issue at line {pos}: {message}").yellow());
}
