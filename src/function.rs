//! Function records: `fn name(params) { ... }` and the `call` mechanics.

use crate::position::Position;
use crate::token::Token;

/// A user-defined function, grounded on `rhai`'s `fn_func.rs`/`fn_call.rs`
/// call-framing but holding a flat token slice instead of an AST body, per
/// spec.md §3.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// The body's tokens, already unwrapped from the enclosing `{ }`.
    pub tokens: Vec<Token>,
    /// Parameter names, bound positionally on `call`.
    pub params: Vec<String>,
    /// Line the `fn` statement started on, for diagnostics.
    pub defined_line: Position,
}
