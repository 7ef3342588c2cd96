//! Built-in operations over scalars, strings, lists, and dicts
//! (spec.md §4.5's "built-in libraries").
//!
//! One module per value kind, grounded on `rhai/src/packages/{string_basic,
//! string_more,array_basic,map_basic,math_basic}.rs`: each builtin is a
//! free function over already-resolved [`crate::value::Value`]s rather than
//! a token-parsing routine, so `src/interpreter.rs` does the token-to-value
//! resolution once and these stay pure data transforms — the opposite of
//! `basalt.py:962-1255`, where every builtin re-parses its own parenthesized
//! argument list token by token.

pub mod convert;
pub mod dict;
pub mod list;
pub mod string;
pub mod text;
