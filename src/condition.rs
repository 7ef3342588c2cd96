//! The condition evaluator (spec.md §4.4).
//!
//! `basalt.py`'s `parse_condition` (lines 295-330) rewrites the flat token
//! slice into Python source and calls `eval()` on it, which is also where
//! it mangles quoted strings (spec.md §9's first Open Question). This
//! module evaluates the same triplet/precedence structure directly against
//! [`Value`]s instead, so no string round-trips through a sub-language and
//! no content is ever lost (SPEC_FULL.md §F).

use crate::error::{BasaltError, BasaltResult};
use crate::position::Position;
use crate::scope::Environment;
use crate::token::Token;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Atom {
    Value(bool),
    And,
    Or,
    Not,
}

/// Evaluate a flat slice of condition tokens (the sub-slice between e.g.
/// `if` and its opening `{`) to a boolean, following spec.md §4.4's rules:
/// triplets formed around `LOGIC` tokens, combined with `and`/`or`/`not` at
/// `not > and > or` precedence, numeric/lexicographic comparisons, and
/// cross-type `==`/`!=` defined (false/true) rather than erroring.
pub fn evaluate(tokens: &[Token], env: &Environment, pos: Position) -> BasaltResult<bool> {
    let atoms = build_atoms(tokens, env, pos)?;
    if atoms.is_empty() {
        return Err(BasaltError::TypeMismatch {
            expected: "a condition",
            pos,
        });
    }
    let (value, idx) = parse_or(&atoms, 0, pos)?;
    if idx != atoms.len() {
        return Err(BasaltError::TypeMismatch {
            expected: "a well-formed condition",
            pos,
        });
    }
    Ok(value)
}

fn build_atoms(tokens: &[Token], env: &Environment, pos: Position) -> BasaltResult<Vec<Atom>> {
    let mut consumed = vec![false; tokens.len()];
    let mut logic_results: Vec<Option<bool>> = vec![None; tokens.len()];

    for (i, tok) in tokens.iter().enumerate() {
        if let Token::Logic(op) = tok {
            let left = tokens
                .get(i.checked_sub(1).ok_or(BasaltError::TypeMismatch {
                    expected: "a left-hand operand",
                    pos,
                })?)
                .ok_or(BasaltError::TypeMismatch {
                    expected: "a left-hand operand",
                    pos,
                })?;
            let right = tokens.get(i + 1).ok_or(BasaltError::TypeMismatch {
                expected: "a right-hand operand",
                pos,
            })?;
            let left_val = resolve(left, env, pos)?;
            let right_val = resolve(right, env, pos)?;
            let result = compare(&left_val, op, &right_val, pos)?;
            logic_results[i] = Some(result);
            consumed[i - 1] = true;
            consumed[i] = true;
            consumed[i + 1] = true;
        }
    }

    let mut atoms = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        if let Some(result) = logic_results[i] {
            atoms.push(Atom::Value(result));
            continue;
        }
        if consumed[i] {
            continue;
        }
        match tok {
            Token::Keyword(k) if k == "and" => atoms.push(Atom::And),
            Token::Keyword(k) if k == "or" => atoms.push(Atom::Or),
            Token::Keyword(k) if k == "not" => atoms.push(Atom::Not),
            other => atoms.push(Atom::Value(resolve(other, env, pos)?.is_truthy())),
        }
    }
    Ok(atoms)
}

/// Resolve a single-token operand to a [`Value`]: an identifier is looked
/// up, a literal is converted directly. Every Basalt builtin argument is
/// exactly one token (spec.md has no compound-expression grammar), so this
/// one routine also backs `src/interpreter.rs`'s argument resolution.
pub(crate) fn resolve(tok: &Token, env: &Environment, pos: Position) -> BasaltResult<Value> {
    Ok(match tok {
        Token::Identifier(name) => env.require(name, pos)?.value.clone(),
        Token::Str(s) => Value::Str(unescape(s)),
        Token::Int(i) => Value::Int(*i),
        Token::Float(f) => Value::Float(*f),
        Token::Boolean(b) => Value::Bool(*b),
        Token::Keyword(k) if k == "null" => Value::Null,
        _ => {
            return Err(BasaltError::TypeMismatch {
                expected: "a comparable value",
                pos,
            })
        }
    })
}

/// Interprets `\n`, `\t`, `\b` the way spec.md §4.1 specifies for any
/// string the interpreter consumes (here: as a condition operand).
pub(crate) fn unescape(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\t", "\t").replace("\\b", "\u{8}")
}

fn compare(left: &Value, op: &str, right: &Value, pos: Position) -> BasaltResult<bool> {
    match op {
        "==" => Ok(left == right),
        "!=" => Ok(left != right),
        "<" | "<=" | ">" | ">=" => {
            let ord = left.partial_cmp(right).ok_or(BasaltError::ArithmeticMismatch(pos))?;
            Ok(match op {
                "<" => ord.is_lt(),
                "<=" => ord.is_le(),
                ">" => ord.is_gt(),
                ">=" => ord.is_ge(),
                _ => unreachable!(),
            })
        }
        _ => unreachable!("lexer only emits the six LOGIC operators"),
    }
}

fn parse_or(atoms: &[Atom], idx: usize, pos: Position) -> BasaltResult<(bool, usize)> {
    let (mut value, mut idx) = parse_and(atoms, idx, pos)?;
    while atoms.get(idx) == Some(&Atom::Or) {
        let (rhs, next) = parse_and(atoms, idx + 1, pos)?;
        value = value || rhs;
        idx = next;
    }
    Ok((value, idx))
}

fn parse_and(atoms: &[Atom], idx: usize, pos: Position) -> BasaltResult<(bool, usize)> {
    let (mut value, mut idx) = parse_not(atoms, idx, pos)?;
    while atoms.get(idx) == Some(&Atom::And) {
        let (rhs, next) = parse_not(atoms, idx + 1, pos)?;
        value = value && rhs;
        idx = next;
    }
    Ok((value, idx))
}

fn parse_not(atoms: &[Atom], idx: usize, pos: Position) -> BasaltResult<(bool, usize)> {
    if atoms.get(idx) == Some(&Atom::Not) {
        let (value, next) = parse_not(atoms, idx + 1, pos)?;
        return Ok((!value, next));
    }
    match atoms.get(idx) {
        Some(Atom::Value(b)) => Ok((*b, idx + 1)),
        _ => Err(BasaltError::TypeMismatch {
            expected: "a condition operand",
            pos,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::new(1)
    }

    #[test]
    fn numeric_comparison() {
        let tokens = vec![Token::Int(10), Token::Logic(">"), Token::Int(5)];
        let env = Environment::new();
        assert!(evaluate(&tokens, &env, pos()).unwrap());
    }

    #[test]
    fn string_lexicographic_comparison() {
        let tokens = vec![
            Token::Str("apple".into()),
            Token::Logic("<"),
            Token::Str("banana".into()),
        ];
        let env = Environment::new();
        assert!(evaluate(&tokens, &env, pos()).unwrap());
    }

    #[test]
    fn cross_type_equals_is_false() {
        let tokens = vec![Token::Int(1), Token::Logic("=="), Token::Str("1".into())];
        let env = Environment::new();
        assert!(!evaluate(&tokens, &env, pos()).unwrap());
    }

    #[test]
    fn and_or_not_precedence() {
        // not false and true or false  ==  (not false) and true  ==  true
        let tokens = vec![
            Token::Keyword("not".into()),
            Token::Boolean(false),
            Token::Keyword("and".into()),
            Token::Boolean(true),
            Token::Keyword("or".into()),
            Token::Boolean(false),
        ];
        let env = Environment::new();
        assert!(evaluate(&tokens, &env, pos()).unwrap());
    }

    #[test]
    fn bare_boolean_value_is_truthy() {
        let tokens = vec![Token::Boolean(true)];
        let env = Environment::new();
        assert!(evaluate(&tokens, &env, pos()).unwrap());
    }
}
