//! `ascii_char`/`char_ascii`/`int`/`float`/`str` (`basalt.py:1113-1163`).

use crate::error::{BasaltError, BasaltResult};
use crate::position::Position;
use crate::value::Value;

/// `ascii_char(x)`: the character whose Unicode code point is `x`.
pub fn ascii_char(code: i64, pos: Position) -> BasaltResult<String> {
    let code = u32::try_from(code).map_err(|_| BasaltError::TypeMismatch {
        expected: "a non-negative character code",
        pos,
    })?;
    char::from_u32(code)
        .map(String::from)
        .ok_or(BasaltError::TypeMismatch {
            expected: "a valid Unicode code point",
            pos,
        })
}

/// `char_ascii(x)`: the code point of `x`'s first (only) character.
pub fn char_ascii(s: &str, pos: Position) -> BasaltResult<i64> {
    s.chars()
        .next()
        .map(|c| c as i64)
        .ok_or(BasaltError::TypeMismatch {
            expected: "a single-character string",
            pos,
        })
}

/// `int(x)`: parse/convert to an integer.
pub fn to_int(value: &Value, pos: Position) -> BasaltResult<i64> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Float(f) => Ok(*f as i64),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Str(s) => s.trim().parse().map_err(|_| BasaltError::TypeMismatch {
            expected: "a string parseable as an integer",
            pos,
        }),
        _ => Err(BasaltError::TypeMismatch {
            expected: "a value convertible to int",
            pos,
        }),
    }
}

/// `float(x)`: parse/convert to a float.
pub fn to_float(value: &Value, pos: Position) -> BasaltResult<f64> {
    match value {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        Value::Str(s) => s.trim().parse().map_err(|_| BasaltError::TypeMismatch {
            expected: "a string parseable as a float",
            pos,
        }),
        _ => Err(BasaltError::TypeMismatch {
            expected: "a value convertible to float",
            pos,
        }),
    }
}

/// `str(x)`: render any value as its display form.
#[must_use]
pub fn to_str(value: &Value) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::new(1)
    }

    #[test]
    fn ascii_char_roundtrips_char_ascii() {
        let s = ascii_char(65, pos()).unwrap();
        assert_eq!(s, "A");
        assert_eq!(char_ascii(&s, pos()).unwrap(), 65);
    }

    #[test]
    fn to_int_parses_strings() {
        assert_eq!(to_int(&Value::Str(" 42 ".into()), pos()).unwrap(), 42);
    }

    #[test]
    fn to_int_rejects_unparseable_strings() {
        assert!(to_int(&Value::Str("nope".into()), pos()).is_err());
    }

    #[test]
    fn to_int_truncates_a_float() {
        assert_eq!(to_int(&Value::Float(3.9), pos()).unwrap(), 3);
    }
}
