//! `split`/`alpha`/`digit`/`alnum` (`basalt.py:1219-1255`).

use crate::value::Value;

/// `split(xs, sep) -> xs`: in place, overwriting the string binding with a
/// list of its pieces. An empty separator splits on runs of whitespace,
/// matching Python's argument-less `str.split()`.
#[must_use]
pub fn split(s: &str, sep: &str) -> Vec<Value> {
    if sep.is_empty() {
        s.split_whitespace().map(|p| Value::Str(p.to_string())).collect()
    } else {
        s.split(sep).map(|p| Value::Str(p.to_string())).collect()
    }
}

/// `alpha(x, out)`.
#[must_use]
pub fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphabetic)
}

/// `digit(x, out)`.
#[must_use]
pub fn is_digit(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// `alnum(x, out)`.
#[must_use]
pub fn is_alnum(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_on_whitespace_when_separator_is_empty() {
        let parts = split("a  b\tc", "");
        assert_eq!(
            parts,
            vec![Value::Str("a".into()), Value::Str("b".into()), Value::Str("c".into())]
        );
    }

    #[test]
    fn split_on_explicit_separator() {
        let parts = split("a,b,c", ",");
        assert_eq!(
            parts,
            vec![Value::Str("a".into()), Value::Str("b".into()), Value::Str("c".into())]
        );
    }

    #[test]
    fn classification_helpers() {
        assert!(is_alpha("hello"));
        assert!(!is_alpha("hello1"));
        assert!(is_digit("12345"));
        assert!(is_alnum("abc123"));
        assert!(!is_alnum("abc 123"));
    }
}
