//! `string.upper`/`string.lower`/`string.trim`/`string.replace`
//! (`basalt.py:964-1023`).

/// `string upper(x)`.
#[must_use]
pub fn upper(s: &str) -> String {
    s.to_uppercase()
}

/// `string lower(x)`.
#[must_use]
pub fn lower(s: &str) -> String {
    s.to_lowercase()
}

/// `string trim(x)`. Python's `str.strip()` trims all whitespace, matched
/// by `str::trim`.
#[must_use]
pub fn trim(s: &str) -> String {
    s.trim().to_string()
}

/// `string replace(x, from, to)`. SPEC_FULL §F: both `from` and `to` have
/// `\n`, `\t`, `\b` expanded before the substitution runs, so a caller can
/// replace a literal newline without it surviving as two characters.
#[must_use]
pub fn replace(s: &str, from: &str, to: &str) -> String {
    s.replace(&unescape(from), &unescape(to))
}

fn unescape(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\t", "\t").replace("\\b", "\u{8}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_expands_escapes_in_both_operands() {
        assert_eq!(replace("a\nb", "\\n", " "), "a b");
    }

    #[test]
    fn trim_strips_whitespace() {
        assert_eq!(trim("  hi  "), "hi");
    }
}
