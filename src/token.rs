//! The lexer: turns source text into a flat, ordered [`Token`] stream.
//!
//! Grounded on `rhai::token`'s `Token` enum and character-class dispatch
//! shape, resolved against `basalt.py`'s `Lexer` class (lines 16-208) for
//! exact precedence and edge-case behavior (longest-match operators, the
//! leading-minus-before-digit rule, the two comment forms).

use crate::error::LexError;
use crate::position::Position;

/// A lexeme's kind, matching spec.md §3's `Token` data model.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Identifier(String),
    Keyword(String),
    Boolean(bool),
    /// Raw string content; escape interpretation is deferred to whichever
    /// statement consumes the string (print/printf/string.replace), per
    /// spec.md §4.1.
    Str(String),
    Int(i64),
    Float(f64),
    /// `(` or `)`.
    Parenthesis(char),
    /// `[` or `]`.
    Square(char),
    /// `{` or `}`.
    Curly(char),
    /// `=`.
    Assignment,
    /// `+=`, `-=`, `*=`, `/=`, `//=`, `%=`, `^=`.
    ArithmeticAssignment(&'static str),
    /// `++` or `--`.
    Crementation(&'static str),
    /// `<`, `<=`, `>`, `>=`, `==`, `!=`.
    Logic(&'static str),
    Comma,
    Period,
    Semicolon,
    Colon,
    /// `@name`.
    Modifier(String),
    /// A bare `@` with no following identifier.
    Monkey,
    Dollar,
    /// `->`.
    ReturnOperator,
    Newline,
}

impl Token {
    /// True for the small set of keywords the statement dispatcher matches
    /// on directly; kept as a free function (rather than a `const` array
    /// lookup buried in the lexer) so `src/interpreter.rs` can reuse it for
    /// readable `matches!`/`==` comparisons.
    #[must_use]
    pub fn is_keyword(&self, name: &str) -> bool {
        matches!(self, Token::Keyword(k) if k == name)
    }
}

/// The keyword set. `True`/`False` are recognized as `Boolean` tokens
/// before this set is consulted, matching `basalt.py:95-102`.
const KEYWORDS: &[&str] = &[
    "print", "println", "printf", "let", "mut", "undef", "immut", "input", "clear", "wait",
    "exit", "if", "elseif", "else", "while", "repeat", "foreach", "break", "continue", "fn",
    "call", "return", "class", "self", "set", "new", "import", "string", "list", "dict",
    "ascii_char", "char_ascii", "int", "float", "str", "random", "split", "alpha", "digit",
    "alnum", "file", "read", "write", "append", "system", "in", "and", "or", "not",
];

/// Tokenize a full source buffer. Deterministic and total: any input
/// produces a token sequence (spec.md §4.1's lexer contract); malformed
/// strings/numbers are the only lexical errors.
pub fn tokenize(source: &str) -> Result<Vec<Token>, (LexError, Position)> {
    // CRLF normalization, per spec.md §6.3.
    let normalized = source.replace("\r\n", "\n");
    Lexer::new(&normalized).run()
}

struct Lexer<'a> {
    chars: Vec<char>,
    src: &'a str,
    pos: usize,
    line: u32,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().collect(),
            src,
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: isize) -> Option<char> {
        let idx = self.pos as isize + offset;
        if idx < 0 {
            return None;
        }
        self.chars.get(idx as usize).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn push(&mut self, tok: Token) {
        self.tokens.push(tok);
    }

    fn run(mut self) -> Result<Vec<Token>, (LexError, Position)> {
        let mut line_comment = false;
        let mut block_comment = false;

        while let Some(c) = self.current() {
            if line_comment {
                if c == '\n' {
                    line_comment = false;
                    self.push(Token::Newline);
                    self.line += 1;
                }
                self.advance();
                continue;
            }
            if block_comment {
                if c == '>'
                    && self.peek_at(-1) == Some('-')
                    && self.peek_at(-2) == Some('-')
                    && self.peek_at(-3) == Some('-')
                    && self.peek_at(-4) == Some('-')
                {
                    block_comment = false;
                } else if c == '\n' {
                    self.push(Token::Newline);
                    self.line += 1;
                }
                self.advance();
                continue;
            }

            if c.is_alphabetic() || c == '_' {
                let ident = self.read_identifier();
                if ident == "True" {
                    self.push(Token::Boolean(true));
                } else if ident == "False" {
                    self.push(Token::Boolean(false));
                } else if KEYWORDS.contains(&ident.as_str()) {
                    self.push(Token::Keyword(ident));
                } else {
                    self.push(Token::Identifier(ident));
                }
                continue;
            }

            match c {
                '<' => {
                    if self.peek_at(1) == Some('-') && self.peek_at(2) == Some('-') {
                        if self.peek_at(3) == Some('-') && self.peek_at(4) == Some('-') {
                            block_comment = true;
                        } else {
                            line_comment = true;
                        }
                    } else if self.peek_at(1) == Some('=') {
                        self.push(Token::Logic("<="));
                        self.advance();
                    } else {
                        self.push(Token::Logic("<"));
                    }
                }
                '>' => {
                    if self.peek_at(1) == Some('=') {
                        self.push(Token::Logic(">="));
                        self.advance();
                    } else {
                        self.push(Token::Logic(">"));
                    }
                }
                '!' => {
                    if self.peek_at(1) == Some('=') {
                        self.push(Token::Logic("!="));
                        self.advance();
                    }
                    // A bare `!` is not a recognized token; skipped silently
                    // like any other unknown character (spec.md §4.1).
                }
                '"' => {
                    let s = self.read_string().map_err(|e| (e, Position::new(self.line)))?;
                    self.push(Token::Str(s));
                }
                '0'..='9' => {
                    let n = self.read_number().map_err(|e| (e, Position::new(self.line)))?;
                    self.push(n);
                }
                '(' | ')' => self.push(Token::Parenthesis(c)),
                '[' | ']' => self.push(Token::Square(c)),
                '{' | '}' => self.push(Token::Curly(c)),
                '=' => {
                    if self.peek_at(1) == Some('=') {
                        self.push(Token::Logic("=="));
                        self.advance();
                    } else {
                        self.push(Token::Assignment);
                    }
                }
                '+' => {
                    if self.peek_at(1) == Some('=') {
                        self.push(Token::ArithmeticAssignment("+="));
                        self.advance();
                    } else if self.peek_at(1) == Some('+') {
                        self.push(Token::Crementation("++"));
                        self.advance();
                    }
                }
                '-' => {
                    if self.peek_at(1) == Some('=') {
                        self.push(Token::ArithmeticAssignment("-="));
                        self.advance();
                    } else if self.peek_at(1) == Some('-') {
                        self.push(Token::Crementation("--"));
                        self.advance();
                    } else if self.peek_at(1) == Some('>') {
                        self.push(Token::ReturnOperator);
                        self.advance();
                    } else if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
                        // Leading minus immediately before digits, and not
                        // after an identifier/closing bracket (the caller
                        // never reaches this arm in that case, since the
                        // previous token would already have been emitted
                        // and this `-` would instead need to be a binary
                        // operator -- Basalt's CORE has no arithmetic
                        // expression grammar beyond `+=`-style statements,
                        // so a literal `-` is always unary here).
                        self.advance();
                        let n = self.read_number().map_err(|e| (e, Position::new(self.line)))?;
                        self.push(negate(n));
                    }
                }
                '*' => {
                    if self.peek_at(1) == Some('=') {
                        self.push(Token::ArithmeticAssignment("*="));
                        self.advance();
                    }
                }
                '/' => {
                    if self.peek_at(1) == Some('=') {
                        self.push(Token::ArithmeticAssignment("/="));
                        self.advance();
                    } else if self.peek_at(1) == Some('/') {
                        if self.peek_at(2) == Some('=') {
                            self.push(Token::ArithmeticAssignment("//="));
                            self.advance();
                            self.advance();
                        }
                    }
                }
                '%' => {
                    if self.peek_at(1) == Some('=') {
                        self.push(Token::ArithmeticAssignment("%="));
                        self.advance();
                    }
                }
                '^' => {
                    if self.peek_at(1) == Some('=') {
                        self.push(Token::ArithmeticAssignment("^="));
                        self.advance();
                    }
                }
                ',' => self.push(Token::Comma),
                '.' => self.push(Token::Period),
                ';' => self.push(Token::Semicolon),
                ':' => self.push(Token::Colon),
                '@' => {
                    if self.peek_at(1).is_some_and(|d| d.is_alphabetic() || d == '_') {
                        self.advance();
                        let ident = self.read_identifier();
                        self.push(Token::Modifier(ident));
                    } else {
                        self.push(Token::Monkey);
                    }
                }
                '$' => self.push(Token::Dollar),
                '\n' => {
                    self.push(Token::Newline);
                    self.line += 1;
                }
                _ => {
                    // Unknown characters (and all other whitespace) are
                    // silently skipped, per spec.md §4.1.
                }
            }

            self.advance();
        }

        let _ = self.src; // retained for future diagnostics (snippet printing)
        Ok(self.tokens)
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        self.pos -= 1;
        self.chars[start..=self.pos].iter().collect()
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let mut out = String::new();
        self.advance(); // consume opening quote
        loop {
            match self.current() {
                None => return Err(LexError::UnterminatedString),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.current() {
                        Some(c) => {
                            out.push('\\');
                            out.push(c);
                            self.advance();
                        }
                        None => return Err(LexError::UnterminatedString),
                    }
                }
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
            }
        }
        self.pos -= 1; // `run`'s trailing `advance()` accounts for the closing quote
        Ok(out)
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let mut seen_dot = false;
        while let Some(c) = self.current() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                self.advance();
            } else {
                break;
            }
        }
        self.pos -= 1;
        let text: String = self.chars[start..=self.pos].iter().collect();
        if seen_dot {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| LexError::MalformedNumber(text))
        } else {
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| LexError::MalformedNumber(text))
        }
    }
}

fn negate(tok: Token) -> Token {
    match tok {
        Token::Int(i) => Token::Int(-i),
        Token::Float(f) => Token::Float(-f),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_that_are_not_keywords() {
        let toks = tokenize("foo bar_baz _x").unwrap();
        assert_eq!(
            toks,
            vec![
                Token::Identifier("foo".into()),
                Token::Identifier("bar_baz".into()),
                Token::Identifier("_x".into()),
            ]
        );
    }

    #[test]
    fn keywords_and_booleans() {
        let toks = tokenize("let True False x").unwrap();
        assert_eq!(
            toks,
            vec![
                Token::Keyword("let".into()),
                Token::Boolean(true),
                Token::Boolean(false),
                Token::Identifier("x".into()),
            ]
        );
    }

    #[test]
    fn numbers_negative_and_float() {
        let toks = tokenize("-5 3.14 -2.5").unwrap();
        assert_eq!(
            toks,
            vec![Token::Int(-5), Token::Float(3.14), Token::Float(-2.5)]
        );
    }

    #[test]
    fn multi_char_operators_longest_match() {
        let toks = tokenize("x += 1; y //= 2; z == 3; w != 4").unwrap();
        assert!(toks.contains(&Token::ArithmeticAssignment("+=")));
        assert!(toks.contains(&Token::ArithmeticAssignment("//=")));
        assert!(toks.contains(&Token::Logic("==")));
        assert!(toks.contains(&Token::Logic("!=")));
    }

    #[test]
    fn line_comment_preserves_newlines() {
        let toks = tokenize("let x = 1 <-- comment\nlet y = 2").unwrap();
        let newlines = toks.iter().filter(|t| **t == Token::Newline).count();
        assert_eq!(newlines, 1);
    }

    #[test]
    fn block_comment_preserves_newlines() {
        let toks = tokenize("a <---- line one\nline two\n----> b").unwrap();
        let newlines = toks.iter().filter(|t| **t == Token::Newline).count();
        assert_eq!(newlines, 2);
        assert_eq!(toks.first(), Some(&Token::Identifier("a".into())));
        assert_eq!(toks.last(), Some(&Token::Identifier("b".into())));
    }

    #[test]
    fn modifier_vs_bare_monkey() {
        let toks = tokenize("@class @ x").unwrap();
        assert_eq!(toks[0], Token::Modifier("class".into()));
        assert_eq!(toks[1], Token::Monkey);
    }

    #[test]
    fn unterminated_string_is_lex_error() {
        let err = tokenize("\"abc").unwrap_err();
        assert_eq!(err.0, LexError::UnterminatedString);
    }

    #[test]
    fn string_backslash_escape_is_preserved_raw() {
        let toks = tokenize(r#""a\"b""#).unwrap();
        assert_eq!(toks, vec![Token::Str("a\\\"b".into())]);
    }
}
