//! The balanced-brace block scanner.
//!
//! spec.md §4.3 calls this "the single most subtle invariant in the
//! interpreter" and §9's REDESIGN FLAGS recommend pulling it out into one
//! reusable routine rather than reimplementing brace-counting in every
//! control construct, the way `basalt.py` does across `skip_block`,
//! `skip_block_function`, `skip_block_repeat`, `skip_block_foreach`,
//! `skip_block_while`, and `skip_block_class` (lines 278-540). This module
//! is that one routine.

use crate::error::{BasaltError, BasaltResult};
use crate::position::Position;
use crate::token::Token;

/// A cursor over a token slice, advanced by the scanner and handed back so
/// the caller can resume dispatch right after the closing brace.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pub pos: usize,
    pub line: u32,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(tokens: &'a [Token], line: u32) -> Self {
        Self { tokens, pos: 0, line }
    }

    #[must_use]
    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    #[must_use]
    pub fn peek(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + offset)
    }

    /// The token immediately before the cursor, used by the `=`/`+=`-style/
    /// `++`/`--` statement forms to recover the identifier they apply to
    /// without backtracking the cursor itself (matches `basalt.py`'s
    /// `self.peek(-1)` at the same call sites).
    #[must_use]
    pub fn previous(&self) -> Option<&'a Token> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub fn advance(&mut self) {
        if self.current() == Some(&Token::Newline) {
            self.line += 1;
        }
        self.pos += 1;
    }

    #[must_use]
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Collect every token up to (not including) the next occurrence of
    /// `delimiter`, advancing past it. Used for comma/bracket-free argument
    /// lists and `if`/`while` condition slices, matching `basalt.py`'s
    /// `peek_until`.
    pub fn collect_until(&mut self, delimiter: &Token) -> Vec<Token> {
        let mut out = Vec::new();
        while let Some(tok) = self.current() {
            if tok == delimiter {
                break;
            }
            out.push(tok.clone());
            self.advance();
        }
        out
    }

    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.line)
    }
}

/// Scan a balanced `{ ... }` block starting at a cursor positioned exactly
/// on the opening `{`. Returns the tokens strictly between the braces
/// (newlines stripped, since only the interpreter's own `NEWLINE` handling
/// needs them and the body is about to be re-fed through a fresh
/// dispatch loop) and leaves the cursor positioned just past the closing
/// `}`.
///
/// This is the one place brace-depth bookkeeping happens; every control
/// construct in `src/interpreter.rs` calls through it instead of
/// re-deriving the brace count itself.
pub fn scan_block(cursor: &mut Cursor<'_>) -> BasaltResult<Vec<Token>> {
    let start_pos = cursor.position();
    if cursor.current() != Some(&Token::Curly('{')) {
        return Err(BasaltError::UnbalancedBlock {
            what: "'{'",
            pos: start_pos,
        });
    }

    let mut depth = 0i32;
    let mut body = Vec::new();

    loop {
        let Some(tok) = cursor.current() else {
            return Err(BasaltError::UnbalancedBlock {
                what: "'}'",
                pos: start_pos,
            });
        };

        match tok {
            Token::Curly('{') => {
                depth += 1;
                if depth > 1 {
                    body.push(tok.clone());
                }
            }
            Token::Curly('}') => {
                depth -= 1;
                if depth == 0 {
                    cursor.advance();
                    break;
                }
                body.push(tok.clone());
            }
            Token::Newline => {}
            other => body.push(other.clone()),
        }
        cursor.advance();
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &[Token]) -> Vec<Token> {
        s.to_vec()
    }

    #[test]
    fn scans_flat_block() {
        let tokens = toks(&[
            Token::Curly('{'),
            Token::Identifier("x".into()),
            Token::Curly('}'),
            Token::Identifier("after".into()),
        ]);
        let mut cur = Cursor::new(&tokens, 1);
        let body = scan_block(&mut cur).unwrap();
        assert_eq!(body, vec![Token::Identifier("x".into())]);
        assert_eq!(cur.current(), Some(&Token::Identifier("after".into())));
    }

    #[test]
    fn scans_nested_block() {
        let tokens = toks(&[
            Token::Curly('{'),
            Token::Identifier("a".into()),
            Token::Curly('{'),
            Token::Identifier("b".into()),
            Token::Curly('}'),
            Token::Identifier("c".into()),
            Token::Curly('}'),
        ]);
        let mut cur = Cursor::new(&tokens, 1);
        let body = scan_block(&mut cur).unwrap();
        assert_eq!(
            body,
            vec![
                Token::Identifier("a".into()),
                Token::Curly('{'),
                Token::Identifier("b".into()),
                Token::Curly('}'),
                Token::Identifier("c".into()),
            ]
        );
        assert!(cur.at_end());
    }

    #[test]
    fn unmatched_brace_is_an_error() {
        let tokens = toks(&[Token::Curly('{'), Token::Identifier("x".into())]);
        let mut cur = Cursor::new(&tokens, 1);
        assert!(matches!(
            scan_block(&mut cur),
            Err(BasaltError::UnbalancedBlock { .. })
        ));
    }

    #[test]
    fn counts_newlines_inside_the_block() {
        let tokens = toks(&[
            Token::Curly('{'),
            Token::Newline,
            Token::Identifier("x".into()),
            Token::Newline,
            Token::Curly('}'),
        ]);
        let mut cur = Cursor::new(&tokens, 1);
        scan_block(&mut cur).unwrap();
        assert_eq!(cur.line, 3);
    }
}
