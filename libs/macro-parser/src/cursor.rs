//! # Byte Cursor
//!
//! Peekable character cursor used by every grammar parser.
//! Tracks the byte offset into the source as it advances and never splits a
//! UTF-8 character.
//!
//! ## Example
//!
//! ```rust
//! use macro_parser::cursor::Cursor;
//!
//! let mut cursor = Cursor::at("{$A}", 0);
//! assert!(cursor.eat('{'));
//! assert_eq!(cursor.peek(), Some('$'));
//! ```

// =============================================================================
// CURSOR
// =============================================================================

/// Character cursor with byte position tracking.
///
/// Parsers create a cursor at the offset they were asked to match from,
/// consume what their grammar allows and report `cursor.pos() - start` as the
/// match length.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    /// Source text.
    source: &'a str,
    /// Current byte offset.
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at byte offset `pos`.
    ///
    /// An offset past the end or inside a multi-byte character yields a cursor
    /// that is already at EOF, so a parser started there simply fails.
    pub fn at(source: &'a str, pos: usize) -> Self {
        let pos = if source.is_char_boundary(pos) { pos } else { source.len() };
        Self {
            source,
            pos: pos.min(source.len()),
        }
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Source text the cursor walks over.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Check if at end of input.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Remaining, unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Peek at the current character without consuming it.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use macro_parser::cursor::Cursor;
    ///
    /// let cursor = Cursor::at("abc", 1);
    /// assert_eq!(cursor.peek(), Some('b'));
    /// ```
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek one character past the current one.
    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Advance past the current character.
    ///
    /// ## Returns
    ///
    /// Character that was consumed, or None at EOF
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `expected` if it is the current character.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `prefix` if the remaining input starts with it.
    pub fn eat_str(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Advance while predicate is true.
    ///
    /// ## Returns
    ///
    /// The consumed slice (possibly empty)
    ///
    /// ## Example
    ///
    /// ```rust
    /// use macro_parser::cursor::Cursor;
    ///
    /// let mut cursor = Cursor::at("ABC}", 0);
    /// assert_eq!(cursor.advance_while(|c| c.is_ascii_uppercase()), "ABC");
    /// assert_eq!(cursor.peek(), Some('}'));
    /// ```
    pub fn advance_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
        &self.source[start..self.pos]
    }

    /// Skip spaces (the only insignificant whitespace in these grammars).
    pub fn skip_spaces(&mut self) {
        self.advance_while(|c| c == ' ');
    }

    /// Slice of the source from `start` to the current position.
    pub fn since(&self, start: usize) -> &'a str {
        &self.source[start..self.pos]
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_at_start() {
        let cursor = Cursor::at("hello", 0);
        assert_eq!(cursor.pos(), 0);
        assert!(!cursor.is_eof());
    }

    #[test]
    fn test_cursor_empty() {
        let cursor = Cursor::at("", 0);
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn test_cursor_out_of_range_is_eof() {
        let cursor = Cursor::at("ab", 7);
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_cursor_inside_char_is_eof() {
        // 'é' is two bytes; offset 1 is not a boundary
        let cursor = Cursor::at("é}", 1);
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_cursor_peek_next() {
        let cursor = Cursor::at("abc", 0);
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));
    }

    #[test]
    fn test_cursor_eat() {
        let mut cursor = Cursor::at("{$", 0);
        assert!(!cursor.eat('$'));
        assert!(cursor.eat('{'));
        assert!(cursor.eat('$'));
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_cursor_eat_str() {
        let mut cursor = Cursor::at("regex:\"x\"", 0);
        assert!(cursor.eat_str("regex:"));
        assert_eq!(cursor.peek(), Some('"'));
    }

    #[test]
    fn test_cursor_skip_spaces_and_since() {
        let mut cursor = Cursor::at("   x", 0);
        cursor.skip_spaces();
        assert_eq!(cursor.pos(), 3);
        cursor.advance();
        assert_eq!(cursor.since(3), "x");
    }

    #[test]
    fn test_cursor_utf8() {
        let mut cursor = Cursor::at("é", 0);
        assert_eq!(cursor.advance(), Some('é'));
        assert_eq!(cursor.pos(), 2);
    }
}
