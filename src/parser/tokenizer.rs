//! Tokenizer for Nexus documents.
//!
//! This module provides [Tokenizer], which lexes raw bytes into [Token]s
//! (words, punctuation, end-of-line) while discarding whitespace and
//! `[...]` comments. It keeps the byte-level peek/consume operations of a
//! classic byte parser available, since matrix rows and Newick strings are
//! read symbol by symbol rather than word by word.
//!
//! # Lexical rules
//! - `;` terminates commands, `,` separates records, `=` and `/` separate
//!   keys from values; `(`, `)`, `{`, `}` are punctuation as well
//! - `[...]` is a (possibly nested) comment
//! - single or double quotes delimit words with embedded whitespace, the
//!   quote character is escaped by doubling it (`'Baillon''s'`)
//! - end-of-line is whitespace unless made significant
//!   (see [set_eol_significant()](Tokenizer::set_eol_significant))

use crate::parser::byte_source::ByteSource;
use crate::parser::in_memory_byte_source::InMemoryByteSource;
use crate::parser::parsing_error::ParsingError;
use std::fmt;
use std::path::Path;

/// Bytes that form single-character punctuation tokens.
pub const PUNCTUATION: &[u8] = b";,=/(){}";

// =#========================================================================#=
// TOKEN
// =#========================================================================$=
/// A lexical token of a Nexus document.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Quoted or bare word (quotes removed, escapes resolved)
    Word(String),
    /// One of [PUNCTUATION]
    Punctuation(char),
    /// End of line, only produced while end-of-line is significant
    Eol,
    /// End of input
    Eof,
}

impl Token {
    /// Returns whether this is the given punctuation character.
    pub fn is_punctuation(&self, ch: char) -> bool {
        matches!(self, Token::Punctuation(c) if *c == ch)
    }

    /// Returns whether this is a word equal to `word` (ignoring ASCII case).
    pub fn is_word_ignore_case(&self, word: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "'{w}'"),
            Token::Punctuation(c) => write!(f, "'{c}'"),
            Token::Eol => write!(f, "end of line"),
            Token::Eof => write!(f, "end of file"),
        }
    }
}

/// Saved tokenizer state to return to after a lookahead.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    position: usize,
    line: usize,
    num_comments: usize,
}

// =#========================================================================#=
// TOKENIZER
// =#========================================================================$=
/// A tokenizer over a [ByteSource] that tracks the current line number.
///
/// # Runtime flags
/// * `respect_case`: whether [next_word()](Self::next_word) and
///   [next_symbol()](Self::next_symbol) preserve case (default: yes).
///   Labels ([next_label()](Self::next_label)) always preserve case and
///   keywords are always matched ignoring case.
/// * `eol_significant`: whether newlines produce [Token::Eol] (default: no).
/// * `collect_comments`: whether skipped comments are kept for
///   [take_comments()](Self::take_comments) (default: no).
///
/// # Example
/// ```
/// use nexblocks::parser::{Token, Tokenizer};
///
/// let mut tokenizer = Tokenizer::for_str("DIMENSIONS [comment] ntax=3;");
/// tokenizer.match_ignore_case("dimensions ntax =").unwrap();
/// assert_eq!(tokenizer.next_usize_in(1, 10).unwrap(), 3);
/// assert_eq!(tokenizer.next_token().unwrap(), Token::Punctuation(';'));
/// ```
pub struct Tokenizer<S: ByteSource = InMemoryByteSource> {
    source: S,
    line: usize,
    respect_case: bool,
    eol_significant: bool,
    collect_comments: bool,
    comments: Vec<String>,
}

impl Tokenizer<InMemoryByteSource> {
    /// Creates a tokenizer over a copy of the given string.
    pub fn for_str(input: &str) -> Self {
        Self::for_bytes(input.as_bytes())
    }

    /// Creates a tokenizer over a copy of the given bytes.
    pub fn for_bytes(input: &[u8]) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.to_vec()))
    }

    /// Creates a tokenizer over the full content of a file.
    pub fn for_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(InMemoryByteSource::from_file(path)?))
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl<S: ByteSource> Tokenizer<S> {
    /// Creates a new tokenizer with default flags, positioned at line 1.
    pub fn new(source: S) -> Self {
        Self {
            source,
            line: 1,
            respect_case: true,
            eol_significant: false,
            collect_comments: false,
            comments: Vec::new(),
        }
    }

    /// Sets whether words and symbols preserve case; returns the previous setting.
    pub fn set_respect_case(&mut self, respect_case: bool) -> bool {
        std::mem::replace(&mut self.respect_case, respect_case)
    }

    /// Sets whether newlines are reported as [Token::Eol]; returns the previous setting.
    pub fn set_eol_significant(&mut self, eol_significant: bool) -> bool {
        std::mem::replace(&mut self.eol_significant, eol_significant)
    }

    /// Sets whether skipped comments are collected; returns the previous setting.
    pub fn set_collect_comments(&mut self, collect_comments: bool) -> bool {
        std::mem::replace(&mut self.collect_comments, collect_comments)
    }

    pub fn respect_case(&self) -> bool {
        self.respect_case
    }

    /// Returns and clears the comments collected so far (without brackets).
    pub fn take_comments(&mut self) -> Vec<String> {
        std::mem::take(&mut self.comments)
    }
}

// ============================================================================
// Byte level (pub)
// ============================================================================
impl<S: ByteSource> Tokenizer<S> {
    /// Peeks at the current byte without consuming it.
    #[inline(always)]
    pub fn peek_byte(&self) -> Option<u8> {
        self.source.peek()
    }

    /// Consumes and returns the current byte, counting lines.
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.source.next_byte()?;
        if byte == b'\n' {
            self.line += 1;
        }
        Some(byte)
    }

    pub fn is_eof(&self) -> bool {
        self.source.is_eof()
    }

    /// Whether at least `n` bytes of input are left.
    pub fn has_remaining(&self, n: usize) -> bool {
        self.source.peek_slice(n).len() == n
    }

    /// Returns the current 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Captures the current state to [restore()](Self::restore) it later.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.source.position(),
            line: self.line,
            num_comments: self.comments.len(),
        }
    }

    /// Returns to a previously captured state.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.source.set_position(checkpoint.position);
        self.line = checkpoint.line;
        self.comments.truncate(checkpoint.num_comments);
    }

    /// Returns up to `k` bytes from the current position as string for error context.
    pub fn context(&self, k: usize) -> String {
        String::from_utf8_lossy(self.source.peek_slice(k)).into_owned()
    }

    /// Checks if the following bytes match the given byte sequence (case-insensitive).
    pub fn peek_is_sequence(&self, sequence: &[u8]) -> bool {
        let context = self.source.peek_slice(sequence.len());
        context.len() == sequence.len() && context.eq_ignore_ascii_case(sequence)
    }

    /// Consumes the next bytes if they match the given byte sequence (case-insensitive).
    pub fn consume_if_sequence(&mut self, sequence: &[u8]) -> bool {
        if !self.peek_is_sequence(sequence) {
            return false;
        }
        for _ in 0..sequence.len() {
            self.next_byte();
        }
        true
    }

    /// Consumes the current byte if it equals `ch`.
    pub fn consume_if_byte(&mut self, ch: u8) -> bool {
        if self.peek_byte() == Some(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Newlines are only skipped while end-of-line is not significant.
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek_byte() {
            let skip = match b {
                b' ' | b'\t' | b'\r' => true,
                b'\n' => !self.eol_significant,
                _ => false,
            };
            if !skip {
                break;
            }
            self.next_byte();
        }
    }

    /// Skips (consumes) a, possibly nested, comment `[...]` if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    /// * `Err(ParsingError)` - Comment was opened but never closed
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if self.peek_byte() != Some(b'[') {
            return Ok(false);
        }
        self.next_byte();

        let mut depth = 1;
        let mut text = Vec::new();
        while depth > 0 {
            match self.next_byte() {
                None => return Err(ParsingError::unclosed_comment(self)),
                Some(b'[') => {
                    depth += 1;
                    text.push(b'[');
                }
                Some(b']') => {
                    depth -= 1;
                    if depth > 0 {
                        text.push(b']');
                    }
                }
                Some(b) => text.push(b),
            }
        }

        if self.collect_comments {
            self.comments
                .push(String::from_utf8_lossy(&text).into_owned());
        }
        Ok(true)
    }

    /// Skips (consumes) all consecutive whitespace and comments.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();
        while self.skip_comment()? {
            self.skip_whitespace();
        }
        Ok(())
    }

    /// Skips whitespace, newlines and comments, even while end-of-line is significant.
    pub fn skip_eols(&mut self) -> Result<(), ParsingError> {
        let previous = self.set_eol_significant(false);
        let result = self.skip_comment_and_whitespace();
        self.set_eol_significant(previous);
        result
    }

    /// Skips blanks and comments on the current line and reports whether the
    /// line (or the input) ends here. Does not consume the newline.
    pub fn at_eol(&mut self) -> Result<bool, ParsingError> {
        let previous = self.set_eol_significant(true);
        let result = self.skip_comment_and_whitespace();
        self.set_eol_significant(previous);
        result?;
        Ok(matches!(self.peek_byte(), None | Some(b'\n')))
    }

    /// Parses a label (quoted or unquoted) terminated by any of `delimiters`.
    ///
    /// Used for tree topologies where labels end at Newick punctuation.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;
        match self.peek_byte() {
            Some(q @ (b'\'' | b'"')) => self.read_quoted(q),
            _ => {
                let mut bytes = Vec::new();
                while let Some(b) = self.peek_byte() {
                    if delimiters.contains(&b) || b.is_ascii_whitespace() {
                        break;
                    }
                    bytes.push(b);
                    self.next_byte();
                }
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}

// ============================================================================
// Token level (pub)
// ============================================================================
impl<S: ByteSource> Tokenizer<S> {
    /// Reads the next token, skipping whitespace and comments.
    pub fn next_token(&mut self) -> Result<Token, ParsingError> {
        self.skip_comment_and_whitespace()?;
        let Some(b) = self.peek_byte() else {
            return Ok(Token::Eof);
        };

        match b {
            b'\n' => {
                self.next_byte();
                Ok(Token::Eol)
            }
            b'\'' | b'"' => Ok(Token::Word(self.read_quoted(b)?)),
            b']' => Err(ParsingError::lexical(
                self,
                String::from("token, got ']' outside of a comment"),
            )),
            _ if PUNCTUATION.contains(&b) => {
                self.next_byte();
                Ok(Token::Punctuation(b as char))
            }
            _ => Ok(Token::Word(self.read_bare_word())),
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Token, ParsingError> {
        let checkpoint = self.checkpoint();
        let token = self.next_token();
        self.restore(checkpoint);
        token
    }

    /// Consumes the tokens of `expected` (keywords compared ignoring case),
    /// failing with a line-numbered [ParsingError] on the first mismatch.
    ///
    /// `expected` is itself tokenized, so `"dimensions ntax="` matches
    /// `DIMENSIONS NTAX =` as well as `dimensions ntax=`.
    pub fn match_ignore_case(&mut self, expected: &str) -> Result<(), ParsingError> {
        match self.compare_sequence(expected)? {
            None => Ok(()),
            Some((wanted, actual)) => Err(ParsingError::lexical(
                self,
                format!("'{wanted}' (in '{expected}'), got {actual}"),
            )),
        }
    }

    /// Returns whether the next tokens match `expected`, without consuming them.
    pub fn peek_matches_ignore_case(&mut self, expected: &str) -> Result<bool, ParsingError> {
        let checkpoint = self.checkpoint();
        let result = self.compare_sequence(expected);
        self.restore(checkpoint);
        Ok(result?.is_none())
    }

    /// Returns whether the next tokens match any of the given alternatives.
    pub fn peek_matches_any(&mut self, alternatives: &[&str]) -> Result<bool, ParsingError> {
        for alternative in alternatives {
            if self.peek_matches_ignore_case(alternative)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Consumes `expected` if the next tokens match it.
    pub fn consume_if_ignore_case(&mut self, expected: &str) -> Result<bool, ParsingError> {
        let checkpoint = self.checkpoint();
        if self.compare_sequence(expected)?.is_none() {
            return Ok(true);
        }
        self.restore(checkpoint);
        Ok(false)
    }

    /// Reads a word, lower-cased unless `respect_case` is set.
    pub fn next_word(&mut self) -> Result<String, ParsingError> {
        let word = self.next_label()?;
        Ok(if self.respect_case {
            word
        } else {
            word.to_lowercase()
        })
    }

    /// Reads a word (quoted or bare), always preserving case.
    pub fn next_label(&mut self) -> Result<String, ParsingError> {
        match self.next_token()? {
            Token::Word(word) => Ok(word),
            Token::Eof => Err(ParsingError::unexpected_eof(self)),
            other => Err(ParsingError::lexical(self, format!("a word, got {other}"))),
        }
    }

    /// Reads a non-negative integer.
    pub fn next_usize(&mut self) -> Result<usize, ParsingError> {
        let token = self.next_token()?;
        match &token {
            Token::Word(word) => word.parse::<usize>().map_err(|_| {
                ParsingError::lexical(self, format!("an integer, got {token}"))
            }),
            Token::Eof => Err(ParsingError::unexpected_eof(self)),
            _ => Err(ParsingError::lexical(self, format!("an integer, got {token}"))),
        }
    }

    /// Reads an integer that must lie in `[min, max]`.
    pub fn next_usize_in(&mut self, min: usize, max: usize) -> Result<usize, ParsingError> {
        let value = self.next_usize()?;
        if value < min || value > max {
            return Err(ParsingError::lexical(
                self,
                format!("an integer in [{min}, {max}], got {value}"),
            ));
        }
        Ok(value)
    }

    /// Reads a floating point number (scientific notation allowed).
    pub fn next_f64(&mut self) -> Result<f64, ParsingError> {
        let token = self.next_token()?;
        match &token {
            Token::Word(word) => word.parse::<f64>().map_err(|_| {
                ParsingError::lexical(self, format!("a number, got {token}"))
            }),
            Token::Eof => Err(ParsingError::unexpected_eof(self)),
            _ => Err(ParsingError::lexical(self, format!("a number, got {token}"))),
        }
    }

    /// Reads a floating point number that must lie in `[min, max]`.
    pub fn next_f64_in(&mut self, min: f64, max: f64) -> Result<f64, ParsingError> {
        let value = self.next_f64()?;
        if !(min..=max).contains(&value) {
            return Err(ParsingError::lexical(
                self,
                format!("a number in [{min}, {max}], got {value}"),
            ));
        }
        Ok(value)
    }

    /// Reads a single matrix symbol, skipping whitespace and comments.
    ///
    /// The symbol is lower-cased unless `respect_case` is set.
    pub fn next_symbol(&mut self) -> Result<char, ParsingError> {
        self.skip_comment_and_whitespace()?;
        match self.peek_byte() {
            None => Err(ParsingError::unexpected_eof(self)),
            Some(b'\n') => Err(ParsingError::lexical(
                self,
                String::from("a matrix symbol, got end of line"),
            )),
            Some(b';') => Err(ParsingError::lexical(
                self,
                String::from("a matrix symbol, got ';'"),
            )),
            Some(first) => {
                let width = utf8_width(first);
                let mut bytes = Vec::with_capacity(width);
                for _ in 0..width {
                    if let Some(b) = self.next_byte() {
                        bytes.push(b);
                    }
                }
                let symbol = String::from_utf8_lossy(&bytes)
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                Ok(if self.respect_case {
                    symbol
                } else {
                    symbol.to_ascii_lowercase()
                })
            }
        }
    }
}

// ============================================================================
// Helpers (private)
// ============================================================================
impl<S: ByteSource> Tokenizer<S> {
    /// Compares the tokens of `expected` with the next tokens, consuming them.
    /// Returns the first mismatching pair, or `None` if all matched.
    fn compare_sequence(&mut self, expected: &str) -> Result<Option<(String, Token)>, ParsingError> {
        let mut pattern = Tokenizer::for_str(expected);
        loop {
            let wanted = pattern.next_token()?;
            let matched = match &wanted {
                Token::Eof => return Ok(None),
                Token::Word(w) => {
                    let actual = self.next_token()?;
                    if actual.is_word_ignore_case(w) {
                        None
                    } else {
                        Some((w.clone(), actual))
                    }
                }
                Token::Punctuation(c) => {
                    let actual = self.next_token()?;
                    if actual.is_punctuation(*c) {
                        None
                    } else {
                        Some((c.to_string(), actual))
                    }
                }
                Token::Eol => None,
            };
            if matched.is_some() {
                return Ok(matched);
            }
        }
    }

    /// Reads a word enclosed in `quote`, resolving doubled quotes.
    fn read_quoted(&mut self, quote: u8) -> Result<String, ParsingError> {
        let start_line = self.line;
        self.next_byte(); // opening quote

        let mut bytes = Vec::new();
        loop {
            match self.next_byte() {
                None => {
                    return Err(ParsingError::lexical(
                        self,
                        format!(
                            "closing quote {} for word opened in line {start_line}",
                            quote as char
                        ),
                    ));
                }
                Some(b) if b == quote => {
                    if self.peek_byte() == Some(quote) {
                        bytes.push(quote);
                        self.next_byte();
                    } else {
                        break;
                    }
                }
                Some(b) => bytes.push(b),
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads an unquoted word up to whitespace, punctuation, quote or comment.
    fn read_bare_word(&mut self) -> String {
        let mut bytes = Vec::new();
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_whitespace()
                || PUNCTUATION.contains(&b)
                || matches!(b, b'[' | b']' | b'\'' | b'"')
            {
                break;
            }
            bytes.push(b);
            self.next_byte();
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Number of bytes of the UTF-8 sequence starting with `first`.
fn utf8_width(first: u8) -> usize {
    match first {
        0xF0..=0xFF => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}
