//! Error types for Nexus parsing.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting fatal errors that occur while reading a Nexus document.
//! Non-fatal problems are queued as [Warnings](crate::parser::Warnings)
//! instead.

use crate::parser::byte_source::ByteSource;
use crate::parser::tokenizer::Tokenizer;
use thiserror::Error;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================€=
/// Error types that can occur during Nexus parsing.
///
/// All of them are fatal and abort the whole document read.
#[derive(PartialEq, Debug, Clone, Error)]
pub enum ParsingErrorType {
    /// Expected token or number not found.
    #[error("Expected {0}")]
    Lexical(String),
    /// Dimension mismatch, duplicate taxon, trivial split, unresolved id, ...
    #[error("Invalid structure - {0}")]
    Structural(String),
    /// Leftover unrecognized option in a FORMAT or PROPERTIES command.
    #[error("Unknown construct - {0}")]
    UnknownConstruct(String),
    #[error("Unexpected end of file")]
    UnexpectedEof,
    #[error("Unclosed comment")]
    UnclosedComment,
    #[error("File does not start with #NEXUS header")]
    MissingNexusHeader,
    #[error("IO error - {0}")]
    Io(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Parsing error with contextual information (line number and following input).
#[derive(Debug, Error)]
#[error("{kind} (line {line}){context}")]
pub struct ParsingError {
    kind: ParsingErrorType,
    line: usize,
    context: String,
}

impl ParsingError {
    /// Create a ParsingError from an error type and tokenizer state
    pub fn from_tokenizer<S: ByteSource>(kind: ParsingErrorType, tokenizer: &Tokenizer<S>) -> Self {
        let snippet = tokenizer.context(DEFAULT_CONTEXT_LENGTH);
        let context = if snippet.trim().is_empty() {
            String::new()
        } else {
            format!("\n  Context (next {} bytes): {}", snippet.len(), snippet)
        };
        Self {
            kind,
            line: tokenizer.line(),
            context,
        }
    }

    /// Create a ParsingError for a known line but without input context,
    /// e.g. for checks done after the relevant tokens were consumed.
    pub fn at_line(kind: ParsingErrorType, line: usize) -> Self {
        Self {
            kind,
            line,
            context: String::new(),
        }
    }

    /// Convenience constructor for [ParsingErrorType::Lexical]
    pub fn lexical<S: ByteSource>(tokenizer: &Tokenizer<S>, expected: String) -> Self {
        Self::from_tokenizer(ParsingErrorType::Lexical(expected), tokenizer)
    }

    /// Convenience constructor for [ParsingErrorType::Structural]
    pub fn structural<S: ByteSource>(tokenizer: &Tokenizer<S>, msg: String) -> Self {
        Self::from_tokenizer(ParsingErrorType::Structural(msg), tokenizer)
    }

    /// Convenience constructor for [ParsingErrorType::UnknownConstruct]
    pub fn unknown_construct<S: ByteSource>(tokenizer: &Tokenizer<S>, msg: String) -> Self {
        Self::from_tokenizer(ParsingErrorType::UnknownConstruct(msg), tokenizer)
    }

    /// Convenience constructor for [ParsingErrorType::UnexpectedEof]
    pub fn unexpected_eof<S: ByteSource>(tokenizer: &Tokenizer<S>) -> Self {
        Self::from_tokenizer(ParsingErrorType::UnexpectedEof, tokenizer)
    }

    /// Convenience constructor for [ParsingErrorType::UnclosedComment]
    pub fn unclosed_comment<S: ByteSource>(tokenizer: &Tokenizer<S>) -> Self {
        Self::from_tokenizer(ParsingErrorType::UnclosedComment, tokenizer)
    }

    /// Convenience constructor for [ParsingErrorType::MissingNexusHeader]
    pub fn missing_nexus_header<S: ByteSource>(tokenizer: &Tokenizer<S>) -> Self {
        Self::from_tokenizer(ParsingErrorType::MissingNexusHeader, tokenizer)
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the 1-based line number where the error occurred
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns whether this is a [ParsingErrorType::Structural] error.
    pub fn is_structural(&self) -> bool {
        matches!(self.kind, ParsingErrorType::Structural(_))
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        ParsingError {
            kind: ParsingErrorType::Io(err.to_string()),
            line: 0,
            context: String::new(),
        }
    }
}
