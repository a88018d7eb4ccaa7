//! Low-level scanning infrastructure for Nexus documents.
//!
//! This module provides the [Tokenizer] over a [ByteSource], helpers for
//! reading command option lists, label quoting utilities, and the error and
//! warning types shared by all block codecs.

pub(crate) mod byte_source;
pub mod command;
pub(crate) mod in_memory_byte_source;
pub mod parsing_error;
pub mod tokenizer;
pub mod utils;
pub mod warnings;

pub use byte_source::ByteSource;
pub use command::OptionList;
pub use in_memory_byte_source::InMemoryByteSource;
pub use parsing_error::{ParsingError, ParsingErrorType};
pub use tokenizer::{Checkpoint, Token, Tokenizer};
pub use warnings::{ParseWarning, Warnings};
