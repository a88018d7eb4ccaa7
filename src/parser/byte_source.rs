//! Byte source abstraction for the tokenizer.
//!
//! This module provides the [ByteSource] trait. Documents are fully
//! materialized before parsing, see
//! [InMemoryByteSource](crate::parser::in_memory_byte_source::InMemoryByteSource).

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================T=
/// Trait defining the interface for byte sources used by the
/// [Tokenizer](crate::parser::Tokenizer).
///
/// The tokenizer relies on being able to jump back to an earlier position
/// (for token lookahead), so implementations must support
/// [set_position()](Self::set_position) to any position previously
/// reported by [position()](Self::position).
pub trait ByteSource {
    /// Peek at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    fn peek(&self) -> Option<u8>;

    /// Get the current byte and advance the position (consume it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns a slice of up to `k` bytes from the current position without allocating.
    fn peek_slice(&self, k: usize) -> &[u8];

    /// Returns the current position in the byte stream.
    fn position(&self) -> usize;

    /// Sets the position in the byte stream.
    ///
    /// # Arguments
    /// * `pos` - The byte offset to seek to
    fn set_position(&mut self, pos: usize);

    /// Check if at end of data.
    fn is_eof(&self) -> bool;
}
