//! Constants for reading and writing Newick strings.

/// Newick label delimiters: parentheses, comma, colon, semicolon, comment
/// brackets (whitespace always ends an unquoted label)
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"(),:;[]";

/// Estimated characters per node of a written Newick string
pub(crate) const CHARS_PER_NODE_GUESS: usize = 16;
