//! Utility functions for label quoting and name normalization.
//!
//! Labels are written so that the [Tokenizer](crate::parser::Tokenizer)
//! reads them back unchanged: anything that would break a bare word is
//! wrapped in single quotes with internal single quotes doubled.

/// Characters that end a bare word or carry meaning in Nexus or Newick text.
const SPECIAL_CHARS: &[char] = &[
    ' ', '\t', '\n', '\r', ',', ';', '=', '/', '(', ')', '{', '}', '[', ']', '\'', '"', ':',
];

/// Checks if a label is enclosed in single quotes.
///
/// # Examples
/// ```
/// # use nexblocks::parser::utils::is_single_quoted;
/// assert_eq!(is_single_quoted("Pukeko"), false);
/// assert_eq!(is_single_quoted("'Swamp hen'"), true);
/// assert_eq!(is_single_quoted("'"), false);
/// ```
pub fn is_single_quoted(label: &str) -> bool {
    label.starts_with('\'') && label.ends_with('\'') && label.len() >= 2
}

/// Checks if a label can be written as bare word.
///
/// # Examples
/// ```
/// # use nexblocks::parser::utils::is_plain;
/// assert!(is_plain("Pukeko"));
/// assert!(is_plain("Australasian_Swamphen"));
/// assert!(!is_plain("Australasian Swamphen"));
/// assert!(!is_plain("Pu[ke]ko"));
/// assert!(!is_plain(""));
/// ```
pub fn is_plain(label: &str) -> bool {
    !label.is_empty() && !label.contains(SPECIAL_CHARS)
}

/// Quotes a label for safe use in Nexus and Newick text.
///
/// Labels that are not [plain](is_plain) are wrapped in single quotes and
/// internal single quotes are doubled. Unlike a lossy escape, spaces are kept,
/// so reading the result yields exactly the input.
///
/// # Arguments
/// * `label` - The label string to quote
///
/// # Returns
/// The label, quoted if necessary
///
/// # Examples
/// ```
/// # use nexblocks::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// assert_eq!(escape_label(""), "''");
/// ```
pub fn escape_label(label: &str) -> String {
    if is_plain(label) {
        label.to_string()
    } else {
        format!("'{}'", label.replace('\'', "''"))
    }
}

/// Quotes a free-text value (RESULT text, attribute values) always.
///
/// # Examples
/// ```
/// # use nexblocks::parser::utils::quote;
/// assert_eq!(quote("fit=99.2"), "'fit=99.2'");
/// assert_eq!(quote("it's"), "'it''s'");
/// ```
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Normalizes a tree name: whitespace becomes `_`, opening brackets and
/// braces become `(` and closing ones become `)`.
///
/// # Examples
/// ```
/// # use nexblocks::parser::utils::normalize_tree_name;
/// assert_eq!(normalize_tree_name("gene tree [1]"), "gene_tree_(1)");
/// assert_eq!(normalize_tree_name("t{a}<b>"), "t(a)(b)");
/// ```
pub fn normalize_tree_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '[' | '{' | '<' => '(',
            ']' | '}' | '>' => ')',
            c => c,
        })
        .collect()
}
