//! Parsing of Newick strings into [PhyloTree]s.
//!
//! Grammar (whitespace and `[...]` comments allowed between all tokens):
//! ```text
//! tree    := subtree ';'
//! subtree := '(' subtree (',' subtree)* ')' [label] [':' weight]
//!          | label [':' weight]
//! ```
//! Labels may be quoted; unquoted labels end at Newick punctuation or
//! whitespace. Weights may use scientific notation.

use crate::model::trees::{NodeIndex, PhyloTree};
use crate::newick::defs::NEWICK_LABEL_DELIMITERS;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;
use crate::parser::tokenizer::Tokenizer;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser for single Newick tree strings.
///
/// # Example
/// ```
/// use nexblocks::newick::NewickParser;
/// use nexblocks::parser::Tokenizer;
///
/// let mut tokenizer = Tokenizer::for_str("((A:1.0,B:1.0)x:0.5,C:1.5);");
/// let tree = NewickParser::new().parse_tree(&mut tokenizer, "kiwis").unwrap();
/// assert_eq!(tree.leaf_labels(), vec!["A", "B", "C"]);
/// ```
#[derive(Debug, Default)]
pub struct NewickParser {
    /// Whether the closing `;` is consumed (and required)
    optional_semicolon: bool,
}

impl NewickParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a tree without closing `;` at end of input.
    pub fn with_optional_semicolon(mut self) -> Self {
        self.optional_semicolon = true;
        self
    }

    /// Parses one tree and gives it the provided name.
    ///
    /// # Arguments
    /// * `tokenizer` - Positioned at the start of a Newick string
    /// * `name` - Name of the new tree
    ///
    /// # Returns
    /// * `Ok(PhyloTree)` - The parsed tree, unrooted
    /// * `Err(ParsingError)` - If the Newick string is malformed
    pub fn parse_tree<S: ByteSource>(
        &self,
        tokenizer: &mut Tokenizer<S>,
        name: &str,
    ) -> Result<PhyloTree, ParsingError> {
        let mut tree = PhyloTree::new(name);
        tokenizer.skip_eols()?;
        let root = self.parse_subtree(tokenizer, &mut tree)?;
        tree.set_root(root);

        tokenizer.skip_eols()?;
        if !tokenizer.consume_if_byte(b';') && !(self.optional_semicolon && tokenizer.is_eof()) {
            let found = tokenizer.peek_byte().map(char::from);
            return Err(ParsingError::lexical(
                tokenizer,
                format!("';' at end of tree, got {found:?}"),
            ));
        }
        Ok(tree)
    }
}

// ============================================================================
// Parsing (private)
// ============================================================================
impl NewickParser {
    /// Parses a subtree, adds its nodes to `tree` and returns its root.
    fn parse_subtree<S: ByteSource>(
        &self,
        tokenizer: &mut Tokenizer<S>,
        tree: &mut PhyloTree,
    ) -> Result<NodeIndex, ParsingError> {
        tokenizer.skip_eols()?;
        let children = if tokenizer.consume_if_byte(b'(') {
            self.parse_children(tokenizer, tree)?
        } else {
            Vec::new()
        };

        let label = self.parse_label(tokenizer)?;
        if children.is_empty() && label.is_none() && !tokenizer.peek_is_sequence(b":") {
            // Empty leaves are legal Newick, e.g. "(,);"
            let found = tokenizer.peek_byte().map(char::from);
            if !matches!(found, Some(',') | Some(')')) {
                return Err(ParsingError::lexical(
                    tokenizer,
                    format!("label or '(' in tree, got {found:?}"),
                ));
            }
        }
        let weight = self.parse_weight(tokenizer)?;

        let node = tree.add_node(label, weight);
        for child in children {
            tree.add_child(node, child);
        }
        Ok(node)
    }

    /// Parses `subtree (',' subtree)* ')'` after the opening parenthesis.
    fn parse_children<S: ByteSource>(
        &self,
        tokenizer: &mut Tokenizer<S>,
        tree: &mut PhyloTree,
    ) -> Result<Vec<NodeIndex>, ParsingError> {
        let mut children = vec![self.parse_subtree(tokenizer, tree)?];
        loop {
            tokenizer.skip_eols()?;
            match tokenizer.next_byte() {
                Some(b',') => children.push(self.parse_subtree(tokenizer, tree)?),
                Some(b')') => return Ok(children),
                None => return Err(ParsingError::unexpected_eof(tokenizer)),
                Some(other) => {
                    return Err(ParsingError::lexical(
                        tokenizer,
                        format!("',' or ')' between children, got '{}'", other as char),
                    ));
                }
            }
        }
    }

    /// Parses an optional (quoted or unquoted) label.
    fn parse_label<S: ByteSource>(&self, tokenizer: &mut Tokenizer<S>) -> Result<Option<String>, ParsingError> {
        tokenizer.skip_eols()?;
        let quoted = matches!(tokenizer.peek_byte(), Some(b'\'') | Some(b'"'));
        let label = tokenizer.parse_label(NEWICK_LABEL_DELIMITERS)?;
        Ok((quoted || !label.is_empty()).then_some(label))
    }

    /// Parses an optional edge weight `':' number`.
    fn parse_weight<S: ByteSource>(&self, tokenizer: &mut Tokenizer<S>) -> Result<Option<f64>, ParsingError> {
        tokenizer.skip_eols()?;
        if !tokenizer.consume_if_byte(b':') {
            return Ok(None);
        }
        tokenizer.skip_eols()?;
        let text = tokenizer.parse_label(NEWICK_LABEL_DELIMITERS)?;
        text.parse::<f64>().map(Some).map_err(|_| {
            ParsingError::lexical(tokenizer, format!("edge weight, got '{text}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multifurcating_with_internal_labels() {
        let mut tokenizer = Tokenizer::for_str("(A:1e-2,'B c',(D,E,F)inner:2)root;");
        let tree = NewickParser::new().parse_tree(&mut tokenizer, "t").unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree[root].label(), Some("root"));
        assert_eq!(tree[root].children().len(), 3);
        assert_eq!(tree.leaf_labels(), vec!["A", "B c", "D", "E", "F"]);
        let first = tree[root].children()[0];
        assert_eq!(tree[first].weight(), Some(0.01));
    }

    #[test]
    fn test_comments_and_newlines_inside() {
        let mut tokenizer = Tokenizer::for_str("(A[note],\n B [x]:3);");
        let tree = NewickParser::new().parse_tree(&mut tokenizer, "t").unwrap();
        assert_eq!(tree.leaf_labels(), vec!["A", "B"]);
    }

    #[test]
    fn test_missing_parenthesis() {
        let mut tokenizer = Tokenizer::for_str("(A,B;");
        assert!(NewickParser::new().parse_tree(&mut tokenizer, "t").is_err());
    }

    #[test]
    fn test_bad_weight() {
        let mut tokenizer = Tokenizer::for_str("(A:x,B);");
        assert!(NewickParser::new().parse_tree(&mut tokenizer, "t").is_err());
    }
}
