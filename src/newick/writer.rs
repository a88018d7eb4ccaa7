//! Newick string writing for [PhyloTree]s.

use crate::model::trees::{NodeIndex, PhyloTree};
use crate::newick::defs::CHARS_PER_NODE_GUESS;
use crate::parser::utils::escape_label;

/// Returns the Newick representation of a tree with closing semicolon.
///
/// Node labels are quoted if necessary; `rename` may replace leaf labels,
/// e.g. by tokens of a TRANSLATE table. Edge weights are written in their
/// shortest round-trip form.
///
/// # Arguments
/// * `tree` - The tree to write
/// * `rename` - Maps a leaf label to the text written instead, `None` keeps it
///
/// # Example
/// ```
/// use nexblocks::model::PhyloTree;
/// use nexblocks::newick::to_newick;
///
/// let mut tree = PhyloTree::new("t");
/// let root = tree.add_node(None, None);
/// let a = tree.add_node(Some("A".into()), Some(1.0));
/// let b = tree.add_node(Some("Great Spotted Kiwi".into()), Some(2.5));
/// tree.add_child(root, a);
/// tree.add_child(root, b);
/// tree.set_root(root);
///
/// assert_eq!(to_newick(&tree, |_| None), "(A:1,'Great Spotted Kiwi':2.5);");
/// ```
pub fn to_newick<F>(tree: &PhyloTree, rename: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    // Recursive helper for building the Newick string
    fn build_newick<F>(tree: &PhyloTree, newick: &mut String, index: NodeIndex, rename: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let node = &tree[index];

        if !node.is_leaf() {
            newick.push('(');
            for (i, child) in node.children().iter().enumerate() {
                if i > 0 {
                    newick.push(',');
                }
                build_newick(tree, newick, *child, rename);
            }
            newick.push(')');
        }

        if let Some(label) = node.label() {
            let renamed = if node.is_leaf() { rename(label) } else { None };
            match renamed {
                Some(token) => newick.push_str(&escape_label(&token)),
                None => newick.push_str(&escape_label(label)),
            }
        }

        if let Some(weight) = node.weight() {
            newick.push(':');
            newick.push_str(&weight.to_string());
        }
    }

    let mut newick = String::with_capacity(tree.num_nodes() * CHARS_PER_NODE_GUESS);
    if let Some(root) = tree.root() {
        build_newick(tree, &mut newick, root, &rename);
    }
    newick.push(';');
    newick
}
