//! Phylogenetic trees in an arena and the block holding a list of them.
//!
//! [PhyloTree] stores all nodes in one vector and refers to them by
//! [NodeIndex]. Nodes may have any number of children, internal nodes may
//! carry labels, and edge weights are optional.

use std::ops::Index;

/// Index of a node in a [PhyloTree].
pub type NodeIndex = usize;

/// A node of a [PhyloTree].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    label: Option<String>,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
    /// Weight of the edge to the parent
    weight: Option<f64>,
}

impl Node {
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// =#========================================================================#=
// PHYLO TREE
// =#========================================================================$=
/// A named tree with labeled nodes and weighted edges.
///
/// # Construction
/// Add nodes with [add_node()](Self::add_node), connect them with
/// [add_child()](Self::add_child) and mark the root with
/// [set_root()](Self::set_root).
#[derive(Debug, Clone, PartialEq)]
pub struct PhyloTree {
    name: String,
    nodes: Vec<Node>,
    root: Option<NodeIndex>,
    rooted: bool,
}

impl PhyloTree {
    /// Creates an empty, unrooted tree.
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            root: None,
            rooted: false,
        }
    }

    /// Adds a node without edges and returns its index.
    pub fn add_node(&mut self, label: Option<String>, weight: Option<f64>) -> NodeIndex {
        self.nodes.push(Node {
            label,
            parent: None,
            children: Vec::new(),
            weight,
        });
        self.nodes.len() - 1
    }

    /// Appends `child` to the children of `parent`.
    ///
    /// # Panics
    /// Panics if either index is not in the tree.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    pub fn set_root(&mut self, root: NodeIndex) {
        self.root = Some(root);
    }

    pub fn set_rooted(&mut self, rooted: bool) {
        self.rooted = rooted;
    }

    pub fn with_rooted(mut self, rooted: bool) -> Self {
        self.rooted = rooted;
        self
    }

    pub fn set_name<N: Into<String>>(&mut self, name: N) {
        self.name = name.into();
    }

    /// Replaces the label of a node.
    pub fn set_label(&mut self, node: NodeIndex, label: Option<String>) {
        self.nodes[node].label = label;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    pub fn is_rooted(&self) -> bool {
        self.rooted
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices of all leaves in pre-order from the root.
    pub fn leaves(&self) -> Vec<NodeIndex> {
        self.pre_order()
            .into_iter()
            .filter(|&v| self.nodes[v].is_leaf())
            .collect()
    }

    /// Labels of all labeled leaves in pre-order.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.leaves()
            .into_iter()
            .filter_map(|v| self.nodes[v].label())
            .collect()
    }

    /// Node indices in pre-order (children in insertion order).
    pub fn pre_order(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let Some(root) = self.root else {
            return order;
        };
        let mut stack = vec![root];
        while let Some(v) = stack.pop() {
            order.push(v);
            stack.extend(self.nodes[v].children.iter().rev());
        }
        order
    }
}

impl Index<NodeIndex> for PhyloTree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

/// Options of a TREES block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreesFormat {
    /// Leaves are written as tokens of a TRANSLATE table
    pub translate: bool,
}

impl TreesFormat {
    pub fn with_translate(mut self, translate: bool) -> Self {
        self.translate = translate;
        self
    }
}

// =#========================================================================#=
// TREES BLOCK
// =#========================================================================$=
/// Ordered list of trees whose leaf labels are taxon names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreesBlock {
    trees: Vec<PhyloTree>,
    /// Some tree does not contain all taxa
    partial: bool,
    /// Token to taxon name, in the order read
    translation: Option<Vec<(String, String)>>,
    format: TreesFormat,
}

impl TreesBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: TreesFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Sets the translation table (token, taxon name).
    pub fn with_translation(mut self, translation: Vec<(String, String)>) -> Self {
        self.translation = Some(translation);
        self
    }

    pub fn push(&mut self, tree: PhyloTree) {
        self.trees.push(tree);
    }

    pub fn ntrees(&self) -> usize {
        self.trees.len()
    }

    /// Tree with the given 1-based index.
    pub fn get(&self, t: usize) -> Option<&PhyloTree> {
        t.checked_sub(1).and_then(|i| self.trees.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhyloTree> {
        self.trees.iter()
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn translation(&self) -> Option<&[(String, String)]> {
        self.translation.as_deref()
    }

    pub fn format(&self) -> &TreesFormat {
        &self.format
    }

    /// `Some(rooted)` if all trees agree on rootedness, `None` otherwise or if empty.
    pub fn common_rootedness(&self) -> Option<bool> {
        let first = self.trees.first()?.is_rooted();
        self.trees
            .iter()
            .all(|t| t.is_rooted() == first)
            .then_some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_traverse() {
        let mut tree = PhyloTree::new("t1");
        let root = tree.add_node(None, None);
        let a = tree.add_node(Some("A".into()), Some(1.0));
        let inner = tree.add_node(Some("x".into()), Some(0.5));
        let b = tree.add_node(Some("B".into()), None);
        let c = tree.add_node(Some("C".into()), None);
        tree.add_child(root, a);
        tree.add_child(root, inner);
        tree.add_child(inner, b);
        tree.add_child(inner, c);
        tree.set_root(root);

        assert_eq!(tree.pre_order(), vec![root, a, inner, b, c]);
        assert_eq!(tree.leaf_labels(), vec!["A", "B", "C"]);
        assert_eq!(tree[inner].parent(), Some(root));
        assert_eq!(tree[a].weight(), Some(1.0));
    }
}
