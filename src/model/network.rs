//! Networks: nodes and edges carrying ordered string attributes.

/// Ordered `key → value` mapping owned by a node, an edge or a network.
///
/// Insertion order is kept so that written attributes appear in the order
/// they were read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing an existing value in place.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Type tag of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkType {
    HaplotypeNetwork,
    #[default]
    Other,
}

impl NetworkType {
    pub fn name(&self) -> &'static str {
        match self {
            NetworkType::HaplotypeNetwork => "HaplotypeNetwork",
            NetworkType::Other => "Other",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("HaplotypeNetwork") {
            Some(NetworkType::HaplotypeNetwork)
        } else if name.eq_ignore_ascii_case("Other") {
            Some(NetworkType::Other)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkNode {
    pub id: usize,
    pub label: Option<String>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEdge {
    pub id: usize,
    /// Id of the source node
    pub source: usize,
    /// Id of the target node
    pub target: usize,
    pub attributes: Attributes,
}

// =#========================================================================#=
// NETWORK BLOCK
// =#========================================================================$=
/// A graph of [NetworkNode]s and [NetworkEdge]s referring to nodes by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkBlock {
    network_type: NetworkType,
    properties: Attributes,
    nodes: Vec<NetworkNode>,
    edges: Vec<NetworkEdge>,
}

impl NetworkBlock {
    pub fn new(network_type: NetworkType) -> Self {
        Self {
            network_type,
            ..Self::default()
        }
    }

    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    pub fn properties(&self) -> &Attributes {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Attributes {
        &mut self.properties
    }

    /// Adds a node; returns `false` if its id is already taken.
    pub fn add_node(&mut self, node: NetworkNode) -> bool {
        if self.node(node.id).is_some() {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Adds an edge; returns `false` if an endpoint is unknown or its id is taken.
    pub fn add_edge(&mut self, edge: NetworkEdge) -> bool {
        if self.node(edge.source).is_none()
            || self.node(edge.target).is_none()
            || self.edges.iter().any(|e| e.id == edge.id)
        {
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// Node with the given id.
    pub fn node(&self, id: usize) -> Option<&NetworkNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[NetworkNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[NetworkEdge] {
        &self.edges
    }
}
