use std::collections::{HashMap, HashSet};

use sha2::{Digest, Sha256};

use crate::heap::{EdgeKind, ObjectId, RootKind};

/// One object on a retention path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionNode {
    pub id: ObjectId,
    pub type_name: String,
    /// Set for the GC roots the path starts from.
    pub root: Option<RootKind>,
}

/// `from` holds a reference of `kind` to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionEdge {
    pub from: ObjectId,
    pub to: ObjectId,
    pub kind: EdgeKind,
}

/// Minimal directed graph connecting GC roots to one traced instance.
///
/// Edges point from referrer to referent, so every path in the graph runs from a
/// root towards [`RetentionGraph::target`]. Nodes are stored in discovery order
/// with the target first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionGraph {
    target: ObjectId,
    nodes: Vec<RetentionNode>,
    edges: Vec<RetentionEdge>,
}

impl RetentionGraph {
    pub(crate) fn new(target: ObjectId, nodes: Vec<RetentionNode>, edges: Vec<RetentionEdge>) -> Self {
        Self {
            target,
            nodes,
            edges,
        }
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn nodes(&self) -> &[RetentionNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[RetentionEdge] {
        &self.edges
    }

    pub fn node(&self, id: ObjectId) -> Option<&RetentionNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &RetentionNode> {
        self.nodes.iter().filter(|node| node.root.is_some())
    }

    pub fn weak_edge_count(&self) -> usize {
        self.edges.iter().filter(|edge| !edge.kind.is_strong()).count()
    }

    /// Returns `true` if some strong root reaches the target over strong edges only.
    ///
    /// Paths that pass through finalizer or ephemeron references, or start at the
    /// finalizer queue, do not prove the object is leaked.
    pub fn is_strongly_rooted(&self) -> bool {
        let mut incoming: HashMap<ObjectId, Vec<&RetentionEdge>> = HashMap::new();
        for edge in &self.edges {
            if edge.kind.is_strong() {
                incoming.entry(edge.to).or_default().push(edge);
            }
        }

        let mut visited = HashSet::new();
        let mut worklist = vec![self.target];
        while let Some(id) = worklist.pop() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(node) = self.node(id) {
                if node.root.as_ref().is_some_and(RootKind::is_strong) {
                    return true;
                }
            }
            if let Some(edges) = incoming.get(&id) {
                for edge in edges {
                    worklist.push(edge.from);
                }
            }
        }
        false
    }

    /// SHA-256 over the graph structure with object identities erased.
    ///
    /// Two instances retained the same way (same types, fields and root kinds)
    /// produce the same digest; array slot indices are ignored.
    pub fn shape_digest(&self) -> [u8; 32] {
        let position: HashMap<ObjectId, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id, i))
            .collect();

        let mut hasher = Sha256::new();
        for node in &self.nodes {
            hasher.update(node.type_name.as_bytes());
            hasher.update([0u8]);
            match &node.root {
                Some(root) => hasher.update(root.to_string().as_bytes()),
                None => hasher.update(b"-"),
            }
            hasher.update([0u8]);
        }

        let mut edges: Vec<(usize, usize, &str)> = self
            .edges
            .iter()
            .map(|edge| (position[&edge.from], position[&edge.to], edge.kind.category()))
            .collect();
        edges.sort_unstable();
        for (from, to, category) in edges {
            hasher.update((from as u64).to_le_bytes());
            hasher.update((to as u64).to_le_bytes());
            hasher.update(category.as_bytes());
            hasher.update([0u8]);
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }
}
