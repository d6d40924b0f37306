//! Layer arena holding paths, compound paths and groups.
//!
//! Nodes are owned by the [`Layer`] and addressed by [`NodeId`]; parents
//! list their children by id. Nothing in the arena points back up the tree,
//! so transformations walk from the roots and build new collections instead
//! of editing the tree while iterating it.

use crate::geometry::Point;
use crate::path::{Path, Shade};
use serde::{Deserialize, Serialize};

/// Index of a node inside its [`Layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Several simple paths sharing one shade and fill flag. Only exists while
/// fills are generated; normalization flattens it away.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompoundPath {
    pub children: Vec<NodeId>,
    pub shade: Shade,
    pub is_fill: bool,
}

/// Plain grouping without attributes of its own.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Path(Path),
    Compound(CompoundPath),
    Group(Group),
}

impl Node {
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Path(_) => &[],
            Node::Compound(c) => &c.children,
            Node::Group(g) => &g.children,
        }
    }
}

/// One drawing layer: an arena of nodes plus the ordered top-level ids.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Layer {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Adds a path at the top level.
    pub fn add_path(&mut self, path: Path) -> NodeId {
        let id = self.push(Node::Path(path));
        self.roots.push(id);
        id
    }

    /// Adds a compound path built from `paths` at the top level.
    pub fn add_compound(&mut self, paths: Vec<Path>, shade: Shade, is_fill: bool) -> NodeId {
        let id = self.insert_compound(paths, shade, is_fill);
        self.roots.push(id);
        id
    }

    /// Adds a group of already-inserted, detached nodes at the top level.
    pub fn add_group(&mut self, children: Vec<NodeId>) -> NodeId {
        self.roots.retain(|r| !children.contains(r));
        let id = self.push(Node::Group(Group { children }));
        self.roots.push(id);
        id
    }

    /// Inserts a path without attaching it anywhere.
    pub fn insert_path(&mut self, path: Path) -> NodeId {
        self.push(Node::Path(path))
    }

    /// Inserts a compound path without attaching it anywhere.
    pub fn insert_compound(&mut self, paths: Vec<Path>, shade: Shade, is_fill: bool) -> NodeId {
        let children = paths.into_iter().map(|p| self.insert_path(p)).collect();
        self.push(Node::Compound(CompoundPath {
            children,
            shade,
            is_fill,
        }))
    }

    /// Inserts a group without attaching it anywhere.
    pub fn insert_group(&mut self, children: Vec<NodeId>) -> NodeId {
        self.push(Node::Group(Group { children }))
    }

    /// Inserts any node without attaching it. Child ids must already exist.
    pub fn insert_node(&mut self, node: Node) -> NodeId {
        self.push(node)
    }

    /// Appends an inserted node to the top level.
    pub fn attach_root(&mut self, id: NodeId) {
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Every path reachable from the roots, depth-first in drawing order.
    /// Ids that dangle or cycle are skipped.
    pub fn paths(&self) -> Vec<(NodeId, &Path)> {
        let mut out = Vec::new();
        let mut visited = vec![false; self.nodes.len()];
        for root in &self.roots {
            self.collect_paths(*root, &mut visited, &mut out);
        }
        out
    }

    fn collect_paths<'a>(
        &'a self,
        id: NodeId,
        visited: &mut [bool],
        out: &mut Vec<(NodeId, &'a Path)>,
    ) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };
        if std::mem::replace(&mut visited[id.0], true) {
            return;
        }
        match node {
            Node::Path(path) => out.push((id, path)),
            other => {
                for child in other.children() {
                    self.collect_paths(*child, visited, out);
                }
            }
        }
    }

    /// Paths of a node: the path itself, or every path below a compound or
    /// group.
    pub fn paths_of(&self, id: NodeId) -> Vec<&Path> {
        let mut out = Vec::new();
        let mut visited = vec![false; self.nodes.len()];
        self.collect_paths(id, &mut visited, &mut out);
        out.into_iter().map(|(_, p)| p).collect()
    }

    /// Fill regions whose outline contains `point`, in drawing order. A
    /// compound fill is tested with the even-odd rule across its children.
    pub fn fill_regions_at(&self, point: &Point) -> Vec<NodeId> {
        let mut hits = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        let mut visited = vec![false; self.nodes.len()];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            if std::mem::replace(&mut visited[id.0], true) {
                continue;
            }
            match node {
                Node::Path(path) if path.is_fill => {
                    if crate::geometry::point_in_polygon(point, &path.points()) {
                        hits.push(id);
                    }
                }
                Node::Path(_) => {}
                Node::Compound(compound) if compound.is_fill => {
                    let inside = self
                        .paths_of(id)
                        .iter()
                        .filter(|p| crate::geometry::point_in_polygon(point, &p.points()))
                        .count()
                        % 2
                        == 1;
                    if inside {
                        hits.push(id);
                    }
                }
                other => {
                    stack.extend(other.children().iter().rev().copied());
                }
            }
        }
        hits
    }
}
