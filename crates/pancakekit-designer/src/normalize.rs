//! Path normalization.
//!
//! Three passes over a working copy of a layer:
//! - [`prune_degenerate`] drops paths with fewer than two segments and any
//!   compound or group left without children.
//! - [`flatten_compounds`] walks the arena from the roots and returns a flat
//!   list of simple paths. Compound children inherit the compound's shade and
//!   fill flag.
//! - [`open_closed_loops`] turns closed paths into open ones ending on their
//!   start point.

use pancakekit_core::{CompoundPath, Group, Layer, Node, NodeId, Path};

/// A layer reduced to simple, open paths in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedLayer {
    pub paths: Vec<Path>,
}

impl NormalizedLayer {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Runs all normalization passes.
pub fn normalize(layer: &Layer) -> NormalizedLayer {
    let pruned = prune_degenerate(layer);
    let mut paths = flatten_compounds(&pruned);
    open_closed_loops(&mut paths);
    tracing::debug!("Normalized layer into {} paths", paths.len());
    NormalizedLayer { paths }
}

/// Copies `layer` without zero-length paths or empty containers.
pub fn prune_degenerate(layer: &Layer) -> Layer {
    let mut out = Layer::new();
    let mut visited = vec![false; layer.node_count()];
    for root in layer.roots() {
        if let Some(id) = copy_pruned(layer, *root, &mut out, &mut visited) {
            out.attach_root(id);
        }
    }
    out
}

fn copy_pruned(src: &Layer, id: NodeId, dst: &mut Layer, visited: &mut [bool]) -> Option<NodeId> {
    let node = src.get(id)?;
    if std::mem::replace(&mut visited[id.0], true) {
        return None;
    }
    match node {
        Node::Path(path) if path.len() < 2 => {
            tracing::debug!("Dropping path {:?} with {} segments", id, path.len());
            None
        }
        Node::Path(path) => Some(dst.insert_path(path.clone())),
        Node::Compound(compound) => {
            let children = copy_children(src, &compound.children, dst, visited);
            (!children.is_empty()).then(|| {
                dst.insert_node(Node::Compound(CompoundPath {
                    children,
                    shade: compound.shade,
                    is_fill: compound.is_fill,
                }))
            })
        }
        Node::Group(group) => {
            let children = copy_children(src, &group.children, dst, visited);
            (!children.is_empty()).then(|| dst.insert_node(Node::Group(Group { children })))
        }
    }
}

fn copy_children(
    src: &Layer,
    children: &[NodeId],
    dst: &mut Layer,
    visited: &mut [bool],
) -> Vec<NodeId> {
    children
        .iter()
        .filter_map(|child| copy_pruned(src, *child, dst, visited))
        .collect()
}

/// Flat list of every simple path in drawing order.
pub fn flatten_compounds(layer: &Layer) -> Vec<Path> {
    let mut out = Vec::new();
    let mut visited = vec![false; layer.node_count()];
    for root in layer.roots() {
        flatten_node(layer, *root, None, &mut visited, &mut out);
    }
    out
}

fn flatten_node(
    layer: &Layer,
    id: NodeId,
    inherited: Option<&CompoundPath>,
    visited: &mut [bool],
    out: &mut Vec<Path>,
) {
    let Some(node) = layer.get(id) else {
        return;
    };
    if std::mem::replace(&mut visited[id.0], true) {
        return;
    }
    match node {
        Node::Path(path) => {
            let mut path = path.clone();
            if let Some(parent) = inherited {
                path.shade = parent.shade;
                path.is_fill = parent.is_fill;
            }
            out.push(path);
        }
        Node::Compound(compound) => {
            // Nested compounds take the outermost attributes.
            let attrs = inherited.unwrap_or(compound);
            for child in &compound.children {
                flatten_node(layer, *child, Some(attrs), visited, out);
            }
        }
        Node::Group(group) => {
            for child in &group.children {
                flatten_node(layer, *child, inherited, visited, out);
            }
        }
    }
}

pub fn open_closed_loops(paths: &mut [Path]) {
    for path in paths {
        path.open_closed_loop();
    }
}
