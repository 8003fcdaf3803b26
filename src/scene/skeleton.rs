use glam::{Affine3A, Quat, Vec3};
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// A bone hierarchy with a single root node.
///
/// Nodes live in a [`SlotMap`] and reference each other by [`NodeHandle`].
/// World-space queries walk the parent chain, so they always reflect the
/// current local transforms; callers that need rest-pose values must query
/// before any pose is applied.
#[derive(Debug, Clone)]
pub struct Skeleton {
    nodes: SlotMap<NodeHandle, Node>,
    root: NodeHandle,
}

impl Skeleton {
    /// Creates a skeleton containing only a root node named `root_name`.
    #[must_use]
    pub fn new(root_name: &str) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(root_name));
        Self { nodes, root }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts `node` under `parent`. Returns `None` if `parent` is not part of this skeleton.
    pub fn add_child(&mut self, parent: NodeHandle, mut node: Node) -> Option<NodeHandle> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        node.parent = Some(parent);
        node.children.clear();
        let handle = self.nodes.insert(node);
        self.nodes[parent].children.push(handle);
        Some(handle)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn name(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes.get(handle).map(|n| n.name.as_str())
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(handle).and_then(Node::parent)
    }

    /// Depth-first search from the root for the first node named `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.descendants(self.root)
            .find(|&h| self.nodes[h].name == name)
    }

    /// Node addressed by a `/`-separated `node_path`, matched from the leaf up.
    ///
    /// Candidates are the nodes named like the last segment. When several
    /// share that name (e.g. `thumb1` under both hands), the one whose
    /// ancestors match the most trailing path segments wins; ties go to the
    /// first in pre-order. The path does not need to reach the root.
    #[must_use]
    pub fn find_by_path(&self, node_path: &str) -> Option<NodeHandle> {
        let mut segments = node_path.rsplit('/');
        let leaf = segments.next()?;
        let ancestors: Vec<&str> = segments.collect();

        let mut best: Option<(usize, NodeHandle)> = None;
        for handle in self
            .descendants(self.root)
            .filter(|&h| self.nodes[h].name == leaf)
        {
            let score = self.matching_ancestors(handle, &ancestors);
            if best.is_none_or(|(s, _)| score > s) {
                best = Some((score, handle));
            }
        }
        best.map(|(_, handle)| handle)
    }

    /// How many of `names` (nearest first) match the parent chain of `handle`.
    fn matching_ancestors(&self, handle: NodeHandle, names: &[&str]) -> usize {
        let mut current = self.parent(handle);
        let mut matched = 0;
        for &name in names {
            match current {
                Some(h) if self.nodes[h].name == name => {
                    matched += 1;
                    current = self.parent(h);
                }
                _ => break,
            }
        }
        matched
    }

    /// Pre-order traversal of `start` and everything below it.
    pub fn descendants(&self, start: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        let mut stack = if self.nodes.contains_key(start) {
            vec![start]
        } else {
            Vec::new()
        };
        std::iter::from_fn(move || {
            let handle = stack.pop()?;
            // Reverse so children pop in insertion order.
            stack.extend(self.nodes[handle].children.iter().rev().copied());
            Some(handle)
        })
    }

    /// Product of local matrices from the root down to `handle`.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Affine3A {
        let mut matrix = Affine3A::IDENTITY;
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.nodes.get(h) else {
                break;
            };
            matrix = node.transform.local_matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Composed local rotations from the root down to `handle`.
    #[must_use]
    pub fn world_rotation(&self, handle: NodeHandle) -> Quat {
        let mut rotation = Quat::IDENTITY;
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.nodes.get(h) else {
                break;
            };
            rotation = node.transform.rotation * rotation;
            current = node.parent;
        }
        rotation.normalize()
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Vec3 {
        self.world_matrix(handle).translation.into()
    }

    /// `/`-joined node names from the child of `ancestor` down to `handle`.
    ///
    /// Returns `None` if `ancestor` is not reached by walking parents, or if
    /// `handle == ancestor`.
    #[must_use]
    pub fn path_from(&self, ancestor: NodeHandle, handle: NodeHandle) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = handle;
        loop {
            if current == ancestor {
                break;
            }
            let node = self.nodes.get(current)?;
            segments.push(node.name.as_str());
            current = node.parent?;
        }
        if segments.is_empty() {
            return None;
        }
        segments.reverse();
        Some(segments.join("/"))
    }
}
