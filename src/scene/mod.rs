//! Scene graph: hierarchical nodes with local transforms, geometry, and
//! lights.
//!
//! The viewport only talks to the scene through [`SceneGraph`]: it adds
//! objects and asks for the world-space bounds of a subtree. [`Scene`] is
//! the in-crate implementation used by the wgpu backend and the tests.

mod bounds;
mod object;

pub use bounds::Aabb;
use glam::Mat4;
pub use object::{Content, SceneObject, Transform};
use rustc_hash::FxHashMap;

use crate::error::{Result, ViewportError};

/// Stable handle to a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw numeric id.
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// SceneGraph
// ---------------------------------------------------------------------------

/// Operations the viewport needs from a scene.
pub trait SceneGraph {
    /// Insert a root-level object.
    fn add(&mut self, object: SceneObject) -> NodeId;

    /// Insert an object under `parent`.
    ///
    /// # Errors
    ///
    /// [`ViewportError::UnknownNode`] if `parent` is not in the scene.
    fn add_child(&mut self, parent: NodeId, object: SceneObject) -> Result<NodeId>;

    /// Remove a node and its whole subtree, returning the node's payload.
    fn remove(&mut self, node: NodeId) -> Option<SceneObject>;

    /// Whether `node` is part of the scene.
    fn contains(&self, node: NodeId) -> bool;

    /// World-space bounds of the subtree rooted at `node`. Recomputed on
    /// every call. The box is empty when the subtree has no geometry.
    ///
    /// # Errors
    ///
    /// [`ViewportError::UnknownNode`] if `node` is not in the scene.
    fn bounding_box(&self, node: NodeId) -> Result<Aabb>;

    /// World-space bounds of every root subtree.
    fn world_bounds(&self) -> Aabb;
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

struct Node {
    object: SceneObject,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A geometry node ready to draw: world matrix plus content.
#[derive(Debug, Clone, Copy)]
pub struct Drawable<'a> {
    /// The node this draw came from.
    pub node: NodeId,
    /// Local-to-world transform.
    pub world: Mat4,
    /// Geometry payload.
    pub content: &'a Content,
}

/// In-memory scene graph.
#[derive(Default)]
pub struct Scene {
    nodes: FxHashMap<NodeId, Node>,
    /// Root nodes in insertion order.
    roots: Vec<NodeId>,
    next_id: u32,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, parent: Option<NodeId>, object: SceneObject) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        log::debug!("scene: added {:?} ({})", id, object.name);
        let _ = self.nodes.insert(
            id,
            Node {
                object,
                parent,
                children: Vec::new(),
            },
        );
        id
    }

    /// Payload of `node`.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&SceneObject> {
        self.nodes.get(&node).map(|n| &n.object)
    }

    /// Mutable payload of `node`.
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut SceneObject> {
        self.nodes.get_mut(&node).map(|n| &mut n.object)
    }

    /// Parent of `node`, `None` for roots and unknown nodes.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    /// Children of `node` in insertion order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(&node).map_or(&[], |n| n.children.as_slice())
    }

    /// Root nodes in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Local-to-world matrix of `node`.
    #[must_use]
    pub fn world_matrix(&self, node: NodeId) -> Option<Mat4> {
        let mut current = self.nodes.get(&node)?;
        let mut matrix = current.object.transform.matrix();
        while let Some(parent) = current.parent.and_then(|p| self.nodes.get(&p)) {
            matrix = parent.object.transform.matrix() * matrix;
            current = parent;
        }
        Some(matrix)
    }

    /// Visible geometry in depth-first order. Hidden nodes prune their
    /// subtree; lights and groups produce no drawable.
    #[must_use]
    pub fn drawables(&self) -> Vec<Drawable<'_>> {
        let mut out = Vec::new();
        for &root in &self.roots {
            self.collect_drawables(root, Mat4::IDENTITY, &mut out);
        }
        out
    }

    fn collect_drawables<'a>(
        &'a self,
        id: NodeId,
        parent_world: Mat4,
        out: &mut Vec<Drawable<'a>>,
    ) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if !node.object.visible {
            return;
        }
        let world = parent_world * node.object.transform.matrix();
        if matches!(
            node.object.content,
            Content::Cuboid { .. } | Content::Polyline { .. }
        ) {
            out.push(Drawable {
                node: id,
                world,
                content: &node.object.content,
            });
        }
        for &child in &node.children {
            self.collect_drawables(child, world, out);
        }
    }

    /// Summed colour of all visible ambient lights, or `None` when the
    /// scene has no ambient light.
    #[must_use]
    pub fn ambient_light(&self) -> Option<[f32; 3]> {
        let mut total: Option<[f32; 3]> = None;
        for node in self.nodes.values() {
            if let Content::AmbientLight { color, intensity } = node.object.content {
                if !node.object.visible {
                    continue;
                }
                let acc = total.get_or_insert([0.0; 3]);
                for (a, c) in acc.iter_mut().zip(color) {
                    *a += c * intensity;
                }
            }
        }
        total
    }

    fn subtree_bounds(&self, id: NodeId, parent_world: Mat4) -> Aabb {
        let Some(node) = self.nodes.get(&id) else {
            return Aabb::EMPTY;
        };
        let world = parent_world * node.object.transform.matrix();
        node.children.iter().fold(
            node.object.content.local_bounds().transformed(&world),
            |acc, &child| acc.union(&self.subtree_bounds(child, world)),
        )
    }

    fn detach(&mut self, node: NodeId, parent: Option<NodeId>) {
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent) => parent.children.retain(|&c| c != node),
            None => self.roots.retain(|&r| r != node),
        }
    }
}

impl SceneGraph for Scene {
    fn add(&mut self, object: SceneObject) -> NodeId {
        let id = self.insert(None, object);
        self.roots.push(id);
        id
    }

    fn add_child(&mut self, parent: NodeId, object: SceneObject) -> Result<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return Err(ViewportError::UnknownNode(parent));
        }
        let id = self.insert(Some(parent), object);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    fn remove(&mut self, node: NodeId) -> Option<SceneObject> {
        let removed = self.nodes.remove(&node)?;
        self.detach(node, removed.parent);
        let mut pending = removed.children;
        while let Some(child) = pending.pop() {
            if let Some(n) = self.nodes.remove(&child) {
                pending.extend(n.children);
            }
        }
        log::debug!("scene: removed {:?} ({})", node, removed.object.name);
        Some(removed.object)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn bounding_box(&self, node: NodeId) -> Result<Aabb> {
        let parent_world = match self.parent(node) {
            Some(parent) => self.world_matrix(parent).unwrap_or(Mat4::IDENTITY),
            None if self.nodes.contains_key(&node) => Mat4::IDENTITY,
            None => return Err(ViewportError::UnknownNode(node)),
        };
        Ok(self.subtree_bounds(node, parent_world))
    }

    fn world_bounds(&self) -> Aabb {
        self.roots.iter().fold(Aabb::EMPTY, |acc, &root| {
            acc.union(&self.subtree_bounds(root, Mat4::IDENTITY))
        })
    }
}
