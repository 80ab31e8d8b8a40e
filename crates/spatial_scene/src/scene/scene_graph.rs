//! Visual host interface and an in-memory implementation
//!
//! The display pipeline never talks to a renderer directly. It drives a
//! [`VisualSceneBuilder`], which any engine can implement on top of its own
//! node graph. [`VisualTree`] is the reference implementation: a plain
//! slotmap-backed hierarchy that records what was built.

use crate::foundation::math::{Transform, Vec3};
use crate::render::{Material, MeshData};
use image::RgbaImage;
use slotmap::{new_key_type, SlotMap};

/// Mesh plus the material to draw it with
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Triangle mesh in the node's local frame
    pub mesh: MeshData,
    /// Material instance
    pub material: Material,
}

/// Physics shape attached to a node
#[derive(Debug, Clone, PartialEq)]
pub enum Collider {
    /// Box fitted to a quad (`size.z` is zero)
    Box {
        /// Full size along each axis
        size: Vec3,
    },
    /// Arbitrary triangle mesh
    Mesh(MeshData),
}

/// Text label floating in front of a node
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Text to show
    pub text: String,
    /// Offset from the owning node
    pub offset: Vec3,
}

impl Label {
    /// Distance a label is pushed towards the viewer
    pub const DEPTH_OFFSET: f32 = -0.003;
    
    /// Label with the standard offset
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offset: Vec3::new(0.0, 0.0, Self::DEPTH_OFFSET),
        }
    }
}

/// Operations the display pipeline needs from a visual host
pub trait VisualSceneBuilder {
    /// Opaque node handle
    type Node: Copy + Eq + std::fmt::Debug;
    
    /// The node all scene content hangs under
    fn root(&self) -> Self::Node;
    
    /// Create an empty child of `parent`
    fn create_node(&mut self, name: &str, parent: Self::Node) -> Self::Node;
    
    /// Set the node's transform relative to its parent
    fn set_local_pose(&mut self, node: Self::Node, pose: &Transform);
    
    /// Attach drawable geometry
    fn attach_geometry(&mut self, node: Self::Node, geometry: Geometry);
    
    /// Attach the main texture of the node's material
    fn attach_texture(&mut self, node: Self::Node, texture: RgbaImage);
    
    /// Attach a physics shape
    fn attach_collider(&mut self, node: Self::Node, collider: Collider);
    
    /// Attach a text label
    fn attach_label(&mut self, node: Self::Node, label: Label);
    
    /// Destroy every descendant of `node`, keeping `node` itself
    fn destroy_children(&mut self, node: Self::Node);
}

new_key_type! {
    /// Handle of a [`VisualTree`] node
    pub struct NodeKey;
}

/// One node of a [`VisualTree`]
#[derive(Debug, Clone, Default)]
pub struct VisualNode {
    /// Node name
    pub name: String,
    /// Parent, `None` for the root
    pub parent: Option<NodeKey>,
    /// Children in creation order
    pub children: Vec<NodeKey>,
    /// Local transform
    pub pose: Transform,
    /// Attached geometry
    pub geometry: Vec<Geometry>,
    /// Attached texture
    pub texture: Option<RgbaImage>,
    /// Attached colliders
    pub colliders: Vec<Collider>,
    /// Attached label
    pub label: Option<Label>,
}

/// In-memory visual host
#[derive(Debug)]
pub struct VisualTree {
    nodes: SlotMap<NodeKey, VisualNode>,
    root: NodeKey,
    mutations: usize,
}

impl VisualTree {
    /// Create a tree holding only a root node called `root_name`
    pub fn new(root_name: &str) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(VisualNode {
            name: root_name.to_string(),
            ..VisualNode::default()
        });
        Self { nodes, root, mutations: 0 }
    }
    
    /// Look a node up
    pub fn node(&self, key: NodeKey) -> Option<&VisualNode> {
        self.nodes.get(key)
    }
    
    /// Children of `key`, empty if the node does not exist
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map_or(&[], |n| n.children.as_slice())
    }
    
    /// Total number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    
    /// Number of mutating calls received so far
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }
    
    /// All nodes, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &VisualNode)> {
        self.nodes.iter()
    }
    
    /// Every node with the given name
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (NodeKey, &'a VisualNode)> + 'a {
        self.nodes.iter().filter(move |(_, n)| n.name == name)
    }
    
    fn node_mut(&mut self, key: NodeKey) -> Option<&mut VisualNode> {
        self.mutations += 1;
        let node = self.nodes.get_mut(key);
        if node.is_none() {
            log::warn!("VisualTree: node {key:?} no longer exists");
        }
        node
    }
}

impl Default for VisualTree {
    fn default() -> Self {
        Self::new("Root")
    }
}

impl VisualSceneBuilder for VisualTree {
    type Node = NodeKey;
    
    fn root(&self) -> NodeKey {
        self.root
    }
    
    fn create_node(&mut self, name: &str, parent: NodeKey) -> NodeKey {
        self.mutations += 1;
        let key = self.nodes.insert(VisualNode {
            name: name.to_string(),
            parent: Some(parent),
            ..VisualNode::default()
        });
        match self.nodes.get_mut(parent) {
            Some(p) => p.children.push(key),
            None => log::warn!("VisualTree: parent {parent:?} of '{name}' no longer exists"),
        }
        key
    }
    
    fn set_local_pose(&mut self, node: NodeKey, pose: &Transform) {
        if let Some(n) = self.node_mut(node) {
            n.pose = *pose;
        }
    }
    
    fn attach_geometry(&mut self, node: NodeKey, geometry: Geometry) {
        if let Some(n) = self.node_mut(node) {
            n.geometry.push(geometry);
        }
    }
    
    fn attach_texture(&mut self, node: NodeKey, texture: RgbaImage) {
        if let Some(n) = self.node_mut(node) {
            n.texture = Some(texture);
        }
    }
    
    fn attach_collider(&mut self, node: NodeKey, collider: Collider) {
        if let Some(n) = self.node_mut(node) {
            n.colliders.push(collider);
        }
    }
    
    fn attach_label(&mut self, node: NodeKey, label: Label) {
        if let Some(n) = self.node_mut(node) {
            n.label = Some(label);
        }
    }
    
    fn destroy_children(&mut self, node: NodeKey) {
        let Some(n) = self.node_mut(node) else { return };
        let mut pending = std::mem::take(&mut n.children);
        while let Some(key) = pending.pop() {
            if let Some(removed) = self.nodes.remove(key) {
                pending.extend(removed.children);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_parent() {
        let mut tree = VisualTree::default();
        let root = tree.root();
        let wall = tree.create_node("Wall", root);
        let label = tree.create_node("Label", wall);

        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.children(root), &[wall]);
        assert_eq!(tree.node(label).unwrap().parent, Some(wall));
        assert_eq!(tree.find_by_name("Wall").count(), 1);
    }

    #[test]
    fn test_destroy_children_is_recursive() {
        let mut tree = VisualTree::default();
        let root = tree.root();
        let a = tree.create_node("A", root);
        tree.create_node("A1", a);
        tree.create_node("B", root);

        tree.destroy_children(root);
        assert_eq!(tree.node_count(), 1);
        assert!(tree.children(root).is_empty());
        assert!(tree.node(a).is_none());
    }

    #[test]
    fn test_mutations_are_counted() {
        let mut tree = VisualTree::default();
        let root = tree.root();
        let node = tree.create_node("Floor", root);
        tree.set_local_pose(node, &Transform::identity());
        tree.attach_label(node, Label::new("Floor"));
        assert_eq!(tree.mutation_count(), 3);
        assert_eq!(tree.node(node).unwrap().label.as_ref().unwrap().offset.z, Label::DEPTH_OFFSET);
    }
}
