//=========================================================================
// Scene Root
//=========================================================================
//
// Ordered set of renderable nodes making up the world.
//
// Nodes are either plain named placeholders (proxies, lights) or hold an
// `Attachable` content object supplied by the application. Insertion
// order is render order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Attachable, Transform};

//=== NodeId ==============================================================

/// Stable identifier of a node inside one [`SceneRoot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

//=== SceneNode ===========================================================

/// A child of the scene root.
pub struct SceneNode {
    id: NodeId,
    name: String,
    pub transform: Transform,
    pub visible: bool,
    content: Option<Box<dyn Attachable>>,
}

impl SceneNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content object backing this node, if any.
    pub fn content(&self) -> Option<&dyn Attachable> {
        self.content.as_deref()
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("visible", &self.visible)
            .field("has_content", &self.content.is_some())
            .finish()
    }
}

//=== SceneRoot ===========================================================

/// The renderable world graph.
#[derive(Debug)]
pub struct SceneRoot {
    nodes: Vec<SceneNode>,
    next_id: u32,
    visible: bool,
}

impl SceneRoot {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            next_id: 0,
            visible: true,
        }
    }

    //--- Insertion --------------------------------------------------------

    /// Adds a content object; its name and initial transform come from it.
    pub fn add(&mut self, content: Box<dyn Attachable>) -> NodeId {
        let name = content.name().to_string();
        let transform = content.initial_transform();
        self.push(name, transform, Some(content))
    }

    /// Adds a plain named node with no content behind it.
    pub fn add_named(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        self.push(name.into(), transform, None)
    }

    fn push(
        &mut self,
        name: String,
        transform: Transform,
        content: Option<Box<dyn Attachable>>,
    ) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        debug!(target: "stage::scene", "Adding node {:?} '{}'", id, name);
        self.nodes.push(SceneNode {
            id,
            name,
            transform,
            visible: true,
            content,
        });
        id
    }

    //--- Removal ----------------------------------------------------------

    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        let pos = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(pos))
    }

    /// Removes every node called `name`. Returns how many were removed.
    pub fn remove_named(&mut self, name: &str) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.name != name);
        before - self.nodes.len()
    }

    //--- Lookup -----------------------------------------------------------

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    //--- Visibility -------------------------------------------------------

    /// Whole-scene visibility; a hidden scene renders nothing.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Nodes that would be drawn this frame.
    pub fn visible_nodes(&self) -> impl Iterator<Item = &SceneNode> {
        let scene_visible = self.visible;
        self.nodes.iter().filter(move |n| scene_visible && n.visible)
    }
}

impl Default for SceneRoot {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    struct Rock;

    impl Attachable for Rock {
        fn name(&self) -> &str {
            "rock"
        }

        fn initial_transform(&self) -> Transform {
            Transform::from_position(Vec3::new(1.0, 0.0, -2.0))
        }
    }

    #[test]
    fn add_preserves_insertion_order() {
        let mut scene = SceneRoot::new();
        scene.add_named("sky", Transform::IDENTITY);
        scene.add(Box::new(Rock));
        scene.add_named("ground", Transform::IDENTITY);

        let names: Vec<_> = scene.iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["sky", "rock", "ground"]);
    }

    #[test]
    fn content_supplies_name_and_transform() {
        let mut scene = SceneRoot::new();
        let id = scene.add(Box::new(Rock));
        let node = scene.node(id).unwrap();
        assert_eq!(node.name(), "rock");
        assert_eq!(node.transform.position, Vec3::new(1.0, 0.0, -2.0));
        assert!(node.content().is_some());
    }

    #[test]
    fn remove_named_removes_all_matches() {
        let mut scene = SceneRoot::new();
        scene.add_named("gamepad", Transform::IDENTITY);
        scene.add_named("gamepad", Transform::IDENTITY);
        scene.add_named("sun", Transform::IDENTITY);

        assert_eq!(scene.remove_named("gamepad"), 2);
        assert_eq!(scene.remove_named("gamepad"), 0);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn hidden_scene_has_no_visible_nodes() {
        let mut scene = SceneRoot::new();
        let a = scene.add_named("a", Transform::IDENTITY);
        scene.add_named("b", Transform::IDENTITY);
        scene.node_mut(a).unwrap().visible = false;

        assert_eq!(scene.visible_nodes().count(), 1);
        scene.set_visible(false);
        assert_eq!(scene.visible_nodes().count(), 0);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut scene = SceneRoot::new();
        let a = scene.add_named("a", Transform::IDENTITY);
        scene.remove(a);
        let b = scene.add_named("b", Transform::IDENTITY);
        assert_ne!(a, b);
        assert!(scene.node(a).is_none());
    }
}
