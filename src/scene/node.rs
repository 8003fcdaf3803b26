use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// A named bone in a [`Skeleton`](crate::scene::Skeleton) hierarchy.
///
/// # Hierarchy
///
/// - `parent`: handle to the parent node (`None` for the skeleton root)
/// - `children`: child handles in insertion order
///
/// The pipeline never creates or destroys nodes of a loaded skeleton; it only
/// reads transforms, and pose application writes local rotation/position.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    pub transform: Transform,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
        }
    }

    #[must_use]
    pub fn with_transform(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            transform,
            ..Self::new(name)
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}
