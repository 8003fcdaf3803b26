//! Skeleton scene graph
//!
//! The minimal hierarchy the retargeting pipeline reads from:
//! - Node: named bone with a parent link and local transform
//! - Transform: local position, rotation and scale
//! - Skeleton: node storage with world-space and scene-path queries

pub mod node;
pub mod transform;
pub mod skeleton;

pub use node::Node;
pub use transform::Transform;
pub use skeleton::Skeleton;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
