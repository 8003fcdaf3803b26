//! Rest-pose delta correction.
//!
//! A rotation key recorded on a source bone is relative to that bone's own
//! rest orientation. VRM normalized bones all share an identity rest frame,
//! so each key is re-expressed through the source bone's rest world rotation
//! and its parent's rest world rotation before it can drive the target.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::{NodeHandle, Skeleton};

/// How the rest-pose correction is composed with an animated key `r`.
///
/// `P` is the parent's rest world rotation, `R⁻¹` the inverse of the bone's
/// own rest world rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositionOrder {
    /// `P · r · R⁻¹`
    #[default]
    Conjugate,
    /// `P · R⁻¹ · r`
    ParentThenRest,
    /// `R⁻¹ · P · r`
    RestThenParent,
}

/// Correction for one source bone, captured while the source skeleton is in rest pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestPoseCorrection {
    pub parent_rest_world: Quat,
    pub rest_inverse: Quat,
    pub order: CompositionOrder,
    /// Negate x and z of every corrected key (VRM 0.x targets).
    pub flip_axes: bool,
}

impl RestPoseCorrection {
    /// Reads the rest world rotations of `node` and its parent.
    #[must_use]
    pub fn capture(skeleton: &Skeleton, node: NodeHandle, order: CompositionOrder) -> Self {
        let rest_world = skeleton.world_rotation(node);
        let parent_rest_world = skeleton
            .parent(node)
            .map_or(Quat::IDENTITY, |parent| skeleton.world_rotation(parent));

        Self {
            parent_rest_world,
            rest_inverse: rest_world.inverse(),
            order,
            flip_axes: false,
        }
    }

    #[must_use]
    pub fn with_axis_flip(mut self, flip_axes: bool) -> Self {
        self.flip_axes = flip_axes;
        self
    }

    /// Applies the correction (and the axis flip, after it) to one key.
    #[must_use]
    pub fn correct(&self, r: Quat) -> Quat {
        let p = self.parent_rest_world;
        let inv = self.rest_inverse;
        let corrected = match self.order {
            CompositionOrder::Conjugate => p * r * inv,
            CompositionOrder::ParentThenRest => p * inv * r,
            CompositionOrder::RestThenParent => inv * p * r,
        }
        .normalize();

        if self.flip_axes {
            flip_quaternion(corrected)
        } else {
            corrected
        }
    }
}

/// Handedness flip for VRM 0.x: negates x and z, i.e. a half turn about Y.
#[inline]
#[must_use]
pub fn flip_quaternion(q: Quat) -> Quat {
    Quat::from_xyzw(-q.x, q.y, -q.z, q.w)
}

/// Handedness flip for translation keys: negates x only.
#[inline]
#[must_use]
pub fn flip_translation(v: Vec3) -> Vec3 {
    Vec3::new(-v.x, v.y, v.z)
}
