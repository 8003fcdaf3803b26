use glam::Vec3;

use crate::retarget::rest::flip_translation;
use crate::scene::{NodeHandle, Skeleton};

/// Absolute vertical offset of `hips` from the skeleton root, in world space.
#[must_use]
pub fn hip_height(skeleton: &Skeleton, hips: NodeHandle) -> f32 {
    let root = skeleton.world_position(skeleton.root());
    (skeleton.world_position(hips).y - root.y).abs()
}

/// Uniform scale applied to translation keys, plus the optional handedness flip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMotionScale {
    pub factor: f32,
    pub flip_x: bool,
}

impl Default for RootMotionScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RootMotionScale {
    pub const IDENTITY: Self = Self {
        factor: 1.0,
        flip_x: false,
    };

    /// `|target| / |source|`, or 1 when the source height is zero.
    #[must_use]
    pub fn from_heights(source_hip_height: f32, target_hip_height: f32) -> Self {
        let source = source_hip_height.abs();
        let factor = if source > f32::EPSILON && source.is_finite() {
            target_hip_height.abs() / source
        } else {
            1.0
        };
        Self {
            factor,
            flip_x: false,
        }
    }

    #[must_use]
    pub fn with_flip(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }

    #[must_use]
    pub fn apply(&self, v: Vec3) -> Vec3 {
        let scaled = v * self.factor;
        if self.flip_x {
            flip_translation(scaled)
        } else {
            scaled
        }
    }
}
