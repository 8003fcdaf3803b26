use std::collections::BTreeMap;

use glam::{EulerRot, Quat, Vec3};
use serde::Serialize;

use crate::animation::clip::AnimationClip;
use crate::humanoid::CanonicalJoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Per-axis Euler range (XYZ order, degrees) a joint covered across a corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JointEnvelope {
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub range: [f32; 3],
    /// Axis with the largest range; the earlier axis wins a tie.
    pub primary_axis: Axis,
}

impl JointEnvelope {
    fn from_bounds(min: Vec3, max: Vec3) -> Self {
        let range = max - min;
        let primary_axis = if range.x >= range.y && range.x >= range.z {
            Axis::X
        } else if range.y >= range.z {
            Axis::Y
        } else {
            Axis::Z
        };
        Self {
            min: min.to_array(),
            max: max.to_array(),
            range: range.to_array(),
            primary_axis,
        }
    }
}

/// Running min/max of joint Euler angles, keyed by track leaf name.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeAccumulator {
    bounds: BTreeMap<String, (Vec3, Vec3)>,
}

impl EnvelopeAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds every key of every rotation track in `clip`.
    pub fn add_clip(&mut self, clip: &AnimationClip) {
        for track in &clip.tracks {
            let (Some(keys), Some(binding)) = (track.as_quaternion(), track.binding()) else {
                continue;
            };
            for &rotation in &keys.values {
                self.add_rotation(binding.leaf(), rotation);
            }
        }
    }

    /// Folds one rotation into the bounds of `joint`. Canonical joint names
    /// are matched regardless of the case of their first letter, so `LeftUpperArm`
    /// and `leftUpperArm` share one envelope.
    pub fn add_rotation(&mut self, joint: &str, rotation: Quat) {
        let (x, y, z) = rotation.normalize().to_euler(EulerRot::XYZ);
        let euler = Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees());
        if !euler.is_finite() {
            log::trace!("Skipping non-finite rotation for '{joint}'");
            return;
        }

        let key = envelope_key(joint);
        match self.bounds.get_mut(key.as_str()) {
            Some((min, max)) => {
                *min = min.min(euler);
                *max = max.max(euler);
            }
            None => {
                self.bounds.insert(key, (euler, euler));
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.bounds.len()
    }

    #[must_use]
    pub fn finish(&self) -> BTreeMap<String, JointEnvelope> {
        self.bounds
            .iter()
            .map(|(name, &(min, max))| (name.clone(), JointEnvelope::from_bounds(min, max)))
            .collect()
    }
}

/// Canonical joint name for `leaf` when it is one, the leaf itself otherwise.
fn envelope_key(leaf: &str) -> String {
    let mut chars = leaf.chars();
    let camel = chars.next().map_or_else(String::new, |first| {
        first.to_ascii_lowercase().to_string() + chars.as_str()
    });
    camel
        .parse::<CanonicalJoint>()
        .map_or_else(|_| leaf.to_string(), |joint| joint.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_fold_scene_and_canonical_spellings() {
        assert_eq!(envelope_key("LeftUpperArm"), "leftUpperArm");
        assert_eq!(envelope_key("leftUpperArm"), "leftUpperArm");
        assert_eq!(envelope_key("mixamorigSpine"), "mixamorigSpine");
    }

    #[test]
    fn tie_prefers_earlier_axis() {
        let envelope = JointEnvelope::from_bounds(Vec3::ZERO, Vec3::new(0.0, 10.0, 10.0));
        assert_eq!(envelope.primary_axis, Axis::Y);
    }

    #[test]
    fn unnormalized_input_is_normalized() {
        let mut acc = EnvelopeAccumulator::new();
        acc.add_rotation("head", Quat::from_rotation_x(0.5) * 3.0);
        let envelope = &acc.finish()["head"];
        assert!((envelope.min[0] - 0.5_f32.to_degrees()).abs() < 1e-3);
    }
}
