//! Pose snapshots
//!
//! A pose snapshot is a single static pose keyed by canonical joint name:
//!
//! ```json
//! { "sceneRotation": { "x": 0, "y": 180, "z": 0 },
//!   "vrmPose": { "leftUpperArm": { "rotation": [0, 0, 0.38, 0.92] },
//!                "hips": { "rotation": [0, 0, 0, 1], "position": [0, 0.9, 0] } } }
//! ```
//!
//! Rotations are `[x, y, z, w]` local rotations of the normalized rig; the
//! optional scene rotation is XYZ Euler in degrees and applies to the rig root.

use std::collections::BTreeMap;

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::binding::{TargetPath, track_name};
use crate::animation::clip::{AnimationClip, Track, TrackData};
use crate::animation::tracks::KeyframeTrack;
use crate::errors::{Result, RetargetError};
use crate::humanoid::{CanonicalJoint, HumanoidRig};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneRotation {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonePose {
    pub rotation: [f32; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 3]>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_rotation: Option<SceneRotation>,
    pub vrm_pose: BTreeMap<String, BonePose>,
}

/// Counts from [`apply_pose`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoseApplication {
    pub applied: usize,
    /// Joint names that are unknown or not mapped on the rig.
    pub skipped: Vec<String>,
}

impl PoseSnapshot {
    /// Parses and validates snapshot JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: PoseSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.vrm_pose.is_empty() {
            return Err(RetargetError::invalid_pose("no vrmPose entries"));
        }
        for (name, bone) in &self.vrm_pose {
            let finite = bone.rotation.iter().all(|v| v.is_finite())
                && bone.position.is_none_or(|p| p.iter().all(|v| v.is_finite()));
            if !finite {
                return Err(RetargetError::invalid_pose(format!(
                    "'{name}' has a non-finite component"
                )));
            }
            if Quat::from_array(bone.rotation).length_squared() < 1e-8 {
                return Err(RetargetError::invalid_pose(format!(
                    "'{name}' has a zero-length rotation"
                )));
            }
        }
        if let Some(r) = self.scene_rotation
            && !(r.x.is_finite() && r.y.is_finite() && r.z.is_finite())
        {
            return Err(RetargetError::invalid_pose("non-finite sceneRotation"));
        }
        Ok(())
    }

    /// Scene rotation as a quaternion (identity when absent).
    #[must_use]
    pub fn scene_rotation_quat(&self) -> Quat {
        self.scene_rotation.map_or(Quat::IDENTITY, |r| {
            Quat::from_euler(
                EulerRot::XYZ,
                r.x.to_radians(),
                r.y.to_radians(),
                r.z.to_radians(),
            )
        })
    }

    /// Single-key canonical clip (t = 0) holding this pose. Unknown joint names are left out.
    #[must_use]
    pub fn to_clip(&self, name: &str) -> AnimationClip {
        let mut tracks = Vec::new();
        for (joint_name, bone) in &self.vrm_pose {
            let Ok(joint) = joint_name.parse::<CanonicalJoint>() else {
                continue;
            };
            let rotation = Quat::from_array(bone.rotation).normalize();
            tracks.push(Track::new(
                track_name(joint.as_str(), TargetPath::Rotation),
                TrackData::Quaternion(KeyframeTrack::linear(vec![0.0], vec![rotation])),
            ));
            if let Some(position) = bone.position {
                tracks.push(Track::new(
                    track_name(joint.as_str(), TargetPath::Translation),
                    TrackData::Vector3(KeyframeTrack::linear(
                        vec![0.0],
                        vec![Vec3::from_array(position)],
                    )),
                ));
            }
        }
        AnimationClip::new(name, tracks)
    }
}

/// Writes the snapshot's local rotations (and positions) onto the rig's bones.
///
/// The snapshot is validated first; nothing is written when it is rejected.
pub fn apply_pose(rig: &mut HumanoidRig, pose: &PoseSnapshot) -> Result<PoseApplication> {
    pose.validate()?;
    let mut result = PoseApplication::default();

    if pose.scene_rotation.is_some() {
        let root = rig.root();
        if let Some(node) = rig.skeleton.get_mut(root) {
            node.transform.rotation = pose.scene_rotation_quat();
        }
    }

    for (joint_name, bone) in &pose.vrm_pose {
        let Some(node) = joint_name
            .parse::<CanonicalJoint>()
            .ok()
            .and_then(|joint| rig.node(joint))
        else {
            log::warn!("No rig bone for pose entry '{joint_name}'");
            result.skipped.push(joint_name.clone());
            continue;
        };
        let Some(node) = rig.skeleton.get_mut(node) else {
            result.skipped.push(joint_name.clone());
            continue;
        };

        node.transform.rotation = Quat::from_array(bone.rotation).normalize();
        if let Some(position) = bone.position {
            node.transform.position = Vec3::from_array(position);
        }
        result.applied += 1;
    }

    log::info!(
        "Applied pose to {} bones, skipped {}",
        result.applied,
        result.skipped.len()
    );
    Ok(result)
}

/// Reads the current local rotation of every mapped joint; hips also record position.
#[must_use]
pub fn capture_pose(rig: &HumanoidRig) -> PoseSnapshot {
    let vrm_pose = rig
        .joints()
        .filter_map(|(joint, handle)| {
            let node = rig.skeleton.get(handle)?;
            let position = (joint == CanonicalJoint::Hips).then(|| node.transform.position.to_array());
            Some((
                joint.as_str().to_string(),
                BonePose {
                    rotation: node.transform.rotation.to_array(),
                    position,
                },
            ))
        })
        .collect();

    let scene_rotation = rig
        .skeleton
        .get(rig.root())
        .map(|root| root.transform)
        .filter(|t| t.rotation.angle_between(Quat::IDENTITY) > 1e-6)
        .map(|t| {
            let euler = t.rotation_euler();
            SceneRotation {
                x: euler.x.to_degrees(),
                y: euler.y.to_degrees(),
                z: euler.z.to_degrees(),
            }
        });

    PoseSnapshot {
        scene_rotation,
        vrm_pose,
    }
}
