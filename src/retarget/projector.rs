//! Scene-Path Projector
//!
//! Playback binds tracks through hierarchical node paths, not joint names.
//! The projector rewrites `leftUpperArm.quaternion` into
//! `Armature/Hips/Spine/.../LeftUpperArm.quaternion` by walking parent links
//! from the joint's node up to (excluding) the rig's skeleton root.

use crate::animation::binding::track_name;
use crate::animation::clip::{AnimationClip, Track};
use crate::errors::{Result, RetargetError};
use crate::humanoid::{CanonicalJoint, HumanoidRig};

/// Output of [`project_to_scene_paths`].
#[derive(Debug, Clone)]
pub struct ProjectedClip {
    pub clip: AnimationClip,
    /// Names of the canonical tracks that could not be projected.
    pub dropped: Vec<String>,
    pub input_tracks: usize,
}

impl ProjectedClip {
    /// Fraction of input tracks that survived projection.
    #[must_use]
    pub fn coverage(&self) -> f32 {
        if self.input_tracks == 0 {
            return 0.0;
        }
        self.clip.tracks.len() as f32 / self.input_tracks as f32
    }

    /// `true` when fewer than half of the input tracks survived.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.clip.tracks.len() * 2 < self.input_tracks
    }
}

/// Rewrites a canonical clip into scene-path track names for `rig`.
///
/// Fails when no track survives, or when a surviving name has no `/`
/// (the joint node is a direct child of the root, which means the rig's
/// root does not sit above the armature).
pub fn project_to_scene_paths(clip: &AnimationClip, rig: &HumanoidRig) -> Result<ProjectedClip> {
    let root = rig.root();
    let mut tracks = Vec::with_capacity(clip.tracks.len());
    let mut dropped = Vec::new();

    for track in &clip.tracks {
        let path = track.binding().and_then(|binding| {
            let joint = binding.node_path.parse::<CanonicalJoint>().ok()?;
            let node = rig.node(joint)?;
            let path = rig.skeleton.path_from(root, node)?;
            Some(track_name(&path, binding.target))
        });

        match path {
            Some(name) => tracks.push(Track::new(name, track.data.clone())),
            None => {
                log::warn!("Dropping '{}': no scene path under the rig root", track.name);
                dropped.push(track.name.clone());
            }
        }
    }

    if tracks.is_empty() {
        return Err(RetargetError::ProjectionEmpty {
            clip: clip.name.clone(),
        });
    }
    if let Some(bad) = tracks.iter().find(|t| !t.name.contains('/')) {
        return Err(RetargetError::PathWithoutSeparator {
            track: bad.name.clone(),
        });
    }

    let projected = ProjectedClip {
        clip: AnimationClip::with_duration(clip.name.clone(), clip.duration, tracks),
        dropped,
        input_tracks: clip.tracks.len(),
    };

    if projected.is_partial() {
        log::warn!(
            "Projected only {}/{} tracks of '{}'",
            projected.clip.tracks.len(),
            projected.input_tracks,
            clip.name
        );
    }

    Ok(projected)
}
