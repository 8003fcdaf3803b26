//! Clip Retargeter
//!
//! Converts a source clip (arbitrary bone names, source rest pose) into a
//! canonical clip whose tracks are named `<canonicalJoint>.<property>` and
//! whose rotations are expressed for a normalized VRM rig.
//!
//! # Progress
//!
//! [`Retargeter::conversions`] yields one [`TrackConversion`] per source
//! track, in source order, so callers can drive progress UI or stop early.
//! [`Retargeter::retarget`] drains that iterator into a [`RetargetResult`].
//!
//! ```rust,ignore
//! let retargeter = Retargeter::new(Arc::new(JointAliasTable::standard()));
//! let result = retargeter.retarget(&clip, &mixamo_skeleton, &vrm_rig)?;
//! assert!(result.tracks_converted > 0);
//! ```

use std::fmt;
use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::binding::{TargetPath, track_name};
use crate::animation::clip::{AnimationClip, Track, TrackData};
use crate::animation::tracks::KeyframeTrack;
use crate::errors::{Result, RetargetError};
use crate::humanoid::{CanonicalJoint, HumanoidRig, JointAliasTable};
use crate::retarget::rest::{CompositionOrder, RestPoseCorrection};
use crate::retarget::root_motion::{RootMotionScale, hip_height};
use crate::scene::{NodeHandle, Skeleton};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Retargeting configuration.
///
/// ```rust,ignore
/// let options = RetargetOptions {
///     composition_order: CompositionOrder::ParentThenRest,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetargetOptions {
    /// Composition of the rest-pose correction with each rotation key.
    pub composition_order: CompositionOrder,
    /// Scale translation keys by the target/source hip height ratio.
    pub rescale_root_motion: bool,
    /// Apply the VRM 0.x handedness flip when the target asks for it.
    pub axis_flip: bool,
}

impl Default for RetargetOptions {
    fn default() -> Self {
        Self {
            composition_order: CompositionOrder::default(),
            rescale_root_motion: true,
            axis_flip: true,
        }
    }
}

impl RetargetOptions {
    #[must_use]
    pub fn with_composition_order(mut self, order: CompositionOrder) -> Self {
        self.composition_order = order;
        self
    }

    #[must_use]
    pub fn with_root_motion_rescale(mut self, enabled: bool) -> Self {
        self.rescale_root_motion = enabled;
        self
    }

    #[must_use]
    pub fn with_axis_flip(mut self, enabled: bool) -> Self {
        self.axis_flip = enabled;
        self
    }
}

// ---------------------------------------------------------------------------
// Per-track outcomes
// ---------------------------------------------------------------------------

/// A track aimed at a required joint that the target rig does not have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFailure {
    pub track: String,
    pub joint: CanonicalJoint,
}

impl fmt::Display for TrackFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "track '{}': target rig has no '{}' bone",
            self.track, self.joint
        )
    }
}

/// Why a track was dropped without counting as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No property suffix, or the bone name matches no joint.
    UnresolvedName,
    /// The joint resolved but the source skeleton has no such bone.
    MissingSourceBone(CanonicalJoint),
    /// The keyframe type does not fit the property, e.g. vectors on `.quaternion`.
    KindMismatch(CanonicalJoint),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    Converted(Track),
    Ignored(IgnoreReason),
    SkippedOptional(CanonicalJoint),
    Failed(TrackFailure),
}

/// Progress event for one source track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackConversion {
    /// Position of the track in the source clip.
    pub index: usize,
    /// Number of tracks in the source clip.
    pub total: usize,
    pub source_track: String,
    pub outcome: TrackOutcome,
}

/// Canonical clip plus per-track diagnostics.
#[derive(Debug, Clone)]
pub struct RetargetResult {
    pub clip: AnimationClip,
    pub tracks_converted: usize,
    pub tracks_skipped_optional: usize,
    pub tracks_ignored: usize,
    pub failures: Vec<TrackFailure>,
}

impl RetargetResult {
    /// `true` when no required joint was missing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Retargeter
// ---------------------------------------------------------------------------

/// Stateless retargeting service. Holds only the shared alias table and
/// options, so one instance can serve many clip/skeleton pairs concurrently.
#[derive(Debug, Clone)]
pub struct Retargeter {
    aliases: Arc<JointAliasTable>,
    options: RetargetOptions,
}

impl Retargeter {
    #[must_use]
    pub fn new(aliases: Arc<JointAliasTable>) -> Self {
        Self {
            aliases,
            options: RetargetOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RetargetOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &RetargetOptions {
        &self.options
    }

    #[inline]
    #[must_use]
    pub fn aliases(&self) -> &Arc<JointAliasTable> {
        &self.aliases
    }

    /// Per-track conversion events. Rest transforms and the root-motion scale
    /// are captured here, so both skeletons must be in rest pose.
    #[must_use]
    pub fn conversions<'a>(
        &'a self,
        clip: &'a AnimationClip,
        source: &'a Skeleton,
        target: &'a HumanoidRig,
    ) -> TrackConversions<'a> {
        let flip = self.options.axis_flip && target.version.needs_axis_flip();
        let root_scale = if self.options.rescale_root_motion {
            self.root_motion_scale(source, target)
        } else {
            RootMotionScale::IDENTITY
        };

        TrackConversions {
            retargeter: self,
            clip,
            source,
            target,
            root_scale: root_scale.with_flip(flip),
            flip,
            next: 0,
        }
    }

    /// Retargets every track of `clip` onto `target`.
    ///
    /// Fails with [`RetargetError::NoTracksConverted`] when a non-empty clip
    /// produced no track at all.
    pub fn retarget(
        &self,
        clip: &AnimationClip,
        source: &Skeleton,
        target: &HumanoidRig,
    ) -> Result<RetargetResult> {
        let mut tracks = Vec::with_capacity(clip.tracks.len());
        let mut tracks_skipped_optional = 0;
        let mut tracks_ignored = 0;
        let mut failures = Vec::new();

        for event in self.conversions(clip, source, target) {
            match event.outcome {
                TrackOutcome::Converted(track) => tracks.push(track),
                TrackOutcome::Ignored(_) => tracks_ignored += 1,
                TrackOutcome::SkippedOptional(_) => tracks_skipped_optional += 1,
                TrackOutcome::Failed(failure) => failures.push(failure),
            }
        }

        if tracks.is_empty() && !clip.tracks.is_empty() {
            return Err(RetargetError::NoTracksConverted {
                clip: clip.name.clone(),
                source_tracks: clip.tracks.len(),
                failures,
            });
        }

        log::info!(
            "Retargeted '{}': {} converted, {} optional skipped, {} ignored, {} failed",
            clip.name,
            tracks.len(),
            tracks_skipped_optional,
            tracks_ignored,
            failures.len()
        );

        let tracks_converted = tracks.len();
        Ok(RetargetResult {
            clip: AnimationClip::with_duration(clip.name.clone(), clip.duration, tracks),
            tracks_converted,
            tracks_skipped_optional,
            tracks_ignored,
            failures,
        })
    }

    fn root_motion_scale(&self, source: &Skeleton, target: &HumanoidRig) -> RootMotionScale {
        let source_hips = find_joint(source, &self.aliases, CanonicalJoint::Hips);
        let target_hips = target.node(CanonicalJoint::Hips);

        match (source_hips, target_hips) {
            (Some(s), Some(t)) => RootMotionScale::from_heights(
                hip_height(source, s),
                hip_height(&target.skeleton, t),
            ),
            _ => {
                log::debug!("Hips missing on source or target; root motion is not rescaled");
                RootMotionScale::IDENTITY
            }
        }
    }
}

/// First node (pre-order) whose name resolves to `joint`.
#[must_use]
pub fn find_joint(
    skeleton: &Skeleton,
    aliases: &JointAliasTable,
    joint: CanonicalJoint,
) -> Option<NodeHandle> {
    skeleton.descendants(skeleton.root()).find(|&h| {
        skeleton
            .name(h)
            .and_then(|name| aliases.resolve_node_name(name))
            == Some(joint)
    })
}

// ---------------------------------------------------------------------------
// Conversion iterator
// ---------------------------------------------------------------------------

/// Iterator returned by [`Retargeter::conversions`].
pub struct TrackConversions<'a> {
    retargeter: &'a Retargeter,
    clip: &'a AnimationClip,
    source: &'a Skeleton,
    target: &'a HumanoidRig,
    root_scale: RootMotionScale,
    flip: bool,
    next: usize,
}

impl TrackConversions<'_> {
    fn convert(&self, track: &Track) -> TrackOutcome {
        let Some(resolved) = self.retargeter.aliases.resolve_track(&track.name) else {
            log::trace!("Ignoring track '{}': no humanoid joint", track.name);
            return TrackOutcome::Ignored(IgnoreReason::UnresolvedName);
        };
        let joint = resolved.joint;
        let target = resolved.binding.target;

        if self.target.node(joint).is_none() {
            if joint.is_optional() {
                log::debug!("Skipping '{}': optional joint {joint} not on target", track.name);
                return TrackOutcome::SkippedOptional(joint);
            }
            log::warn!("Track '{}': required joint {joint} missing on target", track.name);
            return TrackOutcome::Failed(TrackFailure {
                track: track.name.clone(),
                joint,
            });
        }

        let kind_fits = matches!(
            (&track.data, target),
            (TrackData::Quaternion(_), TargetPath::Rotation)
                | (TrackData::Vector3(_), TargetPath::Translation | TargetPath::Scale)
                | (TrackData::Scalar(_), TargetPath::Weights)
        );
        if !kind_fits {
            log::warn!(
                "Dropping '{}': {} keys do not fit .{}",
                track.name,
                track.data.kind_name(),
                target.property()
            );
            return TrackOutcome::Ignored(IgnoreReason::KindMismatch(joint));
        }

        let Some(bone) = self.source.find_by_path(resolved.binding.node_path) else {
            log::debug!(
                "Dropping '{}': bone '{}' not in source skeleton",
                track.name,
                resolved.binding.leaf()
            );
            return TrackOutcome::Ignored(IgnoreReason::MissingSourceBone(joint));
        };

        let name = track_name(joint.as_str(), target);
        let data = match &track.data {
            TrackData::Quaternion(keys) => TrackData::Quaternion(self.correct_rotation(keys, bone)),
            TrackData::Vector3(keys) if target == TargetPath::Translation => {
                TrackData::Vector3(self.rescale_translation(keys))
            }
            data => data.clone(),
        };

        TrackOutcome::Converted(Track::new(name, data))
    }

    fn correct_rotation(&self, keys: &KeyframeTrack<Quat>, bone: NodeHandle) -> KeyframeTrack<Quat> {
        let correction = RestPoseCorrection::capture(
            self.source,
            bone,
            self.retargeter.options.composition_order,
        )
        .with_axis_flip(self.flip);
        keys.map_values(|&r| correction.correct(r))
    }

    fn rescale_translation(&self, keys: &KeyframeTrack<Vec3>) -> KeyframeTrack<Vec3> {
        keys.map_values(|&v| self.root_scale.apply(v))
    }
}

impl Iterator for TrackConversions<'_> {
    type Item = TrackConversion;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next;
        let track = self.clip.tracks.get(index)?;
        self.next += 1;

        Some(TrackConversion {
            index,
            total: self.clip.tracks.len(),
            source_track: track.name.clone(),
            outcome: self.convert(track),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.clip.tracks.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrackConversions<'_> {}
