use glam::{Quat, Vec3};

use crate::animation::binding::TrackBinding;
use crate::animation::tracks::KeyframeTrack;

/// Keyframe payload of a track, tagged by value type.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
    Scalar(KeyframeTrack<f32>),
}

impl TrackData {
    #[must_use]
    pub fn times(&self) -> &[f32] {
        match self {
            TrackData::Vector3(t) => &t.times,
            TrackData::Quaternion(t) => &t.times,
            TrackData::Scalar(t) => &t.times,
        }
    }

    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times().last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn key_count(&self) -> usize {
        self.times().len()
    }

    /// Short name of the value type, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            TrackData::Vector3(_) => "vector",
            TrackData::Quaternion(_) => "quaternion",
            TrackData::Scalar(_) => "number",
        }
    }
}

/// A named track: `"<node path>.<property>"` plus its keyframes.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub data: TrackData,
}

impl Track {
    #[must_use]
    pub fn new(name: impl Into<String>, data: TrackData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Node path and property of this track, if the name carries a known property.
    #[must_use]
    pub fn binding(&self) -> Option<TrackBinding<'_>> {
        TrackBinding::parse(&self.name)
    }

    #[must_use]
    pub fn as_quaternion(&self) -> Option<&KeyframeTrack<Quat>> {
        match &self.data {
            TrackData::Quaternion(t) => Some(t),
            _ => None,
        }
    }
}

/// An immutable animation clip. Pipeline stages build new clips instead of
/// editing existing ones.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Builds a clip whose duration is the last keyframe time over all tracks.
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = max_end_time(&tracks);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Builds a clip with an explicit duration, extended if any track runs longer.
    #[must_use]
    pub fn with_duration(name: impl Into<String>, duration: f32, tracks: Vec<Track>) -> Self {
        let duration = duration.max(max_end_time(&tracks));
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    #[must_use]
    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn max_end_time(tracks: &[Track]) -> f32 {
    tracks
        .iter()
        .map(|t| t.data.end_time())
        .fold(0.0_f32, f32::max)
}
