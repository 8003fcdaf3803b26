//! Clip Serialization Codec
//!
//! Lossless JSON form of an [`AnimationClip`]:
//!
//! ```json
//! { "name": "Walk", "duration": 1.0,
//!   "tracks": [{ "name": "hips.quaternion", "type": "quaternion",
//!                "times": [0, 1], "values": [0, 0, 0, 1, 0, 0, 0, 1] }] }
//! ```
//!
//! Values are flat `f32` arrays (4 per key for quaternions, 3 for vectors,
//! 1 for numbers). serde_json writes `f32` in its shortest round-trip form,
//! so `deserialize(&serialize(clip))` reproduces every number exactly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::animation::clip::{AnimationClip, Track, TrackData};
use crate::animation::tracks::KeyframeTrack;
use crate::animation::values::{KeyframeValue, flatten, unflatten};
use crate::errors::{Result, RetargetError};

/// Wire type tag of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    #[serde(alias = "rotation")]
    Quaternion,
    #[serde(alias = "translation")]
    Vector,
    #[serde(alias = "scalar")]
    Number,
}

impl TrackKind {
    #[must_use]
    pub const fn components(self) -> usize {
        match self {
            TrackKind::Quaternion => 4,
            TrackKind::Vector => 3,
            TrackKind::Number => 1,
        }
    }

    #[must_use]
    pub fn of(data: &TrackData) -> Self {
        match data {
            TrackData::Quaternion(_) => TrackKind::Quaternion,
            TrackData::Vector3(_) => TrackKind::Vector,
            TrackData::Scalar(_) => TrackKind::Number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedTrack {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub times: Vec<f32>,
    pub values: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<SerializedTrack>,
}

#[must_use]
pub fn serialize(clip: &AnimationClip) -> SerializedClip {
    let tracks = clip
        .tracks
        .iter()
        .map(|track| {
            let (times, values) = match &track.data {
                TrackData::Quaternion(t) => (t.times.clone(), flatten(&t.values)),
                TrackData::Vector3(t) => (t.times.clone(), flatten(&t.values)),
                TrackData::Scalar(t) => (t.times.clone(), t.values.clone()),
            };
            SerializedTrack {
                name: track.name.clone(),
                kind: TrackKind::of(&track.data),
                times,
                values,
            }
        })
        .collect();

    SerializedClip {
        name: clip.name.clone(),
        duration: clip.duration,
        tracks,
    }
}

/// Rebuilds a clip, rejecting the whole clip if any track is malformed.
pub fn deserialize(data: &SerializedClip) -> Result<AnimationClip> {
    if !data.duration.is_finite() || data.duration < 0.0 {
        return Err(RetargetError::invalid_clip(format!(
            "clip '{}' has invalid duration {}",
            data.name, data.duration
        )));
    }

    let tracks = data
        .tracks
        .iter()
        .map(deserialize_track)
        .collect::<Result<Vec<_>>>()?;

    Ok(AnimationClip::with_duration(
        data.name.clone(),
        data.duration,
        tracks,
    ))
}

fn deserialize_track(track: &SerializedTrack) -> Result<Track> {
    let components = track.kind.components();
    if track.values.len() != track.times.len() * components {
        return Err(RetargetError::invalid_clip(format!(
            "track '{}': expected {} values for {} keys of type {:?}, found {}",
            track.name,
            track.times.len() * components,
            track.times.len(),
            track.kind,
            track.values.len()
        )));
    }
    if let Some(bad) = track
        .times
        .iter()
        .chain(&track.values)
        .find(|v| !v.is_finite())
    {
        return Err(RetargetError::invalid_clip(format!(
            "track '{}' contains non-finite number {bad}",
            track.name
        )));
    }
    if track.times.windows(2).any(|w| w[1] < w[0]) {
        return Err(RetargetError::invalid_clip(format!(
            "track '{}' has decreasing key times",
            track.name
        )));
    }

    let data = match track.kind {
        TrackKind::Quaternion => TrackData::Quaternion(rebuild(track)?),
        TrackKind::Vector => TrackData::Vector3(rebuild(track)?),
        TrackKind::Number => TrackData::Scalar(rebuild(track)?),
    };
    Ok(Track::new(track.name.clone(), data))
}

fn rebuild<T: KeyframeValue>(track: &SerializedTrack) -> Result<KeyframeTrack<T>> {
    let values = unflatten::<T>(&track.values).ok_or_else(|| {
        RetargetError::invalid_clip(format!("track '{}' has a partial key", track.name))
    })?;
    Ok(KeyframeTrack::linear(track.times.clone(), values))
}

/// Structural check only: required fields exist with the right JSON types.
/// Does not check that track names resolve to any bone.
#[must_use]
pub fn is_valid_animation_data(data: &Value) -> bool {
    let Some(obj) = data.as_object() else {
        return false;
    };
    let has_header = obj.get("name").is_some_and(Value::is_string)
        && obj.get("duration").is_some_and(Value::is_number);
    let Some(tracks) = obj.get("tracks").and_then(Value::as_array) else {
        return false;
    };

    has_header
        && tracks.iter().all(|track| {
            track.as_object().is_some_and(|t| {
                t.get("name").is_some_and(Value::is_string)
                    && t.get("type").is_some_and(Value::is_string)
                    && t.get("times").is_some_and(Value::is_array)
                    && t.get("values").is_some_and(Value::is_array)
            })
        })
}

/// Parses clip JSON, validating structure before building anything.
pub fn from_json_str(json: &str) -> Result<AnimationClip> {
    let value: Value = serde_json::from_str(json)?;
    from_json_value(value)
}

pub fn from_json_value(value: Value) -> Result<AnimationClip> {
    if !is_valid_animation_data(&value) {
        return Err(RetargetError::invalid_clip(
            "expected { name, duration, tracks: [{ name, type, times, values }] }",
        ));
    }
    let data: SerializedClip = serde_json::from_value(value)?;
    deserialize(&data)
}

pub fn to_json_string(clip: &AnimationClip) -> Result<String> {
    Ok(serde_json::to_string(&serialize(clip))?)
}
