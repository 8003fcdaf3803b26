//! Clip Codec Tests
//!
//! Tests for:
//! - Exact JSON round trip of every track type
//! - Wire layout (type tags, flat values)
//! - Rejection of malformed clips
//! - is_valid_animation_data structural checks

use glam::{EulerRot, Quat, Vec3};
use serde_json::json;

use vrm_retarget::animation::clip::{AnimationClip, Track, TrackData};
use vrm_retarget::animation::codec::{
    self, SerializedClip, SerializedTrack, TrackKind, is_valid_animation_data,
};
use vrm_retarget::animation::tracks::KeyframeTrack;
use vrm_retarget::RetargetError;

fn sample_clip() -> AnimationClip {
    let third = 1.0_f32 / 3.0;
    AnimationClip::with_duration(
        "Walk Cycle",
        1.25,
        vec![
            Track::new(
                "leftUpperArm.quaternion",
                TrackData::Quaternion(KeyframeTrack::linear(
                    vec![0.0, third, 1.0],
                    vec![
                        Quat::IDENTITY,
                        Quat::from_euler(EulerRot::XYZ, 0.1, -0.7, 0.33),
                        Quat::from_rotation_z(1.2),
                    ],
                )),
            ),
            Track::new(
                "hips.position",
                TrackData::Vector3(KeyframeTrack::linear(
                    vec![0.0, 0.1],
                    vec![Vec3::new(0.0, 0.95, 0.0), Vec3::new(-0.013, 0.9712, 0.1)],
                )),
            ),
            Track::new(
                "Face.morphTargetInfluences",
                TrackData::Scalar(KeyframeTrack::linear(vec![0.5], vec![third])),
            ),
        ],
    )
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn json_round_trip_is_exact() {
    let clip = sample_clip();
    let json = codec::to_json_string(&clip).unwrap();
    let back = codec::from_json_str(&json).unwrap();
    assert_eq!(back, clip);
}

#[test]
fn serialized_form_round_trips() {
    let clip = sample_clip();
    let back = codec::deserialize(&codec::serialize(&clip)).unwrap();
    assert_eq!(back, clip);
}

#[test]
fn wire_layout() {
    let value = serde_json::to_value(codec::serialize(&sample_clip())).unwrap();
    assert_eq!(value["name"], "Walk Cycle");
    assert_eq!(value["tracks"][0]["type"], "quaternion");
    assert_eq!(value["tracks"][1]["type"], "vector");
    assert_eq!(value["tracks"][2]["type"], "number");
    assert_eq!(value["tracks"][0]["values"].as_array().unwrap().len(), 12);
    assert_eq!(value["tracks"][1]["values"].as_array().unwrap().len(), 6);
    assert!(is_valid_animation_data(&value));
}

#[test]
fn type_aliases_are_accepted() {
    let clip = codec::from_json_value(json!({
        "name": "Legacy",
        "duration": 1.0,
        "tracks": [
            { "name": "hips.quaternion", "type": "rotation", "times": [0.0], "values": [0, 0, 0, 1] },
            { "name": "hips.position", "type": "translation", "times": [0.0], "values": [0, 1, 0] },
            { "name": "Face.weight", "type": "scalar", "times": [0.0], "values": [0.5] }
        ]
    }))
    .unwrap();
    assert!(matches!(clip.tracks[0].data, TrackData::Quaternion(_)));
    assert!(matches!(clip.tracks[1].data, TrackData::Vector3(_)));
    assert!(matches!(clip.tracks[2].data, TrackData::Scalar(_)));
}

#[test]
fn short_duration_is_extended_to_last_key() {
    let clip = codec::from_json_value(json!({
        "name": "Clipped",
        "duration": 0.5,
        "tracks": [{ "name": "hips.position", "type": "vector", "times": [0.0, 2.0], "values": [0, 0, 0, 1, 1, 1] }]
    }))
    .unwrap();
    assert!((clip.duration - 2.0).abs() < f32::EPSILON);
}

// ============================================================================
// Rejection
// ============================================================================

fn one_track(kind: TrackKind, times: Vec<f32>, values: Vec<f32>) -> SerializedClip {
    SerializedClip {
        name: "Bad".to_string(),
        duration: 1.0,
        tracks: vec![SerializedTrack {
            name: "hips.quaternion".to_string(),
            kind,
            times,
            values,
        }],
    }
}

#[test]
fn rejects_value_count_mismatch() {
    let bad = one_track(TrackKind::Quaternion, vec![0.0, 1.0], vec![0.0, 0.0, 0.0, 1.0]);
    assert!(matches!(codec::deserialize(&bad), Err(RetargetError::InvalidClipData(_))));
}

#[test]
fn rejects_decreasing_times() {
    let bad = one_track(TrackKind::Number, vec![0.0, 1.0, 0.5], vec![0.0, 1.0, 2.0]);
    assert!(matches!(codec::deserialize(&bad), Err(RetargetError::InvalidClipData(_))));
}

#[test]
fn rejects_non_finite_numbers() {
    let bad = one_track(TrackKind::Vector, vec![0.0], vec![0.0, f32::NAN, 0.0]);
    assert!(matches!(codec::deserialize(&bad), Err(RetargetError::InvalidClipData(_))));

    let bad = one_track(TrackKind::Number, vec![f32::INFINITY], vec![0.0]);
    assert!(matches!(codec::deserialize(&bad), Err(RetargetError::InvalidClipData(_))));
}

#[test]
fn rejects_negative_duration() {
    let mut bad = one_track(TrackKind::Number, vec![0.0], vec![0.0]);
    bad.duration = -1.0;
    assert!(matches!(codec::deserialize(&bad), Err(RetargetError::InvalidClipData(_))));
}

#[test]
fn rejects_unknown_track_type() {
    let result = codec::from_json_value(json!({
        "name": "Odd", "duration": 1.0,
        "tracks": [{ "name": "a.weight", "type": "matrix", "times": [0.0], "values": [0.0] }]
    }));
    assert!(matches!(result, Err(RetargetError::JsonError(_))));
}

#[test]
fn rejects_malformed_json_text() {
    assert!(matches!(codec::from_json_str("{ not json"), Err(RetargetError::JsonError(_))));
}

// ============================================================================
// is_valid_animation_data
// ============================================================================

#[test]
fn structural_validation() {
    assert!(is_valid_animation_data(&json!({ "name": "Empty", "duration": 0, "tracks": [] })));

    assert!(!is_valid_animation_data(&json!([])));
    assert!(!is_valid_animation_data(&json!({ "name": "NoTracks", "duration": 1 })));
    assert!(!is_valid_animation_data(&json!({ "name": 3, "duration": 1, "tracks": [] })));
    assert!(!is_valid_animation_data(&json!({
        "name": "MissingValues", "duration": 1,
        "tracks": [{ "name": "a.weight", "type": "number", "times": [] }]
    })));

    // Structure only: unresolvable bone names still pass.
    assert!(is_valid_animation_data(&json!({
        "name": "Props", "duration": 1,
        "tracks": [{ "name": "Cube.quaternion", "type": "quaternion", "times": [], "values": [] }]
    })));
}

#[test]
fn invalid_structure_is_reported_before_parsing() {
    let result = codec::from_json_value(json!({ "name": "NoTracks", "duration": 1 }));
    assert!(matches!(result, Err(RetargetError::InvalidClipData(_))));
}
