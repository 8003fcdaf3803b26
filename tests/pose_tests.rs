//! Pose Snapshot Tests
//!
//! Tests for:
//! - Parsing and validation of pose snapshot JSON
//! - Applying a snapshot to a rig (applied / skipped accounting)
//! - Capturing a snapshot back from a rig
//! - Scene rotation and single-key clip conversion

use std::f32::consts::PI;

use glam::{Quat, Vec3};

use vrm_retarget::humanoid::{CanonicalJoint, HumanoidRig, JointAliasTable, VrmVersion};
use vrm_retarget::pose::{PoseSnapshot, apply_pose, capture_pose};
use vrm_retarget::retarget::project_to_scene_paths;
use vrm_retarget::scene::{Node, Skeleton};
use vrm_retarget::RetargetError;

const EPSILON: f32 = 1e-4;

// Compares through |dot| so q and -q match and f32 acos noise near 1 is avoided.
fn approx_quat(a: Quat, b: Quat) -> bool {
    a.normalize().dot(b.normalize()).abs() > 1.0 - EPSILON
}

fn rig() -> HumanoidRig {
    let mut s = Skeleton::new("Scene");
    let root = s.root();
    let armature = s.add_child(root, Node::new("Armature")).unwrap();
    let hips = s.add_child(armature, Node::new("Hips")).unwrap();
    let spine = s.add_child(hips, Node::new("Spine")).unwrap();
    s.add_child(spine, Node::new("LeftUpperArm")).unwrap();
    HumanoidRig::from_skeleton_names(s, &JointAliasTable::standard(), VrmVersion::V1)
}

const POSE_JSON: &str = r#"{
    "sceneRotation": { "x": 0, "y": 180, "z": 0 },
    "vrmPose": {
        "hips": { "rotation": [0, 0, 0, 1], "position": [0, 0.75, 0.125] },
        "leftUpperArm": { "rotation": [0, 0, 0.38268343, 0.9238795] },
        "rightUpperArm": { "rotation": [0, 0, -0.38268343, 0.9238795] },
        "tail": { "rotation": [0, 0, 0, 1] }
    }
}"#;

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn parses_snapshot() {
    let pose = PoseSnapshot::from_json_str(POSE_JSON).unwrap();
    assert_eq!(pose.vrm_pose.len(), 4);
    assert_eq!(pose.vrm_pose["hips"].position, Some([0.0, 0.75, 0.125]));
    assert!(pose.vrm_pose["leftUpperArm"].position.is_none());
    assert!(approx_quat(pose.scene_rotation_quat(), Quat::from_rotation_y(PI)));
}

#[test]
fn scene_rotation_defaults_to_identity() {
    let pose = PoseSnapshot::from_json_str(r#"{ "vrmPose": { "hips": { "rotation": [0, 0, 0, 1] } } }"#)
        .unwrap();
    assert!(pose.scene_rotation.is_none());
    assert_eq!(pose.scene_rotation_quat(), Quat::IDENTITY);
}

#[test]
fn rejects_empty_pose() {
    let err = PoseSnapshot::from_json_str(r#"{ "vrmPose": {} }"#).unwrap_err();
    assert!(matches!(err, RetargetError::InvalidPose(_)));
}

#[test]
fn rejects_short_rotation() {
    let err = PoseSnapshot::from_json_str(r#"{ "vrmPose": { "hips": { "rotation": [0, 0, 1] } } }"#)
        .unwrap_err();
    assert!(matches!(err, RetargetError::JsonError(_)));
}

#[test]
fn rejects_zero_rotation() {
    let err = PoseSnapshot::from_json_str(r#"{ "vrmPose": { "hips": { "rotation": [0, 0, 0, 0] } } }"#)
        .unwrap_err();
    assert!(matches!(err, RetargetError::InvalidPose(_)));
}

// ============================================================================
// Apply / Capture
// ============================================================================

#[test]
fn apply_counts_applied_and_skipped() {
    let mut rig = rig();
    let pose = PoseSnapshot::from_json_str(POSE_JSON).unwrap();

    let result = apply_pose(&mut rig, &pose).unwrap();
    assert_eq!(result.applied, 2);
    // BTreeMap order: rightUpperArm is not on the rig, tail is not a joint.
    assert_eq!(result.skipped, vec!["rightUpperArm".to_string(), "tail".to_string()]);

    let arm = rig.node(CanonicalJoint::LeftUpperArm).unwrap();
    let arm_rotation = rig.skeleton.get(arm).unwrap().transform.rotation;
    assert!(approx_quat(arm_rotation, Quat::from_rotation_z(PI / 4.0)));

    let hips = rig.node(CanonicalJoint::Hips).unwrap();
    assert_eq!(rig.skeleton.get(hips).unwrap().transform.position, Vec3::new(0.0, 0.75, 0.125));

    let root_rotation = rig.skeleton.get(rig.root()).unwrap().transform.rotation;
    assert!(approx_quat(root_rotation, Quat::from_rotation_y(PI)));
}

#[test]
fn apply_rejects_invalid_snapshot_without_writing() {
    let mut rig = rig();
    let mut pose = PoseSnapshot::from_json_str(POSE_JSON).unwrap();
    if let Some(bone) = pose.vrm_pose.get_mut("leftUpperArm") {
        bone.rotation[0] = f32::NAN;
    }

    assert!(apply_pose(&mut rig, &pose).is_err());
    let hips = rig.node(CanonicalJoint::Hips).unwrap();
    assert_eq!(rig.skeleton.get(hips).unwrap().transform.position, Vec3::ZERO);
}

#[test]
fn capture_reads_back_applied_pose() {
    let mut rig = rig();
    let pose = PoseSnapshot::from_json_str(POSE_JSON).unwrap();
    apply_pose(&mut rig, &pose).unwrap();

    let captured = capture_pose(&rig);
    assert_eq!(captured.vrm_pose.len(), rig.bone_count());
    assert_eq!(captured.vrm_pose["hips"].position, Some([0.0, 0.75, 0.125]));
    assert!(captured.vrm_pose["spine"].position.is_none());
    let arm = Quat::from_array(captured.vrm_pose["leftUpperArm"].rotation);
    assert!(approx_quat(arm, Quat::from_rotation_z(PI / 4.0)));

    let scene = captured.scene_rotation.unwrap();
    assert!(approx_quat(
        captured.scene_rotation_quat(),
        Quat::from_rotation_y(PI)
    ), "captured scene rotation {scene:?}");

    // The capture is itself a valid snapshot.
    let json = captured.to_json_string().unwrap();
    assert!(PoseSnapshot::from_json_str(&json).is_ok());
}

#[test]
fn capture_of_rest_rig_has_no_scene_rotation() {
    let captured = capture_pose(&rig());
    assert!(captured.scene_rotation.is_none());
    assert_eq!(captured.vrm_pose["spine"].rotation, [0.0, 0.0, 0.0, 1.0]);
}

// ============================================================================
// Clip Conversion
// ============================================================================

#[test]
fn to_clip_builds_single_key_canonical_tracks() {
    let pose = PoseSnapshot::from_json_str(POSE_JSON).unwrap();
    let clip = pose.to_clip("T-Pose");

    assert_eq!(clip.name, "T-Pose");
    assert_eq!(clip.duration, 0.0);
    // hips rotation + position, both arms; "tail" is not a joint.
    assert_eq!(clip.tracks.len(), 4);
    assert!(clip.track("hips.position").is_some());
    let arm = clip.track("leftUpperArm.quaternion").unwrap().as_quaternion().unwrap();
    assert_eq!(arm.times, vec![0.0]);

    let projected = project_to_scene_paths(&clip, &rig()).unwrap();
    assert_eq!(projected.dropped, vec!["rightUpperArm.quaternion".to_string()]);
    assert!(projected.clip.track("Armature/Hips/Spine/LeftUpperArm.quaternion").is_some());
}
