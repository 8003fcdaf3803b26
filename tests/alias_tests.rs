//! Alias Resolution Tests
//!
//! Tests for:
//! - Mixamo names with and without the mixamorig namespace
//! - Prefix stripping (Normalized_, Armature|, custom prefixes)
//! - VRoid, Unity and UE naming schemes and known typos
//! - Numbered finger names with side taken from the path
//! - Longest-suffix fallback and unresolvable names
//! - HumanoidRig mapping from skeleton node names

use vrm_retarget::animation::binding::TargetPath;
use vrm_retarget::humanoid::{CanonicalJoint, HumanoidRig, JointAliasTable, VrmVersion};
use vrm_retarget::scene::{Node, Skeleton};

fn table() -> JointAliasTable {
    JointAliasTable::standard()
}

// ============================================================================
// Mixamo
// ============================================================================

#[test]
fn mixamo_spellings_agree() {
    let table = table();
    for name in [
        "mixamorigLeftArm.quaternion",
        "mixamorig:LeftArm.quaternion",
        "LeftArm.quaternion",
        "mixamorig_LeftArm.quaternion",
        "mixamorig1:LeftArm.quaternion",
    ] {
        assert_eq!(table.resolve(name), Some(CanonicalJoint::LeftUpperArm), "{name}");
    }
}

#[test]
fn resolution_is_deterministic() {
    let a = table();
    let b = table();
    for name in ["mixamorig:Spine1.quaternion", "J_Bip_L_Index2.quaternion", "thigh_r.position"] {
        let first = a.resolve(name);
        assert!(first.is_some(), "{name}");
        assert_eq!(first, a.resolve(name));
        assert_eq!(first, b.resolve(name));
    }
}

#[test]
fn mixamo_torso_chain() {
    let table = table();
    assert_eq!(table.resolve("mixamorigHips.position"), Some(CanonicalJoint::Hips));
    assert_eq!(table.resolve("mixamorigSpine.quaternion"), Some(CanonicalJoint::Spine));
    assert_eq!(table.resolve("mixamorigSpine1.quaternion"), Some(CanonicalJoint::Chest));
    assert_eq!(table.resolve("mixamorigSpine2.quaternion"), Some(CanonicalJoint::UpperChest));
    assert_eq!(table.resolve("mixamorigLeftUpLeg.quaternion"), Some(CanonicalJoint::LeftUpperLeg));
    assert_eq!(table.resolve("mixamorigRightToeBase.quaternion"), Some(CanonicalJoint::RightToes));
}

#[test]
fn mixamo_fingers() {
    let table = table();
    assert_eq!(
        table.resolve("mixamorigLeftHandThumb1.quaternion"),
        Some(CanonicalJoint::LeftThumbProximal)
    );
    assert_eq!(
        table.resolve("mixamorig:RightHandPinky3.quaternion"),
        Some(CanonicalJoint::RightLittleDistal)
    );
    assert_eq!(
        table.resolve("mixamorigRightHandMiddle2.quaternion"),
        Some(CanonicalJoint::RightMiddleIntermediate)
    );
}

// ============================================================================
// Other naming schemes
// ============================================================================

#[test]
fn normalized_vrm_names() {
    let table = table();
    assert_eq!(
        table.resolve("Normalized_LeftUpperArm.quaternion"),
        Some(CanonicalJoint::LeftUpperArm)
    );
    assert_eq!(
        table.resolve("Normalized_rightLittleDistal.quaternion"),
        Some(CanonicalJoint::RightLittleDistal)
    );
}

#[test]
fn canonical_names_resolve_to_themselves() {
    let table = table();
    for joint in CanonicalJoint::ALL {
        assert_eq!(table.resolve_node_name(joint.as_str()), Some(*joint));
    }
}

#[test]
fn unity_vroid_and_ue_names() {
    let table = table();
    assert_eq!(table.resolve_node_name("Left Thumb Proximal"), Some(CanonicalJoint::LeftThumbProximal));
    assert_eq!(table.resolve_node_name("J_Bip_C_Hips"), Some(CanonicalJoint::Hips));
    assert_eq!(table.resolve_node_name("J_Bip_R_Little3"), Some(CanonicalJoint::RightLittleDistal));
    assert_eq!(table.resolve_node_name("upperarm_l"), Some(CanonicalJoint::LeftUpperArm));
    assert_eq!(table.resolve_node_name("pelvis"), Some(CanonicalJoint::Hips));
}

#[test]
fn known_typos() {
    let table = table();
    assert_eq!(table.resolve_node_name("Spline"), Some(CanonicalJoint::Spine));
    assert_eq!(table.resolve_node_name("mixamorig:LeftForArm"), Some(CanonicalJoint::LeftLowerArm));
}

#[test]
fn prefix_stripping_is_case_insensitive() {
    let table = table();
    assert_eq!(table.resolve_node_name("MIXAMORIG:LEFTARM"), Some(CanonicalJoint::LeftUpperArm));
    assert_eq!(table.resolve_node_name("Armature|Normalized_Head"), Some(CanonicalJoint::Head));
}

#[test]
fn custom_prefix_and_alias() {
    let table = JointAliasTable::standard()
        .with_prefix("Rig_")
        .with_alias("Torso", CanonicalJoint::Chest);
    assert_eq!(table.resolve("Rig_LeftArm.quaternion"), Some(CanonicalJoint::LeftUpperArm));
    assert_eq!(table.resolve("Torso.quaternion"), Some(CanonicalJoint::Chest));
    assert!(table.len() > JointAliasTable::empty().len());
}

// ============================================================================
// Numbered fingers and fallbacks
// ============================================================================

#[test]
fn numbered_finger_takes_side_from_path() {
    let table = table();
    assert_eq!(
        table.resolve("Armature/Hips/LeftHand/index2.quaternion"),
        Some(CanonicalJoint::LeftIndexIntermediate)
    );
    assert_eq!(
        table.resolve("Armature/Hips/RightHand/pinky_1.quaternion"),
        Some(CanonicalJoint::RightLittleProximal)
    );
    assert_eq!(table.resolve("Armature/Hand/thumb3.quaternion"), None);
}

#[test]
fn longest_suffix_fallback() {
    let table = table();
    // "upperchest" beats "chest" as the longer suffix.
    assert_eq!(table.resolve_node_name("Char01_UpperChest"), Some(CanonicalJoint::UpperChest));
    assert_eq!(table.resolve_node_name("Char01_LeftFoot"), Some(CanonicalJoint::LeftFoot));
}

#[test]
fn unresolvable_names_are_none() {
    let table = table();
    assert_eq!(table.resolve("Cube.quaternion"), None);
    assert_eq!(table.resolve("mixamorigLeftArm"), None);
    assert_eq!(table.resolve("mixamorigLeftArm.rotation"), None);
    assert_eq!(table.resolve_node_name(""), None);
}

#[test]
fn resolve_track_keeps_binding() {
    let table = table();
    let resolved = table
        .resolve_track("Armature/mixamorig:Hips.position")
        .unwrap();
    assert_eq!(resolved.joint, CanonicalJoint::Hips);
    assert_eq!(resolved.binding.leaf(), "mixamorig:Hips");
    assert_eq!(resolved.binding.target, TargetPath::Translation);
}

// ============================================================================
// HumanoidRig mapping
// ============================================================================

#[test]
fn rig_maps_first_matching_node() {
    let mut skeleton = Skeleton::new("Scene");
    let root = skeleton.root();
    let hips = skeleton.add_child(root, Node::new("J_Bip_C_Hips")).unwrap();
    let spine = skeleton.add_child(hips, Node::new("J_Bip_C_Spine")).unwrap();
    skeleton.add_child(spine, Node::new("Spine")).unwrap();
    skeleton.add_child(hips, Node::new("SkirtBone")).unwrap();

    let rig = HumanoidRig::from_skeleton_names(skeleton, &table(), VrmVersion::V0);
    assert_eq!(rig.node(CanonicalJoint::Hips), Some(hips));
    assert_eq!(rig.node(CanonicalJoint::Spine), Some(spine));
    assert_eq!(rig.bone_count(), 2);

    let joints: Vec<_> = rig.joints().map(|(j, _)| j).collect();
    assert_eq!(joints, vec![CanonicalJoint::Hips, CanonicalJoint::Spine]);
}

#[test]
fn set_bone_rejects_foreign_handles() {
    let other = {
        let mut s = Skeleton::new("Other");
        let root = s.root();
        s.add_child(root, Node::new("A")).unwrap();
        s.add_child(root, Node::new("B")).unwrap()
    };
    let mut rig = HumanoidRig::new(Skeleton::new("Scene"), VrmVersion::V1);
    let root = rig.root();
    assert!(rig.set_bone(CanonicalJoint::Hips, root));
    // A handle minted by another skeleton does not address a node here.
    assert!(!rig.set_bone(CanonicalJoint::Spine, other));
}
