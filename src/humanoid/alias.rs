//! Bone-name alias resolution.
//!
//! [`JointAliasTable`] maps the many naming schemes found in source rigs
//! (Mixamo with and without the `mixamorig` namespace, VRM `Normalized_`
//! nodes, Unity humanoid names, VRoid `J_Bip_*` bones, UE-style `_l`/`_r`
//! suffixes and a few common typos) onto [`CanonicalJoint`].
//!
//! The table is built once and shared immutably, typically behind an `Arc`.
//! Lookup falls through four stages, stopping at the first hit:
//!
//! 1. exact alias lookup on the leaf node name
//! 2. repeated prefix stripping, retrying the alias table (exact, then
//!    ASCII case-insensitive) and the canonical names after every strip
//! 3. generic numbered finger names (`thumb2`, `pinky3`) whose side comes
//!    from a `left`/`right` marker in the parent path
//! 4. the canonical name that is the longest case-insensitive suffix of the leaf

use rustc_hash::FxHashMap;

use crate::animation::binding::TrackBinding;
use crate::humanoid::joint::{CanonicalJoint, Finger, Phalanx, Side};

/// Namespace and normalization prefixes removed during stage 2, longest first.
const DEFAULT_PREFIXES: &[&str] = &[
    "mixamorig1:",
    "mixamorig:",
    "mixamorig_",
    "mixamorig",
    "Normalized_",
    "Armature_",
    "Armature|",
    "Bip01_",
    "DEF-",
    "ORG-",
];

const MIXAMO_BODY: &[(&str, CanonicalJoint)] = &[
    ("Hips", CanonicalJoint::Hips),
    ("Spine", CanonicalJoint::Spine),
    ("Spine1", CanonicalJoint::Chest),
    ("Spine2", CanonicalJoint::UpperChest),
    ("Neck", CanonicalJoint::Neck),
    ("Head", CanonicalJoint::Head),
    ("LeftEye", CanonicalJoint::LeftEye),
    ("RightEye", CanonicalJoint::RightEye),
    ("LeftShoulder", CanonicalJoint::LeftShoulder),
    ("LeftArm", CanonicalJoint::LeftUpperArm),
    ("LeftForeArm", CanonicalJoint::LeftLowerArm),
    ("LeftHand", CanonicalJoint::LeftHand),
    ("RightShoulder", CanonicalJoint::RightShoulder),
    ("RightArm", CanonicalJoint::RightUpperArm),
    ("RightForeArm", CanonicalJoint::RightLowerArm),
    ("RightHand", CanonicalJoint::RightHand),
    ("LeftUpLeg", CanonicalJoint::LeftUpperLeg),
    ("LeftLeg", CanonicalJoint::LeftLowerLeg),
    ("LeftFoot", CanonicalJoint::LeftFoot),
    ("LeftToeBase", CanonicalJoint::LeftToes),
    ("RightUpLeg", CanonicalJoint::RightUpperLeg),
    ("RightLeg", CanonicalJoint::RightLowerLeg),
    ("RightFoot", CanonicalJoint::RightFoot),
    ("RightToeBase", CanonicalJoint::RightToes),
];

/// UE mannequin style names with `_l` / `_r` suffixes.
const SUFFIXED_BODY: &[(&str, CanonicalJoint)] = &[
    ("pelvis", CanonicalJoint::Hips),
    ("spine_01", CanonicalJoint::Spine),
    ("spine_02", CanonicalJoint::Chest),
    ("spine_03", CanonicalJoint::UpperChest),
    ("neck_01", CanonicalJoint::Neck),
    ("clavicle_l", CanonicalJoint::LeftShoulder),
    ("upperarm_l", CanonicalJoint::LeftUpperArm),
    ("lowerarm_l", CanonicalJoint::LeftLowerArm),
    ("hand_l", CanonicalJoint::LeftHand),
    ("clavicle_r", CanonicalJoint::RightShoulder),
    ("upperarm_r", CanonicalJoint::RightUpperArm),
    ("lowerarm_r", CanonicalJoint::RightLowerArm),
    ("hand_r", CanonicalJoint::RightHand),
    ("thigh_l", CanonicalJoint::LeftUpperLeg),
    ("calf_l", CanonicalJoint::LeftLowerLeg),
    ("foot_l", CanonicalJoint::LeftFoot),
    ("ball_l", CanonicalJoint::LeftToes),
    ("thigh_r", CanonicalJoint::RightUpperLeg),
    ("calf_r", CanonicalJoint::RightLowerLeg),
    ("foot_r", CanonicalJoint::RightFoot),
    ("ball_r", CanonicalJoint::RightToes),
];

/// Misspellings seen in hand-authored rigs.
const TYPOS: &[(&str, CanonicalJoint)] = &[
    ("Spline", CanonicalJoint::Spine),
    ("LeftForArm", CanonicalJoint::LeftLowerArm),
    ("RightForArm", CanonicalJoint::RightLowerArm),
    ("LeftUpperLag", CanonicalJoint::LeftUpperLeg),
    ("RightUpperLag", CanonicalJoint::RightUpperLeg),
    ("LeftSholder", CanonicalJoint::LeftShoulder),
    ("RightSholder", CanonicalJoint::RightShoulder),
];

const VROID_BODY: &[(&str, CanonicalJoint)] = &[
    ("J_Bip_C_Hips", CanonicalJoint::Hips),
    ("J_Bip_C_Spine", CanonicalJoint::Spine),
    ("J_Bip_C_Chest", CanonicalJoint::Chest),
    ("J_Bip_C_UpperChest", CanonicalJoint::UpperChest),
    ("J_Bip_C_Neck", CanonicalJoint::Neck),
    ("J_Bip_C_Head", CanonicalJoint::Head),
    ("J_Adj_L_FaceEye", CanonicalJoint::LeftEye),
    ("J_Adj_R_FaceEye", CanonicalJoint::RightEye),
    ("J_Bip_L_Shoulder", CanonicalJoint::LeftShoulder),
    ("J_Bip_L_UpperArm", CanonicalJoint::LeftUpperArm),
    ("J_Bip_L_LowerArm", CanonicalJoint::LeftLowerArm),
    ("J_Bip_L_Hand", CanonicalJoint::LeftHand),
    ("J_Bip_R_Shoulder", CanonicalJoint::RightShoulder),
    ("J_Bip_R_UpperArm", CanonicalJoint::RightUpperArm),
    ("J_Bip_R_LowerArm", CanonicalJoint::RightLowerArm),
    ("J_Bip_R_Hand", CanonicalJoint::RightHand),
    ("J_Bip_L_UpperLeg", CanonicalJoint::LeftUpperLeg),
    ("J_Bip_L_LowerLeg", CanonicalJoint::LeftLowerLeg),
    ("J_Bip_L_Foot", CanonicalJoint::LeftFoot),
    ("J_Bip_L_ToeBase", CanonicalJoint::LeftToes),
    ("J_Bip_R_UpperLeg", CanonicalJoint::RightUpperLeg),
    ("J_Bip_R_LowerLeg", CanonicalJoint::RightLowerLeg),
    ("J_Bip_R_Foot", CanonicalJoint::RightFoot),
    ("J_Bip_R_ToeBase", CanonicalJoint::RightToes),
];

const FINGERS: [(Finger, &str, &str); 5] = [
    (Finger::Thumb, "Thumb", "thumb"),
    (Finger::Index, "Index", "index"),
    (Finger::Middle, "Middle", "middle"),
    (Finger::Ring, "Ring", "ring"),
    (Finger::Little, "Pinky", "little"),
];

/// A track whose target resolved to a canonical joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTrack<'a> {
    pub joint: CanonicalJoint,
    pub binding: TrackBinding<'a>,
}

/// Immutable raw bone name → [`CanonicalJoint`] lookup.
#[derive(Debug, Clone)]
pub struct JointAliasTable {
    exact: FxHashMap<String, CanonicalJoint>,
    folded: FxHashMap<String, CanonicalJoint>,
    canonical: Vec<(String, CanonicalJoint)>,
    prefixes: Vec<String>,
}

impl Default for JointAliasTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl JointAliasTable {
    /// A table holding only the canonical names and the default prefixes.
    #[must_use]
    pub fn empty() -> Self {
        let canonical = CanonicalJoint::ALL
            .iter()
            .map(|j| (j.as_str().to_ascii_lowercase(), *j))
            .collect();
        let mut table = Self {
            exact: FxHashMap::default(),
            folded: FxHashMap::default(),
            canonical,
            prefixes: DEFAULT_PREFIXES.iter().map(|p| (*p).to_string()).collect(),
        };
        for joint in CanonicalJoint::ALL {
            table.insert(joint.as_str(), *joint);
        }
        table
    }

    /// The built-in table covering Mixamo, Unity, VRoid and UE naming.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::empty();

        for joint in CanonicalJoint::ALL {
            // Unity humanoid / VRM "Normalized_" leaves use PascalCase.
            let pascal = pascal_case(joint.as_str());
            table.insert(&spaced(&pascal), *joint);
            table.insert(&pascal, *joint);
        }

        for &(raw, joint) in MIXAMO_BODY {
            table.insert(raw, joint);
            table.insert(&format!("mixamorig{raw}"), joint);
        }
        for &(raw, joint) in SUFFIXED_BODY.iter().chain(TYPOS).chain(VROID_BODY) {
            table.insert(raw, joint);
        }

        for (side, side_title, vroid_side) in [(Side::Left, "Left", "L"), (Side::Right, "Right", "R")] {
            for (finger, mixamo_finger, _) in FINGERS {
                for n in 1..=3u8 {
                    let Some(phalanx) = Phalanx::from_number(n) else {
                        continue;
                    };
                    let joint = CanonicalJoint::finger(side, finger, phalanx);
                    let mixamo = format!("{side_title}Hand{mixamo_finger}{n}");
                    table.insert(&format!("mixamorig{mixamo}"), joint);
                    table.insert(&mixamo, joint);

                    let vroid_finger = if finger == Finger::Little { "Little" } else { mixamo_finger };
                    table.insert(&format!("J_Bip_{vroid_side}_{vroid_finger}{n}"), joint);
                }
            }
        }

        table
    }

    /// Adds an alias. Later insertions of the same raw name win.
    #[must_use]
    pub fn with_alias(mut self, raw: &str, joint: CanonicalJoint) -> Self {
        self.insert(raw, joint);
        self
    }

    /// Adds a prefix tried during prefix stripping, after the built-in ones.
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefixes.push(prefix.to_string());
        self
    }

    fn insert(&mut self, raw: &str, joint: CanonicalJoint) {
        self.exact.insert(raw.to_string(), joint);
        self.folded.insert(raw.to_ascii_lowercase(), joint);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Resolves a raw track name such as `"mixamorig:LeftArm.quaternion"`.
    ///
    /// Returns `None` when the name carries no recognized property suffix or
    /// the leaf matches no joint. `None` means "ignore this track", never an error.
    #[must_use]
    pub fn resolve(&self, raw_track_name: &str) -> Option<CanonicalJoint> {
        self.resolve_track(raw_track_name).map(|r| r.joint)
    }

    /// Like [`resolve`](Self::resolve) but also returns the parsed binding.
    #[must_use]
    pub fn resolve_track<'a>(&self, raw_track_name: &'a str) -> Option<ResolvedTrack<'a>> {
        let binding = TrackBinding::parse(raw_track_name)?;
        let joint = self.resolve_bone(binding.parent_path(), binding.leaf())?;
        Some(ResolvedTrack { joint, binding })
    }

    /// Resolves a bare node name, e.g. while mapping a skeleton's bones.
    #[must_use]
    pub fn resolve_node_name(&self, name: &str) -> Option<CanonicalJoint> {
        self.resolve_bone("", name)
    }

    /// Resolves a leaf node name. `path` is the portion above the leaf and is
    /// only consulted for the side of generic finger names.
    #[must_use]
    pub fn resolve_bone(&self, path: &str, leaf: &str) -> Option<CanonicalJoint> {
        if leaf.is_empty() {
            return None;
        }

        if let Some(&joint) = self.exact.get(leaf) {
            return Some(joint);
        }

        if let Some(joint) = self.resolve_stripped(leaf) {
            return Some(joint);
        }

        if let Some(joint) = resolve_numbered_finger(path, leaf) {
            return Some(joint);
        }

        let joint = self.longest_suffix_match(leaf);
        if joint.is_none() {
            log::trace!("No humanoid joint for bone '{leaf}'");
        }
        joint
    }

    fn resolve_stripped(&self, leaf: &str) -> Option<CanonicalJoint> {
        let mut name = leaf;
        loop {
            let prefix = self
                .prefixes
                .iter()
                .find(|p| name.len() > p.len() && starts_with_ignore_case(name, p))?;
            name = &name[prefix.len()..];

            if let Some(&joint) = self.exact.get(name) {
                return Some(joint);
            }
            let folded = name.to_ascii_lowercase();
            if let Some(&joint) = self.folded.get(&folded) {
                return Some(joint);
            }
            if let Some((_, joint)) = self.canonical.iter().find(|(c, _)| *c == folded) {
                return Some(*joint);
            }
        }
    }

    fn longest_suffix_match(&self, leaf: &str) -> Option<CanonicalJoint> {
        let folded = leaf.to_ascii_lowercase();
        self.canonical
            .iter()
            .filter(|(name, _)| folded.ends_with(name.as_str()))
            .max_by_key(|(name, _)| name.len())
            .map(|(_, joint)| *joint)
    }
}

/// `thumb1`, `Index_2`, `pinky3` with the side taken from the path.
fn resolve_numbered_finger(path: &str, leaf: &str) -> Option<CanonicalJoint> {
    let folded = leaf.to_ascii_lowercase();
    let number = folded.chars().last()?.to_digit(10)?;
    let phalanx = Phalanx::from_number(u8::try_from(number).ok()?)?;
    let stem = folded[..folded.len() - 1].trim_end_matches(['_', '-', '.']);

    let finger = FINGERS.iter().find_map(|&(finger, mixamo, canonical)| {
        let mixamo = mixamo.to_ascii_lowercase();
        (stem.ends_with(&mixamo) || stem.ends_with(canonical)).then_some(finger)
    })?;

    let path = path.to_ascii_lowercase();
    // The marker nearest the leaf wins, e.g. "Left/.../RightHand/thumb1".
    let side = match (path.rfind("left"), path.rfind("right")) {
        (Some(l), Some(r)) => {
            if l > r {
                Side::Left
            } else {
                Side::Right
            }
        }
        (Some(_), None) => Side::Left,
        (None, Some(_)) => Side::Right,
        (None, None) => return None,
    };

    Some(CanonicalJoint::finger(side, finger, phalanx))
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn pascal_case(camel: &str) -> String {
    let mut chars = camel.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}

/// `LeftThumbProximal` → `Left Thumb Proximal` (Unity avatar finger naming).
fn spaced(pascal: &str) -> String {
    let mut out = String::with_capacity(pascal.len() + 4);
    for (i, c) in pascal.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
