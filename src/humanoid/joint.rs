//! Canonical humanoid joint taxonomy.
//!
//! Every semantic joint of a VRM humanoid has exactly one [`CanonicalJoint`]
//! value, and every value has exactly one camelCase string form
//! (`leftUpperArm`, `rightLittleDistal`, ...). The string form is what
//! canonical clips and pose snapshots use as node names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! canonical_joints {
    ($($variant:ident => $name:literal,)+) => {
        /// A joint of the VRM humanoid rig.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum CanonicalJoint {
            $($variant,)+
        }

        impl CanonicalJoint {
            /// Every joint, in hierarchy-friendly order (torso, head, arms, legs, fingers).
            pub const ALL: &'static [CanonicalJoint] = &[$(CanonicalJoint::$variant,)+];

            /// The camelCase name of this joint.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(CanonicalJoint::$variant => $name,)+
                }
            }
        }

        impl FromStr for CanonicalJoint {
            type Err = UnknownJoint;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(CanonicalJoint::$variant),)+
                    _ => Err(UnknownJoint(s.to_string())),
                }
            }
        }
    };
}

canonical_joints! {
    Hips => "hips",
    Spine => "spine",
    Chest => "chest",
    UpperChest => "upperChest",
    Neck => "neck",
    Head => "head",
    LeftEye => "leftEye",
    RightEye => "rightEye",
    Jaw => "jaw",

    LeftShoulder => "leftShoulder",
    LeftUpperArm => "leftUpperArm",
    LeftLowerArm => "leftLowerArm",
    LeftHand => "leftHand",
    RightShoulder => "rightShoulder",
    RightUpperArm => "rightUpperArm",
    RightLowerArm => "rightLowerArm",
    RightHand => "rightHand",

    LeftUpperLeg => "leftUpperLeg",
    LeftLowerLeg => "leftLowerLeg",
    LeftFoot => "leftFoot",
    LeftToes => "leftToes",
    RightUpperLeg => "rightUpperLeg",
    RightLowerLeg => "rightLowerLeg",
    RightFoot => "rightFoot",
    RightToes => "rightToes",

    LeftThumbProximal => "leftThumbProximal",
    LeftThumbIntermediate => "leftThumbIntermediate",
    LeftThumbDistal => "leftThumbDistal",
    LeftIndexProximal => "leftIndexProximal",
    LeftIndexIntermediate => "leftIndexIntermediate",
    LeftIndexDistal => "leftIndexDistal",
    LeftMiddleProximal => "leftMiddleProximal",
    LeftMiddleIntermediate => "leftMiddleIntermediate",
    LeftMiddleDistal => "leftMiddleDistal",
    LeftRingProximal => "leftRingProximal",
    LeftRingIntermediate => "leftRingIntermediate",
    LeftRingDistal => "leftRingDistal",
    LeftLittleProximal => "leftLittleProximal",
    LeftLittleIntermediate => "leftLittleIntermediate",
    LeftLittleDistal => "leftLittleDistal",

    RightThumbProximal => "rightThumbProximal",
    RightThumbIntermediate => "rightThumbIntermediate",
    RightThumbDistal => "rightThumbDistal",
    RightIndexProximal => "rightIndexProximal",
    RightIndexIntermediate => "rightIndexIntermediate",
    RightIndexDistal => "rightIndexDistal",
    RightMiddleProximal => "rightMiddleProximal",
    RightMiddleIntermediate => "rightMiddleIntermediate",
    RightMiddleDistal => "rightMiddleDistal",
    RightRingProximal => "rightRingProximal",
    RightRingIntermediate => "rightRingIntermediate",
    RightRingDistal => "rightRingDistal",
    RightLittleProximal => "rightLittleProximal",
    RightLittleIntermediate => "rightLittleIntermediate",
    RightLittleDistal => "rightLittleDistal",
}

/// Error returned when a string is not a canonical joint name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJoint(pub String);

impl fmt::Display for UnknownJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown humanoid joint '{}'", self.0)
    }
}

impl std::error::Error for UnknownJoint {}

impl fmt::Display for CanonicalJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of `LeftThumbProximal` in [`CanonicalJoint::ALL`].
const FIRST_FINGER: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

/// Finger segment, from the palm outwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phalanx {
    Proximal,
    Intermediate,
    Distal,
}

impl Phalanx {
    /// Maps Mixamo-style joint numbers `1..=3` to a segment.
    #[must_use]
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Phalanx::Proximal),
            2 => Some(Phalanx::Intermediate),
            3 => Some(Phalanx::Distal),
            _ => None,
        }
    }
}

impl CanonicalJoint {
    /// The finger joint for a side, finger and segment.
    #[must_use]
    pub fn finger(side: Side, finger: Finger, phalanx: Phalanx) -> Self {
        // Finger variants are declared side-major, then finger, then segment.
        CanonicalJoint::ALL[FIRST_FINGER + side as usize * 15 + finger as usize * 3 + phalanx as usize]
    }

    #[must_use]
    pub fn is_finger(self) -> bool {
        self as usize >= FIRST_FINGER
    }

    /// Joints whose absence on a target rig is not a retargeting failure.
    #[must_use]
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            CanonicalJoint::LeftToes
                | CanonicalJoint::RightToes
                | CanonicalJoint::LeftEye
                | CanonicalJoint::RightEye
                | CanonicalJoint::Jaw
                | CanonicalJoint::UpperChest
        ) || self.is_finger()
    }

    #[must_use]
    pub fn side(self) -> Option<Side> {
        let name = self.as_str();
        if name.starts_with("left") {
            Some(Side::Left)
        } else if name.starts_with("right") {
            Some(Side::Right)
        } else {
            None
        }
    }
}
