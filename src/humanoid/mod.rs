//! Humanoid taxonomy
//!
//! - [`CanonicalJoint`]: the fixed VRM humanoid joint set
//! - [`JointAliasTable`]: raw source bone names → canonical joints
//! - [`HumanoidRig`]: a target skeleton with its joint mapping and VRM version

pub mod joint;
pub mod alias;
pub mod rig;

pub use joint::{CanonicalJoint, Finger, Phalanx, Side, UnknownJoint};
pub use alias::{JointAliasTable, ResolvedTrack};
pub use rig::{HumanoidRig, VrmVersion};
