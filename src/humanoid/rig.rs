use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::humanoid::alias::JointAliasTable;
use crate::humanoid::joint::CanonicalJoint;
use crate::scene::{NodeHandle, Skeleton};

/// Major version of the VRM specification a target model follows.
///
/// VRM 0.x models face -Z and use the opposite handedness convention for
/// humanoid rotations, so retargeted keys need an axis flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VrmVersion {
    #[serde(rename = "0")]
    V0,
    #[default]
    #[serde(rename = "1")]
    V1,
}

impl VrmVersion {
    /// Parses a `meta.metaVersion` / `specVersion` string (`"0"`, `"0.0"`, `"1.0"`, ...).
    /// Anything that does not start with `0` is treated as 1.x.
    #[must_use]
    pub fn from_meta_version(version: &str) -> Self {
        if version.trim().starts_with('0') {
            VrmVersion::V0
        } else {
            VrmVersion::V1
        }
    }

    #[inline]
    #[must_use]
    pub fn needs_axis_flip(self) -> bool {
        self == VrmVersion::V0
    }
}

/// A target humanoid: a skeleton plus the joint → node mapping from the VRM humanoid extension.
#[derive(Debug, Clone)]
pub struct HumanoidRig {
    pub skeleton: Skeleton,
    bones: FxHashMap<CanonicalJoint, NodeHandle>,
    pub version: VrmVersion,
}

impl HumanoidRig {
    #[must_use]
    pub fn new(skeleton: Skeleton, version: VrmVersion) -> Self {
        Self {
            skeleton,
            bones: FxHashMap::default(),
            version,
        }
    }

    /// Builds the joint mapping by resolving every node name under the root.
    /// The first node (pre-order) that resolves to a joint claims it.
    #[must_use]
    pub fn from_skeleton_names(skeleton: Skeleton, aliases: &JointAliasTable, version: VrmVersion) -> Self {
        let mut bones = FxHashMap::default();
        for handle in skeleton.descendants(skeleton.root()) {
            if handle == skeleton.root() {
                continue;
            }
            let Some(name) = skeleton.name(handle) else {
                continue;
            };
            if let Some(joint) = aliases.resolve_node_name(name) {
                bones.entry(joint).or_insert(handle);
            }
        }
        log::debug!("Mapped {} humanoid joints from skeleton names", bones.len());
        Self {
            skeleton,
            bones,
            version,
        }
    }

    /// Maps `joint` to `node`. Returns `false` if `node` is not in the skeleton.
    pub fn set_bone(&mut self, joint: CanonicalJoint, node: NodeHandle) -> bool {
        if self.skeleton.get(node).is_none() {
            return false;
        }
        self.bones.insert(joint, node);
        true
    }

    #[inline]
    #[must_use]
    pub fn node(&self, joint: CanonicalJoint) -> Option<NodeHandle> {
        self.bones.get(&joint).copied()
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.skeleton.root()
    }

    /// Mapped joints in taxonomy order.
    pub fn joints(&self) -> impl Iterator<Item = (CanonicalJoint, NodeHandle)> + '_ {
        CanonicalJoint::ALL
            .iter()
            .filter_map(|&j| self.node(j).map(|h| (j, h)))
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }
}
