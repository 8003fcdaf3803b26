#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod scene;
pub mod humanoid;
pub mod retarget;
pub mod pose;
pub mod analysis;
pub mod errors;

pub use animation::{AnimationClip, KeyframeTrack, TargetPath, Track, TrackData};
pub use scene::{Node, NodeHandle, Skeleton, Transform};
pub use humanoid::{CanonicalJoint, HumanoidRig, JointAliasTable, VrmVersion};
pub use retarget::{
    CompositionOrder, ProjectedClip, RetargetOptions, RetargetResult, Retargeter,
    project_to_scene_paths,
};
pub use pose::{PoseSnapshot, apply_pose, capture_pose};
pub use analysis::{AnalysisConfig, CorpusReport, analyze_corpus};
pub use errors::{Result, RetargetError};
