//! Retargeting pipeline
//!
//! raw clip → [`Retargeter`] (alias resolution, rest-pose correction, root
//! motion rescale) → canonical clip → [`project_to_scene_paths`] → playable clip.

pub mod rest;
pub mod root_motion;
pub mod retargeter;
pub mod projector;

pub use rest::{CompositionOrder, RestPoseCorrection};
pub use root_motion::{RootMotionScale, hip_height};
pub use retargeter::{
    IgnoreReason, RetargetOptions, RetargetResult, Retargeter, TrackConversion, TrackConversions,
    TrackFailure, TrackOutcome, find_joint,
};
pub use projector::{ProjectedClip, project_to_scene_paths};
