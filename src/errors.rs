//! Error Types
//!
//! This module defines the error types used throughout the retargeting pipeline.
//!
//! # Overview
//!
//! The main error type [`RetargetError`] covers the clip-level failure modes:
//! - Retargeting that produced no usable tracks
//! - Scene-path projection that produced a degenerate clip
//! - Malformed serialized clips, pose snapshots and analysis configs
//! - JSON and I/O errors at the file boundary
//!
//! Per-track problems are never reported through this type. They are
//! accumulated in [`RetargetResult`](crate::retarget::RetargetResult) and
//! [`ProjectedClip`](crate::retarget::ProjectedClip) instead, so a single bad
//! track cannot abort a batch.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, RetargetError>`.
//!
//! ```rust,ignore
//! use vrm_retarget::errors::{RetargetError, Result};
//!
//! fn load_clip(json: &str) -> Result<AnimationClip> {
//!     vrm_retarget::animation::codec::from_json_str(json)
//! }
//! ```

use thiserror::Error;

use crate::retarget::TrackFailure;

/// The main error type for the retargeting pipeline.
#[derive(Error, Debug)]
pub enum RetargetError {
    // ========================================================================
    // Retargeting Errors
    // ========================================================================
    /// Every track of a non-empty source clip was ignored, skipped or failed.
    #[error(
        "Clip '{clip}' has {source_tracks} track(s) but none could be retargeted: source and target skeletons share no recognizable joints"
    )]
    NoTracksConverted {
        /// Name of the source clip
        clip: String,
        /// Number of tracks in the source clip
        source_tracks: usize,
        /// Tracks that targeted a required joint missing on the target rig
        failures: Vec<TrackFailure>,
    },

    // ========================================================================
    // Projection Errors
    // ========================================================================
    /// No track survived scene-path projection.
    #[error("Clip '{clip}': no track could be mapped to a scene path under the skeleton root")]
    ProjectionEmpty {
        /// Name of the canonical clip
        clip: String,
    },

    /// A projected track name is a bare leaf instead of a hierarchical path.
    #[error("Projected track '{track}' has no '/' separator; the skeleton root does not match the rig")]
    PathWithoutSeparator {
        /// The offending track name
        track: String,
    },

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// Serialized clip failed structural or semantic validation.
    #[error("Invalid animation data: {0}")]
    InvalidClipData(String),

    /// Pose snapshot failed validation.
    #[error("Invalid pose snapshot: {0}")]
    InvalidPose(String),

    /// Analysis configuration is out of range.
    #[error("Invalid analysis config: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RetargetError {
    pub(crate) fn invalid_clip(msg: impl Into<String>) -> Self {
        RetargetError::InvalidClipData(msg.into())
    }

    pub(crate) fn invalid_pose(msg: impl Into<String>) -> Self {
        RetargetError::InvalidPose(msg.into())
    }

    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        RetargetError::InvalidConfig(msg.into())
    }
}

/// Alias for `Result<T, RetargetError>`.
pub type Result<T> = std::result::Result<T, RetargetError>;
