//! Motion Analysis
//!
//! Offline, read-only passes over canonical (or scene-path) clips:
//!
//! - [`EnvelopeAccumulator`]: per-joint Euler min/max across a corpus
//! - [`detect_phase_lag`]: how many samples a driven joint trails its driver
//! - [`MotionAnalyzer`] / [`analyze_corpus`]: both passes over many clips,
//!   producing the `skeleton_limits.json` and `skeleton_behavior.json` reports
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vrm_retarget::analysis::{AnalysisConfig, analyze_corpus};
//!
//! let report = analyze_corpus(&clips, &AnalysisConfig::default(), |_, _| ControlFlow::Continue(()));
//! println!("{}", serde_json::to_string_pretty(&report.limits)?);
//! ```

pub mod envelope;
pub mod phase;
pub mod corpus;

pub use envelope::{Axis, EnvelopeAccumulator, JointEnvelope};
pub use phase::{
    PhaseLagReport, angular_velocity, detect_phase_lag, find_velocity_lag, pearson,
    resample_quaternion_track,
};
pub use corpus::{
    ClipBehavior, CorpusReport, MotionAnalyzer, PairSummary, SkeletonBehavior, SkeletonLimits,
    analyze_corpus,
};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, RetargetError};

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// A driver joint and the joint expected to follow it.
///
/// Names are matched case-insensitively against track leaf names, so both
/// canonical (`spine`) and scene-path (`.../Spine`) clips work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointPair {
    pub driver: String,
    pub driven: String,
}

impl JointPair {
    #[must_use]
    pub fn new(driver: impl Into<String>, driven: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            driven: driven.into(),
        }
    }
}

/// Analysis parameters, loadable from JSON:
///
/// ```json
/// { "sampleRate": 30, "maxLagSamples": 15,
///   "jointPairs": [{ "driver": "spine", "driven": "head" }] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Resampling rate in Hz.
    pub sample_rate: f32,
    /// Largest lag tried, in samples (15 samples = 0.5 s at 30 Hz).
    pub max_lag_samples: usize,
    pub joint_pairs: Vec<JointPair>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 30.0,
            max_lag_samples: 15,
            joint_pairs: vec![
                JointPair::new("spine", "head"),
                JointPair::new("hips", "chest"),
                JointPair::new("chest", "neck"),
            ],
        }
    }
}

impl AnalysisConfig {
    /// Highest accepted resampling rate in Hz.
    pub const MAX_SAMPLE_RATE: f32 = 1000.0;

    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate > 0.0 && self.sample_rate <= Self::MAX_SAMPLE_RATE) {
            return Err(RetargetError::invalid_config(format!(
                "sampleRate must be in (0, {}] Hz, got {}",
                Self::MAX_SAMPLE_RATE,
                self.sample_rate
            )));
        }
        if let Some(pair) = self
            .joint_pairs
            .iter()
            .find(|p| p.driver.is_empty() || p.driven.is_empty())
        {
            return Err(RetargetError::invalid_config(format!(
                "joint pair '{}' -> '{}' has an empty name",
                pair.driver, pair.driven
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    #[must_use]
    pub fn with_max_lag_samples(mut self, max_lag_samples: usize) -> Self {
        self.max_lag_samples = max_lag_samples;
        self
    }

    #[must_use]
    pub fn with_joint_pairs(mut self, joint_pairs: Vec<JointPair>) -> Self {
        self.joint_pairs = joint_pairs;
        self
    }
}
