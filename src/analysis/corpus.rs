use std::collections::BTreeMap;
use std::ops::ControlFlow;

use serde::Serialize;

use crate::analysis::AnalysisConfig;
use crate::analysis::envelope::{EnvelopeAccumulator, JointEnvelope};
use crate::analysis::phase::{PhaseLagReport, detect_phase_lag};
use crate::animation::clip::AnimationClip;

/// Contents of `skeleton_limits.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkeletonLimits {
    pub clip_count: usize,
    pub joints: BTreeMap<String, JointEnvelope>,
}

/// Phase lags measured in a single clip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipBehavior {
    pub clip: String,
    pub phase_lags: Vec<PhaseLagReport>,
}

/// Mean lag of one joint pair over every clip that had both joints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSummary {
    pub driver: String,
    pub driven: String,
    pub clip_count: usize,
    pub mean_lag_seconds: f32,
    pub mean_correlation: f32,
}

/// Contents of `skeleton_behavior.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkeletonBehavior {
    pub sample_rate: f32,
    pub max_lag_samples: usize,
    pub pairs: Vec<PairSummary>,
    pub clips: Vec<ClipBehavior>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusReport {
    pub limits: SkeletonLimits,
    pub behavior: SkeletonBehavior,
}

/// Incremental corpus analysis. Feed clips one at a time with
/// [`add_clip`](Self::add_clip), then call [`finish`](Self::finish).
#[derive(Debug, Clone)]
pub struct MotionAnalyzer {
    config: AnalysisConfig,
    envelopes: EnvelopeAccumulator,
    clips: Vec<ClipBehavior>,
}

impl MotionAnalyzer {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            envelopes: EnvelopeAccumulator::new(),
            clips: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Runs both passes over `clip` and returns its phase lags.
    pub fn add_clip(&mut self, clip: &AnimationClip) -> &ClipBehavior {
        self.envelopes.add_clip(clip);

        let phase_lags = self
            .config
            .joint_pairs
            .iter()
            .filter_map(|pair| detect_phase_lag(clip, &pair.driver, &pair.driven, &self.config))
            .collect();

        let index = self.clips.len();
        self.clips.push(ClipBehavior {
            clip: clip.name.clone(),
            phase_lags,
        });
        &self.clips[index]
    }

    #[must_use]
    pub fn finish(self) -> CorpusReport {
        let pairs = self
            .config
            .joint_pairs
            .iter()
            .map(|pair| {
                let reports: Vec<&PhaseLagReport> = self
                    .clips
                    .iter()
                    .flat_map(|c| &c.phase_lags)
                    .filter(|r| r.driver == pair.driver && r.driven == pair.driven)
                    .collect();
                let count = reports.len();
                let mean = |f: fn(&PhaseLagReport) -> f32| {
                    if count == 0 {
                        0.0
                    } else {
                        reports.iter().map(|r| f(r)).sum::<f32>() / count as f32
                    }
                };
                PairSummary {
                    driver: pair.driver.clone(),
                    driven: pair.driven.clone(),
                    clip_count: count,
                    mean_lag_seconds: mean(|r| r.lag_seconds),
                    mean_correlation: mean(|r| r.correlation),
                }
            })
            .collect();

        log::info!(
            "Analyzed {} clip(s): {} joint envelope(s)",
            self.clips.len(),
            self.envelopes.joint_count()
        );

        CorpusReport {
            limits: SkeletonLimits {
                clip_count: self.clips.len(),
                joints: self.envelopes.finish(),
            },
            behavior: SkeletonBehavior {
                sample_rate: self.config.sample_rate,
                max_lag_samples: self.config.max_lag_samples,
                pairs,
                clips: self.clips,
            },
        }
    }
}

/// Analyzes `clips` in order. `on_clip` sees each clip's index and lags and
/// may stop the pass early; clips after a `Break` are not analyzed.
pub fn analyze_corpus<'a, I, F>(clips: I, config: &AnalysisConfig, mut on_clip: F) -> CorpusReport
where
    I: IntoIterator<Item = &'a AnimationClip>,
    F: FnMut(usize, &ClipBehavior) -> ControlFlow<()>,
{
    let mut analyzer = MotionAnalyzer::new(config.clone());
    for (index, clip) in clips.into_iter().enumerate() {
        let behavior = analyzer.add_clip(clip);
        if on_clip(index, behavior).is_break() {
            log::info!("Corpus analysis stopped after clip {index}");
            break;
        }
    }
    analyzer.finish()
}
