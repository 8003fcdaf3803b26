//! Phase-lag detection between two joint rotation tracks.
//!
//! Both tracks are slerp-resampled at a fixed rate, turned into angular
//! speed series, and compared with Pearson correlation over a range of
//! lag offsets. The best lag says how many samples the driven joint trails
//! the driver.

use glam::Quat;
use serde::Serialize;

use crate::analysis::AnalysisConfig;
use crate::animation::clip::AnimationClip;
use crate::animation::tracks::{KeyframeCursor, KeyframeTrack};

/// Result of [`detect_phase_lag`] for one driver/driven pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseLagReport {
    pub driver: String,
    pub driven: String,
    pub lag_samples: usize,
    pub lag_seconds: f32,
    pub correlation: f32,
}

/// Upper bound on samples produced per track.
const MAX_RESAMPLED: usize = 1 << 22;

/// Samples `track` every `1 / sample_rate` seconds over `[0, duration]`.
///
/// Empty when the request would exceed an internal sample cap.
#[must_use]
pub fn resample_quaternion_track(
    track: &KeyframeTrack<Quat>,
    duration: f32,
    sample_rate: f32,
) -> Vec<Quat> {
    if track.is_empty() || sample_rate <= 0.0 || !duration.is_finite() || duration < 0.0 {
        return Vec::new();
    }

    // Tolerance keeps a key that lands exactly on the end from being lost to rounding.
    let steps = (duration * sample_rate + 1e-3).floor();
    if !steps.is_finite() || steps >= MAX_RESAMPLED as f32 {
        log::warn!("Refusing to resample {duration}s at {sample_rate} Hz");
        return Vec::new();
    }
    let count = steps as usize + 1;
    let mut cursor = KeyframeCursor::default();

    (0..count)
        .filter_map(|i| {
            let time = i as f32 / sample_rate;
            track
                .sample_with_cursor(time, &mut cursor)
                .map(Quat::normalize)
        })
        .collect()
}

/// Angular speed between consecutive samples in radians per second.
///
/// `|dot|` folds the quaternion double cover so `q` and `-q` count as no motion.
#[must_use]
pub fn angular_velocity(samples: &[Quat], sample_rate: f32) -> Vec<f32> {
    samples
        .windows(2)
        .map(|w| 2.0 * w[0].dot(w[1]).abs().min(1.0).acos() * sample_rate)
        .collect()
}

/// Pearson correlation of the common prefix of `a` and `b`.
///
/// Returns 0 when either series has no variance or fewer than two samples.
#[must_use]
pub fn pearson(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    if len < 2 {
        return 0.0;
    }
    let (a, b) = (&a[..len], &b[..len]);

    let n = len as f64;
    let mean_a = a.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let mean_b = b.iter().map(|&v| f64::from(v)).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = f64::from(x) - mean_a;
        let dy = f64::from(y) - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (cov / denom) as f32
}

/// Lag in `0..=max_lag` that maximizes the correlation of `driver[..n - lag]`
/// against `driven[lag..n]`. Ties keep the smaller lag.
///
/// Returns `(lag, correlation)`, or `None` when no lag leaves two overlapping samples.
#[must_use]
pub fn find_velocity_lag(driver: &[f32], driven: &[f32], max_lag: usize) -> Option<(usize, f32)> {
    let n = driver.len().min(driven.len());
    let mut best: Option<(usize, f32)> = None;

    for lag in 0..=max_lag {
        if n < lag + 2 {
            break;
        }
        let corr = pearson(&driver[..n - lag], &driven[lag..n]);
        if best.is_none_or(|(_, c)| corr > c) {
            best = Some((lag, corr));
        }
    }

    best
}

/// Finds the rotation track whose node leaf names `joint` (case-insensitive).
fn rotation_track<'a>(clip: &'a AnimationClip, joint: &str) -> Option<&'a KeyframeTrack<Quat>> {
    clip.tracks.iter().find_map(|track| {
        let keys = track.as_quaternion()?;
        let binding = track.binding()?;
        binding.leaf().eq_ignore_ascii_case(joint).then_some(keys)
    })
}

/// Measures how far `driven` trails `driver` in `clip`.
///
/// `None` when either joint has no rotation track or the shared span is too
/// short to correlate.
#[must_use]
pub fn detect_phase_lag(
    clip: &AnimationClip,
    driver: &str,
    driven: &str,
    config: &AnalysisConfig,
) -> Option<PhaseLagReport> {
    let driver_keys = rotation_track(clip, driver)?;
    let driven_keys = rotation_track(clip, driven)?;

    let duration = driver_keys.end_time().min(driven_keys.end_time());
    let rate = config.sample_rate;

    let driver_speed = angular_velocity(&resample_quaternion_track(driver_keys, duration, rate), rate);
    let driven_speed = angular_velocity(&resample_quaternion_track(driven_keys, duration, rate), rate);

    let Some((lag_samples, correlation)) =
        find_velocity_lag(&driver_speed, &driven_speed, config.max_lag_samples)
    else {
        log::debug!(
            "'{}': {driver}/{driven} span too short for lag detection",
            clip.name
        );
        return None;
    };

    Some(PhaseLagReport {
        driver: driver.to_string(),
        driven: driven.to_string(),
        lag_samples,
        lag_seconds: lag_samples as f32 / rate,
        correlation,
    })
}
