//! motion_report - batch analysis of retargeted clips
//!
//! Reads serialized clip JSON files, measures per-joint Euler envelopes and
//! driver/driven phase lags, and writes `skeleton_limits.json` and
//! `skeleton_behavior.json` to the output directory.

use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use vrm_retarget::AnimationClip;
use vrm_retarget::analysis::{AnalysisConfig, analyze_corpus};
use vrm_retarget::animation::codec;

const LIMITS_FILE: &str = "skeleton_limits.json";
const BEHAVIOR_FILE: &str = "skeleton_behavior.json";

/// Joint envelope and phase-lag report for a corpus of clips
#[derive(Parser)]
#[command(name = "motion_report")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Clip JSON files ({ name, duration, tracks })
    #[arg(required = true)]
    clips: Vec<PathBuf>,

    /// Directory the two reports are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Analysis config JSON (sampleRate, maxLagSamples, jointPairs)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };

    let clips: Vec<AnimationClip> = cli
        .clips
        .iter()
        .filter_map(|path| match load_clip(path) {
            Ok(clip) => Some(clip),
            Err(err) => {
                log::warn!("Skipping {}: {err:#}", path.display());
                None
            }
        })
        .collect();

    if clips.is_empty() {
        anyhow::bail!("none of the {} clip file(s) could be loaded", cli.clips.len());
    }

    let report = analyze_corpus(&clips, &config, |index, behavior| {
        log::info!(
            "[{}/{}] {}: {} phase lag(s)",
            index + 1,
            clips.len(),
            behavior.clip,
            behavior.phase_lags.len()
        );
        ControlFlow::Continue(())
    });

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    write_json(&cli.out_dir.join(LIMITS_FILE), &report.limits)?;
    write_json(&cli.out_dir.join(BEHAVIOR_FILE), &report.behavior)?;

    log::info!(
        "Wrote {LIMITS_FILE} and {BEHAVIOR_FILE} for {} clip(s) to {}",
        report.limits.clip_count,
        cli.out_dir.display()
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    AnalysisConfig::from_json_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))
}

fn load_clip(path: &Path) -> Result<AnimationClip> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(codec::from_json_str(&text)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
