use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::Result,
    utils::{ffmpeg::Encoder, fs::remove_if_exists},
};

#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    Encoded { size: u64 },
    Failed { error: String },
}

/// One encode attempt of an input at a single bitrate.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialResult {
    pub bitrate: String,
    pub output: PathBuf,
    pub outcome: TrialOutcome,
}

impl TrialResult {
    pub fn size(&self) -> Option<u64> {
        match self.outcome {
            TrialOutcome::Encoded { size } => Some(size),
            TrialOutcome::Failed { .. } => None,
        }
    }
}

pub fn trial_path(output_dir: &Path, base_name: &str, bitrate: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{base_name}_{bitrate}.{extension}"))
}

/// Encodes once and measures the result. Encoder failures are captured, never propagated.
pub fn run_trial<E: Encoder + ?Sized>(encoder: &E, source: &Path, target: PathBuf, bitrate: &str) -> TrialResult {
    let outcome = match encoder.encode(source, &target, bitrate) {
        Ok(()) => match fs::metadata(&target) {
            Ok(metadata) => TrialOutcome::Encoded { size: metadata.len() },
            Err(e) => TrialOutcome::Failed {
                error: format!("encoder reported success but output is unreadable: {e}"),
            },
        },
        Err(e) => TrialOutcome::Failed { error: e.to_string() },
    };

    TrialResult {
        bitrate: bitrate.to_string(),
        output: target,
        outcome,
    }
}

/// Runs every bitrate of the ladder in order, reporting each result through `on_trial` as it finishes.
/// A label repeated in the ladder is only tried once, since every trial of a label shares one output path.
pub fn run_trials<E, F>(
    encoder: &E,
    source: &Path,
    output_dir: &Path,
    base_name: &str,
    extension: &str,
    bitrates: &[String],
    mut on_trial: F,
) -> Vec<TrialResult>
where
    E: Encoder + ?Sized,
    F: FnMut(&TrialResult),
{
    let mut seen = HashSet::new();

    bitrates
        .iter()
        .filter(|bitrate| {
            let first = seen.insert(bitrate.to_string());
            if !first {
                log::warn!("Bitrate {bitrate} is listed more than once, trying it once");
            }
            first
        })
        .map(|bitrate| {
            let target = trial_path(output_dir, base_name, bitrate, extension);
            let trial = run_trial(encoder, source, target, bitrate);
            on_trial(&trial);
            trial
        })
        .collect()
}

/// Index of the smallest successful trial. Ties keep the earliest.
pub fn select_best(trials: &[TrialResult]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;

    for (index, trial) in trials.iter().enumerate() {
        let Some(size) = trial.size() else {
            continue;
        };

        match best {
            Some((_, best_size)) if size >= best_size => {}
            _ => best = Some((index, size)),
        }
    }

    best.map(|(index, _)| index)
}

/// Deletes every trial artifact except `best`, then moves `best` to `canonical`, replacing whatever is there.
pub fn finalize(trials: &[TrialResult], best: Option<usize>, canonical: &Path) -> Result<Option<PathBuf>> {
    let winner = best.and_then(|index| trials.get(index));

    for trial in trials {
        if winner.is_some_and(|w| w.output == trial.output) {
            continue;
        }

        remove_if_exists(&trial.output)?;
    }

    let Some(winner) = winner else {
        return Ok(None);
    };

    if winner.output != canonical {
        remove_if_exists(canonical)?;
        fs::rename(&winner.output, canonical)?;
    }

    Ok(Some(canonical.to_path_buf()))
}

/// Best-effort removal of every trial artifact, used when finalizing an input failed halfway.
pub fn discard(trials: &[TrialResult]) {
    for trial in trials {
        if let Err(e) = remove_if_exists(&trial.output) {
            log::warn!("Could not remove {}: {e}", trial.output.display());
        }
    }
}
