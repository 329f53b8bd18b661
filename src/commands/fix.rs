use std::{fs, path::Path};

use colored::*;

use crate::{
    cli::FixArgs,
    commands::{ensure_audio_dir, ensure_ffmpeg},
    constants::OUTPUT_EXTENSION,
    errors::Result,
    format::get_track_data,
    utils::{
        bytes_to_mb,
        ffmpeg::{self, EncodeSettings, Encoder, Ffmpeg},
        fs::{find_by_track_number, AudioFile},
    },
};

/// Encoded and source durations further apart than this are flagged.
const DURATION_TOLERANCE_SECS: f64 = 1.0;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct FixOutcome {
    pub fixed: Vec<u32>,
    pub failed: Vec<u32>,
    pub missing: Vec<u32>,
}

pub fn run(args: FixArgs) -> Result<()> {
    ensure_ffmpeg()?;

    let probe_available = ffmpeg::tool_available("ffprobe");
    if !probe_available {
        println!("{}", "ffprobe not found, durations will not be verified".yellow());
    }

    let encoder = Ffmpeg::new(EncodeSettings::constant());
    let outcome = run_with(&encoder, &args, |path| {
        probe_available.then(|| ffmpeg::probe_duration(path))
    })?;

    println!(
        "\nRe-encoded {} tracks, {} failed, {} not found",
        outcome.fixed.len().to_string().green(),
        outcome.failed.len().to_string().red(),
        outcome.missing.len().to_string().yellow()
    );

    Ok(())
}

/// Re-encodes the requested tracks straight to their canonical names.
/// `probe` reads an encoded file's duration back; `None` means probing is unavailable.
pub fn run_with<E, P>(encoder: &E, args: &FixArgs, probe: P) -> Result<FixOutcome>
where
    E: Encoder + ?Sized,
    P: Fn(&Path) -> Option<Result<f64>>,
{
    ensure_audio_dir(&args.audio_dir)?;

    let tracks = find_by_track_number(&args.audio_dir, &args.extension)?;
    println!("Found {} numbered {} files", tracks.len().to_string().green(), args.extension);

    let wanted: Vec<u32> = match &args.tracks {
        Some(requested) => requested.clone(),
        None => tracks.keys().copied().collect(),
    };

    let mut outcome = FixOutcome::default();
    if wanted.is_empty() {
        return Ok(outcome);
    }

    println!("Re-encoding {} tracks", wanted.len());
    fs::create_dir_all(&args.output_dir)?;

    for track in wanted {
        let Some(file) = tracks.get(&track) else {
            println!("{} track {track}, no numbered source file", "Skipping".yellow());
            outcome.missing.push(track);
            continue;
        };

        let target = args.output_dir.join(format!("{}.{OUTPUT_EXTENSION}", file.base_name));
        println!("\nFixing track {track}: {}", file.base_name);

        if let Err(e) = encoder.encode(&file.path, &target, &args.bitrate) {
            println!("{} {}", "Failed to fix".red(), file.base_name);
            println!("Error: {e}");
            outcome.failed.push(track);
            continue;
        }

        let size = match fs::metadata(&target) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                println!("{} {}: {e}", "Failed to read".red(), target.display());
                outcome.failed.push(track);
                continue;
            }
        };
        println!("{} {} ({:.1} MB)", "Fixed:".green(), file.base_name, bytes_to_mb(size));
        verify_duration(file, &target, &probe);

        outcome.fixed.push(track);
    }

    Ok(outcome)
}

fn verify_duration<P>(source: &AudioFile, target: &Path, probe: &P)
where
    P: Fn(&Path) -> Option<Result<f64>>,
{
    let encoded = match probe(target) {
        Some(Ok(duration)) => duration,
        Some(Err(e)) => {
            println!("  Could not verify duration");
            log::debug!("Probing {} failed: {e}", target.display());
            return;
        }
        None => return,
    };

    println!("  Duration: {encoded:.2}s");

    match get_track_data(&source.path) {
        Ok(data) => match data.duration {
            Some(original) if (original - encoded).abs() > DURATION_TOLERANCE_SECS => log::warn!(
                "Track {} is {encoded:.2}s after encoding but the {} source is {original:.2}s",
                source.track,
                data.codec
            ),
            Some(original) => log::debug!("Source duration {original:.2}s ({})", data.codec),
            None => log::debug!("Source {} declares no duration", source.path.display()),
        },
        Err(e) => log::debug!("Could not read source duration: {e}"),
    }
}
