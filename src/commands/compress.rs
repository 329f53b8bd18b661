use std::fs;

use colored::*;
use indicatif::ProgressBar;

use crate::{
    cli::CompressArgs,
    commands::{ensure_audio_dir, ensure_ffmpeg, print_line, progress_bar},
    constants::{OUTPUT_EXTENSION, REPORT_FILE},
    errors::Result,
    manifest,
    report::{CompressionRecord, Report, Totals},
    selection::{discard, finalize, run_trials, select_best, TrialOutcome},
    utils::{
        bytes_to_mb,
        ffmpeg::{EncodeSettings, Encoder, Ffmpeg},
        fs::{find_by_extension, AudioFile},
    },
};

#[derive(Debug, Default)]
pub struct CompressOutcome {
    pub processed: usize,
    pub records: Vec<CompressionRecord>,
    pub totals: Totals,
}

pub fn run(args: CompressArgs) -> Result<()> {
    ensure_ffmpeg()?;

    let encoder = Ffmpeg::new(EncodeSettings::compress());
    let outcome = run_with(&encoder, &args)?;

    if outcome.processed > 0 {
        outcome.totals.print(&args.output_dir);
    }

    Ok(())
}

/// Everything after the ffmpeg presence check: discovery, trials, manifest patch and report.
pub fn run_with<E: Encoder + ?Sized>(encoder: &E, args: &CompressArgs) -> Result<CompressOutcome> {
    ensure_audio_dir(&args.audio_dir)?;

    let files = find_by_extension(&args.audio_dir, &args.extension)?;
    if files.is_empty() {
        println!(
            "No {} files found in {}",
            args.extension.yellow(),
            args.audio_dir.display()
        );
        return Ok(CompressOutcome::default());
    }

    println!("Found {} {} files", files.len().to_string().green(), args.extension);
    fs::create_dir_all(&args.output_dir)?;

    let indicator = progress_bar(files.len() as u64)?;
    let outcome = compress_files(encoder, &files, args, &indicator)?;
    indicator.finish_and_clear();

    if !args.no_manifest {
        match manifest::patch(&args.manifest, &outcome.records, &args.manifest_prefix, args.backup_mode) {
            Ok(patched) if patched.written => println!(
                "Updated {} ({} tracks, backup saved as {})",
                args.manifest.display().to_string().green(),
                patched.updated.len(),
                patched.backup.display()
            ),
            Ok(patched) => println!(
                "{} already up to date (backup saved as {})",
                args.manifest.display(),
                patched.backup.display()
            ),
            Err(e) => eprintln!("{} {e}", "Could not update manifest:".red()),
        }
    }

    if !args.no_report {
        let path = args.output_dir.join(REPORT_FILE);
        match Report::new(&outcome.totals, &outcome.records).write(&path) {
            Ok(()) => log::info!("Report written to {}", path.display()),
            Err(e) => eprintln!("{} {e}", "Could not write report:".red()),
        }
    }

    Ok(outcome)
}

fn compress_files<E: Encoder + ?Sized>(
    encoder: &E,
    files: &[AudioFile],
    args: &CompressArgs,
    indicator: &ProgressBar,
) -> Result<CompressOutcome> {
    let mut outcome = CompressOutcome::default();

    for file in files {
        let file_name = file.file_name();
        indicator.set_message(format!("Compressing {file_name}"));
        print_line(
            indicator,
            format_args!("\n{} {} ({:.2} MB)", "Processing".bold(), file_name, bytes_to_mb(file.size)),
        );

        outcome.processed += 1;
        outcome.totals.add_input(file);

        let trials = run_trials(
            encoder,
            &file.path,
            &args.output_dir,
            &file.base_name,
            OUTPUT_EXTENSION,
            &args.bitrates,
            |trial| match &trial.outcome {
                TrialOutcome::Encoded { size } => {
                    print_line(indicator, format_args!("   {}: {:.2} MB", trial.bitrate, bytes_to_mb(*size)))
                }
                TrialOutcome::Failed { error } => {
                    print_line(indicator, format_args!("   {} {}: {error}", "Failed at".red(), trial.bitrate))
                }
            },
        );

        let best = select_best(&trials);
        let compressed = format!("{}.{OUTPUT_EXTENSION}", file.base_name);
        let canonical = args.output_dir.join(&compressed);

        let kept = finalize(&trials, best, &canonical).and_then(|kept| match kept {
            Some(path) => Ok(Some(fs::metadata(path)?.len())),
            None => Ok(None),
        });

        match kept {
            Ok(Some(size)) => {
                let record = CompressionRecord::new(file, compressed, size);
                let bitrate = best.map(|index| trials[index].bitrate.as_str()).unwrap_or_default();
                print_line(
                    indicator,
                    format_args!(
                        "   {} {:.2} MB ({:.1}% reduction at {bitrate})",
                        "Compressed:".green(),
                        bytes_to_mb(size),
                        record.reduction,
                    ),
                );

                outcome.totals.add_record(&record);
                outcome.records.push(record);
            }
            Ok(None) => {
                print_line(indicator, format_args!("   {} {file_name}", "Failed to compress".red()));
                outcome.totals.add_failure();
            }
            Err(e) => {
                discard(&trials);
                print_line(
                    indicator,
                    format_args!("   {} {file_name}: {e}", "Failed to finish".red()),
                );
                outcome.totals.add_failure();
            }
        }

        indicator.inc(1);
    }

    Ok(outcome)
}
