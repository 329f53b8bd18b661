use std::path::PathBuf;

use anstyle::{AnsiColor, Color, Style};
use clap::{Args, Parser, Subcommand};

use crate::{constants, manifest::BackupMode};

#[derive(Parser)]
#[command(author, version, about, long_about = None, styles = get_styles())]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print debug diagnostics, including every external command invoked.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Converts every matching file to opus, keeping the smallest output of the bitrate ladder.
    Compress(CompressArgs),

    /// Re-encodes selected tracks with constant bitrate settings and verifies their duration.
    Fix(FixArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CompressArgs {
    /// The directory holding the source audio files.
    #[arg(long, default_value = constants::AUDIO_DIR)]
    pub audio_dir: PathBuf,

    /// The directory to write encoded files to.
    #[arg(long, default_value = constants::COMPRESSED_DIR)]
    pub output_dir: PathBuf,

    /// The extension of source files, matched case-insensitively.
    #[arg(long, default_value = constants::SOURCE_EXTENSION)]
    pub extension: String,

    #[arg(
        long,
        value_delimiter = ',',
        default_value = "48k,96k",
        long_help = "\
A comma-separated list of bitrates to try for every file, in order.
The smallest successful output wins, ties go to the earlier bitrate."
    )]
    pub bitrates: Vec<String>,

    /// The JSON manifest whose `tracks` entries are repointed at the new files.
    #[arg(long, default_value = constants::MANIFEST_FILE)]
    pub manifest: PathBuf,

    /// The path prefix written into manifest entries.
    #[arg(long, default_value = constants::MANIFEST_PATH_PREFIX)]
    pub manifest_prefix: String,

    #[arg(
        long,
        value_enum,
        default_value_t = BackupMode::PrePatch,
        long_help = "\
Which state of the manifest is written to the backup file.
    - pre-patch: the manifest as it was read, before any entry is replaced.
    - post-patch: the patched manifest, identical to the final file."
    )]
    pub backup_mode: BackupMode,

    /// Skips patching the manifest.
    #[arg(long)]
    pub no_manifest: bool,

    /// Skips writing the JSON compression report.
    #[arg(long)]
    pub no_report: bool,
}

impl Default for CompressArgs {
    fn default() -> Self {
        Self {
            audio_dir: PathBuf::from(constants::AUDIO_DIR),
            output_dir: PathBuf::from(constants::COMPRESSED_DIR),
            extension: constants::SOURCE_EXTENSION.to_string(),
            bitrates: vec!["48k".to_string(), "96k".to_string()],
            manifest: PathBuf::from(constants::MANIFEST_FILE),
            manifest_prefix: constants::MANIFEST_PATH_PREFIX.to_string(),
            backup_mode: BackupMode::PrePatch,
            no_manifest: false,
            no_report: false,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FixArgs {
    /// The directory walked (recursively) for numbered source files.
    #[arg(long, default_value = constants::AUDIO_DIR)]
    pub audio_dir: PathBuf,

    /// The directory holding the encoded files to replace.
    #[arg(long, default_value = constants::COMPRESSED_DIR)]
    pub output_dir: PathBuf,

    /// The extension of source files, matched case-insensitively.
    #[arg(long, default_value = constants::SOURCE_EXTENSION)]
    pub extension: String,

    #[arg(
        long,
        value_delimiter = ',',
        long_help = "\
A comma-separated list of track numbers to re-encode, e.g. `1,4,5`.
Track numbers come from the leading digits of each file name.
Every discovered track is re-encoded when omitted."
    )]
    pub tracks: Option<Vec<u32>>,

    /// The constant bitrate to encode at.
    #[arg(long, default_value = "48k")]
    pub bitrate: String,
}

fn colored(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

fn heading() -> Style {
    colored(AnsiColor::Cyan).bold().underline()
}

fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(heading())
        .header(heading())
        .literal(colored(AnsiColor::Green))
        .valid(colored(AnsiColor::Green).bold())
        .invalid(colored(AnsiColor::Red).bold())
        .error(colored(AnsiColor::Red).bold())
        .placeholder(colored(AnsiColor::BrightBlack))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn headings_are_bold_cyan() {
        let style = heading();
        assert_eq!(style.get_fg_color(), Some(Color::Ansi(AnsiColor::Cyan)));
        assert!(style.get_effects().contains(anstyle::Effects::BOLD));
    }

    #[test]
    fn no_arguments_means_no_subcommand() {
        let cli = Cli::try_parse_from(["opusify"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn compress_defaults_match_the_fixed_layout() {
        let cli = Cli::try_parse_from(["opusify", "compress"]).unwrap();
        let Some(Commands::Compress(args)) = cli.command else {
            panic!("expected compress");
        };

        let defaults = CompressArgs::default();
        assert_eq!(args.audio_dir, defaults.audio_dir);
        assert_eq!(args.output_dir, defaults.output_dir);
        assert_eq!(args.bitrates, defaults.bitrates);
        assert_eq!(args.manifest, defaults.manifest);
        assert_eq!(args.backup_mode, BackupMode::PrePatch);
    }

    #[test]
    fn fix_parses_track_list() {
        let cli = Cli::try_parse_from(["opusify", "fix", "--tracks", "1,4,5"]).unwrap();
        let Some(Commands::Fix(args)) = cli.command else {
            panic!("expected fix");
        };

        assert_eq!(args.tracks, Some(vec![1, 4, 5]));
        assert_eq!(args.bitrate, "48k");
    }

    #[test]
    fn backup_mode_accepts_post_patch() {
        let cli = Cli::try_parse_from(["opusify", "compress", "--backup-mode", "post-patch"]).unwrap();
        let Some(Commands::Compress(args)) = cli.command else {
            panic!("expected compress");
        };

        assert_eq!(args.backup_mode, BackupMode::PostPatch);
    }
}
