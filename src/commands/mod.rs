use std::{
    fmt::Display,
    io::{self, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    errors::{Error, Result},
    utils::ffmpeg::Ffmpeg,
};

pub mod compress;
pub mod fix;

pub fn ensure_ffmpeg() -> Result<()> {
    if !Ffmpeg::available() {
        let message = "ffmpeg not found. Install it (e.g. `brew install ffmpeg` or `apt install ffmpeg`) and try again.";
        return Err(Error::descriptive(message));
    }

    Ok(())
}

pub fn ensure_audio_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(Error::descriptive("Audio directory not found").with_context(dir.to_string_lossy().into_owned()));
    }

    Ok(())
}

pub fn progress_bar(len: u64) -> Result<ProgressBar> {
    let style = ProgressStyle::with_template("{msg}\n[{elapsed_precise}] [{wide_bar:.cyan/blue}] [{pos}/{len}]")
        .map_err(|e| Error::descriptive(format!("Invalid progress template: {e}")))?
        .progress_chars("#>-");

    let indicator = ProgressBar::new(len);
    indicator.set_style(style);
    Ok(indicator)
}

/// Prints above the bar. Unlike `ProgressBar::println` the line is kept when the bar is hidden (stderr not a terminal).
pub fn print_line(indicator: &ProgressBar, line: impl Display) {
    write_line(indicator, &mut io::stdout(), line);
}

fn write_line<W: Write>(indicator: &ProgressBar, out: &mut W, line: impl Display) {
    indicator.suspend(|| {
        if let Err(e) = writeln!(out, "{line}") {
            log::warn!("Could not write to console: {e}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_survive_a_hidden_bar() {
        let indicator = ProgressBar::hidden();
        let mut out = Vec::new();

        write_line(&indicator, &mut out, "   Failed at 48k: boom");
        write_line(&indicator, &mut out, format_args!("   {}: {:.2} MB", "96k", 0.5));

        assert!(indicator.is_hidden());
        assert_eq!(String::from_utf8(out).unwrap(), "   Failed at 48k: boom\n   96k: 0.50 MB\n");
    }

    #[test]
    fn missing_audio_dir_is_described() {
        let err = ensure_audio_dir(Path::new("definitely/not/here")).unwrap_err();
        assert!(err.to_string().starts_with("Audio directory not found"));
    }
}
