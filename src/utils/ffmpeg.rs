use std::{path::Path, process::Command};

use crate::errors::{Error, Result};

/// Fixed libopus parameters; only the bitrate varies between trials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    pub codec: &'static str,
    pub vbr: bool,
    pub compression_level: Option<u8>,
    pub frame_duration_ms: u8,
    pub application: &'static str,
}

impl EncodeSettings {
    /// Variable bitrate at maximum effort, used for the bitrate ladder.
    pub fn compress() -> Self {
        Self {
            codec: "libopus",
            vbr: true,
            compression_level: Some(10),
            frame_duration_ms: 20,
            application: "audio",
        }
    }

    /// Constant bitrate, which browsers report a finite duration for.
    pub fn constant() -> Self {
        Self {
            codec: "libopus",
            vbr: false,
            compression_level: None,
            frame_duration_ms: 20,
            application: "audio",
        }
    }

    pub fn args(&self, bitrate: &str) -> Vec<String> {
        let mut args = vec![
            "-c:a".to_string(),
            self.codec.to_string(),
            "-b:a".to_string(),
            bitrate.to_string(),
            "-vbr".to_string(),
            if self.vbr { "on" } else { "off" }.to_string(),
        ];

        if let Some(level) = self.compression_level {
            args.push("-compression_level".to_string());
            args.push(level.to_string());
        }

        args.extend([
            "-frame_duration".to_string(),
            self.frame_duration_ms.to_string(),
            "-application".to_string(),
            self.application.to_string(),
            "-y".to_string(),
        ]);

        args
    }
}

pub trait Encoder {
    /// Encodes `source` into `target`. A failed encode may leave a partial `target` behind.
    fn encode(&self, source: &Path, target: &Path, bitrate: &str) -> Result<()>;
}

pub struct Ffmpeg {
    pub settings: EncodeSettings,
}

impl Ffmpeg {
    pub fn new(settings: EncodeSettings) -> Self {
        Self { settings }
    }

    pub fn available() -> bool {
        tool_available("ffmpeg")
    }
}

impl Encoder for Ffmpeg {
    fn encode(&self, source: &Path, target: &Path, bitrate: &str) -> Result<()> {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-i")
            .arg(source)
            .args(self.settings.args(bitrate))
            .arg(target);

        log::debug!("Running {cmd:?}");
        let output = cmd.output()?;

        if !output.status.success() {
            let message = format!(
                "ffmpeg exited with code {} detailing {}",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(Error::descriptive(message));
        }

        Ok(())
    }
}

pub fn tool_available(name: &str) -> bool {
    Command::new(name)
        .arg("-version")
        .output()
        .is_ok_and(|output| output.status.success())
}

/// Container duration in seconds as reported by ffprobe.
pub fn probe_duration(path: &Path) -> Result<f64> {
    let mut cmd = Command::new("ffprobe");
    cmd.args(["-v", "quiet", "-show_entries", "format=duration", "-of", "csv=p=0"])
        .arg(path);

    log::debug!("Running {cmd:?}");
    let output = cmd.output()?;

    if !output.status.success() {
        let message = format!("ffprobe exited with code {}", output.status.code().unwrap_or(-1));
        return Err(Error::descriptive(message).with_context(path.to_string_lossy().into_owned()));
    }

    parse_duration(&String::from_utf8_lossy(&output.stdout))
}

fn parse_duration(stdout: &str) -> Result<f64> {
    let trimmed = stdout.trim();

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .ok_or_else(|| Error::descriptive("Unreadable duration").with_context(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_profile_args() {
        let args = EncodeSettings::compress().args("48k");
        assert_eq!(
            args,
            [
                "-c:a",
                "libopus",
                "-b:a",
                "48k",
                "-vbr",
                "on",
                "-compression_level",
                "10",
                "-frame_duration",
                "20",
                "-application",
                "audio",
                "-y"
            ]
        );
    }

    #[test]
    fn constant_profile_turns_vbr_off_and_skips_compression_level() {
        let args = EncodeSettings::constant().args("48k");

        assert!(args.windows(2).any(|w| w == ["-vbr", "off"]));
        assert!(!args.iter().any(|a| a == "-compression_level"));
        assert_eq!(args.last().map(String::as_str), Some("-y"));
    }

    #[test]
    fn duration_parsing() {
        assert_eq!(parse_duration("183.456000\n").unwrap(), 183.456);
        assert!(parse_duration("N/A").is_err());
        assert!(parse_duration("inf").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn missing_tool_is_unavailable() {
        assert!(!tool_available("nonexistent_tool_12345"));
    }
}
