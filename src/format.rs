use std::{fmt::Display, fs::File, path::Path};

use symphonia::core::{
    codecs::{
        CodecParameters, CodecType, CODEC_TYPE_AAC, CODEC_TYPE_ALAC, CODEC_TYPE_FLAC, CODEC_TYPE_MP3,
        CODEC_TYPE_OPUS, CODEC_TYPE_VORBIS,
    },
    formats::Track,
    io::MediaSourceStream,
    probe::Hint,
};

use crate::errors::{Error, Result};

#[derive(Debug)]
pub struct TrackData {
    pub codec: Codec,

    /// Seconds, when the container declares a frame count.
    pub duration: Option<f64>,
}

pub fn get_track_data(path: &Path) -> Result<TrackData> {
    let source = File::open(path)?;

    let mss = MediaSourceStream::new(Box::new(source), Default::default());
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &Default::default(), &Default::default())
        .map_err(|e| Error::descriptive(format!("Failed to probe format: {e}")))?;

    probe_track(probed.format.tracks()).map_err(|e| e.with_context(path.to_string_lossy().into_owned()))
}

fn probe_track(tracks: &[Track]) -> Result<TrackData> {
    let track = tracks
        .first()
        .ok_or_else(|| Error::descriptive("No tracks found in file"))?;

    Ok(TrackData {
        codec: Codec::from_symphonia(track.codec_params.codec),
        duration: duration_of(&track.codec_params),
    })
}

fn duration_of(params: &CodecParameters) -> Option<f64> {
    let frames = params.n_frames?;
    let sample_rate = params.sample_rate.filter(|rate| *rate > 0)?;

    Some(frames as f64 / f64::from(sample_rate))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Opus,
    Vorbis,
    Mp3,
    AacLc,

    Flac,
    Alac,

    Other,
}

impl Codec {
    pub fn from_symphonia(codec_type: CodecType) -> Codec {
        match codec_type {
            CODEC_TYPE_OPUS => Codec::Opus,
            CODEC_TYPE_VORBIS => Codec::Vorbis,
            CODEC_TYPE_MP3 => Codec::Mp3,
            CODEC_TYPE_AAC => Codec::AacLc,
            CODEC_TYPE_FLAC => Codec::Flac,
            CODEC_TYPE_ALAC => Codec::Alac,
            _ => Codec::Other,
        }
    }
}

impl Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match *self {
            Codec::Opus => "opus",
            Codec::Vorbis => "vorbis",
            Codec::Mp3 => "mp3",
            Codec::AacLc => "aac-lc",
            Codec::Flac => "flac",
            Codec::Alac => "alac",
            Codec::Other => "unknown",
        };

        write!(f, "{name}")
    }
}
