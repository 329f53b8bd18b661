pub const AUDIO_DIR: &str = "assets/audio";
pub const COMPRESSED_DIR: &str = "assets/audio/compressed";
pub const SOURCE_EXTENSION: &str = "m4a";
pub const OUTPUT_EXTENSION: &str = "opus";

pub const MANIFEST_FILE: &str = "links.json";
pub const MANIFEST_PATH_PREFIX: &str = "assets/audio/compressed";
pub const BACKUP_SUFFIX: &str = "backup";

pub const REPORT_FILE: &str = "compression_report.json";

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
