use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use colored::*;
use serde::{Deserialize, Serialize};

use crate::{
    errors::Result,
    utils::{bytes_to_mb, fs::AudioFile, reduction_percent},
};

/// One successfully compressed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionRecord {
    pub track: u32,
    pub original: String,
    pub compressed: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub reduction: f64,
}

impl CompressionRecord {
    pub fn new(input: &AudioFile, compressed: String, compressed_size: u64) -> Self {
        Self {
            track: input.track,
            original: input.file_name(),
            compressed,
            original_size: input.size,
            compressed_size,
            reduction: reduction_percent(input.size, compressed_size),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Totals {
    /// Every processed input counts here, even when all of its trials failed.
    pub original_size: u64,
    pub compressed_size: u64,
    pub failed: usize,
}

impl Totals {
    pub fn add_input(&mut self, input: &AudioFile) {
        self.original_size += input.size;
    }

    pub fn add_record(&mut self, record: &CompressionRecord) {
        self.compressed_size += record.compressed_size;
    }

    pub fn add_failure(&mut self) {
        self.failed += 1;
    }

    pub fn reduction(&self) -> f64 {
        reduction_percent(self.original_size, self.compressed_size)
    }

    pub fn print(&self, output_dir: &Path) {
        println!("\n{}", "Compression summary".bold().underline());
        println!("Total original size:   {:.2} MB", bytes_to_mb(self.original_size));
        println!("Total compressed size: {:.2} MB", bytes_to_mb(self.compressed_size));
        println!(
            "Total size reduction:  {}",
            format!("{:.1}%", self.reduction()).green()
        );

        if self.failed > 0 {
            println!("Failed inputs:         {}", self.failed.to_string().red());
        }

        println!("Compressed files saved to {}", output_dir.display().to_string().cyan());
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub original_size: u64,
    pub compressed_size: u64,
    pub reduction: f64,
    pub records: Vec<CompressionRecord>,
}

impl Report {
    pub fn new(totals: &Totals, records: &[CompressionRecord]) -> Self {
        Self {
            generated_at: Utc::now(),
            original_size: totals.original_size,
            compressed_size: totals.compressed_size,
            reduction: totals.reduction(),
            records: records.to_vec(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    fn input(track: u32, size: u64) -> AudioFile {
        AudioFile {
            path: PathBuf::from(format!("assets/audio/{track:02} Song.m4a")),
            size,
            base_name: format!("{track:02} Song"),
            track,
        }
    }

    #[test]
    fn record_computes_reduction() {
        let record = CompressionRecord::new(&input(3, 4000), "03 Song.opus".to_string(), 1000);

        assert_eq!(record.track, 3);
        assert_eq!(record.original, "03 Song.m4a");
        assert_eq!(record.reduction, 75.0);
    }

    #[test]
    fn totals_include_failed_inputs_in_the_original_size() {
        let mut totals = Totals::default();
        let ok = input(1, 1000);
        let bad = input(2, 1000);

        totals.add_input(&ok);
        totals.add_record(&CompressionRecord::new(&ok, "01 Song.opus".to_string(), 500));
        totals.add_input(&bad);
        totals.add_failure();

        assert_eq!(totals.original_size, 2000);
        assert_eq!(totals.compressed_size, 500);
        assert_eq!(totals.failed, 1);
        assert_eq!(totals.reduction(), 75.0);
    }

    #[test]
    fn report_is_written_as_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compression_report.json");
        let mut totals = Totals::default();
        let file = input(1, 2000);
        let record = CompressionRecord::new(&file, "01 Song.opus".to_string(), 500);
        totals.add_input(&file);
        totals.add_record(&record);

        Report::new(&totals, &[record.clone()]).write(&path).unwrap();

        let read: Report = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read.records, [record]);
        assert_eq!(read.original_size, 2000);
        assert_eq!(read.reduction, 75.0);
    }
}
