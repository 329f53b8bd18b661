use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use serde_json::Value;

use crate::{
    constants::BACKUP_SUFFIX,
    errors::{Error, Result},
    report::CompressionRecord,
};

/// Which state of the manifest lands in the backup file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackupMode {
    /// The manifest bytes exactly as read, before any entry is replaced.
    PrePatch,

    /// The patched manifest, identical to what is written back.
    PostPatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Tracks whose entry now points at a new path.
    pub updated: Vec<u32>,
    pub backup: PathBuf,

    /// False when no entry changed and the manifest was left untouched.
    pub written: bool,
}

pub fn backup_path(manifest: &Path) -> PathBuf {
    let mut name = manifest.as_os_str().to_owned();
    name.push(".");
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

pub fn entry_path(prefix: &str, file_name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{prefix}/{file_name}")
    }
}

/// Points `tracks[<record.track>]` at the record's output for every key already present.
/// Keys are never added or removed. Returns the tracks whose value changed.
pub fn apply(document: &mut Value, records: &[CompressionRecord], prefix: &str) -> Result<Vec<u32>> {
    let Some(tracks) = document.get_mut("tracks") else {
        log::warn!("Manifest has no `tracks` mapping, nothing to patch");
        return Ok(Vec::new());
    };

    let tracks = tracks
        .as_object_mut()
        .ok_or_else(|| Error::descriptive("Manifest `tracks` is not an object"))?;

    let mut updated = Vec::new();
    for record in records {
        let Some(entry) = tracks.get_mut(&record.track.to_string()) else {
            log::debug!("Track {} is not in the manifest, leaving it out", record.track);
            continue;
        };

        let new_path = Value::String(entry_path(prefix, &record.compressed));
        if *entry != new_path {
            *entry = new_path;
            updated.push(record.track);
        }
    }

    Ok(updated)
}

/// Repoints manifest entries at freshly encoded files and writes a `<manifest>.backup` sibling.
pub fn patch(manifest: &Path, records: &[CompressionRecord], prefix: &str, mode: BackupMode) -> Result<PatchOutcome> {
    if !manifest.try_exists()? {
        return Err(Error::descriptive("Manifest not found").with_context(manifest.to_string_lossy().into_owned()));
    }

    let original = fs::read_to_string(manifest)?;
    let mut document: Value =
        serde_json::from_str(&original).map_err(|e| Error::from(e).with_context(manifest.to_string_lossy().into_owned()))?;

    let updated = apply(&mut document, records, prefix)?;
    let written = !updated.is_empty();
    let patched = if written {
        Some(serde_json::to_string_pretty(&document)?)
    } else {
        None
    };

    let backup = backup_path(manifest);
    let backup_content = match (mode, &patched) {
        (BackupMode::PostPatch, Some(patched)) => patched.as_str(),
        _ => original.as_str(),
    };
    fs::write(&backup, backup_content)?;

    if let Some(patched) = &patched {
        fs::write(manifest, patched)?;
    }

    log::debug!(
        "Patched {} tracks in {}, backup at {}",
        updated.len(),
        manifest.display(),
        backup.display()
    );

    Ok(PatchOutcome {
        updated,
        backup,
        written,
    })
}
