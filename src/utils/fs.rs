use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{errors::Result, utils::path::PathExtensions};

/// A source file picked up by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub path: PathBuf,
    pub size: u64,
    pub base_name: String,

    /// 1-based position the file occupies in the manifest.
    pub track: u32,
}

impl AudioFile {
    fn read(path: PathBuf, track: u32) -> Result<Self> {
        let size = fs::metadata(&path)?.len();
        let base_name = path.get_file_stem();

        Ok(Self {
            path,
            size,
            base_name,
            track,
        })
    }

    pub fn file_name(&self) -> String {
        self.path.get_file_name()
    }
}

/// Files directly inside `dir` whose extension matches, sorted by file name.
/// Tracks are numbered by that order, starting at 1.
pub fn find_by_extension(dir: &Path, extension: &str) -> Result<Vec<AudioFile>> {
    let mut paths = Vec::<PathBuf>::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_file() && path.has_extension(extension) {
            paths.push(path);
        }
    }

    paths.sort_by_key(|p| p.get_file_name());

    paths
        .into_iter()
        .zip(1..)
        .map(|(path, track)| AudioFile::read(path, track))
        .collect()
}

/// Walks `dir` recursively and keys every matching file by the number its name starts with.
/// On duplicate numbers the first path in sorted order is kept.
pub fn find_by_track_number(dir: &Path, extension: &str) -> Result<BTreeMap<u32, AudioFile>> {
    let mut paths = Vec::<PathBuf>::new();
    read_dir_recursively_impl(dir, extension, &mut paths)?;
    paths.sort();

    let mut tracks = BTreeMap::<u32, AudioFile>::new();
    for path in paths {
        let Some(track) = path.track_number() else {
            log::debug!("Skipping {} without a track number", path.display());
            continue;
        };

        if let Some(existing) = tracks.get(&track) {
            log::warn!(
                "Track {track} found twice, keeping {} over {}",
                existing.path.display(),
                path.display()
            );
            continue;
        }

        tracks.insert(track, AudioFile::read(path, track)?);
    }

    Ok(tracks)
}

fn read_dir_recursively_impl(path: &Path, extension: &str, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            read_dir_recursively_impl(&path, extension, files)?;
            continue;
        }

        if path.has_extension(extension) {
            files.push(path);
        }
    }

    Ok(())
}

/// Removes `path`, treating an already missing file as success.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
        Ok(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn touch(dir: &Path, name: &str, size: usize) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, vec![0u8; size]).unwrap();
        path
    }

    #[test]
    fn extension_discovery_is_case_insensitive_and_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.M4A", 20);
        touch(dir.path(), "a.m4a", 10);
        touch(dir.path(), "c.mp3", 5);
        touch(dir.path(), "nested/d.m4a", 5);

        let files = find_by_extension(dir.path(), "m4a").unwrap();

        let names: Vec<_> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, ["a.m4a", "b.M4A"]);
        assert_eq!(files[0].track, 1);
        assert_eq!(files[1].track, 2);
        assert_eq!(files[0].size, 10);
        assert_eq!(files[1].base_name, "b");
    }

    #[test]
    fn extension_discovery_on_empty_dir_yields_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(find_by_extension(dir.path(), "m4a").unwrap().is_empty());
    }

    #[test]
    fn missing_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(find_by_extension(&dir.path().join("missing"), "m4a").is_err());
    }

    #[test]
    fn track_discovery_walks_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "01 Intro.m4a", 1);
        touch(dir.path(), "disc/02 Verse.M4A", 1);
        touch(dir.path(), "disc/deeper/11 Closer.m4a", 1);
        touch(dir.path(), "disc/cover.jpg", 1);
        touch(dir.path(), "Bonus.m4a", 1);

        let tracks = find_by_track_number(dir.path(), "m4a").unwrap();

        assert_eq!(tracks.keys().copied().collect::<Vec<_>>(), [1, 2, 11]);
        assert_eq!(tracks[&2].base_name, "02 Verse");
        assert_eq!(tracks[&11].track, 11);
    }

    #[test]
    fn duplicate_track_numbers_keep_the_first_sorted_path() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a/03 First.m4a", 1);
        touch(dir.path(), "b/03 Second.m4a", 1);

        let tracks = find_by_track_number(dir.path(), "m4a").unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[&3].base_name, "03 First");
    }

    #[test]
    fn remove_if_exists_tolerates_missing_files() {
        let dir = TempDir::new().unwrap();
        let path = touch(dir.path(), "x.opus", 1);

        remove_if_exists(&path).unwrap();
        assert!(!path.exists());
        remove_if_exists(&path).unwrap();
    }
}
