// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Classifier / organizer over an input and an output directory tree
//!
//! The input tree is never cached: every listing walks the directory again, so
//! "pending" always means "still present under the input root". All moves,
//! single or batched, are serialized through one lock.

pub mod naming;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::analyzers::{self, fingerprint};
use crate::{PhotosiftError, Result};
pub use naming::{RandomPrefix, SequentialPrefix, UniquenessSource};

/// Category receiving every member of a duplicate group but the first
pub const DUPLICATE_CATEGORY: &str = "Duplicate";
/// Category receiving files that are not openable images
pub const NON_IMAGE_CATEGORY: &str = "Non-Image";

/// Attempts at drawing a prefix that does not clash with an existing file
const MAX_NAME_ATTEMPTS: usize = 16;

/// Outcome of a conversion pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Files re-encoded and removed
    pub converted: Vec<PathBuf>,
    /// Files that failed to convert and were kept
    pub failed: Vec<PathBuf>,
}

/// Moves files from the input tree into categorised folders of the output tree
pub struct Organizer {
    input_dir: PathBuf,
    output_dir: PathBuf,
    uniqueness: Box<dyn UniquenessSource>,
    move_lock: Mutex<()>,
}

impl Organizer {
    /// Create an organizer drawing random filename prefixes
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self::with_uniqueness(input_dir, output_dir, Box::new(RandomPrefix))
    }

    /// Create an organizer with a custom prefix source
    pub fn with_uniqueness(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        uniqueness: Box<dyn UniquenessSource>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            uniqueness,
            move_lock: Mutex::new(()),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn lock_moves(&self) -> Result<MutexGuard<'_, ()>> {
        self.move_lock.lock().map_err(|_| PhotosiftError::LockPoisoned)
    }

    /// Every regular file under the input root, sorted by full path string
    pub fn list_pending_files(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.input_dir) {
            let entry = entry?;
            if entry.path().is_file() {
                paths.push(entry.into_path());
            }
        }
        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        Ok(paths)
    }

    /// First pending file in sorted order
    pub fn next_pending_path(&self) -> Result<Option<PathBuf>> {
        Ok(self.list_pending_files()?.into_iter().next())
    }

    /// Check whether `path` lies inside the input root
    pub fn is_pending_path(&self, path: &Path) -> bool {
        path.starts_with(&self.input_dir)
            && !path.components().any(|c| matches!(c, Component::ParentDir))
    }

    /// Move one file into `output/<category>/`, returning its new path
    pub fn move_to_category(&self, path: &Path, category: &str) -> Result<PathBuf> {
        let _guard = self.lock_moves()?;
        self.move_locked(path, category)
    }

    fn move_locked(&self, path: &Path, category: &str) -> Result<PathBuf> {
        validate_category(category)?;
        self.validate_source(path)?;

        let dir = self.output_dir.join(category);
        fs::create_dir_all(&dir)?;

        let destination = self.free_destination(&dir, path)?;
        info!("Moving {:?} -> {:?}", path, destination);
        move_file(path, &destination)?;
        Ok(destination)
    }

    /// Only regular files inside the input tree may be moved. A source that
    /// does not exist is left for the rename to report as not found.
    fn validate_source(&self, path: &Path) -> Result<()> {
        let outside = !self.is_pending_path(path);
        let not_a_file = path.metadata().map_or(false, |meta| !meta.is_file());
        if outside || not_a_file {
            return Err(PhotosiftError::NotPending(path.to_path_buf()));
        }
        Ok(())
    }

    fn free_destination(&self, dir: &Path, source: &Path) -> Result<PathBuf> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let candidate = dir.join(naming::simple_filename(source, self.uniqueness.as_ref()));
            if !candidate.exists() {
                return Ok(candidate);
            }
            debug!("Name clash at {:?}, drawing another prefix", candidate);
        }
        Err(PhotosiftError::FileSystem(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free destination name for {:?} in {:?}", source, dir),
        )))
    }

    /// Group paths by content fingerprint
    ///
    /// Groups keep the order in which their members appear in `paths`, and
    /// come out in order of first discovery. Singletons are dropped.
    pub fn find_duplicate_groups(paths: &[PathBuf]) -> Result<Vec<Vec<PathBuf>>> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Vec<PathBuf>> = Vec::new();

        for path in paths {
            let digest = fingerprint(path)?;
            match index.get(&digest) {
                Some(&i) => groups[i].push(path.clone()),
                None => {
                    index.insert(digest, groups.len());
                    groups.push(vec![path.clone()]);
                }
            }
        }

        groups.retain(|group| group.len() > 1);
        Ok(groups)
    }

    /// Keep the first file of every duplicate group, move the others to
    /// `Duplicate`
    pub fn move_duplicates(&self) -> Result<usize> {
        let _guard = self.lock_moves()?;
        let paths = self.list_pending_files()?;

        info!("Finding duplicates among {} files...", paths.len());
        let groups = Self::find_duplicate_groups(&paths)?;

        let mut moved = 0;
        for group in &groups {
            info!("Found {} copies of {:?}", group.len(), group[0]);
            for path in &group[1..] {
                self.move_locked(path, DUPLICATE_CATEGORY)?;
                moved += 1;
            }
        }
        Ok(moved)
    }

    /// Move every file with a capture year into a folder named after it;
    /// files without one stay where they are
    pub fn classify_by_date(&self) -> Result<usize> {
        let _guard = self.lock_moves()?;

        let mut moved = 0;
        for path in self.list_pending_files()? {
            if let Some(year) = analyzers::extract_year(&path) {
                info!("Found year {} for {:?}", year, path);
                self.move_locked(&path, &year)?;
                moved += 1;
            }
        }
        Ok(moved)
    }

    /// Move every file that is not an openable image to `Non-Image`
    pub fn classify_non_images(&self) -> Result<usize> {
        let _guard = self.lock_moves()?;

        let mut moved = 0;
        for path in self.list_pending_files()? {
            if !analyzers::is_image(&path) {
                self.move_locked(&path, NON_IMAGE_CATEGORY)?;
                moved += 1;
            }
        }
        Ok(moved)
    }

    /// Re-encode every pending file of `mime_type` as PNG beside it
    ///
    /// A file that fails to convert is logged and kept; only successfully
    /// converted originals are removed.
    pub fn convert_images(&self, mime_type: &str) -> Result<ConversionReport> {
        let _guard = self.lock_moves()?;

        let selected: Vec<PathBuf> = self
            .list_pending_files()?
            .into_iter()
            .filter(|path| analyzers::is_mime_type(mime_type, path))
            .collect();

        let mut report = ConversionReport::default();
        for path in selected {
            info!("Converting {} {:?}", mime_type, path);
            match analyzers::convert_to_png(&path) {
                Ok(target) => {
                    debug!("Wrote {:?}", target);
                    report.converted.push(path);
                }
                Err(e) => {
                    warn!("Failed to convert {:?}: {}", path, e);
                    report.failed.push(path);
                }
            }
        }

        info!(
            "Converted {} {} files ({} failed)",
            report.converted.len(),
            mime_type,
            report.failed.len()
        );
        for path in &report.converted {
            fs::remove_file(path)?;
        }
        Ok(report)
    }
}

/// Categories are single, plain path components under the output root
fn validate_category(category: &str) -> Result<()> {
    let mut components = Path::new(category).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !category.contains(['/', '\\']) => Ok(()),
        _ => Err(PhotosiftError::InvalidCategory(category.to_string())),
    }
}

/// Rename, falling back to copy + remove only when the rename would cross
/// devices
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("Rename failed ({}), copying {:?} instead", e, from);
            copy_then_remove(from, to, |source| fs::remove_file(source))
        }
        result => result,
    }
}

/// Copy `from` to `to`, then remove the source with `remove_source`. Any
/// failure removes the copy again, so the file never ends up in both places.
fn copy_then_remove<F>(from: &Path, to: &Path, remove_source: F) -> io::Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    if let Err(e) = fs::copy(from, to) {
        let _ = fs::remove_file(to);
        return Err(e);
    }
    if let Err(e) = remove_source(from) {
        warn!("Cannot remove {:?} after copying it, dropping the copy: {}", from, e);
        let _ = fs::remove_file(to);
        return Err(e);
    }
    Ok(())
}
