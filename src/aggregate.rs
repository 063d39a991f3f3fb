//! Per-subfolder file counts, sizes and audio durations.
//!
//! Every immediate subdirectory of the root becomes one [`FolderStats`] row.
//! Files are classified by size (empty or not) and, when their name ends in
//! `.wav`, opened to read a duration. Problems with individual files are
//! logged and collected as [`ScanWarning`]s; only a bad root is an error.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::audio::{has_extension, is_audio_file, wav_duration};
use crate::error::{Error, FileError, Result};
use crate::progress;
use crate::stats::{AggregateReport, FolderStats, ScanWarning};

/// Prefix of the metadata shadow files macOS leaves on foreign filesystems.
pub const RESOURCE_FORK_PREFIX: &str = "._";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub recursive: bool,
    pub extension_filter: Option<String>,
    pub hidden_file_prefixes: BTreeSet<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            extension_filter: None,
            hidden_file_prefixes: BTreeSet::from([RESOURCE_FORK_PREFIX.to_string()]),
        }
    }
}

impl ScanOptions {
    #[must_use]
    pub const fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Restricts counting to one extension. `"wav"` and `".WAV"` are equivalent.
    #[must_use]
    pub fn with_extension_filter(mut self, extension: Option<&str>) -> Self {
        self.extension_filter = extension.map(normalize_extension);
        self
    }

    #[must_use]
    pub fn with_hidden_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_file_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    fn is_hidden(&self, name: &str) -> bool {
        self.hidden_file_prefixes
            .iter()
            .any(|p| !p.is_empty() && name.starts_with(p.as_str()))
    }

    /// Name-only checks: hidden prefix and extension filter.
    fn is_candidate(&self, name: &str) -> bool {
        if self.is_hidden(name) {
            return false;
        }
        self.extension_filter
            .as_deref()
            .map_or(true, |ext| has_extension(name, ext))
    }
}

fn normalize_extension(extension: &str) -> String {
    let ext = extension.trim();
    if ext.starts_with('.') {
        ext.to_lowercase()
    } else {
        format!(".{}", ext.to_lowercase())
    }
}

pub fn aggregate<P: AsRef<Path>>(root: P, options: &ScanOptions) -> Result<AggregateReport> {
    aggregate_with_progress(root, options, &ProgressBar::hidden())
}

/// Scans `root`, advancing `pb` once per subfolder.
///
/// # Errors
///
/// Returns `Error::RootNotFound` if `root` does not exist or is not a
/// directory, `Error::PermissionDenied` if it cannot be listed, and
/// `Error::Io` for any other failure listing it. Failures below the root
/// never produce an error.
pub fn aggregate_with_progress<P: AsRef<Path>>(
    root: P,
    options: &ScanOptions,
    pb: &ProgressBar,
) -> Result<AggregateReport> {
    let root = root.as_ref();
    let subfolders = list_subfolders(root)?;

    info!(
        "Scanning {} subfolders of {:?} (recursive: {}, filter: {:?})",
        subfolders.len(),
        root,
        options.recursive,
        options.extension_filter
    );

    progress::resize(pb, subfolders.len() as u64);

    let mut warnings = Vec::new();
    let mut folders = Vec::with_capacity(subfolders.len());
    for (name, path) in subfolders {
        pb.set_message(name.clone());
        let stats = scan_folder(name, &path, options, &mut warnings);
        debug!(
            "{}: {} files, {} empty, {} bytes, {:.2}s",
            stats.name,
            stats.non_empty_file_count,
            stats.empty_file_count,
            stats.total_size_bytes,
            stats.total_duration_seconds
        );
        folders.push(stats);
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} warnings", warnings.len()));

    info!(
        "Scanned {} subfolders with {} warnings",
        folders.len(),
        warnings.len()
    );

    Ok(AggregateReport::new(
        folders,
        warnings,
        options.extension_filter.clone(),
    ))
}

/// Immediate child directories of `root`, sorted by name.
fn list_subfolders(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !root.is_dir() {
        return Err(Error::RootNotFound(root.to_path_buf()));
    }

    let entries = fs::read_dir(root).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::RootNotFound(root.to_path_buf()),
        io::ErrorKind::PermissionDenied => Error::PermissionDenied(root.to_path_buf()),
        _ => Error::Io(e),
    })?;

    let mut subfolders = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            let name = path
                .file_name()
                .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
            subfolders.push((name, path));
        }
    }
    subfolders.sort_unstable();
    Ok(subfolders)
}

fn scan_folder(
    name: String,
    dir: &Path,
    options: &ScanOptions,
    warnings: &mut Vec<ScanWarning>,
) -> FolderStats {
    let mut stats = FolderStats::new(name);
    for path in candidate_files(dir, options, warnings) {
        visit_file(&path, &mut stats, warnings);
    }
    stats
}

/// Files under `dir` whose names pass the option filters, in name order.
fn candidate_files(
    dir: &Path,
    options: &ScanOptions,
    warnings: &mut Vec<ScanWarning>,
) -> Vec<PathBuf> {
    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_dir() {
                    continue;
                }
                if options.is_candidate(&entry.file_name().to_string_lossy()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                record(warnings, path, e.into());
            }
        }
    }
    files
}

fn visit_file(path: &Path, stats: &mut FolderStats, warnings: &mut Vec<ScanWarning>) {
    // Follows symlinks so a linked recording counts like the file itself.
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            record(warnings, path.to_path_buf(), FileError::Stat(e));
            return;
        }
    };
    if !metadata.is_file() {
        return;
    }

    let size = metadata.len();
    if size == 0 {
        stats.empty_file_count += 1;
        return;
    }
    stats.non_empty_file_count += 1;
    stats.total_size_bytes += size;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if is_audio_file(&name) {
        match wav_duration(path) {
            Ok(duration) => stats.total_duration_seconds += duration,
            Err(e) => record(warnings, path.to_path_buf(), e),
        }
    }
}

fn record(warnings: &mut Vec<ScanWarning>, path: PathBuf, error: FileError) {
    let warning = ScanWarning { path, error };
    warn!(
        "Skipping {} ({}): {}",
        warning.file_name(),
        warning.error.kind(),
        warning.error
    );
    warnings.push(warning);
}
