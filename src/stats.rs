use std::path::PathBuf;

use serde::Serialize;

use crate::error::FileError;

pub const TOTAL_LABEL: &str = "Total";

const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

/// Counts for one subfolder of the scanned root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderStats {
    pub name: String,
    pub non_empty_file_count: u64,
    pub empty_file_count: u64,
    pub total_size_bytes: u64,
    pub total_duration_seconds: f64,
}

impl FolderStats {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn file_count(&self) -> u64 {
        self.non_empty_file_count + self.empty_file_count
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size_megabytes(&self) -> f64 {
        self.total_size_bytes as f64 / BYTES_PER_MEGABYTE
    }

    fn absorb(&mut self, other: &Self) {
        self.non_empty_file_count += other.non_empty_file_count;
        self.empty_file_count += other.empty_file_count;
        self.total_size_bytes += other.total_size_bytes;
        self.total_duration_seconds += other.total_duration_seconds;
    }
}

/// A file that was skipped or only partly counted.
#[derive(Debug)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub error: FileError,
}

impl ScanWarning {
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }
}

/// Per-folder rows in listing order plus a `Total` row summing them.
#[derive(Debug)]
pub struct AggregateReport {
    folders: Vec<FolderStats>,
    total: FolderStats,
    warnings: Vec<ScanWarning>,
    extension_filter: Option<String>,
}

impl AggregateReport {
    #[must_use]
    pub fn new(
        folders: Vec<FolderStats>,
        warnings: Vec<ScanWarning>,
        extension_filter: Option<String>,
    ) -> Self {
        let mut total = FolderStats::new(TOTAL_LABEL);
        for folder in &folders {
            total.absorb(folder);
        }
        Self {
            folders,
            total,
            warnings,
            extension_filter,
        }
    }

    #[must_use]
    pub fn folders(&self) -> &[FolderStats] {
        &self.folders
    }

    /// Unrounded sums; rounding happens in [`ReportRow::from_total`].
    #[must_use]
    pub const fn total(&self) -> &FolderStats {
        &self.total
    }

    #[must_use]
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn extension_filter(&self) -> Option<&str> {
        self.extension_filter.as_deref()
    }

    #[must_use]
    pub fn rows(&self) -> Vec<ReportRow<'_>> {
        self.folders
            .iter()
            .map(ReportRow::from_folder)
            .chain(std::iter::once(ReportRow::from_total(&self.total)))
            .collect()
    }
}

/// One line of the tabular export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow<'a> {
    pub subfolder: &'a str,
    pub non_empty_files: u64,
    pub empty_files: u64,
    pub size_megabytes: f64,
    pub duration_seconds: f64,
}

impl<'a> ReportRow<'a> {
    #[must_use]
    pub fn from_folder(stats: &'a FolderStats) -> Self {
        Self {
            subfolder: &stats.name,
            non_empty_files: stats.non_empty_file_count,
            empty_files: stats.empty_file_count,
            size_megabytes: stats.size_megabytes(),
            duration_seconds: stats.total_duration_seconds,
        }
    }

    #[must_use]
    pub fn from_total(stats: &'a FolderStats) -> Self {
        Self {
            size_megabytes: round2(stats.size_megabytes()),
            duration_seconds: round2(stats.total_duration_seconds),
            ..Self::from_folder(stats)
        }
    }
}

#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
