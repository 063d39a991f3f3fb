pub mod aggregate;
pub mod audio;
pub mod error;
pub mod export;
pub mod logging;
pub mod ndvi;
pub mod progress;
pub mod stats;

pub use aggregate::{aggregate, aggregate_with_progress, ScanOptions};
pub use error::{Error, FileError, Result};
pub use stats::{AggregateReport, FolderStats, ScanWarning};
