use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, FileError, Result};

/// Extension of the only container we can read a duration from.
pub const AUDIO_EXTENSION: &str = ".wav";

/// Case-insensitive suffix match on a file name.
#[must_use]
pub fn has_extension(name: &str, extension: &str) -> bool {
    name.to_lowercase().ends_with(&extension.to_lowercase())
}

#[must_use]
pub fn is_audio_file(name: &str) -> bool {
    has_extension(name, AUDIO_EXTENSION)
}

/// Duration of a WAV file in seconds, `frames / sample_rate`.
///
/// Only the header is read; sample data is never decoded.
///
/// # Errors
///
/// Returns `FileError::AudioParse` if the header is malformed or truncated,
/// if the samples are not integer PCM, or if the sample rate is zero.
pub fn wav_duration<P: AsRef<Path>>(path: P) -> std::result::Result<f64, FileError> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    if matches!(spec.sample_format, hound::SampleFormat::Float) {
        return Err(hound::Error::FormatError("unsupported sample format").into());
    }
    if spec.sample_rate == 0 {
        return Err(hound::Error::FormatError("sample rate is zero").into());
    }
    Ok(f64::from(reader.duration()) / f64::from(spec.sample_rate))
}

#[derive(Debug)]
pub enum CheckStatus {
    Ok { duration: f64 },
    Corrupt { cause: FileError },
}

#[derive(Debug)]
pub struct CheckOutcome {
    pub path: PathBuf,
    pub status: CheckStatus,
}

impl CheckOutcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.status, CheckStatus::Ok { .. })
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
    }
}

/// Opens every WAV file under `dir` (at any depth) and reports whether its
/// container could be read. Results are in file-name order per directory.
///
/// # Errors
///
/// Fails only if `dir` is missing or not a directory. Unreadable nested
/// directories are reported as corrupt entries.
pub fn check_directory<P: AsRef<Path>>(dir: P) -> Result<Vec<CheckOutcome>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::RootNotFound(dir.to_path_buf()));
    }

    info!("Checking WAV files under {:?}", dir);

    let mut outcomes = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                outcomes.push(CheckOutcome {
                    path,
                    status: CheckStatus::Corrupt { cause: e.into() },
                });
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !is_audio_file(&name) {
            continue;
        }

        let status = match wav_duration(entry.path()) {
            Ok(duration) => CheckStatus::Ok { duration },
            Err(cause) => CheckStatus::Corrupt { cause },
        };
        debug!("{}: {:?}", name, status);
        outcomes.push(CheckOutcome {
            path: entry.into_path(),
            status,
        });
    }

    Ok(outcomes)
}
