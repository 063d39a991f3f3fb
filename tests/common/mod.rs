// Shared fixtures for the integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Write a mono 16-bit WAV of `frames` silent samples and return its size in bytes.
pub fn write_wav(path: &Path, sample_rate: u32, frames: u32) -> u64 {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..frames {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
    fs::metadata(path).unwrap().len()
}

/// Write `n` bytes of filler.
pub fn write_bytes(path: &Path, n: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, vec![0x5au8; n]).unwrap();
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Write a mono 32-bit float WAV and return its size in bytes.
pub fn write_float_wav(path: &Path, sample_rate: u32, frames: u32) -> u64 {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..frames {
        writer.write_sample(0.0f32).unwrap();
    }
    writer.finalize().unwrap();
    fs::metadata(path).unwrap().len()
}
