//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::{error, info};
use serde::Serialize;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::codec;
use crate::engine::{read_file, write_file, SampleEncoding, WaveFormat};
use crate::error::Result;
use crate::riff;

/// Summary of one WAV file, as printed by `info`
#[derive(Debug, Clone, Serialize)]
pub struct InfoReport {
    pub path: PathBuf,
    pub format: WaveFormat,
    pub bits_per_sample: u16,
    pub frames: usize,
    pub duration_secs: f64,
    pub peak: f64,
    /// SHA-256 of the raw `data` chunk body
    pub data_sha256: String,
    pub skipped_chunks: Vec<String>,
}

/// Print format and statistics for every WAV file under `paths`.
pub fn info(paths: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let files = collect_wav_paths(paths);
    if files.is_empty() {
        bail!("no .wav files found");
    }

    let mut failures = 0;
    for path in &files {
        match inspect(path) {
            Ok(report) => {
                if json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    print_report(&report);
                }
            }
            Err(e) => {
                failures += 1;
                error!("{}: [{}] {}", path.display(), e.error_code(), e);
                error!("  hint: {}", e.recovery_hint());
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files could not be read", failures, files.len());
    }
    Ok(())
}

/// Read one file and summarize it.
pub fn inspect(path: &Path) -> Result<InfoReport> {
    let file = File::open(path)?;
    let chunks = riff::read_chunks(BufReader::new(file))?;
    let buffer = codec::decode(&chunks.data, &chunks.format)?;

    Ok(InfoReport {
        path: path.to_path_buf(),
        format: chunks.format,
        bits_per_sample: chunks.format.bits_per_sample(),
        frames: buffer.num_frames(),
        duration_secs: buffer.duration_secs(chunks.format.sample_rate),
        peak: buffer.peak(),
        data_sha256: format!("{:x}", Sha256::digest(&chunks.data)),
        skipped_chunks: chunks.skipped.iter().map(|id| id.to_string()).collect(),
    })
}

fn print_report(report: &InfoReport) {
    println!("{}", report.path.display());
    println!("{:-<60}", "");
    println!("  Encoding:    {:?}", report.format.encoding);
    println!("  Channels:    {}", report.format.channels);
    println!("  Sample rate: {} Hz", report.format.sample_rate);
    println!("  Bits:        {}", report.bits_per_sample);
    println!("  Frames:      {}", report.frames);
    println!("  Duration:    {:.3}s", report.duration_secs);
    println!("  Peak:        {:.6}", report.peak);
    println!("  SHA-256:     {}", report.data_sha256);
    if !report.skipped_chunks.is_empty() {
        println!("  Other:       {}", report.skipped_chunks.join(", "));
    }
}

/// Expand directories into the `.wav` files they contain, sorted.
///
/// Explicit file arguments are kept whatever their extension.
pub fn collect_wav_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|p| is_wav(p))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    files
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Re-encode `input` into `output`.
///
/// `bits` defaults to the input's bit depth; `float` selects 32-bit float.
pub fn convert(input: &Path, output: &Path, bits: Option<u16>, float: bool) -> anyhow::Result<()> {
    let wave = read_file(input).with_context(|| format!("failed to read {}", input.display()))?;

    let bits = bits.unwrap_or(if float { 32 } else { wave.format.bits_per_sample() });
    let encoding = SampleEncoding::from_bits(bits, float)
        .with_context(|| format!("cannot encode {}-bit{} samples", bits, if float { " float" } else { "" }))?;
    let format = wave.format.with_encoding(encoding)?;

    if wave.buffer.peak() > 1.0 && !encoding.is_float() {
        info!(
            "Peak {:.3} exceeds full scale; samples will be clamped",
            wave.buffer.peak()
        );
    }

    write_file(output, &format, &wave.buffer)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Converted {} ({:?}) -> {} ({:?})",
        input.display(),
        wave.format.encoding,
        output.display(),
        format.encoding
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SampleBuffer;
    use std::fs;
    use tempfile::tempdir;

    fn write_test_file(path: &Path, encoding: SampleEncoding) {
        let format = WaveFormat::new(22050, 2, encoding).unwrap();
        let buffer = SampleBuffer::new(vec![0.5, -0.5, 0.25, -1.0], 2).unwrap();
        write_file(path, &format, &buffer).unwrap();
    }

    #[test]
    fn test_inspect() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.wav");
        write_test_file(&path, SampleEncoding::Signed16);

        let report = inspect(&path).unwrap();
        assert_eq!(report.frames, 2);
        assert_eq!(report.bits_per_sample, 16);
        assert_eq!(report.peak, 1.0);
        assert_eq!(report.data_sha256.len(), 64);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"encoding\":\"signed16\""));
    }

    #[test]
    fn test_inspect_reports_error_kind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        fs::write(&path, b"RIFF\x04\x00\x00\x00AVI ").unwrap();

        let err = inspect(&path).unwrap_err();
        assert_eq!(err.error_code(), "FORMAT_ERROR");
    }

    #[test]
    fn test_collect_wav_paths() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write_test_file(&dir.path().join("b.wav"), SampleEncoding::Signed16);
        write_test_file(&nested.join("a.WAV"), SampleEncoding::Signed16);
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = collect_wav_paths(&[dir.path().to_path_buf()]);
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| is_wav(p)));
    }

    #[test]
    fn test_convert_to_float() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        write_test_file(&input, SampleEncoding::Signed24);

        convert(&input, &output, None, true).unwrap();

        let wave = read_file(&output).unwrap();
        assert_eq!(wave.format.encoding, SampleEncoding::Float32);
        assert_eq!(wave.buffer.samples(), &[0.5, -0.5, 0.25, -1.0]);
    }

    #[test]
    fn test_convert_rejects_unsupported_bits() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        write_test_file(&input, SampleEncoding::Signed16);

        let result = convert(&input, &dir.path().join("out.wav"), Some(12), false);
        assert!(result.is_err());
    }
}
