// src/core/export.rs

use crate::core::error::ExportError;
use crate::core::models::ScanResult;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Name of the result file written when no path is given.
pub const DEFAULT_OUTPUT: &str = "scan_results.json";

/// Writes `results` as a JSON array, replacing any previous file at `path`.
pub fn write_json(path: &Path, results: &[ScanResult]) -> Result<(), ExportError> {
    let create_err = |source| ExportError::Create { path: path.to_path_buf(), source };

    let file = File::create(path).map_err(create_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, results).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n").map_err(create_err)?;
    writer.flush().map_err(create_err)?;

    info!(path = %path.display(), count = results.len(), "Results written.");
    Ok(())
}

/// Loads a result file written by [`write_json`].
pub fn read_json(path: &Path) -> Result<Vec<ScanResult>, ExportError> {
    let file = File::open(path).map_err(|source| ExportError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ProbeOutcome, Target};
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("connprobe-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn written_file_reads_back() {
        let path = scratch_file("roundtrip");
        let mut result = ScanResult::new(&Target::new("example.com", 443));
        result.tcp = Some(ProbeOutcome::Success);
        result.tls = Some(ProbeOutcome::Success);
        result.custom_ports = vec![80, 8080];

        write_json(&path, &[result.clone()]).unwrap();
        let loaded = read_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, vec![result]);
    }

    #[test]
    fn previous_file_is_overwritten() {
        let path = scratch_file("overwrite");
        let first: Vec<ScanResult> =
            (1..=3).map(|i| ScanResult::new(&Target::new(format!("h{}", i), 443))).collect();
        write_json(&path, &first).unwrap();
        write_json(&path, &first[..1]).unwrap();

        let loaded = read_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let err = write_json(Path::new("/nonexistent-dir/results.json"), &[]).unwrap_err();
        assert!(matches!(err, ExportError::Create { .. }));
    }
}
