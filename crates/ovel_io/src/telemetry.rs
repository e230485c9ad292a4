//! Append-only telemetry log.
//!
//! One JSON object per line in `<dir>/telemetry.jsonl`. Finished logs can be
//! archived to `.jsonl.gz`; [`read_records`] reads either form.

use crate::error::{IoError, Result};
use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ovel_data::Telemetry;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const TELEMETRY_FILE: &str = "telemetry.jsonl";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Wall-clock time of the write, RFC 3339.
    pub timestamp: String,
    #[serde(flatten)]
    pub telemetry: Telemetry,
}

pub struct TelemetryLogger {
    live_file: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    written: u64,
}

impl TelemetryLogger {
    pub fn new() -> Result<Self> {
        Self::new_at("logs")
    }

    pub fn new_at<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                IoError::FileSystem(e).with_context(format!("creating log dir {:?}", dir))
            })?;
        }
        let path = dir.join(TELEMETRY_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| IoError::FileSystem(e).with_context(format!("opening {:?}", path)))?;
        Ok(Self {
            live_file: Some(BufWriter::new(file)),
            path: Some(path),
            written: 0,
        })
    }

    /// Logger that accepts records and writes nothing.
    #[must_use]
    pub fn new_dummy() -> Self {
        Self {
            live_file: None,
            path: None,
            written: 0,
        }
    }

    pub fn log(&mut self, telemetry: &Telemetry) -> Result<()> {
        if let Some(ref mut file) = self.live_file {
            let record = TelemetryRecord {
                timestamp: Utc::now().to_rfc3339(),
                telemetry: telemetry.clone(),
            };
            let json = serde_json::to_string(&record)?;
            writeln!(file, "{}", json)?;
            file.flush()?;
            self.written += 1;
        }
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn records_written(&self) -> u64 {
        self.written
    }
}

/// Reads every parseable record. Lines that fail to parse are skipped.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<TelemetryRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::not_found(path.display().to_string())
        } else {
            IoError::FileSystem(e)
        }
    })?;

    let reader: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
        let mut decoded = Vec::new();
        GzDecoder::new(file).read_to_end(&mut decoded)?;
        Box::new(BufReader::new(std::io::Cursor::new(decoded)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for line in reader.lines().map_while(std::result::Result::ok) {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<TelemetryRecord>(&line) {
            Ok(record) => records.push(record),
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, path = %path.display(), "Skipped unreadable telemetry lines");
    }
    Ok(records)
}

/// Gzips `path` next to itself (`telemetry.jsonl` to `telemetry.jsonl.gz`)
/// and returns the archive path. The source file is left in place.
pub fn compress_log<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let mut archive = path.as_os_str().to_owned();
    archive.push(".gz");
    let archive = PathBuf::from(archive);

    let mut input = File::open(path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("opening {:?}", path)))?;
    let output = File::create(&archive)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    std::io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovel_data::SimMetrics;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ovel_io_telemetry_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn sample(tick: u64) -> Telemetry {
        Telemetry {
            tick,
            metrics: SimMetrics::default(),
            registry_entries: Vec::new(),
            event_count: 2,
            anchors: Vec::new(),
        }
    }

    #[test]
    fn test_dummy_logger_writes_nothing() {
        let mut logger = TelemetryLogger::new_dummy();
        logger.log(&sample(1)).unwrap();
        assert_eq!(logger.records_written(), 0);
        assert!(logger.path().is_none());
    }

    #[test]
    fn test_log_and_read_back() {
        let dir = scratch_dir("roundtrip");
        let mut logger = TelemetryLogger::new_at(&dir).unwrap();
        logger.log(&sample(10)).unwrap();
        logger.log(&sample(20)).unwrap();
        let path = logger.path().unwrap().to_path_buf();
        drop(logger);

        let records = read_records(&path).unwrap();
        let ticks: Vec<u64> = records.iter().map(|r| r.telemetry.tick).collect();
        assert_eq!(ticks, vec![10, 20]);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"eventCount\":2"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_compressed_log_reads_the_same() {
        let dir = scratch_dir("gzip");
        let mut logger = TelemetryLogger::new_at(&dir).unwrap();
        for tick in 0..5 {
            logger.log(&sample(tick)).unwrap();
        }
        let path = logger.path().unwrap().to_path_buf();
        drop(logger);

        let archive = compress_log(&path).unwrap();
        assert!(archive.to_string_lossy().ends_with("telemetry.jsonl.gz"));
        assert_eq!(read_records(&archive).unwrap(), read_records(&path).unwrap());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let dir = scratch_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(TELEMETRY_FILE);
        let good = serde_json::to_string(&TelemetryRecord {
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            telemetry: sample(3),
        })
        .unwrap();
        std::fs::write(&path, format!("{good}\n{{not json\n\n")).unwrap();
        assert_eq!(read_records(&path).unwrap().len(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_log_is_not_found() {
        let err = read_records("/nonexistent/ovel/telemetry.jsonl").unwrap_err();
        assert!(matches!(err, IoError::NotFound(_)));
    }
}
