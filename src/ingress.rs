//! Normalized position reports and the newline-delimited-JSON reader that
//! stands in for the real AIS ingress transport.
//!
//! Wraps an `AsyncBufRead` and yields one parsed report at a time; there
//! is no multi-byte frame to assemble here, so the reader is a thin line
//! splitter, but the "never fatal on a bad unit" posture is kept.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionReport {
    pub mmsi: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub sog: Option<f64>,
    #[serde(default)]
    pub cog: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug)]
pub enum IngressError {
    Malformed(String),
    Io(std::io::Error),
}

impl fmt::Display for IngressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngressError::Malformed(line) => write!(f, "malformed position report line: {}", line),
            IngressError::Io(e) => write!(f, "ingress io error: {}", e),
        }
    }
}

impl std::error::Error for IngressError {}

impl From<std::io::Error> for IngressError {
    fn from(e: std::io::Error) -> Self {
        IngressError::Io(e)
    }
}

/// Reads one JSON-encoded [`PositionReport`] per line from any
/// `AsyncBufRead`. Malformed lines are logged and skipped by `next_report`,
/// never surfaced as a fatal error; only a genuine I/O failure on the
/// underlying stream propagates.
pub struct PositionReportReader<R> {
    inner: R,
    line_buf: String,
}

impl<R: AsyncBufRead + Unpin> PositionReportReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line_buf: String::new(),
        }
    }

    /// Reads lines until a valid report is parsed, EOF, or I/O error.
    /// Returns `Ok(None)` at EOF.
    pub async fn next_report(&mut self) -> Result<Option<PositionReport>, IngressError> {
        loop {
            self.line_buf.clear();
            let bytes_read = self.inner.read_line(&mut self.line_buf).await?;
            if bytes_read == 0 {
                return Ok(None);
            }
            let line = self.line_buf.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<PositionReport>(line) {
                Ok(report) => return Ok(Some(report)),
                Err(err) => {
                    warn!(%err, line, "skipping malformed position report");
                    continue;
                }
            }
        }
    }
}

/// Basic structural validity independent of the bounding box: finite
/// coordinates and a non-empty MMSI.
pub fn is_structurally_valid(report: &PositionReport) -> bool {
    !report.mmsi.is_empty() && report.lat.is_finite() && report.lon.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_reads_single_report() {
        let data = b"{\"mmsi\":\"265123456\",\"lat\":58.28,\"lon\":12.30}\n".to_vec();
        let mut reader = PositionReportReader::new(Cursor::new(data));
        let report = reader.next_report().await.unwrap().unwrap();
        assert_eq!(report.mmsi, "265123456");
        assert_eq!(report.sog, None);
    }

    #[tokio::test]
    async fn test_skips_malformed_then_returns_valid() {
        let data = b"not json\n{\"mmsi\":\"1\",\"lat\":1.0,\"lon\":1.0}\n".to_vec();
        let mut reader = PositionReportReader::new(Cursor::new(data));
        let report = reader.next_report().await.unwrap().unwrap();
        assert_eq!(report.mmsi, "1");
    }

    #[tokio::test]
    async fn test_eof_returns_none() {
        let mut reader = PositionReportReader::new(Cursor::new(Vec::new()));
        assert!(reader.next_report().await.unwrap().is_none());
    }

    #[test]
    fn test_structural_validity() {
        let valid = PositionReport {
            mmsi: "1".to_string(),
            lat: 1.0,
            lon: 1.0,
            sog: None,
            cog: None,
            name: None,
            timestamp: None,
        };
        assert!(is_structurally_valid(&valid));

        let mut missing_mmsi = valid.clone();
        missing_mmsi.mmsi = String::new();
        assert!(!is_structurally_valid(&missing_mmsi));

        let mut bad_lat = valid.clone();
        bad_lat.lat = f64::NAN;
        assert!(!is_structurally_valid(&bad_lat));
    }
}
