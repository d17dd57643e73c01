//! Single-row metric records and their CSV, JSON and console renderings.

pub mod csv;
pub mod table;

pub use self::csv::*;
pub use table::*;

use crate::analysis::SimilarityMetrics;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    /// Subject, Acq, Method, CC, SSIM, MSE, NCC, NMI, Masked
    #[default]
    Short,
    /// Column names spelling out each metric and its optimal value
    Descriptive,
}

const SHORT_HEADERS: [&str; 9] = [
    "Subject", "Acq", "Method", "CC", "SSIM", "MSE", "NCC", "NMI", "Masked",
];

const DESCRIPTIVE_HEADERS: [&str; 9] = [
    "Subject",
    "Acq",
    "Method",
    "Cross-Correlation Index (CC - Opt.val: 1)",
    "Structural Similarity Index (SSIM - Opt.val: 1)",
    "Mean Squared Error (MSE - Opt.val: 0)",
    "Normalized Cross-Correlation (NCC - Opt.val: 1)",
    "Normalized Mutual Information (NMI - Opt.val: 1)",
    "Masked",
];

impl HeaderStyle {
    pub fn headers(&self) -> [&'static str; 9] {
        match self {
            HeaderStyle::Short => SHORT_HEADERS,
            HeaderStyle::Descriptive => DESCRIPTIVE_HEADERS,
        }
    }
}

/// One comparison result, ready to be written out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub subject: String,
    pub acquisition: String,
    pub method: String,
    pub cc: f64,
    pub ssim: f64,
    pub mse: f64,
    pub ncc: f64,
    pub nmi: f64,
    pub masked: bool,
}

impl MetricRecord {
    /// Build a record; the subject is the file name of `subject_path`.
    pub fn new(
        subject_path: &Path,
        acquisition: &str,
        method: &str,
        metrics: &SimilarityMetrics,
        masked: bool,
    ) -> Self {
        let subject = subject_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| subject_path.to_string_lossy().into_owned());

        Self {
            subject,
            acquisition: acquisition.to_string(),
            method: method.to_string(),
            cc: metrics.cc,
            ssim: metrics.ssim,
            mse: metrics.mse,
            ncc: metrics.ncc,
            nmi: metrics.nmi,
            masked,
        }
    }

    /// Cell values in column order.
    pub fn values(&self) -> [String; 9] {
        [
            self.subject.clone(),
            self.acquisition.clone(),
            self.method.clone(),
            format_float(self.cc),
            format_float(self.ssim),
            format_float(self.mse),
            format_float(self.ncc),
            format_float(self.nmi),
            format_bool(self.masked),
        ]
    }
}

/// Shortest round-trip text for a float; integral values keep a `.0`.
///
/// Exponents carry a sign and at least two digits (`1e-05`, `1e+16`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        return text.to_string();
    }

    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

pub fn format_bool(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

/// Write the record to a fresh file in the requested format.
pub fn save_record<P: AsRef<Path>>(
    path: P,
    record: &MetricRecord,
    format: OutputFormat,
    style: HeaderStyle,
) -> crate::Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Csv => write_csv(&mut writer, record, style)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, record)?;
            writeln!(writer)?;
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write output file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    pub(crate) fn sample_record() -> MetricRecord {
        let metrics = SimilarityMetrics {
            cc: 0.9,
            ssim: 1.0,
            mse: 0.0125,
            ncc: 0.9,
            nmi: f64::NAN,
        };
        MetricRecord::new(
            &PathBuf::from("/data/sub-01/ses-02/anat/sub-01_T2w.nii.gz"),
            "T2w",
            "ANTS_syn",
            &metrics,
            true,
        )
    }

    #[test]
    fn test_subject_is_basename() {
        assert_eq!(sample_record().subject, "sub-01_T2w.nii.gz");
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.0125), "0.0125");
        assert_eq!(format_float(f64::NAN), "NaN");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_float(1e-5), "1e-05");
        assert_eq!(format_float(-1.5e-7), "-1.5e-07");
        assert_eq!(format_float(2.5e-123), "2.5e-123");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(0.0001), "0.0001");
        for text in ["NaN", "inf", "-inf", "1.0", "1e-05", "1e+16"] {
            assert!(text.parse::<f64>().is_ok());
        }
    }

    #[test]
    fn test_values_follow_column_order() {
        let values = sample_record().values();
        assert_eq!(values[1], "T2w");
        assert_eq!(values[4], "1.0");
        assert_eq!(values[7], "NaN");
        assert_eq!(values[8], "True");
        assert_eq!(HeaderStyle::Short.headers()[4], "SSIM");
        assert_eq!(
            HeaderStyle::Descriptive.headers()[5],
            "Mean Squared Error (MSE - Opt.val: 0)"
        );
    }

    #[test]
    fn test_json_output_nulls_nan() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("record.json");
        save_record(&path, &sample_record(), OutputFormat::Json, HeaderStyle::Short).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["method"], "ANTS_syn");
        assert_eq!(value["masked"], true);
        assert!(value["nmi"].is_null());
    }

    #[test]
    fn test_save_overwrites_previous_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("record.csv");
        std::fs::write(&path, "stale\nstale\nstale\nstale\n").unwrap();

        save_record(&path, &sample_record(), OutputFormat::Csv, HeaderStyle::Short).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!content.contains("stale"));
    }
}
