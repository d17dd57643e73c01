use crate::report::{HeaderStyle, OutputFormat};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything one comparison run needs, passed explicitly to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Fixed (session 2) volume
    pub ses2_file: PathBuf,
    /// Registered session 1 volume
    pub ses1reg_file: PathBuf,
    /// Acquisition label, stored verbatim (e.g. T1w, T2w)
    pub acquisition: String,
    /// Registration method label, stored verbatim (e.g. ANTS_syn)
    pub method: String,
    pub mask_file: Option<PathBuf>,
    /// Destination of the record; printed to stdout when absent
    pub output_csv: Option<PathBuf>,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl RunConfig {
    pub fn new(
        ses2_file: impl Into<PathBuf>,
        ses1reg_file: impl Into<PathBuf>,
        acquisition: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            ses2_file: ses2_file.into(),
            ses1reg_file: ses1reg_file.into(),
            acquisition: acquisition.into(),
            method: method.into(),
            mask_file: None,
            output_csv: None,
            metrics: MetricsConfig::default(),
            report: ReportConfig::default(),
        }
    }

    pub fn with_mask(mut self, mask_file: impl Into<PathBuf>) -> Self {
        self.mask_file = Some(mask_file.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output_csv = Some(output.into());
        self
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        self.metrics.validate()
    }
}

/// Tunables of the metric engine. Defaults reproduce the reference results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MetricsConfig {
    pub ssim: SsimConfig,
    pub nmi: NmiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsimConfig {
    /// Side length of the uniform window, odd
    pub window_size: usize,
    pub k1: f64,
    pub k2: f64,
    /// Intensity range L used in the stabilising constants
    pub data_range: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NmiConfig {
    /// Equal-width bins per volume
    pub bins: usize,
    /// Added inside each logarithm of the entropy sums
    pub epsilon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    pub format: OutputFormat,
    pub header_style: HeaderStyle,
}

impl Default for SsimConfig {
    fn default() -> Self {
        Self {
            window_size: 7,
            k1: 0.01,
            k2: 0.03,
            data_range: 1.0,
        }
    }
}

impl Default for NmiConfig {
    fn default() -> Self {
        Self {
            bins: 32,
            epsilon: 1e-10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

impl MetricsConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = if content.trim_start().starts_with('{') {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON config {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Invalid TOML config {}", path.display()))?
        };
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, format: ConfigFormat) -> crate::Result<()> {
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.ssim.window_size < 3 {
            errors.push("SSIM window_size must be at least 3".to_string());
        }

        if self.ssim.window_size % 2 == 0 {
            errors.push("SSIM window_size must be odd".to_string());
        }

        if !(self.ssim.k1 > 0.0) || !(self.ssim.k2 > 0.0) {
            errors.push("SSIM k1 and k2 must be positive".to_string());
        }

        if !(self.ssim.data_range > 0.0) {
            errors.push("SSIM data_range must be positive".to_string());
        }

        if self.nmi.bins < 2 {
            errors.push("NMI bins must be at least 2".to_string());
        }

        if !(self.nmi.epsilon >= 0.0) {
            errors.push("NMI epsilon must be non-negative".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
