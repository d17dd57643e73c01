pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;

pub use analysis::*;
pub use config::{MetricsConfig, NmiConfig, ReportConfig, RunConfig, SsimConfig};
pub use data::*;
pub use error::SimilarityError;
pub use pipeline::{emit, run};
pub use report::*;

pub type Result<T> = anyhow::Result<T>;
