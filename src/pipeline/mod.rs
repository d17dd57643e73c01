//! The linear comparison pipeline: load, mask, measure, report.

use crate::analysis::compute_metrics;
use crate::config::RunConfig;
use crate::data::{load_volume, MaskedPair};
use crate::error::SimilarityError;
use crate::logging::{
    clear_correlation_id, get_correlation_id, new_correlation_id, RunSpan, StageSpan,
};
use crate::report::{print_table, save_record, MetricRecord};
use anyhow::Context;
use tracing::info;

/// Run one comparison and build its record. Nothing is written.
pub fn run(config: &RunConfig) -> crate::Result<MetricRecord> {
    config
        .validate()
        .map_err(SimilarityError::InvalidConfig)?;

    let run_span = RunSpan::new(&config.acquisition, &config.method, new_correlation_id());
    let _enter = run_span.enter();

    let pair = StageSpan::new("load").in_scope(|| -> crate::Result<MaskedPair> {
        let fixed = load_volume(&config.ses2_file)
            .with_context(|| format!("Loading session 2 volume {}", config.ses2_file.display()))?;
        let moving = load_volume(&config.ses1reg_file).with_context(|| {
            format!(
                "Loading registered session 1 volume {}",
                config.ses1reg_file.display()
            )
        })?;
        info!(shape = ?fixed.shape(), voxel_size = ?fixed.voxel_size, "Volumes loaded");

        let mask = match &config.mask_file {
            Some(path) => Some(
                load_volume(path)
                    .with_context(|| format!("Loading mask {}", path.display()))?
                    .into_data(),
            ),
            None => None,
        };

        StageSpan::new("mask")
            .in_scope(|| MaskedPair::new(fixed.into_data(), moving.into_data(), mask.as_ref()))
    })?;

    let metrics = StageSpan::new("metrics")
        .in_scope(|| compute_metrics(&pair.fixed, &pair.moving, &config.metrics))
        .context("Computing similarity metrics")?;

    info!(
        cc = metrics.cc,
        ssim = metrics.ssim,
        mse = metrics.mse,
        ncc = metrics.ncc,
        nmi = metrics.nmi,
        "Metrics computed"
    );

    let record = MetricRecord::new(
        &config.ses2_file,
        &config.acquisition,
        &config.method,
        &metrics,
        pair.masked,
    );
    run_span.record_completion(pair.masked);
    Ok(record)
}

/// Write the record to the configured output, or print it when there is none.
///
/// Ends the run: the thread's correlation id is logged with the record and
/// then cleared.
pub fn emit(record: &MetricRecord, config: &RunConfig) -> crate::Result<()> {
    let correlation_id = get_correlation_id();
    match &config.output_csv {
        Some(path) => {
            save_record(path, record, config.report.format, config.report.header_style)?;
            info!(path = %path.display(), correlation_id = ?correlation_id, "Record written");
        }
        None => {
            print_table(record, config.report.header_style);
            info!(correlation_id = ?correlation_id, "Record printed");
        }
    }
    clear_correlation_id();
    Ok(())
}
