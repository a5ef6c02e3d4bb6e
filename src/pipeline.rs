use crate::config::ReportConfig;
use crate::models::{CleaningSummary, REQUIRED_COLUMNS};
use crate::processor::{CsvLoader, PriceCleaner, ViewBuilder, ViewSet};
use crate::report::Report;
use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;
use tracing::{info, warn};

pub struct PipelineOutput {
    pub table: DataFrame,
    pub summary: CleaningSummary,
    pub views: ViewSet,
    pub report: Report,
}

/// Load, clean, derive and chart, in that order.
pub struct ReportPipeline {
    loader: CsvLoader,
    cleaner: PriceCleaner,
    view_builder: ViewBuilder,
}

impl ReportPipeline {
    pub fn new() -> Self {
        Self {
            loader: CsvLoader,
            cleaner: PriceCleaner,
            view_builder: ViewBuilder,
        }
    }

    pub fn run(&self, config: &ReportConfig) -> Result<PipelineOutput> {
        config.validate()?;
        self.run_path(config.dataset_path())
    }

    pub fn run_path(&self, path: &Path) -> Result<PipelineOutput> {
        let raw = self.loader.load_path(path)?;
        self.run_frame(&raw)
    }

    pub fn run_frame(&self, raw: &DataFrame) -> Result<PipelineOutput> {
        for column in REQUIRED_COLUMNS {
            if raw.column(column).is_err() {
                warn!("Expected column {} is not present in the dataset", column);
            }
        }

        let (table, summary) = self
            .cleaner
            .clean(raw)
            .context("Failed to clean product table")?;

        let views = self
            .view_builder
            .build_all(&table)
            .context("Failed to prepare chart views")?;

        for price in views.top_category_prices.summaries() {
            info!(
                "📦 {} (n={}): min {:.2}, q1 {:.2}, median {:.2}, q3 {:.2}, max {:.2}",
                price.category, price.count, price.min, price.q1, price.median, price.q3, price.max
            );
        }

        let report = Report::from_views(&views);
        info!("📊 Built {} charts: {:?}", report.len(), report.titles());

        Ok(PipelineOutput {
            table,
            summary,
            views,
            report,
        })
    }
}

impl Default for ReportPipeline {
    fn default() -> Self {
        Self::new()
    }
}
