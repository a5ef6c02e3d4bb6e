use crate::models::{CleaningSummary, DISCOUNT_PERCENT, DISCOUNTED_PRICE, RETAIL_PRICE};
use anyhow::{Context, Result};
use polars::prelude::*;
use std::str::FromStr;
use tracing::{info, warn};

pub struct PriceCleaner;

impl PriceCleaner {
    /// Drops rows without both prices, coerces the prices to f64 and derives
    /// `discount_percent`. The returned frame is the cleaned table.
    pub fn clean(&self, df: &DataFrame) -> Result<(DataFrame, CleaningSummary)> {
        let mut summary = CleaningSummary {
            rows_loaded: df.height(),
            ..Default::default()
        };

        let df = self.drop_incomplete_rows(df)?;
        summary.rows_missing_price = summary.rows_loaded - df.height();

        let mut df = df;
        self.coerce_price_column(&mut df, DISCOUNTED_PRICE)?;
        self.coerce_price_column(&mut df, RETAIL_PRICE)?;

        // Values that failed to parse are missing now, so the same filter
        // applies a second time.
        let before_coercion_filter = df.height();
        let mut df = self.drop_incomplete_rows(&df)?;
        summary.rows_unparseable_price = before_coercion_filter - df.height();

        summary.undefined_discounts = self.derive_discount_percent(&mut df)?;
        summary.rows_retained = df.height();

        info!(
            "Cleaned product table: {} of {} rows retained ({} missing a price, {} unparseable)",
            summary.rows_retained,
            summary.rows_loaded,
            summary.rows_missing_price,
            summary.rows_unparseable_price
        );

        if summary.undefined_discounts > 0 {
            warn!(
                "{} rows have a zero retail price; their discount_percent is left undefined",
                summary.undefined_discounts
            );
        }

        Ok((df, summary))
    }

    pub fn drop_incomplete_rows(&self, df: &DataFrame) -> Result<DataFrame> {
        let discounted = df
            .column(DISCOUNTED_PRICE)
            .with_context(|| format!("Dataset has no {} column", DISCOUNTED_PRICE))?;
        let retail = df
            .column(RETAIL_PRICE)
            .with_context(|| format!("Dataset has no {} column", RETAIL_PRICE))?;

        let mask = &discounted.is_not_null() & &retail.is_not_null();
        let filtered = df.filter(&mask)?;

        Ok(filtered)
    }

    /// Non-strict coercion: anything that does not parse as a number becomes null.
    pub fn coerce_price_column(&self, df: &mut DataFrame, col_name: &str) -> Result<()> {
        let series = df
            .column(col_name)
            .with_context(|| format!("Dataset has no {} column", col_name))?;

        let normalized: Vec<Option<f64>> = coerce_numeric(series)
            .with_context(|| format!("Failed to coerce {} to a number", col_name))?
            .into_iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect();

        let new_series = Series::new(col_name.into(), normalized);
        df.with_column(new_series)?;

        Ok(())
    }

    /// Adds `discount_percent` and returns how many rows it left undefined.
    pub fn derive_discount_percent(&self, df: &mut DataFrame) -> Result<usize> {
        let discounted = df.column(DISCOUNTED_PRICE)?.f64()?;
        let retail = df.column(RETAIL_PRICE)?.f64()?;

        let discounts: Vec<Option<f64>> = discounted
            .into_iter()
            .zip(retail.into_iter())
            .map(|(discounted_opt, retail_opt)| match (discounted_opt, retail_opt) {
                (Some(discounted), Some(retail)) => discount_percent(retail, discounted),
                _ => None,
            })
            .collect();

        let undefined = discounts.iter().filter(|d| d.is_none()).count();

        let new_series = Series::new(DISCOUNT_PERCENT.into(), discounts);
        df.with_column(new_series)?;

        Ok(undefined)
    }
}

/// Reads a column as f64. Text is trimmed before parsing, so padded values
/// such as `" 100 "` survive; text that still does not parse becomes `None`.
pub fn coerce_numeric(column: &Column) -> Result<Vec<Option<f64>>> {
    if column.dtype() == &DataType::String {
        let values = column
            .str()?
            .into_iter()
            .map(|value| value.and_then(|s| f64::from_str(s.trim()).ok()))
            .collect();
        return Ok(values);
    }

    let coerced = column.cast(&DataType::Float64)?;
    Ok(coerced.f64()?.into_iter().collect())
}

/// Percentage off the retail price. Undefined for a zero retail price.
pub fn discount_percent(retail_price: f64, discounted_price: f64) -> Option<f64> {
    if retail_price == 0.0 {
        return None;
    }

    let value = (retail_price - discounted_price) / retail_price * 100.0;
    value.is_finite().then_some(value)
}
