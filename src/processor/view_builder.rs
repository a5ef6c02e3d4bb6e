use crate::models::{
    BRAND, DISCOUNT_PERCENT, DISCOUNTED_PRICE, PRODUCT_CATEGORY_TREE, PRODUCT_RATING, PriceSummary,
    RETAIL_PRICE,
};
use crate::processor::coerce_numeric;
use crate::stats::{BinSpec, correlation_matrix, density_curve, price_summary};
use anyhow::{Context, Result};
use ndarray::Array2;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

pub const DISCOUNT_BINS: usize = 30;
pub const RATING_BINS: usize = 20;
pub const EXCLUDED_TOP_CATEGORIES: usize = 10;
pub const SHOWN_CATEGORIES: usize = 20;
pub const BOX_PLOT_CATEGORIES: usize = 5;
pub const SHOWN_BRANDS: usize = 20;
pub const SCATTER_ALPHA: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct HistogramView {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub values: Vec<f64>,
    pub bins: usize,
    pub bin_spec: Option<BinSpec>,
    pub density: Option<Vec<(f64, f64)>>,
}

#[derive(Debug, Clone)]
pub struct CountView {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Label and count, most frequent first.
    pub entries: Vec<(String, usize)>,
}

#[derive(Debug, Clone)]
pub struct CategoryPrices {
    pub category: String,
    pub prices: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct BoxView {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<CategoryPrices>,
}

#[derive(Debug, Clone)]
pub struct ScatterView {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    pub opacity: f64,
}

#[derive(Debug, Clone)]
pub struct CorrelationView {
    pub title: String,
    pub columns: Vec<String>,
    pub matrix: Array2<f64>,
}

/// Everything the report renders, in display order. `brand_counts` is only
/// present when the table carries a brand column.
#[derive(Debug, Clone)]
pub struct ViewSet {
    pub discount_distribution: HistogramView,
    pub rating_distribution: HistogramView,
    pub category_counts: CountView,
    pub top_category_prices: BoxView,
    pub discount_vs_rating: ScatterView,
    pub brand_counts: Option<CountView>,
    pub correlation: CorrelationView,
    pub retail_vs_discount: ScatterView,
}

impl ViewSet {
    pub fn view_count(&self) -> usize {
        7 + usize::from(self.brand_counts.is_some())
    }
}

pub struct ViewBuilder;

impl ViewBuilder {
    pub fn build_all(&self, df: &DataFrame) -> Result<ViewSet> {
        let category_counts = value_counts(df, PRODUCT_CATEGORY_TREE)?;

        let views = ViewSet {
            discount_distribution: self.discount_distribution(df)?,
            rating_distribution: self.rating_distribution(df)?,
            category_counts: self.category_counts_excluding_top(&category_counts),
            top_category_prices: self.top_category_prices(df, &category_counts)?,
            discount_vs_rating: self.scatter(
                df,
                DISCOUNT_PERCENT,
                PRODUCT_RATING,
                "Discount % vs Product Rating",
                "Discount %",
                "Rating",
            )?,
            brand_counts: self.brand_counts(df)?,
            correlation: self.correlation(df)?,
            retail_vs_discount: self.scatter(
                df,
                RETAIL_PRICE,
                DISCOUNT_PERCENT,
                "Retail Price vs Discount %",
                "Retail Price",
                "Discount %",
            )?,
        };

        info!("Prepared {} chart views", views.view_count());

        Ok(views)
    }

    pub fn discount_distribution(&self, df: &DataFrame) -> Result<HistogramView> {
        let values = present_values(df, DISCOUNT_PERCENT)?;
        Ok(histogram(
            "Distribution of Discount %",
            "Discount %",
            values,
            DISCOUNT_BINS,
        ))
    }

    pub fn rating_distribution(&self, df: &DataFrame) -> Result<HistogramView> {
        let values = present_values(df, PRODUCT_RATING)?;
        debug!("{} rows carry a numeric product rating", values.len());
        Ok(histogram(
            "Distribution of Product Ratings",
            "Rating",
            values,
            RATING_BINS,
        ))
    }

    /// Categories ranked after the top ten, showing the next twenty.
    pub fn category_counts_excluding_top(&self, counts: &[(String, usize)]) -> CountView {
        CountView {
            title: "Product Count by Category (Excl. Top 10)".to_string(),
            x_label: "Count".to_string(),
            y_label: "Category".to_string(),
            entries: counts
                .iter()
                .skip(EXCLUDED_TOP_CATEGORIES)
                .take(SHOWN_CATEGORIES)
                .cloned()
                .collect(),
        }
    }

    pub fn top_category_prices(
        &self,
        df: &DataFrame,
        counts: &[(String, usize)],
    ) -> Result<BoxView> {
        let top: Vec<&str> = counts
            .iter()
            .take(BOX_PLOT_CATEGORIES)
            .map(|(category, _)| category.as_str())
            .collect();

        let categories = string_values(df, PRODUCT_CATEGORY_TREE)?;
        let prices = numeric_values(df, DISCOUNTED_PRICE)?;

        let mut grouped: HashMap<&str, Vec<f64>> = top.iter().map(|c| (*c, Vec::new())).collect();
        for (category, price) in categories.iter().zip(prices) {
            if let (Some(category), Some(price)) = (category, price) {
                if let Some(bucket) = grouped.get_mut(category.as_str()) {
                    bucket.push(price);
                }
            }
        }

        let groups = top
            .iter()
            .map(|category| CategoryPrices {
                category: category.to_string(),
                prices: grouped.remove(category).unwrap_or_default(),
            })
            .collect();

        Ok(BoxView {
            title: "Discounted Price by Top 5 Categories".to_string(),
            x_label: PRODUCT_CATEGORY_TREE.to_string(),
            y_label: DISCOUNTED_PRICE.to_string(),
            groups,
        })
    }

    pub fn brand_counts(&self, df: &DataFrame) -> Result<Option<CountView>> {
        if df.column(BRAND).is_err() {
            info!("No brand column in dataset; skipping brand chart");
            return Ok(None);
        }

        let entries = value_counts(df, BRAND)?
            .into_iter()
            .take(SHOWN_BRANDS)
            .collect();

        Ok(Some(CountView {
            title: "Top 20 Brands by Product Count".to_string(),
            x_label: "Count".to_string(),
            y_label: "Brand".to_string(),
            entries,
        }))
    }

    pub fn scatter(
        &self,
        df: &DataFrame,
        x_col: &str,
        y_col: &str,
        title: &str,
        x_label: &str,
        y_label: &str,
    ) -> Result<ScatterView> {
        let xs = numeric_values(df, x_col)?;
        let ys = numeric_values(df, y_col)?;

        let points = xs
            .into_iter()
            .zip(ys)
            .filter_map(|pair| match pair {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            })
            .collect();

        Ok(ScatterView {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            points,
            opacity: SCATTER_ALPHA,
        })
    }

    /// Correlation over every column the table holds as a number.
    pub fn correlation(&self, df: &DataFrame) -> Result<CorrelationView> {
        let numeric_columns: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| c.dtype().is_primitive_numeric())
            .map(|c| c.name().to_string())
            .collect();

        let values = numeric_columns
            .iter()
            .map(|name| numeric_values(df, name))
            .collect::<Result<Vec<_>>>()?;

        debug!("Correlating numeric columns: {:?}", numeric_columns);

        Ok(CorrelationView {
            title: "Correlation Heatmap".to_string(),
            matrix: correlation_matrix(&values),
            columns: numeric_columns,
        })
    }
}

impl BoxView {
    pub fn summaries(&self) -> Vec<PriceSummary> {
        self.groups
            .iter()
            .filter_map(|group| price_summary(&group.category, &group.prices))
            .collect()
    }
}

fn histogram(title: &str, x_label: &str, values: Vec<f64>, bins: usize) -> HistogramView {
    let bin_spec = BinSpec::for_values(&values, bins);
    let density = bin_spec.and_then(|spec| density_curve(&values, spec.size));

    HistogramView {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: "Count".to_string(),
        values,
        bins,
        bin_spec,
        density,
    }
}

/// Frequency of each non-missing value, most frequent first. Ties keep the
/// order in which values first appear in the table.
pub fn value_counts(df: &DataFrame, col_name: &str) -> Result<Vec<(String, usize)>> {
    let values = string_values(df, col_name)?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values.into_iter().flatten() {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // Stable sort keeps first-appearance order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(counts)
}

fn string_values(df: &DataFrame, col_name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(col_name)
        .with_context(|| format!("Dataset has no {} column", col_name))?;
    let as_text = column.cast(&DataType::String)?;

    Ok(as_text
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

/// Column values read as f64; text that does not parse and non-finite
/// numbers come back as `None`.
pub fn numeric_values(df: &DataFrame, col_name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(col_name)
        .with_context(|| format!("Dataset has no {} column", col_name))?;

    Ok(coerce_numeric(column)?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

fn present_values(df: &DataFrame, col_name: &str) -> Result<Vec<f64>> {
    Ok(numeric_values(df, col_name)?.into_iter().flatten().collect())
}
