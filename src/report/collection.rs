use crate::processor::ViewSet;
use crate::report::charts::{box_plot, correlation_heatmap, count_plot, histogram_plot, scatter_plot};
use plotly::Plot;
use tracing::info;

struct Chart {
    title: String,
    plot: Plot,
}

/// All charts of one run, kept in memory until they are shown together.
pub struct Report {
    charts: Vec<Chart>,
}

impl Report {
    pub fn from_views(views: &ViewSet) -> Self {
        let mut report = Report { charts: Vec::new() };

        report.push(&views.discount_distribution.title, histogram_plot(&views.discount_distribution));
        report.push(&views.rating_distribution.title, histogram_plot(&views.rating_distribution));
        report.push(&views.category_counts.title, count_plot(&views.category_counts));
        report.push(&views.top_category_prices.title, box_plot(&views.top_category_prices));
        report.push(&views.discount_vs_rating.title, scatter_plot(&views.discount_vs_rating));
        if let Some(brands) = &views.brand_counts {
            report.push(&brands.title, count_plot(brands));
        }
        report.push(&views.correlation.title, correlation_heatmap(&views.correlation));
        report.push(&views.retail_vs_discount.title, scatter_plot(&views.retail_vs_discount));

        report
    }

    fn push(&mut self, title: &str, plot: Plot) {
        self.charts.push(Chart {
            title: title.to_string(),
            plot,
        });
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.charts.iter().map(|c| c.title.as_str()).collect()
    }

    /// Opens every chart in the default browser.
    pub fn show(&self) {
        info!("Displaying {} charts", self.charts.len());
        for chart in &self.charts {
            chart.plot.show();
        }
    }
}
