use crate::processor::{BoxView, CorrelationView, CountView, HistogramView, ScatterView};
use plotly::box_plot::BoxPoints;
use plotly::common::{ColorScale, ColorScalePalette, Line, Marker, Mode, Orientation};
use plotly::histogram::Bins;
use plotly::layout::{Annotation, Axis, Layout};
use plotly::{Bar, BoxPlot, HeatMap, Histogram, Plot, Scatter};

fn layout(title: &str, x_title: &str, y_title: &str) -> Layout {
    Layout::new()
        .title(title)
        .x_axis(Axis::new().title(x_title))
        .y_axis(Axis::new().title(y_title))
}

/// Histogram with a count-scaled density curve on top.
pub fn histogram_plot(view: &HistogramView) -> Plot {
    let mut trace = Histogram::new(view.values.clone())
        .name("Count")
        .n_bins_x(view.bins);
    if let Some(spec) = view.bin_spec {
        trace = trace.x_bins(Bins::new(spec.start, spec.end, spec.size));
    }

    let mut plot = Plot::new();
    plot.add_trace(trace);

    if let Some(density) = &view.density {
        let (xs, ys): (Vec<f64>, Vec<f64>) = density.iter().copied().unzip();
        plot.add_trace(
            Scatter::new(xs, ys)
                .mode(Mode::Lines)
                .name("KDE")
                .line(Line::new().color("rgba(31, 119, 180, 1.0)").width(2.0)),
        );
    }

    plot.set_layout(layout(&view.title, &view.x_label, &view.y_label));

    plot
}

/// Horizontal bars, most frequent label at the top.
pub fn count_plot(view: &CountView) -> Plot {
    // Plotly stacks categorical y values bottom-up.
    let (labels, counts): (Vec<String>, Vec<usize>) = view.entries.iter().rev().cloned().unzip();

    let mut plot = Plot::new();
    plot.add_trace(
        Bar::new(counts, labels)
            .orientation(Orientation::Horizontal)
            .name("Count"),
    );
    plot.set_layout(
        Layout::new()
            .title(view.title.as_str())
            .x_axis(Axis::new().title(view.x_label.as_str()))
            .y_axis(Axis::new().title(view.y_label.as_str()).auto_margin(true)),
    );

    plot
}

pub fn box_plot(view: &BoxView) -> Plot {
    let mut plot = Plot::new();

    for group in &view.groups {
        let categories = vec![group.category.clone(); group.prices.len()];
        plot.add_trace(
            BoxPlot::new_xy(categories, group.prices.clone())
                .name(group.category.as_str())
                .box_points(BoxPoints::Outliers),
        );
    }

    plot.set_layout(
        Layout::new()
            .title(view.title.as_str())
            .show_legend(false)
            .x_axis(
                Axis::new()
                    .title(view.x_label.as_str())
                    .tick_angle(45.0)
                    .auto_margin(true),
            )
            .y_axis(Axis::new().title(view.y_label.as_str())),
    );

    plot
}

pub fn scatter_plot(view: &ScatterView) -> Plot {
    let (xs, ys): (Vec<f64>, Vec<f64>) = view.points.iter().copied().unzip();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(xs, ys)
            .mode(Mode::Markers)
            .opacity(view.opacity)
            .marker(Marker::new().size(6)),
    );
    plot.set_layout(layout(&view.title, &view.x_label, &view.y_label));

    plot
}

/// Annotated heat map, each cell labelled with two decimals.
pub fn correlation_heatmap(view: &CorrelationView) -> Plot {
    let z: Vec<Vec<f64>> = view
        .matrix
        .rows()
        .into_iter()
        .map(|row| row.to_vec())
        .collect();

    let mut annotations = Vec::new();
    for (i, row_name) in view.columns.iter().enumerate() {
        for (j, col_name) in view.columns.iter().enumerate() {
            annotations.push(
                Annotation::new()
                    .x(col_name.as_str())
                    .y(row_name.as_str())
                    .text(correlation_label(view.matrix[[i, j]]))
                    .show_arrow(false),
            );
        }
    }

    let mut plot = Plot::new();
    plot.add_trace(
        HeatMap::new(view.columns.clone(), view.columns.clone(), z)
            .color_scale(ColorScale::Palette(ColorScalePalette::RdBu))
            .reverse_scale(true),
    );
    plot.set_layout(
        Layout::new()
            .title(view.title.as_str())
            .annotations(annotations)
            .x_axis(Axis::new().auto_margin(true))
            .y_axis(Axis::new().auto_margin(true)),
    );

    plot
}

pub fn correlation_label(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        String::new()
    }
}
