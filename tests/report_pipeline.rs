use product_eda::ReportPipeline;
use product_eda::config::ReportConfig;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_catalog(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn catalog(with_brand: bool) -> String {
    let mut csv = String::from(if with_brand {
        " product_name , retail_price , discounted_price ,product_rating,product_category_tree, brand \n"
    } else {
        " product_name , retail_price , discounted_price ,product_rating,product_category_tree\n"
    });

    for i in 0..60 {
        let brand = if i == 5 { "NA".to_string() } else { format!("brand_{}", i % 7) };
        let category = format!("[\"Home >> Section {}\"]", i % 12);
        let retail = if i % 17 == 0 { String::new() } else { format!("{}", 200 + i * 7) };
        let discounted = if i % 23 == 0 { "call for price".to_string() } else { format!("{}", 150 + i * 3) };
        let rating = if i % 4 == 0 { "No rating available".to_string() } else { format!("{}.{}", i % 5, i % 10) };
        csv.push_str(&format!("item {},{},{},{},\"{}\"", i, retail, discounted, rating, category.replace('"', "\"\"")));
        if with_brand {
            csv.push_str(&format!(",{}", brand));
        }
        csv.push('\n');
    }

    csv
}

#[test]
fn full_run_builds_eight_charts() {
    let file = write_catalog(&catalog(true));

    let mut config = ReportConfig::default();
    config.dataset.path = file.path().to_path_buf();

    let output = ReportPipeline::new().run(&config).unwrap();

    // Rows 0, 17, 34 and 51 lack a retail price; row 23 and 46 have an unparseable one.
    assert_eq!(output.summary.rows_loaded, 60);
    assert_eq!(output.summary.rows_missing_price, 4);
    assert_eq!(output.summary.rows_unparseable_price, 2);
    assert_eq!(output.summary.rows_retained, 54);
    assert_eq!(output.table.height(), 54);

    assert_eq!(output.report.len(), 8);
    assert_eq!(
        output.report.titles(),
        vec![
            "Distribution of Discount %",
            "Distribution of Product Ratings",
            "Product Count by Category (Excl. Top 10)",
            "Discounted Price by Top 5 Categories",
            "Discount % vs Product Rating",
            "Top 20 Brands by Product Count",
            "Correlation Heatmap",
            "Retail Price vs Discount %",
        ]
    );

    let brands = output.views.brand_counts.as_ref().unwrap();
    assert!(brands.entries.iter().all(|(brand, _)| brand != "NA"));

    // 12 categories: the view after the top ten holds the last two.
    assert_eq!(output.views.category_counts.entries.len(), 2);
}

#[test]
fn run_without_brand_column_skips_brand_chart() {
    let file = write_catalog(&catalog(false));

    let output = ReportPipeline::new().run_path(file.path()).unwrap();

    assert!(output.views.brand_counts.is_none());
    assert_eq!(output.report.len(), 7);
    assert!(!output.report.titles().contains(&"Top 20 Brands by Product Count"));
}

#[test]
fn missing_dataset_aborts_the_run() {
    let mut config = ReportConfig::default();
    config.dataset.path = "/nonexistent/catalog.csv".into();

    assert!(ReportPipeline::new().run(&config).is_err());
}
