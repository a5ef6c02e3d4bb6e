use anyhow::{Context, Result};
use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Cell values read as missing, on top of empty fields.
pub const NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub struct CsvLoader;

impl CsvLoader {
    pub fn load_path(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

        let df = self
            .load_reader(file)
            .with_context(|| format!("Failed to parse dataset as CSV: {}", path.display()))?;

        info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );

        Ok(df)
    }

    /// Reads a headed, comma-delimited table and trims every column name.
    pub fn load_reader<R: MmapBytesReader>(&self, reader: R) -> Result<DataFrame> {
        // Scan the whole file for schema inference; a text value past the
        // first rows must not abort the read.
        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .map_parse_options(|opts| {
                opts.with_null_values(Some(NullValues::AllColumns(
                    NULL_TOKENS.iter().map(|t| (*t).into()).collect(),
                )))
            })
            .into_reader_with_file_handle(reader)
            .finish()?;

        self.normalize_headers(&mut df)?;

        Ok(df)
    }

    pub fn normalize_headers(&self, df: &mut DataFrame) -> Result<()> {
        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for col_name in column_names {
            let trimmed = col_name.trim();
            if trimmed != col_name {
                debug!("Renaming column {:?} -> {:?}", col_name, trimmed);
                df.rename(&col_name, trimmed.into())
                    .with_context(|| format!("Failed to rename column {:?}", col_name))?;
            }
        }

        Ok(())
    }
}
