use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "configs/report.toml";
pub const DATASET_ENV_VAR: &str = "PRODUCT_EDA_DATASET";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub dataset: DatasetSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSection {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    #[serde(default = "default_show")]
    pub show: bool,
}

fn default_show() -> bool {
    true
}

impl ReportConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report config file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse report config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ReportConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Loads the config file, falling back to defaults only when the default
    /// location is absent. An explicitly requested file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(DATASET_ENV_VAR);
    }

    fn apply_env_overrides_from(&mut self, var: &str) {
        if let Ok(path) = env::var(var) {
            if !path.trim().is_empty() {
                self.dataset.path = PathBuf::from(path.trim());
            }
        }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset.path
    }

    pub fn validate(&self) -> Result<()> {
        if self.dataset.path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Dataset path cannot be empty"));
        }

        Ok(())
    }
}

impl Default for DatasetSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/flipkart_com-ecommerce_sample.csv"),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self { show: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(
            config.dataset_path(),
            Path::new("data/flipkart_com-ecommerce_sample.csv")
        );
        assert!(config.display.show);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = ReportConfig::from_toml_str(
            r#"
            [dataset]
            path = "/tmp/products.csv"

            [display]
            show = false
            "#,
        )
        .unwrap();

        assert_eq!(config.dataset_path(), Path::new("/tmp/products.csv"));
        assert!(!config.display.show);
    }

    #[test]
    fn test_missing_display_section_defaults_to_show() {
        let config = ReportConfig::from_toml_str(
            r#"
            [dataset]
            path = "products.csv"
            "#,
        )
        .unwrap();

        assert!(config.display.show);
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let config = ReportConfig::from_toml_str(
            r#"
            [dataset]
            path = ""
            "#,
        )
        .unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_override() {
        unsafe {
            env::set_var("TEST_PRODUCT_EDA_DATASET", " /data/override.csv ");
        }

        let mut config = ReportConfig::default();
        config.apply_env_overrides_from("TEST_PRODUCT_EDA_DATASET");
        assert_eq!(config.dataset_path(), Path::new("/data/override.csv"));

        unsafe {
            env::remove_var("TEST_PRODUCT_EDA_DATASET");
        }
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = ReportConfig::load(Some(Path::new("/nonexistent/report.toml")));
        assert!(result.is_err());
    }
}
