/// Run settings
///
/// Everything configurable about a run, loadable from a JSON file.
/// Command-line flags are applied on top of whatever the file sets.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SettingsError;
use crate::state::aggregate::GroupingPolicy;
use crate::state::scanner::ScanOptions;
use crate::ui::chart::ChartConfig;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub scan: ScanOptions,
    pub grouping: GroupingPolicy,
    pub chart: ChartConfig,
}

impl Settings {
    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string and validate
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.grouping.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_object_gives_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.chart.html_file_name, "focal_length_usage_per_lens.html");
        assert!(!settings.scan.follow_links);
        assert_eq!(settings.grouping.bucket_width, None);
    }

    #[test]
    fn test_partial_settings() {
        let settings = Settings::from_json(
            r#"{"grouping": {"bucket_width": 5.0}, "chart": {"output_dir": "out", "png_width": 800}}"#,
        )
        .unwrap();

        assert_eq!(settings.grouping.bucket_width, Some(5.0));
        assert_eq!(settings.chart.output_dir, PathBuf::from("out"));
        assert_eq!(settings.chart.png_width, 800);
        assert_eq!(settings.chart.png_height, 900);
    }

    #[test]
    fn test_round_trip() {
        let mut settings = Settings::default();
        settings.scan.follow_links = true;
        settings.grouping.bucket_width = Some(2.5);

        let restored = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(settings, restored);
    }

    #[test]
    fn test_rejects_bad_bucket_width() {
        let err = Settings::from_json(r#"{"grouping": {"bucket_width": -1.0}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidBucketWidth(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Path::new("/no/such/settings.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
