//! TOML configuration for the detector and classifier paths.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Detector tensor layout and post-processing thresholds.
///
/// Unknown keys are rejected so a misspelled threshold cannot silently fall
/// back to its default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub num_classes: usize,
    pub num_anchors: usize,
    pub confidence_threshold: f32,
    /// Overlap at or above which NMS drops the weaker box. Must be in `(0, 1]`.
    pub iou_threshold: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            num_classes: 11,
            num_anchors: 8400,
            confidence_threshold: 0.3,
            iou_threshold: 0.5,
        }
    }
}

/// Model files for the landmark classifier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub forest_path: Option<PathBuf>,
    pub labels_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    pub detector: DetectorConfig,
    pub classifier: ClassifierConfig,
    /// Label file for the detector's classes.
    pub labels_path: Option<PathBuf>,
}

impl RecognizerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_unit("detector.confidence_threshold", self.detector.confidence_threshold)?;
        check_unit("detector.iou_threshold", self.detector.iou_threshold)?;
        // IoU of boxes whose union degenerates is 0, which a zero threshold
        // would treat as overlap.
        if self.detector.iou_threshold <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "detector.iou_threshold",
                message: "must be greater than 0".into(),
            });
        }
        if self.detector.num_classes == 0 {
            return Err(ConfigError::Invalid {
                field: "detector.num_classes",
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            message: format!("{value} is outside [0, 1]"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RecognizerConfig::from_toml_str("").unwrap();
        assert_eq!(config.detector.num_classes, 11);
        assert_eq!(config.detector.num_anchors, 8400);
        assert_eq!(config.detector.confidence_threshold, 0.3);
        assert_eq!(config.detector.iou_threshold, 0.5);
        assert!(config.classifier.forest_path.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = RecognizerConfig::from_toml_str(
            r#"
            labels_path = "labels.txt"

            [detector]
            num_classes = 26
            iou_threshold = 0.45

            [classifier]
            forest_path = "forest.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.detector.num_classes, 26);
        assert_eq!(config.detector.iou_threshold, 0.45);
        assert_eq!(config.detector.confidence_threshold, 0.3);
        assert_eq!(config.labels_path, Some(PathBuf::from("labels.txt")));
        assert_eq!(
            config.classifier.forest_path,
            Some(PathBuf::from("forest.json"))
        );
    }

    #[test]
    fn test_threshold_out_of_range() {
        let err = RecognizerConfig::from_toml_str("[detector]\nconfidence_threshold = 1.5\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "detector.confidence_threshold",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_iou_threshold_rejected() {
        let err = RecognizerConfig::from_toml_str("[detector]\niou_threshold = 0.0\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "detector.iou_threshold",
                ..
            }
        ));
        assert!(RecognizerConfig::from_toml_str("[detector]\niou_threshold = 1.0\n").is_ok());
    }

    #[test]
    fn test_unknown_detector_key_rejected() {
        assert!(matches!(
            RecognizerConfig::from_toml_str("[detector]\ninput_size = 640\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RecognizerConfig::from_toml_str("[detector]\niou_treshold = 0.4\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_syntax() {
        assert!(matches!(
            RecognizerConfig::from_toml_str("[detector"),
            Err(ConfigError::Parse(_))
        ));
    }
}
