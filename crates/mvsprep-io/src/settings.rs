use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use mvsprep_geometry::depth::disparity_numerator;

/// File name of the settings sidecar in a cams directory.
pub const GENERATION_SETTINGS_FILE: &str = "generation_settings.json";

const SETTINGS_COMMENT: &str = "Do not edit. This file holds the parameters used to generate the camera files of this directory. 'fovy' is in radians.";

/// Error types for the settings module.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Error reading or writing file
    #[error("error reading or writing file")]
    IoError(#[from] std::io::Error),

    /// Error encoding or decoding JSON
    #[error("error encoding or decoding settings: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// The parameters a cams directory was generated with.
///
/// Later conversions from disparity to depth must use `disparity_numerator`
/// as stored rather than recompute it.
///
/// Fields are declared in key order so the JSON keys come out sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Reminder that the file is generated.
    #[serde(rename = "_comment", default)]
    pub comment: String,
    /// Distance between two adjacent cameras.
    pub baseline: f64,
    /// Distance between two depth hypotheses.
    pub depth_interval: f64,
    /// Smallest depth hypothesis.
    pub depth_min: f64,
    /// `depth = disparity_numerator / disparity`.
    pub disparity_numerator: f64,
    /// Vertical field of view in radians.
    pub fovy: f64,
    /// Image height in pixels.
    pub image_height: u32,
    /// Image width in pixels.
    pub image_width: u32,
}

impl GenerationSettings {
    /// Collect the settings and derive the disparity numerator.
    pub fn new(
        fovy: f64,
        depth_min: f64,
        depth_interval: f64,
        baseline: f64,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        Self {
            comment: SETTINGS_COMMENT.to_string(),
            baseline,
            depth_interval,
            depth_min,
            disparity_numerator: disparity_numerator(baseline, image_height, fovy),
            fovy,
            image_height,
            image_width,
        }
    }
}

/// Write the settings as JSON indented with four spaces.
pub fn write_generation_settings(
    path: impl AsRef<Path>,
    settings: &GenerationSettings,
) -> Result<(), SettingsError> {
    let mut writer = BufWriter::new(File::create(path)?);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    settings.serialize(&mut serializer)?;

    writer.flush()?;
    Ok(())
}

/// Read the settings written by [`write_generation_settings`].
pub fn read_generation_settings(path: impl AsRef<Path>) -> Result<GenerationSettings, SettingsError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_settings() {
        let settings = GenerationSettings::new(60f64.to_radians(), 1.0, 0.5, 0.3, 1920, 1080);
        assert_relative_eq!(settings.disparity_numerator, 280.59223082615813, epsilon = 1e-9);
        assert_eq!(settings.image_width, 1920);
    }

    #[test]
    fn test_write_read_settings() -> Result<(), SettingsError> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join(GENERATION_SETTINGS_FILE);

        let settings = GenerationSettings::new(1.0, 2.0, 0.25, 0.3, 640, 480);
        write_generation_settings(&path, &settings)?;

        let text = std::fs::read_to_string(&path)?;
        let keys = text
            .lines()
            .filter_map(|l| l.trim().strip_prefix('"'))
            .filter_map(|l| l.split('"').next())
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                "_comment",
                "baseline",
                "depth_interval",
                "depth_min",
                "disparity_numerator",
                "fovy",
                "image_height",
                "image_width"
            ]
        );
        assert!(text.contains("\n    \"image_width\": 640"));

        assert_eq!(read_generation_settings(&path)?, settings);
        Ok(())
    }

    #[test]
    fn test_read_invalid_settings() -> Result<(), SettingsError> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join(GENERATION_SETTINGS_FILE);
        std::fs::write(&path, "{\"fovy\": 1.0}")?;

        assert!(matches!(
            read_generation_settings(&path),
            Err(SettingsError::JsonError(_))
        ));
        assert!(matches!(
            read_generation_settings(tmp_dir.path().join("missing.json")),
            Err(SettingsError::IoError(_))
        ));
        Ok(())
    }
}
