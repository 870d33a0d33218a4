use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use mvsprep_geometry::{camera::validate_optics, grid::CameraGrid, GeometryError};

use crate::MvsPrepError;

/// The parameters of a camera directory generation run.
///
/// Built once at startup and passed to every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// The layout of the camera ids on the rig.
    pub grid: CameraGrid,
    /// Maximum number of neighbours per camera.
    pub max_neighbours: usize,
    /// Minimum neighbour score, `1.0` keeps the axis adjacent cameras only.
    pub min_neighbour_score: f64,
    /// Distance between two adjacent cameras.
    pub baseline: f64,
    /// Vertical field of view in degrees.
    pub fovy_degrees: f64,
    /// Image width in pixels.
    pub image_width: u32,
    /// Image height in pixels.
    pub image_height: u32,
    /// Smallest depth hypothesis.
    pub depth_min: f64,
    /// Distance between two depth hypotheses.
    pub depth_interval: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grid: CameraGrid::revery_4x4(),
            max_neighbours: 10,
            min_neighbour_score: 1.0,
            baseline: 0.3,
            fovy_degrees: 60.0,
            image_width: 1920,
            image_height: 1080,
            depth_min: 1.0,
            depth_interval: 0.5,
        }
    }
}

impl GenerationConfig {
    /// Vertical field of view in radians.
    pub fn fovy(&self) -> f64 {
        self.fovy_degrees.to_radians()
    }

    /// Check the numeric parameters.
    ///
    /// The grid itself is checked when the cameras are arranged.
    pub fn validate(&self) -> Result<(), GeometryError> {
        validate_optics(self.image_width, self.image_height, self.fovy())?;

        if !(self.baseline.is_finite() && self.baseline > 0.0) {
            return Err(GeometryError::InvalidBaseline(self.baseline));
        }

        for (name, value) in [
            ("depth_min", self.depth_min),
            ("depth_interval", self.depth_interval),
        ] {
            if !value.is_finite() {
                return Err(GeometryError::InvalidDepthParameter { name, value });
            }
        }

        if !self.min_neighbour_score.is_finite() {
            return Err(GeometryError::InvalidNeighbourScore(
                self.min_neighbour_score,
            ));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file, missing fields take their
    /// default value.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MvsPrepError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Load a camera grid from a JSON file holding an array of rows.
pub fn load_grid(path: impl AsRef<Path>) -> Result<CameraGrid, MvsPrepError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
