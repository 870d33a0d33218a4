use std::path::{Path, PathBuf};

use mvsprep_geometry::{
    camera::{build_extrinsic, build_intrinsic, deduce_fovx, CameraIntrinsic},
    grid::{arrange, CameraPosition},
    proximity::{select_neighbours, NeighbourList},
};
use mvsprep_io::{
    cam_file::{write_cams_dir, CamFile},
    pair::write_pair_file,
    settings::{write_generation_settings, GenerationSettings, GENERATION_SETTINGS_FILE},
};

use crate::{config::GenerationConfig, MvsPrepError};

/// File name of the pair file in a cams directory.
pub const PAIR_FILE: &str = "pair.txt";

/// Everything written to a cams directory, computed in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    /// Grid position of each camera, indexed by camera id.
    pub positions: Vec<CameraPosition>,
    /// The intrinsics shared by all cameras.
    pub intrinsic: CameraIntrinsic,
    /// The camera file of each camera, indexed by camera id.
    pub cams: Vec<CamFile>,
    /// The selected neighbours of each camera, indexed by camera id.
    pub neighbours: Vec<NeighbourList>,
    /// The settings sidecar.
    pub settings: GenerationSettings,
}

/// Compute the calibration of every camera of the rig.
///
/// # Errors
///
/// Fails on any configuration error. Nothing is written.
pub fn build_calibration(config: &GenerationConfig) -> Result<Calibration, MvsPrepError> {
    config.validate()?;
    let positions = arrange(&config.grid)?;

    let fovy = config.fovy();
    let intrinsic = build_intrinsic(config.image_width, config.image_height, fovy);
    log::info!(
        "intrinsics: focal length {:.3}px, fovx {:.3} deg, fovy {:.3} deg",
        intrinsic.fx,
        deduce_fovx(fovy, config.image_width, config.image_height).to_degrees(),
        config.fovy_degrees
    );

    let cams = positions
        .iter()
        .map(|p| {
            let extrinsic = build_extrinsic(p.row, p.col, config.baseline);
            CamFile::new(&extrinsic, &intrinsic, config.depth_min, config.depth_interval)
        })
        .collect();

    log::info!(
        "selecting at most {} neighbours with a score >= {}",
        config.max_neighbours,
        config.min_neighbour_score
    );
    let neighbours = select_neighbours(
        &positions,
        config.max_neighbours,
        config.min_neighbour_score,
    );

    let settings = GenerationSettings::new(
        fovy,
        config.depth_min,
        config.depth_interval,
        config.baseline,
        config.image_width,
        config.image_height,
    );

    Ok(Calibration {
        positions,
        intrinsic,
        cams,
        neighbours,
        settings,
    })
}

/// Paths of the files of a generated cams directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CamsDirFiles {
    /// The camera files, indexed by camera id.
    pub cam_files: Vec<PathBuf>,
    /// The pair file.
    pub pair_file: PathBuf,
    /// The generation settings sidecar.
    pub settings_file: PathBuf,
}

/// Write a calibration to `cams_dir`, creating it if needed and replacing
/// existing files.
pub fn write_calibration(
    cams_dir: impl AsRef<Path>,
    calibration: &Calibration,
) -> Result<CamsDirFiles, MvsPrepError> {
    let cams_dir = cams_dir.as_ref();

    let cam_files = write_cams_dir(cams_dir, &calibration.cams)?;

    let pair_file = cams_dir.join(PAIR_FILE);
    write_pair_file(&pair_file, &calibration.neighbours)?;

    let settings_file = cams_dir.join(GENERATION_SETTINGS_FILE);
    write_generation_settings(&settings_file, &calibration.settings)?;
    log::info!("wrote generation settings to {}", settings_file.display());

    Ok(CamsDirFiles {
        cam_files,
        pair_file,
        settings_file,
    })
}

/// Generate the whole cams directory of a rig.
///
/// The calibration is fully computed before the first file is written, so a
/// configuration error leaves the directory untouched.
pub fn generate_cams_dir(
    cams_dir: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<CamsDirFiles, MvsPrepError> {
    let calibration = build_calibration(config)?;
    write_calibration(cams_dir, &calibration)
}
