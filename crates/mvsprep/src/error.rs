use mvsprep_geometry::GeometryError;
use mvsprep_io::{
    cam_file::CamFileError, pair::PairFileError, pfm::PfmError, settings::SettingsError,
};

/// An error type for the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MvsPrepError {
    /// Invalid configuration, nothing was written.
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] GeometryError),

    /// Error writing the camera files.
    #[error(transparent)]
    CamFile(#[from] CamFileError),

    /// Error writing the pair file.
    #[error(transparent)]
    PairFile(#[from] PairFileError),

    /// Error writing the settings sidecar.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Error reading or writing a float map.
    #[error(transparent)]
    Pfm(#[from] PfmError),

    /// Error reading a configuration file.
    #[error("error reading configuration file")]
    IoError(#[from] std::io::Error),

    /// Error decoding a configuration file.
    #[error("error decoding configuration file: {0}")]
    JsonError(#[from] serde_json::Error),
}
