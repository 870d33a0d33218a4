use std::path::Path;

use mvsprep_geometry::depth::{disparity_map_to_depth, disparity_to_depth};
use mvsprep_io::{
    pfm::{read_pfm, write_pfm, PfmError, PfmImage},
    settings::GenerationSettings,
};

use crate::MvsPrepError;

/// Convert a disparity with the numerator stored in the settings.
pub fn depth_from_settings(settings: &GenerationSettings, disparity: f64) -> Result<f64, MvsPrepError> {
    Ok(disparity_to_depth(settings.disparity_numerator, disparity)?)
}

/// Convert a single channel disparity PFM into a depth PFM.
///
/// # Arguments
///
/// * `settings` - The settings of the cams directory the disparities belong to.
/// * `disparity_path` - The input disparity map.
/// * `depth_path` - The output depth map, replaced if it exists.
pub fn convert_disparity_pfm(
    settings: &GenerationSettings,
    disparity_path: impl AsRef<Path>,
    depth_path: impl AsRef<Path>,
) -> Result<(), MvsPrepError> {
    let disparity = read_pfm(disparity_path.as_ref())?;
    if disparity.channels() != 1 {
        return Err(PfmError::UnsupportedChannels(disparity.channels()).into());
    }

    let depth = disparity_map_to_depth(settings.disparity_numerator, disparity.as_slice())?;
    let depth = PfmImage::new(disparity.width(), disparity.height(), 1, depth)?;
    write_pfm(depth_path.as_ref(), &depth)?;

    log::info!(
        "converted {} to {}",
        disparity_path.as_ref().display(),
        depth_path.as_ref().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn settings() -> GenerationSettings {
        GenerationSettings::new(60f64.to_radians(), 1.0, 0.5, 0.3, 1920, 1080)
    }

    #[test]
    fn test_depth_from_settings() -> Result<(), MvsPrepError> {
        let mut settings = settings();
        assert_relative_eq!(depth_from_settings(&settings, 28.059223082615813)?, 10.0, epsilon = 1e-9);

        // the stored numerator wins over the other parameters
        settings.disparity_numerator = 100.0;
        assert_eq!(depth_from_settings(&settings, 4.0)?, 25.0);

        assert!(matches!(
            depth_from_settings(&settings, 0.0),
            Err(MvsPrepError::Configuration(_))
        ));
        Ok(())
    }

    #[test]
    fn test_convert_disparity_pfm() -> Result<(), MvsPrepError> {
        let tmp_dir = tempfile::tempdir()?;
        let disparity_path = tmp_dir.path().join("disparity.pfm");
        let depth_path = tmp_dir.path().join("depth.pfm");

        let mut settings = settings();
        settings.disparity_numerator = 10.0;

        write_pfm(&disparity_path, &PfmImage::new(2, 1, 1, vec![2.0, 5.0])?)?;
        convert_disparity_pfm(&settings, &disparity_path, &depth_path)?;

        let depth = read_pfm(&depth_path)?;
        assert_eq!(depth.width(), 2);
        assert_eq!(depth.as_slice(), &[5.0, 2.0]);

        write_pfm(&disparity_path, &PfmImage::new(1, 1, 3, vec![1.0; 3])?)?;
        assert!(convert_disparity_pfm(&settings, &disparity_path, &depth_path).is_err());
        Ok(())
    }
}
