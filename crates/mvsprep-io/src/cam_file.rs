use std::{
    fs,
    path::{Path, PathBuf},
};

use mvsprep_geometry::camera::{CameraExtrinsic, CameraIntrinsic};

use crate::text::{format_fixed, parse_part, write_lines, Tokens};

/// Error types for the cam file module.
#[derive(Debug, thiserror::Error)]
pub enum CamFileError {
    /// Error reading or writing file
    #[error("error reading or writing file")]
    IoError(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error {0}")]
    ParseError(String),
}

/// The content of a MVSNet camera file.
///
/// ```text
/// extrinsic
/// E00 E01 E02 E03
/// E10 E11 E12 E13
/// E20 E21 E22 E23
/// E30 E31 E32 E33
///
/// intrinsic
/// K00 K01 K02
/// K10 K11 K12
/// K20 K21 K22
///
/// DEPTH_MIN DEPTH_INTERVAL (DEPTH_NUM (DEPTH_MAX))
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CamFile {
    /// The 4x4 world to camera transform.
    pub extrinsic: [[f64; 4]; 4],
    /// The 3x3 pinhole camera matrix.
    pub intrinsic: [[f64; 3]; 3],
    /// The smallest depth hypothesis.
    pub depth_min: f64,
    /// The distance between two depth hypotheses.
    pub depth_interval: f64,
    /// The number of depth hypotheses, optional.
    pub depth_num: Option<u32>,
    /// The largest depth hypothesis, optional.
    pub depth_max: Option<f64>,
}

impl CamFile {
    /// Create a camera file from the camera parameters and the depth range.
    pub fn new(
        extrinsic: &CameraExtrinsic,
        intrinsic: &CameraIntrinsic,
        depth_min: f64,
        depth_interval: f64,
    ) -> Self {
        Self {
            extrinsic: extrinsic.matrix(),
            intrinsic: intrinsic.matrix(),
            depth_min,
            depth_interval,
            depth_num: None,
            depth_max: None,
        }
    }
}

/// The file name of the camera `camera_id`, e.g. `00000015_cam.txt`.
pub fn cam_file_name(camera_id: usize) -> String {
    format!("{camera_id:08}_cam.txt")
}

fn format_matrix<const N: usize>(matrix: &[[f64; N]; N]) -> Vec<String> {
    matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| format_fixed(v))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn cam_file_lines(cam: &CamFile) -> Vec<String> {
    let mut depth = vec![format_fixed(cam.depth_min), format_fixed(cam.depth_interval)];
    if let Some(depth_num) = cam.depth_num {
        depth.push(depth_num.to_string());
        if let Some(depth_max) = cam.depth_max {
            depth.push(format_fixed(depth_max));
        }
    }

    let mut lines = vec!["extrinsic".to_string()];
    lines.extend(format_matrix(&cam.extrinsic));
    lines.push(String::new());
    lines.push("intrinsic".to_string());
    lines.extend(format_matrix(&cam.intrinsic));
    lines.push(String::new());
    lines.push(depth.join(" "));
    lines
}

/// Format a camera file as text.
pub fn format_cam_file(cam: &CamFile) -> String {
    cam_file_lines(cam).join("\n")
}

/// Write a camera file, replacing any existing file.
///
/// # Arguments
///
/// * `path` - The path to the camera file.
/// * `cam` - The camera parameters.
pub fn write_cam_file(path: impl AsRef<Path>, cam: &CamFile) -> Result<(), CamFileError> {
    write_lines(path.as_ref(), &cam_file_lines(cam))?;
    Ok(())
}

/// Write one camera file per camera into `cams_dir`, creating it if needed.
///
/// The camera id of each file is its index in `cams`.
///
/// # Returns
///
/// The paths of the written files, in camera id order.
pub fn write_cams_dir(
    cams_dir: impl AsRef<Path>,
    cams: &[CamFile],
) -> Result<Vec<PathBuf>, CamFileError> {
    let cams_dir = cams_dir.as_ref();
    fs::create_dir_all(cams_dir)?;

    let paths = cams
        .iter()
        .enumerate()
        .map(|(camera_id, cam)| -> Result<PathBuf, CamFileError> {
            let path = cams_dir.join(cam_file_name(camera_id));
            write_cam_file(&path, cam)?;
            Ok(path)
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("wrote {} camera files to {}", paths.len(), cams_dir.display());

    Ok(paths)
}

/// Parse the text of a camera file.
pub fn parse_cam_file(text: &str) -> Result<CamFile, CamFileError> {
    let mut tokens = Tokens::new(text);

    tokens
        .expect_label("extrinsic")
        .map_err(CamFileError::ParseError)?;
    let mut extrinsic = [[0.0; 4]; 4];
    for row in extrinsic.iter_mut() {
        for v in row.iter_mut() {
            *v = tokens
                .next_parsed("extrinsic value")
                .map_err(CamFileError::ParseError)?;
        }
    }

    tokens
        .expect_label("intrinsic")
        .map_err(CamFileError::ParseError)?;
    let mut intrinsic = [[0.0; 3]; 3];
    for row in intrinsic.iter_mut() {
        for v in row.iter_mut() {
            *v = tokens
                .next_parsed("intrinsic value")
                .map_err(CamFileError::ParseError)?;
        }
    }

    let depth_min = tokens
        .next_parsed("depth min")
        .map_err(CamFileError::ParseError)?;
    let depth_interval = tokens
        .next_parsed("depth interval")
        .map_err(CamFileError::ParseError)?;

    let (depth_num, depth_max) = match tokens.rest().as_slice() {
        [] => (None, None),
        [num] => (Some(parse_part(num).map_err(CamFileError::ParseError)?), None),
        [num, max] => (
            Some(parse_part(num).map_err(CamFileError::ParseError)?),
            Some(parse_part(max).map_err(CamFileError::ParseError)?),
        ),
        extra => {
            return Err(CamFileError::ParseError(format!(
                "Invalid number of depth parameters: {}",
                extra.len() + 2
            )))
        }
    };

    Ok(CamFile {
        extrinsic,
        intrinsic,
        depth_min,
        depth_interval,
        depth_num,
        depth_max,
    })
}

/// Read a camera file.
///
/// # Arguments
///
/// * `path` - The path to the camera file.
pub fn read_cam_file(path: impl AsRef<Path>) -> Result<CamFile, CamFileError> {
    let text = fs::read_to_string(path)?;
    parse_cam_file(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mvsprep_geometry::camera::{build_extrinsic, build_intrinsic};

    fn sample_cam() -> CamFile {
        CamFile::new(
            &build_extrinsic(3, 0, 0.3),
            &build_intrinsic(1920, 1080, 60f64.to_radians()),
            1.0,
            0.5,
        )
    }

    #[test]
    fn test_cam_file_name() {
        assert_eq!(cam_file_name(0), "00000000_cam.txt");
        assert_eq!(cam_file_name(15), "00000015_cam.txt");
    }

    #[test]
    fn test_format_cam_file() {
        let text = format_cam_file(&sample_cam());
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "extrinsic");
        assert_eq!(
            lines[1],
            "1.000000000000000000 0.000000000000000000 0.000000000000000000 0.899999999999999911"
        );
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "intrinsic");
        assert!(lines[8].starts_with("0.000000000000000000 935.3074360871937"));
        assert!(lines[8].ends_with(" 540.000000000000000000"));
        assert_eq!(lines[10], "");
        assert_eq!(lines[11], "1.000000000000000000 0.500000000000000000");
        assert!(!text.ends_with('\n'));
        assert!(lines
            .iter()
            .filter(|l| !l.ends_with("insic"))
            .all(|l| !l.contains('e')));
    }

    #[test]
    fn test_write_read_cam_file() -> Result<(), CamFileError> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join(cam_file_name(0));

        let cam = sample_cam();
        write_cam_file(&path, &cam)?;
        let cam_back = read_cam_file(&path)?;

        for (row, row_back) in cam.extrinsic.iter().zip(cam_back.extrinsic.iter()) {
            for (v, v_back) in row.iter().zip(row_back.iter()) {
                assert_relative_eq!(v, v_back, epsilon = 1e-15);
            }
        }
        for (row, row_back) in cam.intrinsic.iter().zip(cam_back.intrinsic.iter()) {
            for (v, v_back) in row.iter().zip(row_back.iter()) {
                assert_relative_eq!(v, v_back, epsilon = 1e-12);
            }
        }
        assert_eq!(cam_back.depth_min, 1.0);
        assert_eq!(cam_back.depth_interval, 0.5);
        assert_eq!(cam_back.depth_num, None);

        // existing files are replaced
        let mut other = cam.clone();
        other.depth_min = 2.0;
        write_cam_file(&path, &other)?;
        assert_eq!(read_cam_file(&path)?.depth_min, 2.0);

        Ok(())
    }

    #[test]
    fn test_write_cams_dir() -> Result<(), CamFileError> {
        let tmp_dir = tempfile::tempdir()?;
        let cams_dir = tmp_dir.path().join("scene").join("cams");

        let cams = vec![sample_cam(); 3];
        let paths = write_cams_dir(&cams_dir, &cams)?;

        assert_eq!(paths.len(), 3);
        assert_eq!(paths[2], cams_dir.join("00000002_cam.txt"));
        assert!(paths.iter().all(|p| p.exists()));

        Ok(())
    }

    #[test]
    fn test_parse_depth_extras() -> Result<(), CamFileError> {
        let mut cam = sample_cam();
        cam.depth_num = Some(192);
        cam.depth_max = Some(96.5);
        let cam_back = parse_cam_file(&format_cam_file(&cam))?;
        assert_eq!(cam_back.depth_num, Some(192));
        assert_eq!(cam_back.depth_max, Some(96.5));

        let text = format_cam_file(&sample_cam()) + " 192 96.5 7";
        assert!(parse_cam_file(&text).is_err());
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_cam_file("").is_err());
        assert!(parse_cam_file("intrinsic\n1 0 0").is_err());

        let text = format_cam_file(&sample_cam()).replace("intrinsic", "intrinsics");
        assert!(matches!(
            parse_cam_file(&text),
            Err(CamFileError::ParseError(_))
        ));

        let truncated = "extrinsic\n1 0 0 0\n0 1 0 0\n";
        assert!(parse_cam_file(truncated).is_err());

        let bad_value = format_cam_file(&sample_cam()).replacen("0.0", "zero", 1);
        assert!(parse_cam_file(&bad_value).is_err());
    }
}
