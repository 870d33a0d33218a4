//! End-to-end generation of the cams directory of the 4x4 ReVeRy rig.

use approx::assert_relative_eq;
use mvsprep::{
    config::GenerationConfig,
    geometry::camera::deduce_fovx,
    io::{
        cam_file::read_cam_file, pair::read_pair_file, settings::read_generation_settings,
    },
    pipeline::{build_calibration, generate_cams_dir},
    MvsPrepError,
};

#[test]
fn generate_revery_cams_dir() -> Result<(), MvsPrepError> {
    let tmp_dir = tempfile::tempdir()?;
    let cams_dir = tmp_dir.path().join("cams");
    let config = GenerationConfig::default();

    let files = generate_cams_dir(&cams_dir, &config)?;
    assert_eq!(files.cam_files.len(), 16);

    let mut names = std::fs::read_dir(&cams_dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>, _>>()?;
    names.sort();
    assert_eq!(names.len(), 18);
    assert_eq!(names[0], "00000000_cam.txt");
    assert_eq!(names[15], "00000015_cam.txt");
    assert_eq!(names[16], "generation_settings.json");
    assert_eq!(names[17], "pair.txt");

    // every camera file reads back to the computed matrices
    let calibration = build_calibration(&config)?;
    for (path, cam) in files.cam_files.iter().zip(calibration.cams.iter()) {
        let cam_back = read_cam_file(path)?;
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!(cam_back.extrinsic[i][j], cam.extrinsic[i][j], epsilon = 1e-15);
            }
        }
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(cam_back.intrinsic[i][j], cam.intrinsic[i][j], epsilon = 1e-12);
            }
        }
        assert_eq!(cam_back.depth_min, 1.0);
        assert_eq!(cam_back.depth_interval, 0.5);
    }

    // camera 15 sits at row 0, col 3
    let cam15 = read_cam_file(&files.cam_files[15])?;
    assert_eq!(cam15.extrinsic[0][3], 0.0);
    assert_relative_eq!(cam15.extrinsic[1][3], 0.9, epsilon = 1e-15);

    let pair_text = std::fs::read_to_string(&files.pair_file)?;
    assert_eq!(pair_text.lines().next(), Some("16"));
    assert_eq!(pair_text.lines().count(), 33);

    let lists = read_pair_file(&files.pair_file)?;
    assert_eq!(lists, calibration.neighbours);
    let corners = [0, 3, 12, 15];
    for list in &lists {
        let expected = if corners.contains(&list.camera_id) {
            2
        } else if [5, 6, 9, 10].contains(&list.camera_id) {
            4
        } else {
            3
        };
        assert_eq!(list.len(), expected, "camera {}", list.camera_id);
        assert!(list.neighbours.iter().all(|n| n.score == 1.0));
    }

    let settings = read_generation_settings(&files.settings_file)?;
    assert_eq!(settings, calibration.settings);
    assert_relative_eq!(settings.fovy, 60f64.to_radians());
    assert_relative_eq!(
        settings.disparity_numerator,
        0.3 * calibration.intrinsic.fy,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        deduce_fovx(settings.fovy, settings.image_width, settings.image_height).to_degrees(),
        91.49,
        epsilon = 0.01
    );

    Ok(())
}

#[test]
fn regenerate_overwrites_previous_output() -> Result<(), MvsPrepError> {
    let tmp_dir = tempfile::tempdir()?;

    let config = GenerationConfig {
        max_neighbours: 10,
        min_neighbour_score: 0.5,
        ..Default::default()
    };
    let files = generate_cams_dir(tmp_dir.path(), &config)?;
    let wide = read_pair_file(&files.pair_file)?;
    assert_eq!(wide[5].len(), 10);

    let files = generate_cams_dir(tmp_dir.path(), &GenerationConfig::default())?;
    let narrow = read_pair_file(&files.pair_file)?;
    assert_eq!(narrow[5].len(), 4);

    Ok(())
}
