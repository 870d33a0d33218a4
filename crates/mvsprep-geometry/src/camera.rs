use crate::GeometryError;

/// Represents the intrinsic parameters of a pinhole camera
///
/// # Fields
///
/// * `fx` - The focal length in the x direction
/// * `fy` - The focal length in the y direction
/// * `cx` - The x coordinate of the principal point
/// * `cy` - The y coordinate of the principal point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsic {
    /// The focal length in the x direction
    pub fx: f64,
    /// The focal length in the y direction
    pub fy: f64,
    /// The x coordinate of the principal point
    pub cx: f64,
    /// The y coordinate of the principal point
    pub cy: f64,
}

impl CameraIntrinsic {
    /// The 3x3 camera matrix `K`.
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.fx, 0.0, self.cx],
            [0.0, self.fy, self.cy],
            [0.0, 0.0, 1.0],
        ]
    }
}

/// Represents the extrinsic parameters of a pinhole camera
///
/// # Fields
///
/// * `rotation` - The rotation matrix of the camera 3x3
/// * `translation` - The translation vector of the camera 3x1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraExtrinsic {
    /// The rotation matrix of the camera 3x3
    pub rotation: [[f64; 3]; 3],
    /// The translation vector of the camera 3x1
    pub translation: [f64; 3],
}

impl CameraExtrinsic {
    /// The 4x4 homogeneous matrix `[R | t]`.
    pub fn matrix(&self) -> [[f64; 4]; 4] {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in self.rotation.iter().enumerate() {
            m[i][..3].copy_from_slice(row);
            m[i][3] = self.translation[i];
        }
        m[3][3] = 1.0;
        m
    }
}

/// Deduce the focal length from the captor height and the vertical field of view.
pub fn focal_length_from_fovy(captor_height: f64, fovy: f64) -> f64 {
    captor_height / (2.0 * (fovy / 2.0).tan())
}

/// Deduce the captor height from the focal length and the vertical field of view.
pub fn captor_height_from_focal(focal_length: f64, fovy: f64) -> f64 {
    focal_length * (2.0 * (fovy / 2.0).tan())
}

/// Deduce the horizontal field of view in radians.
///
/// # Arguments
///
/// * `fovy` - The vertical field of view in radians.
/// * `width` - The image width in pixels.
/// * `height` - The image height in pixels.
pub fn deduce_fovx(fovy: f64, width: u32, height: u32) -> f64 {
    let aspect_ratio = width as f64 / height as f64;
    2.0 * ((fovy / 2.0).tan() * aspect_ratio).atan()
}

/// Check the optical parameters before building an intrinsic matrix.
///
/// # Errors
///
/// Fails when a dimension is zero or when `fovy` is not in `(0, pi)`.
pub fn validate_optics(width: u32, height: u32, fovy: f64) -> Result<(), GeometryError> {
    if width == 0 || height == 0 {
        return Err(GeometryError::InvalidImageSize { width, height });
    }

    if !(fovy > 0.0 && fovy < std::f64::consts::PI) {
        return Err(GeometryError::InvalidFieldOfView(fovy));
    }

    Ok(())
}

/// Build the pinhole intrinsics shared by every camera of the rig.
///
/// The captor is measured in pixels: its height is the image height, so the
/// focal length is expressed in pixels too and the pixel scale is one.
///
/// # Arguments
///
/// * `width` - The image width in pixels.
/// * `height` - The image height in pixels, must be positive.
/// * `fovy` - The vertical field of view in radians.
pub fn build_intrinsic(width: u32, height: u32, fovy: f64) -> CameraIntrinsic {
    let (width, height) = (width as f64, height as f64);

    let captor_height = height;
    let captor_width = width;
    let focal_length = focal_length_from_fovy(captor_height, fovy);

    // pixels per captor unit
    let scale = width / captor_width;

    CameraIntrinsic {
        fx: scale * focal_length,
        fy: scale * focal_length,
        cx: width / 2.0,
        cy: height / 2.0,
    }
}

/// Build the pose of the camera at `(row, col)`.
///
/// World frame: origin at the camera of cell `(0, 0)`, `+X` follows `+row`,
/// `+Y` follows `+col`. Cameras share their orientation and lie in the
/// `Z = 0` plane.
///
/// # Arguments
///
/// * `row` - The grid row of the camera.
/// * `col` - The grid column of the camera.
/// * `baseline` - The distance between two adjacent cameras.
pub fn build_extrinsic(row: usize, col: usize, baseline: f64) -> CameraExtrinsic {
    CameraExtrinsic {
        rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        translation: [baseline * row as f64, baseline * col as f64, 0.0],
    }
}
