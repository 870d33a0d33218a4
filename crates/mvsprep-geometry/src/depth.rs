use crate::GeometryError;

/// Numerator of the disparity to depth relation `depth = numerator / disparity`.
///
/// It is the baseline times the focal length in pixels, the focal length
/// being deduced from the image height and the vertical field of view.
///
/// # Arguments
///
/// * `baseline` - The distance between two adjacent cameras.
/// * `image_height` - The image height in pixels.
/// * `fovy` - The vertical field of view in radians.
pub fn disparity_numerator(baseline: f64, image_height: u32, fovy: f64) -> f64 {
    (baseline * image_height as f64) / (2.0 * (fovy / 2.0).tan())
}

/// Convert a disparity in pixels to a depth in baseline units.
///
/// # Errors
///
/// Fails if the disparity is not a positive finite value.
pub fn disparity_to_depth(numerator: f64, disparity: f64) -> Result<f64, GeometryError> {
    check_disparity(0, disparity)?;
    Ok(numerator / disparity)
}

/// Convert a disparity map to a depth map, element-wise.
///
/// # Errors
///
/// Fails on the first disparity that is not a positive finite value.
pub fn disparity_map_to_depth(numerator: f64, disparity: &[f32]) -> Result<Vec<f32>, GeometryError> {
    disparity
        .iter()
        .enumerate()
        .map(|(index, &d)| {
            check_disparity(index, d as f64)?;
            Ok((numerator / d as f64) as f32)
        })
        .collect()
}

/// Decode a disparity packed into the four 8-bit channels of a pixel.
///
/// The dataset stores disparities as RGBA PNG, red holding the integer part
/// and the following channels the successive base-256 fractional digits,
/// all scaled by `1 / 32`.
pub fn unpack_disparity(rgba: [u8; 4]) -> f64 {
    let [r, g, b, a] = rgba.map(f64::from);
    32.0 * (r + g / 256.0 + b / (256.0 * 256.0) + a / (256.0 * 256.0 * 256.0))
}

fn check_disparity(index: usize, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidDisparity { index, value })
    }
}
