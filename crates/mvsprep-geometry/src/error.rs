/// Error types for the geometry module.
///
/// Every variant is a configuration error: the generation run must stop
/// before any file is written.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeometryError {
    /// The camera grid has no cells.
    #[error("Camera grid is empty")]
    EmptyGrid,

    /// The rows of the camera grid do not have the same length.
    #[error("Camera grid row {row} has {len} columns, expected {expected}")]
    RaggedGrid {
        /// Index of the offending row.
        row: usize,
        /// Number of columns in the offending row.
        len: usize,
        /// Number of columns of the first row.
        expected: usize,
    },

    /// A camera id is not in `[0, num_cameras)`.
    #[error("Invalid camera index {id} at position ({row}, {col}), expected a value in [0, {num_cameras})")]
    CameraIdOutOfRange {
        /// The offending camera id.
        id: u32,
        /// Grid row of the offending cell.
        row: usize,
        /// Grid column of the offending cell.
        col: usize,
        /// Number of cells in the grid.
        num_cameras: usize,
    },

    /// A camera id appears more than once in the grid.
    #[error("Duplicate camera index {id} at position ({row}, {col})")]
    DuplicateCameraId {
        /// The duplicated camera id.
        id: u32,
        /// Grid row of the second occurrence.
        row: usize,
        /// Grid column of the second occurrence.
        col: usize,
    },

    /// The image size has a zero dimension.
    #[error("Invalid image size {width}x{height}")]
    InvalidImageSize {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// The vertical field of view is not in `(0, pi)`.
    #[error("Invalid vertical field of view {0} rad, expected a value in (0, pi)")]
    InvalidFieldOfView(f64),

    /// The baseline is not strictly positive.
    #[error("Invalid baseline {0}, expected a positive value")]
    InvalidBaseline(f64),

    /// A depth parameter is not finite.
    #[error("Invalid depth parameter {name}: {value}")]
    InvalidDepthParameter {
        /// Name of the parameter.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The minimum neighbour score is not finite.
    #[error("Invalid minimum neighbour score {0}, expected a finite value")]
    InvalidNeighbourScore(f64),

    /// A disparity cannot be converted to a depth.
    #[error("Invalid disparity {value} at index {index}, expected a positive value")]
    InvalidDisparity {
        /// Index of the offending disparity.
        index: usize,
        /// The offending value.
        value: f64,
    },
}
