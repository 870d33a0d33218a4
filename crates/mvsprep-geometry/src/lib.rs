#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Pinhole intrinsics, rig extrinsics and field-of-view helpers.
pub mod camera;

/// Disparity to depth conversion.
pub mod depth;

mod error;
pub use error::GeometryError;

/// Camera grid layout and per-camera grid positions.
pub mod grid;

/// Pairwise camera scores and neighbour selection.
pub mod proximity;
