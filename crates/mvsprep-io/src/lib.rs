#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Per-camera calibration files (`00000000_cam.txt`).
pub mod cam_file;

/// Neighbour view selection file (`pair.txt`).
pub mod pair;

/// Portable float map (PFM) depth files.
pub mod pfm;

/// Generation settings sidecar (`generation_settings.json`).
pub mod settings;

mod text;
