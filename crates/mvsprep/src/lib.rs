#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use mvsprep_geometry as geometry;

#[doc(inline)]
pub use mvsprep_io as io;

/// Generation configuration.
pub mod config;

/// Disparity to depth conversion with stored generation settings.
pub mod depth;

mod error;
pub use error::MvsPrepError;

/// Camera directory generation.
pub mod pipeline;
