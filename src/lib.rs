//! This crate reduces the shapes of a binary image
//! to their one-pixel-wide skeleton, preserving connectivity.
//! Pixels are removed layer by layer in two alternating subpasses,
//! one for orthogonal and one for diagonal borders, and each decision
//! is a single lookup in a table of all 256 neighborhood configurations.

pub mod binary_image;
pub mod error;
pub mod lookup_table;
pub mod skeleton;

pub mod prelude {
    pub use crate::{
        thin,
        thin_with_config,
        thin_bytes
    };

    pub use crate::binary_image::{
        BinaryImage, BinaryByteImage
    };

    pub use crate::skeleton::{
        Skeleton, ThinningConfig, ThinningStats
    };

    pub use crate::error::ThinningError;

    #[cfg(feature = "piston_image")]
    pub use crate::binary_image::piston_image as binary_piston_image;
}


use prelude::*;
use error::Result;

/// Compute the skeleton of the specified binary image.
pub fn thin(image: &impl BinaryImage) -> Skeleton {
    Skeleton::compute(image)
}

/// Compute the skeleton of the specified binary image with custom options.
pub fn thin_with_config(image: &impl BinaryImage, config: &ThinningConfig) -> Result<Skeleton> {
    Skeleton::compute_with_config(image, config)
}

/// Compute the skeleton of a row-major byte buffer with 0 as background and 255 as foreground.
/// Returns a buffer of the same size and value domain.
pub fn thin_bytes(width: usize, height: usize, buffer: &[u8]) -> Result<Vec<u8>> {
    let image = BinaryByteImage::from_slice(width, height, buffer)?;
    Ok(thin(&image).into_pixels())
}
