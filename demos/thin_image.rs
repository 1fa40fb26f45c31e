//! Thin a black-and-white image file and write its skeleton as a PNG.
//!
//! `cargo run --example thin_image --features piston_image -- input.png skeleton.png`

use std::time::Instant;
use lut_thinning::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let mut arguments = std::env::args().skip(1);
    let input = arguments.next().unwrap_or_else(|| "images/mask.png".to_string());
    let output = arguments.next().unwrap_or_else(|| "images/mask_skeleton.png".to_string());

    let mut gray_image = image::open(&input)?.to_luma8();

    // binarize, since decoders may produce intermediate values at anti-aliased edges
    for pixel in gray_image.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > 127 { 255 } else { 0 };
    }

    let binary_image = binary_piston_image::of_gray_u8_image(&gray_image)?;

    let start = Instant::now();
    let skeleton = thin(&binary_image);
    let elapsed = start.elapsed();

    tracing::info!(
        input = %input,
        width = skeleton.width,
        height = skeleton.height,
        iterations = skeleton.stats.iterations,
        remaining_pixels = skeleton.foreground_count(),
        "thinned image in {:?}", elapsed
    );

    skeleton.to_gray_u8_image().save(&output)?;
    tracing::info!(output = %output, "saved skeleton");

    Ok(())
}
