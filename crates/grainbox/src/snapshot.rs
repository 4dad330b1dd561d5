//! PNG snapshots of the world's color buffer

use std::path::Path;

use anyhow::{Context, Result};
use grainbox_core::world::World;
use image::{ImageBuffer, RgbImage};

/// Render the world as an image, each cell `scale` x `scale` pixels
pub fn render(world: &World, scale: u32) -> Result<RgbImage> {
    anyhow::ensure!(scale > 0, "Snapshot scale must be at least 1");

    let width = u32::try_from(world.width()).context("World too wide for an image")?;
    let height = u32::try_from(world.height()).context("World too tall for an image")?;

    let img: RgbImage = ImageBuffer::from_raw(width, height, world.export_color_buffer())
        .context("Failed to create image buffer from world colors")?;

    if scale == 1 {
        return Ok(img);
    }

    let scaled_width = width
        .checked_mul(scale)
        .context("Scaled snapshot width overflows")?;
    let scaled_height = height
        .checked_mul(scale)
        .context("Scaled snapshot height overflows")?;

    // Nearest neighbor: every cell becomes a solid block
    Ok(ImageBuffer::from_fn(scaled_width, scaled_height, |x, y| {
        *img.get_pixel(x / scale, y / scale)
    }))
}

/// Write the world to `path` as an RGB PNG
pub fn save_png(world: &World, path: impl AsRef<Path>, scale: u32) -> Result<()> {
    let path = path.as_ref();
    let img = render(world, scale)?;

    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to save snapshot to {}", path.display()))?;

    log::info!(
        "Snapshot saved: {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(())
}
