//! PNG output encoder.
//!
//! Pure Rust PNG encoding using the `png` crate. The configured resolution is
//! recorded in the `pHYs` chunk so viewers and print pipelines pick up the
//! intended DPI.

use crate::error::Result;
use crate::framebuffer::Framebuffer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Metres per inch, for converting DPI to the pixels-per-metre PNG stores.
const METRES_PER_INCH: f64 = 0.0254;

/// PNG encoder for framebuffer output.
#[derive(Debug, Clone, Copy)]
pub struct PngEncoder {
    dpi: u32,
}

impl Default for PngEncoder {
    fn default() -> Self {
        Self::new(72)
    }
}

impl PngEncoder {
    /// Encoder that tags images with the given resolution.
    #[must_use]
    pub const fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    /// Resolution written into the image.
    #[must_use]
    pub const fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Pixels per metre for the `pHYs` chunk.
    #[must_use]
    pub fn pixels_per_metre(&self) -> u32 {
        (f64::from(self.dpi) / METRES_PER_INCH).round() as u32
    }

    /// Write a framebuffer to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, fb: &Framebuffer, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.encode(fb, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Encode a framebuffer to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_bytes(&self, fb: &Framebuffer) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.encode(fb, &mut buffer)?;
        Ok(buffer)
    }

    fn encode<W: Write>(&self, fb: &Framebuffer, out: W) -> Result<()> {
        let mut encoder = png::Encoder::new(out, fb.width(), fb.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let ppm = self.pixels_per_metre();
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&fb.to_compact_pixels())?;
        writer.finish()?;
        Ok(())
    }
}
