// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canvas persistence — PNG encoding with physical resolution metadata.
//
// The `image` crate's PNG encoder has no knob for the pHYs chunk, so encoding
// goes through the `png` crate directly. DPI is metadata only.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::RgbImage;
use ocrsim_core::error::{Result, SimError};
use tracing::{debug, instrument};

const METRES_PER_INCH: f64 = 0.0254;

/// Encode `canvas` as PNG bytes tagged with `dpi`.
pub fn encode_png(canvas: &RgbImage, dpi: u32) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_png(&mut buffer, canvas, dpi)?;
    Ok(buffer)
}

/// Write `canvas` to `path` as a PNG tagged with `dpi`.
///
/// Failing to create the file is an I/O error; failing to encode is an image
/// error.
#[instrument(skip(canvas), fields(path = %path.as_ref().display(), width = canvas.width(), height = canvas.height()))]
pub fn save_png(canvas: &RgbImage, path: impl AsRef<Path>, dpi: u32) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_png(&mut writer, canvas, dpi)?;
    writer.flush()?;
    debug!("Canvas saved");
    Ok(())
}

/// Read the resolution recorded in a PNG, if any.
pub fn read_png_dpi(bytes: &[u8]) -> Result<Option<u32>> {
    let decoder = png::Decoder::new(bytes);
    let reader = decoder
        .read_info()
        .map_err(|err| SimError::ImageError(format!("failed to read PNG header: {}", err)))?;
    Ok(reader.info().pixel_dims.and_then(|dims| match dims.unit {
        png::Unit::Meter => Some((f64::from(dims.xppu) * METRES_PER_INCH).round() as u32),
        png::Unit::Unspecified => None,
    }))
}

fn write_png<W: Write>(sink: W, canvas: &RgbImage, dpi: u32) -> Result<()> {
    let (width, height) = canvas.dimensions();
    let pixels_per_metre = (f64::from(dpi) / METRES_PER_INCH).round() as u32;

    let mut encoder = png::Encoder::new(sink, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: pixels_per_metre,
        yppu: pixels_per_metre,
        unit: png::Unit::Meter,
    }));

    let mut png_writer = encoder
        .write_header()
        .map_err(|err| SimError::ImageError(format!("PNG header encoding failed: {}", err)))?;
    png_writer
        .write_image_data(canvas.as_raw())
        .map_err(|err| SimError::ImageError(format!("PNG encoding failed: {}", err)))?;
    png_writer
        .finish()
        .map_err(|err| SimError::ImageError(format!("PNG finalisation failed: {}", err)))?;
    Ok(())
}
