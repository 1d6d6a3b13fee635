// Serializes rasters to image containers: single frames as 16-bit PNG, animations as GIF.
// Palette quantization for GIF frames is left to the `image` crate.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use image::{
    codecs::gif::{GifEncoder, Repeat},
    Delay, DynamicImage, Frame, RgbaImage,
};

use crate::{
    core::{error::RenderError, image_utils::Raster},
    fractals::animation::AnimationSequence,
};

/// GIF frame delays are stored in hundredths of a second.
pub const DEFAULT_FRAME_DELAY_CENTISECONDS: u32 = 8;

/// Trades a little palette quality for much faster quantization of large frames.
const GIF_QUANTIZATION_SPEED: i32 = 10;

pub fn write_png(raster: &Raster, path: &Path) -> Result<(), RenderError> {
    raster.save(path)?;
    log::info!("Wrote image file to: {}", path.display());
    Ok(())
}

fn to_rgba8(raster: &Raster) -> RgbaImage {
    DynamicImage::ImageRgba16(raster.clone()).into_rgba8()
}

/// Encodes the frames in order, each shown for `delay_centiseconds`, looping forever.
pub fn encode_animated_gif<W: Write>(
    sequence: &AnimationSequence,
    writer: W,
    delay_centiseconds: u32,
) -> Result<(), RenderError> {
    let mut encoder = GifEncoder::new_with_speed(writer, GIF_QUANTIZATION_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;
    let delay = Delay::from_numer_denom_ms(10 * delay_centiseconds, 1);
    encoder.encode_frames(
        sequence
            .frames()
            .iter()
            .map(|raster| Frame::from_parts(to_rgba8(raster), 0, 0, delay)),
    )?;
    Ok(())
}

pub fn write_animated_gif(
    sequence: &AnimationSequence,
    path: &Path,
    delay_centiseconds: u32,
) -> Result<(), RenderError> {
    let mut writer = BufWriter::new(File::create(path)?);
    encode_animated_gif(sequence, &mut writer, delay_centiseconds)?;
    writer.flush()?;
    log::info!(
        "Wrote animation with {} frames to: {}",
        sequence.len(),
        path.display()
    );
    Ok(())
}
