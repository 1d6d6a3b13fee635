use image::{ImageBuffer, Rgba};
use num::complex::Complex64;
use rayon::{iter::IndexedParallelIterator, iter::ParallelIterator, slice::ParallelSliceMut};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A fully rendered frame: 16-bit RGBA, one entry per pixel of the sampling window.
pub type Raster = ImageBuffer<Rgba<u16>, Vec<u16>>;

const CHANNEL_COUNT: usize = 4;

/**
 * Used to fully-specify both an image resolution and how it is anchored into the complex
 * plane in which the fractal lives. The height in "real" space is derived from the aspect
 * ratio of the image and the specified width.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ImageSpecification {
    pub resolution: nalgebra::Vector2<u32>,
    pub center: nalgebra::Vector2<f64>,
    pub width: f64,
}

impl Default for ImageSpecification {
    /// The reference sampling window: [-2,2] x [-2,2] at 1024 x 1024 pixels.
    fn default() -> Self {
        ImageSpecification {
            resolution: nalgebra::Vector2::new(1024, 1024),
            center: nalgebra::Vector2::new(0.0, 0.0),
            width: 4.0,
        }
    }
}

impl ImageSpecification {
    pub fn height(&self) -> f64 {
        self.width * (self.resolution[1] as f64) / (self.resolution[0] as f64)
    }

    /// Square window spanning `[lower, upper]` on both axes.
    pub fn square(resolution: u32, lower: f64, upper: f64) -> ImageSpecification {
        let mid = 0.5 * (lower + upper);
        ImageSpecification {
            resolution: nalgebra::Vector2::new(resolution, resolution),
            center: nalgebra::Vector2::new(mid, mid),
            width: upper - lower,
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.resolution[0] as usize) * (self.resolution[1] as usize)
    }
}

#[derive(Clone, Debug)]
/**
 * Used to map from image space into the complex plane used to generate the fractals.
 * Pixel `i` maps to the leading edge of its cell, so `n` pixels tile `[x0, x1)`.
 */
pub struct LinearPixelMap {
    offset: f64,
    span: f64,
    count: f64,
}

impl LinearPixelMap {
    /**
     * @param n: number of pixels spanned by [x0,x1)
     * @param x0: output of the map at 0
     * @param x1: output of the map at n (one past the last pixel)
     */
    pub fn new(n: u32, x0: f64, x1: f64) -> LinearPixelMap {
        assert!(n > 0);
        LinearPixelMap {
            offset: x0,
            span: x1 - x0,
            count: n as f64,
        }
    }

    pub fn new_from_center_and_width(n: u32, center: f64, width: f64) -> LinearPixelMap {
        LinearPixelMap::new(n, center - 0.5 * width, center + 0.5 * width)
    }

    // Map from pixel (integer) to point (float)
    pub fn map(&self, index: u32) -> f64 {
        (index as f64) / self.count * self.span + self.offset
    }
}

#[derive(Clone, Debug)]
pub struct PixelMapper {
    width: LinearPixelMap,
    height: LinearPixelMap,
}

impl PixelMapper {
    pub fn new(image_specification: &ImageSpecification) -> PixelMapper {
        PixelMapper {
            width: LinearPixelMap::new_from_center_and_width(
                image_specification.resolution[0],
                image_specification.center[0],
                image_specification.width,
            ),
            height: LinearPixelMap::new_from_center_and_width(
                image_specification.resolution[1],
                image_specification.center[1],
                image_specification.height(),
            ),
        }
    }

    pub fn map(&self, pixel: &(u32, u32)) -> Complex64 {
        let (x, y) = pixel;
        Complex64::new(self.width.map(*x), self.height.map(*y))
    }
}

/**
 * Given image size parameters and a mapping into the complex plane, iterate over each pixel,
 * using a lambda function to compute the color of the fractal image at each pixel location.
 *
 * Runs on the calling thread only. The frame pipeline relies on this so that the number of
 * busy threads is bounded by its worker count.
 */
pub fn generate_raster<F>(spec: &ImageSpecification, pixel_renderer: F) -> Raster
where
    F: Fn(Complex64) -> Rgba<u16>,
{
    let pixel_mapper = PixelMapper::new(spec);
    let mut raster = Raster::new(spec.resolution[0], spec.resolution[1]);
    for (x, y, pixel) in raster.enumerate_pixels_mut() {
        *pixel = pixel_renderer(pixel_mapper.map(&(x, y)));
    }
    raster
}

/**
 * Row-parallel version of the above function, used for one-off rasters. The output is
 * identical to `generate_raster` for the same inputs.
 */
pub fn generate_raster_parallel<F>(spec: &ImageSpecification, pixel_renderer: F) -> Raster
where
    F: Fn(Complex64) -> Rgba<u16> + std::marker::Sync,
{
    let pixel_mapper = PixelMapper::new(spec);
    let mut raster = Raster::new(spec.resolution[0], spec.resolution[1]);
    let row_length = CHANNEL_COUNT * spec.resolution[0] as usize;
    raster
        .par_chunks_mut(row_length)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.chunks_exact_mut(CHANNEL_COUNT).enumerate() {
                let color = pixel_renderer(pixel_mapper.map(&(x as u32, y as u32)));
                pixel.copy_from_slice(&color.0);
            }
        });
    raster
}

/// SHA-256 of the raw channel data, used to compare renders and reported in diagnostics.
pub fn raster_digest(raster: &Raster) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raster.width().to_le_bytes());
    hasher.update(raster.height().to_le_bytes());
    for channel in raster.iter() {
        hasher.update(channel.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}
