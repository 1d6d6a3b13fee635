use num::complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::core::{
    color_map::{ColorMapper, JuliaColorMap, DEFAULT_CONTRAST},
    image_utils::{generate_raster, generate_raster_parallel, ImageSpecification, Raster},
};

pub const DEFAULT_MAX_ITER_COUNT: u32 = 400;
pub const DEFAULT_ESCAPE_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JuliaResult {
    /// The modulus first exceeded the escape radius after this many updates (always >= 1).
    Escaped(u32),
    /// The orbit stayed inside the escape radius for the whole iteration budget.
    Bounded,
}

/**
 * Data structure for storing the internal state of the Julia sequence calculation.
 * Highly optimized version of the equation to reduce floating point operation count.
 */
pub struct JuliaSequence {
    pub x0: f64,
    pub y0: f64,
    pub x: f64,
    pub y: f64,
    pub x_sqr: f64,
    pub y_sqr: f64,
    pub iter_count: u32,
}

impl JuliaSequence {
    /// point:  initial value for "Z"
    /// constant_term:  the parameter "C"
    fn new(point: Complex64, constant_term: Complex64) -> JuliaSequence {
        JuliaSequence {
            x0: constant_term.re,
            y0: constant_term.im,
            x: point.re,
            y: point.im,
            x_sqr: point.re * point.re,
            y_sqr: point.im * point.im,
            iter_count: 0,
        }
    }

    fn radius_squared(&self) -> f64 {
        self.x_sqr + self.y_sqr
    }

    // Z = Z*Z + C
    fn step(&mut self) {
        self.y = (self.x + self.x) * self.y + self.y0;
        self.x = self.x_sqr - self.y_sqr + self.x0;
        self.x_sqr = self.x * self.x;
        self.y_sqr = self.y * self.y;
        self.iter_count += 1;
    }

    // @return: the number of updates after which the radius first exceeded the limit, if any.
    fn step_until_escape(&mut self, max_iter_count: u32, max_radius_squared: f64) -> Option<u32> {
        while self.iter_count < max_iter_count {
            self.step();
            if self.radius_squared() > max_radius_squared {
                return Some(self.iter_count);
            }
        }
        None
    }
}

/// Iterates z -> z^2 + c from `z` until the modulus exceeds `escape_radius` or the budget is spent.
pub fn julia_kernel(
    z: Complex64,
    c: Complex64,
    max_iter_count: u32,
    escape_radius: f64,
) -> JuliaResult {
    let mut sequence = JuliaSequence::new(z, c);
    match sequence.step_until_escape(max_iter_count, escape_radius * escape_radius) {
        Some(count) => JuliaResult::Escaped(count),
        None => JuliaResult::Bounded,
    }
}

fn default_max_iter_count() -> u32 {
    DEFAULT_MAX_ITER_COUNT
}

fn default_escape_radius() -> f64 {
    DEFAULT_ESCAPE_RADIUS
}

fn default_contrast() -> u32 {
    DEFAULT_CONTRAST
}

/// Everything needed to render one Julia frame, apart from the constant term.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JuliaParams {
    #[serde(default)]
    pub image_specification: ImageSpecification,
    #[serde(default = "default_max_iter_count")]
    pub max_iter_count: u32,
    #[serde(default = "default_escape_radius")]
    pub escape_radius: f64,
    #[serde(default = "default_contrast")]
    pub contrast: u32,
}

impl Default for JuliaParams {
    fn default() -> Self {
        JuliaParams {
            image_specification: ImageSpecification::default(),
            max_iter_count: DEFAULT_MAX_ITER_COUNT,
            escape_radius: DEFAULT_ESCAPE_RADIUS,
            contrast: DEFAULT_CONTRAST,
        }
    }
}

impl JuliaParams {
    fn pixel_renderer(&self, constant_term: Complex64) -> impl Fn(Complex64) -> image::Rgba<u16> + Sync {
        let color_map = JuliaColorMap {
            contrast: self.contrast,
        };
        let max_iter_count = self.max_iter_count;
        let escape_radius = self.escape_radius;
        move |z: Complex64| {
            color_map.compute_pixel(julia_kernel(z, constant_term, max_iter_count, escape_radius))
        }
    }
}

/// Renders one frame on the calling thread. This is the unit of work of the frame pipeline.
pub fn render_julia_frame(params: &JuliaParams, constant_term: Complex64) -> Raster {
    generate_raster(&params.image_specification, params.pixel_renderer(constant_term))
}

/// Renders a single Julia set, spreading rows across the rayon thread pool.
pub fn render_julia_single(params: &JuliaParams, constant_term: Complex64) -> Raster {
    generate_raster_parallel(&params.image_specification, params.pixel_renderer(constant_term))
}
