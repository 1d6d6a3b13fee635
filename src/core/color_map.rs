use image::Rgba;

use crate::fractals::{
    julia::JuliaResult,
    newtons_method::{NewtonResult, RootOfUnity},
};

/// Largest value written into a color channel by either color map.
pub const BRIGHTNESS_CEILING: u16 = 60_000;

/// Every rendered pixel is fully opaque.
pub const OPAQUE: u16 = u16::MAX;

pub const DEFAULT_CONTRAST: u32 = 2000;

pub const BLACK: Rgba<u16> = Rgba([0, 0, 0, OPAQUE]);

/// Maps the classification of a single point into a pixel color.
pub trait ColorMapper<R> {
    fn compute_pixel(&self, result: R) -> Rgba<u16>;
}

/// Brightness of a channel after `steps` iterations: `ceiling - contrast * steps`, floored at zero.
fn attenuated(contrast: u32, steps: u32) -> u16 {
    let drop = (contrast as u64) * (steps as u64);
    (BRIGHTNESS_CEILING as u64).saturating_sub(drop) as u16
}

/// Rising channel value: `contrast * steps`, saturated at the channel maximum.
fn amplified(contrast: u32, steps: u32) -> u16 {
    let rise = (contrast as u64) * (steps as u64);
    rise.min(u16::MAX as u64) as u16
}

/**
 * Colors each basin of attraction of z^4 - 1 with its own hue:
 *   1 -> red, -1 -> blue, i -> green, -i -> purple.
 * Points that converge quickly are bright; points that do not converge are black.
 */
#[derive(Clone, Copy, Debug)]
pub struct NewtonColorMap {
    pub contrast: u32,
}

impl Default for NewtonColorMap {
    fn default() -> Self {
        NewtonColorMap {
            contrast: DEFAULT_CONTRAST,
        }
    }
}

impl ColorMapper<NewtonResult> for NewtonColorMap {
    fn compute_pixel(&self, result: NewtonResult) -> Rgba<u16> {
        match result {
            NewtonResult::Converged { root, iteration } => {
                let v = attenuated(self.contrast, iteration);
                match root {
                    RootOfUnity::One => Rgba([v, 0, 0, OPAQUE]),
                    RootOfUnity::MinusOne => Rgba([0, 0, v, OPAQUE]),
                    RootOfUnity::I => Rgba([0, v, 0, OPAQUE]),
                    RootOfUnity::MinusI => Rgba([v, 0, v, OPAQUE]),
                }
            }
            NewtonResult::Unconverged | NewtonResult::Singular => BLACK,
        }
    }
}

/// Two channel ramp for Julia sets: green rises and blue falls with the escape count.
#[derive(Clone, Copy, Debug)]
pub struct JuliaColorMap {
    pub contrast: u32,
}

impl Default for JuliaColorMap {
    fn default() -> Self {
        JuliaColorMap {
            contrast: DEFAULT_CONTRAST,
        }
    }
}

impl ColorMapper<JuliaResult> for JuliaColorMap {
    fn compute_pixel(&self, result: JuliaResult) -> Rgba<u16> {
        match result {
            JuliaResult::Escaped(count) => Rgba([
                0,
                amplified(self.contrast, count),
                attenuated(self.contrast, count),
                OPAQUE,
            ]),
            JuliaResult::Bounded => BLACK,
        }
    }
}
