//! Renders Newton-basin and Julia-set fractals into 16-bit RGBA rasters, and animates
//! Julia sets along a path of constant terms using a bounded pool of frame workers.

pub mod cli;
pub mod core;
pub mod fractals;

pub use crate::core::{error::RenderError, image_utils::Raster};
pub use crate::fractals::{
    animation::{render_julia_animation, AnimationSequence},
    julia::render_julia_single,
    newtons_method::render_newton,
};
