use serde::{Deserialize, Serialize};

use crate::core::image_encoding::DEFAULT_FRAME_DELAY_CENTISECONDS;

use super::{julia::JuliaParams, newtons_method::NewtonParams};

pub const DEFAULT_FRAME_COUNT: usize = 64;
pub const DEFAULT_WORKER_COUNT: usize = 4;
pub const DEFAULT_PARAMETER_PATH: &str = "Angor";

/// Constant term used when a single Julia set is requested without one.
pub const DEFAULT_CONSTANT_TERM: [f64; 2] = [-1.25, 0.0];

fn default_constant_term() -> [f64; 2] {
    DEFAULT_CONSTANT_TERM
}

fn default_frame_count() -> usize {
    DEFAULT_FRAME_COUNT
}

fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

fn default_parameter_path() -> String {
    DEFAULT_PARAMETER_PATH.to_owned()
}

fn default_frame_delay() -> u32 {
    DEFAULT_FRAME_DELAY_CENTISECONDS
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JuliaSingleParams {
    #[serde(default)]
    pub julia: JuliaParams,
    /// [re, im] of the constant term `c`.
    #[serde(default = "default_constant_term")]
    pub constant_term: [f64; 2],
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JuliaAnimationParams {
    #[serde(default)]
    pub julia: JuliaParams,
    #[serde(default = "default_frame_count")]
    pub frame_count: usize,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// One of `Angor`, `Exp`, `Wabbit`.
    #[serde(default = "default_parameter_path")]
    pub parameter_path: String,
    #[serde(default = "default_frame_delay")]
    pub frame_delay_centiseconds: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum FractalParams {
    Newton(Box<NewtonParams>),
    JuliaSingle(Box<JuliaSingleParams>),
    JuliaAnimation(Box<JuliaAnimationParams>),
}
