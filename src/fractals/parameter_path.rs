//! Named paths through parameter space, giving the constant term `c` of each animation frame.

use std::{f64::consts::PI, fmt, str::FromStr};

use num::complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::core::error::RenderError;

const ANGOR_START: f64 = -1.45;
const ANGOR_WIDTH: f64 = 0.2;

const WABBIT_CENTER: Complex64 = Complex64::new(0.3887, -0.2158);
const WABBIT_WIDTH: f64 = 0.06;

const EXP_RADIUS: f64 = 0.7885;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterPath {
    /// Real axis from -1.45 up to -1.25 (edge of the Mandelbrot set) and back again.
    Angor,
    /// Diagonal excursion of width 0.06 from 0.3887 - 0.2158i, out and back.
    Wabbit,
    /// One full turn around the circle of radius 0.7885.
    Exp,
}

/// Immutable name lookup for every known path.
pub const PARAMETER_PATHS: [(&str, ParameterPath); 3] = [
    ("Angor", ParameterPath::Angor),
    ("Exp", ParameterPath::Exp),
    ("Wabbit", ParameterPath::Wabbit),
];

impl ParameterPath {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterPath::Angor => "Angor",
            ParameterPath::Wabbit => "Wabbit",
            ParameterPath::Exp => "Exp",
        }
    }

    /// The constant term used for frame `frame_index` of an animation with `total_frames` frames.
    pub fn parameter(&self, frame_index: usize, total_frames: usize) -> Complex64 {
        match self {
            ParameterPath::Angor => {
                let alpha = triangle_wave(frame_index, total_frames, ANGOR_WIDTH);
                Complex64::new(ANGOR_START + alpha, 0.0)
            }
            ParameterPath::Wabbit => {
                let alpha = triangle_wave(frame_index, total_frames, WABBIT_WIDTH);
                Complex64::new(WABBIT_CENTER.re + alpha, WABBIT_CENTER.im + alpha)
            }
            ParameterPath::Exp => {
                let angle = (frame_index as f64) * 2.0 * PI / (total_frames as f64);
                Complex64::from_polar(EXP_RADIUS, angle)
            }
        }
    }
}

/**
 * Rises linearly from 0 to `width` over the first half of the frames, then falls back.
 * Fewer than two frames leave no room for a rise, so the offset stays at zero.
 */
fn triangle_wave(frame_index: usize, total_frames: usize, width: f64) -> f64 {
    let half_frames = total_frames / 2;
    if half_frames == 0 {
        return 0.0;
    }
    let delta = width / (half_frames as f64);
    if frame_index < half_frames {
        (frame_index as f64) * delta
    } else {
        width - ((frame_index - half_frames) as f64) * delta
    }
}

impl FromStr for ParameterPath {
    type Err = RenderError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        PARAMETER_PATHS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, path)| *path)
            .ok_or_else(|| RenderError::InvalidPathName(name.to_owned()))
    }
}

impl fmt::Display for ParameterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_close(a: Complex64, b: Complex64) {
        assert_relative_eq!(a.re, b.re, epsilon = 1e-12);
        assert_relative_eq!(a.im, b.im, epsilon = 1e-12);
    }

    #[test]
    fn test_lookup_by_name() {
        for (name, path) in PARAMETER_PATHS {
            assert_eq!(name.parse::<ParameterPath>().unwrap(), path);
            assert_eq!(path.name(), name);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        for name in ["", "angor", "Spiral", "Exp "] {
            match name.parse::<ParameterPath>() {
                Err(RenderError::InvalidPathName(bad)) => assert_eq!(bad, name),
                other => panic!("expected InvalidPathName, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_angor_endpoints() {
        let n = 64;
        assert_close(ParameterPath::Angor.parameter(0, n), Complex64::new(-1.45, 0.0));
        assert_close(ParameterPath::Angor.parameter(32, n), Complex64::new(-1.25, 0.0));
        assert_close(ParameterPath::Angor.parameter(16, n), Complex64::new(-1.35, 0.0));
        for i in 0..n {
            assert_eq!(ParameterPath::Angor.parameter(i, n).im, 0.0);
        }
    }

    #[test]
    fn test_wabbit_moves_diagonally() {
        let n = 20;
        for i in 0..n {
            let offset = ParameterPath::Wabbit.parameter(i, n) - WABBIT_CENTER;
            assert_relative_eq!(offset.re, offset.im, epsilon = 1e-12);
        }
        let peak = ParameterPath::Wabbit.parameter(10, n) - WABBIT_CENTER;
        assert_relative_eq!(peak.re, 0.06, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_paths_are_symmetric() {
        for n in [2, 8, 64, 100] {
            for path in [ParameterPath::Angor, ParameterPath::Wabbit] {
                for i in n / 2..n {
                    assert_close(path.parameter(i, n), path.parameter(n - i, n));
                }
            }
        }
    }

    #[test]
    fn test_exp_closes_the_circle() {
        for n in [1, 7, 64] {
            assert_close(
                ParameterPath::Exp.parameter(0, n),
                ParameterPath::Exp.parameter(n, n),
            );
        }
        assert_close(ParameterPath::Exp.parameter(0, 64), Complex64::new(0.7885, 0.0));
        assert_close(ParameterPath::Exp.parameter(16, 64), Complex64::new(0.0, 0.7885));
    }

    #[test]
    fn test_exp_has_constant_radius() {
        for i in 0..64 {
            assert_relative_eq!(ParameterPath::Exp.parameter(i, 64).norm(), 0.7885, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_single_frame_paths_are_finite() {
        for (_, path) in PARAMETER_PATHS {
            let c = path.parameter(0, 1);
            assert!(c.is_finite());
        }
        assert_close(ParameterPath::Angor.parameter(0, 1), Complex64::new(-1.45, 0.0));
    }
}
