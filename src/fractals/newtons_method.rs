// Newton's method applied to p(z) = z^4 - 1, whose roots are the fourth roots of unity.
// Each point of the plane is used as an initial guess and colored by the root it reaches.

#[cfg(test)]
use nalgebra::Matrix2;
use num::complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::core::{
    color_map::{ColorMapper, NewtonColorMap, DEFAULT_CONTRAST},
    image_utils::{generate_raster_parallel, ImageSpecification, Raster},
};

pub const DEFAULT_MAX_ITERATIONS: u32 = 400;
pub const DEFAULT_CONVERGENCE_TOLERANCE: f64 = 1e-16;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootOfUnity {
    One,
    MinusOne,
    I,
    MinusI,
}

impl RootOfUnity {
    /// Roots in the order in which convergence is tested. The first match wins.
    pub const SEARCH_ORDER: [RootOfUnity; 4] = [
        RootOfUnity::One,
        RootOfUnity::MinusOne,
        RootOfUnity::I,
        RootOfUnity::MinusI,
    ];

    pub fn value(&self) -> Complex64 {
        match self {
            RootOfUnity::One => Complex64::new(1.0, 0.0),
            RootOfUnity::MinusOne => Complex64::new(-1.0, 0.0),
            RootOfUnity::I => Complex64::new(0.0, 1.0),
            RootOfUnity::MinusI => Complex64::new(0.0, -1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewtonResult {
    /// `iteration` is the 0-based index of the update after which `root` was within tolerance.
    Converged { root: RootOfUnity, iteration: u32 },
    /// No root was reached within the iteration budget.
    Unconverged,
    /// The iterate hit zero or left the finite numbers, where the update is undefined.
    Singular,
}

/// A complex-valued function with its derivative (slope).
pub trait ComplexFunctionWithSlope {
    /// f(z)
    fn value(&self, z: Complex64) -> Complex64;

    /// f'(z)
    fn slope(&self, z: Complex64) -> Complex64;
}

/// Perform one modified Newton–Raphson step:
/// y = z - alpha * f(z) / f'(z)
#[inline]
pub fn modified_newton_raphson_step<F>(z: Complex64, alpha: f64, function: &F) -> Complex64
where
    F: ComplexFunctionWithSlope,
{
    let q = function.value(z) / function.slope(z);
    z - q.scale(alpha)
}

/// f(z) = z^4 - 1, f'(z) = 4 z^3
pub struct FourthRootsOfUnity;

impl ComplexFunctionWithSlope for FourthRootsOfUnity {
    #[inline]
    fn value(&self, z: Complex64) -> Complex64 {
        z * z * z * z - 1.0
    }
    #[inline]
    fn slope(&self, z: Complex64) -> Complex64 {
        4.0 * z * z * z
    }
}

/// Closed form of the Newton step for z^4 - 1:  z - (z - z^-3) / 4
#[inline]
pub fn newton_update(z: Complex64) -> Complex64 {
    z - (z - (z * z * z).inv()) / 4.0
}

/**
 * Iterates Newton's method for z^4 - 1 starting from `z0`, testing the roots after every
 * update in the order 1, -1, i, -i.
 */
pub fn newton_kernel(z0: Complex64, max_iterations: u32, tolerance: f64) -> NewtonResult {
    let mut z = z0;
    for iteration in 0..max_iterations {
        if z.norm_sqr() == 0.0 || !z.is_finite() {
            return NewtonResult::Singular;
        }
        z = newton_update(z);
        for root in RootOfUnity::SEARCH_ORDER {
            if (z - root.value()).norm() < tolerance {
                return NewtonResult::Converged { root, iteration };
            }
        }
    }
    NewtonResult::Unconverged
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

fn default_convergence_tolerance() -> f64 {
    DEFAULT_CONVERGENCE_TOLERANCE
}

fn default_contrast() -> u32 {
    DEFAULT_CONTRAST
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewtonParams {
    #[serde(default)]
    pub image_specification: ImageSpecification,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_convergence_tolerance")]
    pub convergence_tolerance: f64,
    #[serde(default = "default_contrast")]
    pub contrast: u32,
}

impl Default for NewtonParams {
    fn default() -> Self {
        NewtonParams {
            image_specification: ImageSpecification::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_tolerance: DEFAULT_CONVERGENCE_TOLERANCE,
            contrast: DEFAULT_CONTRAST,
        }
    }
}

/// Renders the basins of attraction of z^4 - 1 over the window in `params`.
pub fn render_newton(params: &NewtonParams) -> Raster {
    let color_map = NewtonColorMap {
        contrast: params.contrast,
    };
    let max_iterations = params.max_iterations;
    let tolerance = params.convergence_tolerance;
    generate_raster_parallel(&params.image_specification, |z0: Complex64| {
        color_map.compute_pixel(newton_kernel(z0, max_iterations, tolerance))
    })
}

/// Real (left-regular) representation of a complex scalar as a 2×2 real matrix.
///
/// Maps s = a + i b to the real-linear map x ↦ s·x on C ≅ R^2:
///     [ a  -b ]
///     [ b   a ]
#[inline]
#[cfg(test)]
fn left_multiply_matrix(s: Complex64) -> Matrix2<f64> {
    Matrix2::new(s.re, -s.im, s.im, s.re)
}

#[cfg(test)]
fn assert_consistent_value_and_slope<F: ComplexFunctionWithSlope>(
    function: &F,
    z0: Complex64,
    abs_tol: f64,
    rel_tol: f64,
) {
    // Scaled step size for the finite difference operation
    let scale = (z0.norm() + 1.0).sqrt();
    let h = 1e-7 / scale;

    // central finite differences in x and y
    let dfdx = {
        let f_xp = function.value(z0 + Complex64::new(h, 0.0));
        let f_xm = function.value(z0 - Complex64::new(h, 0.0));
        (f_xp - f_xm) * (0.5 / h)
    };
    let dfdy = {
        let f_yp = function.value(z0 + Complex64::new(0.0, h));
        let f_ym = function.value(z0 - Complex64::new(0.0, h));
        (f_yp - f_ym) * (0.5 / h)
    };

    // J_num = [[∂u/∂x, ∂u/∂y],
    //          [∂v/∂x, ∂v/∂y]]
    let finite_difference_slope = Matrix2::new(dfdx.re, dfdy.re, dfdx.im, dfdy.im);

    // J_ana = φ(f'(z0))
    let analytic_slope = left_multiply_matrix(function.slope(z0));

    // nalgebra's `.norm()` on matrices is the Frobenius norm (Euclidean of all entries)
    let error_norm = (finite_difference_slope - analytic_slope).norm();
    let reference_scale = analytic_slope.norm().max(1.0);

    assert!(
        error_norm <= abs_tol + rel_tol * reference_scale,
        "Derivative check failed at z0={z0:?}\n\
         numerical J = {finite_difference_slope}\n\
         analytic  J = {analytic_slope}\n\
         err_frob   = {error_norm:e},  bound = {}",
        abs_tol + rel_tol * reference_scale
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use more_asserts::assert_le;

    fn kernel(re: f64, im: f64) -> NewtonResult {
        newton_kernel(
            Complex64::new(re, im),
            DEFAULT_MAX_ITERATIONS,
            DEFAULT_CONVERGENCE_TOLERANCE,
        )
    }

    fn converged_root(result: NewtonResult) -> (RootOfUnity, u32) {
        match result {
            NewtonResult::Converged { root, iteration } => (root, iteration),
            other => panic!("expected convergence, got {:?}", other),
        }
    }

    #[test]
    fn derivative_matches_jacobian_fourth_roots_of_unity() {
        for &z0 in &[
            Complex64::new(0.2, 0.8),
            Complex64::new(-1.3, 0.4),
            Complex64::new(2.0, -1.0),
        ] {
            assert_consistent_value_and_slope(
                &FourthRootsOfUnity,
                z0,
                /*abs_tol=*/ 1e-7,
                /*rel_tol=*/ 1e-7,
            );
        }
    }

    #[test]
    fn closed_form_update_matches_newton_raphson_step() {
        for &z0 in &[
            Complex64::new(0.2, 0.8),
            Complex64::new(-1.3, 0.4),
            Complex64::new(1.7, -1.1),
        ] {
            let closed_form = newton_update(z0);
            let generic = modified_newton_raphson_step(z0, 1.0, &FourthRootsOfUnity);
            assert_relative_eq!(closed_form.re, generic.re, epsilon = 1e-12);
            assert_relative_eq!(closed_form.im, generic.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn roots_are_fixed_points_of_the_update() {
        for root in RootOfUnity::SEARCH_ORDER {
            assert_eq!(newton_update(root.value()), root.value());
        }
    }

    #[test]
    fn point_near_one_converges_to_one_quickly() {
        let (root, iteration) = converged_root(kernel(1.0 + 1e-6, 0.0));
        assert_eq!(root, RootOfUnity::One);
        assert_le!(iteration, 2);
    }

    #[test]
    fn real_axis_points_converge_to_real_roots() {
        assert_eq!(
            converged_root(kernel(1.5, 0.0)),
            (RootOfUnity::One, 5)
        );
        assert_eq!(
            converged_root(kernel(-1.2, 0.0)),
            (RootOfUnity::MinusOne, 4)
        );
    }

    #[test]
    fn imaginary_axis_points_converge_to_imaginary_roots() {
        let (root, iteration) = converged_root(kernel(0.0, 1.3));
        assert_eq!(root, RootOfUnity::I);
        assert_le!(iteration, 8);

        let (root, iteration) = converged_root(kernel(0.0, -0.7));
        assert_eq!(root, RootOfUnity::MinusI);
        assert_le!(iteration, 8);
    }

    #[test]
    fn origin_is_singular() {
        assert_eq!(kernel(0.0, 0.0), NewtonResult::Singular);
    }

    #[test]
    fn underflowing_start_is_singular() {
        // z^3 underflows to zero, so the first update is not finite.
        assert_eq!(kernel(1e-120, 0.0), NewtonResult::Singular);
    }

    #[test]
    fn zero_budget_is_unconverged() {
        assert_eq!(
            newton_kernel(Complex64::new(1.0, 0.0), 0, DEFAULT_CONVERGENCE_TOLERANCE),
            NewtonResult::Unconverged
        );
    }

    #[test]
    fn kernel_is_deterministic() {
        let z0 = Complex64::new(0.31, -0.77);
        assert_eq!(kernel(z0.re, z0.im), kernel(z0.re, z0.im));
    }

    #[test]
    fn render_small_window() {
        let params = NewtonParams {
            image_specification: ImageSpecification::square(16, -2.0, 2.0),
            ..NewtonParams::default()
        };
        let raster = render_newton(&params);
        assert_eq!(raster.dimensions(), (16, 16));
        // Pixel (8, 8) is the origin, a singular start.
        assert_eq!(raster.get_pixel(8, 8).0, [0, 0, 0, u16::MAX]);
        // Pixel (14, 8) is 1.5 + 0i, five updates away from the root 1.
        assert_eq!(raster.get_pixel(14, 8).0, [50_000, 0, 0, u16::MAX]);
        assert!(raster.pixels().all(|p| p.0[3] == u16::MAX));
    }
}
