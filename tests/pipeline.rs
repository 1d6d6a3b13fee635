use approx::assert_relative_eq;
use ifs_renderer::{
    core::{error::RenderError, image_utils::raster_digest, image_utils::ImageSpecification},
    fractals::{
        animation::{build_frame_jobs, render_julia_animation},
        julia::{julia_kernel, render_julia_frame, render_julia_single, JuliaParams, JuliaResult},
        newtons_method::{newton_kernel, NewtonResult, RootOfUnity},
        parameter_path::ParameterPath,
    },
};
use more_asserts::{assert_gt, assert_lt};
use num::complex::Complex64;

fn tiny_julia_params(resolution: u32) -> JuliaParams {
    JuliaParams {
        image_specification: ImageSpecification::square(resolution, -2.0, 2.0),
        max_iter_count: 80,
        ..JuliaParams::default()
    }
}

#[test]
fn test_exp_animation_covers_one_turn_without_gaps() {
    let jobs = build_frame_jobs(ParameterPath::Exp, 64);
    assert_eq!(jobs.len(), 64);
    for (i, job) in jobs.iter().enumerate() {
        assert_eq!(job.index, i);
        assert_relative_eq!(job.parameter.norm(), 0.7885, epsilon = 1e-12);
        for other in &jobs[..i] {
            assert_gt!((job.parameter - other.parameter).norm(), 1e-3);
        }
    }

    let params = tiny_julia_params(8);
    let sequence = render_julia_animation(64, 4, "Exp", &params).unwrap();
    assert_eq!(sequence.len(), 64);
    for (job, frame) in jobs.iter().zip(sequence.frames()) {
        assert!(*frame == render_julia_frame(&params, job.parameter));
    }
}

#[test]
fn test_worker_count_never_changes_the_sequence() {
    let params = tiny_julia_params(6);
    for path in ["Angor", "Exp", "Wabbit"] {
        for n_frames in [1, 2, 5, 9] {
            let reference = render_julia_animation(n_frames, 1, path, &params).unwrap();
            for n_workers in [2, 3, 8, 16] {
                let sequence = render_julia_animation(n_frames, n_workers, path, &params).unwrap();
                assert!(sequence == reference, "{} {} {}", path, n_frames, n_workers);
            }
        }
    }
}

#[test]
fn test_repeated_runs_hash_identically() {
    let params = tiny_julia_params(12);
    let digests = |workers: usize| -> Vec<String> {
        render_julia_animation(10, workers, "Wabbit", &params)
            .unwrap()
            .frames()
            .iter()
            .map(raster_digest)
            .collect()
    };
    let first = digests(4);
    assert_eq!(first, digests(4));
    assert_eq!(first, digests(1));
}

#[test]
fn test_invalid_requests_are_rejected() {
    let params = tiny_julia_params(4);
    assert!(matches!(
        render_julia_animation(0, 4, "Exp", &params),
        Err(RenderError::InvalidFrameCount(0))
    ));
    assert!(matches!(
        render_julia_animation(4, 0, "Exp", &params),
        Err(RenderError::InvalidWorkerCount(0))
    ));
    assert!(matches!(
        render_julia_animation(4, 4, "exp", &params),
        Err(RenderError::InvalidPathName(_))
    ));
}

#[test]
fn test_origin_scenarios() {
    let origin = Complex64::new(0.0, 0.0);
    assert_eq!(
        julia_kernel(origin, Complex64::new(-1.25, 0.0), 400, 10.0),
        JuliaResult::Bounded
    );
    assert_eq!(
        julia_kernel(origin, Complex64::new(-0.7269, 0.1889), 400, 10.0),
        JuliaResult::Bounded
    );
    match julia_kernel(origin, Complex64::new(-0.8, 0.156), 400, 10.0) {
        JuliaResult::Escaped(n) => assert_gt!(n, 200),
        JuliaResult::Bounded => panic!("expected a late escape"),
    }

    assert_eq!(newton_kernel(origin, 400, 1e-16), NewtonResult::Singular);
    match newton_kernel(Complex64::new(1.0 + 1e-6, 0.0), 400, 1e-16) {
        NewtonResult::Converged { root, iteration } => {
            assert_eq!(root, RootOfUnity::One);
            assert_lt!(iteration, 5);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_single_julia_center_pixel_is_black() {
    let params = JuliaParams {
        image_specification: ImageSpecification::square(16, -2.0, 2.0),
        ..JuliaParams::default()
    };
    let raster = render_julia_single(&params, Complex64::new(-1.25, 0.0));
    // Pixel (8, 8) samples the origin exactly.
    assert_eq!(raster.get_pixel(8, 8).0, [0, 0, 0, u16::MAX]);
    // The corner escapes after two updates.
    assert_eq!(raster.get_pixel(0, 0).0[3], u16::MAX);
    assert_gt!(raster.get_pixel(0, 0).0[2], 0);
}
