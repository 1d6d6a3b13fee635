use std::io::Write;

use num::complex::Complex64;

use crate::core::{
    error::RenderError,
    file_io::{serialize_to_json, FilePrefix},
    image_encoding::{write_animated_gif, write_png},
    image_utils::raster_digest,
    stopwatch::Stopwatch,
};
use crate::fractals::{
    animation::render_julia_animation,
    common::{FractalParams, JuliaAnimationParams, JuliaSingleParams, DEFAULT_PARAMETER_PATH},
    julia::render_julia_single,
    newtons_method::{render_newton, NewtonParams},
    parameter_path::ParameterPath,
};

pub fn read_fractal_params(params_path: &str) -> Result<FractalParams, RenderError> {
    let text = std::fs::read_to_string(params_path)?;
    Ok(serde_json::from_str(&text)?)
}

/**
 * Request-layer defaulting: an unrecognized path name falls back to the default path
 * with a warning. The renderer itself rejects unknown names.
 */
pub fn resolve_parameter_path(name: &str) -> &str {
    match name.parse::<ParameterPath>() {
        Ok(_) => name,
        Err(err) => {
            log::warn!("{}; using `{}` instead", err, DEFAULT_PARAMETER_PATH);
            DEFAULT_PARAMETER_PATH
        }
    }
}

pub fn render_fractal(
    params: &FractalParams,
    mut file_prefix: FilePrefix,
) -> Result<(), Box<dyn std::error::Error>> {
    match params {
        FractalParams::Newton(inner_params) => {
            file_prefix.create_and_step_into_sub_directory("newton")?;
            render_newton_to_file(inner_params, &file_prefix)?;
        }
        FractalParams::JuliaSingle(inner_params) => {
            file_prefix.create_and_step_into_sub_directory("julia_single")?;
            render_julia_single_to_file(inner_params, &file_prefix)?;
        }
        FractalParams::JuliaAnimation(inner_params) => {
            file_prefix.create_and_step_into_sub_directory("julia_animation")?;
            render_julia_animation_to_file(inner_params, &file_prefix)?;
        }
    }
    Ok(())
}

fn write_diagnostics(
    file_prefix: &FilePrefix,
    stopwatch: &Stopwatch,
    digests: &[String],
) -> Result<(), RenderError> {
    let mut diagnostics_file = file_prefix.create_file_with_suffix("_diagnostics.txt")?;
    stopwatch.display(&mut diagnostics_file)?;
    writeln!(diagnostics_file, "Frame digests (SHA-256):")?;
    for (index, digest) in digests.iter().enumerate() {
        writeln!(diagnostics_file, "  {:>4}: {}", index, digest)?;
    }
    diagnostics_file.flush()?;
    stopwatch.log_summary();
    Ok(())
}

fn render_newton_to_file(
    params: &NewtonParams,
    file_prefix: &FilePrefix,
) -> Result<(), RenderError> {
    let mut stopwatch = Stopwatch::new("Newton Render Stopwatch".to_owned());
    serialize_to_json(file_prefix.full_path_with_suffix(".json"), params)?;
    stopwatch.record_split("basic setup".to_owned());

    let raster = render_newton(params);
    stopwatch.record_split("compute Newton iterations".to_owned());

    write_png(&raster, &file_prefix.full_path_with_suffix(".png"))?;
    stopwatch.record_split("write PNG".to_owned());

    write_diagnostics(file_prefix, &stopwatch, &[raster_digest(&raster)])
}

fn render_julia_single_to_file(
    params: &JuliaSingleParams,
    file_prefix: &FilePrefix,
) -> Result<(), RenderError> {
    let mut stopwatch = Stopwatch::new("Julia Render Stopwatch".to_owned());
    serialize_to_json(file_prefix.full_path_with_suffix(".json"), params)?;
    stopwatch.record_split("basic setup".to_owned());

    let constant_term = Complex64::new(params.constant_term[0], params.constant_term[1]);
    let raster = render_julia_single(&params.julia, constant_term);
    stopwatch.record_split("compute Julia sequence".to_owned());

    write_png(&raster, &file_prefix.full_path_with_suffix(".png"))?;
    stopwatch.record_split("write PNG".to_owned());

    write_diagnostics(file_prefix, &stopwatch, &[raster_digest(&raster)])
}

fn render_julia_animation_to_file(
    params: &JuliaAnimationParams,
    file_prefix: &FilePrefix,
) -> Result<(), RenderError> {
    let mut stopwatch = Stopwatch::new("Julia Animation Stopwatch".to_owned());
    serialize_to_json(file_prefix.full_path_with_suffix(".json"), params)?;
    let parameter_path = resolve_parameter_path(&params.parameter_path);
    stopwatch.record_split("basic setup".to_owned());

    let sequence = render_julia_animation(
        params.frame_count,
        params.worker_count,
        parameter_path,
        &params.julia,
    )?;
    stopwatch.record_split("render frames".to_owned());

    write_animated_gif(
        &sequence,
        &file_prefix.full_path_with_suffix(".gif"),
        params.frame_delay_centiseconds,
    )?;
    stopwatch.record_split("write GIF".to_owned());

    let digests: Vec<String> = sequence.frames().iter().map(raster_digest).collect();
    write_diagnostics(file_prefix, &stopwatch, &digests)
}
