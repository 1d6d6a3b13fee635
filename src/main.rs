use std::process::ExitCode;

use clap::Parser;
use ifs_renderer::cli::args::{CommandsEnum, FractalRendererArgs};
use ifs_renderer::cli::render::{read_fractal_params, render_fractal};
use ifs_renderer::core::file_io::{
    build_output_path_with_date_time, extract_base_name, maybe_date_time_string, FilePrefix,
};

fn run(args: &FractalRendererArgs) -> Result<(), Box<dyn std::error::Error>> {
    match &args.command {
        Some(CommandsEnum::Render(params)) => {
            let fractal_params = read_fractal_params(&params.params_path)?;
            let file_prefix = FilePrefix {
                directory_path: build_output_path_with_date_time(
                    &params.params_path,
                    "render",
                    &maybe_date_time_string(params.date_time_out),
                )?,
                file_base: extract_base_name(&params.params_path).to_owned(),
            };
            render_fractal(&fractal_params, file_prefix)
        }
        None => {
            println!("Default command (nothing specified!)");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = FractalRendererArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
