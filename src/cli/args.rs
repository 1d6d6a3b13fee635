use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct FractalRendererArgs {
    #[command(subcommand)]
    pub command: Option<CommandsEnum>,
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Render the Newton, single Julia, or Julia animation described by a JSON parameter file.
    Render(ParameterFilePath),
}

#[derive(Debug, Args)]
pub struct ParameterFilePath {
    pub params_path: String,

    /// Write into a date-time stamped sub-directory so earlier renders are kept.
    #[clap(long, short)]
    pub date_time_out: bool,
}
