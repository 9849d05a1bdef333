use clap::{Args, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone)]
pub enum ReelCommands {
    /// Assemble a product showcase video from a job file
    Assemble(AssembleArgs),
    /// Render the product slide images from a job file without assembling
    Slides(SlidesArgs),
    /// Verify that the external encoding tools are available
    Check,
}

#[derive(Args, Debug, Clone)]
pub struct AssembleArgs {
    /// TOML job file describing the assembly request
    #[arg(value_hint = ValueHint::FilePath)]
    pub job: PathBuf,

    /// Override the output base name from the job file
    #[arg(short = 'o', long = "out-name")]
    pub out_name: Option<String>,

    /// Do not show the encode progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SlidesArgs {
    /// TOML job file describing the products
    #[arg(value_hint = ValueHint::FilePath)]
    pub job: PathBuf,

    /// Directory to write the slide images into
    #[arg(short = 'o', long = "out-dir", value_hint = ValueHint::DirPath)]
    pub out_dir: PathBuf,

    /// Canvas width when not probing an intro video
    #[arg(long, default_value_t = 1920)]
    pub width: u32,

    /// Canvas height when not probing an intro video
    #[arg(long, default_value_t = 1080)]
    pub height: u32,
}
