pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod request;
pub mod slide;
pub mod worker;

use std::path::Path;

use anyhow::{Result, bail};

use crate::ui::prelude::*;
use cli::{AssembleArgs, ReelCommands, SlidesArgs};
use config::PipelineConfig;
use engine::{CancelToken, Dimensions};
use request::{AssemblyRequest, PipelineResult};
use slide::SlideRenderer;

pub fn handle_command(command: ReelCommands, config_path: Option<&Path>) -> Result<()> {
    let config = PipelineConfig::load(config_path)?;
    match command {
        ReelCommands::Assemble(args) => handle_assemble(args, &config),
        ReelCommands::Slides(args) => handle_slides(args, &config),
        ReelCommands::Check => handle_check(&config),
    }
}

fn handle_assemble(args: AssembleArgs, config: &PipelineConfig) -> Result<()> {
    let mut request = AssemblyRequest::from_job_file(&args.job)?;
    if args.out_name.is_some() {
        request.output_base_name = args.out_name;
    }

    emit(
        Level::Info,
        "reel.assemble.start",
        &format!(
            "Assembling '{}' ({} product slide(s))",
            request.title,
            request.slides.len()
        ),
        None,
    );

    let result = worker::run_isolated(config, request, CancelToken::new(), !args.no_progress);
    match result {
        PipelineResult::Completed { output_path } => {
            emit(
                Level::Success,
                "reel.assemble.output",
                &format!("Output: {}", output_path.display()),
                Some(serde_json::json!({ "output": output_path })),
            );
            Ok(())
        }
        PipelineResult::Failed { stage, error } => {
            bail!("assembly failed during {stage}: {error}")
        }
    }
}

fn handle_slides(args: SlidesArgs, config: &PipelineConfig) -> Result<()> {
    let request = AssemblyRequest::from_job_file(&args.job)?;
    if request.slides.is_empty() {
        bail!("job file has no products to render");
    }

    let dims = Dimensions {
        width: args.width,
        height: args.height,
    };
    let renderer = SlideRenderer::new(config, dims)?;
    let rendered = renderer.render_batch(&request.title, &request.slides, &args.out_dir)?;

    emit(
        Level::Success,
        "reel.slides.done",
        &format!(
            "Rendered {} slide(s) into {}",
            rendered.len(),
            args.out_dir.display()
        ),
        None,
    );
    Ok(())
}

fn handle_check(config: &PipelineConfig) -> Result<()> {
    emit(
        Level::Info,
        "reel.check.tools",
        &format!(
            "ffmpeg: {} / ffprobe: {}",
            config.ffmpeg_path.display(),
            config.ffprobe_path.display()
        ),
        None,
    );
    if !config.tools_available() {
        bail!(
            "encoding tools are not runnable; install ffmpeg/ffprobe or set \
             ffmpeg_path/ffprobe_path in the config file"
        );
    }
    emit(
        Level::Success,
        "reel.check.ok",
        "Encoding tools are available",
        None,
    );
    Ok(())
}
