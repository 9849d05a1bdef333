use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stages in execution order. Carried by failure results so the
/// caller can tell where a request died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    ProbeDimensions,
    RenderSlides,
    BuildSilentSlideVideo,
    MuxAudio,
    NormalizeSegments,
    Concatenate,
    Worker,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::ProbeDimensions => "probe-dimensions",
            Stage::RenderSlides => "render-slides",
            Stage::BuildSilentSlideVideo => "build-silent-slide-video",
            Stage::MuxAudio => "mux-audio",
            Stage::NormalizeSegments => "normalize-segments",
            Stage::Concatenate => "concatenate",
            Stage::Worker => "worker",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Required input file is missing: {0}")]
    MissingInput(PathBuf),

    #[error("Product photo was not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Failed to fetch product photo {url}: {reason}")]
    ImageFetch { url: String, reason: String },

    #[error("No video stream found in {0}")]
    NoVideoStream(PathBuf),

    #[error("No slides were produced")]
    NoSlidesProduced,

    #[error("{tool} failed: {diagnostic}")]
    ToolFailure { tool: String, diagnostic: String },

    #[error("Encoder reported success but {0} does not exist")]
    MissingOutput(PathBuf),

    #[error("Assembly worker crashed: {0}")]
    WorkerCrash(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    pub fn tool_failure(tool: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        ReelError::ToolFailure {
            tool: tool.into(),
            diagnostic: diagnostic.into(),
        }
    }
}

pub type ReelResult<T> = Result<T, ReelError>;
