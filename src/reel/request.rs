use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::error::{ReelError, Stage};

/// Where a product photo comes from. Remote sources are recognized by their
/// URL scheme; everything else is treated as a local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Local(PathBuf),
    Remote(String),
}

impl ImageSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ImageSource::Remote(trimmed.to_string())
        } else {
            ImageSource::Local(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ImageSource::Local(path) => path.display().to_string(),
            ImageSource::Remote(url) => url.clone(),
        }
    }
}

/// One product to render. Immutable once constructed; consumed once by the
/// slide renderer.
#[derive(Debug, Clone)]
pub struct ProductSlideSpec {
    pub name: String,
    pub price: String,
    pub rank: u32,
    pub expedited: bool,
    pub image: ImageSource,
}

/// One end-to-end assembly job. Read-only to the pipeline.
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    pub title: String,
    pub intro_path: PathBuf,
    pub outro_path: PathBuf,
    pub music_path: PathBuf,
    pub slides: Vec<ProductSlideSpec>,
    pub output_dir: PathBuf,
    pub slide_duration_seconds: f64,
    pub output_base_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobFile {
    title: String,
    intro: PathBuf,
    outro: PathBuf,
    music: PathBuf,
    output_dir: PathBuf,
    slide_duration_seconds: f64,
    output_base_name: Option<String>,
    #[serde(default)]
    products: Vec<JobProduct>,
}

#[derive(Debug, Deserialize)]
struct JobProduct {
    name: String,
    price: String,
    rank: u32,
    #[serde(default)]
    expedited: bool,
    image: String,
}

impl AssemblyRequest {
    pub fn from_job_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;
        let job: JobFile = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse job file {}", path.display()))?;

        let slides = job
            .products
            .into_iter()
            .map(|p| ProductSlideSpec {
                name: p.name,
                price: p.price,
                rank: p.rank,
                expedited: p.expedited,
                image: ImageSource::parse(&p.image),
            })
            .collect();

        Ok(Self {
            title: job.title,
            intro_path: job.intro,
            outro_path: job.outro,
            music_path: job.music,
            slides,
            output_dir: job.output_dir,
            slide_duration_seconds: job.slide_duration_seconds,
            output_base_name: job.output_base_name,
        })
    }

    /// Base name of the final output file. An explicit `output_base_name`
    /// always wins; otherwise the name is derived from the title.
    pub fn resolved_base_name(&self) -> String {
        match self.output_base_name.as_deref().map(str::trim) {
            Some(explicit) if !explicit.is_empty() => sanitize_base_name(explicit),
            _ => sanitize_base_name(&self.title),
        }
    }

    /// Validate a request up front: input files must exist, the product list
    /// must be non-empty, and the slide duration must be positive. Runs
    /// before any external invocation.
    pub fn validate(&self) -> Result<(), ReelError> {
        for input in [&self.intro_path, &self.outro_path, &self.music_path] {
            if !input.is_file() {
                return Err(ReelError::MissingInput(input.clone()));
            }
        }
        if self.slides.is_empty() {
            return Err(ReelError::NoSlidesProduced);
        }
        if !(self.slide_duration_seconds > 0.0) {
            return Err(ReelError::Other(anyhow::anyhow!(
                "slide_duration_seconds must be positive, got {}",
                self.slide_duration_seconds
            )));
        }
        if self.slides.iter().any(|s| s.rank == 0) {
            return Err(ReelError::Other(anyhow::anyhow!(
                "product ranks must be positive"
            )));
        }
        Ok(())
    }
}

pub fn sanitize_base_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_dash = false;
    for ch in raw.trim().chars() {
        let mapped = if ch.is_alphanumeric() {
            last_dash = false;
            Some(ch)
        } else if matches!(ch, ' ' | '-' | '_' | '.') {
            if last_dash {
                None
            } else {
                last_dash = true;
                Some('-')
            }
        } else {
            None
        };
        if let Some(mapped) = mapped {
            out.push(mapped);
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "promoreel".to_string()
    } else {
        trimmed.to_string()
    }
}

/// A pipeline-internal temp file. Everything registered under a run is
/// deleted during cleanup unless it is the final output.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    SlideImage,
    SlideManifest,
    SilentSlideVideo,
    SlideVideoWithAudio,
    NormalizedIntro,
    NormalizedOutro,
    NormalizedSlides,
    ConcatManifest,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::SlideImage => "rendered-slide-image",
            ArtifactKind::SlideManifest => "slide-sequence-manifest",
            ArtifactKind::SilentSlideVideo => "silent-slide-video",
            ArtifactKind::SlideVideoWithAudio => "slide-video-with-audio",
            ArtifactKind::NormalizedIntro => "normalized-intro",
            ArtifactKind::NormalizedOutro => "normalized-outro",
            ArtifactKind::NormalizedSlides => "normalized-slides",
            ArtifactKind::ConcatManifest => "concat-manifest",
        }
    }
}

/// Terminal value of one assembly run. Constructed exactly once, at the point
/// the pipeline terminates.
#[derive(Debug)]
pub enum PipelineResult {
    Completed { output_path: PathBuf },
    Failed { stage: Stage, error: ReelError },
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Completed { .. })
    }
}
