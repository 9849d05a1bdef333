use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Fully resolved pipeline configuration. Built once at process start from
/// defaults plus an optional config file, then injected into the pipeline;
/// nothing reads ambient globals after this point.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub frame_rate: u32,
    pub pixel_format: String,
    pub audio_sample_rate: u32,
    pub audio_bitrate: String,
    pub video_preset: String,
    pub video_crf: u32,
    pub tool_timeout: Duration,
    pub http_timeout: Duration,
    pub scratch_base: PathBuf,
    pub font_family: String,
    pub user_font_dir: Option<PathBuf>,
    pub bundled_font_dir: PathBuf,
    pub resource_font_dir: Option<PathBuf>,
    pub template_path: Option<PathBuf>,
    pub background_rgb: [u8; 3],
    pub headline_rgb: [u8; 3],
    pub name_rgb: [u8; 3],
    pub price_rgb: [u8; 3],
    pub badge_rgb: [u8; 3],
    pub expedited_label: String,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    ffmpeg_path: Option<PathBuf>,
    ffprobe_path: Option<PathBuf>,
    frame_rate: Option<u32>,
    pixel_format: Option<String>,
    audio_sample_rate: Option<u32>,
    audio_bitrate: Option<String>,
    video_preset: Option<String>,
    video_crf: Option<u32>,
    tool_timeout_seconds: Option<u64>,
    http_timeout_seconds: Option<u64>,
    scratch_base: Option<PathBuf>,
    font_family: Option<String>,
    user_font_dir: Option<PathBuf>,
    bundled_font_dir: Option<PathBuf>,
    resource_font_dir: Option<PathBuf>,
    template_path: Option<PathBuf>,
    background_color: Option<String>,
    headline_color: Option<String>,
    name_color: Option<String>,
    price_color: Option<String>,
    badge_color: Option<String>,
    expedited_label: Option<String>,
}

impl PipelineConfig {
    /// Load configuration, merging an optional TOML file over defaults.
    /// Without an override path the platform config directory is consulted;
    /// a missing file is not an error.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let file = match override_path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None => default_config_path()
                .filter(|p| p.is_file())
                .map(|p| -> Result<ConfigFile> {
                    let raw = fs::read_to_string(&p)
                        .with_context(|| format!("Failed to read config file {}", p.display()))?;
                    toml::from_str(&raw)
                        .with_context(|| format!("Failed to parse config file {}", p.display()))
                })
                .transpose()?
                .unwrap_or_default(),
        };

        Ok(Self::from_file(file))
    }

    fn from_file(file: ConfigFile) -> Self {
        Self {
            ffmpeg_path: file
                .ffmpeg_path
                .unwrap_or_else(|| resolve_tool("ffmpeg")),
            ffprobe_path: file
                .ffprobe_path
                .unwrap_or_else(|| resolve_tool("ffprobe")),
            frame_rate: file.frame_rate.unwrap_or(30),
            pixel_format: file.pixel_format.unwrap_or_else(|| "yuv420p".to_string()),
            audio_sample_rate: file.audio_sample_rate.unwrap_or(48_000),
            audio_bitrate: file.audio_bitrate.unwrap_or_else(|| "192k".to_string()),
            video_preset: file.video_preset.unwrap_or_else(|| "medium".to_string()),
            video_crf: file.video_crf.unwrap_or(18),
            tool_timeout: Duration::from_secs(file.tool_timeout_seconds.unwrap_or(600)),
            http_timeout: Duration::from_secs(file.http_timeout_seconds.unwrap_or(20)),
            scratch_base: file
                .scratch_base
                .unwrap_or_else(|| std::env::temp_dir().join("promoreel")),
            font_family: file.font_family.unwrap_or_else(|| "NotoSansKR".to_string()),
            user_font_dir: file.user_font_dir.or_else(dirs::font_dir),
            bundled_font_dir: file
                .bundled_font_dir
                .unwrap_or_else(|| PathBuf::from("assets/fonts")),
            resource_font_dir: file
                .resource_font_dir
                .or_else(|| dirs::data_dir().map(|d| d.join("promoreel").join("fonts"))),
            template_path: file.template_path,
            background_rgb: parse_color(file.background_color.as_deref(), [14, 16, 26]),
            headline_rgb: parse_color(file.headline_color.as_deref(), [248, 248, 248]),
            name_rgb: parse_color(file.name_color.as_deref(), [255, 255, 255]),
            price_rgb: parse_color(file.price_color.as_deref(), [255, 204, 0]),
            badge_rgb: parse_color(file.badge_color.as_deref(), [126, 166, 255]),
            expedited_label: file.expedited_label.unwrap_or_else(|| "빠른배송".to_string()),
        }
    }

    /// True when both external tool binaries can be spawned.
    pub fn tools_available(&self) -> bool {
        tool_responds(&self.ffmpeg_path) && tool_responds(&self.ffprobe_path)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("promoreel").join("config.toml"))
}

fn resolve_tool(name: &str) -> PathBuf {
    // Fall back to the bare name so spawn failures surface a clear error at
    // the point of use instead of at startup.
    which::which(name).unwrap_or_else(|_| PathBuf::from(name))
}

fn tool_responds(path: &Path) -> bool {
    std::process::Command::new(path)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub(crate) fn parse_hex_rgb(value: &str) -> Option<[u8; 3]> {
    let normalized = value.trim().trim_start_matches('#');
    if normalized.len() != 6 || !normalized.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&normalized[0..2], 16).ok()?;
    let g = u8::from_str_radix(&normalized[2..4], 16).ok()?;
    let b = u8::from_str_radix(&normalized[4..6], 16).ok()?;
    Some([r, g, b])
}

fn parse_color(value: Option<&str>, fallback: [u8; 3]) -> [u8; 3] {
    value.and_then(parse_hex_rgb).unwrap_or(fallback)
}
