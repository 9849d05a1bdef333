use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;

use super::config::PipelineConfig;
use super::error::{ReelError, ReelResult};
use crate::ui::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Stream metadata read from a media file without decoding it.
#[derive(Debug, Clone, Default)]
pub struct MediaProbe {
    pub video: Option<Dimensions>,
    pub has_audio: bool,
    pub duration_seconds: Option<f64>,
}

/// Encoder quality knobs shared by every encoding operation.
#[derive(Debug, Clone)]
pub struct EncoderSettings {
    pub preset: String,
    pub crf: u32,
    pub audio_bitrate: String,
}

impl EncoderSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            preset: config.video_preset.clone(),
            crf: config.video_crf,
            audio_bitrate: config.audio_bitrate.clone(),
        }
    }
}

/// Declarative description of one encoding-engine invocation. Compiled to an
/// argument vector by [`compile_encode_args`]; the pipeline never builds raw
/// argument lists itself.
#[derive(Debug, Clone)]
pub enum EncodeOp {
    /// Turn a slide-image manifest into one silent video segment, letterboxed
    /// to the target resolution at a uniform pixel format.
    SlideSequence {
        manifest: PathBuf,
        dims: Dimensions,
        fps: u32,
        pixel_format: String,
        output: PathBuf,
    },
    /// Attach the music track to the silent slide video. Video is stream
    /// copied; audio is transcoded; total duration is clamped.
    MuxAudio {
        video: PathBuf,
        audio: PathBuf,
        duration_cap_seconds: f64,
        output: PathBuf,
    },
    /// Re-encode one segment to the shared codec/resolution/frame-rate/pixel
    /// format baseline so concat-by-manifest stays byte-valid. Segments
    /// without audio get a silent track so stream layouts match.
    Normalize {
        input: PathBuf,
        dims: Dimensions,
        fps: u32,
        pixel_format: String,
        audio_sample_rate: u32,
        ensure_audio: bool,
        output: PathBuf,
    },
    /// Stream-copy the normalized segments listed in a concat manifest into
    /// the final output file.
    Concat { manifest: PathBuf, output: PathBuf },
}

impl EncodeOp {
    pub fn label(&self) -> &'static str {
        match self {
            EncodeOp::SlideSequence { .. } => "slide-sequence",
            EncodeOp::MuxAudio { .. } => "mux-audio",
            EncodeOp::Normalize { .. } => "normalize",
            EncodeOp::Concat { .. } => "concat",
        }
    }

    pub fn output(&self) -> &Path {
        match self {
            EncodeOp::SlideSequence { output, .. } => output,
            EncodeOp::MuxAudio { output, .. } => output,
            EncodeOp::Normalize { output, .. } => output,
            EncodeOp::Concat { output, .. } => output,
        }
    }
}

fn contain_filter(dims: Dimensions) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1",
        w = dims.width,
        h = dims.height
    )
}

/// Compile an [`EncodeOp`] into the ffmpeg argument vector. Pure, so op
/// compilation is testable without running anything.
pub fn compile_encode_args(op: &EncodeOp, settings: &EncoderSettings) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".into()];
    match op {
        EncodeOp::SlideSequence {
            manifest,
            dims,
            fps,
            pixel_format,
            output,
        } => {
            args.extend([
                "-f".into(),
                "concat".into(),
                "-safe".into(),
                "0".into(),
                "-i".into(),
                manifest.to_string_lossy().into_owned(),
                "-vf".into(),
                format!("{},format={}", contain_filter(*dims), pixel_format),
                "-r".into(),
                fps.to_string(),
                "-an".into(),
                "-c:v".into(),
                "libx264".into(),
                "-preset".into(),
                settings.preset.clone(),
                "-crf".into(),
                settings.crf.to_string(),
                "-movflags".into(),
                "+faststart".into(),
                output.to_string_lossy().into_owned(),
            ]);
        }
        EncodeOp::MuxAudio {
            video,
            audio,
            duration_cap_seconds,
            output,
        } => {
            args.extend([
                "-i".into(),
                video.to_string_lossy().into_owned(),
                "-i".into(),
                audio.to_string_lossy().into_owned(),
                "-map".into(),
                "0:v:0".into(),
                "-map".into(),
                "1:a:0".into(),
                "-c:v".into(),
                "copy".into(),
                "-c:a".into(),
                "aac".into(),
                "-b:a".into(),
                settings.audio_bitrate.clone(),
                "-shortest".into(),
                "-t".into(),
                format!("{duration_cap_seconds:.3}"),
                "-movflags".into(),
                "+faststart".into(),
                output.to_string_lossy().into_owned(),
            ]);
        }
        EncodeOp::Normalize {
            input,
            dims,
            fps,
            pixel_format,
            audio_sample_rate,
            ensure_audio,
            output,
        } => {
            args.extend(["-i".into(), input.to_string_lossy().into_owned()]);
            if *ensure_audio {
                // Source segment has no audio track; synthesize silence so
                // every normalized segment carries the same stream layout.
                args.extend([
                    "-f".into(),
                    "lavfi".into(),
                    "-i".into(),
                    format!("anullsrc=r={audio_sample_rate}:cl=stereo"),
                    "-map".into(),
                    "0:v:0".into(),
                    "-map".into(),
                    "1:a:0".into(),
                    "-shortest".into(),
                ]);
            } else {
                args.extend([
                    "-map".into(),
                    "0:v:0".into(),
                    "-map".into(),
                    "0:a:0".into(),
                ]);
            }
            args.extend([
                "-vf".into(),
                contain_filter(*dims),
                "-r".into(),
                fps.to_string(),
                "-pix_fmt".into(),
                pixel_format.clone(),
                "-c:v".into(),
                "libx264".into(),
                "-preset".into(),
                settings.preset.clone(),
                "-crf".into(),
                settings.crf.to_string(),
                "-c:a".into(),
                "aac".into(),
                "-b:a".into(),
                settings.audio_bitrate.clone(),
                "-ar".into(),
                audio_sample_rate.to_string(),
                "-movflags".into(),
                "+faststart".into(),
                output.to_string_lossy().into_owned(),
            ]);
        }
        EncodeOp::Concat { manifest, output } => {
            args.extend([
                "-f".into(),
                "concat".into(),
                "-safe".into(),
                "0".into(),
                "-i".into(),
                manifest.to_string_lossy().into_owned(),
                "-c".into(),
                "copy".into(),
                "-movflags".into(),
                "+faststart".into(),
                output.to_string_lossy().into_owned(),
            ]);
        }
    }
    args
}

/// Cooperative cancellation flag shared between the request boundary and the
/// engine's child-process wait loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The injectable collaborator seam: one probe method, one run method.
/// Pipeline tests substitute a fake implementation.
pub trait MediaEngine {
    fn probe(&self, path: &Path) -> ReelResult<MediaProbe>;
    fn run(&self, op: &EncodeOp) -> ReelResult<()>;
}

/// Real engine shelling out to the ffmpeg/ffprobe binaries resolved in
/// [`PipelineConfig`]. Every invocation carries a deadline and honors the
/// cancellation token.
pub struct SystemMediaEngine {
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
    settings: EncoderSettings,
    timeout: Duration,
    cancel: CancelToken,
    show_progress: bool,
}

impl SystemMediaEngine {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            ffprobe_path: config.ffprobe_path.clone(),
            settings: EncoderSettings::from_config(config),
            timeout: config.tool_timeout,
            cancel: CancelToken::new(),
            show_progress: false,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }
}

impl MediaEngine for SystemMediaEngine {
    fn probe(&self, path: &Path) -> ReelResult<MediaProbe> {
        let mut cmd = Command::new(&self.ffprobe_path);
        cmd.args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path);

        let outcome = wait_with_deadline(cmd, "ffprobe", self.timeout, &self.cancel, None)?;
        if !outcome.success {
            return Err(ReelError::tool_failure(
                "ffprobe",
                format!("{}: {}", path.display(), outcome.diagnostic()),
            ));
        }
        parse_probe_output(&outcome.stdout)
            .map_err(|e| ReelError::tool_failure("ffprobe", format!("{}: {e}", path.display())))
    }

    fn run(&self, op: &EncodeOp) -> ReelResult<()> {
        let args = compile_encode_args(op, &self.settings);
        if crate::ui::is_debug_enabled() {
            emit(
                Level::Debug,
                "reel.engine.invoke",
                &format!("{} {}", self.ffmpeg_path.display(), args.join(" ")),
                None,
            );
        }
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(&args);

        let bar = if self.show_progress {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {prefix} {msg}")
                    .expect("spinner template"),
            );
            bar.set_prefix(op.label().to_string());
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            None
        };

        let outcome = wait_with_deadline(cmd, "ffmpeg", self.timeout, &self.cancel, bar.clone())?;
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        if !outcome.success {
            return Err(ReelError::tool_failure(
                format!("ffmpeg ({})", op.label()),
                outcome.diagnostic(),
            ));
        }
        Ok(())
    }
}

struct ChildOutcome {
    success: bool,
    stdout: Vec<u8>,
    stderr_lines: Vec<String>,
    status_note: Option<String>,
}

impl ChildOutcome {
    /// Condensed diagnostic for error reporting: the lines ffmpeg flagged as
    /// errors when present, otherwise the tail of stderr.
    fn diagnostic(&self) -> String {
        if let Some(note) = &self.status_note {
            return note.clone();
        }
        let flagged: Vec<&String> = self
            .stderr_lines
            .iter()
            .filter(|line| line.to_lowercase().contains("error"))
            .collect();
        let picked: Vec<String> = if flagged.is_empty() {
            self.stderr_lines
                .iter()
                .rev()
                .take(4)
                .cloned()
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect()
        } else {
            flagged.into_iter().cloned().collect()
        };
        if picked.is_empty() {
            "tool exited with an error and produced no diagnostics".to_string()
        } else {
            picked.join(" | ")
        }
    }
}

fn wait_with_deadline(
    mut cmd: Command,
    tool: &str,
    timeout: Duration,
    cancel: &CancelToken,
    bar: Option<ProgressBar>,
) -> ReelResult<ChildOutcome> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|e| ReelError::tool_failure(tool, format!("failed to spawn: {e}")))?;

    let stderr = child.stderr.take().expect("stderr was piped");
    let stderr_drain = std::thread::spawn(move || drain_stderr_lines(stderr, bar));

    let mut stdout_pipe = child.stdout.take().expect("stdout was piped");
    let stdout_drain = std::thread::spawn(move || {
        use std::io::Read as _;
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf);
        buf
    });

    let started = Instant::now();
    let mut status_note = None;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {}
            Err(e) => {
                return Err(ReelError::tool_failure(tool, format!("wait failed: {e}")));
            }
        }
        if cancel.is_cancelled() {
            let _ = child.kill();
            let _ = child.wait();
            status_note = Some("cancelled by request".to_string());
            break None;
        }
        if started.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            status_note = Some(format!("timed out after {}s", timeout.as_secs()));
            break None;
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    let stderr_lines = stderr_drain.join().unwrap_or_default();
    let stdout = stdout_drain.join().unwrap_or_default();

    Ok(ChildOutcome {
        success: status.map(|s| s.success()).unwrap_or(false),
        stdout,
        stderr_lines,
        status_note,
    })
}

fn drain_stderr_lines<R: std::io::Read>(mut stderr: R, bar: Option<ProgressBar>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut buffer = [0u8; 4096];
    let mut accumulated = String::new();

    loop {
        let bytes_read = match stderr.read(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        accumulated.push_str(&String::from_utf8_lossy(&buffer[..bytes_read]));

        while let Some(pos) = accumulated.find(['\r', '\n']) {
            let line = accumulated[..pos].to_string();
            accumulated = accumulated[pos + 1..].to_string();
            if line.is_empty() {
                continue;
            }
            if let Some(bar) = &bar
                && let Some(seconds) = parse_ffmpeg_progress(&line)
            {
                bar.set_message(format!("{seconds:.1}s encoded"));
            }
            lines.push(line);
        }
    }
    if !accumulated.is_empty() {
        lines.push(accumulated);
    }
    lines
}

fn parse_ffmpeg_progress(line: &str) -> Option<f64> {
    let time_start = line.find("time=")?;
    let time_str = &line[time_start + 5..];
    let time_end = time_str.find(' ').unwrap_or(time_str.len());
    parse_time_to_seconds(&time_str[..time_end])
}

fn parse_time_to_seconds(time_str: &str) -> Option<f64> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hours: f64 = parts[0].parse().ok()?;
    let minutes: f64 = parts[1].parse().ok()?;
    let seconds: f64 = parts[2].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

#[derive(Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

fn parse_probe_output(stdout: &[u8]) -> anyhow::Result<MediaProbe> {
    let parsed: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| anyhow::anyhow!("probe json parse: {e}"))?;

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .and_then(|s| match (s.width, s.height) {
            (Some(width), Some(height)) => Some(Dimensions { width, height }),
            _ => None,
        });
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));
    let duration_seconds = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok());

    Ok(MediaProbe {
        video,
        has_audio,
        duration_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EncoderSettings {
        EncoderSettings {
            preset: "medium".into(),
            crf: 18,
            audio_bitrate: "192k".into(),
        }
    }

    fn dims() -> Dimensions {
        Dimensions {
            width: 1920,
            height: 1080,
        }
    }

    #[test]
    fn slide_sequence_args_letterbox_and_drop_audio() {
        let op = EncodeOp::SlideSequence {
            manifest: PathBuf::from("/tmp/slides.ffconcat"),
            dims: dims(),
            fps: 30,
            pixel_format: "yuv420p".into(),
            output: PathBuf::from("/tmp/slides.mp4"),
        };
        let args = compile_encode_args(&op, &settings());
        assert!(args.contains(&"-an".to_string()));
        assert!(args.contains(&"concat".to_string()));
        let vf = &args[args.iter().position(|a| a == "-vf").unwrap() + 1];
        assert!(vf.contains("scale=1920:1080:force_original_aspect_ratio=decrease"));
        assert!(vf.contains("pad=1920:1080"));
        assert!(vf.ends_with("format=yuv420p"));
        assert_eq!(args.last().unwrap(), "/tmp/slides.mp4");
    }

    #[test]
    fn mux_args_copy_video_and_cap_duration() {
        let op = EncodeOp::MuxAudio {
            video: PathBuf::from("silent.mp4"),
            audio: PathBuf::from("bgm.mp3"),
            duration_cap_seconds: 9.0,
            output: PathBuf::from("muxed.mp4"),
        };
        let args = compile_encode_args(&op, &settings());
        let copy_idx = args.iter().position(|a| a == "-c:v").unwrap();
        assert_eq!(args[copy_idx + 1], "copy");
        assert!(args.contains(&"-shortest".to_string()));
        let t_idx = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t_idx + 1], "9.000");
    }

    #[test]
    fn normalize_synthesizes_silence_only_when_needed() {
        let base = EncodeOp::Normalize {
            input: PathBuf::from("intro.mp4"),
            dims: dims(),
            fps: 30,
            pixel_format: "yuv420p".into(),
            audio_sample_rate: 48_000,
            ensure_audio: true,
            output: PathBuf::from("n0.mp4"),
        };
        let args = compile_encode_args(&base, &settings());
        assert!(args.iter().any(|a| a.starts_with("anullsrc=r=48000")));
        assert!(args.contains(&"-shortest".to_string()));

        let with_audio = EncodeOp::Normalize {
            input: PathBuf::from("intro.mp4"),
            dims: dims(),
            fps: 30,
            pixel_format: "yuv420p".into(),
            audio_sample_rate: 48_000,
            ensure_audio: false,
            output: PathBuf::from("n0.mp4"),
        };
        let args = compile_encode_args(&with_audio, &settings());
        assert!(!args.iter().any(|a| a.starts_with("anullsrc")));
        assert!(args.contains(&"0:a:0".to_string()));
    }

    #[test]
    fn concat_is_stream_copy_only() {
        let op = EncodeOp::Concat {
            manifest: PathBuf::from("list.ffconcat"),
            output: PathBuf::from("final.mp4"),
        };
        let args = compile_encode_args(&op, &settings());
        let c_idx = args.iter().position(|a| a == "-c").unwrap();
        assert_eq!(args[c_idx + 1], "copy");
        assert!(!args.contains(&"libx264".to_string()));
    }

    #[test]
    fn probe_output_parses_video_audio_and_duration() {
        let json = br#"{
            "streams": [
                {"codec_type": "video", "width": 1920, "height": 1080},
                {"codec_type": "audio"}
            ],
            "format": {"duration": "5.021000"}
        }"#;
        let probe = parse_probe_output(json).unwrap();
        assert_eq!(
            probe.video,
            Some(Dimensions {
                width: 1920,
                height: 1080
            })
        );
        assert!(probe.has_audio);
        assert!((probe.duration_seconds.unwrap() - 5.021).abs() < 1e-9);
    }

    #[test]
    fn probe_output_without_video_stream() {
        let json = br#"{"streams": [{"codec_type": "audio"}], "format": {}}"#;
        let probe = parse_probe_output(json).unwrap();
        assert!(probe.video.is_none());
        assert!(probe.has_audio);
        assert!(probe.duration_seconds.is_none());
    }

    #[test]
    fn ffmpeg_progress_line_parses_to_seconds() {
        let line = "frame=  120 fps= 30 q=28.0 size=512kB time=00:00:04.00 bitrate=1048.6kbits/s speed=1.01x";
        assert_eq!(parse_ffmpeg_progress(line), Some(4.0));
        assert_eq!(parse_ffmpeg_progress("no timestamps here"), None);
    }

    #[test]
    fn cancel_token_round_trip() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[cfg(unix)]
    #[test]
    fn deadline_kills_a_hung_child() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let outcome = wait_with_deadline(
            cmd,
            "sleep",
            Duration::from_millis(200),
            &CancelToken::new(),
            None,
        )
        .unwrap();
        assert!(!outcome.success);
        assert!(outcome.diagnostic().contains("timed out"));
    }

    #[cfg(unix)]
    #[test]
    fn cancellation_stops_a_running_child() {
        let token = CancelToken::new();
        token.cancel();
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let outcome =
            wait_with_deadline(cmd, "sleep", Duration::from_secs(60), &token, None).unwrap();
        assert!(!outcome.success);
        assert!(outcome.diagnostic().contains("cancelled"));
    }
}
