use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::config::PipelineConfig;
use super::engine::{EncodeOp, MediaEngine};
use super::error::{ReelError, Stage};
use super::request::{ArtifactKind, AssemblyRequest, PipelineResult, RenderedArtifact};
use super::slide::SlideRenderer;
use crate::ui::prelude::*;

/// Drives one assembly request through the fixed stage sequence:
/// probe -> render slides -> silent slide video -> audio mux -> normalize ->
/// concat -> cleanup. Strictly linear; the first error aborts all later
/// stages and flows straight to cleanup.
pub struct AssemblyPipeline<'a> {
    config: &'a PipelineConfig,
    engine: &'a dyn MediaEngine,
}

/// Per-run scratch directory plus the artifact ledger. Every registered
/// artifact is deleted during cleanup, success or failure; deletion problems
/// are logged, never escalated.
struct ScratchSpace {
    dir: PathBuf,
    artifacts: Vec<RenderedArtifact>,
}

impl ScratchSpace {
    fn create(base: &Path) -> Result<Self, ReelError> {
        fs::create_dir_all(base)
            .with_context(|| format!("Failed to create scratch base {}", base.display()))?;
        let dir = base.join(format!("run-{:016x}", rand::random::<u64>()));
        fs::create_dir(&dir)
            .with_context(|| format!("Failed to create scratch directory {}", dir.display()))?;
        Ok(Self {
            dir,
            artifacts: Vec::new(),
        })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn register(&mut self, path: PathBuf, kind: ArtifactKind) -> PathBuf {
        self.artifacts.push(RenderedArtifact {
            path: path.clone(),
            kind,
        });
        path
    }

    fn cleanup(&mut self) {
        for artifact in self.artifacts.drain(..) {
            if !artifact.path.exists() {
                continue;
            }
            if let Err(e) = fs::remove_file(&artifact.path) {
                emit(
                    Level::Warn,
                    "reel.cleanup.artifact",
                    &format!(
                        "Could not delete {} artifact {}: {e}",
                        artifact.kind.as_str(),
                        artifact.path.display()
                    ),
                    None,
                );
            }
        }
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            emit(
                Level::Warn,
                "reel.cleanup.scratch",
                &format!(
                    "Could not delete scratch directory {}: {e}",
                    self.dir.display()
                ),
                None,
            );
        }
    }
}

fn fail(stage: Stage) -> impl FnOnce(ReelError) -> (Stage, ReelError) {
    move |error| (stage, error)
}

impl<'a> AssemblyPipeline<'a> {
    pub fn new(config: &'a PipelineConfig, engine: &'a dyn MediaEngine) -> Self {
        Self { config, engine }
    }

    /// Execute the request to termination. The returned `PipelineResult` is
    /// constructed exactly once, after cleanup has run.
    pub fn run(&self, request: &AssemblyRequest) -> PipelineResult {
        let mut scratch = match ScratchSpace::create(&self.config.scratch_base) {
            Ok(scratch) => scratch,
            Err(error) => {
                return PipelineResult::Failed {
                    stage: Stage::Init,
                    error,
                };
            }
        };

        let outcome = self.execute(request, &mut scratch);
        scratch.cleanup();

        match outcome {
            Ok(output_path) => {
                emit(
                    Level::Success,
                    "reel.assemble.done",
                    &format!("Assembled {}", output_path.display()),
                    None,
                );
                PipelineResult::Completed { output_path }
            }
            Err((stage, error)) => {
                if matches!(stage, Stage::Concatenate) {
                    // Concat is the only stage writing into the output
                    // directory; never leave a partial file behind.
                    let partial = self.final_output_path(request);
                    if partial.is_file() {
                        let _ = fs::remove_file(&partial);
                    }
                }
                emit(
                    Level::Error,
                    "reel.assemble.failed",
                    &format!("Assembly failed during {stage}: {error}"),
                    None,
                );
                PipelineResult::Failed { stage, error }
            }
        }
    }

    fn final_output_path(&self, request: &AssemblyRequest) -> PathBuf {
        request
            .output_dir
            .join(format!("{}.mp4", request.resolved_base_name()))
    }

    fn execute(
        &self,
        request: &AssemblyRequest,
        scratch: &mut ScratchSpace,
    ) -> Result<PathBuf, (Stage, ReelError)> {
        // Init: reject bad requests before any external invocation.
        request.validate().map_err(fail(Stage::Init))?;
        fs::create_dir_all(&request.output_dir)
            .with_context(|| {
                format!(
                    "Failed to create output directory {}",
                    request.output_dir.display()
                )
            })
            .map_err(|e| (Stage::Init, ReelError::Other(e)))?;
        let final_output = self.final_output_path(request);

        // ProbeDimensions: the intro defines the canonical resolution.
        emit(
            Level::Info,
            "reel.assemble.probe",
            &format!("Probing intro dimensions: {}", request.intro_path.display()),
            None,
        );
        let intro_probe = self
            .engine
            .probe(&request.intro_path)
            .map_err(fail(Stage::ProbeDimensions))?;
        let dims = intro_probe
            .video
            .ok_or_else(|| ReelError::NoVideoStream(request.intro_path.clone()))
            .map_err(fail(Stage::ProbeDimensions))?;

        // RenderSlides: all product slides, sequentially, into scratch.
        emit(
            Level::Info,
            "reel.assemble.slides",
            &format!("Rendering {} product slide(s) at {dims}", request.slides.len()),
            None,
        );
        let renderer = SlideRenderer::new(self.config, dims)
            .map_err(|e| (Stage::RenderSlides, ReelError::Other(e)))?;
        let slide_dir = scratch.path("slides");
        let slide_paths = renderer
            .render_batch(&request.title, &request.slides, &slide_dir)
            .map_err(fail(Stage::RenderSlides))?;
        for path in &slide_paths {
            scratch.register(path.clone(), ArtifactKind::SlideImage);
        }
        if slide_paths.is_empty() {
            return Err((Stage::RenderSlides, ReelError::NoSlidesProduced));
        }

        // BuildSilentSlideVideo: one engine invocation over a manifest that
        // holds each slide for the configured duration.
        let slide_manifest = scratch.register(
            scratch.path("slides.ffconcat"),
            ArtifactKind::SlideManifest,
        );
        write_slide_manifest(
            &slide_manifest,
            &slide_paths,
            request.slide_duration_seconds,
        )
        .map_err(fail(Stage::BuildSilentSlideVideo))?;
        let silent_video = scratch.register(
            scratch.path("slides-silent.mp4"),
            ArtifactKind::SilentSlideVideo,
        );
        self.engine
            .run(&EncodeOp::SlideSequence {
                manifest: slide_manifest,
                dims,
                fps: self.config.frame_rate,
                pixel_format: self.config.pixel_format.clone(),
                output: silent_video.clone(),
            })
            .map_err(fail(Stage::BuildSilentSlideVideo))?;

        // MuxAudio: background music, clamped to the slide block length.
        let duration_cap = request.slides.len() as f64 * request.slide_duration_seconds;
        let slide_video = scratch.register(
            scratch.path("slides-audio.mp4"),
            ArtifactKind::SlideVideoWithAudio,
        );
        self.engine
            .run(&EncodeOp::MuxAudio {
                video: silent_video,
                audio: request.music_path.clone(),
                duration_cap_seconds: duration_cap,
                output: slide_video.clone(),
            })
            .map_err(fail(Stage::MuxAudio))?;

        // NormalizeSegments: shared codec/resolution/fps/pixel-format
        // baseline so the final concat can stream copy.
        emit(
            Level::Info,
            "reel.assemble.normalize",
            &format!("Normalizing segments to {dims} @ {}fps", self.config.frame_rate),
            None,
        );
        let outro_probe = self
            .engine
            .probe(&request.outro_path)
            .map_err(fail(Stage::NormalizeSegments))?;
        let segments = [
            (
                &request.intro_path,
                ArtifactKind::NormalizedIntro,
                "normalized-intro.mp4",
                intro_probe.has_audio,
            ),
            (
                &slide_video,
                ArtifactKind::NormalizedSlides,
                "normalized-slides.mp4",
                true,
            ),
            (
                &request.outro_path,
                ArtifactKind::NormalizedOutro,
                "normalized-outro.mp4",
                outro_probe.has_audio,
            ),
        ];
        let mut normalized = Vec::with_capacity(segments.len());
        for (input, kind, name, has_audio) in segments {
            let output = scratch.register(scratch.path(name), kind);
            self.engine
                .run(&EncodeOp::Normalize {
                    input: input.clone(),
                    dims,
                    fps: self.config.frame_rate,
                    pixel_format: self.config.pixel_format.clone(),
                    audio_sample_rate: self.config.audio_sample_rate,
                    ensure_audio: !has_audio,
                    output: output.clone(),
                })
                .map_err(fail(Stage::NormalizeSegments))?;
            normalized.push(output);
        }

        // Concatenate: intro, slides, outro, always in that order.
        let concat_manifest = scratch.register(
            scratch.path("concat.ffconcat"),
            ArtifactKind::ConcatManifest,
        );
        write_concat_manifest(&concat_manifest, &normalized)
            .map_err(fail(Stage::Concatenate))?;
        self.engine
            .run(&EncodeOp::Concat {
                manifest: concat_manifest,
                output: final_output.clone(),
            })
            .map_err(fail(Stage::Concatenate))?;
        if !final_output.is_file() {
            return Err((
                Stage::Concatenate,
                ReelError::MissingOutput(final_output.clone()),
            ));
        }

        Ok(final_output)
    }
}

fn quote_manifest_path(path: &Path) -> String {
    // ffconcat entries are single quoted; embedded quotes close, escape, and
    // reopen the quoting.
    let raw = path.to_string_lossy().replace('\'', "'\\''");
    format!("'{raw}'")
}

/// Write the ffconcat manifest for the silent slide sequence. Every slide is
/// held for `duration_seconds`; the concat demuxer only honors the trailing
/// duration when the last entry is repeated.
fn write_slide_manifest(
    path: &Path,
    slides: &[PathBuf],
    duration_seconds: f64,
) -> Result<(), ReelError> {
    let mut content = String::from("ffconcat version 1.0\n");
    for slide in slides {
        content.push_str(&format!(
            "file {}\nduration {:.3}\n",
            quote_manifest_path(slide),
            duration_seconds
        ));
    }
    if let Some(last) = slides.last() {
        content.push_str(&format!("file {}\n", quote_manifest_path(last)));
    }
    write_manifest_file(path, &content)
}

/// Write the concat manifest naming the normalized segments in their fixed
/// playback order.
fn write_concat_manifest(path: &Path, segments: &[PathBuf]) -> Result<(), ReelError> {
    let mut content = String::from("ffconcat version 1.0\n");
    for segment in segments {
        content.push_str(&format!("file {}\n", quote_manifest_path(segment)));
    }
    write_manifest_file(path, &content)
}

fn write_manifest_file(path: &Path, content: &str) -> Result<(), ReelError> {
    let mut file = fs::File::create(path)
        .with_context(|| format!("Failed to create manifest {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write manifest {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::engine::{Dimensions, MediaProbe};
    use crate::reel::request::{ImageSource, ProductSlideSpec};
    use image::RgbaImage;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Fake collaborator: records probes and ops, writes stub outputs, and
    /// can be told to fail a given op or skip writing an output.
    #[derive(Default)]
    struct FakeEngine {
        probes: HashMap<PathBuf, MediaProbe>,
        fail_op: Option<&'static str>,
        skip_output_for: Option<&'static str>,
        partial_write_for: Option<&'static str>,
        seen_probes: RefCell<Vec<PathBuf>>,
        seen_ops: RefCell<Vec<EncodeOp>>,
        concat_manifest_content: RefCell<Option<String>>,
    }

    impl FakeEngine {
        fn probe_result(width: u32, height: u32, has_audio: bool) -> MediaProbe {
            MediaProbe {
                video: Some(Dimensions { width, height }),
                has_audio,
                duration_seconds: Some(5.0),
            }
        }

        fn op_labels(&self) -> Vec<&'static str> {
            self.seen_ops.borrow().iter().map(|op| op.label()).collect()
        }
    }

    impl MediaEngine for FakeEngine {
        fn probe(&self, path: &Path) -> Result<MediaProbe, ReelError> {
            self.seen_probes.borrow_mut().push(path.to_path_buf());
            self.probes
                .get(path)
                .cloned()
                .ok_or_else(|| ReelError::tool_failure("ffprobe", "unexpected probe"))
        }

        fn run(&self, op: &EncodeOp) -> Result<(), ReelError> {
            self.seen_ops.borrow_mut().push(op.clone());
            if self.partial_write_for == Some(op.label()) {
                fs::write(op.output(), b"partial").unwrap();
                return Err(ReelError::tool_failure("ffmpeg", "died mid-write"));
            }
            if self.fail_op == Some(op.label()) {
                return Err(ReelError::tool_failure("ffmpeg", "synthetic failure"));
            }
            if let EncodeOp::Concat { manifest, .. } = op {
                *self.concat_manifest_content.borrow_mut() =
                    Some(fs::read_to_string(manifest).unwrap());
            }
            if self.skip_output_for != Some(op.label()) {
                fs::write(op.output(), b"stub").unwrap();
            }
            Ok(())
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        config: PipelineConfig,
        request: AssemblyRequest,
    }

    fn fixture(slide_count: usize) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let touch = |name: &str| {
            let p = dir.path().join(name);
            fs::write(&p, b"media").unwrap();
            p
        };
        let photo_path = dir.path().join("photo.png");
        RgbaImage::from_pixel(8, 8, image::Rgba([250, 120, 0, 255]))
            .save(&photo_path)
            .unwrap();

        let slides = (1..=slide_count as u32)
            .map(|rank| ProductSlideSpec {
                name: format!("상품 {rank}"),
                price: "9,900".to_string(),
                rank,
                expedited: rank == 1,
                image: ImageSource::Local(photo_path.clone()),
            })
            .collect();

        let mut config = PipelineConfig::load(None).unwrap();
        config.scratch_base = dir.path().join("scratch");
        config.user_font_dir = Some(dir.path().join("no-user-fonts"));
        config.bundled_font_dir = dir.path().join("no-bundled-fonts");
        config.resource_font_dir = Some(dir.path().join("no-resource-fonts"));
        config.template_path = None;

        let request = AssemblyRequest {
            title: "여름 특가".to_string(),
            intro_path: touch("intro.mp4"),
            outro_path: touch("outro.mp4"),
            music_path: touch("music.mp3"),
            slides,
            output_dir: dir.path().join("out"),
            slide_duration_seconds: 3.0,
            output_base_name: Some("reel".to_string()),
        };
        Fixture {
            _dir: dir,
            config,
            request,
        }
    }

    fn engine_for(fixture: &Fixture) -> FakeEngine {
        let mut probes = HashMap::new();
        probes.insert(
            fixture.request.intro_path.clone(),
            FakeEngine::probe_result(1920, 1080, false),
        );
        probes.insert(
            fixture.request.outro_path.clone(),
            FakeEngine::probe_result(1920, 1080, true),
        );
        FakeEngine {
            probes,
            ..FakeEngine::default()
        }
    }

    fn fonts_available(config: &PipelineConfig) -> bool {
        SlideRenderer::new(
            config,
            Dimensions {
                width: 64,
                height: 36,
            },
        )
        .is_ok()
    }

    fn scratch_runs(config: &PipelineConfig) -> usize {
        match fs::read_dir(&config.scratch_base) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }

    #[test]
    fn full_run_executes_stages_in_order_and_cleans_scratch() {
        let fixture = fixture(2);
        if !fonts_available(&fixture.config) {
            return;
        }
        let engine = engine_for(&fixture);
        let pipeline = AssemblyPipeline::new(&fixture.config, &engine);

        let result = pipeline.run(&fixture.request);
        let PipelineResult::Completed { output_path } = result else {
            panic!("expected success, got {:?}", result);
        };
        assert!(output_path.is_file());
        assert!(output_path.ends_with("out/reel.mp4"));

        assert_eq!(
            engine.op_labels(),
            vec![
                "slide-sequence",
                "mux-audio",
                "normalize",
                "normalize",
                "normalize",
                "concat"
            ]
        );
        // Intro probed first for dimensions, outro probed for audio layout.
        assert_eq!(
            *engine.seen_probes.borrow(),
            vec![
                fixture.request.intro_path.clone(),
                fixture.request.outro_path.clone()
            ]
        );
        assert_eq!(scratch_runs(&fixture.config), 0);
    }

    #[test]
    fn concat_manifest_lists_three_segments_in_fixed_order() {
        let fixture = fixture(3);
        if !fonts_available(&fixture.config) {
            return;
        }
        let engine = engine_for(&fixture);
        let pipeline = AssemblyPipeline::new(&fixture.config, &engine);
        assert!(pipeline.run(&fixture.request).is_success());

        let manifest = engine.concat_manifest_content.borrow().clone().unwrap();
        let files: Vec<&str> = manifest
            .lines()
            .filter(|l| l.starts_with("file "))
            .collect();
        assert_eq!(files.len(), 3);
        assert!(files[0].contains("normalized-intro.mp4"));
        assert!(files[1].contains("normalized-slides.mp4"));
        assert!(files[2].contains("normalized-outro.mp4"));
    }

    #[test]
    fn mux_duration_cap_is_slide_count_times_duration() {
        let fixture = fixture(3);
        if !fonts_available(&fixture.config) {
            return;
        }
        let engine = engine_for(&fixture);
        let pipeline = AssemblyPipeline::new(&fixture.config, &engine);
        assert!(pipeline.run(&fixture.request).is_success());

        let ops = engine.seen_ops.borrow();
        let cap = ops
            .iter()
            .find_map(|op| match op {
                EncodeOp::MuxAudio {
                    duration_cap_seconds,
                    ..
                } => Some(*duration_cap_seconds),
                _ => None,
            })
            .unwrap();
        assert!((cap - 9.0).abs() < 1e-9);
    }

    #[test]
    fn silence_is_added_only_for_segments_without_audio() {
        let fixture = fixture(1);
        if !fonts_available(&fixture.config) {
            return;
        }
        let engine = engine_for(&fixture);
        let pipeline = AssemblyPipeline::new(&fixture.config, &engine);
        assert!(pipeline.run(&fixture.request).is_success());

        let ops = engine.seen_ops.borrow();
        let flags: Vec<bool> = ops
            .iter()
            .filter_map(|op| match op {
                EncodeOp::Normalize { ensure_audio, .. } => Some(*ensure_audio),
                _ => None,
            })
            .collect();
        // Intro probe reported no audio, slide video is muxed, outro has
        // audio.
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn zero_slides_fails_fast_without_engine_calls() {
        let mut fixture = fixture(1);
        fixture.request.slides.clear();
        let engine = engine_for(&fixture);
        let pipeline = AssemblyPipeline::new(&fixture.config, &engine);

        let result = pipeline.run(&fixture.request);
        match result {
            PipelineResult::Failed { stage, error } => {
                assert_eq!(stage, Stage::Init);
                assert!(matches!(error, ReelError::NoSlidesProduced));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(engine.seen_probes.borrow().is_empty());
        assert!(engine.seen_ops.borrow().is_empty());
        assert_eq!(scratch_runs(&fixture.config), 0);
    }

    #[test]
    fn intro_without_video_stream_fails_at_probe() {
        let fixture = fixture(1);
        let mut engine = engine_for(&fixture);
        engine.probes.insert(
            fixture.request.intro_path.clone(),
            MediaProbe {
                video: None,
                has_audio: true,
                duration_seconds: Some(5.0),
            },
        );
        let pipeline = AssemblyPipeline::new(&fixture.config, &engine);

        let result = pipeline.run(&fixture.request);
        match result {
            PipelineResult::Failed { stage, error } => {
                assert_eq!(stage, Stage::ProbeDimensions);
                assert!(matches!(error, ReelError::NoVideoStream(_)));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(engine.seen_ops.borrow().is_empty());
        assert_eq!(scratch_runs(&fixture.config), 0);
    }

    #[test]
    fn missing_photo_fails_render_stage_and_cleans_earlier_slides() {
        let mut fixture = fixture(2);
        if !fonts_available(&fixture.config) {
            return;
        }
        // Second product points at a photo that does not exist; the first
        // slide renders before the batch dies.
        fixture.request.slides[1].image =
            ImageSource::Local(fixture._dir.path().join("gone.png"));
        let engine = engine_for(&fixture);
        let pipeline = AssemblyPipeline::new(&fixture.config, &engine);

        let result = pipeline.run(&fixture.request);
        match result {
            PipelineResult::Failed { stage, error } => {
                assert_eq!(stage, Stage::RenderSlides);
                assert!(matches!(error, ReelError::ImageNotFound(_)));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(engine.seen_ops.borrow().is_empty());
        assert_eq!(scratch_runs(&fixture.config), 0);
    }

    #[test]
    fn mux_failure_aborts_later_stages_and_cleans_up() {
        let fixture = fixture(1);
        if !fonts_available(&fixture.config) {
            return;
        }
        let mut engine = engine_for(&fixture);
        engine.fail_op = Some("mux-audio");
        let pipeline = AssemblyPipeline::new(&fixture.config, &engine);

        let result = pipeline.run(&fixture.request);
        match result {
            PipelineResult::Failed { stage, error } => {
                assert_eq!(stage, Stage::MuxAudio);
                assert!(matches!(error, ReelError::ToolFailure { .. }));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(engine.op_labels(), vec!["slide-sequence", "mux-audio"]);
        assert_eq!(scratch_runs(&fixture.config), 0);
    }

    #[test]
    fn reported_success_with_absent_output_is_missing_output() {
        let fixture = fixture(1);
        if !fonts_available(&fixture.config) {
            return;
        }
        let mut engine = engine_for(&fixture);
        engine.skip_output_for = Some("concat");
        let pipeline = AssemblyPipeline::new(&fixture.config, &engine);

        let result = pipeline.run(&fixture.request);
        match result {
            PipelineResult::Failed { stage, error } => {
                assert_eq!(stage, Stage::Concatenate);
                assert!(matches!(error, ReelError::MissingOutput(_)));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(scratch_runs(&fixture.config), 0);
    }

    #[test]
    fn concat_failure_leaves_no_partial_output() {
        let fixture = fixture(1);
        if !fonts_available(&fixture.config) {
            return;
        }
        let mut engine = engine_for(&fixture);
        engine.partial_write_for = Some("concat");
        let pipeline = AssemblyPipeline::new(&fixture.config, &engine);

        let result = pipeline.run(&fixture.request);
        assert!(!result.is_success());
        let final_path = fixture.request.output_dir.join("reel.mp4");
        assert!(!final_path.exists());
        assert_eq!(scratch_runs(&fixture.config), 0);
    }

    #[test]
    fn slide_manifest_repeats_last_entry_for_trailing_duration() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("slides.ffconcat");
        let slides = vec![
            dir.path().join("slide-01.png"),
            dir.path().join("slide-02.png"),
        ];
        write_slide_manifest(&manifest, &slides, 2.5).unwrap();

        let content = fs::read_to_string(&manifest).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "ffconcat version 1.0");
        assert_eq!(
            content.matches("duration 2.500").count(),
            2,
            "one duration per slide"
        );
        // Last file listed twice: once with a duration, once trailing.
        assert_eq!(content.matches("slide-02.png").count(), 2);
        assert!(lines.last().unwrap().contains("slide-02.png"));
    }

    #[test]
    fn manifest_paths_are_quoted() {
        let quoted = quote_manifest_path(Path::new("/tmp/with space/o'clock.png"));
        assert_eq!(quoted, "'/tmp/with space/o'\\''clock.png'");
    }
}
