use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};
use image::imageops::FilterType;
use image::{RgbaImage, imageops};

use crate::reel::config::PipelineConfig;
use crate::reel::engine::Dimensions;
use crate::reel::error::{ReelError, ReelResult};
use crate::reel::request::ProductSlideSpec;
use crate::ui::prelude::*;

pub mod fonts;
pub mod layout;
mod photo;

use fonts::{FontResolver, FontWeight};
use photo::PhotoFetcher;

// Canvas layout, as fractions of the probed canvas dimensions. Font sizes
// are absolute pixel sizes.
const TEXT_X_FRAC: f32 = 0.03;
const HEADLINE_Y_FRAC: f32 = 0.165;
const HEADLINE_SIZE: f32 = 60.0;
const BADGE_Y_FRAC: f32 = 0.225;
const BADGE_SIZE: f32 = 40.0;
const NAME_SIZE: f32 = 100.0;
const PRICE_Y_FRAC: f32 = 0.85;
const PRICE_SIZE: f32 = 70.0;
const PHOTO_BOX_W_FRAC: f32 = 0.40;
const PHOTO_BOX_H_FRAC: f32 = 0.50;
const PHOTO_LEFT_FRAC: f32 = 0.46;
const PHOTO_TOP_FRAC: f32 = 0.29;

struct TextPainter {
    font: Font,
}

impl TextPainter {
    fn new(bytes: Vec<u8>) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| anyhow!("failed to parse font data: {e}"))?;
        Ok(Self { font })
    }

    fn draw_line(
        &self,
        canvas: &mut RgbaImage,
        x: f32,
        y: f32,
        size: f32,
        text: &str,
        color: [u8; 3],
    ) {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x,
            y,
            ..LayoutSettings::default()
        });
        layout.append(&[&self.font], &TextStyle::new(text, size, 0));

        for glyph in layout.glyphs() {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (_, coverage) = self.font.rasterize_config(glyph.key);
            blend_glyph(
                canvas,
                glyph.x.round() as i32,
                glyph.y.round() as i32,
                glyph.width,
                glyph.height,
                &coverage,
                color,
            );
        }
    }
}

fn blend_glyph(
    canvas: &mut RgbaImage,
    origin_x: i32,
    origin_y: i32,
    glyph_w: usize,
    glyph_h: usize,
    coverage: &[u8],
    color: [u8; 3],
) {
    let (canvas_w, canvas_h) = canvas.dimensions();
    for gy in 0..glyph_h {
        let py = origin_y + gy as i32;
        if py < 0 || py >= canvas_h as i32 {
            continue;
        }
        for gx in 0..glyph_w {
            let px = origin_x + gx as i32;
            if px < 0 || px >= canvas_w as i32 {
                continue;
            }
            let cov = coverage[gy * glyph_w + gx] as u16;
            if cov == 0 {
                continue;
            }
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            for channel in 0..3 {
                let dst = pixel.0[channel] as u16;
                let src = color[channel] as u16;
                pixel.0[channel] = ((dst * (255 - cov) + src * cov + 127) / 255) as u8;
            }
            pixel.0[3] = 255;
        }
    }
}

/// Renders one finished slide image per product: background canvas, product
/// photo, headline, wrapped name block, and price line.
pub struct SlideRenderer {
    dims: Dimensions,
    background: RgbaImage,
    headline: TextPainter,
    name: TextPainter,
    price: TextPainter,
    fetcher: PhotoFetcher,
    headline_rgb: [u8; 3],
    name_rgb: [u8; 3],
    price_rgb: [u8; 3],
    badge_rgb: [u8; 3],
    expedited_label: String,
}

impl SlideRenderer {
    pub fn new(config: &PipelineConfig, dims: Dimensions) -> Result<Self> {
        let background = build_background(config, dims)?;
        let resolver = FontResolver::from_config(config);

        let load_painter = |weight: FontWeight| -> Result<TextPainter> {
            let resolved = resolver.resolve(weight)?;
            if let fonts::FontOrigin::SystemFallback(family) = &resolved.origin {
                emit(
                    Level::Warn,
                    "reel.fonts.fallback",
                    &format!(
                        "No {:?} face for '{}' in any font directory; using system '{}'",
                        weight, config.font_family, family
                    ),
                    None,
                );
            }
            TextPainter::new(resolved.bytes)
        };

        Ok(Self {
            dims,
            background,
            headline: load_painter(FontWeight::Bold)?,
            name: load_painter(FontWeight::Black)?,
            price: load_painter(FontWeight::Medium)?,
            fetcher: PhotoFetcher::new(config.http_timeout)?,
            headline_rgb: config.headline_rgb,
            name_rgb: config.name_rgb,
            price_rgb: config.price_rgb,
            badge_rgb: config.badge_rgb,
            expedited_label: config.expedited_label.clone(),
        })
    }

    /// Render every product sequentially, staging each image in a scratch
    /// directory before copying it into `dest_dir`. The staging directory is
    /// removed when this returns, success or not.
    pub fn render_batch(
        &self,
        title: &str,
        slides: &[ProductSlideSpec],
        dest_dir: &Path,
    ) -> ReelResult<Vec<PathBuf>> {
        fs::create_dir_all(dest_dir)
            .with_context(|| format!("Failed to create slide directory {}", dest_dir.display()))?;
        let staging = tempfile::Builder::new()
            .prefix("promoreel-slides-")
            .tempdir()
            .context("Failed to create slide staging directory")?;

        let mut rendered = Vec::with_capacity(slides.len());
        for spec in slides {
            let canvas = self.render_slide(title, spec)?;
            let file_name = format!("slide-{:02}-{:08x}.png", spec.rank, rand::random::<u32>());
            let staged = staging.path().join(&file_name);
            canvas
                .save(&staged)
                .with_context(|| format!("Failed to write slide image {}", staged.display()))?;

            let final_path = dest_dir.join(&file_name);
            fs::copy(&staged, &final_path).with_context(|| {
                format!("Failed to copy slide image to {}", final_path.display())
            })?;
            let _ = fs::remove_file(&staged);
            rendered.push(final_path);
        }
        // `staging` drops here and removes any leftovers even on the error
        // path above.
        Ok(rendered)
    }

    pub fn render_slide(&self, title: &str, spec: &ProductSlideSpec) -> ReelResult<RgbaImage> {
        let mut canvas = self.background.clone();
        let width = self.dims.width as f32;
        let height = self.dims.height as f32;
        let text_x = width * TEXT_X_FRAC;

        self.composite_photo(&mut canvas, spec)?;

        self.headline.draw_line(
            &mut canvas,
            text_x,
            height * HEADLINE_Y_FRAC,
            HEADLINE_SIZE,
            title,
            self.headline_rgb,
        );

        if spec.expedited {
            self.price.draw_line(
                &mut canvas,
                text_x,
                height * BADGE_Y_FRAC,
                BADGE_SIZE,
                &self.expedited_label,
                self.badge_rgb,
            );
        }

        let lines = layout::wrap_product_name(&spec.name);
        let positions = layout::name_line_positions(lines.len(), NAME_SIZE, self.dims.height);
        for (line, y) in lines.iter().zip(positions) {
            self.name
                .draw_line(&mut canvas, text_x, y, NAME_SIZE, line, self.name_rgb);
        }

        let price_text = format!("가격: {}원", spec.price);
        self.price.draw_line(
            &mut canvas,
            text_x,
            height * PRICE_Y_FRAC,
            PRICE_SIZE,
            &price_text,
            self.price_rgb,
        );

        Ok(canvas)
    }

    fn composite_photo(&self, canvas: &mut RgbaImage, spec: &ProductSlideSpec) -> ReelResult<()> {
        let photo = self.fetcher.load(&spec.image)?;
        let (photo_w, photo_h) = photo.dimensions();
        if photo_w == 0 || photo_h == 0 {
            return Err(ReelError::Other(anyhow!(
                "product photo {} has zero dimensions",
                spec.image.describe()
            )));
        }

        let box_w = (self.dims.width as f32 * PHOTO_BOX_W_FRAC).round();
        let box_h = (self.dims.height as f32 * PHOTO_BOX_H_FRAC).round();
        let scale = (box_w / photo_w as f32).min(box_h / photo_h as f32);
        let scaled_w = ((photo_w as f32 * scale).round() as u32).max(1);
        let scaled_h = ((photo_h as f32 * scale).round() as u32).max(1);
        let resized = imageops::resize(&photo, scaled_w, scaled_h, FilterType::Lanczos3);

        // Contain: aspect is preserved, the unused part of the box stays
        // transparent, so centering inside the box is the composite.
        let box_x = self.dims.width as f32 * PHOTO_LEFT_FRAC;
        let box_y = self.dims.height as f32 * PHOTO_TOP_FRAC;
        let offset_x = (box_x + (box_w - scaled_w as f32) / 2.0).round() as i64;
        let offset_y = (box_y + (box_h - scaled_h as f32) / 2.0).round() as i64;
        imageops::overlay(canvas, &resized, offset_x, offset_y);
        Ok(())
    }
}

fn build_background(config: &PipelineConfig, dims: Dimensions) -> Result<RgbaImage> {
    match &config.template_path {
        Some(path) => {
            let template = image::open(path)
                .with_context(|| format!("Failed to load template image {}", path.display()))?;
            Ok(imageops::resize(
                &template.to_rgba8(),
                dims.width,
                dims.height,
                FilterType::Lanczos3,
            ))
        }
        None => {
            let [r, g, b] = config.background_rgb;
            Ok(RgbaImage::from_pixel(
                dims.width,
                dims.height,
                image::Rgba([r, g, b, 255]),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::request::ImageSource;

    fn test_config(dir: &Path) -> PipelineConfig {
        let mut config = PipelineConfig::load(None).unwrap();
        // Avoid machine-dependent font directories in tests; fall back to a
        // system face through an empty search path.
        config.user_font_dir = Some(dir.join("no-user-fonts"));
        config.bundled_font_dir = dir.join("no-bundled-fonts");
        config.resource_font_dir = Some(dir.join("no-resource-fonts"));
        config.template_path = None;
        config
    }

    fn dims() -> Dimensions {
        Dimensions {
            width: 640,
            height: 360,
        }
    }

    fn sample_spec(dir: &Path) -> ProductSlideSpec {
        let photo_path = dir.join("photo.png");
        let photo = RgbaImage::from_pixel(100, 50, image::Rgba([200, 40, 40, 255]));
        photo.save(&photo_path).unwrap();
        ProductSlideSpec {
            name: "무선 선풍기".to_string(),
            price: "19,900".to_string(),
            rank: 1,
            expedited: true,
            image: ImageSource::Local(photo_path),
        }
    }

    fn renderer_or_skip(config: &PipelineConfig) -> Option<SlideRenderer> {
        // Hosts without any system font cannot rasterize text at all.
        SlideRenderer::new(config, dims()).ok()
    }

    #[test]
    fn flat_background_fills_canvas() {
        let config = PipelineConfig::load(None).unwrap();
        let background = build_background(&config, dims()).unwrap();
        assert_eq!(background.dimensions(), (640, 360));
        let [r, g, b] = config.background_rgb;
        assert_eq!(background.get_pixel(0, 0).0, [r, g, b, 255]);
    }

    #[test]
    fn rendered_slide_differs_from_background() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let Some(renderer) = renderer_or_skip(&config) else {
            return;
        };
        let spec = sample_spec(dir.path());

        let slide = renderer.render_slide("베스트 5", &spec).unwrap();
        assert_eq!(slide.dimensions(), (640, 360));
        assert_ne!(slide.as_raw(), renderer.background.as_raw());

        // A point inside the composited photo (clear of every text row) must
        // carry photo color, not background. The 100x50 photo scales to
        // 256x128 and lands at y 130..258 inside the 294..550 box.
        assert_eq!(slide.get_pixel(500, 140).0, [200, 40, 40, 255]);
    }

    #[test]
    fn batch_produces_one_file_per_product_and_cleans_staging() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let Some(renderer) = renderer_or_skip(&config) else {
            return;
        };

        let mut second = sample_spec(dir.path());
        second.rank = 2;
        second.expedited = false;
        let slides = vec![sample_spec(dir.path()), second];

        let dest = dir.path().join("slides");
        let rendered = renderer.render_batch("타이틀", &slides, &dest).unwrap();
        assert_eq!(rendered.len(), 2);
        for (spec, path) in slides.iter().zip(&rendered) {
            assert!(path.is_file());
            assert!(
                path.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .starts_with(&format!("slide-{:02}-", spec.rank))
            );
        }
        // Unique ids: two invocations never collide.
        assert_ne!(rendered[0], rendered[1]);
    }

    #[test]
    fn batch_fails_on_first_missing_photo() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let Some(renderer) = renderer_or_skip(&config) else {
            return;
        };

        let mut broken = sample_spec(dir.path());
        broken.image = ImageSource::Local(dir.path().join("missing.png"));
        let slides = vec![broken];

        let dest = dir.path().join("slides");
        let result = renderer.render_batch("타이틀", &slides, &dest);
        assert!(matches!(result, Err(ReelError::ImageNotFound(_))));
    }
}
