use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::reel::config::PipelineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Medium,
    Bold,
    Black,
}

impl FontWeight {
    fn file_suffix(self) -> &'static str {
        match self {
            FontWeight::Regular => "Regular",
            FontWeight::Medium => "Medium",
            FontWeight::Bold => "Bold",
            FontWeight::Black => "Black",
        }
    }

    fn db_weight(self) -> fontdb::Weight {
        match self {
            FontWeight::Regular => fontdb::Weight::NORMAL,
            FontWeight::Medium => fontdb::Weight::MEDIUM,
            FontWeight::Bold => fontdb::Weight::BOLD,
            FontWeight::Black => fontdb::Weight::BLACK,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FontOrigin {
    /// Found as a concrete file in one of the search directories.
    Directory(PathBuf),
    /// No configured file existed; a system sans-serif face was substituted.
    SystemFallback(String),
}

#[derive(Debug, Clone)]
pub struct ResolvedFont {
    pub bytes: Vec<u8>,
    pub origin: FontOrigin,
}

impl ResolvedFont {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, FontOrigin::SystemFallback(_))
    }
}

/// Resolves a weight identifier to concrete font data by checking, in order,
/// the user-profile font directory, the application-bundled directory, and
/// the packaged-resource directory. The first existing file wins; when none
/// exists the system default sans-serif is substituted instead of failing.
pub struct FontResolver {
    family: String,
    search_dirs: Vec<PathBuf>,
}

impl FontResolver {
    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut search_dirs = Vec::new();
        if let Some(user_dir) = &config.user_font_dir {
            search_dirs.push(user_dir.clone());
        }
        search_dirs.push(config.bundled_font_dir.clone());
        if let Some(resource_dir) = &config.resource_font_dir {
            search_dirs.push(resource_dir.clone());
        }
        Self {
            family: config.font_family.clone(),
            search_dirs,
        }
    }

    pub fn resolve(&self, weight: FontWeight) -> Result<ResolvedFont> {
        for dir in &self.search_dirs {
            for ext in ["ttf", "otf"] {
                let candidate = dir.join(format!("{}-{}.{ext}", self.family, weight.file_suffix()));
                if candidate.is_file() {
                    let bytes = fs::read(&candidate).with_context(|| {
                        format!("Failed to read font file {}", candidate.display())
                    })?;
                    return Ok(ResolvedFont {
                        bytes,
                        origin: FontOrigin::Directory(candidate),
                    });
                }
            }
        }
        self.system_fallback(weight)
    }

    fn system_fallback(&self, weight: FontWeight) -> Result<ResolvedFont> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let weighted = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            weight: weight.db_weight(),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let any_weight = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = db
            .query(&weighted)
            .or_else(|| db.query(&any_weight))
            .ok_or_else(|| anyhow!("no system sans-serif font available"))?;

        let family = db
            .face(id)
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| "sans-serif".to_string());
        let bytes = db
            .with_face_data(id, |data, _| data.to_vec())
            .ok_or_else(|| anyhow!("failed to load system font data for {family}"))?;

        Ok(ResolvedFont {
            bytes,
            origin: FontOrigin::SystemFallback(family),
        })
    }
}
