use chrono::{TimeZone, Utc};
use image::{DynamicImage, ImageBuffer, Rgb as Pixel};
use std::path::{Path, PathBuf};

use crate::error::{RenderError, Result};
use crate::pdf::fonts::FontFace;
use crate::pdf::{Canvas, ImageAsset, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use crate::record::{
    CertificateRecord, Collection, CourseMetadata, CourseProgramItem, Level, Material, Owner,
    School, Skill, Talent,
};
use crate::storage::CertificateAssets;

/// Every glyph is half the font size wide.
pub const GLYPH_WIDTH_RATIO: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct TextCall {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font: String,
    pub size: u8,
    pub color: Rgb,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageCall {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub name: String,
    pub luma: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineCall {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub weight: f64,
}

/// Canvas that records draw calls and measures with fixed glyph widths.
#[derive(Default)]
pub struct RecordingCanvas {
    fonts: Vec<String>,
    current: Option<(String, u8)>,
    texts: Vec<TextCall>,
    images: Vec<ImageCall>,
    lines: Vec<LineCall>,
    fail_image: Option<String>,
    serialized: Option<PathBuf>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_certificate_fonts() -> Self {
        FontFace::ALL
            .iter()
            .fold(Self::new(), |canvas, face| canvas.with_font(face.name()))
    }

    pub fn with_font(mut self, name: &str) -> Self {
        self.fonts.push(name.to_string());
        self
    }

    /// Makes drawing the image called `name` fail.
    pub fn failing_image(mut self, name: &str) -> Self {
        self.fail_image = Some(name.to_string());
        self
    }

    pub fn texts(&self) -> &[TextCall] {
        &self.texts
    }

    pub fn text(&self, text: &str) -> Option<&TextCall> {
        self.texts.iter().find(|t| t.text == text)
    }

    pub fn images(&self) -> &[ImageCall] {
        &self.images
    }

    pub fn lines(&self) -> &[LineCall] {
        &self.lines
    }

    pub fn serialized(&self) -> Option<&Path> {
        self.serialized.as_deref()
    }

    fn current(&self) -> Result<&(String, u8)> {
        self.current
            .as_ref()
            .ok_or_else(|| RenderError::Measurement("no font selected".to_string()))
    }
}

impl Canvas for RecordingCanvas {
    fn page_width(&self) -> f64 {
        PAGE_WIDTH
    }

    fn page_height(&self) -> f64 {
        PAGE_HEIGHT
    }

    fn register_font(&mut self, name: &str, _file: &Path) -> Result<()> {
        self.fonts.push(name.to_string());
        Ok(())
    }

    fn set_font(&mut self, name: &str, size: u8) -> Result<()> {
        if !self.fonts.iter().any(|f| f == name) {
            return Err(RenderError::asset(name, "font is not registered"));
        }
        self.current = Some((name.to_string(), size));
        Ok(())
    }

    fn measure_text_width(&self, text: &str) -> Result<f64> {
        let (_, size) = self.current()?;
        Ok(text.chars().count() as f64 * f64::from(*size) * GLYPH_WIDTH_RATIO)
    }

    fn draw_text_at(&mut self, x: f64, y: f64, text: &str, color: Rgb) -> Result<()> {
        let width = self.measure_text_width(text)?;
        let (font, size) = self.current()?.clone();
        self.texts.push(TextCall {
            x,
            y,
            text: text.to_string(),
            font,
            size,
            color,
            width,
        });
        Ok(())
    }

    fn draw_image_at(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        image: &ImageAsset,
    ) -> Result<()> {
        if self.fail_image.as_deref() == Some(image.name()) {
            return Err(RenderError::draw(image.name(), "refused by test canvas"));
        }
        self.images.push(ImageCall {
            x,
            y,
            width,
            height,
            name: image.name().to_string(),
            luma: image.image().to_luma8().into_raw(),
        });
        Ok(())
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, weight: f64) -> Result<()> {
        self.lines.push(LineCall {
            x1,
            y1,
            x2,
            y2,
            weight,
        });
        Ok(())
    }

    fn serialize(&mut self, path: &Path) -> Result<PathBuf> {
        let body: Vec<_> = self.texts.iter().map(|t| t.text.as_str()).collect();
        std::fs::write(path, body.join("\n")).map_err(|e| RenderError::Serialization {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.serialized = Some(path.to_path_buf());
        Ok(path.to_path_buf())
    }
}

pub fn level(proficiency: i32, name: &str, outcome: &str) -> Level {
    Level {
        id: format!("level-{proficiency}"),
        image_url: String::new(),
        learning_outcome: outcome.to_string(),
        name: name.to_string(),
        proficiency,
        updated_at: Some(Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap().fixed_offset()),
    }
}

fn base_record(collection: Collection) -> CertificateRecord {
    CertificateRecord {
        id: "cert-1".into(),
        user_id: "user-1".into(),
        school_id: "school-1".into(),
        material_id: "material-1".into(),
        collection,
        collection_id: None,
        reference_number: "REF123".into(),
        metadata: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap().fixed_offset(),
        updated_at: None,
        valid_from: None,
        valid_until: None,
        material: Material {
            id: "material-1".into(),
            status: "active".into(),
            signature: Some("https://cdn.example.com/signature.png".into()),
            owner: Owner {
                first_name: "Ada".into(),
                last_name: "Lee".into(),
                job_title: "Head of Learning".into(),
                ..Owner::default()
            },
            school: School {
                id: "school-1".into(),
                name: "Green School".into(),
                logo: "https://cdn.example.com/logo.png".into(),
                ..School::default()
            },
        },
        talent: Talent {
            full_name: "Jane Doe".into(),
            ..Talent::default()
        },
        course: None,
        program: None,
    }
}

pub fn course_record() -> CertificateRecord {
    let mut record = base_record(Collection::Course);
    record.course = Some(CourseProgramItem {
        id: "course-1".into(),
        name: "Solar Energy Basics".into(),
        skills: Vec::new(),
    });
    record.metadata = Some(CourseMetadata {
        course_id: "course-1".into(),
        green_skill_id: "gs-1".into(),
        name: "Solar Energy Basics".into(),
        levels: vec![
            level(1, "beginner", "<b>Explain</b> how photovoltaic cells work"),
            level(2, "intermediate", "Size a residential <i>solar</i> array"),
        ],
    });
    record
}

pub fn program_record() -> CertificateRecord {
    let mut record = base_record(Collection::Program);
    record.program = Some(CourseProgramItem {
        id: "program-1".into(),
        name: "Renewable Grid Program".into(),
        skills: ["Solar Design", "Grid Analysis"]
            .iter()
            .map(|name| Skill {
                id: name.to_lowercase(),
                name: name.to_string(),
            })
            .collect(),
    });
    record
}

fn solid(name: &str, width: u32, height: u32) -> ImageAsset {
    ImageAsset::new(
        name,
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Pixel([40, 120, 60]))),
    )
}

pub fn assets() -> CertificateAssets {
    CertificateAssets {
        logo: solid("logo.png", 400, 200),
        signature: Some(solid("signature.png", 300, 100)),
        watermark: solid("watermark.png", 70, 60),
        qr_code: crate::qr::encode("https://web.example.com/public-preview-certif/REF123")
            .unwrap(),
    }
}

/// A TrueType font from the usual system locations, if one is installed.
pub fn find_system_font() -> Option<PathBuf> {
    let candidates = [
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
    ];
    candidates.iter().map(PathBuf::from).find(|p| p.exists())
}
