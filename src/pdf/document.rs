// genpdf lays out flowing elements, so absolute placement goes through one
// custom element that replays the recorded draw calls onto the page area.
use genpdf::elements::Image;
use genpdf::fonts::{Font, FontCache, FontData, FontFamily};
use genpdf::render::Area;
use genpdf::style::{Color, Style};
use genpdf::{Context, Element, Mm, Position, RenderResult, Scale, Size};
use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{Canvas, ImageAsset, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::{RenderError, Result};

const MM_PER_PT: f64 = 25.4 / 72.0;
const IMAGE_DPI: f64 = 300.0;

fn pt_to_mm(pt: f64) -> Mm {
    Mm::from(pt * MM_PER_PT)
}

#[derive(Clone)]
enum DrawOp {
    Text {
        x: f64,
        y: f64,
        text: String,
        style: Style,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        image: DynamicImage,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
    },
}

struct RegisteredFont {
    name: String,
    data: FontFamily<FontData>,
    handle: FontFamily<Font>,
}

/// [`Canvas`] that writes a single A4 landscape PDF page through genpdf.
pub struct PdfCanvas {
    title: String,
    fonts: Vec<RegisteredFont>,
    // Mirrors the document's font cache so text can be measured before the
    // page is rendered. Registration order must match the replay order.
    font_cache: Option<FontCache>,
    current: Option<Style>,
    ops: Vec<DrawOp>,
}

impl PdfCanvas {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fonts: Vec::new(),
            font_cache: None,
            current: None,
            ops: Vec::new(),
        }
    }

    fn current_style(&self) -> Result<&Style> {
        self.current
            .as_ref()
            .ok_or_else(|| RenderError::Measurement("no font selected".to_string()))
    }

    fn check_point(&self, step: &str, x: f64, y: f64) -> Result<()> {
        if !(0.0..=PAGE_WIDTH).contains(&x) || !(0.0..=PAGE_HEIGHT).contains(&y) {
            return Err(RenderError::draw(
                step,
                format!("({x:.1}, {y:.1}) is outside the page"),
            ));
        }
        Ok(())
    }
}

fn single_face_family(data: FontData) -> FontFamily<FontData> {
    FontFamily {
        regular: data.clone(),
        bold: data.clone(),
        italic: data.clone(),
        bold_italic: data,
    }
}

impl Canvas for PdfCanvas {
    fn page_width(&self) -> f64 {
        PAGE_WIDTH
    }

    fn page_height(&self) -> f64 {
        PAGE_HEIGHT
    }

    fn register_font(&mut self, name: &str, file: &Path) -> Result<()> {
        let bytes = std::fs::read(file)
            .map_err(|e| RenderError::asset(name, format!("{}: {}", file.display(), e)))?;
        let data = FontData::new(bytes, None)
            .map_err(|e| RenderError::asset(name, format!("{}: {}", file.display(), e)))?;
        let family = single_face_family(data);

        let handle = match self.font_cache.as_mut() {
            Some(cache) => cache.add_font_family(family.clone()),
            None => {
                let mut cache = FontCache::new(family.clone());
                let handle = cache.add_font_family(family.clone());
                self.font_cache = Some(cache);
                handle
            }
        };
        self.fonts.push(RegisteredFont {
            name: name.to_string(),
            data: family,
            handle,
        });
        debug!("Registered font {}", name);
        Ok(())
    }

    fn set_font(&mut self, name: &str, size: u8) -> Result<()> {
        let font = self
            .fonts
            .iter()
            .rev()
            .find(|f| f.name == name)
            .ok_or_else(|| RenderError::asset(name, "font is not registered"))?;
        self.current = Some(
            Style::new()
                .with_font_family(font.handle.clone())
                .with_font_size(size),
        );
        Ok(())
    }

    fn measure_text_width(&self, text: &str) -> Result<f64> {
        let style = self.current_style()?;
        let cache = self
            .font_cache
            .as_ref()
            .ok_or_else(|| RenderError::Measurement("no fonts registered".to_string()))?;
        Ok(f64::from(style.str_width(cache, text)) / MM_PER_PT)
    }

    fn draw_text_at(&mut self, x: f64, y: f64, text: &str, color: Rgb) -> Result<()> {
        self.check_point("text", x, y)?;
        let Rgb(r, g, b) = color;
        let style = self.current_style()?.clone().with_color(Color::Rgb(r, g, b));
        // The whole line box has to fit, not just its top-left corner.
        if let Some(cache) = self.font_cache.as_ref() {
            let line_height = f64::from(style.line_height(cache)) / MM_PER_PT;
            if y + line_height > PAGE_HEIGHT {
                return Err(RenderError::draw(
                    "text",
                    format!("{text:?} at y {y:.1} runs past the page bottom"),
                ));
            }
        }
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            style,
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
        self.check_point(image.name(), x, y)?;
        self.check_point(image.name(), x + width, y + height)?;
        let (px_w, px_h) = image.dimensions();
        if px_w == 0 || px_h == 0 {
            return Err(RenderError::draw(image.name(), "image has no pixels"));
        }
        // genpdf rejects images with an alpha channel.
        let image = DynamicImage::ImageRgb8(image.image().to_rgb8());
        self.ops.push(DrawOp::Image {
            x,
            y,
            width,
            height,
            image,
        });
        Ok(())
    }

    /// genpdf strokes every line at its default thickness, so `weight` only
    /// reaches canvases that can honor it.
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, _weight: f64) -> Result<()> {
        self.check_point("line", x1, y1)?;
        self.check_point("line", x2, y2)?;
        self.ops.push(DrawOp::Line {
            from: (x1, y1),
            to: (x2, y2),
        });
        Ok(())
    }

    fn serialize(&mut self, path: &Path) -> Result<PathBuf> {
        let serialization = |reason: String| RenderError::Serialization {
            path: path.to_path_buf(),
            reason,
        };
        let first = self
            .fonts
            .first()
            .ok_or_else(|| serialization("no fonts registered".to_string()))?;

        let mut doc = genpdf::Document::new(first.data.clone());
        for font in &self.fonts {
            doc.add_font_family(font.data.clone());
        }
        doc.set_title(self.title.clone());
        doc.set_paper_size(Size::new(pt_to_mm(PAGE_WIDTH), pt_to_mm(PAGE_HEIGHT)));
        doc.push(PageOps {
            ops: self.ops.clone(),
        });

        // Render into memory first so a failed render never leaves a file behind.
        let mut buf = Vec::new();
        doc.render(&mut buf).map_err(|e| serialization(e.to_string()))?;
        std::fs::write(path, &buf).map_err(|e| serialization(e.to_string()))?;
        info!("Wrote {} ({} bytes)", path.display(), buf.len());
        Ok(path.to_path_buf())
    }
}

struct PageOps {
    ops: Vec<DrawOp>,
}

impl Element for PageOps {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        style: Style,
    ) -> std::result::Result<RenderResult, genpdf::error::Error> {
        for op in &self.ops {
            match op {
                DrawOp::Text { x, y, text, style } => {
                    let position = Position::new(pt_to_mm(*x), pt_to_mm(*y));
                    if !area.print_str(&context.font_cache, position, style.clone(), text)? {
                        return Err(genpdf::error::Error::new(
                            format!("text {text:?} does not fit at ({x:.1}, {y:.1})"),
                            genpdf::error::ErrorKind::PageSizeExceeded,
                        ));
                    }
                }
                DrawOp::Image {
                    x,
                    y,
                    width,
                    height,
                    image,
                } => {
                    let (px_w, px_h) = image.dimensions();
                    let native_mm = |px: u32| f64::from(px) * 25.4 / IMAGE_DPI;
                    let scale = Scale::new(
                        f64::from(pt_to_mm(*width)) / native_mm(px_w),
                        f64::from(pt_to_mm(*height)) / native_mm(px_h),
                    );
                    let mut element = Image::from_dynamic_image(image.clone())?
                        .with_position(Position::new(pt_to_mm(*x), pt_to_mm(*y)))
                        .with_scale(scale)
                        .with_dpi(IMAGE_DPI);
                    element.render(context, area.clone(), style.clone())?;
                }
                DrawOp::Line { from, to } => {
                    area.draw_line(
                        vec![
                            Position::new(pt_to_mm(from.0), pt_to_mm(from.1)),
                            Position::new(pt_to_mm(to.0), pt_to_mm(to.1)),
                        ],
                        Style::new(),
                    );
                }
            }
        }
        Ok(RenderResult {
            size: area.size(),
            has_more: false,
        })
    }
}
