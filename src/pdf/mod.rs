// Certificate canvas: positioned text, images and lines on one landscape page.
// The genpdf-backed implementation lives in `document`.
mod document;
pub mod fonts;

pub use document::PdfCanvas;

use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A4 landscape, in points.
pub const PAGE_WIDTH: f64 = 841.89;
pub const PAGE_HEIGHT: f64 = 595.28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

/// A decoded image ready to be placed on the page.
#[derive(Clone)]
pub struct ImageAsset {
    name: String,
    image: DynamicImage,
}

impl ImageAsset {
    pub fn new(name: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Natural size in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

impl std::fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (w, h) = self.dimensions();
        f.debug_struct("ImageAsset")
            .field("name", &self.name)
            .field("width", &w)
            .field("height", &h)
            .finish()
    }
}

/// Drawing surface for a single page. Origin is the top-left corner, units are
/// points, and `y` of a text call is the top of its line box.
pub trait Canvas {
    fn page_width(&self) -> f64;

    fn page_height(&self) -> f64;

    /// Loads a TrueType file and makes it selectable under `name`.
    fn register_font(&mut self, name: &str, file: &Path) -> Result<()>;

    fn set_font(&mut self, name: &str, size: u8) -> Result<()>;

    /// Width of `text` in the current font.
    fn measure_text_width(&self, text: &str) -> Result<f64>;

    fn draw_text_at(&mut self, x: f64, y: f64, text: &str, color: Rgb) -> Result<()>;

    fn draw_image_at(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        image: &ImageAsset,
    ) -> Result<()>;

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, weight: f64) -> Result<()>;

    /// Writes the page to `path` and returns where it landed.
    fn serialize(&mut self, path: &Path) -> Result<PathBuf>;

    /// Draws `text` horizontally centered at `y` and returns `(x, width)` so
    /// callers can anchor underlines without measuring again.
    fn center_text(
        &mut self,
        text: &str,
        font: &str,
        size: u8,
        y: f64,
        color: Rgb,
    ) -> Result<(f64, f64)> {
        self.set_font(font, size)?;
        let width = self.measure_text_width(text)?;
        let x = (self.page_width() - width) / 2.0;
        self.draw_text_at(x, y, text, color)?;
        Ok((x, width))
    }
}
