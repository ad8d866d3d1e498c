use std::path::Path;
use tracing::debug;

use super::Canvas;
use crate::error::Result;

/// Font faces the certificate layout draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    KodchasanRegular,
    KodchasanSemiBold,
    SenRegular,
    RammettoOneRegular,
    SofiaRegular,
}

impl FontFace {
    pub const ALL: [FontFace; 5] = [
        FontFace::KodchasanRegular,
        FontFace::KodchasanSemiBold,
        FontFace::SenRegular,
        FontFace::RammettoOneRegular,
        FontFace::SofiaRegular,
    ];

    /// Name the face is registered under on the canvas.
    pub fn name(self) -> &'static str {
        match self {
            FontFace::KodchasanRegular => "kodchasan_regular",
            FontFace::KodchasanSemiBold => "kodchasan_semibold",
            FontFace::SenRegular => "sen_regular",
            FontFace::RammettoOneRegular => "rammettoone_regular",
            FontFace::SofiaRegular => "sofia_regular",
        }
    }

    /// Path of the TrueType file relative to the fonts directory.
    pub fn file(self) -> &'static str {
        match self {
            FontFace::KodchasanRegular => "kodchasan/Regular.ttf",
            FontFace::KodchasanSemiBold => "kodchasan/SemiBold.ttf",
            FontFace::SenRegular => "sen/Regular.ttf",
            FontFace::RammettoOneRegular => "rammettoone/Regular.ttf",
            FontFace::SofiaRegular => "sofia/Regular.ttf",
        }
    }
}

/// Registers every face in [`FontFace::ALL`] from `fonts_dir`.
pub fn register_all(canvas: &mut dyn Canvas, fonts_dir: &Path) -> Result<()> {
    for face in FontFace::ALL {
        let file = fonts_dir.join(face.file());
        debug!("Registering font {} from {}", face.name(), file.display());
        canvas.register_font(face.name(), &file)?;
    }
    Ok(())
}
