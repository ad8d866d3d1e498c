// Certificate page layout. Each region takes the running `y` cursor and
// returns where the next region starts.
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::Result;
use crate::layout::{fit_into_box, TableLayout};
use crate::pdf::fonts::{self, FontFace};
use crate::pdf::{Canvas, ImageAsset, Rgb};
use crate::record::{CertificateBody, CertificateRecord, Collection};
use crate::state::RenderContext;
use crate::storage::CertificateAssets;

const TITLE: &str = "C E R T I F I C A T E   O F   C O M P L E T I O N";
const TITLE_COLOR: Rgb = Rgb(150, 111, 2);
const LEVELS_LABEL: &str = "Completed proficiency levels and associated knowledge:";
const QR_CAPTION: &str = "Online Version";

const LOGO_TOP: f64 = 30.0;
const LOGO_BOX: (f64, f64) = (200.0, 130.0);
const LOGO_GAP: f64 = 20.0;

// Offsets from the top of the heading block.
const SUBTITLE_Y: f64 = 20.0;
const NAME_Y: f64 = 50.0;
const NAME_UNDERLINE_Y: f64 = 22.0;
const COMPLETED_Y: f64 = 80.0;
const COURSE_TITLE_Y: f64 = 115.0;
const DESCRIPTION_Y: f64 = 145.0;
const BODY_Y: f64 = 170.0;
const TABLE_Y: f64 = 185.0;

const LINE_WEIGHT: f64 = 0.5;
const FOOTER_GAP: f64 = 15.0;
const SIGNATURE_BOX: f64 = 74.0;
// Horizontal offsets from the left edge of the logo.
const SIGNATURE_X: f64 = -230.0;
const SIGNATORY_X: f64 = -250.0;
const SIGNATURE_LINE_END_X: f64 = -200.0;
const WATERMARK_X: f64 = 10.0;
const WATERMARK_SIZE: (f64, f64) = (70.0, 60.0);
const QR_X: f64 = 260.0;
const QR_CAPTION_X: f64 = 255.0;
const QR_SIZE: f64 = 64.0;
const CAPTION_Y: f64 = 95.0;

/// Where the logo landed; the footer is anchored on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoPlacement {
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

/// Output of the heading region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading {
    /// Measured width of the talent name, reused for the signature underline.
    pub name_width: f64,
}

/// Lays out a whole certificate on a canvas and writes it to the output directory.
pub struct CertificateComposer<'a> {
    ctx: &'a RenderContext,
    table: TableLayout,
}

impl<'a> CertificateComposer<'a> {
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self {
            ctx,
            table: TableLayout::new(ctx.level_layout),
        }
    }

    /// Renders `record` and returns the path of the written document.
    pub fn render(
        &self,
        canvas: &mut dyn Canvas,
        record: &CertificateRecord,
        assets: &CertificateAssets,
    ) -> Result<PathBuf> {
        let stem = record.file_stem()?;
        let body = record.body()?;
        info!(
            "Rendering {} certificate {} for {}",
            record.collection, record.reference_number, record.talent.full_name
        );

        fonts::register_all(canvas, &self.ctx.fonts_dir)?;

        let logo = self.draw_logo(canvas, &assets.logo)?;
        let start_y = LOGO_TOP + logo.height + LOGO_GAP;
        let heading = self.draw_heading(canvas, record, &body, start_y)?;
        let next_y = self.draw_body(canvas, &body, start_y)?;
        self.draw_footer(canvas, record, assets, logo, heading, next_y)?;

        let path = self.ctx.output_dir.join(format!("{stem}.pdf"));
        canvas.serialize(&path)
    }

    /// Centers the school logo under the top margin.
    pub fn draw_logo(&self, canvas: &mut dyn Canvas, logo: &ImageAsset) -> Result<LogoPlacement> {
        let (w, h) = logo.dimensions();
        let fit = fit_into_box(w, h, LOGO_BOX.0, LOGO_BOX.1);
        let x = (canvas.page_width() - fit.width) / 2.0;
        canvas
            .draw_image_at(x, LOGO_TOP, fit.width, fit.height, logo)
            .map_err(|e| e.in_step("logo"))?;
        Ok(LogoPlacement {
            x,
            width: fit.width,
            height: fit.height,
        })
    }

    /// Title, talent name with underline, and the sentences naming what was completed.
    pub fn draw_heading(
        &self,
        canvas: &mut dyn Canvas,
        record: &CertificateRecord,
        body: &CertificateBody<'_>,
        y: f64,
    ) -> Result<Heading> {
        let regular = FontFace::KodchasanRegular.name();

        canvas.center_text(TITLE, FontFace::SenRegular.name(), 12, y, TITLE_COLOR)?;
        canvas.center_text("This is to certify that", regular, 10, y + SUBTITLE_Y, Rgb::BLACK)?;

        let name_y = y + NAME_Y;
        let (name_x, name_width) = canvas.center_text(
            &record.talent.full_name,
            FontFace::SofiaRegular.name(),
            18,
            name_y,
            Rgb::BLACK,
        )?;
        let underline_y = name_y + NAME_UNDERLINE_Y;
        canvas
            .draw_line(name_x, underline_y, name_x + name_width, underline_y, LINE_WEIGHT)
            .map_err(|e| e.in_step("name underline"))?;

        let completed = match record.collection {
            Collection::Course => "has successfully completed online [non-credit]",
            Collection::Program => "has successfully completed",
        };
        canvas.center_text(completed, regular, 10, y + COMPLETED_Y, Rgb::BLACK)?;

        canvas.center_text(
            &body.title().to_uppercase(),
            FontFace::RammettoOneRegular.name(),
            18,
            y + COURSE_TITLE_Y,
            Rgb::BLACK,
        )?;

        let description = format!(
            "A {} delivered by {} and offered through {} platform",
            record.collection, record.material.school.name, self.ctx.platform_name
        );
        canvas.center_text(&description, regular, 10, y + DESCRIPTION_Y, Rgb::BLACK)?;

        Ok(Heading { name_width })
    }

    /// Level table for courses, skills line for programs. Returns the footer's `y`.
    pub fn draw_body(
        &self,
        canvas: &mut dyn Canvas,
        body: &CertificateBody<'_>,
        y: f64,
    ) -> Result<f64> {
        let regular = FontFace::KodchasanRegular.name();
        match body {
            CertificateBody::Course { levels, .. } => {
                debug!("Drawing {} level rows", levels.len());
                canvas.set_font(regular, 10)?;
                canvas.draw_text_at(
                    crate::layout::table::MARGIN_LEFT,
                    y + BODY_Y,
                    LEVELS_LABEL,
                    Rgb::BLACK,
                )?;
                self.table.draw_levels(canvas, y + TABLE_Y, levels)
            }
            CertificateBody::Program { skills, .. } => {
                let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
                let line = format!("Skills and Modules: {}", names.join(", "));
                canvas.center_text(&line, regular, 10, y + BODY_Y, Rgb::BLACK)?;
                Ok(y + TABLE_Y)
            }
        }
    }

    /// Signature block, watermark and QR code along the bottom of the page.
    pub fn draw_footer(
        &self,
        canvas: &mut dyn Canvas,
        record: &CertificateRecord,
        assets: &CertificateAssets,
        logo: LogoPlacement,
        heading: Heading,
        y: f64,
    ) -> Result<()> {
        let anchor = logo.x;
        let top = y + FOOTER_GAP;
        let signature_line_y = top + SIGNATURE_BOX;

        if let Some(signature) = &assets.signature {
            let (w, h) = signature.dimensions();
            let fit = fit_into_box(w, h, SIGNATURE_BOX, SIGNATURE_BOX);
            canvas
                .draw_image_at(
                    anchor + SIGNATURE_X,
                    signature_line_y - fit.height,
                    fit.width,
                    fit.height,
                    signature,
                )
                .map_err(|e| e.in_step("signature"))?;
        }
        canvas
            .draw_line(
                anchor + SIGNATORY_X,
                signature_line_y,
                anchor + SIGNATURE_LINE_END_X + heading.name_width,
                signature_line_y,
                LINE_WEIGHT,
            )
            .map_err(|e| e.in_step("signature underline"))?;

        let owner = &record.material.owner;
        let signatory_x = anchor + SIGNATORY_X;
        canvas.set_font(FontFace::KodchasanSemiBold.name(), 10)?;
        canvas.draw_text_at(signatory_x, signature_line_y + 8.0, &owner.full_name(), Rgb::BLACK)?;
        canvas.set_font(FontFace::KodchasanRegular.name(), 9)?;
        let role = format!("{}, {}", owner.job_title, record.material.school.name);
        canvas.draw_text_at(signatory_x, signature_line_y + 23.0, &role, Rgb::BLACK)?;
        canvas.set_font(FontFace::KodchasanRegular.name(), 10)?;
        let generated = self.ctx.generated_on.format("%d %B %Y").to_string();
        canvas.draw_text_at(signatory_x, signature_line_y + 38.0, &generated, Rgb::BLACK)?;

        canvas
            .draw_image_at(
                anchor + WATERMARK_X,
                top,
                WATERMARK_SIZE.0,
                WATERMARK_SIZE.1,
                &assets.watermark,
            )
            .map_err(|e| e.in_step("watermark"))?;
        canvas.draw_text_at(
            anchor + WATERMARK_X,
            top + CAPTION_Y,
            &self.ctx.platform_name,
            Rgb::BLACK,
        )?;

        canvas
            .draw_image_at(anchor + QR_X, top, QR_SIZE, QR_SIZE, &assets.qr_code)
            .map_err(|e| e.in_step("qr code"))?;
        canvas.draw_text_at(anchor + QR_CAPTION_X, top + CAPTION_Y, QR_CAPTION, Rgb::BLACK)?;
        Ok(())
    }
}
