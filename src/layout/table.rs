use std::str::FromStr;
use tracing::debug;

use super::wrap::{capitalize_first, estimate_lines, strip_tags, wrap_words};
use crate::error::Result;
use crate::pdf::fonts::FontFace;
use crate::pdf::{Canvas, Rgb};
use crate::record::Level;

pub const MARGIN_LEFT: f64 = 50.0;
pub const LINE_HEIGHT: f64 = 10.0;
pub const BASE_HEIGHT: f64 = 10.0;
pub const AVG_CHAR_WIDTH: f64 = 6.0;
pub const WORDS_PER_LINE: usize = 10;
pub const FONT_SIZE: u8 = 10;

// Column widths as a share of the page width.
const DATE_COLUMN: f64 = 0.15;
const LEVEL_COLUMN: f64 = 0.15;
const OUTCOME_COLUMN: f64 = 0.55;
// The estimate assumes a narrower column than the one drawn.
const ESTIMATE_COLUMN: f64 = 0.50;

/// How level rows lay out their learning outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelLayout {
    /// Width-wrapped outcome cell, cursor advanced by a character-count estimate.
    #[default]
    Table,
    /// Fixed word count per line, cursor advanced by the real line count.
    Wrapped,
}

impl FromStr for LevelLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(LevelLayout::Table),
            "wrapped" => Ok(LevelLayout::Wrapped),
            other => Err(format!("unknown level layout {other:?}")),
        }
    }
}

/// Cell text of one level row.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRow {
    pub date: String,
    pub proficiency: String,
    pub outcome: String,
}

impl LevelRow {
    pub fn from_level(level: &Level) -> Self {
        Self {
            date: level
                .updated_at
                .map(|at| at.format("%d %B %Y").to_string())
                .unwrap_or_default(),
            proficiency: format!(
                "Level {} ({})",
                level.proficiency,
                capitalize_first(&level.name)
            ),
            outcome: strip_tags(&level.learning_outcome),
        }
    }
}

/// Draws level rows one below the other, borderless and without a header.
pub struct TableLayout {
    layout: LevelLayout,
}

impl TableLayout {
    pub fn new(layout: LevelLayout) -> Self {
        Self { layout }
    }

    /// Vertical space reserved for `row` before the next one starts.
    pub fn row_advance(&self, page_width: f64, row: &LevelRow) -> f64 {
        let lines = match self.layout {
            LevelLayout::Table => {
                estimate_lines(&row.outcome, page_width * ESTIMATE_COLUMN, AVG_CHAR_WIDTH)
            }
            LevelLayout::Wrapped => wrap_words(&row.outcome, WORDS_PER_LINE).count().max(1),
        };
        lines as f64 * LINE_HEIGHT + BASE_HEIGHT
    }

    /// Draws every level starting at `y` and returns the cursor below the last row.
    pub fn draw_levels(&self, canvas: &mut dyn Canvas, y: f64, levels: &[Level]) -> Result<f64> {
        canvas.set_font(FontFace::KodchasanRegular.name(), FONT_SIZE)?;
        let mut next_y = y;
        for level in levels {
            let row = LevelRow::from_level(level);
            next_y = self.draw_row(canvas, next_y, &row)?;
        }
        debug!("Drew {} level rows, cursor at {:.1}", levels.len(), next_y);
        Ok(next_y)
    }

    /// Draws one row at `y` in the current font and returns the next row's `y`.
    pub fn draw_row(&self, canvas: &mut dyn Canvas, y: f64, row: &LevelRow) -> Result<f64> {
        let page_width = canvas.page_width();
        let level_x = MARGIN_LEFT + page_width * DATE_COLUMN;
        let outcome_x = level_x + page_width * LEVEL_COLUMN;

        canvas.draw_text_at(MARGIN_LEFT, y, &row.date, Rgb::BLACK)?;
        canvas.draw_text_at(level_x, y, &row.proficiency, Rgb::BLACK)?;

        let lines = match self.layout {
            LevelLayout::Table => fit_to_width(canvas, &row.outcome, page_width * OUTCOME_COLUMN)?,
            LevelLayout::Wrapped => wrap_words(&row.outcome, WORDS_PER_LINE).collect(),
        };
        for (i, line) in lines.iter().enumerate() {
            canvas.draw_text_at(outcome_x, y + i as f64 * LINE_HEIGHT, line, Rgb::BLACK)?;
        }

        Ok(y + self.row_advance(page_width, row))
    }
}

/// Greedy word wrap against the canvas' current font. A word wider than
/// `width` gets a line of its own.
fn fit_to_width(canvas: &dyn Canvas, text: &str, width: f64) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if canvas.measure_text_width(&candidate)? > width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    Ok(lines)
}
