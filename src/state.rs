use chrono::NaiveDate;
use std::path::PathBuf;

use crate::config::Config;
use crate::layout::LevelLayout;

/// Settings a render needs from outside the certificate record.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub web_url: String,
    pub output_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub platform_name: String,
    pub generated_on: NaiveDate,
    pub level_layout: LevelLayout,
}

impl RenderContext {
    pub fn from_config(config: &Config, generated_on: NaiveDate) -> Self {
        Self {
            web_url: config.web_url.clone(),
            output_dir: config.output_dir.clone(),
            fonts_dir: config.assets_dir.join("fonts"),
            platform_name: config.platform_name.clone(),
            generated_on,
            level_layout: config.level_layout,
        }
    }

    pub fn preview_url(&self, reference: &str) -> String {
        crate::qr::preview_url(&self.web_url, reference)
    }
}
