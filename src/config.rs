use std::path::PathBuf;

use crate::layout::LevelLayout;

#[derive(Clone, Debug)]
pub struct Config {
    pub web_url: String,
    pub api_url: String,
    pub cert_key: String,
    pub course_cert_val: String,
    pub program_cert_val: String,
    pub output_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub platform_name: String,
    pub level_layout: LevelLayout,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let web_url = std::env::var("WEB_URL").map_err(|_| "WEB_URL must be set")?;
        let api_url = std::env::var("API_URL").map_err(|_| "API_URL must be set")?;
        let cert_key = std::env::var("CERT_KEY").map_err(|_| "CERT_KEY must be set")?;

        let course_cert_val = std::env::var("COURSE_CERT_VAL").unwrap_or_default();
        let program_cert_val = std::env::var("PROGRAM_CERT_VAL").unwrap_or_default();

        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let output_dir =
            base_dir.join(std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "gen".to_string()));
        let assets_dir =
            base_dir.join(std::env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".to_string()));

        let platform_name =
            std::env::var("PLATFORM_NAME").unwrap_or_else(|_| "SkilledIn Green".to_string());
        let level_layout = match std::env::var("LEVEL_LAYOUT") {
            Ok(value) => value.parse()?,
            Err(_) => LevelLayout::default(),
        };

        Ok(Self {
            web_url,
            api_url,
            cert_key,
            course_cert_val,
            program_cert_val,
            output_dir,
            assets_dir,
            platform_name,
            level_layout,
        })
    }

    /// Lookup value for the collection named on the command line.
    pub fn cert_value_for(&self, collection: Option<&str>) -> &str {
        match collection {
            Some("program") => &self.program_cert_val,
            _ => &self.course_cert_val,
        }
    }
}
