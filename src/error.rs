use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a certificate render.
///
/// Rendering is fail-fast: the first error stops the pass and nothing is
/// written to the output directory.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to load asset {asset}: {reason}")]
    AssetLoad { asset: String, reason: String },
    #[error("failed to measure text: {0}")]
    Measurement(String),
    #[error("failed to draw {step}: {reason}")]
    Draw { step: String, reason: String },
    #[error("certificate lookup failed: {0}")]
    Lookup(String),
    #[error("failed to write {}: {reason}", .path.display())]
    Serialization { path: PathBuf, reason: String },
    #[error("invalid certificate record: {0}")]
    InvalidRecord(String),
    #[error("failed to generate QR code: {0}")]
    QrEncode(String),
}

impl RenderError {
    pub fn asset(asset: impl Into<String>, reason: impl ToString) -> Self {
        RenderError::AssetLoad {
            asset: asset.into(),
            reason: reason.to_string(),
        }
    }

    pub fn draw(step: impl Into<String>, reason: impl ToString) -> Self {
        RenderError::Draw {
            step: step.into(),
            reason: reason.to_string(),
        }
    }

    /// Prefixes a draw failure with the region that issued it.
    pub fn in_step(self, step: &str) -> Self {
        match self {
            RenderError::Draw { step: inner, reason } => RenderError::Draw {
                step: format!("{step}: {inner}"),
                reason,
            },
            other => other,
        }
    }
}

impl From<reqwest::Error> for RenderError {
    fn from(err: reqwest::Error) -> Self {
        RenderError::Lookup(err.to_string())
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Lookup(format!("malformed payload: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
