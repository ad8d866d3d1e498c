use reqwest::Client;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{RenderError, Result};
use crate::pdf::ImageAsset;
use crate::record::CertificateRecord;
use crate::record::LOOKUP_TIMEOUT;
use crate::state::RenderContext;

/// Images a certificate render places on the page.
#[derive(Debug, Clone)]
pub struct CertificateAssets {
    pub logo: ImageAsset,
    pub signature: Option<ImageAsset>,
    pub watermark: ImageAsset,
    pub qr_code: ImageAsset,
}

/// Resolves remote and local images for one run. Downloads land in a scratch
/// directory that is removed when the store is dropped.
pub struct AssetStore {
    client: Client,
    assets_dir: PathBuf,
    scratch: TempDir,
}

impl AssetStore {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        let scratch = tempfile::Builder::new()
            .prefix("certgen-")
            .tempdir()
            .map_err(|e| RenderError::asset("scratch directory", e))?;
        Ok(Self {
            client,
            assets_dir: assets_dir.into(),
            scratch,
        })
    }

    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    pub fn watermark_path(&self) -> PathBuf {
        self.assets_dir.join("images").join("watermark.png")
    }

    /// Downloads `url` into the scratch directory and decodes it.
    pub async fn fetch_image(&self, url: &str) -> Result<ImageAsset> {
        let file_name = file_name_from_url(url)
            .ok_or_else(|| RenderError::asset(url, "URL has no file name"))?;
        let path = self.scratch.path().join(file_name);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RenderError::asset(url, e))?;
        let bytes = response.bytes().await.map_err(|e| RenderError::asset(url, e))?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| RenderError::asset(url, e))?;
        debug!("Downloaded {} to {}", url, path.display());

        load_image(&path)
    }

    /// Resolves every image the record needs.
    pub async fn collect(
        &self,
        record: &CertificateRecord,
        ctx: &RenderContext,
    ) -> Result<CertificateAssets> {
        let logo = self.fetch_image(&record.material.school.logo).await?;
        let signature = match record.material.signature.as_deref() {
            Some(url) if !url.trim().is_empty() => Some(self.fetch_image(url).await?),
            _ => None,
        };
        let watermark = load_image(&self.watermark_path())?;
        let qr_code = qr_code_for(record, ctx)?;
        info!(
            "Collected assets for {} (signature: {})",
            record.reference_number,
            signature.is_some()
        );
        Ok(CertificateAssets {
            logo,
            signature,
            watermark,
            qr_code,
        })
    }
}

/// QR code pointing at the certificate's public preview page.
pub fn qr_code_for(record: &CertificateRecord, ctx: &RenderContext) -> Result<ImageAsset> {
    crate::qr::encode(&ctx.preview_url(&record.reference_number))
}

/// Last path segment of a URL, without query or fragment.
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

/// Reads and decodes an image file.
pub fn load_image(path: &Path) -> Result<ImageAsset> {
    let name = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| RenderError::asset(&name, e))?;
    let image = image::load_from_memory(&bytes).map_err(|e| RenderError::asset(&name, e))?;
    Ok(ImageAsset::new(name, image))
}

pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}
