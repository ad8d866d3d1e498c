use certgen::config::Config;
use certgen::pdf::PdfCanvas;
use certgen::record::Repository;
use certgen::storage::{self, AssetStore};
use certgen::{CertificateComposer, RenderContext};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "certgen=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let collection = std::env::args().nth(1);
    let cert_value = config.cert_value_for(collection.as_deref());

    storage::ensure_dir(&config.output_dir)?;
    let ctx = RenderContext::from_config(&config, chrono::Local::now().date_naive());

    let repo = Repository::new(config.api_url.clone())?;
    let record = repo.load_certificate(&config.cert_key, cert_value).await?;

    // Dropping the store removes everything it downloaded.
    let store = AssetStore::new(config.assets_dir.clone())?;
    let assets = store.collect(&record, &ctx).await?;

    let mut canvas = PdfCanvas::new("Certificate of Completion");
    let path = CertificateComposer::new(&ctx).render(&mut canvas, &record, &assets)?;
    tracing::info!("Certificate written to {}", path.display());

    Ok(())
}
