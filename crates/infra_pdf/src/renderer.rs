//! PDF invoice renderer
//!
//! Acquires the consignment image (remote download or local fallback),
//! composes the document, and persists it under the invoice directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use domain_request::{InsuranceRequest, InvoiceRenderer, RenderError, RenderedDocument};

use crate::layout;

/// Company branding rendered on every invoice.
#[derive(Debug, Clone)]
pub struct CompanyInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Directory rendered invoices are written to
    pub invoice_dir: PathBuf,
    /// Directory searched for local consignment images
    pub assets_dir: PathBuf,
    /// Base URL the public document location is derived from
    pub public_base_url: String,
    /// Time budget for the remote image download, in seconds
    pub image_timeout_secs: u64,
    /// Branding block
    pub company: CompanyInfo,
}

/// Where the consignment image came from.
///
/// A downloaded image lives in a [`NamedTempFile`], which removes itself
/// on drop - the transient copy is gone once rendering completes whether
/// the render succeeded or not.
enum ImageSource {
    Downloaded(NamedTempFile),
    Local(PathBuf),
}

impl ImageSource {
    fn path(&self) -> &Path {
        match self {
            ImageSource::Downloaded(tmp) => tmp.path(),
            ImageSource::Local(path) => path,
        }
    }
}

/// PDF implementation of the `InvoiceRenderer` port.
pub struct PdfInvoiceRenderer {
    config: RenderConfig,
    client: reqwest::Client,
}

impl PdfInvoiceRenderer {
    /// Creates a renderer whose image downloads honor the configured
    /// time budget.
    pub fn new(config: RenderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.image_timeout_secs))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    async fn acquire_image(&self, request: &InsuranceRequest) -> Option<ImageSource> {
        if let Some(url) = &request.image_url {
            match self.download_image(url).await {
                Ok(tmp) => return Some(ImageSource::Downloaded(tmp)),
                Err(e) => {
                    warn!(
                        request_id = %request.id,
                        url = %url,
                        error = %e,
                        "consignment image download failed, trying local fallback"
                    );
                }
            }
        }

        // Local-path conventions: request id first, then submitter phone
        let stems = [
            request.id.as_uuid().to_string(),
            request.submitter_phone.clone(),
        ];
        for stem in &stems {
            for ext in ["jpg", "jpeg", "png"] {
                let candidate = self.config.assets_dir.join(format!("{stem}.{ext}"));
                if candidate.is_file() {
                    return Some(ImageSource::Local(candidate));
                }
            }
        }

        None
    }

    async fn download_image(&self, url: &str) -> Result<NamedTempFile, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;

        let mut tmp = NamedTempFile::new().map_err(|e| e.to_string())?;
        tmp.write_all(&bytes).map_err(|e| e.to_string())?;
        debug!(url = %url, bytes = bytes.len(), "consignment image downloaded");
        Ok(tmp)
    }
}

#[async_trait]
impl InvoiceRenderer for PdfInvoiceRenderer {
    async fn render(
        &self,
        request: &InsuranceRequest,
        invoice_number: &str,
        premium: Decimal,
    ) -> Result<RenderedDocument, RenderError> {
        let image_source = self.acquire_image(request).await;
        let image_bytes = match &image_source {
            Some(source) => match std::fs::read(source.path()) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(
                        request_id = %request.id,
                        error = %e,
                        "acquired consignment image became unreadable"
                    );
                    None
                }
            },
            None => None,
        };

        let pdf = layout::compose(
            request,
            invoice_number,
            premium,
            &self.config.company,
            image_bytes.as_deref(),
        )?;

        tokio::fs::create_dir_all(&self.config.invoice_dir)
            .await
            .map_err(|e| RenderError::Persist(e.to_string()))?;

        let file_name = format!("{invoice_number}.pdf");
        let path = self.config.invoice_dir.join(&file_name);
        tokio::fs::write(&path, &pdf)
            .await
            .map_err(|e| RenderError::Persist(e.to_string()))?;

        debug!(
            request_id = %request.id,
            path = %path.display(),
            "invoice document rendered"
        );

        Ok(RenderedDocument {
            location: format!(
                "{}/invoices/{}",
                self.config.public_base_url.trim_end_matches('/'),
                file_name
            ),
            file_name,
        })
    }
}
