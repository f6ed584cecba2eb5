//! Hand-off of crawled pages to the ingestion collaborator
//!
//! Chunking, embedding and vector upserts live behind [`PageIngestor`]. This
//! module only drives it page by page with skip-and-count semantics and
//! decodes embedding-service responses.

pub mod embedding;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::page_extractor::PageRecord;

pub use embedding::{EmbeddingDecodeError, decode_embedding};

/// Something that chunks, embeds and stores one page
#[async_trait]
pub trait PageIngestor: Send + Sync {
    /// Ingest `page`, returning the number of chunks written
    async fn ingest(&self, page: &PageRecord) -> anyhow::Result<usize>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestedPage {
    pub url: String,
    pub chunks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedPage {
    pub url: String,
    pub error: String,
}

/// Per-page outcome of a batch ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub ingested: Vec<IngestedPage>,
    pub failed: Vec<FailedPage>,
    pub total_chunks: usize,
}

impl IngestReport {
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ingest every page in order; a failing page is recorded and skipped
pub async fn ingest_pages<I>(pages: &[PageRecord], ingestor: &I) -> IngestReport
where
    I: PageIngestor + ?Sized,
{
    let mut report = IngestReport::default();

    for page in pages {
        match ingestor.ingest(page).await {
            Ok(chunks) => {
                report.total_chunks += chunks;
                report.ingested.push(IngestedPage {
                    url: page.url.clone(),
                    chunks,
                });
            }
            Err(e) => {
                warn!(url = %page.url, "Failed to ingest page: {e:#}");
                report.failed.push(FailedPage {
                    url: page.url.clone(),
                    error: format!("{e:#}"),
                });
            }
        }
    }

    info!(
        ingested = report.ingested.len(),
        failed = report.failed.len(),
        chunks = report.total_chunks,
        "Ingestion finished"
    );
    report
}
