use std::sync::Arc;

use crate::config::Config;
use crate::extract::DocumentExtractor;
use crate::jobs::JobBoard;
use crate::llm_client::ChatModel;
use crate::storage::CandidateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Hosted model behind a trait object. Default: `LlmClient` against Groq.
    pub llm: Arc<dyn ChatModel>,
    /// Default: `PdfExtractor` with the configured size cap.
    pub extractor: Arc<dyn DocumentExtractor>,
    pub store: CandidateStore,
    pub jobs: JobBoard,
    pub config: Config,
}
