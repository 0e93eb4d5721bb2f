use std::sync::Arc;

use crate::llm_client::CompletionService;
use crate::triage::prompts::PromptTemplates;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. Default: `LlmClient` against OpenAI.
    pub llm: Arc<dyn CompletionService>,
    /// Prompt templates, built once at startup and never mutated.
    pub templates: Arc<PromptTemplates>,
}
