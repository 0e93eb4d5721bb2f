// Triage: classify a feeling statement, then answer with crisis resources or
// model-written guidance. All completion calls go through llm_client.

pub mod classifier;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod responder;
