//! Insight synthesis: the provider seam, the Gemini client, prompt
//! construction and the single-flight request coordinator.

pub mod coordinator;
pub mod gemini;
pub mod prompts;
pub mod provider;

pub use coordinator::{InsightCoordinator, RequestState};
pub use gemini::GeminiProvider;
pub use provider::{InsightDraft, InsightProvider, InsightRequest};
