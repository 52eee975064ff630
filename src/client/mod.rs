pub mod arxiv;
pub mod gemini;

pub use arxiv::{ArxivClient, Paper, SearchResult, SearchStatus};
pub use gemini::{BackendError, GeminiClient, GenerativeBackend};
