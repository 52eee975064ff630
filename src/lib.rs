pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod tools;

pub use chat::{ChatGateway, ChatReply};
pub use client::{ArxivClient, GeminiClient, GenerativeBackend, Paper, SearchResult, SearchStatus};
pub use config::Config;
pub use error::{Error, ErrorClass, Result};
pub use server::{build_router, AppState};
pub use tools::{draft_email, generate_proposal, EmailDraft, EmailInput, Proposal, ProposalInput};
