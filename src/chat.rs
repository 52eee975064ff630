use crate::client::gemini::GenerativeBackend;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Behavioral contract sent with every model call. The assistant must answer
/// immediately and completely instead of asking clarifying questions.
pub const SYSTEM_INSTRUCTION: &str = r#"You are ResearchForge AI, a PROACTIVE research assistant.

CRITICAL: When users ask questions, provide IMMEDIATE, COMPLETE answers. DO NOT ask clarifying questions first.

Your capabilities:
1. Search arXiv for research papers
2. Generate research proposals
3. Draft collaboration emails

BEHAVIOR RULES:

When user asks "Find papers about X":
- Assume they want recent papers (last 2 years)
- Use their exact query terms
- Return 5-10 papers with titles, authors, links
- Format clearly with bullet points

When user asks "Generate a proposal for X":
- Use X as the project focus
- Create COMPLETE proposal immediately
- Include: title, abstract, methodology, timeline, budget
- Use defaults: researcher="Dr. Sarah Chen", timeline="24 months", budget="$600K"

When user asks "Draft an email for X":
- Create COMPLETE email immediately
- Use X as the project topic
- Include: subject line, greeting, body, closing
- Use defaults: sender="Dr. Sarah Chen", recipient="Dr. Colleague"

FORMATTING:
- Use markdown: **bold**, *italic*, ## headers
- Use bullet points for lists
- Keep responses clear and organized
- Always include specific details and numbers

NEVER say:
- "Could you specify..."
- "What area are you interested in..."
- "To make this better..."
- "Please provide more details..."

ALWAYS:
- Provide complete, actionable information immediately
- Use reasonable defaults when details are missing
- Format responses professionally with markdown
- Be specific and detailed in your answers"#;

/// One completed chat exchange. Nothing is persisted; the session id only
/// lets the client thread its own conversation.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
}

/// Stateless gateway to the generative-model provider with ordered model
/// fallback: each request walks the configured identifier list and the first
/// model that answers wins.
pub struct ChatGateway {
    backend: Arc<dyn GenerativeBackend>,
    models: Vec<String>,
}

impl ChatGateway {
    pub fn new(backend: Arc<dyn GenerativeBackend>, models: Vec<String>) -> Self {
        Self { backend, models }
    }

    /// Forward one user message to the provider.
    ///
    /// An empty or absent `session_id` gets a fresh UUID. Each model in the
    /// list is attempted exactly once, in order; when all fail the last
    /// attempt's error text is carried in `Error::ModelsExhausted`.
    #[instrument(skip(self, message))]
    pub async fn chat(&self, message: &str, session_id: Option<&str>) -> Result<ChatReply> {
        let session_id = match session_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };

        let mut last_error = String::new();

        for model in &self.models {
            info!("Trying model: {}", model);

            match self
                .backend
                .generate(model, message, SYSTEM_INSTRUCTION)
                .await
            {
                Ok(response) => {
                    info!("Success with model: {}", model);
                    return Ok(ChatReply {
                        response,
                        session_id,
                    });
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!("Model {} failed: {}", model, last_error);
                }
            }
        }

        Err(Error::ModelsExhausted { last_error })
    }
}

impl std::fmt::Debug for ChatGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatGateway")
            .field("models", &self.models)
            .finish()
    }
}
