use serde::{Deserialize, Serialize};
use tracing::info;

/// Input for email drafting. Every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailInput {
    #[serde(default = "default_researcher_name")]
    pub researcher_name: String,
    #[serde(default = "default_recipient_name")]
    pub recipient_name: String,
    #[serde(default = "default_project_title")]
    pub project_title: String,
    #[serde(default = "default_match_insights")]
    pub match_insights: String,
}

fn default_researcher_name() -> String {
    "Dr. Sarah Chen".to_string()
}

fn default_recipient_name() -> String {
    "Dr. Research Colleague".to_string()
}

fn default_project_title() -> String {
    "AI Research Collaboration".to_string()
}

fn default_match_insights() -> String {
    "strong research synergy and complementary expertise".to_string()
}

impl Default for EmailInput {
    fn default() -> Self {
        Self {
            researcher_name: default_researcher_name(),
            recipient_name: default_recipient_name(),
            project_title: default_project_title(),
            match_insights: default_match_insights(),
        }
    }
}

/// A drafted collaboration email. The body carries its own subject line;
/// `subject` is the short form used for listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

/// Fill the collaboration-email template with the supplied strings.
///
/// Pure and total, like `generate_proposal`: verbatim substitution,
/// byte-identical output for identical inputs.
pub fn draft_email(input: &EmailInput) -> EmailDraft {
    info!("Drafting email for: {}", input.project_title);

    let body = format!(
        "Subject: Research Collaboration Opportunity: {project_title}\n\
         \n\
         Dear {recipient_name},\n\
         \n\
         I hope this message finds you well. I'm reaching out to propose a research collaboration \n\
         opportunity that aligns with your expertise in {match_insights}.\n\
         \n\
         I believe our work shows remarkable synergy with the project \"{project_title}\". \n\
         Our preliminary assessment indicates strong alignment in research interests and methodologies.\n\
         \n\
         I would be delighted to schedule a brief call to discuss potential collaboration.\n\
         \n\
         Best regards,\n\
         {researcher_name}",
        project_title = input.project_title,
        recipient_name = input.recipient_name,
        match_insights = input.match_insights,
        researcher_name = input.researcher_name,
    );

    EmailDraft {
        subject: format!("Research Collaboration: {}", input.project_title),
        body,
    }
}
