use serde::{Deserialize, Serialize};
use tracing::info;

/// Input for proposal generation. Every field has a default, so any subset
/// of fields (including none) produces a complete proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalInput {
    #[serde(default = "default_researcher_name")]
    pub researcher_name: String,
    #[serde(default = "default_project_title")]
    pub project_title: String,
    #[serde(default = "default_collaboration_focus")]
    pub collaboration_focus: String,
}

fn default_researcher_name() -> String {
    "Dr. Sarah Chen".to_string()
}

fn default_project_title() -> String {
    "AI Research Collaboration".to_string()
}

fn default_collaboration_focus() -> String {
    "artificial intelligence and machine learning".to_string()
}

impl Default for ProposalInput {
    fn default() -> Self {
        Self {
            researcher_name: default_researcher_name(),
            project_title: default_project_title(),
            collaboration_focus: default_collaboration_focus(),
        }
    }
}

/// A complete research proposal. Recomputed on every call; there is no
/// persisted identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Proposal {
    pub title: String,
    pub lead_researcher: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub research_question: String,
    pub methodology: String,
    pub timeline: String,
    pub budget: String,
    pub expected_outcomes: String,
}

/// Fill the proposal template with the supplied strings.
///
/// Pure and total: any input, including empty or adversarial text, is
/// substituted verbatim, and identical inputs produce byte-identical output.
pub fn generate_proposal(input: &ProposalInput) -> Proposal {
    info!("Generating proposal for: {}", input.project_title);

    Proposal {
        title: format!("Collaborative Research: {}", input.project_title),
        lead_researcher: input.researcher_name.clone(),
        abstract_text: format!(
            "This proposal outlines an innovative collaborative research project led by \
             {} to advance {}. The research addresses \
             critical gaps in current knowledge and proposes novel methodologies.",
            input.researcher_name, input.collaboration_focus
        ),
        research_question: format!(
            "How can we leverage advanced AI techniques to solve key challenges in {}?",
            input.collaboration_focus
        ),
        methodology: "Mixed-methods approach combining quantitative ML analysis with qualitative \
                      domain expertise. We will use state-of-the-art deep learning models and \
                      rigorous experimental validation."
            .to_string(),
        timeline: "24 months with quarterly milestones: Q1-2 (Setup), Q3-4 (Development), \
                   Q5-6 (Validation), Q7-8 (Dissemination)"
            .to_string(),
        budget: "$600K over 24 months".to_string(),
        expected_outcomes: "High-impact publications, open-source tools, and field advancement"
            .to_string(),
    }
}
