//! Pure template generators for proposals and collaboration emails.

pub mod email;
pub mod proposal;

pub use email::{draft_email, EmailDraft, EmailInput};
pub use proposal::{generate_proposal, Proposal, ProposalInput};
