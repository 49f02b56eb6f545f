//! Prompts sent to the hosted model
//!
//! The agent runs with a single system instruction; the general-question
//! tool wraps each question in an expert framing prompt.

pub mod expert_prompt;
pub mod guardian_prompt;

pub use expert_prompt::build_expert_prompt;
pub use guardian_prompt::build_system_prompt;
