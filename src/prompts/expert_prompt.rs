//! Expert framing for delegated general questions

/// Wraps a free-text question in the conservation-expert framing
///
/// # Examples
///
/// ```
/// use mikoko::prompts::build_expert_prompt;
///
/// let prompt = build_expert_prompt("Why do mangroves store so much carbon?");
/// assert!(prompt.contains("Why do mangroves store so much carbon?"));
/// ```
pub fn build_expert_prompt(question: &str) -> String {
    format!(
        "As a mangrove conservation expert, please answer this question:\n{}\n\n\
         Focus on providing accurate, educational information about mangroves, their ecosystems, \
         conservation efforts, and carbon benefits. Include scientific facts where relevant.",
        question.trim()
    )
}
