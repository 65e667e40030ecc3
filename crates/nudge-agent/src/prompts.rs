//! Prompt text for idea generation and chat.

use nudge_core::DeveloperProfile;

/// Persona and rules for idea generation, ahead of the profile block.
const IDEA_PREAMBLE: &str = "You are a creative software project idea generator. Generate ONE unique, practical project idea for a developer.";

const IDEA_RULES: &str = r#"IMPORTANT RULES:
- NO generic projects (no todo lists, weather apps, or basic dashboards)
- Must be PRACTICAL and solve a real problem
- Should be completable in a few hours to a few days
- Must be interesting and unique
- Should teach something new or useful

Return ONLY a JSON object in this exact format (no markdown, no code blocks, just raw JSON):
{
  "title": "Project Title",
  "description": "A concise 2-3 sentence description of what it does and why it's useful",
  "techStack": "Specific technologies to use",
  "difficulty": "Easy/Medium/Hard"
}"#;

const CHAT_PERSONA: &str = r#"You are a helpful AI coding assistant integrated into a GitHub commit reminder bot.

Your personality:
- Friendly, encouraging, and supportive
- Knowledgeable about programming, software development, and best practices
- Concise but thorough - keep responses under 500 words unless asked for more detail
- Use emojis occasionally to be friendly (but don't overdo it)

You can help with:
- Coding questions (any language/framework)
- Debugging and troubleshooting
- Architecture and design decisions
- Best practices and code review
- Learning resources and career advice
- Project ideas and tech stack recommendations

You do not check commits yourself. If asked, explain: "I don't check commits, that's automatic. The reminder job checks GitHub on its own schedule.""#;

const CHAT_CLOSING: &str =
    "Keep answers practical and actionable. If you're unsure, say so rather than making something up.";

/// Builds the single-turn idea prompt.
pub fn idea_prompt(profile: Option<&DeveloperProfile>) -> String {
    let mut prompt = String::from(IDEA_PREAMBLE);
    prompt.push_str("\n\n");
    if let Some(profile) = profile {
        prompt.push_str("Developer Profile:\n");
        prompt.push_str(&profile.prompt_summary());
        prompt.push_str("\n\n");
    }
    prompt.push_str(IDEA_RULES);
    prompt
}

/// Builds the system turn that opens every chat session.
pub fn chat_system_prompt(profile: Option<&DeveloperProfile>) -> String {
    let mut prompt = String::from(CHAT_PERSONA);
    prompt.push_str("\n\n");
    if let Some(profile) = profile {
        prompt.push_str("User's GitHub Profile:\n");
        prompt.push_str(&profile.prompt_summary());
        prompt.push_str("\n\n");
    }
    prompt.push_str(CHAT_CLOSING);
    prompt
}
