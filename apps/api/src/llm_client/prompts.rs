// Shared prompt fragments.
// Each module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting pieces only.

/// Appended to every system instruction so replies stay machine-readable.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Respond with a single valid JSON object only. \
Do NOT include any text outside the JSON object. \
Do NOT include explanations or apologies.";

/// Wraps user-supplied text in a fenced block under a heading.
pub fn fenced_section(heading: &str, body: &str) -> String {
    format!("{heading}:\n```\n{body}\n```")
}
