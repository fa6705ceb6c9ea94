//! Prompt Builders
//!
//! This module assembles the prompts the editor sends to text providers:
//! the simple script and narration flows, plus keyword- and web-content-
//! augmented variants. Fetched context is clipped before it is appended so
//! one large page cannot dominate the token budget.

/// Ceiling on appended context characters
pub const MAX_CONTEXT_CHARS: usize = 2000;

/// Build a video script prompt from topic, duration and tone
#[must_use]
pub fn script_prompt(topic: &str, duration_secs: u32, tone: &str) -> String {
    format!(
        "Write a spoken video script about \"{topic}\".\n\
         Target length: roughly {duration_secs} seconds when read aloud.\n\
         Tone: {tone}.\n\
         Structure it with a hook, a main section, and a short outro.\n\
         Return only the script text, no headings or stage directions."
    )
}

/// Build a narration prompt for existing slide content
#[must_use]
pub fn narration_prompt(content: &str, style: &str) -> String {
    format!(
        "Write narration to accompany the following slide content.\n\
         Style: {style}.\n\
         Keep it natural to read aloud and do not repeat the content verbatim.\n\n\
         Content:\n{content}"
    )
}

/// Append focus keywords to a prompt
#[must_use]
pub fn with_keywords(prompt: &str, keywords: &[&str]) -> String {
    if keywords.is_empty() {
        return prompt.to_string();
    }
    format!(
        "{prompt}\n\nMake sure to naturally work in these keywords: {}.",
        keywords.join(", ")
    )
}

/// Append fetched web content as background context, clipped to
/// [`MAX_CONTEXT_CHARS`] characters
#[must_use]
pub fn with_web_context(prompt: &str, context: &str) -> String {
    let context = context.trim();
    if context.is_empty() {
        return prompt.to_string();
    }
    let clipped = clip_chars(context, MAX_CONTEXT_CHARS);
    format!(
        "{prompt}\n\nUse the following background material where it helps. \
         Do not quote it directly.\n\n{clipped}"
    )
}

/// Clip a string to at most `max` characters on a char boundary
fn clip_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_prompt_includes_parameters() {
        let prompt = script_prompt("urban beekeeping", 90, "friendly");
        assert!(prompt.contains("urban beekeeping"));
        assert!(prompt.contains("90 seconds"));
        assert!(prompt.contains("friendly"));
    }

    #[test]
    fn test_narration_prompt_carries_content() {
        let prompt = narration_prompt("Slide 1: The water cycle", "calm");
        assert!(prompt.contains("The water cycle"));
        assert!(prompt.contains("calm"));
    }

    #[test]
    fn test_keywords_appended() {
        let prompt = with_keywords("base", &["rust", "wasm"]);
        assert!(prompt.contains("rust, wasm"));
        assert_eq!(with_keywords("base", &[]), "base");
    }

    #[test]
    fn test_web_context_clipped() {
        let context = "x".repeat(5000);
        let prompt = with_web_context("base", &context);
        let appended = prompt.matches('x').count();
        assert_eq!(appended, MAX_CONTEXT_CHARS);
    }

    #[test]
    fn test_web_context_clips_on_char_boundary() {
        let context = "é".repeat(3000);
        let prompt = with_web_context("base", &context);
        assert_eq!(prompt.matches('é').count(), MAX_CONTEXT_CHARS);
    }

    #[test]
    fn test_empty_context_leaves_prompt_unchanged() {
        assert_eq!(with_web_context("base", "   "), "base");
    }
}
