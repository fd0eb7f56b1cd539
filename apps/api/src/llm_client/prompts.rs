// Shared prompt fragments and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to prompts whose output is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY the JSON, no markdown fences.";

/// Returns at most `max_chars` characters of `text`, never splitting a code point.
pub fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Like `clip`, but substitutes `fallback` for empty input.
pub fn clip_or<'a>(text: &'a str, max_chars: usize, fallback: &'a str) -> &'a str {
    if text.is_empty() {
        fallback
    } else {
        clip(text, max_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_shorter_than_limit() {
        assert_eq!(clip("abc", 10), "abc");
    }

    #[test]
    fn test_clip_counts_characters_not_bytes() {
        assert_eq!(clip("ééé", 2), "éé");
    }

    #[test]
    fn test_clip_or_uses_fallback_for_empty() {
        assert_eq!(clip_or("", 5, "Not specified"), "Not specified");
        assert_eq!(clip_or("abcdef", 3, "Not specified"), "abc");
    }
}
