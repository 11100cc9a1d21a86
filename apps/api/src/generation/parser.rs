//! Extraction of generated text from the provider response.
//!
//! Two layers, each with its own failure signal:
//! 1. `extract_output_text` — flattens the provider's message content
//!    (plain string or array of parts) into one raw string.
//! 2. `parse_tagged_sections` — pulls the `<resume>` and `<cover_letter>`
//!    blocks out of that raw string. The PDF step depends entirely on this
//!    contract holding exactly, so a missing tag fails loudly and maps to a
//!    retryable response upstream.

use crate::errors::GenerateError;
use crate::llm_client::{ChatCompletionResponse, ContentPart, FragmentText, MessageContent};

/// The two generated documents, trimmed.
#[derive(Debug, PartialEq, Eq)]
pub struct ParsedSections {
    pub resume_text: String,
    pub cover_letter_text: String,
}

/// Flattens the first choice's message content into raw text.
/// Fails with `ResponseFormat` when no supported shape yields non-empty text.
pub fn extract_output_text(response: &ChatCompletionResponse) -> Result<String, GenerateError> {
    let content = response
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_ref())
        .ok_or(GenerateError::ResponseFormat)?;

    let raw = match content {
        MessageContent::Text(text) => text.clone(),
        MessageContent::Parts(parts) => parts
            .iter()
            .map(part_text)
            .collect::<Vec<_>>()
            .join("\n"),
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Err(GenerateError::ResponseFormat);
    }
    Ok(raw.to_string())
}

fn part_text(part: &ContentPart) -> &str {
    match part {
        ContentPart::Text(text) => text,
        ContentPart::Fragment { text: Some(FragmentText::Plain(text)) } => text,
        ContentPart::Fragment { text: Some(FragmentText::Wrapped { value }) } => value,
        ContentPart::Fragment { text: None } => "",
    }
}

/// Locates the `<resume>` and `<cover_letter>` blocks in the raw model
/// output. Tags match ASCII case-insensitively, may appear in either order,
/// and content may span lines; the first close tag after each open tag wins.
pub fn parse_tagged_sections(raw_text: &str) -> Result<ParsedSections, GenerateError> {
    let resume_text =
        tag_block(raw_text, "resume").ok_or(GenerateError::Format("resume"))?;
    let cover_letter_text =
        tag_block(raw_text, "cover_letter").ok_or(GenerateError::Format("cover_letter"))?;

    Ok(ParsedSections {
        resume_text: resume_text.trim().to_string(),
        cover_letter_text: cover_letter_text.trim().to_string(),
    })
}

/// Returns the inner text of the first `<tag>...</tag>` block, or `None`
/// when either marker is missing.
fn tag_block<'a>(haystack: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let open_at = find_ascii_ci(haystack, &open, 0)?;
    let content_start = open_at + open.len();
    let close_at = find_ascii_ci(haystack, &close, content_start)?;

    Some(&haystack[content_start..close_at])
}

/// ASCII case-insensitive substring search starting at byte offset `from`.
/// The needles here are pure ASCII, so every match lies on char boundaries.
fn find_ascii_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if from + needle.len() > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|pos| from + pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: serde_json::Value) -> ChatCompletionResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn extracts_plain_string_content() {
        let resp = response(json!({
            "choices": [{"message": {"content": "hello world"}}]
        }));
        assert_eq!(extract_output_text(&resp).unwrap(), "hello world");
    }

    #[test]
    fn extracts_and_joins_content_parts() {
        let resp = response(json!({
            "choices": [{"message": {"content": [
                "first",
                {"text": "second"},
                {"text": {"value": "third"}},
            ]}}]
        }));
        assert_eq!(extract_output_text(&resp).unwrap(), "first\nsecond\nthird");
    }

    #[test]
    fn empty_or_missing_content_is_a_response_format_error() {
        for body in [
            json!({"choices": []}),
            json!({"choices": [{"message": {}}]}),
            json!({"choices": [{"message": {"content": "   "}}]}),
            json!({"choices": [{"message": {"content": [{"text": null}]}}]}),
        ] {
            let err = extract_output_text(&response(body)).unwrap_err();
            assert!(matches!(err, GenerateError::ResponseFormat));
        }
    }

    #[test]
    fn parses_both_sections_in_order() {
        let parsed = parse_tagged_sections(
            "<resume>\nA\n</resume>\n<cover_letter>\nB\n</cover_letter>",
        )
        .unwrap();
        assert_eq!(parsed.resume_text, "A");
        assert_eq!(parsed.cover_letter_text, "B");
    }

    #[test]
    fn tag_order_does_not_matter() {
        let parsed = parse_tagged_sections(
            "<cover_letter>B</cover_letter>junk<resume>A</resume>",
        )
        .unwrap();
        assert_eq!(parsed.resume_text, "A");
        assert_eq!(parsed.cover_letter_text, "B");
    }

    #[test]
    fn tags_match_case_insensitively() {
        let parsed = parse_tagged_sections(
            "<RESUME>A</Resume><Cover_Letter>B</COVER_LETTER>",
        )
        .unwrap();
        assert_eq!(parsed.resume_text, "A");
        assert_eq!(parsed.cover_letter_text, "B");
    }

    #[test]
    fn inner_whitespace_is_trimmed_and_content_may_span_lines() {
        let parsed = parse_tagged_sections(
            "<resume>\n\n  line one\n  line two  \n</resume><cover_letter>\r\n B \r\n</cover_letter>",
        )
        .unwrap();
        assert_eq!(parsed.resume_text, "line one\n  line two");
        assert_eq!(parsed.cover_letter_text, "B");
    }

    #[test]
    fn first_close_tag_wins() {
        let parsed = parse_tagged_sections(
            "<resume>A</resume><resume>ignored</resume><cover_letter>B</cover_letter>",
        )
        .unwrap();
        assert_eq!(parsed.resume_text, "A");
    }

    #[test]
    fn missing_either_tag_is_a_format_error() {
        let err = parse_tagged_sections("<resume>A</resume>").unwrap_err();
        assert!(matches!(err, GenerateError::Format("cover_letter")));

        let err = parse_tagged_sections("<cover_letter>B</cover_letter>").unwrap_err();
        assert!(matches!(err, GenerateError::Format("resume")));

        let err = parse_tagged_sections("no tags at all").unwrap_err();
        assert!(matches!(err, GenerateError::Format(_)));
    }

    #[test]
    fn unclosed_tag_is_a_format_error() {
        let err =
            parse_tagged_sections("<resume>A<cover_letter>B</cover_letter>").unwrap_err();
        assert!(matches!(err, GenerateError::Format("resume")));
    }
}
