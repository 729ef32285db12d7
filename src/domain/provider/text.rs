use super::error::ProviderError;
use html2text::from_read;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").expect("fence pattern"));
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").expect("tag pattern"));
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)\]]+").expect("url pattern"));
static MARKDOWN_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,2}([^*\n]+)\*{1,2}").expect("emphasis pattern"));
static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\[\d+(?:,\s*\d+)*\]").expect("citation pattern"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").expect("space pattern"));
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("paragraph pattern"));

/// Remove a surrounding markdown code fence, if any
pub fn strip_code_fences(raw: &str) -> &str {
    match FENCE.captures(raw).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    }
}

/// Parse a JSON payload out of generated text. Models sometimes wrap the
/// object in prose, so the outermost `{...}` is tried as a last resort.
pub fn parse_generated_json<T: DeserializeOwned>(raw: &str) -> Result<T, ProviderError> {
    let body = strip_code_fences(raw);

    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
                return Err(ProviderError::InvalidResponse(first_err.to_string()));
            };
            if start >= end {
                return Err(ProviderError::InvalidResponse(first_err.to_string()));
            }
            serde_json::from_str(&body[start..=end])
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
        }
    }
}

/// Plain reading text: HTML stripped, URLs and citation markers removed,
/// runs of spaces collapsed, paragraph breaks kept
pub fn clean_article_text(text: &str) -> String {
    let plain = if HTML_TAG.is_match(text) {
        from_read(text.as_bytes(), usize::MAX)
    } else {
        text.to_string()
    };

    let without_urls = URL.replace_all(&plain, "");
    let without_citations = CITATION.replace_all(&without_urls, "");
    let without_emphasis = MARKDOWN_EMPHASIS.replace_all(&without_citations, "$1");
    let collapsed = SPACES.replace_all(&without_emphasis, " ");

    let paragraphs: Vec<&str> = PARAGRAPH_BREAK
        .split(&collapsed)
        .map(|paragraph| paragraph.trim())
        .filter(|paragraph| !paragraph.is_empty())
        .collect();

    paragraphs
        .iter()
        .map(|paragraph| {
            paragraph
                .lines()
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
