use crate::domain::article::{GeneralArticle, NewsArticle};
use crate::domain::provider::text::{clean_article_text, parse_generated_json};
use crate::domain::provider::{ProviderError, WordDefinition};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NewsPayload {
    title: String,
    content: String,
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    audio_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeneralPayload {
    Wrapped { articles: Vec<GeneralArticle> },
    Bare(Vec<GeneralArticle>),
}

/// Normalize a word analysis reply, filling the word when the model omits it
pub fn word_definition(raw: &str, word: &str) -> Result<WordDefinition, ProviderError> {
    let mut definition: WordDefinition = parse_generated_json(raw)?;

    if definition.word.trim().is_empty() {
        definition.word = word.to_string();
    }
    definition.examples.retain(|example| !example.trim().is_empty());

    if definition.definition_target.trim().is_empty() && definition.definition_native.trim().is_empty() {
        return Err(ProviderError::InvalidResponse(format!(
            "no definition returned for '{}'",
            word
        )));
    }

    Ok(definition)
}

pub fn news_article(raw: &str) -> Result<NewsArticle, ProviderError> {
    let payload: NewsPayload = parse_generated_json(raw)?;
    let content = clean_article_text(&payload.content);

    if content.is_empty() {
        return Err(ProviderError::InvalidResponse("news article has no content".to_string()));
    }

    Ok(NewsArticle {
        title: payload.title.trim().to_string(),
        content,
        source_url: payload.source_url.and_then(non_null_url),
        audio_url: payload.audio_url.and_then(non_null_url),
    })
}

pub fn general_articles(raw: &str) -> Result<Vec<GeneralArticle>, ProviderError> {
    let articles = match parse_generated_json::<GeneralPayload>(raw)? {
        GeneralPayload::Wrapped { articles } | GeneralPayload::Bare(articles) => articles,
    };

    let articles: Vec<GeneralArticle> = articles
        .into_iter()
        .map(|article| GeneralArticle {
            title: article.title.trim().to_string(),
            content: clean_article_text(&article.content),
        })
        .filter(|article| !article.content.is_empty())
        .collect();

    if articles.is_empty() {
        return Err(ProviderError::InvalidResponse("no articles returned".to_string()));
    }

    Ok(articles)
}

/// Models write "null" or "" when they have no URL
fn non_null_url(url: String) -> Option<String> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Some(url.to_string())
    } else {
        None
    }
}
