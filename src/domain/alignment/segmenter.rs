use crate::domain::language::locale_for_display_name;
use regex::Regex;
use std::sync::LazyLock;

/// A slice of article text before timing is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSentence {
    pub text: String,
    /// Offset in characters (Unicode scalar values) from the start of the body
    pub start_char: usize,
}

impl RawSentence {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn end_char(&self) -> usize {
        self.start_char + self.char_len()
    }

    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Split article text into sentences using the segmenter for `language`,
/// a display name such as "Spanish". Unmapped names use the generic locale.
///
/// The pieces always concatenate back to the input. Each run of whitespace
/// between sentences is its own whitespace-only piece.
pub fn segment(text: &str, language: &str) -> Vec<RawSentence> {
    let locale = locale_for_display_name(language);
    collect_with_offsets(sentence_boundaries(text, locale))
}

/// Punctuation-driven split used when the language-aware segmenter is not
/// compiled in. Same output shape as [`segment`].
pub fn segment_by_punctuation(text: &str) -> Vec<RawSentence> {
    collect_with_offsets(punctuation_boundaries(text))
}

#[cfg(feature = "unicode-segmenter")]
fn sentence_boundaries<'a>(text: &'a str, locale: &str) -> Vec<&'a str> {
    use unicode_segmentation::UnicodeSegmentation;

    let pieces: Vec<(usize, &str)> = text.split_sentence_bound_indices().collect();
    merge_after_abbreviations(text, &pieces, locale)
}

#[cfg(not(feature = "unicode-segmenter"))]
fn sentence_boundaries<'a>(text: &'a str, locale: &str) -> Vec<&'a str> {
    tracing::debug!(locale, "language-aware segmenter unavailable, using punctuation split");
    punctuation_boundaries(text)
}

static SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^.!?。！？]*[.!?。！？]+["'”’»」』]?"#).expect("sentence pattern is valid")
});

fn punctuation_boundaries(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut last_end = 0;

    for mat in SENTENCE.find_iter(text) {
        if mat.start() > last_end {
            pieces.push(&text[last_end..mat.start()]);
        }
        pieces.push(mat.as_str());
        last_end = mat.end();
    }

    // Trailing text without a terminator
    if last_end < text.len() {
        pieces.push(&text[last_end..]);
    }

    pieces
}

/// Abbreviations after which a UAX #29 boundary is not a sentence end.
/// Words that commonly close a sentence ("etc.") are left out on purpose.
fn abbreviations(locale: &str) -> &'static [&'static str] {
    match locale {
        "en" => &["Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "St.", "Jr.", "Sr.", "vs.", "e.g.", "i.e."],
        "es" => &["Sr.", "Sra.", "Srta.", "Dr.", "Dra.", "Ud.", "Uds.", "pág."],
        "fr" => &["M.", "Mme.", "Mlle.", "Dr.", "Pr.", "p.ex."],
        "de" => &["z.B.", "Nr.", "Dr.", "Hr.", "Fr.", "bzw.", "ca.", "d.h."],
        "it" => &["Sig.", "Sig.ra", "Dott.", "Dr.", "pag."],
        "pt" => &["Sr.", "Sra.", "Dr.", "Dra.", "pág."],
        _ => &[],
    }
}

#[cfg_attr(not(feature = "unicode-segmenter"), allow(dead_code))]
fn merge_after_abbreviations<'a>(
    text: &'a str,
    pieces: &[(usize, &'a str)],
    locale: &str,
) -> Vec<&'a str> {
    let known = abbreviations(locale);
    let mut merged = Vec::with_capacity(pieces.len());
    let mut current: Option<(usize, usize)> = None;

    for (index, (start, piece)) in pieces.iter().enumerate() {
        let end = start + piece.len();
        let (span_start, _) = current.unwrap_or((*start, end));
        current = Some((span_start, end));

        let last_word = piece.split_whitespace().last().unwrap_or("");
        let has_next = index + 1 < pieces.len();
        if has_next && known.contains(&last_word) {
            continue;
        }

        merged.push(&text[span_start..end]);
        current = None;
    }

    if let Some((start, end)) = current {
        merged.push(&text[start..end]);
    }

    merged
}

/// Split a piece into leading whitespace, core text and trailing whitespace
fn split_surrounding_whitespace(piece: &str) -> Vec<&str> {
    let trimmed_start = piece.trim_start();
    let leading = &piece[..piece.len() - trimmed_start.len()];
    let core = trimmed_start.trim_end();
    let trailing = &trimmed_start[core.len()..];

    [leading, core, trailing]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect()
}

fn collect_with_offsets(pieces: Vec<&str>) -> Vec<RawSentence> {
    let mut sentences: Vec<RawSentence> = Vec::new();
    let mut consumed = 0;

    for piece in pieces {
        for part in split_surrounding_whitespace(piece) {
            let part_len = part.chars().count();
            let is_whitespace = part.chars().all(char::is_whitespace);

            // One hidden span per run of whitespace, e.g. a paragraph break
            match sentences.last_mut() {
                Some(previous) if is_whitespace && previous.is_whitespace() => {
                    previous.text.push_str(part);
                }
                _ => sentences.push(RawSentence {
                    text: part.to_string(),
                    start_char: consumed,
                }),
            }
            consumed += part_len;
        }
    }

    sentences
}
