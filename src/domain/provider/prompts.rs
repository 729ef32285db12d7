use crate::domain::language::LanguageCode;

/// Language definitions are translated into
pub const NATIVE_LANGUAGE: LanguageCode = LanguageCode::English;

/// Asks for the JSON shape of `WordDefinition`
pub fn word_analysis(word: &str, language: LanguageCode, context: &str) -> String {
    format!(
        "You are a {lang} tutor. Analyse the {lang} word \"{word}\" as it is used in this sentence:\n\
         \"{context}\"\n\n\
         Reply with JSON only, no commentary:\n\
         {{\"word\": \"{word}\", \"phonetic\": \"IPA transcription\", \
         \"guidance\": \"one or two sentences on pronunciation and usage\", \
         \"examples\": [\"example sentence in {lang}\", \"another example sentence in {lang}\"], \
         \"definition_target\": \"short definition written in {lang}\", \
         \"definition_native\": \"short definition written in {native}\"}}",
        lang = language.display_name(),
        native = NATIVE_LANGUAGE.display_name(),
    )
}

/// News prompt. `grounded` handlers can search the web; the others are
/// asked for a plausible, timely topic instead.
pub fn news_article(language: LanguageCode, grounded: bool) -> String {
    let source = if grounded {
        "Search the web for one real news story from the last few days and retell it"
    } else {
        "Pick a plausible, timely news topic and write about it"
    };

    format!(
        "{source} for an intermediate learner of {lang}. Write it in {lang}, \
         three or four short paragraphs separated by blank lines, with no markdown.\n\n\
         Reply with JSON only: {{\"title\": \"...\", \"content\": \"...\", \"source_url\": \"... or null\"}}",
        lang = language.display_name(),
    )
}

pub fn general_articles(language: LanguageCode, count: usize) -> String {
    format!(
        "Write {count} short, varied reading passages (culture, science, daily life) \
         for an intermediate learner of {lang}. Write them in {lang}, two or three paragraphs \
         each separated by blank lines, with no markdown.\n\n\
         Reply with JSON only: {{\"articles\": [{{\"title\": \"...\", \"content\": \"...\"}}]}}",
        lang = language.display_name(),
    )
}
