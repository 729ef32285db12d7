pub const TERMINATOR_WEIGHT: usize = 20;
pub const PAUSE_MARK_WEIGHT: usize = 8;
pub const QUOTE_MARK_WEIGHT: usize = 2;
pub const NEWLINE_WEIGHT: usize = 25;

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '。' | '！' | '？')
}

fn is_pause_mark(c: char) -> bool {
    matches!(c, ',' | ';' | ':' | '，' | '、' | '；' | '：' | '—' | '–')
}

fn is_quote_mark(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '“' | '”' | '‘' | '’' | '«' | '»' | '「' | '」' | '『' | '』'
    )
}

/// Heuristic speech weight of a sentence:
/// `len + 20*terminators + 8*pause marks + 2*quotes + 25*newlines`,
/// with `len` counted in characters. Zero only for the empty string.
pub fn weight(text: &str) -> usize {
    text.chars()
        .map(|c| {
            let extra = if is_terminator(c) {
                TERMINATOR_WEIGHT
            } else if is_pause_mark(c) {
                PAUSE_MARK_WEIGHT
            } else if is_quote_mark(c) {
                QUOTE_MARK_WEIGHT
            } else if c == '\n' {
                NEWLINE_WEIGHT
            } else {
                0
            };
            1 + extra
        })
        .sum()
}
