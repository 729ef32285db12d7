use polyglot_reader::domain::alignment::{segment, segment_by_punctuation, weight, Timeline};
use proptest::prelude::*;

#[test]
fn it_should_segment_cjk_text_on_full_width_stops() {
    let pieces = segment("今日は晴れです。明日は雨です。", "Japanese");
    let visible: Vec<&str> = pieces
        .iter()
        .filter(|piece| !piece.is_whitespace())
        .map(|piece| piece.text.as_str())
        .collect();

    assert_eq!(visible, vec!["今日は晴れです。", "明日は雨です。"]);
    assert_eq!(pieces[1].start_char, 8);
}

#[test]
fn it_should_give_an_empty_article_no_sentences() {
    let pieces = segment("", "English");
    assert!(pieces.is_empty());
    assert!(Timeline::map(&pieces, 12.0).spans().is_empty());
}

proptest! {
    #[test]
    fn it_should_partition_text_without_losing_characters(text in "[a-zA-Z ,.!?\n]{0,200}") {
        for pieces in [segment(&text, "English"), segment_by_punctuation(&text)] {
            let joined: String = pieces.iter().map(|piece| piece.text.as_str()).collect();
            prop_assert_eq!(&joined, &text);

            let mut expected_start = 0;
            for piece in &pieces {
                prop_assert_eq!(piece.start_char, expected_start);
                prop_assert!(!piece.text.is_empty());
                expected_start = piece.end_char();
            }
        }
    }

    #[test]
    fn it_should_cover_the_whole_duration_contiguously(
        text in "[a-z]{1,12}([.!?,]? [a-z]{1,12}){0,30}[.!?]",
        duration in 0.5f64..600.0,
    ) {
        let timeline = Timeline::map(&segment(&text, "English"), duration);
        let spans = timeline.spans();

        prop_assert_eq!(spans.first().unwrap().start_time, 0.0);
        prop_assert!((spans.last().unwrap().end_time - duration).abs() < 1e-9);
        for pair in spans.windows(2) {
            prop_assert_eq!(pair[0].end_time, pair[1].start_time);
        }
        for span in spans {
            prop_assert!(span.end_time >= span.start_time);
            prop_assert!(weight(&span.text) > 0);
        }
    }
}
