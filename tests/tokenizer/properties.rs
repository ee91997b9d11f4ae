//! Property tests for the tokenizer.

use cmdtree::engine::InputTokenizer;
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.~-]{1,12}"
}

fn gap() -> impl Strategy<Value = String> {
    "[ \t]{1,4}"
}

proptest! {
    #[test]
    fn plain_words_survive(words in prop::collection::vec(word(), 0..10), gaps in prop::collection::vec(gap(), 10)) {
        let mut line = String::new();
        for (word, gap) in words.iter().zip(&gaps) {
            line.push_str(gap);
            line.push_str(word);
        }

        let tokens = InputTokenizer::default().tokenize(&line).unwrap();
        let texts: Vec<String> = tokens.iter().map(|t| t.text.clone()).collect();
        prop_assert_eq!(texts, words);
    }

    #[test]
    fn quoted_span_is_one_token(inner in "[a-z ]{0,20}") {
        let line = format!("say \"{inner}\"");
        let tokens = InputTokenizer::default().tokenize(&line).unwrap();
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(&tokens[1].text, &inner);
    }

    #[test]
    fn never_panics(input in any::<String>()) {
        let tokenizer = InputTokenizer::default();
        let _ = tokenizer.tokenize(&input);
        let partial = tokenizer.tokenize_partial(&input);
        prop_assert!(partial.stem_start <= input.len());
        prop_assert!(input.is_char_boundary(partial.stem_start));
    }

    #[test]
    fn partial_agrees_with_strict(words in prop::collection::vec(word(), 1..8)) {
        let line = words.join(" ");
        let strict = InputTokenizer::default().tokenize(&line).unwrap();
        let partial = InputTokenizer::default().tokenize_partial(&line);
        prop_assert_eq!(partial.tokens.len() + 1, strict.len());
        prop_assert_eq!(&partial.stem, &strict[strict.len() - 1].text);
    }
}
