//! Whitespace splitting and quoted spans.

use cmdtree::engine::{InputToken, InputTokenizer, TokenizeError};

fn texts(input: &str) -> Vec<String> {
    InputTokenizer::default()
        .tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.text)
        .collect()
}

#[test]
fn splits_on_any_whitespace() {
    assert_eq!(texts("sample\tuser   add\nalice"), ["sample", "user", "add", "alice"]);
}

#[test]
fn empty_and_blank_lines_have_no_tokens() {
    assert!(texts("").is_empty());
    assert!(texts("   \t ").is_empty());
}

#[test]
fn double_and_single_quotes() {
    assert_eq!(texts(r#"tell bob "hi there" 'and you'"#), ["tell", "bob", "hi there", "and you"]);
}

#[test]
fn empty_quoted_token_is_kept() {
    assert_eq!(texts(r#"say """#), ["say", ""]);
}

#[test]
fn suffix_after_closing_quote_stays_in_token() {
    assert_eq!(texts(r#"user add "alice"x"#), ["user", "add", "alicex"]);
    assert_eq!(texts(r#"say "a b"c d"#), ["say", "a bc", "d"]);
}

#[test]
fn quote_inside_word_is_literal() {
    assert_eq!(texts(r#"say it"s"#), ["say", r#"it"s"#]);
}

#[test]
fn token_offsets() {
    let tokens = InputTokenizer::default().tokenize("  a 'b c' d").unwrap();
    let starts: Vec<usize> = tokens.iter().map(|t| t.start).collect();
    assert_eq!(starts, [2, 4, 10]);
    assert!(tokens[1].quoted);
    assert!(!tokens[2].quoted);
}

#[test]
fn custom_quote_set() {
    let tokenizer = InputTokenizer::new(vec!['`']);
    let tokens: Vec<InputToken> = tokenizer.tokenize("say `a b` \"c d\"").unwrap();
    let texts: Vec<&str> = tokens.iter().map(InputToken::as_str).collect();
    assert_eq!(texts, ["say", "a b", "\"c", "d\""]);
}

#[test]
fn unterminated_single_quote() {
    let err = InputTokenizer::default().tokenize("say 'oops").unwrap_err();
    assert_eq!(
        err,
        TokenizeError::UnterminatedQuote {
            quote: '\'',
            column: 5
        }
    );
    assert_eq!(err.to_string(), "unterminated ' quote starting at column 5");
}
