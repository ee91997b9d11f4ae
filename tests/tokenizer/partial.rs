//! Tokenizing lines that are still being typed.

use cmdtree::engine::InputTokenizer;

#[test]
fn empty_line_has_empty_stem() {
    let line = InputTokenizer::default().tokenize_partial("");
    assert!(line.tokens.is_empty());
    assert_eq!(line.stem, "");
    assert_eq!(line.stem_start, 0);
}

#[test]
fn single_word_is_the_stem() {
    let line = InputTokenizer::default().tokenize_partial("sam");
    assert!(line.tokens.is_empty());
    assert_eq!(line.stem, "sam");
}

#[test]
fn trailing_space_starts_a_new_stem() {
    let line = InputTokenizer::default().tokenize_partial("sample user add ");
    assert_eq!(line.tokens.len(), 3);
    assert_eq!(line.stem, "");
    assert_eq!(line.stem_start, 16);
}

#[test]
fn closed_quote_without_space_is_the_stem() {
    let line = InputTokenizer::default().tokenize_partial(r#"tell "bob""#);
    assert_eq!(line.tokens.len(), 1);
    assert_eq!(line.stem, "bob");
    assert_eq!(line.stem_start, 5);
}

#[test]
fn unterminated_quote_never_fails() {
    let line = InputTokenizer::default().tokenize_partial("tell 'hello wor");
    assert_eq!(line.tokens.len(), 1);
    assert_eq!(line.stem, "hello wor");
}
