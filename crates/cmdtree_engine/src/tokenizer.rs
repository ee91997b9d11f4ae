//! Input tokenization.
//!
//! Converts a raw command line into whitespace-delimited tokens. A token that
//! starts with a quote character runs to the matching quote and may contain
//! whitespace; the quotes are stripped and a backslash escapes the next
//! character inside the span. Text glued to a closing quote belongs to the
//! same token, so `"ab"cd` is the single token `abcd`.

use thiserror::Error;

/// Default quote characters.
pub const DEFAULT_QUOTES: &[char] = &['"', '\''];

/// A token from actor input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputToken {
    /// Token text with quotes stripped.
    pub text: String,
    /// Whether the token was written as a quoted span.
    pub quoted: bool,
    /// Byte offset of the token start (including any opening quote).
    pub start: usize,
}

impl InputToken {
    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for InputToken {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Tokenization failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TokenizeError {
    /// A quoted span was never closed.
    #[error("unterminated {quote} quote starting at column {column}")]
    UnterminatedQuote {
        /// The opening quote character.
        quote: char,
        /// 1-indexed character column of the opening quote.
        column: usize,
    },
}

/// A partially typed line, as seen by the completion engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialLine {
    /// Tokens that are complete (followed by a delimiter).
    pub tokens: Vec<InputToken>,
    /// The trailing token being typed; empty after a trailing delimiter.
    pub stem: String,
    /// Byte offset where the stem starts in the input.
    pub stem_start: usize,
}

/// Raw scan result shared by strict and lenient tokenization.
struct Scan {
    tokens: Vec<InputToken>,
    open_quote: Option<(char, usize)>,
    ends_with_delimiter: bool,
}

/// Tokenizes actor input.
#[derive(Clone, Debug)]
pub struct InputTokenizer {
    quotes: Vec<char>,
}

impl Default for InputTokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTES.to_vec())
    }
}

impl InputTokenizer {
    /// Creates a tokenizer recognizing the given quote characters.
    #[must_use]
    pub fn new(quotes: Vec<char>) -> Self {
        Self { quotes }
    }

    /// Tokenizes a complete command line.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError::UnterminatedQuote`] if a quoted span is not
    /// closed before the end of input.
    pub fn tokenize(&self, input: &str) -> Result<Vec<InputToken>, TokenizeError> {
        let scan = self.scan(input);
        if let Some((quote, start)) = scan.open_quote {
            return Err(TokenizeError::UnterminatedQuote {
                quote,
                column: input[..start].chars().count() + 1,
            });
        }
        Ok(scan.tokens)
    }

    /// Tokenizes a line that is still being typed.
    ///
    /// Never fails: an unterminated quote simply becomes the stem.
    #[must_use]
    pub fn tokenize_partial(&self, input: &str) -> PartialLine {
        let mut scan = self.scan(input);

        if scan.ends_with_delimiter {
            return PartialLine {
                tokens: scan.tokens,
                stem: String::new(),
                stem_start: input.len(),
            };
        }

        match scan.tokens.pop() {
            Some(last) => PartialLine {
                tokens: scan.tokens,
                stem: last.text,
                stem_start: last.start,
            },
            None => PartialLine {
                tokens: Vec::new(),
                stem: String::new(),
                stem_start: input.len(),
            },
        }
    }

    fn is_quote(&self, ch: char) -> bool {
        self.quotes.contains(&ch)
    }

    fn scan(&self, input: &str) -> Scan {
        let mut tokens = Vec::new();
        let mut chars = input.char_indices();
        let mut current = String::new();
        let mut current_start = None;
        let mut current_quoted = false;
        let mut ends_with_delimiter = true;

        while let Some((pos, ch)) = chars.next() {
            // Start of quoted span (only at a token boundary)
            if current_start.is_none() && self.is_quote(ch) {
                let mut quoted = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    if c == ch {
                        closed = true;
                        break;
                    }
                    if c == '\\' {
                        if let Some((_, escaped)) = chars.next() {
                            quoted.push(escaped);
                        }
                        continue;
                    }
                    quoted.push(c);
                }
                if !closed {
                    tokens.push(InputToken {
                        text: quoted,
                        quoted: true,
                        start: pos,
                    });
                    return Scan {
                        tokens,
                        open_quote: Some((ch, pos)),
                        ends_with_delimiter: false,
                    };
                }
                // Anything up to the next whitespace extends this token
                current = quoted;
                current_start = Some(pos);
                current_quoted = true;
                ends_with_delimiter = false;
                continue;
            }

            if ch.is_whitespace() {
                if let Some(start) = current_start.take() {
                    tokens.push(InputToken {
                        text: std::mem::take(&mut current),
                        quoted: std::mem::take(&mut current_quoted),
                        start,
                    });
                }
                ends_with_delimiter = true;
                continue;
            }

            if current_start.is_none() {
                current_start = Some(pos);
            }
            current.push(ch);
            ends_with_delimiter = false;
        }

        // Flush final word
        if let Some(start) = current_start {
            tokens.push(InputToken {
                text: current,
                quoted: current_quoted,
                start,
            });
        }

        Scan {
            tokens,
            open_quote: None,
            ends_with_delimiter,
        }
    }
}
