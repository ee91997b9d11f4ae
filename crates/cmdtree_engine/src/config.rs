//! Configuration for the dispatch engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tokenizer::DEFAULT_QUOTES;

/// Configuration for the dispatch engine.
///
/// Controls tokenization, vararg joining and completion.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Characters that open and close a quoted token.
    pub quotes: Vec<char>,

    /// Separator used when joining vararg tokens for joined transforms.
    pub vararg_separator: String,

    /// Whether completion is offered at all.
    pub allow_completion: bool,

    /// Maximum number of completion candidates returned (0 = unlimited).
    pub max_completions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quotes: DEFAULT_QUOTES.to_vec(),
            vararg_separator: " ".to_string(),
            allow_completion: true,
            max_completions: 0,
        }
    }
}

impl EngineConfig {
    /// Builder method to set the quote characters.
    #[must_use]
    pub fn with_quotes(mut self, quotes: impl IntoIterator<Item = char>) -> Self {
        self.quotes = quotes.into_iter().collect();
        self
    }

    /// Builder method to set the vararg separator.
    #[must_use]
    pub fn with_vararg_separator(mut self, separator: impl Into<String>) -> Self {
        self.vararg_separator = separator.into();
        self
    }

    /// Builder method to enable/disable completion.
    #[must_use]
    pub fn with_completion(mut self, allow: bool) -> Self {
        self.allow_completion = allow;
        self
    }

    /// Builder method to cap completion results.
    #[must_use]
    pub fn with_max_completions(mut self, max: usize) -> Self {
        self.max_completions = max;
        self
    }
}
