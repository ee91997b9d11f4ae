//! Line editor abstraction for the console.
//!
//! The console talks to a [`LineEditor`]; [`RustylineEditor`] is the real
//! terminal implementation, with tab completion served by the command
//! manager.

use std::borrow::Cow;
use std::sync::Arc;

use cmdtree_engine::{CommandManager, InputTokenizer};
use parking_lot::RwLock;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter, Validator};

use crate::actor::ConsoleActor;
use crate::error::{Result, RuntimeError};

/// Result of reading a line from the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// A line was read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// User pressed Ctrl+D (EOF).
    Eof,
}

/// Abstraction over line editing.
pub trait LineEditor {
    /// Reads a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Adds a line to history.
    fn add_history(&mut self, line: &str);
}

/// Strips the conventional leading slash from a command line.
///
/// Returns the rest of the line and the number of bytes removed.
#[must_use]
pub fn strip_slash(line: &str) -> (&str, usize) {
    match line.strip_prefix('/') {
        Some(rest) => (rest, 1),
        None => (line, 0),
    }
}

/// Wraps a candidate in the first quote character when it would not
/// survive tokenization as a single bare word.
fn quote_candidate(candidate: String, quotes: &[char]) -> String {
    let Some(&quote) = quotes.first() else {
        return candidate;
    };
    let needs_quotes = candidate
        .chars()
        .any(|c| c.is_whitespace() || quotes.contains(&c));
    if !needs_quotes {
        return candidate;
    }

    let mut quoted = String::with_capacity(candidate.len() + 2);
    quoted.push(quote);
    for c in candidate.chars() {
        if c == quote || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push(quote);
    quoted
}

/// Tab completion backed by the command manager.
struct CommandCompleter {
    manager: Arc<CommandManager>,
    actor: Arc<RwLock<ConsoleActor>>,
    tokenizer: InputTokenizer,
}

impl CommandCompleter {
    /// Returns the byte offset of the word being completed and the
    /// candidates for it.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let head = &line[..pos];
        let trimmed = head.trim_start();
        let indent = head.len() - trimmed.len();
        let (text, slash) = strip_slash(trimmed);
        let partial = self.tokenizer.tokenize_partial(text);
        let candidates = self.manager.complete(&*self.actor.read(), text);
        (indent + slash + partial.stem_start, candidates)
    }

    /// Candidates paired with the text to insert, quoted where needed.
    fn replacements(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let (start, candidates) = self.candidates(line, pos);
        let quotes = &self.manager.config().quotes;
        let pairs = candidates
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: quote_candidate(candidate, quotes),
            })
            .collect();
        (start, pairs)
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.replacements(line, pos))
    }
}

#[derive(Helper, Completer, Hinter, Validator)]
struct ConsoleHelper {
    #[rustyline(Completer)]
    completer: CommandCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
}

impl Highlighter for ConsoleHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;32m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        false
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

/// Line editor implementation using rustyline.
pub struct RustylineEditor {
    editor: Editor<ConsoleHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Creates a terminal editor completing against `manager` as `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Editor`] if rustyline cannot be initialised.
    pub fn new(manager: Arc<CommandManager>, actor: Arc<RwLock<ConsoleActor>>) -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(1000)
            .map_err(|e| RuntimeError::Editor(e.to_string()))?
            .build();

        let tokenizer = InputTokenizer::new(manager.config().quotes.clone());
        let helper = ConsoleHelper {
            completer: CommandCompleter {
                manager,
                actor,
                tokenizer,
            },
            hinter: HistoryHinter::new(),
        };

        let mut editor =
            Editor::with_config(config).map_err(|e| RuntimeError::Editor(e.to_string()))?;
        editor.set_helper(Some(helper));

        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(RuntimeError::Editor(e.to_string())),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }
}

/// An editor that replays scripted input, for tests and `-c` mode.
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    lines: std::collections::VecDeque<ReadResult>,
    history: Vec<String>,
}

impl ScriptedEditor {
    /// Creates an editor that yields each line and then EOF.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|line| ReadResult::Line(line.into()))
                .collect(),
            history: Vec::new(),
        }
    }

    /// Queues a Ctrl+C.
    #[must_use]
    pub fn interrupted(mut self) -> Self {
        self.lines.push_back(ReadResult::Interrupted);
        self
    }

    /// Returns the lines added to history.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self.lines.pop_front().unwrap_or(ReadResult::Eof))
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }
}
