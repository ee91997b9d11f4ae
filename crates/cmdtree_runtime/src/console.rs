//! The interactive console.

use std::sync::Arc;

use cmdtree_engine::{CommandManager, DispatchOutcome, Messenger};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::actor::ConsoleActor;
use crate::editor::{LineEditor, ReadResult, strip_slash};
use crate::error::Result;
use crate::messenger::ConsoleMessenger;

/// Built-in console commands, handled before dispatch.
const QUIT: [&str; 2] = [":quit", ":q"];

/// Reads command lines and dispatches them as the console actor.
pub struct Console<E: LineEditor, W: std::io::Write + Send = std::io::Stdout> {
    editor: E,
    manager: Arc<CommandManager>,
    actor: Arc<RwLock<ConsoleActor>>,
    messenger: Arc<ConsoleMessenger<W>>,
    prompt: String,
    show_banner: bool,
}

impl<E: LineEditor, W: std::io::Write + Send> Console<E, W> {
    /// Creates a console.
    pub fn new(
        editor: E,
        manager: Arc<CommandManager>,
        actor: Arc<RwLock<ConsoleActor>>,
        messenger: Arc<ConsoleMessenger<W>>,
    ) -> Self {
        Self {
            editor,
            manager,
            actor,
            messenger,
            prompt: "> ".to_string(),
            show_banner: true,
        }
    }

    /// Sets the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Returns the editor.
    pub const fn editor(&self) -> &E {
        &self.editor
    }

    /// Runs until EOF or `:quit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }
        while self.read_eval_print()? {}
        Ok(())
    }

    /// Executes one read-dispatch-report iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let line = match self.editor.read_line(&self.prompt)? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => return Ok(true),
            ReadResult::Eof => return Ok(false),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(true);
        }
        self.editor.add_history(trimmed);

        if QUIT.contains(&trimmed) {
            return Ok(false);
        }

        self.execute(trimmed);
        Ok(true)
    }

    /// Dispatches one line and reports any failure to the console.
    pub fn execute(&self, line: &str) -> DispatchOutcome {
        let (line, _) = strip_slash(line.trim());
        let actor = self.actor.read();
        let outcome = self.manager.dispatch(&*actor, line);

        match &outcome {
            DispatchOutcome::InternalError { message, .. } => {
                warn!(%message, "internal dispatch error");
            }
            other => debug!(success = other.is_success(), "line handled"),
        }

        let prefix = outcome
            .path()
            .and_then(|path| path.first())
            .and_then(|family| self.manager.family(family))
            .and_then(|family| family.prefix)
            .unwrap_or_default();
        self.messenger.report(&*actor, &prefix, &outcome);
        outcome
    }

    fn print_banner(&self) {
        let names: Vec<String> = self
            .manager
            .families()
            .into_iter()
            .map(|family| family.name)
            .collect();
        let actor = self.actor.read();
        self.messenger.send(
            &*actor,
            &format!(
                "cmdtree {} - commands: {}. Tab completes, :quit exits.",
                env!("CARGO_PKG_VERSION"),
                names.join(", ")
            ),
        );
    }
}
