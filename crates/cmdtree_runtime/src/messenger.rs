//! Console output.

use std::io::{self, Write};

use cmdtree_engine::{Actor, DispatchOutcome, Messenger};
use parking_lot::Mutex;
use tracing::warn;

/// Writes messages to a console stream.
///
/// Messages to the console actor are printed as-is; messages to anyone else
/// are tagged with the recipient's name.
pub struct ConsoleMessenger<W: Write + Send = io::Stdout> {
    console: String,
    out: Mutex<W>,
}

impl ConsoleMessenger<io::Stdout> {
    /// Creates a messenger printing to stdout.
    #[must_use]
    pub fn stdout(console: impl Into<String>) -> Self {
        Self::new(console, io::stdout())
    }
}

impl<W: Write + Send> ConsoleMessenger<W> {
    /// Creates a messenger writing to `out`.
    pub fn new(console: impl Into<String>, out: W) -> Self {
        Self {
            console: console.into(),
            out: Mutex::new(out),
        }
    }

    /// Reports a dispatch outcome to the actor; successful invocations print
    /// nothing.
    pub fn report(&self, actor: &dyn Actor, prefix: &str, outcome: &DispatchOutcome) {
        if outcome.is_success() {
            return;
        }
        self.send(actor, &format!("{prefix}{outcome}"));
    }

    /// Consumes the messenger and returns the stream.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl ConsoleMessenger<Vec<u8>> {
    /// Returns everything written so far.
    #[must_use]
    pub fn captured(&self) -> String {
        String::from_utf8_lossy(&self.out.lock()).into_owned()
    }
}

impl<W: Write + Send> Messenger for ConsoleMessenger<W> {
    fn send(&self, actor: &dyn Actor, text: &str) {
        let mut out = self.out.lock();
        let result = if actor.name() == self.console {
            writeln!(out, "{text}")
        } else {
            writeln!(out, "[to {}] {text}", actor.name())
        };
        if let Err(error) = result.and_then(|()| out.flush()) {
            warn!(%error, "console write failed");
        }
    }
}
