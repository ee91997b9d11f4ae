//! Usage and help rendering.

use std::fmt::Write as _;

use crate::actor::Actor;
use crate::permission::PermissionGate;
use crate::tree::{CommandNode, Executor};

/// One line of a family's help listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tooltip {
    /// Canonical path to the executable node.
    pub path: Vec<String>,
    /// Rendered usage line.
    pub usage: String,
    /// Node description, if any.
    pub description: Option<String>,
}

impl Tooltip {
    /// Renders the tooltip as `usage - description`.
    #[must_use]
    pub fn line(&self) -> String {
        match &self.description {
            Some(description) => format!("{} - {description}", self.usage),
            None => self.usage.clone(),
        }
    }
}

/// Renders a usage line such as `/sample user add <username> [password]`.
///
/// Required parameters are shown as `<name>`, optional ones as `[name]`, and
/// varargs get a trailing `...`.
#[must_use]
pub fn usage<S: AsRef<str>>(path: &[S], executor: Option<&Executor>) -> String {
    let mut line = String::from("/");
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(segment.as_ref());
    }

    for parameter in executor.map(Executor::parameters).unwrap_or_default() {
        let dots = if parameter.vararg { "..." } else { "" };
        let (open, close) = if parameter.optional { ('[', ']') } else { ('<', '>') };
        let _ = write!(line, " {open}{}{dots}{close}", parameter.name);
    }
    line
}

/// Lists every executable node of a family the actor may reach, in display
/// order.
#[must_use]
pub fn tooltips(actor: &dyn Actor, family: &CommandNode) -> Vec<Tooltip> {
    let mut tips = Vec::new();
    let mut path = Vec::new();
    collect(actor, family, &mut path, &mut tips);
    tips
}

fn collect(actor: &dyn Actor, node: &CommandNode, path: &mut Vec<String>, tips: &mut Vec<Tooltip>) {
    if !PermissionGate::check(actor, node) {
        return;
    }
    path.push(node.name().to_string());

    if let Some(executor) = node.executor() {
        tips.push(Tooltip {
            path: path.clone(),
            usage: usage(path.as_slice(), Some(executor)),
            description: node.description().map(str::to_string),
        });
    }
    for child in node.children_sorted() {
        collect(actor, child, path, tips);
    }

    path.pop();
}
