//! Tree walk from tokens to an executable node.
//!
//! The first token picks the family; each following token descends into a
//! child when it names one (literal children always win over parameters).
//! The permission gate is checked on every node before it is entered.

use std::sync::Arc;

use tracing::trace;

use crate::actor::Actor;
use crate::permission::PermissionGate;
use crate::tree::{CommandNode, CommandTree, Executor};

/// How far a walk got.
#[derive(Debug)]
pub struct Walk<'t> {
    /// Nodes entered, family root first.
    pub chain: Vec<&'t Arc<CommandNode>>,
    /// Number of tokens consumed by the walk.
    pub consumed: usize,
}

impl<'t> Walk<'t> {
    /// The deepest node reached.
    #[must_use]
    pub fn node(&self) -> &'t Arc<CommandNode> {
        // chain always holds at least the family root
        self.chain[self.chain.len() - 1]
    }

    /// Canonical names of the chain.
    #[must_use]
    pub fn path(&self) -> Vec<String> {
        self.chain.iter().map(|n| n.name().to_string()).collect()
    }
}

/// Why resolution stopped short of an executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// No family matches the first token.
    NoSuchCommand {
        /// The first token.
        label: String,
    },
    /// The walk ended on a node that cannot take the remaining input.
    NoSuchSubcommand {
        /// Path to the node where the walk ended.
        path: Vec<String>,
        /// The unmatched token, if there was one.
        token: Option<String>,
        /// Children the actor may use, in display order.
        candidates: Vec<String>,
    },
    /// The actor failed the gate on a node.
    PermissionDenied {
        /// Path up to and including the denied node.
        path: Vec<String>,
    },
}

/// A resolved executable node.
#[derive(Debug)]
pub struct Target<'t> {
    /// The walk that led here.
    pub walk: Walk<'t>,
    /// The executor to bind against.
    pub executor: &'t Executor,
}

/// Walks the command tree for an actor.
pub struct Resolver;

impl Resolver {
    /// Walks as far as literal children match.
    ///
    /// `tokens` must not be empty.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoSuchCommand`] or
    /// [`ResolveError::PermissionDenied`].
    pub fn walk<'t, S: AsRef<str>>(
        tree: &'t CommandTree,
        actor: &dyn Actor,
        tokens: &[S],
    ) -> Result<Walk<'t>, ResolveError> {
        let label = tokens.first().map_or("", |t| t.as_ref());
        let Some(family) = tree.family(label) else {
            return Err(ResolveError::NoSuchCommand {
                label: label.to_string(),
            });
        };

        let mut walk = Walk {
            chain: vec![family],
            consumed: 1,
        };
        if !PermissionGate::check(actor, family) {
            return Err(ResolveError::PermissionDenied { path: walk.path() });
        }

        while let Some(token) = tokens.get(walk.consumed) {
            let Some(child) = walk.node().find_child(token.as_ref()) else {
                break;
            };
            walk.chain.push(child);
            if !PermissionGate::check(actor, child) {
                return Err(ResolveError::PermissionDenied { path: walk.path() });
            }
            walk.consumed += 1;
            trace!(node = %child.name(), "descended");
        }

        Ok(walk)
    }

    /// Resolves tokens to an executor.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when no executor can take the input.
    pub fn resolve<'t, S: AsRef<str>>(
        tree: &'t CommandTree,
        actor: &dyn Actor,
        tokens: &[S],
    ) -> Result<Target<'t>, ResolveError> {
        let walk = Self::walk(tree, actor, tokens)?;
        let node = walk.node();
        let leftover = tokens.get(walk.consumed).map(|t| t.as_ref().to_string());

        match node.executor() {
            Some(executor)
                if !(node.has_children()
                    && executor.parameters().is_empty()
                    && leftover.is_some()) =>
            {
                Ok(Target { walk, executor })
            }
            _ => Err(ResolveError::NoSuchSubcommand {
                path: walk.path(),
                token: leftover,
                candidates: visible_children(actor, node),
            }),
        }
    }
}

/// Names of the children the actor may enter, in display order.
#[must_use]
pub fn visible_children(actor: &dyn Actor, node: &CommandNode) -> Vec<String> {
    node.children_sorted()
        .into_iter()
        .filter(|child| PermissionGate::check(actor, child))
        .map(|child| child.name().to_string())
        .collect()
}
