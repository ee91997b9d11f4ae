//! Completion engine for partially typed input.
//!
//! Completion never runs handlers and never fails: anything that goes wrong
//! (an unknown family, a denied node, a failing or panicking completer) just
//! means fewer candidates.

use std::panic::{self, AssertUnwindSafe};

use cmdtree_foundation::Value;
use tracing::{trace, warn};

use crate::actor::Actor;
use crate::completion::{CompletionRegistry, CompletionRequest, PriorArgument, filter_prefix};
use crate::config::EngineConfig;
use crate::definition::Parameter;
use crate::permission::PermissionGate;
use crate::resolver::Resolver;
use crate::tokenizer::{InputToken, InputTokenizer};
use crate::transform::TransformRegistry;
use crate::tree::{CommandNode, CommandTree, Executor};

/// Produces completion candidates against one snapshot of the registries.
pub struct CompletionEngine<'s> {
    tree: &'s CommandTree,
    transforms: &'s TransformRegistry,
    completers: &'s CompletionRegistry,
    config: &'s EngineConfig,
}

impl<'s> CompletionEngine<'s> {
    /// Creates an engine over borrowed registries.
    #[must_use]
    pub fn new(
        tree: &'s CommandTree,
        transforms: &'s TransformRegistry,
        completers: &'s CompletionRegistry,
        config: &'s EngineConfig,
    ) -> Self {
        Self {
            tree,
            transforms,
            completers,
            config,
        }
    }

    /// Returns candidates for the token being typed at the end of `line`.
    #[must_use]
    pub fn complete(&self, actor: &dyn Actor, line: &str) -> Vec<String> {
        if !self.config.allow_completion {
            return Vec::new();
        }

        let partial = InputTokenizer::new(self.config.quotes.clone()).tokenize_partial(line);
        let mut candidates = if partial.tokens.is_empty() {
            self.family_candidates(actor, &partial.stem)
        } else {
            self.walk_candidates(actor, &partial.tokens, &partial.stem)
        };

        if self.config.max_completions > 0 {
            candidates.truncate(self.config.max_completions);
        }
        trace!(line, count = candidates.len(), "completed");
        candidates
    }

    fn family_candidates(&self, actor: &dyn Actor, stem: &str) -> Vec<String> {
        let families = self.tree.root().children_sorted();
        let labels = families
            .iter()
            .filter(|family| PermissionGate::check(actor, family))
            .flat_map(|family| family.labels());
        sorted_unique(filter_prefix(labels, stem))
    }

    fn walk_candidates(&self, actor: &dyn Actor, tokens: &[InputToken], stem: &str) -> Vec<String> {
        let Ok(walk) = Resolver::walk(self.tree, actor, tokens) else {
            return Vec::new();
        };
        let node = walk.node();
        let leftover = &tokens[walk.consumed..];

        let mut candidates = Vec::new();
        if leftover.is_empty() && node.has_children() {
            candidates = child_candidates(actor, node, stem);
        }
        if let Some(executor) = node.executor() {
            candidates.extend(self.parameter_candidates(actor, executor, leftover, stem));
        }
        candidates
    }

    fn parameter_candidates(
        &self,
        actor: &dyn Actor,
        executor: &Executor,
        leftover: &[InputToken],
        stem: &str,
    ) -> Vec<String> {
        if executor.playable_only() && !actor.is_player() {
            return Vec::new();
        }

        let parameters = executor.parameters();
        let slot = |index: usize| {
            if index < parameters.len() {
                Some(&parameters[index])
            } else if executor.has_vararg() {
                parameters.last()
            } else {
                None
            }
        };

        let Some(parameter) = slot(leftover.len()) else {
            return Vec::new();
        };
        let Some(completer) = self.completers.lookup(parameter) else {
            return Vec::new();
        };

        let prior: Vec<PriorArgument> = leftover
            .iter()
            .enumerate()
            .filter_map(|(index, token)| {
                let bound = slot(index)?;
                Some(PriorArgument {
                    parameter: bound.name.clone(),
                    raw: token.text.clone(),
                    value: self.convert(bound, &token.text),
                })
            })
            .collect();

        let request = CompletionRequest {
            actor,
            parameter,
            prior: &prior,
            stem,
        };
        match panic::catch_unwind(AssertUnwindSafe(|| completer(&request))) {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(error)) => {
                warn!(parameter = %parameter.name, %error, "completer failed");
                Vec::new()
            }
            Err(_) => {
                warn!(parameter = %parameter.name, "completer panicked");
                Vec::new()
            }
        }
    }

    fn convert(&self, parameter: &Parameter, raw: &str) -> Option<Value> {
        self.transforms.convert(&parameter.value_type, raw).ok()
    }
}

/// Names and aliases of the children the actor may enter, matching `stem`.
fn child_candidates(actor: &dyn Actor, node: &CommandNode, stem: &str) -> Vec<String> {
    let children = node.children_sorted();
    let labels = children
        .iter()
        .filter(|child| PermissionGate::check(actor, child))
        .flat_map(|child| child.labels());
    sorted_unique(filter_prefix(labels, stem))
}

fn sorted_unique(mut candidates: Vec<String>) -> Vec<String> {
    candidates.sort();
    candidates.dedup();
    candidates
}
