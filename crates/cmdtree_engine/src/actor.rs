//! Collaborator traits supplied by the host.
//!
//! The engine never talks to the outside world itself: it asks an [`Actor`]
//! about identity and permissions, and hosts use a [`Messenger`] to report
//! dispatch outcomes back.

use std::collections::HashSet;

/// The entity issuing a command.
pub trait Actor {
    /// Display name of the actor.
    fn name(&self) -> &str;

    /// Returns true if the actor holds the given permission.
    ///
    /// Wildcards and implication are the host's business.
    fn has_permission(&self, permission: &str) -> bool;

    /// Returns true if the actor is a live player (as opposed to a console).
    fn is_player(&self) -> bool;
}

/// Sends text back to an actor.
pub trait Messenger: Send + Sync {
    /// Delivers a message to the actor.
    fn send(&self, actor: &dyn Actor, text: &str);
}

/// An actor with a fixed permission set.
#[derive(Clone, Debug, Default)]
pub struct SimpleActor {
    name: String,
    player: bool,
    permissions: HashSet<String>,
}

impl SimpleActor {
    /// Creates a non-player actor with no permissions.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            player: false,
            permissions: HashSet::new(),
        }
    }

    /// Creates a player actor with no permissions.
    #[must_use]
    pub fn player(name: impl Into<String>) -> Self {
        Self {
            player: true,
            ..Self::new(name)
        }
    }

    /// Grants a permission.
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Grants several permissions.
    #[must_use]
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }
}

impl Actor for SimpleActor {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    fn is_player(&self) -> bool {
        self.player
    }
}
