//! The console actor.

use std::collections::{HashMap, HashSet};

use cmdtree_engine::{Actor, PermissionDeclaration, PermissionDefault};

use crate::settings::ActorSettings;

/// Grants everything.
pub const WILDCARD: &str = "*";

/// The actor typing at the console.
///
/// Permission checks go revocations first, then explicit grants, then the
/// defaults declared by registered families.
#[derive(Clone, Debug, Default)]
pub struct ConsoleActor {
    name: String,
    player: bool,
    op: bool,
    granted: HashSet<String>,
    revoked: HashSet<String>,
    defaults: HashMap<String, PermissionDefault>,
}

impl ConsoleActor {
    /// Creates a non-player, non-operator actor.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates an actor from configuration.
    #[must_use]
    pub fn from_settings(settings: &ActorSettings) -> Self {
        Self {
            name: settings.name.clone(),
            player: settings.player,
            op: settings.op,
            granted: settings.grant.iter().cloned().collect(),
            revoked: settings.revoke.iter().cloned().collect(),
            defaults: HashMap::new(),
        }
    }

    /// Returns true if the actor is an operator.
    #[must_use]
    pub const fn is_op(&self) -> bool {
        self.op
    }

    /// Sets operator status.
    pub fn set_op(&mut self, op: bool) {
        self.op = op;
    }

    /// Sets player status.
    pub fn set_player(&mut self, player: bool) {
        self.player = player;
    }

    /// Grants a permission, lifting any revocation.
    pub fn grant(&mut self, permission: impl Into<String>) {
        let permission = permission.into();
        self.revoked.remove(&permission);
        self.granted.insert(permission);
    }

    /// Revokes a permission, dropping any grant.
    pub fn revoke(&mut self, permission: impl Into<String>) {
        let permission = permission.into();
        self.granted.remove(&permission);
        self.revoked.insert(permission);
    }

    /// Records declared defaults for permissions not yet known.
    pub fn apply_declarations(&mut self, declarations: &[PermissionDeclaration]) {
        for declaration in declarations {
            if let Some(default) = declaration.default {
                self.defaults
                    .entry(declaration.permission.clone())
                    .or_insert(default);
            }
        }
    }
}

impl Actor for ConsoleActor {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_permission(&self, permission: &str) -> bool {
        if self.revoked.contains(permission) {
            return false;
        }
        if self.granted.contains(permission) || self.granted.contains(WILDCARD) {
            return true;
        }
        self.defaults
            .get(permission)
            .is_some_and(|default| default.grants(self.op))
    }

    fn is_player(&self) -> bool {
        self.player
    }
}
