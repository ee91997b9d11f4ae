//! Permission gating.
//!
//! A node's permission list is evaluated as ANY-of: the actor needs at least
//! one of the listed permissions. An empty list is unrestricted.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::tree::CommandNode;

/// Default-grant policy for a permission, for hosts that support one.
///
/// The gate never evaluates this; it is exported with the registered family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PermissionDefault {
    /// Granted to everyone.
    Allow,
    /// Granted to no one.
    Deny,
    /// Granted to operators only.
    OpOnly,
    /// Granted to everyone except operators.
    NotOp,
}

impl PermissionDefault {
    /// Returns whether this default grants the permission.
    #[must_use]
    pub const fn grants(self, is_op: bool) -> bool {
        match self {
            Self::Allow => true,
            Self::Deny => false,
            Self::OpOnly => is_op,
            Self::NotOp => !is_op,
        }
    }
}

/// A permission declared by a registered node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermissionDeclaration {
    /// The permission string.
    pub permission: String,
    /// Default-grant policy, if declared.
    pub default: Option<PermissionDefault>,
    /// Description of the declaring node.
    pub description: Option<String>,
}

impl PermissionDeclaration {
    /// Collects declarations from a node and its descendants.
    ///
    /// Each permission string is declared once; the first node declaring it
    /// (in display order) supplies the default and description.
    #[must_use]
    pub fn collect(node: &CommandNode) -> Vec<Self> {
        let mut declarations = Vec::new();
        collect_into(node, &mut declarations);
        declarations
    }
}

fn collect_into(node: &CommandNode, declarations: &mut Vec<PermissionDeclaration>) {
    for permission in node.permissions() {
        if declarations.iter().any(|d| *d.permission == **permission) {
            continue;
        }
        declarations.push(PermissionDeclaration {
            permission: permission.to_string(),
            default: node.permission_default(),
            description: node.description().map(str::to_string),
        });
    }
    for child in node.children_sorted() {
        collect_into(child, declarations);
    }
}

/// Evaluates node permissions against an actor.
pub struct PermissionGate;

impl PermissionGate {
    /// Returns true if the actor may pass through the node.
    #[must_use]
    pub fn check(actor: &dyn Actor, node: &CommandNode) -> bool {
        Self::check_any(actor, node.permissions())
    }

    /// Returns true if the list is empty or the actor holds any entry.
    #[must_use]
    pub fn check_any<S: AsRef<str>>(actor: &dyn Actor, permissions: &[S]) -> bool {
        permissions.is_empty()
            || permissions
                .iter()
                .any(|permission| actor.has_permission(permission.as_ref()))
    }
}
