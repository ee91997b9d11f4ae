//! Persistent command tree.
//!
//! Nodes are immutable and shared through `Arc`; registering a command
//! rebuilds only the path from the root to the insertion point and returns a
//! new [`CommandTree`]. A failed registration leaves the original untouched.
//!
//! Children are indexed by lowercased name, with a separate alias map that
//! resolves to the owning child's name.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use cmdtree_foundation::{Error, ErrorContext, ErrorKind, Result};
use tracing::{debug, trace};

use crate::context::ExecutionContext;
use crate::definition::{CommandDefinition, Handler, HandlerResult, Parameter};
use crate::permission::PermissionDefault;
use crate::transform::{TransformRegistry, VarargPolicy};

/// The executable part of a node.
#[derive(Clone)]
pub struct Executor {
    parameters: Arc<[Parameter]>,
    handler: Handler,
    playable_only: bool,
}

impl Executor {
    /// Creates an executor.
    #[must_use]
    pub fn new(parameters: Vec<Parameter>, handler: Handler, playable_only: bool) -> Self {
        Self {
            parameters: parameters.into(),
            handler,
            playable_only,
        }
    }

    /// Returns the declared parameters.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns true if only live players may run this executor.
    #[must_use]
    pub const fn playable_only(&self) -> bool {
        self.playable_only
    }

    /// Number of tokens that must be supplied.
    #[must_use]
    pub fn min_required(&self) -> usize {
        self.parameters.iter().filter(|p| !p.optional).count()
    }

    /// Maximum number of tokens accepted; `None` when the last parameter is
    /// a vararg.
    #[must_use]
    pub fn max(&self) -> Option<usize> {
        if self.has_vararg() {
            None
        } else {
            Some(self.parameters.len())
        }
    }

    /// Returns true if the last parameter is a vararg.
    #[must_use]
    pub fn has_vararg(&self) -> bool {
        self.parameters.last().is_some_and(|p| p.vararg)
    }

    /// Runs the handler.
    ///
    /// # Errors
    ///
    /// Returns whatever the handler reports.
    pub fn invoke(&self, context: &ExecutionContext<'_>) -> HandlerResult {
        (self.handler)(context)
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("parameters", &self.parameters)
            .field("playable_only", &self.playable_only)
            .finish_non_exhaustive()
    }
}

/// A node in the command tree.
#[derive(Clone, Debug)]
pub struct CommandNode {
    name: Arc<str>,
    aliases: Vec<Arc<str>>,
    permissions: Vec<Arc<str>>,
    permission_default: Option<PermissionDefault>,
    sort_key: Option<i32>,
    description: Option<Arc<str>>,
    prefix: Option<Arc<str>>,
    /// Declaration order among siblings
    order: usize,
    /// Order assigned to the next child
    next_order: usize,
    executor: Option<Executor>,
    /// Children by lowercased name
    children: im::HashMap<String, Arc<CommandNode>>,
    /// Lowercased alias -> lowercased child name
    aliases_index: im::HashMap<String, String>,
}

impl CommandNode {
    fn root() -> Self {
        Self {
            name: Arc::from(""),
            aliases: Vec::new(),
            permissions: Vec::new(),
            permission_default: None,
            sort_key: None,
            description: None,
            prefix: None,
            order: 0,
            next_order: 0,
            executor: None,
            children: im::HashMap::new(),
            aliases_index: im::HashMap::new(),
        }
    }

    /// Returns the primary name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the aliases.
    #[must_use]
    pub fn aliases(&self) -> &[Arc<str>] {
        &self.aliases
    }

    /// Returns the permission list.
    #[must_use]
    pub fn permissions(&self) -> &[Arc<str>] {
        &self.permissions
    }

    /// Returns the advisory permission default.
    #[must_use]
    pub const fn permission_default(&self) -> Option<PermissionDefault> {
        self.permission_default
    }

    /// Returns the sort key.
    #[must_use]
    pub const fn sort_key(&self) -> Option<i32> {
        self.sort_key
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the message prefix.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the declaration order among siblings.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Returns the executor, if the node is executable.
    #[must_use]
    pub fn executor(&self) -> Option<&Executor> {
        self.executor.as_ref()
    }

    /// Returns true if the node has an executor and no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.executor.is_some() && self.children.is_empty()
    }

    /// Returns true if the node has children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Finds a child by name, then by alias, ignoring case.
    #[must_use]
    pub fn find_child(&self, token: &str) -> Option<&Arc<CommandNode>> {
        let key = token.to_lowercase();
        if let Some(child) = self.children.get(&key) {
            return Some(child);
        }
        self.aliases_index
            .get(&key)
            .and_then(|name| self.children.get(name))
    }

    /// Returns the children in display order.
    ///
    /// Nodes with a sort key come first (ascending), then declaration order,
    /// then name.
    #[must_use]
    pub fn children_sorted(&self) -> Vec<&Arc<CommandNode>> {
        let mut children: Vec<_> = self.children.values().collect();
        children.sort_by(|a, b| compare_siblings(a, b));
        children
    }

    /// Returns every name and alias of this node.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(&*self.name).chain(self.aliases.iter().map(|a| &**a))
    }

    /// Returns the sibling that owns `label`, if any.
    fn owner_of(&self, label: &str) -> Option<&Arc<CommandNode>> {
        self.find_child(label)
    }

    /// Returns a copy with `child` added, checking for name collisions.
    fn with_child(&self, mut child: CommandNode) -> Result<Self> {
        for label in child.labels() {
            if let Some(existing) = self.owner_of(label) {
                return Err(Error::duplicate_name(label, existing.name()));
            }
        }

        let mut node = self.clone();
        child.order = node.next_order;
        node.next_order += 1;
        let key = child.name.to_lowercase();
        for alias in &child.aliases {
            node.aliases_index.insert(alias.to_lowercase(), key.clone());
        }
        node.children.insert(key, Arc::new(child));
        Ok(node)
    }

    /// Returns a copy with the child under `key` replaced.
    fn with_replaced(&self, key: String, child: CommandNode) -> Self {
        let mut node = self.clone();
        node.children.insert(key, Arc::new(child));
        node
    }

    /// Returns a copy with the child under `key` removed.
    fn without_child(&self, key: &str) -> Self {
        let mut node = self.clone();
        node.children.remove(key);
        node.aliases_index.retain(|_, owner| owner != key);
        node
    }
}

fn compare_siblings(a: &CommandNode, b: &CommandNode) -> Ordering {
    match (a.sort_key, b.sort_key) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then(a.order.cmp(&b.order))
    .then_with(|| a.name.cmp(&b.name))
}

/// An immutable command tree holding every registered family.
#[derive(Clone, Debug)]
pub struct CommandTree {
    root: Arc<CommandNode>,
}

impl Default for CommandTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Arc::new(CommandNode::root()),
        }
    }

    /// Returns the virtual root whose children are the families.
    #[must_use]
    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Finds a family by name or alias.
    #[must_use]
    pub fn family(&self, label: &str) -> Option<&Arc<CommandNode>> {
        self.root.find_child(label)
    }

    /// Returns all families in display order.
    #[must_use]
    pub fn families(&self) -> Vec<&Arc<CommandNode>> {
        self.root.children_sorted()
    }

    /// Follows a path of names or aliases from the root.
    #[must_use]
    pub fn node_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&CommandNode> {
        let mut node: &CommandNode = &self.root;
        for segment in path {
            node = node.find_child(segment.as_ref())?;
        }
        Some(node)
    }

    /// Registers a definition under `parent_path` (empty for a new family).
    ///
    /// Returns the new tree; `self` is unchanged.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the definition is invalid, collides
    /// with an existing name, or the parent path does not exist.
    pub fn register<S: AsRef<str>>(
        &self,
        parent_path: &[S],
        definition: &CommandDefinition,
        transforms: &TransformRegistry,
    ) -> Result<Self> {
        let mut path = Vec::with_capacity(parent_path.len() + 1);
        let root = insert_at(&self.root, parent_path, &mut path, definition, transforms)?;
        debug!(path = %path.join(" "), "command registered");
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// Removes a family by name or alias.
    ///
    /// Returns the new tree and the removed family node.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownFamily`] if no family matches.
    pub fn unregister(&self, label: &str) -> Result<(Self, Arc<CommandNode>)> {
        let family = self
            .family(label)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::UnknownFamily(label.to_string())))?;
        let root = self.root.without_child(&family.name.to_lowercase());
        debug!(family = %family.name, "family unregistered");
        Ok((
            Self {
                root: Arc::new(root),
            },
            family,
        ))
    }
}

/// Rebuilds `node` with the definition inserted below `rest`.
fn insert_at<S: AsRef<str>>(
    node: &CommandNode,
    rest: &[S],
    path: &mut Vec<String>,
    definition: &CommandDefinition,
    transforms: &TransformRegistry,
) -> Result<CommandNode> {
    let Some((head, tail)) = rest.split_first() else {
        path.push(definition.name.clone());
        let child = build_node(definition, path, transforms)?;
        return node
            .with_child(child)
            .map_err(|e| e.with_context(ErrorContext::new().with_path(path.iter().cloned())));
    };

    let Some(child) = node.find_child(head.as_ref()) else {
        path.push(head.as_ref().to_string());
        return Err(Error::no_such_path(path));
    };
    path.push(child.name.to_string());
    trace!(segment = %child.name, "descending for registration");

    let updated = insert_at(child, tail, path, definition, transforms)?;
    Ok(node.with_replaced(child.name.to_lowercase(), updated))
}

/// Validates a definition and builds its node, recursively.
fn build_node(
    definition: &CommandDefinition,
    path: &mut Vec<String>,
    transforms: &TransformRegistry,
) -> Result<CommandNode> {
    let context = || ErrorContext::new().with_path(path.iter().cloned());

    validate_labels(definition).map_err(|e| e.with_context(context()))?;

    if definition.handler.is_none() {
        if !definition.parameters.is_empty() {
            return Err(Error::new(ErrorKind::ParametersWithoutHandler(
                definition.name.clone(),
            ))
            .with_context(context()));
        }
        if definition.children.is_empty() {
            return Err(
                Error::new(ErrorKind::EmptyBranch(definition.name.clone())).with_context(context())
            );
        }
    }

    validate_parameters(&definition.parameters, transforms, path)?;

    let executor = definition.handler.as_ref().map(|handler| {
        Executor::new(
            definition.parameters.clone(),
            Arc::clone(handler),
            definition.playable_only,
        )
    });

    let mut node = CommandNode {
        name: Arc::from(definition.name.as_str()),
        aliases: definition.aliases.iter().map(|a| Arc::from(a.as_str())).collect(),
        permissions: definition
            .permissions
            .iter()
            .map(|p| Arc::from(p.as_str()))
            .collect(),
        permission_default: definition.permission_default,
        sort_key: definition.sort_key,
        description: definition.description.as_deref().map(Arc::from),
        prefix: definition.prefix.as_deref().map(Arc::from),
        executor,
        ..CommandNode::root()
    };

    for child_definition in &definition.children {
        path.push(child_definition.name.clone());
        let child = build_node(child_definition, path, transforms)?;
        node = node
            .with_child(child)
            .map_err(|e| e.with_context(ErrorContext::new().with_path(path.iter().cloned())))?;
        path.pop();
    }

    Ok(node)
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(Error::invalid_name(name));
    }
    Ok(())
}

fn validate_labels(definition: &CommandDefinition) -> Result<()> {
    validate_name(&definition.name)?;
    let mut seen = vec![definition.name.to_lowercase()];
    for alias in &definition.aliases {
        validate_name(alias)?;
        let key = alias.to_lowercase();
        if seen.contains(&key) {
            return Err(Error::duplicate_name(alias.clone(), definition.name.clone()));
        }
        seen.push(key);
    }
    Ok(())
}

fn validate_parameters(
    parameters: &[Parameter],
    transforms: &TransformRegistry,
    path: &[String],
) -> Result<()> {
    let mut first_optional: Option<&Parameter> = None;

    for (index, parameter) in parameters.iter().enumerate() {
        let context = || {
            ErrorContext::new()
                .with_path(path.iter().cloned())
                .with_parameter(parameter.name.clone())
        };

        if parameter.vararg && index + 1 != parameters.len() {
            return Err(
                Error::new(ErrorKind::VarargNotLast(parameter.name.clone())).with_context(context())
            );
        }

        if let Some(optional) = first_optional {
            if !parameter.optional {
                return Err(Error::new(ErrorKind::OptionalBeforeRequired {
                    optional: optional.name.clone(),
                    required: parameter.name.clone(),
                })
                .with_context(context()));
            }
        } else if parameter.optional {
            first_optional = Some(parameter);
        }

        if parameter.default_raw.is_some() && !parameter.optional {
            return Err(
                Error::new(ErrorKind::DefaultOnRequired(parameter.name.clone()))
                    .with_context(context()),
            );
        }

        let Some(transform) = transforms.get(&parameter.value_type) else {
            return Err(Error::unknown_type(parameter.value_type.clone()).with_context(context()));
        };

        if let Some(raw) = &parameter.default_raw {
            let checked = if parameter.vararg && transform.policy() == VarargPolicy::Sequence {
                raw.split_whitespace()
                    .try_for_each(|word| transform.convert(word).map(drop))
            } else {
                transform.convert(raw).map(drop)
            };
            checked.map_err(|cause| {
                Error::malformed_default(parameter.name.clone(), raw.clone(), cause.message())
                    .with_context(context())
            })?;
        }
    }

    Ok(())
}
