//! The `sample` command family used by the console demo.
//!
//! ```text
//! /sample                               invoke sample
//! /sample help                          list commands
//! /sample hello                         hello world ~
//! /sample tell <target> [msgs...]       private message
//! /sample user                          invoke user
//! /sample user add <username> [password]
//! /sample user remove <username>
//! /sample nbt type <type>
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Weak};

use cmdtree_engine::{
    CommandDefinition, CommandManager, CompleterKey, CompletionRequest, ConversionError,
    ExecutionContext, HandlerError, HandlerResult, Messenger, Parameter, PermissionDefault,
    RegisteredFamily, SimpleActor, Transform,
};
use cmdtree_foundation::{Result, Type, Value};
use parking_lot::RwLock;
use tracing::info;

/// Family name.
pub const FAMILY: &str = "sample";

/// Named completer listing online players.
pub const PLAYER_NAME_COMPLETER: &str = "player-name";

/// NBT tag type names accepted by `/sample nbt type`.
pub const NBT_TYPES: [&str; 13] = [
    "END",
    "BYTE",
    "SHORT",
    "INT",
    "LONG",
    "FLOAT",
    "DOUBLE",
    "BYTE_ARRAY",
    "STRING",
    "LIST",
    "COMPOUND",
    "INT_ARRAY",
    "LONG_ARRAY",
];

/// Shared world state the sample commands read and mutate.
#[derive(Debug, Default)]
pub struct SampleState {
    online: RwLock<BTreeSet<String>>,
    users: RwLock<BTreeMap<String, String>>,
}

impl SampleState {
    /// Creates state with the given players online.
    pub fn with_players<I, S>(players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            online: RwLock::new(players.into_iter().map(Into::into).collect()),
            users: RwLock::default(),
        }
    }

    /// Marks a player as online.
    pub fn join(&self, player: impl Into<String>) {
        self.online.write().insert(player.into());
    }

    /// Marks a player as offline.
    pub fn leave(&self, player: &str) -> bool {
        self.online.write().remove(player)
    }

    /// Returns the canonical name of an online player, matched
    /// case-insensitively.
    #[must_use]
    pub fn find_online(&self, player: &str) -> Option<String> {
        self.online
            .read()
            .iter()
            .find(|name| name.eq_ignore_ascii_case(player))
            .cloned()
    }

    /// Returns the online players in name order.
    #[must_use]
    pub fn online(&self) -> Vec<String> {
        self.online.read().iter().cloned().collect()
    }

    /// Returns the stored password for a user.
    #[must_use]
    pub fn password(&self, username: &str) -> Option<String> {
        self.users.read().get(username).cloned()
    }

    fn add_user(&self, username: &str, password: &str) {
        self.users
            .write()
            .insert(username.to_string(), password.to_string());
    }

    fn remove_user(&self, username: &str) -> bool {
        self.users.write().remove(username).is_some()
    }
}

/// Registers the `sample` family, its `player` type and its completers.
///
/// # Errors
///
/// Returns the registration error if the family clashes with an existing
/// one.
pub fn register_sample(
    manager: &Arc<CommandManager>,
    messenger: Arc<dyn Messenger>,
    state: Arc<SampleState>,
) -> Result<RegisteredFamily> {
    let player = Type::named("player");
    let online = Arc::clone(&state);
    manager.register_transform(
        player.clone(),
        Transform::new(move |raw| {
            online
                .find_online(raw)
                .map(Value::string)
                .ok_or_else(|| ConversionError::new(format!("player '{raw}' is not online")))
        }),
    );

    let online = Arc::clone(&state);
    manager.register_completer(player.clone(), move |_: &CompletionRequest<'_>| {
        Ok(online.online())
    })?;
    let online = Arc::clone(&state);
    manager.register_completer(
        CompleterKey::named(PLAYER_NAME_COMPLETER),
        move |_: &CompletionRequest<'_>| Ok(online.online()),
    )?;

    let nbt_type = manager.register_enum("nbt-type", NBT_TYPES);

    let family = CommandDefinition::new(FAMILY)
        .alias("sp")
        .permission("sample")
        .permission_default(PermissionDefault::Allow)
        .prefix("[Sample] ")
        .description("Sample command.")
        .sorted(0)
        .executes(reply(&messenger, |_| Ok("invoke sample".to_string())))
        .child(help_command(Arc::downgrade(manager), Arc::clone(&messenger)))
        .child(
            CommandDefinition::new("hello")
                .alias("hi")
                .alias("nh")
                .permission("sample.hello")
                .permission_default(PermissionDefault::Allow)
                .description("Test and say Hello world.")
                .sorted(2)
                .executes(reply(&messenger, |_| Ok("hello world ~".to_string()))),
        )
        .child(tell_command(player, Arc::clone(&messenger)))
        .child(user_command(&messenger, &state))
        .child(
            CommandDefinition::new("nbt")
                .permission("sample.nbt")
                .permission_default(PermissionDefault::OpOnly)
                .description("View sample nbt command.")
                .sorted(5)
                .child(
                    CommandDefinition::new("type")
                        .permission("sample.nbt.type")
                        .permission_default(PermissionDefault::OpOnly)
                        .parameter(Parameter::new("type", nbt_type))
                        .executes(reply(&messenger, |ctx| {
                            let variant = ctx
                                .get("type")
                                .and_then(Value::as_variant)
                                .ok_or_else(|| HandlerError::new("missing nbt type"))?;
                            Ok(format!("nbt type wrapped => {variant}"))
                        })),
                ),
        );

    let registered = manager.register_family(family)?;
    info!(family = %registered.name, "sample commands registered");
    Ok(registered)
}

/// Wraps a message-producing closure into a handler that sends the message,
/// with the family prefix, to the invoking actor.
fn reply<F>(
    messenger: &Arc<dyn Messenger>,
    message: F,
) -> impl Fn(&ExecutionContext<'_>) -> HandlerResult + Send + Sync + 'static
where
    F: Fn(&ExecutionContext<'_>) -> std::result::Result<String, HandlerError>
        + Send
        + Sync
        + 'static,
{
    let messenger = Arc::clone(messenger);
    move |ctx: &ExecutionContext<'_>| -> HandlerResult {
        let text = message(ctx)?;
        messenger.send(ctx.actor(), &ctx.prefixed(&text));
        Ok(())
    }
}

fn help_command(manager: Weak<CommandManager>, messenger: Arc<dyn Messenger>) -> CommandDefinition {
    CommandDefinition::new("help")
        .description("View sample command help.")
        .sorted(1)
        .executes(move |ctx| {
            let manager = manager
                .upgrade()
                .ok_or_else(|| HandlerError::new("command manager is gone"))?;
            for tooltip in manager.help(ctx.actor(), FAMILY) {
                messenger.send(ctx.actor(), &ctx.prefixed(&tooltip.line()));
            }
            Ok(())
        })
}

fn tell_command(player: Type, messenger: Arc<dyn Messenger>) -> CommandDefinition {
    CommandDefinition::new("tell")
        .description("Send a private chat message to the specified target player.")
        .sorted(3)
        .parameter(Parameter::new("target", player))
        .parameter(Parameter::new("msgs", Type::String).vararg().or_default("hi~"))
        .executes(move |ctx| {
            let target = ctx
                .string("target")
                .ok_or_else(|| HandlerError::new("missing target"))?;
            let msg = ctx
                .list("msgs")
                .unwrap_or_default()
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ");

            messenger.send(
                ctx.actor(),
                &ctx.prefixed(&format!("You said to {target} : {msg}")),
            );
            messenger.send(
                &SimpleActor::player(target),
                &ctx.prefixed(&format!("{} tell you : {msg}", ctx.actor().name())),
            );
            Ok(())
        })
}

fn user_command(messenger: &Arc<dyn Messenger>, state: &Arc<SampleState>) -> CommandDefinition {
    let adding = Arc::clone(state);
    let removing = Arc::clone(state);

    CommandDefinition::new("user")
        .alias("u")
        .permission("sample.user")
        .permission_default(PermissionDefault::OpOnly)
        .description("View sample user command.")
        .sorted(4)
        .executes(reply(messenger, |_| Ok("invoke user".to_string())))
        .child(
            CommandDefinition::new("add")
                .alias("a")
                .alias("tj")
                .permission("sample.user.add")
                .permission_default(PermissionDefault::OpOnly)
                .parameter(
                    Parameter::new("username", Type::String).with_completer(PLAYER_NAME_COMPLETER),
                )
                .parameter(Parameter::new("password", Type::String).or_default("123456"))
                .executes(reply(messenger, move |ctx| {
                    let (username, password) = ctx
                        .string("username")
                        .zip(ctx.string("password"))
                        .ok_or_else(|| HandlerError::new("missing username or password"))?;
                    adding.add_user(username, password);
                    Ok(format!("add user => ({username}:{password})"))
                })),
        )
        .child(
            CommandDefinition::new("remove")
                .alias("r")
                .alias("yc")
                .permission("sample.user.remove")
                .permission_default(PermissionDefault::OpOnly)
                .parameter(Parameter::new("username", Type::String))
                .executes(reply(messenger, move |ctx| {
                    let username = ctx
                        .string("username")
                        .ok_or_else(|| HandlerError::new("missing username"))?;
                    if !removing.remove_user(username) {
                        return Err(HandlerError::new(format!("no user named '{username}'")));
                    }
                    Ok(format!("remove user => ({username})"))
                })),
        )
}
