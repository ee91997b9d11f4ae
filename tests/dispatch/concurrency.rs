//! Registration while dispatching.

use std::sync::{Arc, Weak};
use std::thread;

use cmdtree::engine::{CommandDefinition, CommandManager, HandlerError, SimpleActor};

#[test]
fn handler_may_register_commands() {
    let manager = Arc::new(CommandManager::new());
    let weak: Weak<CommandManager> = Arc::downgrade(&manager);

    manager
        .register_family(
            CommandDefinition::new("plugin").child(CommandDefinition::new("enable").executes(
                move |_| {
                    let manager = weak
                        .upgrade()
                        .ok_or_else(|| HandlerError::new("manager dropped"))?;
                    manager
                        .register_subcommand(
                            &["plugin"],
                            CommandDefinition::new("status").executes(|_| Ok(())),
                        )
                        .map_err(|e| HandlerError::new(e.to_string()))
                },
            )),
        )
        .unwrap();

    let actor = SimpleActor::new("console");
    assert!(!manager.dispatch(&actor, "plugin status").is_success());
    assert!(manager.dispatch(&actor, "plugin enable").is_success());
    assert!(manager.dispatch(&actor, "plugin status").is_success());

    // a second enable collides with the status command it registered
    assert!(!manager.dispatch(&actor, "plugin enable").is_success());
}

#[test]
fn dispatch_sees_whole_registrations() {
    let manager = Arc::new(CommandManager::new());
    manager
        .register_family(CommandDefinition::new("base").executes(|_| Ok(())))
        .unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let actor = SimpleActor::new("console");
                for _ in 0..200 {
                    assert!(manager.dispatch(&actor, "base").is_success());
                    let families = manager.families();
                    // a family always arrives with its child
                    for family in families.iter().filter(|f| f.name.starts_with("fam")) {
                        let line = format!("{} run", family.name);
                        assert!(manager.dispatch(&actor, &line).is_success(), "{line}");
                    }
                }
            })
        })
        .collect();

    for i in 0..50 {
        manager
            .register_family(
                CommandDefinition::new(format!("fam{i}"))
                    .child(CommandDefinition::new("run").executes(|_| Ok(()))),
            )
            .unwrap();
    }

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(manager.families().len(), 51);
}
