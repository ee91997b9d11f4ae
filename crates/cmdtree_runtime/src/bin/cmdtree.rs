//! cmdtree console entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use cmdtree_engine::CommandManager;
use cmdtree_runtime::{
    Console, ConsoleActor, ConsoleMessenger, RuntimeConfig, RuntimeError, RustylineEditor,
    SampleState, register_sample,
};
use parking_lot::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    config: Option<PathBuf>,
    commands: Vec<String>,
    online: Vec<String>,
    verbose: bool,
    no_banner: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();
    let mut args = args.into_iter().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-v" | "--verbose" => config.verbose = true,
            "--no-banner" => config.no_banner = true,
            "--config" => {
                let path = args.next().ok_or("--config requires a path")?;
                config.config = Some(PathBuf::from(path));
            }
            "-c" | "--command" => {
                let line = args.next().ok_or("--command requires a command line")?;
                config.commands.push(line);
            }
            "--online" => {
                let names = args.next().ok_or("--online requires a list of names")?;
                config.online.extend(
                    names
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string),
                );
            }
            other => return Err(format!("unknown option: {other}").into()),
        }
    }

    Ok(config)
}

fn init_logging(filter: &str) -> Result<(), RuntimeError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| RuntimeError::Logging(e.to_string()))
}

fn run(args: Vec<String>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = parse_args(args)?;

    if cli.show_help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    if cli.show_version {
        println!("cmdtree {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let mut settings = match &cli.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    if cli.verbose {
        settings = settings.with_log_filter("debug");
    }
    init_logging(&settings.log.filter)?;

    let manager = Arc::new(CommandManager::with_config(settings.engine.clone()));
    let messenger = Arc::new(ConsoleMessenger::stdout(settings.actor.name.clone()));
    let players = settings.players.iter().chain(&cli.online).cloned();
    let state = Arc::new(SampleState::with_players(players));
    let family = register_sample(&manager, messenger.clone(), state)?;

    let mut actor = ConsoleActor::from_settings(&settings.actor);
    actor.apply_declarations(&family.declarations);
    let actor = Arc::new(RwLock::new(actor));
    info!(actor = %settings.actor.name, "console ready");

    if !cli.commands.is_empty() {
        let editor = cmdtree_runtime::ScriptedEditor::default();
        let console = Console::new(editor, manager, actor, messenger);
        let failures = cli
            .commands
            .iter()
            .filter(|line| !console.execute(line).is_success())
            .count();
        return Ok(if failures == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let editor = RustylineEditor::new(Arc::clone(&manager), Arc::clone(&actor))?;
    let mut console =
        Console::new(editor, manager, actor, messenger).with_prompt(settings.prompt.clone());
    if cli.no_banner || !settings.banner {
        console = console.without_banner();
    }
    console.run()?;
    Ok(ExitCode::SUCCESS)
}

fn print_help() {
    println!(
        "\x1b[1mcmdtree\x1b[0m - Command dispatch console

\x1b[1mUSAGE:\x1b[0m
    cmdtree [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    --config <PATH>       Load settings from a TOML file
    -c, --command <LINE>  Run a command line and exit (repeatable)
    --online <NAMES>      Comma-separated players to treat as online
    --no-banner           Skip the welcome banner
    -v, --verbose         Log at debug level (RUST_LOG overrides)
    -h, --help            Print help information
    -V, --version         Print version information

\x1b[1mCONSOLE:\x1b[0m
    Type commands with or without a leading '/', e.g. /sample help.
    Tab completes. :quit or Ctrl+D exits."
    );
}
