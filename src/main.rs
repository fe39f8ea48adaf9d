//! TaskDesk CLI - command-line client for the Task Manager service

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod session;

use cli::args::GlobalOptions;
use cli::auth::Registration;
use cli::{Cli, Commands, ConfigCommands, TaskCommands};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let opts = GlobalOptions::from_cli(&cli);
    init_logging(opts.debug);

    if let Err(err) = run(cli.command, &opts).await {
        if let error::Error::Api(api_err) = &err {
            log::debug!("Request failed (status: {:?}): {:?}", api_err.status(), api_err);
        }
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `warn` by default, `debug` with --debug; RUST_LOG still wins
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if debug {
        log::debug!("Debug logging enabled");
    }
}

async fn run(command: Commands, opts: &GlobalOptions) -> Result<()> {
    match command {
        Commands::Login { email, password } => cli::auth::login(opts, email, password).await,
        Commands::Logout => cli::auth::logout(opts).await,
        Commands::Register {
            first_name,
            last_name,
            email,
            username,
            password,
        } => {
            let registration = Registration {
                first_name,
                last_name,
                email,
                username,
                password,
            };
            cli::auth::register(opts, registration).await
        }
        Commands::CheckUsername { username } => cli::auth::check_username(opts, &username).await,
        Commands::Whoami => cli::whoami::run(opts).await,
        Commands::Version => {
            println!("taskdesk version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Task(task_cmd) => match task_cmd {
            TaskCommands::List { filters } => cli::task::list(opts, &filters).await,
            TaskCommands::Get { id } => cli::task::get(opts, &id).await,
            TaskCommands::Create { title, fields } => {
                cli::task::create(opts, &title, &fields).await
            }
            TaskCommands::Update { id, title, fields } => {
                cli::task::update(opts, &id, title.as_deref(), &fields).await
            }
            TaskCommands::Delete { ids } => cli::task::delete(opts, &ids).await,
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show => cli::config::show(opts),
            ConfigCommands::SetUrl { url } => cli::config::set_url(opts, &url),
        },
        Commands::Completion { shell } => {
            cli::completions::run(shell);
            Ok(())
        }
    }
}
