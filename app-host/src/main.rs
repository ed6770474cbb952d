mod browser;
mod cli;
mod config;
mod server;

use anyhow::Context;
use clap::Parser;
use cli::{Action, Cli};
use server::AppState;
use std::sync::Arc;
use task_store::DocumentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let registrar =
        autostart::current_registrar(&config.registrar_config(), cli.relaunch_args(&config));

    match cli.action() {
        Action::Serve { open_browser } => {
            let store = DocumentStore::open(&config.data_dir).with_context(|| {
                format!("Failed to create data directory {}", config.data_dir.display())
            })?;
            let state = Arc::new(AppState::new(store, registrar));
            server::start_server(&config, state, open_browser).await?;
        }
        action => cli::run_startup_action(action, registrar.as_ref()),
    }

    Ok(())
}
