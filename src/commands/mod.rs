//! Command handlers for the chatstore binary

pub mod history;

use std::sync::Arc;

use crate::cli::Commands;
use crate::config::Config;
use crate::error::Result;
use crate::history::SessionStore;

/// Run one CLI command against a store built from `config`
pub async fn run(config: Config, command: Commands) -> Result<()> {
    let store = Arc::new(SessionStore::from_config(&config)?);

    match command {
        Commands::List => history::list_sessions(&store).await,
        Commands::Show { id } => history::show_session(&store, &id).await,
        Commands::Open { id } => history::open_session(store, &config, id).await,
        Commands::Append { id, role, text } => {
            history::append_message(&store, &id, role, &text).await
        }
        Commands::Delete { id } => history::delete_session(&store, &id).await,
        Commands::Clear => history::clear_history(&store).await,
    }
}
