//! # Stockroom CLI
//!
//! Thin orchestration layer over the workspace crates:
//!
//! ```text
//! stockroom register <username> <password>
//! stockroom login <username> <password>
//! stockroom logout
//! stockroom items list
//! stockroom items search <query>
//! stockroom items get <id>
//! stockroom items add <name> <quantity>
//! stockroom items update <id> <name> <quantity>
//! stockroom items adjust <id> <delta>
//! stockroom items delete <id>
//! stockroom items watch [--local <db path>]
//! ```
//!
//! The session token from `login` is persisted to `auth.toml` under the
//! platform config directory so later invocations stay authenticated.
//! `watch` runs the debounced search pipeline interactively: every stdin
//! line becomes a query, and results print as they reconcile.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncBufReadExt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stockroom_client::{
    ApiClient, ClientConfig, ClientError, LocalSource, SearchConfig, SearchListener,
    SearchPipeline, Session,
};
use stockroom_core::validation::{
    validate_item_name, validate_password, validate_quantity, validate_registration,
    validate_search_query, validate_username,
};
use stockroom_core::{adjust_quantity, Item};
use stockroom_db::{Database, DbConfig};

// =============================================================================
// Arguments
// =============================================================================

#[derive(Parser)]
#[command(name = "stockroom", about = "Inventory tracking client", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user account
    Register {
        username: String,
        password: String,
        /// Password confirmation; defaults to the password itself when
        /// scripted
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Log in and persist the session token
    Login { username: String, password: String },

    /// Clear the persisted session
    Logout,

    /// Inventory item operations (authenticated)
    Items {
        #[command(subcommand)]
        command: ItemsCommand,
    },
}

#[derive(Subcommand)]
enum ItemsCommand {
    /// List all items
    List,
    /// Search items by name substring
    Search { query: String },
    /// Show a single item
    Get { id: i64 },
    /// Add a new item
    Add { name: String, quantity: i64 },
    /// Update an item's name and quantity
    Update { id: i64, name: String, quantity: i64 },
    /// Adjust an item's quantity by a delta (clamped at zero)
    Adjust { id: i64, delta: i64 },
    /// Delete an item
    Delete { id: i64 },
    /// Interactive search: each stdin line is a query
    Watch {
        /// Search a local database instead of the remote API
        #[arg(long, value_name = "DB_PATH")]
        local: Option<String>,
    },
}

// =============================================================================
// Session Persistence
// =============================================================================

/// Session data persisted between invocations (auth.toml).
#[derive(Debug, Serialize, Deserialize)]
struct SavedSession {
    token: String,
    role: Option<String>,
}

fn auth_file_path() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("com", "stockroom", "stockroom")
        .map(|dirs| dirs.config_dir().join("auth.toml"))
}

fn load_saved_session() -> Option<SavedSession> {
    let path = auth_file_path()?;
    let contents = std::fs::read_to_string(path).ok()?;
    toml::from_str(&contents).ok()
}

fn save_session(saved: &SavedSession) -> Result<(), String> {
    let path = auth_file_path().ok_or("no config directory available")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    let contents = toml::to_string(saved).map_err(|e| e.to_string())?;
    std::fs::write(path, contents).map_err(|e| e.to_string())
}

fn clear_saved_session() {
    if let Some(path) = auth_file_path() {
        let _ = std::fs::remove_file(path);
    }
}

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    if let Err(message) = run(cli).await {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let config = ClientConfig::load().map_err(stringify)?;
    debug!(base_url = %config.base_url, "Client configuration loaded");

    let session = Session::new();
    if let Some(saved) = load_saved_session() {
        session.establish(saved.token, saved.role).await;
    }

    let client = ApiClient::new(&config, session.clone()).map_err(stringify)?;

    match cli.command {
        Commands::Register {
            username,
            password,
            confirm,
        } => {
            let confirm = confirm.as_deref().unwrap_or(&password);
            validate_registration(&username, &password, confirm).map_err(stringify)?;

            let response = client.register(&username, &password).await.map_err(stringify)?;
            println!(
                "{}",
                response
                    .message
                    .unwrap_or_else(|| "Registration successful".to_string())
            );
        }

        Commands::Login { username, password } => {
            validate_username(&username).map_err(stringify)?;
            validate_password(&password).map_err(stringify)?;

            let response = client.login(&username, &password).await.map_err(stringify)?;

            if let Some(token) = session.token().await {
                save_session(&SavedSession {
                    token,
                    role: response.role.clone(),
                })?;
            }

            match response.role {
                Some(role) => println!("Logged in as {username} ({role})"),
                None => println!("Logged in as {username}"),
            }
        }

        Commands::Logout => {
            session.clear().await;
            clear_saved_session();
            println!("Logged out");
        }

        Commands::Items { command } => run_items(command, &config, &client).await?,
    }

    Ok(())
}

async fn run_items(
    command: ItemsCommand,
    config: &ClientConfig,
    client: &ApiClient,
) -> Result<(), String> {
    match command {
        ItemsCommand::List => {
            let items = client.list_items().await.map_err(stringify)?;
            print_items(&items);
        }

        ItemsCommand::Search { query } => {
            let query = validate_search_query(&query).map_err(stringify)?;
            let items = client.search_items(&query).await.map_err(stringify)?;
            print_items(&items);
        }

        ItemsCommand::Get { id } => {
            let item = client.get_item(id).await.map_err(stringify)?;
            print_items(std::slice::from_ref(&item));
        }

        ItemsCommand::Add { name, quantity } => {
            validate_item_name(&name).map_err(stringify)?;
            validate_quantity(quantity).map_err(stringify)?;

            let stored = client.add_item(&Item::new(&name, quantity)).await.map_err(stringify)?;
            println!("Added item {}", stored.id.map_or_else(|| "?".into(), |id| id.to_string()));
        }

        ItemsCommand::Update { id, name, quantity } => {
            validate_item_name(&name).map_err(stringify)?;
            validate_quantity(quantity).map_err(stringify)?;

            client
                .update_item(&Item::with_id(id, &name, quantity))
                .await
                .map_err(stringify)?;
            println!("Updated item {id}");
        }

        ItemsCommand::Adjust { id, delta } => {
            // Fetch, clamp locally, write back. A decrement below zero
            // lands on zero.
            let item = client.get_item(id).await.map_err(stringify)?;
            let quantity = adjust_quantity(item.quantity, delta);

            client
                .update_item(&Item::with_id(id, &item.name, quantity))
                .await
                .map_err(stringify)?;
            println!("Item {id} quantity: {} -> {}", item.quantity, quantity);
        }

        ItemsCommand::Delete { id } => {
            client.delete_item(id).await.map_err(stringify)?;
            println!("Deleted item {id}");
        }

        ItemsCommand::Watch { local } => watch(local, config, client).await?,
    }

    Ok(())
}

// =============================================================================
// Interactive Search
// =============================================================================

/// Prints pipeline outcomes as they reconcile.
struct PrintListener;

impl SearchListener for PrintListener {
    fn on_results(&self, query: &str, items: &[Item]) {
        if query.is_empty() {
            println!("-- all items ({}) --", items.len());
        } else {
            println!("-- '{query}' ({}) --", items.len());
        }
        print_items(items);
    }

    fn on_error(&self, query: &str, error: &ClientError) {
        // Transport failures get the generic message; rejections carry the
        // server's own words. The previous results stay on screen.
        eprintln!("search '{query}' failed: {error}");
    }
}

async fn watch(
    local: Option<String>,
    config: &ClientConfig,
    client: &ApiClient,
) -> Result<(), String> {
    let search_config = SearchConfig {
        debounce: config.debounce,
    };

    let handle = match local {
        Some(db_path) => {
            let db = Database::new(DbConfig::new(db_path)).await.map_err(stringify)?;
            SearchPipeline::spawn_with_listener(
                Arc::new(LocalSource::new(Arc::new(db))),
                Arc::new(PrintListener),
                search_config,
            )
        }
        None => SearchPipeline::spawn_with_listener(
            Arc::new(client.clone()),
            Arc::new(PrintListener),
            search_config,
        ),
    };

    println!("Type to search; empty line shows everything; Ctrl-D exits.");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await.map_err(|e| e.to_string())? {
        handle.set_query(&line);
    }

    handle.shutdown().await;
    Ok(())
}

// =============================================================================
// Output Helpers
// =============================================================================

fn print_items(items: &[Item]) {
    if items.is_empty() {
        println!("(no items)");
        return;
    }

    for item in items {
        let id = item.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        println!("{id:>6}  {:<40} {:>8}", item.name, item.quantity);
    }
}

fn stringify(err: impl std::fmt::Display) -> String {
    err.to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_session_roundtrip() {
        let saved = SavedSession {
            token: "tok-123".to_string(),
            role: Some("admin".to_string()),
        };

        let serialized = toml::to_string(&saved).unwrap();
        let parsed: SavedSession = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.token, "tok-123");
        assert_eq!(parsed.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_cli_parses_item_commands() {
        let cli = Cli::try_parse_from(["stockroom", "items", "search", "laptop"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Items {
                command: ItemsCommand::Search { .. }
            }
        ));

        let cli = Cli::try_parse_from(["stockroom", "items", "adjust", "3", "--", "-1"]).unwrap();
        match cli.command {
            Commands::Items {
                command: ItemsCommand::Adjust { id, delta },
            } => {
                assert_eq!(id, 3);
                assert_eq!(delta, -1);
            }
            _ => panic!("expected adjust"),
        }
    }
}
