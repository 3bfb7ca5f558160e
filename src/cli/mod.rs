use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::{app, AppState};
use crate::auth::{Claims, JwtKeys};
use crate::config::{self, AppConfig, StorageBackend};
use crate::database::models::UserSummary;
use crate::database::{DatabaseManager, MemoryMessageStore, MessageStore, PgMessageStore};

#[derive(Parser)]
#[command(name = "messagely")]
#[command(about = "Messagely messages API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides API_PORT/PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Use the in-memory store instead of PostgreSQL")]
        memory: bool,

        #[arg(long, help = "JSON file of users to seed the in-memory store with (implies --memory)")]
        seed: Option<PathBuf>,
    },

    #[command(about = "Print a signed development token for a user")]
    Token {
        username: String,

        #[arg(long, help = "Token lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        memory: false,
        seed: None,
    }) {
        Commands::Serve { port, memory, seed } => serve(port, memory, seed).await,
        Commands::Token { username, hours } => token(&username, hours),
    }
}

async fn serve(port: Option<u16>, memory: bool, seed: Option<PathBuf>) -> Result<()> {
    let mut config = config::config().clone();
    if let Some(port) = port {
        config.api.port = port;
    }
    if memory || seed.is_some() {
        config.database.storage = StorageBackend::Memory;
    }
    config.validate().map_err(anyhow::Error::msg)?;

    tracing::info!("Starting Messagely API in {:?} mode", config.environment);

    let store = build_store(&config, seed).await?;
    let jwt = JwtKeys::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)?;
    let router = app(AppState::new(store, jwt), &config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Messagely API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn build_store(config: &AppConfig, seed: Option<PathBuf>) -> Result<Arc<dyn MessageStore>> {
    match config.database.storage {
        StorageBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            Ok(Arc::new(PgMessageStore::new(pool)))
        }
        StorageBackend::Memory => {
            let users = match seed {
                Some(path) => load_seed(&path)?,
                None => Vec::new(),
            };
            tracing::info!("Using in-memory store with {} seeded users", users.len());
            Ok(Arc::new(MemoryMessageStore::with_users(users)))
        }
    }
}

fn load_seed(path: &Path) -> Result<Vec<UserSummary>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid seed file {}", path.display()))
}

fn token(username: &str, hours: Option<u64>) -> Result<()> {
    let security = &config::config().security;
    let keys = JwtKeys::new(&security.jwt_secret, security.jwt_expiry_hours)?;
    let claims = Claims::new(username, hours.unwrap_or(security.jwt_expiry_hours))?;
    println!("{}", keys.sign(&claims)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["messagely"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_accepts_seed_file() {
        let cli = Cli::try_parse_from(["messagely", "serve", "--seed", "users.json", "--port", "4000"]).unwrap();
        match cli.command {
            Some(Commands::Serve { port, seed, .. }) => {
                assert_eq!(port, Some(4000));
                assert_eq!(seed, Some(PathBuf::from("users.json")));
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn token_takes_username() {
        let cli = Cli::try_parse_from(["messagely", "token", "alice", "--hours", "2"]).unwrap();
        match cli.command {
            Some(Commands::Token { username, hours }) => {
                assert_eq!(username, "alice");
                assert_eq!(hours, Some(2));
            }
            _ => panic!("expected token command"),
        }
    }
}
