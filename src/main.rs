use std::fs;
use std::sync::Arc;

use anyhow::bail;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use procdoc::auth::{TokenGenerator, hash_password};
use procdoc::config::ServerConfig;
use procdoc::server::{AppState, create_router};
use procdoc::store::{SqliteStore, Store};
use procdoc::types::{NewUser, Token};

const GENERATED_PASSWORD_LEN: usize = 20;

fn create_token(generator: &TokenGenerator, user_id: i64) -> anyhow::Result<(Token, String)> {
    let (raw_token, lookup, hash) = generator.generate()?;
    let token = Token {
        id: Uuid::new_v4().to_string(),
        token_hash: hash,
        token_lookup: lookup,
        user_id,
        created_at: Utc::now(),
        expires_at: None,
        last_used_at: None,
    };
    Ok((token, raw_token))
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

#[cfg(unix)]
fn set_restrictive_permissions(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to set permissions on {}: {e}", path.display());
    }
}

#[derive(Parser)]
#[command(name = "procdoc")]
#[command(about = "A process-documentation portal server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the server (create database and admin account)
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
}

fn run_init(data_dir: String, non_interactive: bool) -> anyhow::Result<()> {
    let data_path: std::path::PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let db_path = data_path.join("procdoc.db");
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    let token_file = data_path.join(".admin_token");

    if store.has_admin_user()? {
        bail!(
            "Server already initialized. Admin token exists at: {}",
            token_file.display()
        );
    }

    let (username, password) = if non_interactive {
        ("admin".to_string(), generate_password())
    } else {
        prompt_admin_credentials()?
    };

    let password_hash = hash_password(&password)?;
    let admin = store.create_user(&NewUser {
        username: username.clone(),
        password_hash,
        is_admin: true,
        macroprocess_id: None,
        panel_url: None,
        panel_title: None,
    })?;

    let generator = TokenGenerator::new();
    let (token, raw_token) = create_token(&generator, admin.id)?;
    store.create_token(&token)?;

    fs::write(&token_file, &raw_token)?;

    #[cfg(unix)]
    set_restrictive_permissions(&token_file);

    println!();
    println!("========================================");
    println!("Admin account '{username}' created.");
    if non_interactive {
        println!();
        println!("Generated password (save this, it won't be shown again):");
        println!();
        println!("  {password}");
    }
    println!();
    println!("Admin token (save this, it won't be shown again):");
    println!();
    println!("  {raw_token}");
    println!();
    println!("Token also written to: {}", token_file.display());
    println!("========================================");
    println!();

    Ok(())
}

fn prompt_admin_credentials() -> anyhow::Result<(String, String)> {
    let username = inquire::Text::new("Admin username:")
        .with_default("admin")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Err("Username cannot be empty".into())
            } else if input.contains(char::is_whitespace) {
                Err("Username cannot contain whitespace".into())
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?;

    let password = inquire::Password::new("Admin password:")
        .with_validator(|input: &str| {
            if input.is_empty() {
                Err("Password cannot be empty".into())
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?;

    Ok((username, password))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("procdoc=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                non_interactive,
            } => {
                run_init(data_dir, non_interactive)?;
            }
        },
        Commands::Serve {
            host,
            port,
            data_dir,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
            };

            let token_file = config.data_dir.join(".admin_token");
            if !token_file.exists() {
                bail!(
                    "Server not initialized. Run 'procdoc admin init' first to create the database and admin account."
                );
            }

            let store = SqliteStore::new(config.db_path())?;
            if !store.has_admin_user()? {
                bail!(
                    "Server not initialized. Run 'procdoc admin init' first to create the database and admin account."
                );
            }

            let state = Arc::new(AppState {
                store: Arc::new(store),
            });

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
