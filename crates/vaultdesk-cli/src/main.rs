use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use vaultdesk_core::VaultError;
use vaultdesk_infrastructure::{ConfigService, VaultPaths};

mod commands;

use commands::{AccountsAction, ConfigAction, Context, TagsAction};

#[derive(Parser)]
#[command(name = "vaultdesk")]
#[command(about = "vaultdesk CLI - client for a self-hosted account vault", long_about = None)]
struct Cli {
    /// Directory holding config.toml and the token slot
    #[arg(long, global = true, env = "VAULTDESK_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether the vault is initialized and locked
    Status,
    /// Set the master password on a fresh vault
    Setup {
        #[arg(long, env = "VAULTDESK_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to the password itself
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Unlock the vault and store the session token
    Login {
        #[arg(long, env = "VAULTDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Revoke the session token
    Logout,
    /// Lock the vault, keeping the token
    Lock,
    /// Change the master password
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        /// Defaults to the new password
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Browse and manage accounts
    Accounts {
        #[command(subcommand)]
        action: AccountsAction,
    },
    /// List the distinct account sources
    Sources,
    /// Show vault statistics
    Stats,
    /// Manage tags
    Tags {
        #[command(subcommand)]
        action: TagsAction,
    },
    /// Inspect or change the client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Server wording reaches the user verbatim.
    run(cli).await.map_err(|err| match err.downcast::<VaultError>() {
        Ok(err) if err.is_unauthorized() => {
            anyhow::anyhow!("{}. Run `vaultdesk login` first.", err.user_message())
        }
        Ok(err) => anyhow::anyhow!(err.user_message()),
        Err(err) => err,
    })
}

async fn run(cli: Cli) -> Result<()> {
    let paths = VaultPaths::new(cli.config_dir.as_deref())?;
    let config_service = ConfigService::new(&paths);
    let config = match config_service.get_config() {
        Ok(config) => config,
        Err(err) => {
            init_logging(vaultdesk_core::config::DEFAULT_LOG_LEVEL);
            return Err(err.into());
        }
    };
    init_logging(&config.log_level);

    if let Commands::Config { action } = &cli.command {
        return commands::config::run(action, &config_service, cli.json);
    }

    let page_size = match &cli.command {
        Commands::Accounts {
            action:
                AccountsAction::List {
                    page_size: Some(page_size),
                    ..
                },
        } => *page_size,
        _ => config.default_page_size,
    };
    let ctx = Context::build(&paths, &config, page_size, cli.json).await?;

    match cli.command {
        Commands::Status => commands::session::status(&ctx).await?,
        Commands::Setup { password, confirm } => {
            let confirm = confirm.unwrap_or_else(|| password.clone());
            commands::session::setup(&ctx, &password, &confirm).await?
        }
        Commands::Login { password } => commands::session::login(&ctx, &password).await?,
        Commands::Logout => commands::session::logout(&ctx).await?,
        Commands::Lock => commands::session::lock(&ctx).await?,
        Commands::ChangePassword {
            current,
            new,
            confirm,
        } => {
            let confirm = confirm.unwrap_or_else(|| new.clone());
            commands::session::change_password(&ctx, &current, &new, &confirm).await?
        }
        Commands::Accounts { action } => commands::accounts::run(&ctx, action).await?,
        Commands::Sources => commands::accounts::sources(&ctx).await?,
        Commands::Stats => commands::accounts::stats(&ctx).await?,
        Commands::Tags { action } => commands::tags::run(&ctx, action).await?,
        Commands::Config { .. } => {}
    }

    Ok(())
}
