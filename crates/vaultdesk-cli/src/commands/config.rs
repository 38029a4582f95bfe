use anyhow::Result;
use clap::Subcommand;
use serde_json::json;
use tracing::info;

use vaultdesk_infrastructure::ConfigService;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Point the client at another server
    SetUrl { url: String },
}

pub fn run(action: &ConfigAction, service: &ConfigService, json: bool) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = service.get_config()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::SetUrl { url } => {
            let mut config = service.get_config()?;
            config.base_url = url.trim().trim_end_matches('/').to_string();
            service.save_config(&config)?;
            info!(base_url = %config.base_url, "Server URL updated");
            if json {
                println!("{}", json!({ "base_url": config.base_url }));
            } else {
                println!("Server URL set to {}", config.base_url);
            }
        }
    }
    Ok(())
}
