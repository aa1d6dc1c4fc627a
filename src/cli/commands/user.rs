use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::auth::SystemClock;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::Database;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create an administrator, or promote an existing user")]
    CreateAdmin {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password for the account")]
        password: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::CreateAdmin { username, password } => {
            let config = AppConfig::from_env().context("invalid configuration")?;
            let db = Database::connect(&config.database)
                .await
                .with_context(|| format!("failed to open database {}", config.database.url))?;
            let state = AppState::new(config, db.clone(), Arc::new(SystemClock))?;

            let user = state.accounts.create_admin(&username, &password).await;
            db.close().await;
            let user = user?;

            output_success(
                output_format,
                &format!("User '{}' is an administrator", user.username),
                Some(json!({ "id": user.id, "user": user.username, "account": user.account })),
            )
        }
    }
}
