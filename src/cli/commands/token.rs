use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use clap::Subcommand;
use serde_json::{json, Value};

use crate::auth::{TokenCodec, TokenError};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a token signed with the configured secret")]
    Issue {
        #[arg(help = "User id to embed")]
        user_id: i64,
        #[arg(help = "Role to embed, e.g. admin")]
        role: String,
    },

    #[command(about = "Validate a token and show its principal")]
    Inspect {
        #[arg(help = "Token to check")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    let codec = TokenCodec::from_config(&config.security);
    let now = Utc::now();

    match cmd {
        TokenCommands::Issue { user_id, role } => {
            output_success(output_format, "Token issued", Some(issue(&codec, user_id, &role, now)?))
        }
        TokenCommands::Inspect { token } => {
            let details = inspect(&codec, &token, now).context("token rejected")?;
            output_success(output_format, "Token is valid", Some(details))
        }
    }
}

fn issue(codec: &TokenCodec, user_id: i64, role: &str, now: DateTime<Utc>) -> anyhow::Result<Value> {
    let issued = codec.issue(user_id, role, now)?;
    Ok(json!({
        "token": issued.token,
        "expires_at": format_unix(issued.expires_at),
    }))
}

fn inspect(codec: &TokenCodec, token: &str, now: DateTime<Utc>) -> Result<Value, TokenError> {
    let principal = codec.validate(token, now)?;
    let claims = codec.decode_claims(token)?;

    Ok(json!({
        "user_id": principal.id,
        "role": principal.role,
        "issued_at": format_unix(claims.iat),
        "expires_at": format_unix(claims.exp),
    }))
}

fn format_unix(seconds: i64) -> String {
    match Utc.timestamp_opt(seconds, 0).single() {
        Some(at) => at.to_rfc3339(),
        None => seconds.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"cli-test-secret-cli-test-secret-0123", Duration::hours(24))
    }

    #[test]
    fn issued_token_inspects_to_its_principal() {
        let codec = codec();
        let now = Utc::now();
        let issued = issue(&codec, 7, "admin", now).unwrap();

        let details = inspect(&codec, issued["token"].as_str().unwrap(), now).unwrap();
        assert_eq!(details["user_id"], 7);
        assert_eq!(details["role"], "admin");
        assert_eq!(details["expires_at"], issued["expires_at"]);
    }

    #[test]
    fn expired_token_reports_the_reason() {
        let codec = codec();
        let now = Utc::now();
        let issued = issue(&codec, 7, "user", now).unwrap();

        let err = inspect(&codec, issued["token"].as_str().unwrap(), now + Duration::hours(25)).unwrap_err();
        assert_eq!(err, TokenError::Expired);
    }
}
