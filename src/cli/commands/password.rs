use clap::Subcommand;
use serde_json::{json, Value};

use crate::auth::CredentialVerifier;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum PasswordCommands {
    #[command(about = "Print a fresh digest for a secret")]
    Hash {
        #[arg(help = "Secret to hash")]
        secret: String,
    },

    #[command(about = "Check a secret against a stored digest")]
    Verify {
        #[arg(help = "Secret to check")]
        secret: String,
        #[arg(help = "Stored digest (PHC string)")]
        digest: String,
    },
}

pub fn handle(cmd: PasswordCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let verifier = CredentialVerifier::new()?;

    match cmd {
        PasswordCommands::Hash { secret } => {
            output_success(output_format, "Digest computed", Some(hash(&verifier, &secret)?))
        }
        PasswordCommands::Verify { secret, digest } => {
            if verifier.verify(&secret, &digest) {
                output_success(output_format, "Secret matches digest", Some(json!({ "matches": true })))
            } else {
                anyhow::bail!("secret does not match digest")
            }
        }
    }
}

fn hash(verifier: &CredentialVerifier, secret: &str) -> anyhow::Result<Value> {
    Ok(json!({ "digest": verifier.hash(secret)? }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_digest_verifies() {
        let verifier = CredentialVerifier::new().unwrap();
        let value = hash(&verifier, "popcorn").unwrap();
        let digest = value["digest"].as_str().unwrap();

        assert!(digest.starts_with("$argon2"));
        assert!(verifier.verify("popcorn", digest));
        assert!(handle(
            PasswordCommands::Verify { secret: "popcorn".to_string(), digest: digest.to_string() },
            OutputFormat::Json
        )
        .is_ok());
        let mismatch = handle(
            PasswordCommands::Verify { secret: "nachos".to_string(), digest: digest.to_string() },
            OutputFormat::Json,
        )
        .unwrap_err();
        assert_eq!(mismatch.to_string(), "secret does not match digest");
    }
}
