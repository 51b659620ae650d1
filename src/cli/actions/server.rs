use crate::{
    cli::{commands::vault::Options as VaultOptions, globals::GlobalArgs},
    gazette::{self, session::SessionConfig},
    vault,
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: Option<String>,
    pub cookie_secret: Option<SecretString>,
    pub cookie_secure: bool,
    pub vault: Option<VaultOptions>,
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the cookie secret cannot be resolved or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let secret = match (args.cookie_secret, args.vault) {
        (Some(secret), _) => secret,
        (None, Some(vault_opts)) => cookie_secret_from_vault(&vault_opts)
            .await
            .context("Could not read cookie secret from Vault")?,
        (None, None) => return Err(anyhow!("Cookie secret is required")),
    };

    let session_config = SessionConfig::new(secret).with_cookie_secure(args.cookie_secure);

    gazette::new(args.port, args.dsn, session_config).await
}

async fn cookie_secret_from_vault(opts: &VaultOptions) -> Result<SecretString> {
    let mut globals = GlobalArgs::new(opts.url.clone());

    // If vault wrapped token try to unwrap, otherwise use secret-id.
    let secret_id = if let Some(wrapped) = &opts.wrapped_token {
        vault::unwrap(&globals.vault_url, wrapped).await?
    } else {
        opts.secret_id
            .clone()
            .ok_or_else(|| anyhow!("Vault secret-id is required"))?
    };

    let (token, lease_duration) =
        vault::approle_login(&globals.vault_url, &secret_id, &opts.role_id).await?;
    globals.set_token(SecretString::from(token));

    debug!("Global args: {:?}, lease {}s", globals, lease_duration);

    let secret = vault::kv::read_cookie_secret(&globals, &opts.kv_mount, &opts.kv_path).await?;

    info!("Cookie secret loaded from {}/{}", opts.kv_mount, opts.kv_path);

    Ok(secret)
}
