//! Map validated CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{session, vault};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches.get_one::<String>("dsn").cloned();

    let session_opts = session::Options::parse(matches)?;
    let vault_opts = vault::Options::parse(matches)?;

    if session_opts.cookie_secret.is_none() && vault_opts.is_none() {
        anyhow::bail!(
            "missing required argument: --{} or --{}",
            session::ARG_COOKIE_SECRET,
            vault::ARG_VAULT_URL
        );
    }

    Ok(Action::Server(Args {
        port,
        dsn,
        cookie_secret: session_opts.cookie_secret,
        cookie_secure: session_opts.cookie_secure,
        vault: vault_opts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const CLEARED: [(&str, Option<&str>); 6] = [
        ("GAZETTE_PORT", None),
        ("GAZETTE_DSN", None),
        ("GAZETTE_COOKIE_SECRET", None),
        ("GAZETTE_VAULT_URL", None),
        ("GAZETTE_VAULT_ROLE_ID", None),
        ("GAZETTE_VAULT_SECRET_ID", None),
    ];

    #[test]
    fn cookie_secret_maps_to_server_action() {
        temp_env::with_vars(CLEARED, || {
            let matches = crate::cli::commands::new().get_matches_from(vec![
                "gazette",
                "--cookie-secret",
                "s3cr3t",
                "--cookie-secure",
            ]);
            let result = handler(&matches);
            assert!(result.is_ok());
            if let Ok(Action::Server(args)) = result {
                assert_eq!(args.port, 8080);
                assert!(args.dsn.is_none());
                assert_eq!(
                    args.cookie_secret
                        .as_ref()
                        .map(|s| s.expose_secret().to_string()),
                    Some("s3cr3t".to_string())
                );
                assert!(args.cookie_secure);
                assert!(args.vault.is_none());
            }
        });
    }

    #[test]
    fn vault_options_map_to_server_action() {
        temp_env::with_vars(CLEARED, || {
            let matches = crate::cli::commands::new().get_matches_from(vec![
                "gazette",
                "--vault-url",
                "https://vault.tld:8200/v1/auth/approle/login",
                "--vault-role-id",
                "role-id",
                "--vault-wrapped-token",
                "wrapped",
            ]);
            let result = handler(&matches);
            assert!(result.is_ok());
            if let Ok(Action::Server(args)) = result {
                assert!(args.cookie_secret.is_none());
                let vault = args.vault.as_ref();
                assert_eq!(vault.map(|v| v.role_id.as_str()), Some("role-id"));
                assert_eq!(
                    vault.and_then(|v| v.wrapped_token.as_deref()),
                    Some("wrapped")
                );
                assert_eq!(vault.map(|v| v.kv_mount.as_str()), Some("secret/gazette"));
                assert_eq!(vault.map(|v| v.kv_path.as_str()), Some("config"));
            }
        });
    }

    #[test]
    fn vault_url_without_credentials_is_rejected() {
        temp_env::with_vars(CLEARED, || {
            let matches = crate::cli::commands::new().get_matches_from(vec![
                "gazette",
                "--vault-url",
                "https://vault.tld:8200/v1/auth/approle/login",
            ]);
            let result = handler(&matches);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err
                    .to_string()
                    .contains("missing required argument: --vault-role-id"));
            }
        });
    }

    #[test]
    fn empty_cookie_secret_is_rejected() {
        temp_env::with_vars(CLEARED, || {
            let matches = crate::cli::commands::new().get_matches_from(vec![
                "gazette",
                "--cookie-secret",
                "",
            ]);
            assert!(handler(&matches).is_err());
        });
    }
}
