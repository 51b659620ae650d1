use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use secrecy::SecretString;

pub const ARG_COOKIE_SECRET: &str = "cookie-secret";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";

#[derive(Debug)]
pub struct Options {
    pub cookie_secret: Option<SecretString>,
    pub cookie_secure: bool,
}

impl Options {
    /// # Errors
    /// Returns an error if the cookie secret is present but empty.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let cookie_secret = match matches.get_one::<String>(ARG_COOKIE_SECRET) {
            Some(secret) if secret.is_empty() => {
                anyhow::bail!("--{ARG_COOKIE_SECRET} must not be empty")
            }
            Some(secret) => Some(SecretString::from(secret.clone())),
            None => None,
        };

        Ok(Self {
            cookie_secret,
            cookie_secure: matches.get_flag(ARG_COOKIE_SECURE),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_COOKIE_SECRET)
                .long(ARG_COOKIE_SECRET)
                .help("Secret used to sign session cookies")
                .long_help(
                    "Secret used to sign session cookies. Required unless --vault-url is set, in which case the secret is read from Vault KV (field `cookie_secret`).",
                )
                .env("GAZETTE_COOKIE_SECRET")
                .hide_env_values(true)
                .required_unless_present(super::vault::ARG_VAULT_URL),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark the session cookie Secure (serve over HTTPS)")
                .env("GAZETTE_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
}
