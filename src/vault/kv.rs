use crate::{cli::globals::GlobalArgs, vault, APP_USER_AGENT};
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{info_span, instrument, Instrument};

const COOKIE_SECRET_FIELD: &str = "cookie_secret";

/// Read the cookie-signing secret from a KV v2 engine.
///
/// # Errors
/// Returns an error if the Vault request fails or the secret is missing or empty.
#[instrument(skip(globals))]
pub async fn read_cookie_secret(
    globals: &GlobalArgs,
    kv_mount: &str,
    kv_path: &str,
) -> Result<SecretString> {
    let client = Client::builder().user_agent(APP_USER_AGENT).build()?;
    let path = format!("/v1/{kv_mount}/data/{kv_path}");
    let url = vault::endpoint_url(&globals.vault_url, &path)?;

    let span = info_span!(
        "vault.kv.read",
        http.method = "GET",
        url = %url
    );
    let response = client
        .get(&url)
        .header("X-Vault-Token", globals.vault_token.expose_secret())
        .send()
        .instrument(span)
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("vault kv read failed: {status} {body}"));
    }

    let json: Value = response.json().await?;
    secret_from_response(&json)
}

fn secret_from_response(json: &Value) -> Result<SecretString> {
    let secret = json
        .get("data")
        .and_then(|data| data.get("data"))
        .and_then(|data| data.get(COOKIE_SECRET_FIELD))
        .and_then(Value::as_str)
        .context("cookie secret missing from vault response")?;

    if secret.is_empty() {
        return Err(anyhow!("cookie secret in vault is empty"));
    }

    Ok(SecretString::from(secret.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn secret_from_response_reads_kv2_payload() {
        let body = json!({"data": {"data": {"cookie_secret": "s3cr3t"}, "metadata": {}}});
        let secret = secret_from_response(&body).map(|s| s.expose_secret().to_string());
        assert_eq!(secret.ok().as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn secret_from_response_rejects_missing_field() {
        let body = json!({"data": {"data": {"other": "x"}}});
        assert!(secret_from_response(&body).is_err());
    }

    #[test]
    fn secret_from_response_rejects_empty() {
        let body = json!({"data": {"data": {"cookie_secret": ""}}});
        assert!(secret_from_response(&body).is_err());
    }
}
