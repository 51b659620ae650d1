//! # Gazette
//!
//! `gazette` serves three small server-rendered applications from one process:
//!
//! - a single-user **blog** (`/`, `/newpost`, `/post/{id}`),
//! - a **signup / login / welcome / logout** flow with cookie sessions,
//! - a **birthday** form validator (`/birthday`, `/thanks`).
//!
//! ## Sessions
//!
//! Sessions are entirely client-held. The `name` cookie carries
//! `username|hex(HMAC-SHA256(secret, username))` and is re-verified on every
//! request; nothing is stored server side. The signing secret comes from
//! `--cookie-secret` or from Vault KV, never from the binary.
//!
//! Passwords are stored as an unsalted SHA-256 digest. Identical passwords hash
//! identically across users; treat this as a known weakness of the scheme.

pub mod cli;
pub mod gazette;
pub mod vault;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
