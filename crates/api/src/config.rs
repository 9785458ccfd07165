//! Process configuration, read once at startup and injected from there.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context};

use shipyard_auth::{SubjectId, VerifierConfig, MAX_LEEWAY_SECS};

use crate::authz::AdminPolicy;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub verifier: VerifierConfig,
    /// Optional JSON file loaded into the in-memory stores at startup.
    pub seed_file: Option<PathBuf>,
    /// Local users allowed to manage access tokens.
    pub admins: AdminPolicy,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source (environment, test maps).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let secret = lookup("JWT_SECRET_KEY")
            .or_else(|| lookup("JWT_SECRET"))
            .filter(|s| !s.is_empty());
        let Some(secret) = secret else {
            bail!("JWT_SECRET_KEY must be set to a non-empty value");
        };

        let leeway_secs = match lookup("JWT_LEEWAY_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("JWT_LEEWAY_SECS is not a number: {raw:?}"))?,
            None => 0,
        };
        if leeway_secs > MAX_LEEWAY_SECS {
            bail!("JWT_LEEWAY_SECS must be at most {MAX_LEEWAY_SECS}, got {leeway_secs}");
        }

        let bind_addr = lookup("SHIPYARD_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("SHIPYARD_BIND_ADDR is not a socket address: {bind_addr:?}"))?;

        Ok(Self {
            bind_addr,
            verifier: VerifierConfig::new(secret.into_bytes()).with_leeway(leeway_secs),
            seed_file: lookup("SHIPYARD_SEED_FILE").map(PathBuf::from),
            admins: AdminPolicy::new(parse_subjects(
                lookup("SHIPYARD_ADMIN_SUBJECTS").as_deref(),
            )),
        })
    }
}

/// Comma-separated subject ids; blanks are skipped.
fn parse_subjects(raw: Option<&str>) -> Vec<SubjectId> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(SubjectId::new)
        .collect()
}
