//! JSON seed data for the in-memory stores (dev and black-box tests).

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use shipyard_auth::{AccessTokenRegistry, LocalUserRecord, NewAccessToken, OAuthUserRecord};

use crate::{LocalUserStore, OAuthUserStore};

#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub local_users: Vec<LocalUserRecord>,
    #[serde(default)]
    pub oauth_users: Vec<OAuthUserRecord>,
    #[serde(default)]
    pub access_tokens: Vec<NewAccessToken>,
}

impl Seed {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing seed file {}", path.display()))
    }

    /// Load every record; stops at the first rejected access token.
    pub async fn apply(
        self,
        local: &LocalUserStore,
        oauth: &OAuthUserStore,
        tokens: &dyn AccessTokenRegistry,
    ) -> anyhow::Result<()> {
        let (locals, oauths, access) = (
            self.local_users.len(),
            self.oauth_users.len(),
            self.access_tokens.len(),
        );

        for record in self.local_users {
            let id = record.id.clone();
            local
                .upsert(record)
                .with_context(|| format!("seeding local user '{id}'"))?;
        }
        for record in self.oauth_users {
            let id = record.id.clone();
            oauth
                .upsert(record)
                .with_context(|| format!("seeding oauth user '{id}'"))?;
        }
        for token in self.access_tokens {
            let name = token.name.clone();
            tokens
                .create(token)
                .await
                .with_context(|| format!("seeding access token '{name}'"))?;
        }

        tracing::info!(
            local_users = locals,
            oauth_users = oauths,
            access_tokens = access,
            "seed data loaded"
        );
        Ok(())
    }
}
