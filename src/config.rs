//! Environment-driven configuration, read once at startup.

use crate::hub::MatchPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    /// Bearer token for the admin HTTP surface and observer WS privilege.
    pub admin_token: String,
    pub match_policy: MatchPolicy,
    pub stats_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let match_policy = match dotenv::var("NIGHTHUB_MATCH_POLICY").as_deref() {
            Ok("mixed") => MatchPolicy::Mixed,
            Ok("same_strictness") | Err(_) => MatchPolicy::SameStrictness,
            Ok(other) => anyhow::bail!("unknown NIGHTHUB_MATCH_POLICY: {other}"),
        };
        Ok(Self {
            bind_addr: dotenv::var("NIGHTHUB_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_owned()),
            database_url: dotenv::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://nighthub.db?mode=rwc".to_owned()),
            admin_token: dotenv::var("NIGHTHUB_ADMIN_TOKEN")
                .map_err(|_| anyhow::anyhow!("NIGHTHUB_ADMIN_TOKEN must be set"))?,
            match_policy,
            stats_interval_secs: dotenv::var("NIGHTHUB_STATS_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}
