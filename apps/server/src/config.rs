use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use rand::{rngs::OsRng, RngCore};

use crate::auth::decode_secret_key;
use pocketpilot_ai::{LlmConfig, DEFAULT_MODEL};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub jwt_secret: Vec<u8>,
    pub token_ttl: Duration,
    pub llm: LlmConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("PP_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid PP_LISTEN_ADDR")?;
        let db_path = env_or("PP_DB_PATH", "./db/app.db");
        let cors_allow = env_or("PP_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("PP_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);
        let ttl_minutes: u64 = env_or("PP_TOKEN_TTL_MINUTES", "1440")
            .parse()
            .unwrap_or(1440);

        let jwt_secret = match env_opt("PP_JWT_SECRET") {
            Some(raw) => decode_secret_key(&raw).context("Invalid PP_JWT_SECRET")?,
            None => {
                tracing::warn!(
                    "PP_JWT_SECRET is not set; using a random key. Tokens will not survive a restart."
                );
                let mut bytes = vec![0u8; 32];
                OsRng.fill_bytes(&mut bytes);
                bytes
            }
        };

        let llm = LlmConfig {
            base_url: env_opt("PP_LLM_BASE_URL"),
            api_key: env_opt("PP_LLM_API_KEY"),
            model: env_opt("PP_LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret,
            token_ttl: Duration::from_secs(ttl_minutes * 60),
            llm,
        })
    }
}
