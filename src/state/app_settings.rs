use anyhow::{Context, bail};
use cartola_api::cache::{DEFAULT_TTL, MemoryCache};
use cartola_api::client::CartolaApi;
use log::{LevelFilter, debug};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api_url: Option<String>,
    pub bearer_token: Option<String>,
    pub glb_id: Option<String>,
    pub credentials: Option<(String, String)>,
    pub attempts: u32,
    /// `None` disables the response cache.
    pub cache_ttl: Option<Duration>,
    pub log_level: Option<LevelFilter>,
    /// Upper bound on team fetches in flight at once.
    pub concurrency: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            bearer_token: None,
            glb_id: None,
            credentials: None,
            attempts: 1,
            cache_ttl: None,
            log_level: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl AppSettings {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let credentials = match (var("CARTOLA_EMAIL"), var("CARTOLA_PASSWORD")) {
            (Some(email), Some(password)) => Some((email, password)),
            (None, None) => None,
            _ => bail!("missing e-mail or password: set both CARTOLA_EMAIL and CARTOLA_PASSWORD"),
        };

        let cache_ttl = var("CARTOLA_CACHE_TTL").and_then(|ttl| match ttl.parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => Some(DEFAULT_TTL),
        });

        let log_level = var("CARTOLA_LOG")
            .map(|level| level.parse::<LevelFilter>())
            .transpose()
            .context("CARTOLA_LOG must be one of off, error, warn, info, debug, trace")?;

        Ok(Self {
            api_url: var("CARTOLA_API_URL"),
            bearer_token: var("CARTOLA_BEARER_TOKEN"),
            glb_id: var("CARTOLA_GLB_ID"),
            credentials,
            attempts: var("CARTOLA_ATTEMPTS")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(1),
            cache_ttl,
            log_level,
            concurrency: var("CARTOLA_CONCURRENCY")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_CONCURRENCY),
        })
    }

    /// Build the API client, logging in first when credentials are set.
    pub async fn build_client(&self) -> anyhow::Result<CartolaApi> {
        let mut client = CartolaApi::new().with_attempts(self.attempts);
        if let Some(url) = &self.api_url {
            client = client.with_base_url(url.as_str());
        }
        if let Some(token) = &self.bearer_token {
            client = client.with_bearer_token(token.as_str());
        }
        if let Some(glb_id) = &self.glb_id {
            client = client.with_glb_id(glb_id.as_str());
        }
        if let Some(ttl) = self.cache_ttl {
            debug!("response cache enabled, ttl {ttl:?}");
            client = client.with_cache(Arc::new(MemoryCache::new()), ttl);
        }
        if let Some((email, password)) = &self.credentials {
            client.authenticate(email, password).await?;
        }
        Ok(client)
    }
}
