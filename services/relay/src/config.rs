//! Relay configuration.
//!
//! Covers what the content-addressing side needs from the environment. Bot
//! credentials belong to the transport and are not read here.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use relay_id::{ContentId, SourceId};

use crate::link::{DeepLink, DEFAULT_LINK_HOST};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

/// Relay configuration (env-driven).
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON content store.
    pub store_path: PathBuf,

    /// Source location whose messages are ingested. `None` ingests nothing.
    pub source_id: Option<SourceId>,

    /// Host used when building deep links.
    pub link_host: String,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_path = lookup("RELAY_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("content_store.json"));

        // 0 is the historical "unset" value and never a real source.
        let source_id = lookup("RELAY_SOURCE_ID")
            .map(|v| v.trim().parse::<i64>())
            .transpose()
            .context("RELAY_SOURCE_ID must be an integer.")?
            .filter(|id| *id != 0)
            .map(SourceId::new);

        let link_host = lookup("RELAY_LINK_HOST").unwrap_or_else(|| DEFAULT_LINK_HOST.to_string());

        let log_level = lookup("RELAY_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match lookup("RELAY_LOG_FORMAT").as_deref() {
            None | Some("json") => LogFormat::Json,
            Some("text") => LogFormat::Text,
            Some(other) => bail!("RELAY_LOG_FORMAT must be 'json' or 'text', got '{other}'."),
        };

        Ok(Self {
            store_path,
            source_id,
            link_host,
            log_level,
            log_format,
        })
    }

    /// Whether content posted in `source` should be ingested.
    pub fn accepts_source(&self, source: SourceId) -> bool {
        self.source_id == Some(source)
    }

    /// Build the shareable link for `id`.
    pub fn deep_link(&self, bot_identity: &str, id: ContentId) -> DeepLink {
        DeepLink::new(self.link_host.clone(), bot_identity, id)
    }
}
