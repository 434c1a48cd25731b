//! Deep links and `/start` payload extraction.
//!
//! A deep link carries a content ID as the `start` parameter of a bot link:
//! `https://<host>/<bot-identity>?start=<id>`. When a user opens it the
//! platform sends the bot `/start <id>`, which [`start_payload`] unpacks.

use std::fmt;

use relay_id::ContentId;

/// Default link host.
pub const DEFAULT_LINK_HOST: &str = "t.me";

/// A shareable link resolving to one content record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    host: String,
    bot_identity: String,
    id: ContentId,
}

impl DeepLink {
    pub fn new(host: impl Into<String>, bot_identity: impl Into<String>, id: ContentId) -> Self {
        Self {
            host: host.into(),
            bot_identity: bot_identity.into(),
            id,
        }
    }

    pub fn id(&self) -> &ContentId {
        &self.id
    }
}

impl fmt::Display for DeepLink {
    // IDs are URL-safe by construction, so no escaping is needed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "https://{}/{}?start={}",
            self.host.trim_end_matches('/'),
            self.bot_identity.trim_start_matches('@'),
            self.id
        )
    }
}

/// Extract the first argument of a `/start` command.
///
/// Accepts the addressed form `/start@botname`. Returns `None` for other
/// commands and for a bare `/start`. The payload is returned unvalidated.
pub fn start_payload(text: &str) -> Option<&str> {
    let mut parts = text.split_whitespace();
    let command = parts.next()?;
    let name = command.split('@').next()?;
    if name != "/start" {
        return None;
    }
    parts.next()
}
