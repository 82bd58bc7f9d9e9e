use std::net::SocketAddr;

pub const TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";
pub const ADDR_VAR: &str = "LEAD_RELAY_ADDR";

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Relay settings, read from the environment at startup.
///
/// Missing Telegram credentials are not a startup error: the relay still
/// serves and answers each submission with a configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub bind_addr: SocketAddr,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            telegram_token: None,
            telegram_chat_id: None,
            bind_addr: default_addr(),
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset; an
    /// unparseable address falls back to [`DEFAULT_ADDR`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = match var(ADDR_VAR) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "invalid {ADDR_VAR}, using {DEFAULT_ADDR}");
                default_addr()
            }),
            None => default_addr(),
        };

        Self {
            telegram_token: var(TOKEN_VAR),
            telegram_chat_id: var(CHAT_ID_VAR),
            bind_addr,
        }
    }

    /// Token and chat id, when both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.telegram_token.as_deref()?, self.telegram_chat_id.as_deref()?))
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}
