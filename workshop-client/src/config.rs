use crate::auth::DebugIdentity;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
pub const HOST_ENV: &str = "WORKSHOP_HOST";

/// Settings fixed at startup and carried by the client for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub debug_identity: Option<DebugIdentity>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(&base_url.into()),
            debug_identity: None,
        }
    }

    /// Reads `WORKSHOP_HOST` (after loading `.env` when present). The API
    /// lives under `/api` on that host.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_host(std::env::var(HOST_ENV).ok().as_deref())
    }

    pub fn from_host(host: Option<&str>) -> Self {
        match host.map(str::trim).filter(|h| !h.is_empty()) {
            Some(host) => Self::new(format!("{}/api", host.trim_end_matches('/'))),
            None => Self::default(),
        }
    }

    pub fn with_debug_identity(mut self, identity: Option<DebugIdentity>) -> Self {
        self.debug_identity = identity;
        self
    }
}

pub(crate) fn normalize_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_api() {
        let config = ClientConfig::from_host(None);
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert!(config.debug_identity.is_none());
    }

    #[test]
    fn host_override_appends_api_path() {
        let config = ClientConfig::from_host(Some("https://workshop.example.com/"));
        assert_eq!(config.base_url, "https://workshop.example.com/api");
    }

    #[test]
    fn blank_host_is_ignored() {
        assert_eq!(ClientConfig::from_host(Some("  ")), ClientConfig::default());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(ClientConfig::new("http://h/api/").base_url, "http://h/api");
    }
}
