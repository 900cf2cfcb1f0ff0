use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Upper bound on IDs per GOG products request, enforced upstream.
pub const GOG_BATCH_LIMIT: usize = 50;

/// A fallback data source queried over a persistent session.
///
/// Requests go to `https://<host><path>` with an optional ID appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub path: String,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
        }
    }

    /// URL of the endpoint itself
    pub fn url(&self) -> String {
        format!("https://{}{}", self.host, self.path)
    }

    /// URL with `id` appended to the path template
    pub fn url_for(&self, id: impl Display) -> String {
        format!("{}{}", self.url(), id)
    }
}

/// Effective settings for one validation run.
///
/// Loaded by [`crate::config::ConfigManager`] from built-in defaults, an
/// optional `fixcheck.yaml` in the project root, and `FIXCHECK_*` variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Project root containing the `gamefixes-*` directories
    pub root: Utf8PathBuf,

    #[serde(default = "default_steam_catalog_url")]
    pub steam_catalog_url: String,

    #[serde(default = "default_steam_fallback")]
    pub steam_fallback: Endpoint,

    /// Prefix the comma-joined GOG product IDs are appended to
    #[serde(default = "default_gog_catalog_url")]
    pub gog_catalog_url: String,

    #[serde(default = "default_umu_database")]
    pub umu_database: Endpoint,

    /// Timeout for the bulk catalog requests
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_gog_batch_size")]
    pub gog_batch_size: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept")]
    pub accept: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    #[serde(default)]
    pub debug: bool,

    /// Also write daily rotated logs here when set
    #[serde(default)]
    pub log_dir: Option<Utf8PathBuf>,
}

impl Settings {
    /// Default settings for a project rooted at `root`
    pub fn for_root(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            steam_catalog_url: default_steam_catalog_url(),
            steam_fallback: default_steam_fallback(),
            gog_catalog_url: default_gog_catalog_url(),
            umu_database: default_umu_database(),
            timeout_secs: default_timeout_secs(),
            gog_batch_size: default_gog_batch_size(),
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            debug: false,
            log_dir: None,
        }
    }

    /// Batch size actually used, clamped to `1..=GOG_BATCH_LIMIT`
    pub fn effective_gog_batch_size(&self) -> usize {
        self.gog_batch_size.clamp(1, GOG_BATCH_LIMIT)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_root(".")
    }
}

fn default_steam_catalog_url() -> String {
    "https://api.steampowered.com/ISteamApps/GetAppList/v2/".to_string()
}

fn default_steam_fallback() -> Endpoint {
    Endpoint::new("store.steampowered.com", "/api/appdetails?appids=")
}

fn default_gog_catalog_url() -> String {
    "https://api.gog.com/products?ids=".to_string()
}

fn default_umu_database() -> Endpoint {
    Endpoint::new("umu.openwinecomponents.org", "/umu_api.php?store=gog")
}

fn default_timeout_secs() -> u64 {
    500
}

fn default_gog_batch_size() -> usize {
    GOG_BATCH_LIMIT
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0".to_string()
}

fn default_accept() -> String {
    "application/font-woff2;q=1.0,application/font-woff;q=0.9,*/*;q=0.8".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.5".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.root, Utf8PathBuf::from("."));
        assert_eq!(settings.timeout_secs, 500);
        assert_eq!(settings.gog_batch_size, 50);
        assert!(!settings.debug);
        assert!(settings.log_dir.is_none());
    }

    #[test]
    fn test_endpoint_urls() {
        let endpoint = Endpoint::new("store.steampowered.com", "/api/appdetails?appids=");
        assert_eq!(
            endpoint.url_for(4730),
            "https://store.steampowered.com/api/appdetails?appids=4730"
        );
        assert_eq!(
            default_umu_database().url(),
            "https://umu.openwinecomponents.org/umu_api.php?store=gog"
        );
    }

    #[test]
    fn test_default_request_headers() {
        let settings = Settings::default();
        assert!(settings.user_agent.contains("Firefox/127.0"));
        assert_eq!(
            settings.accept,
            "application/font-woff2;q=1.0,application/font-woff;q=0.9,*/*;q=0.8"
        );
        assert_eq!(settings.accept_language, "en-US,en;q=0.5");
    }

    #[test]
    fn test_batch_size_is_clamped() {
        let mut settings = Settings::default();
        settings.gog_batch_size = 500;
        assert_eq!(settings.effective_gog_batch_size(), 50);
        settings.gog_batch_size = 0;
        assert_eq!(settings.effective_gog_batch_size(), 1);
        settings.gog_batch_size = 7;
        assert_eq!(settings.effective_gog_batch_size(), 7);
    }
}
