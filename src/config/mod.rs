use crate::models::Settings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};

/// Name of the optional settings file in the project root
pub const SETTINGS_FILE: &str = "fixcheck.yaml";

/// Prefix of the environment variables overriding settings
pub const ENV_PREFIX: &str = "FIXCHECK";

/// Configuration manager for layering run settings.
///
/// Sources, lowest priority first:
/// - Built-in defaults ([`Settings::for_root`])
/// - `fixcheck.yaml` in the project root, if present
/// - `FIXCHECK_*` environment variables (`__` separates nested keys, e.g.
///   `FIXCHECK_STEAM_FALLBACK__HOST`)
#[derive(Debug, Clone)]
pub struct ConfigManager {
    root: Utf8PathBuf,
    settings_path: Utf8PathBuf,
    env_overrides: Option<config::Map<String, String>>,
}

impl ConfigManager {
    /// Create a ConfigManager for the project at `root`.
    pub fn new<P: AsRef<Utf8Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            settings_path: root.join(SETTINGS_FILE),
            root,
            env_overrides: None,
        }
    }

    /// Create a ConfigManager for `FIXCHECK_ROOT`, or the current directory.
    pub fn from_environment() -> Result<Self> {
        let root = match std::env::var(format!("{ENV_PREFIX}_ROOT")) {
            Ok(root) => Utf8PathBuf::from(root),
            Err(_) => {
                let cwd = std::env::current_dir().context("Failed to read current directory")?;
                Utf8PathBuf::try_from(cwd).context("Current directory is not valid UTF-8")?
            }
        };
        Ok(Self::new(root))
    }

    /// Use `vars` instead of the process environment.
    pub fn with_env_overrides(mut self, vars: config::Map<String, String>) -> Self {
        self.env_overrides = Some(vars);
        self
    }

    /// Load the effective settings.
    pub fn load(&self) -> Result<Settings> {
        let defaults = Settings::for_root(&self.root);

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(self.env_overrides.clone());

        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&defaults).context("Failed to encode default settings")?)
            .add_source(
                File::new(self.settings_path.as_str(), FileFormat::Yaml).required(false),
            )
            .add_source(environment)
            .build()
            .with_context(|| format!("Failed to load settings for {}", self.root))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings for {}", self.root))?;

        Ok(settings)
    }

    /// Whether a settings file is present in the project root.
    pub fn has_settings_file(&self) -> bool {
        self.settings_path.is_file()
    }

    /// Render `settings` in the settings file format.
    ///
    /// The output can be written to `fixcheck.yaml` and loaded back.
    pub fn render_settings(&self, settings: &Settings) -> Result<String> {
        serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}
