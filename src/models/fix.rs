use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Prefix shared by every platform fix directory
pub const FIX_DIR_PREFIX: &str = "gamefixes-";

pub const STEAM_FIX_DIR: &str = "gamefixes-steam";

pub const GOG_FIX_DIR: &str = "gamefixes-gog";

/// Filename prefix required outside the Steam directory
pub const UMU_PREFIX: &str = "umu-";

/// Files that live next to fixes but are not fixes themselves
pub const IGNORED_FILES: [&str; 3] = ["__init__.py", "default.py", "winetricks-gui.py"];

/// Store a fix directory belongs to, derived from its directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Steam,
    /// Any other `gamefixes-<name>` directory, holding `umu-` prefixed fixes
    Other(String),
}

impl Platform {
    /// Platform of a `gamefixes-*` directory, `None` for anything else
    pub fn from_dir_name(name: &str) -> Option<Self> {
        let suffix = name.strip_prefix(FIX_DIR_PREFIX)?;
        if name.starts_with(STEAM_FIX_DIR) {
            Some(Self::Steam)
        } else {
            Some(Self::Other(suffix.to_string()))
        }
    }

    pub fn is_steam(&self) -> bool {
        matches!(self, Self::Steam)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Steam => write!(f, "steam"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// One fix file found under a platform directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixModule {
    pub path: Utf8PathBuf,
    pub platform: Platform,
}

impl FixModule {
    pub fn new(path: impl Into<Utf8PathBuf>, platform: Platform) -> Self {
        Self {
            path: path.into(),
            platform,
        }
    }

    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or_default()
    }

    /// Filename without extension, the candidate ID for Steam fixes
    pub fn stem(&self) -> &str {
        self.path.file_stem().unwrap_or_default()
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn is_symlink(&self) -> bool {
        self.path.as_std_path().is_symlink()
    }

    /// Whether the file, or the target of the link, exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn is_broken_link(&self) -> bool {
        self.is_symlink() && !self.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_dir_name() {
        assert_eq!(Platform::from_dir_name("gamefixes-steam"), Some(Platform::Steam));
        assert_eq!(
            Platform::from_dir_name("gamefixes-gog"),
            Some(Platform::Other("gog".to_string()))
        );
        assert_eq!(
            Platform::from_dir_name("gamefixes-egs"),
            Some(Platform::Other("egs".to_string()))
        );
        assert_eq!(Platform::from_dir_name("protonfixes"), None);
    }

    #[test]
    fn test_fix_module_names() {
        let module = FixModule::new("root/gamefixes-gog/umu-1234.py", Platform::Other("gog".into()));
        assert_eq!(module.file_name(), "umu-1234.py");
        assert_eq!(module.stem(), "umu-1234");
        assert!(!module.platform.is_steam());
    }
}
