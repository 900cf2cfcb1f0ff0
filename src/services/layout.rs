//! Fix module discovery and the filesystem checks.
//!
//! Fix modules are the `*.py` files directly under `<root>/gamefixes-*/`,
//! minus [`IGNORED_FILES`]. Broken symlinks are part of that set: they are
//! listed from the directory, never resolved.

use crate::error::FixCheckError;
use crate::models::{
    FIX_DIR_PREFIX, FixModule, GOG_FIX_DIR, IGNORED_FILES, Platform, STEAM_FIX_DIR, UMU_PREFIX,
};
use camino::{Utf8Path, Utf8PathBuf};
use glob::{Pattern, glob};
use indexmap::IndexSet;
use regex::Regex;

/// Naming rules for fix filenames, compiled once.
pub struct FixNaming {
    /// Steam stems are app IDs: ASCII digits only
    steam_stem: Regex,

    /// Every other platform uses `umu-<id>`
    umu_name: Regex,
}

impl FixNaming {
    pub fn new() -> Self {
        Self {
            steam_stem: Regex::new(r"^[0-9]+$").expect("Invalid Steam stem regex"),
            umu_name: Regex::new(&format!("^{}", regex::escape(UMU_PREFIX)))
                .expect("Invalid umu prefix regex"),
        }
    }

    pub fn is_steam_stem(&self, stem: &str) -> bool {
        self.steam_stem.is_match(stem)
    }

    pub fn has_umu_prefix(&self, file_name: &str) -> bool {
        self.umu_name.is_match(file_name)
    }

    /// App ID named by a Steam stem, if it is all digits and fits in `u64`
    pub fn steam_app_id(&self, stem: &str) -> Option<u64> {
        if !self.is_steam_stem(stem) {
            return None;
        }
        stem.parse().ok()
    }

    /// Checks one module against its platform's rule
    pub fn check(&self, module: &FixModule) -> Result<(), FixCheckError> {
        match &module.platform {
            Platform::Steam if self.steam_app_id(module.stem()).is_none() => {
                Err(FixCheckError::InvalidSteamFilename(module.path.clone()))
            }
            Platform::Other(_) if !self.has_umu_prefix(module.file_name()) => {
                Err(FixCheckError::MissingUmuPrefix(module.path.clone()))
            }
            _ => Ok(()),
        }
    }
}

impl Default for FixNaming {
    fn default() -> Self {
        Self::new()
    }
}

/// Lists every fix module under `root`, sorted by path.
pub fn fix_modules(root: &Utf8Path) -> Result<Vec<FixModule>, FixCheckError> {
    // The root is literal; only the directory name is a pattern
    let pattern =
        Utf8PathBuf::from(Pattern::escape(root.as_str())).join(format!("{FIX_DIR_PREFIX}*"));
    tracing::debug!("Scanning {} for fix directories", pattern);

    let entries = glob(pattern.as_str()).map_err(|source| FixCheckError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut modules = Vec::new();
    for entry in entries {
        let dir = entry.map_err(|e| {
            let path = Utf8PathBuf::from(e.path().to_string_lossy().to_string());
            FixCheckError::io(path, std::io::Error::from(e))
        })?;
        let dir = Utf8PathBuf::from(dir.to_string_lossy().to_string());
        if !dir.is_dir() {
            continue;
        }
        let Some(platform) = dir.file_name().and_then(Platform::from_dir_name) else {
            continue;
        };

        for name in entry_names(&dir)? {
            if !name.ends_with(".py") || IGNORED_FILES.contains(&name.as_str()) {
                continue;
            }
            modules.push(FixModule::new(dir.join(&name), platform.clone()));
        }
    }

    modules.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(modules)
}

/// Fails on the first fix module that is a dangling symlink.
///
/// Returns the number of modules checked.
pub fn check_links(root: &Utf8Path) -> Result<usize, FixCheckError> {
    let modules = fix_modules(root)?;
    for module in &modules {
        tracing::info!("Checking link: {}", module.path);
        if module.is_broken_link() {
            return Err(FixCheckError::BrokenLink(module.path.clone()));
        }
    }
    Ok(modules.len())
}

/// Fails on the first fix module that is missing or misnamed.
///
/// Returns the number of modules checked.
pub fn check_filenames(root: &Utf8Path) -> Result<usize, FixCheckError> {
    let naming = FixNaming::new();
    let modules = fix_modules(root)?;
    for module in &modules {
        tracing::info!("Checking filename: {}", module.path);
        if !module.exists() {
            return Err(FixCheckError::MissingFile(module.path.clone()));
        }
        naming.check(module)?;
    }
    Ok(modules.len())
}

/// App IDs named by the entries of `gamefixes-steam`.
///
/// Non-numeric stems such as `__init__` are skipped.
pub fn steam_candidate_ids(root: &Utf8Path) -> Result<IndexSet<u64>, FixCheckError> {
    let naming = FixNaming::new();
    let mut ids = IndexSet::new();
    for stem in steam_stems(root)? {
        if !naming.is_steam_stem(&stem) {
            continue;
        }
        match stem.parse::<u64>() {
            Ok(id) => {
                ids.insert(id);
            }
            Err(_) => {
                return Err(FixCheckError::InvalidSteamFilename(
                    root.join(STEAM_FIX_DIR).join(&stem),
                ));
            }
        }
    }
    Ok(ids)
}

/// Stems of every entry of `gamefixes-steam`, numeric or not.
pub fn steam_stems(root: &Utf8Path) -> Result<IndexSet<String>, FixCheckError> {
    let dir = root.join(STEAM_FIX_DIR);
    if !dir.is_dir() {
        return Ok(IndexSet::new());
    }
    Ok(entry_names(&dir)?
        .iter()
        .map(|name| Utf8Path::new(name).file_stem().unwrap_or(name.as_str()).to_string())
        .collect())
}

/// IDs named by the `umu-` files of `gamefixes-gog`, prefix and extension removed.
pub fn gog_candidate_ids(root: &Utf8Path) -> Result<IndexSet<String>, FixCheckError> {
    let dir = root.join(GOG_FIX_DIR);
    if !dir.is_dir() {
        return Ok(IndexSet::new());
    }
    Ok(entry_names(&dir)?
        .iter()
        .filter_map(|name| {
            let stem = Utf8Path::new(name).file_stem().unwrap_or(name.as_str());
            stem.strip_prefix(UMU_PREFIX).map(str::to_string)
        })
        .collect())
}

/// Sorted names of the entries of `dir`, including dangling symlinks.
fn entry_names(dir: &Utf8Path) -> Result<Vec<String>, FixCheckError> {
    let mut names = Vec::new();
    for entry in dir
        .read_dir_utf8()
        .map_err(|e| FixCheckError::io(dir, e))?
    {
        let entry = entry.map_err(|e| FixCheckError::io(dir, e))?;
        names.push(entry.file_name().to_string());
    }
    names.sort();
    Ok(names)
}
