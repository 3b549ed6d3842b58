//! CLI configuration loading and resolution.
//!
//! Supports profile-based configuration from `~/.keyprops/config.huml` with
//! priority order: CLI flags > environment variables > config file > defaults.

use anyhow::{Context, Result, bail};
use keyprops_core::flutter::find_build_root;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable overriding the build root.
pub const BUILD_ROOT_ENV: &str = "KEYPROPS_BUILD_ROOT";
/// Environment variable overriding the properties file.
pub const PROPERTIES_ENV: &str = "KEYPROPS_PROPERTIES";
/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "KEYPROPS_CONFIG";

/// CLI configuration loaded from config.huml file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Name of the default profile to use.
    pub default_profile: String,
    /// Map of profile name to profile configuration.
    pub profiles: HashMap<String, Profile>,
}

/// A named profile pointing at one Android build.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Gradle build root (e.g., "/work/my_app/android").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_root: Option<PathBuf>,
    /// Signing properties file, relative to the build root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties_file: Option<PathBuf>,
}

/// Resolved configuration after applying priority rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Gradle build root.
    pub build_root: PathBuf,
    /// Properties file override (default is `key.properties` in the build root).
    pub properties_file: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert("default".to_string(), Profile::default());
        Self {
            default_profile: "default".to_string(),
            profiles,
        }
    }
}

/// Returns the config directory path (~/.keyprops).
pub fn config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join(".keyprops"))
        .context("Could not determine home directory")
}

/// Returns the config file path, honouring `KEYPROPS_CONFIG`.
pub fn config_path() -> Result<PathBuf> {
    match std::env::var(CONFIG_ENV) {
        Ok(p) => Ok(PathBuf::from(p)),
        Err(_) => Ok(config_dir()?.join("config.huml")),
    }
}

/// Load configuration from the config file.
///
/// Returns `Ok(None)` if the config file doesn't exist.
/// Returns an error if the file exists but is invalid.
pub fn load_config() -> Result<Option<CliConfig>> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Option<CliConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config: CliConfig = huml_rs::serde::from_str(&content)
        .with_context(|| format!("Invalid HUML in {}", path.display()))?;

    validate_config(&config)?;
    check_file_permissions(path);

    Ok(Some(config))
}

/// Validate that the config has at least one profile and the default profile exists.
fn validate_config(config: &CliConfig) -> Result<()> {
    if config.profiles.is_empty() {
        bail!("Config file must contain at least one profile");
    }

    if !config.profiles.contains_key(&config.default_profile) {
        bail!(
            "Default profile '{}' not found in profiles",
            config.default_profile
        );
    }

    for (name, profile) in &config.profiles {
        if profile
            .build_root
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            bail!("Profile '{}' has an empty build root", name);
        }
    }

    Ok(())
}

/// Warn if config file has overly permissive permissions (on Unix).
#[cfg(unix)]
fn check_file_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = std::fs::metadata(path) {
        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            tracing::warn!(
                "{} has overly permissive permissions ({:o}). Consider running: chmod 600 {}",
                path.display(),
                mode & 0o777,
                path.display()
            );
        }
    }
}

#[cfg(not(unix))]
fn check_file_permissions(_path: &Path) {}

/// Resolve configuration by applying priority rules.
///
/// Priority order (highest to lowest):
/// 1. CLI flags (`--root`, `--properties`)
/// 2. Environment variables (`KEYPROPS_BUILD_ROOT`, `KEYPROPS_PROPERTIES`)
/// 3. Config file profile
/// 4. The Gradle root found from `cwd`, or `cwd` itself
///
/// Relative build roots are taken from `cwd`. An explicitly configured root
/// is used as-is; only the default is searched for.
pub fn resolve_config(
    profile_flag: Option<&str>,
    root_flag: Option<&Path>,
    properties_flag: Option<&Path>,
    file_config: Option<CliConfig>,
    cwd: &Path,
) -> Result<ResolvedConfig> {
    let mut build_root: Option<PathBuf> = None;
    let mut properties_file: Option<PathBuf> = None;

    // Apply config file (lowest priority)
    if let Some(config) = file_config {
        let profile_name = profile_flag.unwrap_or(&config.default_profile);
        if let Some(profile) = config.profiles.get(profile_name) {
            build_root = profile.build_root.clone();
            properties_file = profile.properties_file.clone();
        } else if profile_flag.is_some() {
            bail!(
                "Profile '{}' not found. Run 'keyprops config show' to see available profiles.",
                profile_name
            );
        }
    } else if let Some(requested_profile) = profile_flag {
        if requested_profile != "default" {
            bail!(
                "Profile '{}' not found. No config file exists. \
                 Run 'keyprops config init' to create one.",
                requested_profile
            );
        }
    }

    // Apply environment variables (medium priority)
    if let Some(root) = non_empty_env(BUILD_ROOT_ENV) {
        build_root = Some(PathBuf::from(root));
    }
    if let Some(file) = non_empty_env(PROPERTIES_ENV) {
        properties_file = Some(PathBuf::from(file));
    }

    // Apply CLI flags (highest priority)
    if let Some(root) = root_flag {
        build_root = Some(root.to_path_buf());
    }
    if let Some(file) = properties_flag {
        properties_file = Some(file.to_path_buf());
    }

    let build_root = match build_root {
        Some(root) => cwd.join(root),
        None => find_build_root(cwd).unwrap_or_else(|| {
            tracing::debug!("No Gradle build root found above {}", cwd.display());
            cwd.to_path_buf()
        }),
    };

    Ok(ResolvedConfig {
        build_root,
        properties_file,
    })
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
