//! `keyprops config` commands for managing CLI configuration.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::config::{CONFIG_ENV, CliConfig, Profile, config_path, load_config};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create a new config file with a default profile
    Init {
        /// Build root for the default profile
        #[arg(long)]
        build_root: Option<PathBuf>,

        /// Properties file for the default profile
        #[arg(long)]
        properties_file: Option<PathBuf>,

        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Set profile values (creates profile if it doesn't exist)
    Set {
        /// Profile name to update (defaults to "default")
        #[arg(long, default_value = "default")]
        profile: String,

        /// Gradle build root
        #[arg(long)]
        build_root: Option<PathBuf>,

        /// Properties file, relative to the build root
        #[arg(long)]
        properties_file: Option<PathBuf>,

        /// Set this profile as the default
        #[arg(long)]
        default: bool,
    },

    /// Show current configuration
    Show,

    /// Show config file path
    Path,
}

pub fn handle_config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init {
            build_root,
            properties_file,
            force,
        } => init_config(build_root, properties_file, force),
        ConfigCommands::Set {
            profile,
            build_root,
            properties_file,
            default,
        } => set_config(profile, build_root, properties_file, default),
        ConfigCommands::Show => show_config(),
        ConfigCommands::Path => show_path(),
    }
}

/// Create a new config file.
fn init_config(
    build_root: Option<PathBuf>,
    properties_file: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let path = config_path()?;

    if path.exists() && !force {
        bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let mut config = CliConfig::default();
    config.profiles.insert(
        "default".to_string(),
        Profile {
            build_root,
            properties_file,
        },
    );

    write_config(&path, &config)?;

    println!("Created config file at {}", path.display());
    println!();
    println!("To add a profile for another app:");
    println!("  keyprops config set --profile other --build-root /path/to/other_app/android");

    Ok(())
}

/// Update profile values.
fn set_config(
    profile_name: String,
    build_root: Option<PathBuf>,
    properties_file: Option<PathBuf>,
    set_default: bool,
) -> Result<()> {
    let path = config_path()?;

    let mut config = load_config()?.unwrap_or_default();

    let profile = config.profiles.entry(profile_name.clone()).or_default();

    let mut updated = false;
    if let Some(root) = build_root {
        profile.build_root = Some(root);
        updated = true;
    }
    if let Some(file) = properties_file {
        profile.properties_file = Some(file);
        updated = true;
    }

    if set_default && config.default_profile != profile_name {
        config.default_profile = profile_name.clone();
        updated = true;
    }

    if !updated && !set_default {
        println!("No changes specified. Use --build-root, --properties-file, or --default.");
        return Ok(());
    }

    write_config(&path, &config)?;

    println!("Updated profile '{}'", profile_name);
    if set_default {
        println!("Set '{}' as default profile", profile_name);
    }

    Ok(())
}

/// Display current configuration.
fn show_config() -> Result<()> {
    let path = config_path()?;

    let Some(config) = load_config()? else {
        println!("No config file found at {}", path.display());
        println!();
        println!("Using defaults:");
        println!("  Build root:  nearest Gradle root above the current directory");
        println!("  Properties:  key.properties");
        println!();
        println!("Run 'keyprops config init' to create a config file.");
        return Ok(());
    };

    println!("Config file: {}", path.display());
    println!("Default profile: {}", config.default_profile);
    println!();

    let mut names: Vec<_> = config.profiles.keys().collect();
    names.sort();

    for name in names {
        let profile = &config.profiles[name];
        let marker = if name == &config.default_profile { " *" } else { "" };

        println!("[{}]{}", name, marker);
        println!("  Build root: {}", display_or(&profile.build_root, "(auto)"));
        println!("  Properties: {}", display_or(&profile.properties_file, "key.properties"));
        println!();
    }

    Ok(())
}

/// Show the config file path.
fn show_path() -> Result<()> {
    println!("{}", config_path()?.display());

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        println!();
        println!("Note: {} is set to: {}", CONFIG_ENV, env_path);
    }

    Ok(())
}

fn display_or(path: &Option<PathBuf>, fallback: &str) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Write config to file with proper HUML formatting and secure permissions.
fn write_config(path: &Path, config: &CliConfig) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty() && !d.exists()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        #[cfg(unix)]
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }

    let content = serialize_to_huml(config);

    fs::write(path, &content).with_context(|| format!("Failed to write {}", path.display()))?;

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}

/// Serialize config to HUML format.
fn serialize_to_huml(config: &CliConfig) -> String {
    let mut output = String::new();

    output.push_str("%HUML v0.2.0\n");
    output.push_str(&format!("default_profile: {}\n", huml_string(&config.default_profile)));
    output.push('\n');
    output.push_str("profiles::\n");

    // Sort profiles alphabetically for deterministic output
    let mut profile_names: Vec<_> = config.profiles.keys().collect();
    profile_names.sort();

    for name in profile_names {
        let profile = &config.profiles[name];
        if profile.build_root.is_none() && profile.properties_file.is_none() {
            output.push_str(&format!("  {}:: {{}}\n", name));
            continue;
        }

        output.push_str(&format!("  {}::\n", name));
        if let Some(ref root) = profile.build_root {
            output.push_str(&format!("    build_root: {}\n", huml_string(&root.to_string_lossy())));
        }
        if let Some(ref file) = profile.properties_file {
            output.push_str(&format!(
                "    properties_file: {}\n",
                huml_string(&file.to_string_lossy())
            ));
        }
        output.push('\n');
    }

    output
}

fn huml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
