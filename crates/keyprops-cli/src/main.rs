use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keyprops_core::KeystoreConfigResolver;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{
    check::handle_check_command,
    config::{ConfigCommands, handle_config_command},
    key_properties::{InitArgs, handle_clean_command, handle_init_command},
    resolve::{OutputFormat, handle_resolve_command},
};

#[derive(Parser)]
#[command(name = "keyprops")]
#[command(about = "Resolve Android release signing from key.properties", long_about = None)]
#[command(version = keyprops_core::VERSION)]
struct Cli {
    /// Configuration profile to use
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Gradle build root (overrides profile and KEYPROPS_BUILD_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Signing properties file, relative to the build root
    /// (overrides profile and KEYPROPS_PROPERTIES)
    #[arg(long, global = true)]
    properties: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and print the signing identity
    Resolve {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Print passwords instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },

    /// Check that the release build will be signed
    Check {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also open the keystore with keytool
        #[arg(long)]
        verify: bool,
    },

    /// Write a signing properties file
    Init(InitArgs),

    /// Remove the signing properties file
    Clean,

    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "keyprops=debug,keyprops_core=debug"
    } else {
        "keyprops=info,keyprops_core=info"
    };

    // Logs go to stderr so `resolve --format json` output stays parseable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (doesn't override existing env vars)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Config commands don't need a build root, handle separately
    if let Commands::Config(cmd) = cli.command {
        return handle_config_command(cmd);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config file: {:#}", e);
        None
    });

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let resolved = config::resolve_config(
        cli.profile.as_deref(),
        cli.root.as_deref(),
        cli.properties.as_deref(),
        file_config,
        &cwd,
    )?;

    let mut resolver = KeystoreConfigResolver::new(resolved.build_root);
    if let Some(file) = resolved.properties_file {
        resolver = resolver.with_properties_path(file);
    }

    match cli.command {
        Commands::Resolve {
            format,
            show_secrets,
        } => handle_resolve_command(&resolver, format, show_secrets)?,
        Commands::Check { format, verify } => {
            handle_check_command(&resolver, format, verify).await?
        }
        Commands::Init(args) => handle_init_command(&resolver, args).await?,
        Commands::Clean => handle_clean_command(&resolver).await?,
        Commands::Config(_) => unreachable!(), // Handled above
    }

    Ok(())
}
