//! `keyprops resolve` command.

use anyhow::{Context, Result};
use clap::ValueEnum;
use keyprops_core::{KeystoreConfigResolver, SigningIdentity};
use serde::Serialize;

/// Output format for resolved identities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Printable view of a signing identity.
#[derive(Debug, Serialize)]
pub struct IdentityReport {
    pub properties_file: String,
    pub build_root: String,
    pub store_file: Option<String>,
    pub store_password: Option<String>,
    pub key_alias: Option<String>,
    pub key_password: Option<String>,
    pub usable: bool,
}

impl IdentityReport {
    /// Builds the report. Passwords are masked unless `show_secrets` is set.
    pub fn new(
        resolver: &KeystoreConfigResolver,
        identity: &SigningIdentity,
        show_secrets: bool,
    ) -> Self {
        let secret = |value: Option<&str>| {
            value.map(|v| if show_secrets { v.to_string() } else { mask_secret(v) })
        };

        Self {
            properties_file: resolver.properties_path().display().to_string(),
            build_root: resolver.build_root().display().to_string(),
            store_file: identity.store_file.as_ref().map(|p| p.display().to_string()),
            store_password: secret(identity.store_password()),
            key_alias: identity.key_alias.clone(),
            key_password: secret(identity.key_password()),
            usable: identity.is_usable(),
        }
    }
}

pub fn handle_resolve_command(
    resolver: &KeystoreConfigResolver,
    format: OutputFormat,
    show_secrets: bool,
) -> Result<()> {
    let identity = resolver.resolve();
    let report = IdentityReport::new(resolver, &identity, show_secrets);

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize identity")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &IdentityReport) {
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "(not set)".to_string());

    println!("Signing Identity");
    println!("================");
    println!("Properties:     {}", report.properties_file);
    println!("Build root:     {}", report.build_root);
    println!();
    println!("Store file:     {}", show(&report.store_file));
    println!("Store password: {}", show(&report.store_password));
    println!("Key alias:      {}", show(&report.key_alias));
    println!("Key password:   {}", show(&report.key_password));
    println!();
    println!("Usable:         {}", if report.usable { "yes" } else { "no" });
}

/// Masks a secret for display. Empty values stay visibly empty.
fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        "(empty)".to_string()
    } else {
        "********".to_string()
    }
}
