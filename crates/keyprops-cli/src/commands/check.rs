//! `keyprops check` command.

use anyhow::{Context, Result, bail};
use keyprops_core::signing::{KeystoreInfo, verify_keystore};
use keyprops_core::{KeystoreConfigResolver, ReleaseVariant, SigningState};
use serde::Serialize;

use super::resolve::OutputFormat;

/// Release variant summary printed by `check`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub variant: &'static str,
    pub minify_enabled: bool,
    pub shrink_resources: bool,
    pub signing: SigningState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore: Option<KeystoreInfo>,
}

/// Reports how the release variant will be signed.
///
/// Fails unless the variant is fully signed. With `verify`, the keystore is
/// also opened with `keytool` to check the store password and alias.
pub async fn handle_check_command(
    resolver: &KeystoreConfigResolver,
    format: OutputFormat,
    verify: bool,
) -> Result<()> {
    let variant = ReleaseVariant::resolve(resolver);
    let mut report = CheckReport {
        variant: variant.name,
        minify_enabled: variant.minify_enabled,
        shrink_resources: variant.shrink_resources,
        signing: variant.signing_state(),
        keystore: None,
    };

    if report.signing == SigningState::Signed && verify {
        let info = verify_keystore(&variant.signing)
            .await
            .context("Keystore verification failed")?;
        report.keystore = Some(info);
    }

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_report(&report),
    }

    match report.signing {
        SigningState::Signed => Ok(()),
        SigningState::Unsigned => {
            if format == OutputFormat::Text {
                println!();
                println!("Run 'keyprops init' to create {}", resolver.properties_path().display());
            }
            bail!("Release build is not signed ({})", report.signing)
        }
        SigningState::Incomplete { .. } => {
            bail!("Release build is not fully signed ({})", report.signing)
        }
    }
}

fn print_report(report: &CheckReport) {
    println!("Build variant:    {}", report.variant);
    println!("Minify:           {}", on_off(report.minify_enabled));
    println!("Shrink resources: {}", on_off(report.shrink_resources));
    println!("Signing:          {}", report.signing);
    if let Some(info) = &report.keystore {
        println!("Keystore:         {} (alias '{}' found)", info.keystore_type, info.alias);
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
