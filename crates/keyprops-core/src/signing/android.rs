//! Android keystore checks and key.properties generation.
//!
//! Writing `key.properties` is the inverse of resolving it: CI steps use
//! these helpers to materialise signing configuration before a Gradle build
//! and remove it afterwards.

use std::path::Path;
use std::process::Stdio;

use serde::Serialize;
use tokio::process::Command;

use super::identity::{
    KEY_ALIAS_KEY, KEY_PASSWORD_KEY, STORE_FILE_KEY, STORE_PASSWORD_KEY, SigningIdentity,
};
use crate::error::{KeypropsError, Result};
use crate::properties::format_entry;

/// Keystore container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeystoreType {
    Jks,
    Pkcs12,
}

impl KeystoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreType::Jks => "jks",
            KeystoreType::Pkcs12 => "pkcs12",
        }
    }
}

impl std::fmt::Display for KeystoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Information extracted from a keystore.
#[derive(Debug, Clone, Serialize)]
pub struct KeystoreInfo {
    /// Type of the keystore (JKS or PKCS12).
    pub keystore_type: KeystoreType,
    /// Alias that keytool found in the keystore.
    pub alias: String,
}

/// Checks a resolved identity against its keystore.
///
/// Uses the `keytool` CLI to open the keystore with the store password and
/// look up the alias. The identity must be complete.
pub async fn verify_keystore(identity: &SigningIdentity) -> Result<KeystoreInfo> {
    let (Some(keystore_path), Some(password), Some(alias)) = (
        identity.store_file.as_deref(),
        identity.store_password(),
        identity.key_alias.as_deref(),
    ) else {
        return Err(KeypropsError::IncompleteIdentity(identity.missing_fields()));
    };
    if identity.key_password.is_none() {
        return Err(KeypropsError::IncompleteIdentity(vec![KEY_PASSWORD_KEY]));
    }

    let data = tokio::fs::read(keystore_path)
        .await
        .map_err(|e| KeypropsError::io(keystore_path, e))?;
    let keystore_type = detect_keystore_type(&data);
    tracing::debug!(
        "Verifying {} keystore at {}",
        keystore_type,
        keystore_path.display()
    );

    let output = Command::new("keytool")
        .arg("-list")
        .arg("-keystore")
        .arg(keystore_path)
        .args(["-storepass", password, "-alias", alias])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => KeypropsError::ToolNotFound(
                "keytool (install a JDK and make sure it is on PATH)".to_string(),
            ),
            _ => KeypropsError::Signing(format!("Failed to run keytool: {}", e)),
        })?;

    if !output.status.success() {
        // keytool reports some failures on stdout
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        return Err(keytool_error(&format!("{}{}", stderr, stdout), alias));
    }

    Ok(KeystoreInfo {
        keystore_type,
        alias: alias.to_string(),
    })
}

/// Maps keytool's failure output to a signing error.
fn keytool_error(output: &str, alias: &str) -> KeypropsError {
    if output.contains("keystore password was incorrect") {
        return KeypropsError::Signing("Invalid keystore password".to_string());
    }
    if output.contains("does not exist") {
        return KeypropsError::Signing(format!("Alias '{}' not found in keystore", alias));
    }
    if output.contains("Invalid keystore format")
        || output.contains("Unrecognized keystore format")
    {
        return KeypropsError::Signing("Invalid keystore format".to_string());
    }

    KeypropsError::Signing(format!("Failed to validate keystore: {}", output.trim()))
}

/// Detects the keystore type from its magic bytes.
pub fn detect_keystore_type(data: &[u8]) -> KeystoreType {
    // JKS files start with magic bytes 0xFEEDFEED
    if data.starts_with(&[0xFE, 0xED, 0xFE, 0xED]) {
        return KeystoreType::Jks;
    }

    // PKCS12 (ASN.1 SEQUENCE) and anything unrecognised
    KeystoreType::Pkcs12
}

/// Generates `key.properties` content for Flutter/Gradle.
pub fn generate_key_properties(
    keystore_path: &Path,
    keystore_password: &str,
    key_alias: &str,
    key_password: &str,
) -> String {
    let keystore_path = keystore_path.to_string_lossy().into_owned();
    [
        (STORE_PASSWORD_KEY, keystore_password),
        (KEY_PASSWORD_KEY, key_password),
        (KEY_ALIAS_KEY, key_alias),
        (STORE_FILE_KEY, keystore_path.as_str()),
    ]
    .iter()
    .map(|(key, value)| format_entry(key, value) + "\n")
    .collect()
}

/// Writes signing properties to `properties_path`.
///
/// The parent directory (normally the build root) must already exist, and an
/// existing file is only replaced when `force` is set. On Unix the file is
/// readable by its owner only.
pub async fn write_key_properties(
    properties_path: &Path,
    keystore_path: &Path,
    keystore_password: &str,
    key_alias: &str,
    key_password: &str,
    force: bool,
) -> Result<()> {
    let parent = properties_path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.is_dir() {
        return Err(KeypropsError::Signing(format!(
            "Build root not found: {}",
            parent.display()
        )));
    }

    if properties_path.exists() && !force {
        return Err(KeypropsError::AlreadyExists(properties_path.to_path_buf()));
    }

    let content =
        generate_key_properties(keystore_path, keystore_password, key_alias, key_password);

    tokio::fs::write(properties_path, content)
        .await
        .map_err(|e| KeypropsError::io(properties_path, e))?;
    set_secure_permissions(properties_path).await?;

    tracing::debug!("Wrote signing properties to {}", properties_path.display());

    Ok(())
}

#[cfg(unix)]
async fn set_secure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .map_err(|e| KeypropsError::io(path, e))
}

#[cfg(not(unix))]
async fn set_secure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Removes the signing properties file.
///
/// Returns whether a file was removed.
pub async fn cleanup_key_properties(properties_path: &Path) -> Result<bool> {
    if !properties_path.exists() {
        return Ok(false);
    }

    tokio::fs::remove_file(properties_path)
        .await
        .map_err(|e| KeypropsError::io(properties_path, e))?;
    tracing::debug!("Removed signing properties from {}", properties_path.display());

    Ok(true)
}
