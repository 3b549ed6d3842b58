//! Flutter project detection and Gradle build root lookup.
//!
//! Gradle resolves `key.properties` and relative keystore paths against its
//! root project. In a Flutter project that is the `android/` directory next
//! to `pubspec.yaml`.

use std::path::{Path, PathBuf};

/// Files that mark the root project of a Gradle build.
const GRADLE_SETTINGS_FILES: [&str; 2] = ["settings.gradle", "settings.gradle.kts"];

/// Detects if a directory contains a Flutter project.
///
/// A Flutter project is identified by the presence of `pubspec.yaml`.
pub fn detect_flutter_project(dir: &Path) -> bool {
    dir.join("pubspec.yaml").exists()
}

/// Whether `dir` is the root project of a Gradle build.
pub fn is_gradle_root(dir: &Path) -> bool {
    GRADLE_SETTINGS_FILES
        .iter()
        .any(|name| dir.join(name).is_file())
}

/// Finds the Gradle build root for `start`.
///
/// Checks `start` itself, then `start/android`, then repeats both checks for
/// every ancestor directory. Returns `None` when no Gradle root is found.
pub fn find_build_root(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        if is_gradle_root(dir) {
            return Some(dir.to_path_buf());
        }

        let android = dir.join("android");
        if is_gradle_root(&android) {
            if !detect_flutter_project(dir) {
                tracing::debug!("{} has no pubspec.yaml, using it anyway", dir.display());
            }
            return Some(android);
        }
    }

    None
}
