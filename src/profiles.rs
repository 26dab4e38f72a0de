//! Saved personality profiles
//!
//! Profiles live as pretty JSON under `<results_dir>/profiles`, one file per
//! name, so a quiz only has to be taken once.

use crate::error::SkiTourError;
use crate::models::UserProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const PROFILES_DIR: &str = "profiles";

/// On-disk form of a saved profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProfile {
    pub profile_name: String,
    pub created_at: DateTime<Utc>,
    pub profile: UserProfile,
}

#[must_use]
pub fn profiles_dir(results_dir: &Path) -> PathBuf {
    results_dir.join(PROFILES_DIR)
}

/// File stem for a profile name: letters, digits, spaces, `-` and `_` only
pub fn clean_name(name: &str) -> crate::Result<String> {
    let name = name.strip_suffix(".json").unwrap_or(name);
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(SkiTourError::validation(format!(
            "profile name '{name}' has no usable characters"
        )));
    }
    Ok(cleaned.to_string())
}

fn profile_path(results_dir: &Path, name: &str) -> crate::Result<PathBuf> {
    Ok(profiles_dir(results_dir).join(format!("{}.json", clean_name(name)?)))
}

/// Save `profile` under `name`, replacing an earlier profile of the same name
pub fn save_profile(results_dir: &Path, name: &str, profile: &UserProfile) -> crate::Result<PathBuf> {
    profile.validate()?;
    let path = profile_path(results_dir, name)?;
    std::fs::create_dir_all(profiles_dir(results_dir))?;
    let saved = SavedProfile {
        profile_name: name.to_string(),
        created_at: Utc::now(),
        profile: profile.clone(),
    };
    std::fs::write(&path, serde_json::to_string_pretty(&saved)?)?;
    info!("👤 Profile saved to {}", path.display());
    Ok(path)
}

/// Load the profile saved under `name` (with or without `.json`)
pub fn load_profile(results_dir: &Path, name: &str) -> crate::Result<UserProfile> {
    let path = profile_path(results_dir, name)?;
    debug!("Loading profile from {}", path.display());
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SkiTourError::not_found(format!("No saved profile named '{name}'")));
        }
        Err(e) => return Err(e.into()),
    };
    let saved: SavedProfile = serde_json::from_str(&raw)?;
    saved.profile.validate()?;
    Ok(saved.profile)
}

/// Names of saved profiles, sorted; empty when nothing was saved yet
pub fn list_profiles(results_dir: &Path) -> crate::Result<Vec<String>> {
    let dir = profiles_dir(results_dir);
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
