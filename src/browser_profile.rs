//! Throwaway Chrome profile directories
//!
//! Every browser-tier fetch launches Chrome on a fresh profile so no cookies,
//! storage or fingerprint state leaks from one page load to the next.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Prefix of every profile directory created by this crate
pub const PROFILE_PREFIX: &str = "stealthcrawl_profile";

/// RAII wrapper for a Chrome profile directory, removed on drop
#[derive(Debug)]
pub struct BrowserProfile {
    path: PathBuf,
}

impl BrowserProfile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BrowserProfile {
    fn drop(&mut self) {
        if self.path.exists() {
            debug!("Removing browser profile {}", self.path.display());
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!(
                    "Failed to remove profile directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Create a unique profile directory under the system temp dir
pub fn create_throwaway_profile() -> Result<BrowserProfile> {
    create_throwaway_profile_in(&std::env::temp_dir())
}

/// Create a unique profile directory under `parent`
pub fn create_throwaway_profile_in(parent: &Path) -> Result<BrowserProfile> {
    let path = parent.join(format!("{PROFILE_PREFIX}_{}", Uuid::new_v4()));

    // create_dir fails on an existing directory, so a UUID collision surfaces
    std::fs::create_dir(&path)
        .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;

    debug!("Created browser profile {}", path.display());
    Ok(BrowserProfile { path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_is_removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let profile = create_throwaway_profile_in(parent.path()).unwrap();
        let path = profile.path().to_path_buf();
        assert!(path.is_dir());
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(PROFILE_PREFIX)
        );

        std::fs::write(path.join("Cookies"), b"session").unwrap();
        drop(profile);
        assert!(!path.exists());
    }

    #[test]
    fn profiles_are_unique() {
        let parent = tempfile::tempdir().unwrap();
        let a = create_throwaway_profile_in(parent.path()).unwrap();
        let b = create_throwaway_profile_in(parent.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }
}
