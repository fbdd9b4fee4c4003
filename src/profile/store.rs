use super::TrayProfile;
use crate::error::RigError;
use crate::types::TrayId;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Resolves tray ids to validated profiles.
///
/// Directory-backed stores look up `<dir>/<trayId>.json`; loaded profiles are
/// memoized per id. An in-memory store serves tests and demos.
pub struct ProfileStore {
    dir: Option<PathBuf>,
    cache: HashMap<TrayId, Arc<TrayProfile>>,
}

impl ProfileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            cache: HashMap::new(),
        }
    }

    /// Store preloaded with the given profiles; nothing is read from disk.
    pub fn in_memory(profiles: Vec<TrayProfile>) -> Self {
        let cache = profiles
            .into_iter()
            .map(|p| (p.id.clone(), Arc::new(p)))
            .collect();
        Self { dir: None, cache }
    }

    /// Load and validate the profile for `tray`, memoizing the result.
    pub fn load(&mut self, tray: &TrayId) -> Result<Arc<TrayProfile>, RigError> {
        if let Some(profile) = self.cache.get(tray) {
            return Ok(Arc::clone(profile));
        }
        let dir = match &self.dir {
            Some(dir) => dir,
            None => return Err(RigError::ProfileNotFound(tray.clone())),
        };
        let path = dir.join(format!("{tray}.json"));
        if !path.is_file() {
            return Err(RigError::ProfileNotFound(tray.clone()));
        }
        let contents = fs::read_to_string(&path).map_err(|e| {
            RigError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let profile: TrayProfile =
            serde_json::from_str(&contents).map_err(|e| RigError::InvalidProfile {
                tray: tray.clone(),
                reason: format!("parse error: {e}"),
            })?;
        if &profile.id != tray {
            return Err(RigError::InvalidProfile {
                tray: tray.clone(),
                reason: format!("document declares id '{}'", profile.id),
            });
        }
        profile.validate().map_err(|reason| RigError::InvalidProfile {
            tray: tray.clone(),
            reason,
        })?;
        debug!(
            "ProfileStore: loaded '{tray}' ({} zones, {} parts)",
            profile.items.len(),
            profile.total_expected()
        );
        let profile = Arc::new(profile);
        self.cache.insert(tray.clone(), Arc::clone(&profile));
        Ok(profile)
    }

    /// Enumerate every tray id the store can resolve, sorted.
    pub fn list(&self) -> Result<Vec<TrayId>, RigError> {
        let mut ids: Vec<TrayId> = self.cache.keys().cloned().collect();
        if let Some(dir) = &self.dir {
            let entries = fs::read_dir(dir).map_err(|e| {
                RigError::Config(format!("failed to read {}: {e}", dir.display()))
            })?;
            for entry in entries {
                let entry =
                    entry.map_err(|e| RigError::Config(format!("directory entry: {e}")))?;
                let path = entry.path();
                if path.extension().map(|e| e == "json").unwrap_or(false) {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        ids.push(TrayId::from(stem));
                    }
                }
            }
        }
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}
