use crate::types::{Region, TrayId, ZoneId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Key identifying a logo template or classifier held by the external vision
/// service. Presence on an item enables the logo check for that zone only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogoRef(pub String);

/// One verifiable zone of a tray.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpectedItem {
    pub zone: ZoneId,
    /// Number of parts this zone must hold. Always at least one.
    pub expected: u32,
    pub region: Region,
    #[serde(default)]
    pub logo: Option<LogoRef>,
}

/// Expected-item layout for one tray type. Immutable once loaded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrayProfile {
    pub id: TrayId,
    pub name: String,
    #[serde(default)]
    pub version: u32,
    pub items: Vec<ExpectedItem>,
}

impl TrayProfile {
    /// Structural checks applied once at load time. Profiles that pass are
    /// trusted by the detector and mapper without re-checking.
    pub fn validate(&self) -> Result<(), String> {
        if self.items.is_empty() {
            return Err("profile has no expected items".to_string());
        }
        let mut seen: HashSet<&ZoneId> = HashSet::new();
        for item in &self.items {
            if !seen.insert(&item.zone) {
                return Err(format!("duplicate zone id '{}'", item.zone));
            }
            if item.expected == 0 {
                return Err(format!("zone '{}': expected count must be positive", item.zone));
            }
            if item.region.is_degenerate() {
                return Err(format!("zone '{}': degenerate region", item.zone));
            }
        }
        Ok(())
    }

    pub fn item(&self, zone: &ZoneId) -> Option<&ExpectedItem> {
        self.items.iter().find(|i| &i.zone == zone)
    }

    /// Total part count across all zones.
    pub fn total_expected(&self) -> u32 {
        self.items.iter().map(|i| i.expected).sum()
    }
}
