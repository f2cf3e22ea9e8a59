//! The set of app data entries subject to backup and restore

/// Entries archived by `backup create`
pub const BACKUP_ENTRIES: [&str; 7] = [
    "shared_prefs",
    "files",
    "databases",
    "cache",
    "nimbus_data",
    "no_backup",
    "glean_data",
];

/// Entries never moved in either direction
pub const EXCLUDED_ENTRIES: [&str; 2] = ["lib", ".nomedia"];

/// Entry swapped with its own ordering, see `RestoreOrchestrator`
pub const CACHE_ENTRY: &str = "cache";

/// Named subdirectories of the private app directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDataLayout {
    entries: Vec<&'static str>,
}

impl Default for AppDataLayout {
    fn default() -> Self {
        Self {
            entries: BACKUP_ENTRIES.to_vec(),
        }
    }
}

impl AppDataLayout {
    pub fn entries(&self) -> &[&'static str] {
        &self.entries
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        EXCLUDED_ENTRIES.contains(&name)
    }

    /// Whether `name` is a backed-up entry or an excluded one
    pub fn is_known(&self, name: &str) -> bool {
        self.entries.contains(&name) || self.is_excluded(name)
    }

    pub fn includes_cache(&self) -> bool {
        self.entries.contains(&CACHE_ENTRY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = AppDataLayout::default();
        assert_eq!(layout.entries().len(), 7);
        assert!(layout.includes_cache());
        assert!(!layout.entries().contains(&"lib"));
    }

    #[test]
    fn test_exclusions() {
        let layout = AppDataLayout::default();
        assert!(layout.is_excluded("lib"));
        assert!(layout.is_excluded(".nomedia"));
        assert!(!layout.is_excluded("databases"));
        assert!(layout.is_known("lib"));
        assert!(layout.is_known("glean_data"));
        assert!(!layout.is_known("firefox-android-trash.tmp"));
    }
}
