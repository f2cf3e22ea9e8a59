//! Paths that are safe to interpolate into a shell command
//!
//! A `SafePath` is an absolute path made only of printable ASCII, excluding
//! characters that keep a special meaning inside single or double quotes.

use std::fmt;
use std::path::Path;

use crate::error::{FabError, FabResult};

/// Characters rejected even though they are printable ASCII
const FORBIDDEN: [char; 6] = ['!', '"', '$', '\'', '\\', '`'];

/// An absolute path validated for unquoted-safe shell interpolation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(String);

impl SafePath {
    /// Validate a candidate path
    ///
    /// # Errors
    ///
    /// Returns `PathRejected` if the path is not absolute, is just `/`, or
    /// contains a character outside the allowed class.
    pub fn new(candidate: impl Into<String>) -> FabResult<Self> {
        let candidate = candidate.into();
        if is_safe(&candidate) {
            Ok(Self(candidate))
        } else {
            Err(FabError::PathRejected(candidate))
        }
    }

    /// Append one path component, re-validating the result
    pub fn join(&self, name: &str) -> FabResult<Self> {
        let base = self.0.trim_end_matches('/');
        Self::new(format!("{}/{}", base, name))
    }

    /// Last path component
    pub fn file_name(&self) -> &str {
        let trimmed = self.0.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl AsRef<Path> for SafePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl fmt::Display for SafePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&Path> for SafePath {
    type Error = FabError;

    fn try_from(path: &Path) -> FabResult<Self> {
        match path.to_str() {
            Some(s) => Self::new(s),
            None => Err(FabError::PathRejected(path.display().to_string())),
        }
    }
}

/// The path validator predicate
pub fn is_safe(candidate: &str) -> bool {
    let Some(rest) = candidate.strip_prefix('/') else {
        return false;
    };
    !rest.is_empty()
        && rest
            .chars()
            .all(|c| matches!(c, ' '..='~') && !FORBIDDEN.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_android_paths() {
        assert!(is_safe("/data/user/0/org.mozilla.firefox"));
        assert!(is_safe("/sdcard/Android/data/org.mozilla.firefox"));
        assert!(is_safe("/tmp/with space/and-(parens)&;|*?"));
    }

    #[test]
    fn test_rejects_quote_breaking_characters() {
        for c in ['"', '\'', '\\', '`', '$', '!'] {
            let path = format!("/data/user{}0", c);
            assert!(!is_safe(&path), "accepted {:?}", path);
            assert!(matches!(
                SafePath::new(path),
                Err(FabError::PathRejected(_))
            ));
        }
    }

    #[test]
    fn test_rejects_relative_root_and_non_ascii() {
        assert!(!is_safe(""));
        assert!(!is_safe("/"));
        assert!(!is_safe("data/user/0"));
        assert!(!is_safe("/data/\u{e9}t\u{e9}"));
        assert!(!is_safe("/data/line\nbreak"));
        assert!(!is_safe("/data/tab\there"));
    }

    #[test]
    fn test_every_allowed_character() {
        let allowed: String = (' '..='~').filter(|c| !FORBIDDEN.contains(c)).collect();
        assert!(is_safe(&format!("/{}", allowed)));
    }

    #[test]
    fn test_join() {
        let root = SafePath::new("/data/app/").unwrap();
        let cache = root.join("cache").unwrap();
        assert_eq!(cache.as_str(), "/data/app/cache");
        assert!(cache.join("it's").is_err());
        assert_eq!(cache.file_name(), "cache");
    }
}
