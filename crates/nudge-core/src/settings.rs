//! Per-user preferences (currently just the display timezone).

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono_tz::Tz;
use nudge_persistence::JsonDocument;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDocument {
    #[serde(default)]
    pub users: BTreeMap<String, UserSettings>,
}

/// Parses an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::InvalidTimezone(name.trim().to_string()))
}

/// File-backed settings store.
pub struct SettingsStore {
    document: JsonDocument<SettingsDocument>,
    default_timezone: Tz,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>, default_timezone: Tz) -> Self {
        Self {
            document: JsonDocument::new(path),
            default_timezone,
        }
    }

    /// The user's timezone, or the deployment default. A stored name that no
    /// longer parses also falls back to the default.
    pub fn timezone(&self, user_id: &str) -> Result<Tz> {
        let doc = self.document.load()?;
        Ok(doc
            .users
            .get(user_id)
            .and_then(|u| u.timezone.as_deref())
            .and_then(|name| name.parse::<Tz>().ok())
            .unwrap_or(self.default_timezone))
    }

    /// Validates and stores a timezone preference.
    pub fn set_timezone(&self, user_id: &str, name: &str) -> Result<Tz> {
        let tz = parse_timezone(name)?;
        self.document.update(|doc| {
            doc.users.entry(user_id.to_string()).or_default().timezone = Some(tz.name().to_string());
        })?;
        info!(user_id, timezone = %tz.name(), "timezone updated");
        Ok(tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_timezone_until_set() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("user-settings.json"), chrono_tz::Asia::Kolkata);

        assert_eq!(store.timezone("7").unwrap(), chrono_tz::Asia::Kolkata);

        store.set_timezone("7", " Europe/London ").unwrap();
        assert_eq!(store.timezone("7").unwrap(), chrono_tz::Europe::London);
        assert_eq!(store.timezone("8").unwrap(), chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn test_invalid_timezone_is_rejected_and_not_stored() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("user-settings.json"), chrono_tz::UTC);

        let err = store.set_timezone("7", "Mars/Olympus").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimezone(name) if name == "Mars/Olympus"));
        assert_eq!(store.timezone("7").unwrap(), chrono_tz::UTC);
    }
}
