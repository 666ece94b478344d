//! Integration types.
//!
//! An integration is a connectable external tool. Integrations are never
//! created or removed at runtime; they only toggle between connected and
//! disconnected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::ids::IntegrationId;

/// Category of an integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegrationKind {
    /// Source control hosting.
    #[serde(rename = "github")]
    SourceControl,
    /// Team messaging.
    #[serde(rename = "slack")]
    Messaging,
    /// Notes and documents.
    #[serde(rename = "notion")]
    Notes,
    /// Calendar.
    #[serde(rename = "calendar")]
    Calendar,
}

impl IntegrationKind {
    /// Returns the wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationKind::SourceControl => "github",
            IntegrationKind::Messaging => "slack",
            IntegrationKind::Notes => "notion",
            IntegrationKind::Calendar => "calendar",
        }
    }

    /// What this kind of integration syncs, for "Connect X to sync your ..."
    /// prompts.
    pub fn sync_target(&self) -> &'static str {
        match self {
            IntegrationKind::SourceControl => "repositories",
            IntegrationKind::Messaging => "channels",
            IntegrationKind::Notes => "databases",
            IntegrationKind::Calendar => "calendar events",
        }
    }
}

impl fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" | "source-control" => Ok(IntegrationKind::SourceControl),
            "slack" | "messaging" => Ok(IntegrationKind::Messaging),
            "notion" | "notes" => Ok(IntegrationKind::Notes),
            "calendar" => Ok(IntegrationKind::Calendar),
            other => Err(ModelError::InvalidKind(other.to_string())),
        }
    }
}

/// A connectable external tool and its sync state.
///
/// `last_sync` is always `None` while `connected` is false. The mutators on
/// this type keep that invariant; code that builds an `Integration` by hand
/// should go through [`Integration::new`] and [`Integration::connected_at`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    /// Stable identifier.
    pub id: IntegrationId,

    /// Display name.
    pub name: String,

    /// Category.
    #[serde(rename = "type")]
    pub kind: IntegrationKind,

    /// Whether the integration is currently connected.
    pub connected: bool,

    /// When the integration last synced.
    pub last_sync: Option<DateTime<Utc>>,

    /// Number of items synced from this integration.
    #[serde(default)]
    pub tasks_count: u32,

    /// Display icon.
    pub icon: String,
}

impl Integration {
    /// Creates a disconnected integration that has never synced.
    pub fn new(
        id: impl Into<IntegrationId>,
        name: impl Into<String>,
        kind: IntegrationKind,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            connected: false,
            last_sync: None,
            tasks_count: 0,
            icon: icon.into(),
        }
    }

    /// Marks the integration connected with the given last-sync time.
    pub fn connected_at(mut self, last_sync: DateTime<Utc>) -> Self {
        self.connect(last_sync);
        self
    }

    /// Sets the synced-item count.
    pub fn with_tasks_count(mut self, count: u32) -> Self {
        self.tasks_count = count;
        self
    }

    /// Connects the integration, stamping `last_sync`.
    pub fn connect(&mut self, now: DateTime<Utc>) {
        self.connected = true;
        self.last_sync = Some(now);
    }

    /// Disconnects the integration and clears `last_sync`.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.last_sync = None;
    }

    /// Advances `last_sync` to `now` if connected.
    ///
    /// Returns true if the timestamp was touched.
    pub fn touch_sync(&mut self, now: DateTime<Utc>) -> bool {
        if !self.connected {
            return false;
        }
        self.last_sync = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn notion() -> Integration {
        Integration::new("notion", "Notion", IntegrationKind::Notes, "📝")
    }

    #[test]
    fn test_new_is_disconnected() {
        let i = notion();
        assert!(!i.connected);
        assert!(i.last_sync.is_none());
        assert_eq!(i.tasks_count, 0);
    }

    #[test]
    fn test_connect_then_disconnect() {
        let now = Utc::now();
        let mut i = notion();

        i.connect(now);
        assert!(i.connected);
        assert_eq!(i.last_sync, Some(now));

        i.disconnect();
        assert!(!i.connected);
        assert!(i.last_sync.is_none());
    }

    #[test]
    fn test_touch_sync_only_when_connected() {
        let now = Utc::now();
        let mut i = notion();
        assert!(!i.touch_sync(now));
        assert!(i.last_sync.is_none());

        let earlier = now - Duration::minutes(5);
        let mut i = notion().connected_at(earlier);
        assert!(i.touch_sync(now));
        assert_eq!(i.last_sync, Some(now));
    }

    #[test]
    fn test_kind_sync_target() {
        assert_eq!(IntegrationKind::SourceControl.sync_target(), "repositories");
        assert_eq!(IntegrationKind::Messaging.sync_target(), "channels");
        assert_eq!(IntegrationKind::Notes.sync_target(), "databases");
        assert_eq!(IntegrationKind::Calendar.sync_target(), "calendar events");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("GitHub".parse::<IntegrationKind>(), Ok(IntegrationKind::SourceControl));
        assert_eq!("notes".parse::<IntegrationKind>(), Ok(IntegrationKind::Notes));
        assert!("jira".parse::<IntegrationKind>().is_err());
    }

    #[test]
    fn test_serializes_with_original_field_names() {
        let i = notion().with_tasks_count(3);
        let json = serde_json::to_value(&i).unwrap();
        assert_eq!(json["type"], "notion");
        assert_eq!(json["tasksCount"], 3);
        assert!(json["lastSync"].is_null());
    }
}
