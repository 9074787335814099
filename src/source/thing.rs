//! Things: physical devices with an online status.

use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThingStatus {
    Uninitialized,
    Initializing,
    Unknown,
    Online,
    Offline,
    Removing,
    Removed,
}

impl ThingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ThingStatus::Uninitialized => "UNINITIALIZED",
            ThingStatus::Initializing => "INITIALIZING",
            ThingStatus::Unknown => "UNKNOWN",
            ThingStatus::Online => "ONLINE",
            ThingStatus::Offline => "OFFLINE",
            ThingStatus::Removing => "REMOVING",
            ThingStatus::Removed => "REMOVED",
        }
    }
}

impl fmt::Display for ThingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a thing together with an optional detail and description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThingStatusInfo {
    pub status: ThingStatus,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ThingStatusInfo {
    pub fn new(status: ThingStatus) -> Self {
        Self {
            status,
            detail: None,
            description: None,
        }
    }
}

impl fmt::Display for ThingStatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        if let Some(description) = &self.description {
            write!(f, ": {}", description)?;
        }
        Ok(())
    }
}

/// A device known to the thing registry.
#[derive(Debug)]
pub struct Thing {
    uid: String,
    label: Option<String>,
    status: RwLock<ThingStatusInfo>,
}

impl Thing {
    pub fn new(uid: impl Into<String>, status: ThingStatusInfo) -> Self {
        Self {
            uid: uid.into(),
            label: None,
            status: RwLock::new(status),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn status(&self) -> ThingStatusInfo {
        self.status.read().clone()
    }

    /// Replace the status, returning the previous one.
    pub fn set_status(&self, status: ThingStatusInfo) -> ThingStatusInfo {
        std::mem::replace(&mut *self.status.write(), status)
    }
}

/// Serialized form of a thing, as found in definition files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThingDefinition {
    pub uid: String,
    #[serde(default)]
    pub label: Option<String>,
    pub status: ThingStatus,
}

impl From<ThingDefinition> for Thing {
    fn from(definition: ThingDefinition) -> Self {
        let thing = Thing::new(definition.uid, ThingStatusInfo::new(definition.status));
        match definition.label {
            Some(label) => thing.with_label(label),
            None => thing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_info_display() {
        let mut info = ThingStatusInfo::new(ThingStatus::Offline);
        assert_eq!(info.to_string(), "OFFLINE");

        info.detail = Some("COMMUNICATION_ERROR".to_string());
        info.description = Some("bridge unreachable".to_string());
        assert_eq!(
            info.to_string(),
            "OFFLINE (COMMUNICATION_ERROR): bridge unreachable"
        );
    }
}
