//! Host related type definitions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default text encoding for hosts that never picked one
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Default SSH port
pub const DEFAULT_PORT: u16 = 22;

/// Stable storage identity of a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(i64);

impl HostId {
    /// Sentinel used by front-ends to say "no existing host"
    pub const NO_HOST_ID: i64 = -1;

    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Decode a raw front-end value. Only the sentinel maps to `None`; any
    /// other value is an id that storage has to resolve.
    #[must_use]
    pub fn from_raw(raw: i64) -> Option<Self> {
        (raw != Self::NO_HOST_ID).then_some(Self(raw))
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted remote-connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRecord {
    /// Storage identity; `None` until the record is first saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<HostId>,
    /// Display nickname
    pub nickname: String,
    /// Transport protocol name (`ssh`, `telnet`, `local`)
    pub protocol: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub hostname: String,
    pub port: u16,
    /// Selected public key id; negative values are the built-in choices
    pub pubkey_id: i64,
    /// Canonical charset identifier used by the terminal
    pub encoding: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub font_size: u16,
    #[serde(default)]
    pub compression: bool,
    #[serde(default = "default_true")]
    pub want_session: bool,
    #[serde(default)]
    pub stay_connected: bool,
    #[serde(default)]
    pub quick_disconnect: bool,
    /// Commands sent after login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_connect: Option<DateTime<Utc>>,
}

const fn default_true() -> bool {
    true
}

impl HostRecord {
    /// Create an unsaved SSH host with default settings
    #[must_use]
    pub fn new_ssh(
        nickname: impl Into<String>,
        username: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            nickname: nickname.into(),
            protocol: "ssh".to_string(),
            username: username.into(),
            hostname: hostname.into(),
            port: DEFAULT_PORT,
            pubkey_id: super::PUBKEY_ID_ANY,
            encoding: DEFAULT_ENCODING.to_string(),
            color: None,
            font_size: 10,
            compression: false,
            want_session: true,
            stay_connected: false,
            quick_disconnect: false,
            post_login: None,
            last_connect: None,
        }
    }

    /// Copy of this record with a different encoding
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Whether this record has already been persisted
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

/// Parameters an editing session is opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditRequest {
    pub existing: Option<HostId>,
}

impl EditRequest {
    #[must_use]
    pub const fn for_new_host() -> Self {
        Self { existing: None }
    }

    #[must_use]
    pub const fn for_existing_host(id: HostId) -> Self {
        Self { existing: Some(id) }
    }

    /// Decode the raw id passed along by a front-end launcher
    #[must_use]
    pub fn from_extra(raw: i64) -> Self {
        Self {
            existing: HostId::from_raw(raw),
        }
    }
}
