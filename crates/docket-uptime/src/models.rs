//! Uptime-monitor entities.

use chrono::{DateTime, Utc};
use docket::{DocketError, DocketResult};
use http::Uri;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of an [`HttpMonitor`].
///
/// Always wraps a non-nil UUID. There are no implicit conversions to or from
/// [`Uuid`]; use [`HttpMonitorId::new`] and [`HttpMonitorId::as_uuid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HttpMonitorId(Uuid);

impl HttpMonitorId {
    /// Wraps `value`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` with parameter `value` if `value` is nil.
    pub fn new(value: Uuid) -> DocketResult<Self> {
        if value.is_nil() {
            return Err(DocketError::invalid_argument(
                "value",
                "nil UUID is not a valid monitor id",
            ));
        }
        Ok(Self(value))
    }

    /// Generates a fresh, time-ordered identifier.
    #[must_use]
    pub fn create() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for HttpMonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for HttpMonitorId {
    type Err = DocketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Uuid::parse_str(s)
            .map_err(|e| DocketError::invalid_argument("value", e.to_string()))?;
        Self::new(value)
    }
}

impl Serialize for HttpMonitorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HttpMonitorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Uuid::deserialize(deserializer)?;
        Self::new(value).map_err(D::Error::custom)
    }
}

/// Parses an absolute `http` or `https` URL.
///
/// # Errors
///
/// Returns `InvalidArgument` with parameter `url` if `raw` is not a URI, is
/// relative, or uses another scheme.
pub fn parse_monitor_url(raw: &str) -> DocketResult<Uri> {
    let url: Uri = raw
        .parse()
        .map_err(|e| DocketError::invalid_argument("url", format!("'{raw}': {e}")))?;

    match url.scheme_str() {
        Some("http" | "https") if url.authority().is_some() => Ok(url),
        Some(scheme) if url.authority().is_some() => Err(DocketError::invalid_argument(
            "url",
            format!("'{raw}': unsupported scheme '{scheme}'"),
        )),
        _ => Err(DocketError::invalid_argument(
            "url",
            format!("'{raw}': must be an absolute URL"),
        )),
    }
}

/// A URL polled for availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpMonitor {
    /// Identifier, also the storage key.
    pub id: HttpMonitorId,
    /// Absolute `http` or `https` URL that is checked.
    #[serde(with = "monitor_url")]
    pub url: Uri,
}

impl HttpMonitor {
    /// Creates a monitor checking `url`.
    ///
    /// # Errors
    ///
    /// See [`parse_monitor_url`].
    pub fn new(id: HttpMonitorId, url: &str) -> DocketResult<Self> {
        Ok(Self {
            id,
            url: parse_monitor_url(url)?,
        })
    }
}

mod monitor_url {
    use super::parse_monitor_url;
    use http::Uri;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(url: &Uri, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(url)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uri, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_monitor_url(&raw).map_err(D::Error::custom)
    }
}

/// Outcome of one check of an [`HttpMonitor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpMonitorCheckResult {
    /// Monitor that was checked.
    pub http_monitor_id: HttpMonitorId,
    /// HTTP status code returned by the check.
    pub http_status_code: u16,
    /// When the check completed.
    pub created: DateTime<Utc>,
}

impl HttpMonitorCheckResult {
    /// Creates a check result timestamped now.
    #[must_use]
    pub fn now(http_monitor_id: HttpMonitorId, http_status_code: u16) -> Self {
        Self {
            http_monitor_id,
            http_status_code,
            created: Utc::now(),
        }
    }

    /// Returns true for 2xx status codes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.http_status_code >= 200 && self.http_status_code < 300
    }
}
