use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use switchboard_core::{AppError, AppResult, NonEmptyString};
use uuid::Uuid;

/// Stable identifier of a managed device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Uuid);

impl DeviceId {
    /// Creates a random device identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a transport value into a device identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid device id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DeviceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Last known result of a simulated reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    /// Device has not been probed yet.
    Unknown,
    /// Last probe succeeded.
    Reachable,
    /// Last probe failed.
    Unreachable,
}

impl Reachability {
    /// Returns a stable storage value for this state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Reachable => "reachable",
            Self::Unreachable => "unreachable",
        }
    }
}

/// Probability that a simulated reachability probe succeeds.
pub const REACHABILITY_PROBABILITY: f64 = 0.8;

/// Managed network device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    id: DeviceId,
    name: NonEmptyString,
    ip_address: IpAddr,
    device_type: NonEmptyString,
    location: Option<String>,
    reachability: Reachability,
    last_checked_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Device {
    /// Creates a validated device with unknown reachability.
    pub fn new(
        id: DeviceId,
        name: impl Into<String>,
        ip_address: &str,
        device_type: impl Into<String>,
        location: Option<String>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::for_field("device name", name)?,
            ip_address: parse_ip_address(ip_address)?,
            device_type: NonEmptyString::for_field("device type", device_type)?,
            location: normalize_optional(location),
            reachability: Reachability::Unknown,
            last_checked_at: None,
            created_at,
        })
    }

    /// Returns a copy with edited attributes, keeping identity and probe history.
    pub fn revise(
        &self,
        name: impl Into<String>,
        ip_address: &str,
        device_type: impl Into<String>,
        location: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: self.id,
            name: NonEmptyString::for_field("device name", name)?,
            ip_address: parse_ip_address(ip_address)?,
            device_type: NonEmptyString::for_field("device type", device_type)?,
            location: normalize_optional(location),
            reachability: self.reachability,
            last_checked_at: self.last_checked_at,
            created_at: self.created_at,
        })
    }

    /// Returns a copy carrying the outcome of a probe.
    #[must_use]
    pub fn with_probe_result(&self, reachable: bool, checked_at: DateTime<Utc>) -> Self {
        Self {
            reachability: if reachable {
                Reachability::Reachable
            } else {
                Reachability::Unreachable
            },
            last_checked_at: Some(checked_at),
            ..self.clone()
        }
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Returns the device name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the management address.
    #[must_use]
    pub fn ip_address(&self) -> IpAddr {
        self.ip_address
    }

    /// Returns the free-text device type.
    #[must_use]
    pub fn device_type(&self) -> &NonEmptyString {
        &self.device_type
    }

    /// Returns the optional location label.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the last probe result.
    #[must_use]
    pub fn reachability(&self) -> Reachability {
        self.reachability
    }

    /// Returns when the device was last probed.
    #[must_use]
    pub fn last_checked_at(&self) -> Option<DateTime<Utc>> {
        self.last_checked_at
    }

    /// Returns when the device was registered.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn parse_ip_address(value: &str) -> AppResult<IpAddr> {
    IpAddr::from_str(value.trim())
        .map_err(|_| AppError::Validation(format!("invalid device ip address '{value}'")))
}

pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
