use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use switchboard_core::{AppError, AppResult, NonEmptyString};
use uuid::Uuid;

use crate::device::normalize_optional;

/// Stable identifier of a job definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Creates a random job identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a transport value into a job identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid job id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for JobId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A command paired with the template its output is checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDefinition {
    id: JobId,
    name: NonEmptyString,
    command: NonEmptyString,
    template: NonEmptyString,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl JobDefinition {
    /// Creates a validated job definition.
    pub fn new(
        id: JobId,
        name: impl Into<String>,
        command: impl Into<String>,
        template: impl Into<String>,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::for_field("job name", name)?,
            command: NonEmptyString::for_field("job command", command)?,
            template: NonEmptyString::for_field("job template", template)?,
            description: normalize_optional(description),
            created_at,
        })
    }

    /// Returns a copy with edited attributes.
    pub fn revise(
        &self,
        name: impl Into<String>,
        command: impl Into<String>,
        template: impl Into<String>,
        description: Option<String>,
    ) -> AppResult<Self> {
        Self::new(
            self.id,
            name,
            command,
            template,
            description,
            self.created_at,
        )
    }

    /// Returns the job identifier.
    #[must_use]
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Returns the job name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the device command.
    #[must_use]
    pub fn command(&self) -> &NonEmptyString {
        &self.command
    }

    /// Returns the expected-output template.
    #[must_use]
    pub fn template(&self) -> &NonEmptyString {
        &self.template
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns when the job was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
