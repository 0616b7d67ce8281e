use std::sync::Arc;

use async_trait::async_trait;
use switchboard_core::{AppError, AppResult, NonEmptyString};
use tracing::info;

/// Maximum accepted description length, in characters.
pub const MAX_COMPONENT_DESCRIPTION_LENGTH: usize = 2000;

/// Maximum length of a normalized component name.
pub const MAX_COMPONENT_NAME_LENGTH: usize = 64;

/// Port that proposes a UI component name for a free-text description.
#[async_trait]
pub trait ComponentNameSuggester: Send + Sync {
    /// Returns a raw suggestion. The service normalizes it afterwards.
    async fn suggest(&self, description: &str) -> AppResult<String>;
}

/// Application service for component name suggestions.
#[derive(Clone)]
pub struct ComponentNameService {
    suggester: Arc<dyn ComponentNameSuggester>,
}

impl ComponentNameService {
    /// Creates a service backed by the given suggester.
    #[must_use]
    pub fn new(suggester: Arc<dyn ComponentNameSuggester>) -> Self {
        Self { suggester }
    }

    /// Suggests a PascalCase component name for a description.
    pub async fn suggest_component_name(&self, description: &str) -> AppResult<String> {
        let description = NonEmptyString::for_field("description", description.trim())?;
        if description.as_str().chars().count() > MAX_COMPONENT_DESCRIPTION_LENGTH {
            return Err(AppError::Validation(format!(
                "description must be at most {MAX_COMPONENT_DESCRIPTION_LENGTH} characters"
            )));
        }

        let raw = self.suggester.suggest(description.as_str()).await?;
        let name = normalize_component_name(raw.as_str()).ok_or_else(|| {
            AppError::Internal(format!("suggester returned an unusable name: '{raw}'"))
        })?;

        info!(component_name = %name, "component name suggested");
        Ok(name)
    }
}

/// Turns free text into a PascalCase identifier.
///
/// Only the first non-empty line is used. Leading digits are dropped and the
/// result is capped at [`MAX_COMPONENT_NAME_LENGTH`] characters.
#[must_use]
pub fn normalize_component_name(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|line| !line.is_empty())?;

    let mut name = String::new();
    for word in line
        .split(|character: char| !character.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        let mut characters = word.chars();
        if let Some(first) = characters.next() {
            name.push(first.to_ascii_uppercase());
            name.extend(characters);
        }
    }

    let name: String = name
        .trim_start_matches(|character: char| character.is_ascii_digit())
        .chars()
        .take(MAX_COMPONENT_NAME_LENGTH)
        .collect();

    (!name.is_empty()).then_some(name)
}
