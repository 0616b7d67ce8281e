use async_trait::async_trait;
use switchboard_application::ComponentNameSuggester;
use switchboard_core::AppResult;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "component", "displays", "for", "from", "in", "is", "it", "of", "on",
    "or", "shows", "that", "the", "this", "to", "which", "with",
];

const KIND_SUFFIXES: &[(&[&str], &str)] = &[
    (&["table", "list", "grid", "history"], "List"),
    (&["form", "input", "edit", "editor"], "Form"),
    (&["chart", "graph", "plot"], "Chart"),
    (&["modal", "dialog", "popup"], "Dialog"),
    (&["button"], "Button"),
    (&["card", "tile"], "Card"),
];

const MAX_SUBJECT_WORDS: usize = 3;

/// Offline suggester composing a name from description keywords.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicComponentNameSuggester;

impl HeuristicComponentNameSuggester {
    /// Creates a suggester.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ComponentNameSuggester for HeuristicComponentNameSuggester {
    async fn suggest(&self, description: &str) -> AppResult<String> {
        Ok(suggest_from_keywords(description))
    }
}

fn suggest_from_keywords(description: &str) -> String {
    let words: Vec<String> = description
        .split(|character: char| !character.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    let suffix = KIND_SUFFIXES
        .iter()
        .find(|(keywords, _)| words.iter().any(|word| keywords.contains(&word.as_str())))
        .map_or("Panel", |(_, suffix)| *suffix);

    let mut subject: Vec<&str> = Vec::new();
    for word in &words {
        let is_kind_word = KIND_SUFFIXES
            .iter()
            .any(|(keywords, _)| keywords.contains(&word.as_str()));
        if STOP_WORDS.contains(&word.as_str())
            || is_kind_word
            || subject.contains(&word.as_str())
        {
            continue;
        }
        subject.push(word.as_str());
        if subject.len() == MAX_SUBJECT_WORDS {
            break;
        }
    }

    let mut name = subject.join(" ");
    name.push(' ');
    name.push_str(suffix);
    name
}
