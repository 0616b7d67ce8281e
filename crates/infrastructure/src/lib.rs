//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod file_key_value_store;
mod heuristic_component_name_suggester;
mod http_component_name_suggester;
mod in_memory_key_value_store;
mod system_random_source;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use file_key_value_store::FileKeyValueStore;
pub use heuristic_component_name_suggester::HeuristicComponentNameSuggester;
pub use http_component_name_suggester::HttpComponentNameSuggester;
pub use in_memory_key_value_store::InMemoryKeyValueStore;
pub use system_random_source::SystemRandomSource;
