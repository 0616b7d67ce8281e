mod state_builder;
mod storage;
mod suggester;

pub use state_builder::build_app_state;
#[cfg(test)]
pub(crate) use state_builder::assemble_app_state;
pub use storage::build_key_value_store;
pub use suggester::build_component_name_suggester;
