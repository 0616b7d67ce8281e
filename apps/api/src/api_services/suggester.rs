use std::sync::Arc;

use switchboard_application::ComponentNameSuggester;
use switchboard_infrastructure::{HeuristicComponentNameSuggester, HttpComponentNameSuggester};
use tracing::info;

use crate::api_config::ComponentSuggesterConfig;

pub fn build_component_name_suggester(
    config: &ComponentSuggesterConfig,
    http_client: reqwest::Client,
) -> Arc<dyn ComponentNameSuggester> {
    match config {
        ComponentSuggesterConfig::Heuristic => Arc::new(HeuristicComponentNameSuggester::new()),
        ComponentSuggesterConfig::Http(http) => {
            info!(endpoint = %http.endpoint, model = %http.model, "using http component name suggester");
            Arc::new(HttpComponentNameSuggester::new(
                http_client,
                http.endpoint.as_str(),
                http.api_key.as_str(),
                http.model.as_str(),
            ))
        }
    }
}
