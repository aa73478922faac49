//! Recipe lookup tool definition.
//!
//! Fetches the recipe candidates for a dish from the upstream recipe
//! endpoint and returns one variant, chosen uniformly at random.

use futures::FutureExt;
use rand::Rng;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::config::Config;
use crate::domains::tools::error::{ToolFailure, success_result};
use crate::domains::upstream::{ApiEnvelope, FoodMenuData, UpstreamClient, is_quota_exhausted};

const SERVICE: &str = "Recipe lookup";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the recipe lookup tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetFoodMenuParams {
    /// Name of the dish to look up.
    #[serde(rename = "foodTitle")]
    #[schemars(description = "Name of the dish to look up")]
    pub food_title: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Recipe lookup tool.
pub struct GetFoodMenuTool;

impl GetFoodMenuTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getFoodMenu";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Look up the recipe (preparation method) for a dish by name. \
         One recipe variant is returned, chosen at random among the candidates.";

    /// Execute the tool logic.
    pub async fn execute(
        params: &GetFoodMenuParams,
        config: &Config,
        upstream: &UpstreamClient,
    ) -> CallToolResult {
        info!("Recipe lookup called for: {}", params.food_title);

        let Some((app_key, uid)) = config.credentials.pair() else {
            warn!("Recipe lookup refused: credentials not configured");
            return ToolFailure::MissingCredentials.into_result();
        };

        let envelope = upstream.food_menu(&params.food_title, app_key, uid).await;
        Self::render_menu(&params.food_title, envelope)
    }

    /// Turn the upstream response into the caller-visible text result.
    pub fn render_menu(
        food_title: &str,
        envelope: Option<ApiEnvelope<FoodMenuData>>,
    ) -> CallToolResult {
        let Some(envelope) = envelope else {
            return ToolFailure::Unreachable(SERVICE).into_result();
        };

        if is_quota_exhausted(envelope.code) {
            return ToolFailure::QuotaExhausted(SERVICE).into_result();
        }

        if envelope.code != 0 {
            return ToolFailure::Upstream {
                service: SERVICE,
                code: envelope.code,
                msg: envelope.msg,
            }
            .into_result();
        }

        let menu = envelope.data.unwrap_or_default().food_menu;

        // An empty candidate list is a defined failure, not an index panic.
        if menu.is_empty() {
            return ToolFailure::precondition(format!("No recipe found for '{}'.", food_title))
                .into_result();
        }

        let index = rand::thread_rng().gen_range(0..menu.len());
        let recipe = serde_json::to_string_pretty(&menu[index])
            .unwrap_or_else(|_| "{}".to_string());

        success_result(format!("Recipe for {}:\n\n{}", food_title, recipe))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<GetFoodMenuParams>().into(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the stdio transport.
    pub fn create_route<S>(config: Arc<Config>, upstream: Arc<UpstreamClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            let upstream = upstream.clone();
            async move {
                let params: GetFoodMenuParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config, &upstream).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn result_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    fn envelope_with_menu(menu: serde_json::Value) -> ApiEnvelope<FoodMenuData> {
        serde_json::from_value(serde_json::json!({
            "code": 0,
            "msg": "",
            "data": {"foodMenu": menu}
        }))
        .unwrap()
    }

    #[test]
    fn test_single_candidate_is_rendered() {
        let envelope = envelope_with_menu(serde_json::json!([
            {"intro": "classic", "duration": "30min"}
        ]));
        let result = GetFoodMenuTool::render_menu("mapo tofu", Some(envelope));
        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        let text = result_text(&result);
        assert!(text.contains("Recipe for mapo tofu"));
        assert!(text.contains("classic"));
    }

    #[test]
    fn test_chosen_variant_is_one_of_the_candidates() {
        let envelope = envelope_with_menu(serde_json::json!([
            {"intro": "v0"}, {"intro": "v1"}, {"intro": "v2"}
        ]));
        let result = GetFoodMenuTool::render_menu("dish", Some(envelope));
        let text = result_text(&result);
        assert!(text.contains("v0") || text.contains("v1") || text.contains("v2"));
    }

    #[test]
    fn test_empty_menu_is_a_defined_failure() {
        let envelope = envelope_with_menu(serde_json::json!([]));
        let result = GetFoodMenuTool::render_menu("unknown dish", Some(envelope));
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("No recipe found for 'unknown dish'"));
    }

    #[test]
    fn test_missing_data_is_a_defined_failure() {
        let envelope: ApiEnvelope<FoodMenuData> =
            serde_json::from_str(r#"{"code": 0, "msg": "ok"}"#).unwrap();
        let result = GetFoodMenuTool::render_menu("dish", Some(envelope));
        assert!(result.is_error.unwrap_or(false));
    }

    #[test]
    fn test_null_sentinel_renders_connectivity_failure() {
        let result = GetFoodMenuTool::render_menu("dish", None);
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("network connection"));
    }

    #[test]
    fn test_quota_code_renders_quota_text() {
        let envelope: ApiEnvelope<FoodMenuData> =
            serde_json::from_str(r#"{"code": -6, "msg": "whatever"}"#).unwrap();
        let result = GetFoodMenuTool::render_menu("dish", Some(envelope));
        let text = result_text(&result);
        assert!(text.contains("quota exhausted"));
        assert!(!text.contains("whatever"));
    }

    #[test]
    fn test_generic_failure_passes_code_and_msg_through() {
        let envelope: ApiEnvelope<FoodMenuData> =
            serde_json::from_str(r#"{"code": 7, "msg": "no such dish"}"#).unwrap();
        let result = GetFoodMenuTool::render_menu("dish", Some(envelope));
        let text = result_text(&result);
        assert!(text.contains("7"));
        assert!(text.contains("no such dish"));
    }

    #[tokio::test]
    async fn test_missing_credentials_short_circuits() {
        let params = GetFoodMenuParams {
            food_title: "mapo tofu".to_string(),
        };
        let config = Config::default();
        let upstream = UpstreamClient::with_base("http://127.0.0.1:9");
        let result = GetFoodMenuTool::execute(&params, &config, &upstream).await;
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("LUCKYCOLA_OPEN_KEY"));
    }
}
