//! Image safety check tool definition.
//!
//! Checks whether a remote image is content-safe by delegating to the
//! upstream image-safety endpoint and rendering its report as text.

use futures::FutureExt;
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
use crate::domains::upstream::{
    ApiEnvelope, SafetyCheckData, UpstreamClient, is_quota_exhausted, verdict,
};

const SERVICE: &str = "Image safety check";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the image safety check tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CheckImageParams {
    /// URL of the image to check.
    #[serde(rename = "imgUrl")]
    #[schemars(description = "URL of the image to check")]
    pub img_url: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Image safety check tool.
pub struct CheckImageTool;

impl CheckImageTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "checkImage";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Check whether an online image is content-safe. Returns a verdict \
         (compliant / manual review / non-compliant), a safety score, and the raw detail.";

    /// Execute the tool logic.
    pub async fn execute(
        params: &CheckImageParams,
        config: &Config,
        upstream: &UpstreamClient,
    ) -> CallToolResult {
        info!("Image safety check called for: {}", params.img_url);

        let Some((app_key, uid)) = config.credentials.pair() else {
            warn!("Image safety check refused: credentials not configured");
            return ToolFailure::MissingCredentials.into_result();
        };

        let envelope = upstream.check_image(&params.img_url, app_key, uid).await;
        Self::render_report(envelope)
    }

    /// Turn the upstream response into the caller-visible text result.
    ///
    /// Split out from `execute` so the full taxonomy can be exercised with
    /// constructed envelopes instead of a live endpoint.
    pub fn render_report(envelope: Option<ApiEnvelope<SafetyCheckData>>) -> CallToolResult {
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

        let data = envelope.data.unwrap_or_default();
        let detail = data.first_sub_result();
        let detail_json = serde_json::to_string_pretty(&detail)
            .unwrap_or_else(|_| "{}".to_string());

        success_result(format!(
            "Image safety check result:\n\n\
             Tip: {}\n\
             Verdict: {}\n\
             Safety score: {:.2}%\n\
             Detail: {}",
            data.tips,
            verdict(&detail.suggestion),
            detail.rate,
            detail_json
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<CheckImageParams>().into(),
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
                let params: CheckImageParams =
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

    fn passing_envelope() -> ApiEnvelope<SafetyCheckData> {
        serde_json::from_str(
            r#"{
                "code": 0,
                "msg": "success",
                "data": {
                    "tips": "ok",
                    "Results": [{
                        "ImageURL": "http://x/y.jpg",
                        "SubResults": [{"Suggestion": "pass", "Rate": 99.5}]
                    }]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_success_report_contains_verdict_and_score() {
        let result = CheckImageTool::render_report(Some(passing_envelope()));
        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        let text = result_text(&result);
        assert!(text.contains("compliant"));
        assert!(text.contains("99.50%"));
        assert!(text.contains("Tip: ok"));
        assert!(!text.contains("failed"));
    }

    #[test]
    fn test_review_suggestion_renders_manual_review() {
        let mut envelope = passing_envelope();
        envelope.data.as_mut().unwrap().results[0].sub_results[0].suggestion =
            "review".to_string();
        let result = CheckImageTool::render_report(Some(envelope));
        assert!(result_text(&result).contains("manual review"));
    }

    #[test]
    fn test_absent_sub_results_render_non_compliant_with_zero_score() {
        let envelope: ApiEnvelope<SafetyCheckData> =
            serde_json::from_str(r#"{"code": 0, "msg": "ok", "data": {"tips": "hm"}}"#).unwrap();
        let result = CheckImageTool::render_report(Some(envelope));
        let text = result_text(&result);
        assert!(text.contains("non-compliant"));
        assert!(text.contains("0.00%"));
    }

    #[test]
    fn test_null_sentinel_renders_connectivity_failure() {
        let result = CheckImageTool::render_report(None);
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("network connection"));
    }

    #[test]
    fn test_quota_codes_render_quota_text_regardless_of_msg() {
        for code in [-5, -6] {
            let envelope: ApiEnvelope<SafetyCheckData> = serde_json::from_str(&format!(
                r#"{{"code": {}, "msg": "something unrelated"}}"#,
                code
            ))
            .unwrap();
            let result = CheckImageTool::render_report(Some(envelope));
            let text = result_text(&result);
            assert!(text.contains("quota exhausted"));
            assert!(!text.contains("something unrelated"));
        }
    }

    #[test]
    fn test_other_nonzero_code_passes_code_and_msg_through() {
        let envelope: ApiEnvelope<SafetyCheckData> =
            serde_json::from_str(r#"{"code": -2, "msg": "img download failed"}"#).unwrap();
        let result = CheckImageTool::render_report(Some(envelope));
        let text = result_text(&result);
        assert!(text.contains("-2"));
        assert!(text.contains("img download failed"));
    }

    #[tokio::test]
    async fn test_missing_credentials_short_circuits() {
        let params = CheckImageParams {
            img_url: "http://x/y.jpg".to_string(),
        };
        let config = Config::default();
        let upstream = UpstreamClient::with_base("http://127.0.0.1:9");
        let result = CheckImageTool::execute(&params, &config, &upstream).await;
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("LUCKYCOLA_OPEN_KEY"));
    }

    #[test]
    fn test_params_require_img_url() {
        let parsed: Result<CheckImageParams, _> = serde_json::from_str("{}");
        assert!(parsed.is_err());

        let parsed: CheckImageParams =
            serde_json::from_str(r#"{"imgUrl": "http://x/y.jpg"}"#).unwrap();
        assert_eq!(parsed.img_url, "http://x/y.jpg");
    }
}
