//! Response envelope and payload types for the upstream API.
//!
//! Field casing follows the wire format of the upstream responses
//! (camelCase payload keys, PascalCase inside the safety report).

use serde::{Deserialize, Serialize};

use super::api::QUOTA_EXHAUSTED_CODES;

/// The `{code, msg, data?}` envelope every endpoint responds with.
///
/// `code == 0` signals success. `data` may be absent on failure, so callers
/// must check the code before reading payload fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub code: i64,

    #[serde(default)]
    pub msg: String,

    #[serde(default)]
    pub data: Option<T>,
}

/// Whether a response code is one of the reserved quota-exhaustion codes.
pub fn is_quota_exhausted(code: i64) -> bool {
    QUOTA_EXHAUSTED_CODES.contains(&code)
}

/// Map an upstream safety suggestion to the caller-visible verdict.
///
/// The mapping is total: any suggestion other than "pass" or "review"
/// (including an absent one) is non-compliant.
pub fn verdict(suggestion: &str) -> &'static str {
    match suggestion {
        "pass" => "compliant",
        "review" => "manual review",
        _ => "non-compliant",
    }
}

/// Payload of the image safety check endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyCheckData {
    #[serde(default)]
    pub tips: String,

    #[serde(rename = "Results", default)]
    pub results: Vec<SafetyResult>,
}

impl SafetyCheckData {
    /// The first sub-result, which carries the verdict and score.
    pub fn first_sub_result(&self) -> SafetySubResult {
        self.results
            .first()
            .and_then(|r| r.sub_results.first())
            .cloned()
            .unwrap_or_default()
    }
}

/// One scanned image inside a safety report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyResult {
    #[serde(rename = "ImageURL", default)]
    pub image_url: String,

    #[serde(rename = "SubResults", default)]
    pub sub_results: Vec<SafetySubResult>,
}

/// One scene verdict inside a safety report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetySubResult {
    #[serde(rename = "Suggestion", default)]
    pub suggestion: String,

    #[serde(rename = "Rate", default)]
    pub rate: f64,

    #[serde(rename = "Label", default)]
    pub label: String,

    #[serde(rename = "Scene", default)]
    pub scene: String,
}

/// Payload of the recipe lookup endpoint. Recipe variants are kept as raw
/// JSON objects; the tool renders the chosen one verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoodMenuData {
    #[serde(rename = "foodMenu", default)]
    pub food_menu: Vec<serde_json::Value>,
}

/// Payload of the OCR endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrData {
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_mapping_is_total_and_exact() {
        assert_eq!(verdict("pass"), "compliant");
        assert_eq!(verdict("review"), "manual review");
        assert_eq!(verdict("block"), "non-compliant");
        assert_eq!(verdict(""), "non-compliant");
        assert_eq!(verdict("PASS"), "non-compliant");
    }

    #[test]
    fn test_quota_codes() {
        assert!(is_quota_exhausted(-5));
        assert!(is_quota_exhausted(-6));
        assert!(!is_quota_exhausted(0));
        assert!(!is_quota_exhausted(-1));
        assert!(!is_quota_exhausted(5));
    }

    #[test]
    fn test_envelope_without_data_field() {
        let envelope: ApiEnvelope<SafetyCheckData> =
            serde_json::from_str(r#"{"code": -3, "msg": "bad request"}"#).unwrap();
        assert_eq!(envelope.code, -3);
        assert_eq!(envelope.msg, "bad request");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_safety_payload_wire_casing() {
        let json = r#"{
            "code": 0,
            "msg": "ok",
            "data": {
                "tips": "ok",
                "Results": [{
                    "ImageURL": "http://x/y.jpg",
                    "SubResults": [{
                        "Suggestion": "pass",
                        "Rate": 99.5,
                        "Label": "normal",
                        "Scene": "porn"
                    }]
                }]
            }
        }"#;
        let envelope: ApiEnvelope<SafetyCheckData> = serde_json::from_str(json).unwrap();
        let sub = envelope.data.unwrap().first_sub_result();
        assert_eq!(sub.suggestion, "pass");
        assert_eq!(sub.rate, 99.5);
        assert_eq!(sub.label, "normal");
    }

    #[test]
    fn test_first_sub_result_defaults_when_absent() {
        let data = SafetyCheckData::default();
        let sub = data.first_sub_result();
        assert_eq!(sub.suggestion, "");
        assert_eq!(sub.rate, 0.0);
    }

    #[test]
    fn test_food_menu_payload() {
        let json = r#"{
            "code": 0,
            "msg": "",
            "data": {"foodMenu": [{"intro": "a"}, {"intro": "b"}]}
        }"#;
        let envelope: ApiEnvelope<FoodMenuData> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.unwrap().food_menu.len(), 2);
    }
}
