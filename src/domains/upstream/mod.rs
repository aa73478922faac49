//! Upstream domain: the LuckyCola open-platform HTTP API.
//!
//! Three fixed POST endpoints (image safety, recipe lookup, OCR) share one
//! response envelope and one credential pair. The client collapses every
//! transport-level failure to a `None` sentinel; reachable-but-failing
//! responses keep their `code`/`msg` for the dispatcher to interpret.

pub mod api;
pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{
    ApiEnvelope, FoodMenuData, OcrData, SafetyCheckData, SafetySubResult, is_quota_exhausted,
    verdict,
};
