//! Fixed endpoint locations and reserved response codes for the
//! LuckyCola open platform.

/// Base URL shared by all endpoints.
pub const BASE_URL: &str = "https://luckycola.com.cn";

/// Image safety check endpoint path.
pub const IMAGE_CHECK_PATH: &str = "/imgCheck/checkV2";

/// Recipe lookup endpoint path.
pub const FOOD_MENU_PATH: &str = "/food/getFoodMenu";

/// OCR endpoint path.
pub const IMAGE_OCR_PATH: &str = "/openOcr/baseOCR";

/// Reserved response codes meaning the caller's API quota is depleted.
/// These apply uniformly to all three endpoints and are distinct from
/// generic nonzero failure codes.
pub const QUOTA_EXHAUSTED_CODES: [i64; 2] = [-5, -6];
