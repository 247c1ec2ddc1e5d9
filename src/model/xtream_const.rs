pub const XC_PLAYER_API_PATH: &str = "player_api.php";

pub const XC_ACTION_GET_VOD_CATEGORIES: &str = "get_vod_categories";
pub const XC_ACTION_GET_VOD_STREAMS: &str = "get_vod_streams";
pub const XC_ACTION_GET_VOD_INFO: &str = "get_vod_info";
pub const XC_ACTION_GET_SERIES_CATEGORIES: &str = "get_series_categories";
pub const XC_ACTION_GET_SERIES: &str = "get_series";
pub const XC_ACTION_GET_SERIES_INFO: &str = "get_series_info";

pub const XC_PARAM_CATEGORY_ID: &str = "category_id";
pub const XC_PARAM_VOD_ID: &str = "vod_id";
pub const XC_PARAM_SERIES_ID: &str = "series_id";

pub const XC_DEFAULT_CONTAINER_EXTENSION: &str = "mp4";
