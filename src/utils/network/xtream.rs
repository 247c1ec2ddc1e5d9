use std::sync::Arc;

use serde_json::{Map, Value};

use crate::model::xtream_const as xc;
use crate::model::{
    CatalogKind, Category, MovieDetail, MovieEntry, SeriesDetail, SeriesEntry, ServerCredential,
};
use crate::utils::network::request;
use crate::xtream_grab_error::{
    create_xtream_grab_error, create_xtream_grab_error_result, XtreamGrabError, XtreamGrabErrorKind,
};

#[inline]
pub fn get_player_api_url_base(server: &ServerCredential) -> String {
    format!(
        "{}/{}?username={}&password={}",
        server.url.trim_end_matches('/'),
        xc::XC_PLAYER_API_PATH,
        server.username,
        server.password
    )
}

pub fn get_player_api_action_url(server: &ServerCredential, action: &str) -> String {
    format!("{}&action={action}", get_player_api_url_base(server))
}

fn check_credential(server: &ServerCredential) -> Result<(), XtreamGrabError> {
    if server.url.is_empty() || server.username.is_empty() || server.password.is_empty() {
        return create_xtream_grab_error_result!(
            XtreamGrabErrorKind::Validation,
            "url, username and password are required"
        );
    }
    Ok(())
}

pub async fn get_categories(
    client: Arc<reqwest::Client>,
    server: &ServerCredential,
    kind: CatalogKind,
) -> Result<Vec<Category>, XtreamGrabError> {
    check_credential(server)?;
    let action = match kind {
        CatalogKind::Movie => xc::XC_ACTION_GET_VOD_CATEGORIES,
        CatalogKind::Series => xc::XC_ACTION_GET_SERIES_CATEGORIES,
    };
    request::get_json_content(client, &get_player_api_action_url(server, action)).await
}

pub async fn get_movies(
    client: Arc<reqwest::Client>,
    server: &ServerCredential,
    category_id: Option<&str>,
) -> Result<Vec<MovieEntry>, XtreamGrabError> {
    check_credential(server)?;
    let mut url = get_player_api_action_url(server, xc::XC_ACTION_GET_VOD_STREAMS);
    if let Some(cid) = category_id {
        url.push_str(&format!("&{}={cid}", xc::XC_PARAM_CATEGORY_ID));
    }
    request::get_json_content(client, &url).await
}

pub async fn get_series(
    client: Arc<reqwest::Client>,
    server: &ServerCredential,
    category_id: Option<&str>,
) -> Result<Vec<SeriesEntry>, XtreamGrabError> {
    check_credential(server)?;
    let mut url = get_player_api_action_url(server, xc::XC_ACTION_GET_SERIES);
    if let Some(cid) = category_id {
        url.push_str(&format!("&{}={cid}", xc::XC_PARAM_CATEGORY_ID));
    }
    request::get_json_content(client, &url).await
}

pub async fn get_movie_detail(
    client: Arc<reqwest::Client>,
    server: &ServerCredential,
    stream_id: &str,
) -> Result<MovieDetail, XtreamGrabError> {
    check_credential(server)?;
    let url = format!(
        "{}&{}={stream_id}",
        get_player_api_action_url(server, xc::XC_ACTION_GET_VOD_INFO),
        xc::XC_PARAM_VOD_ID
    );
    let value: Value = request::get_json_content(client, &url).await?;
    if is_not_found_response(&value) {
        return create_xtream_grab_error_result!(
            XtreamGrabErrorKind::NotFound,
            "no movie with id {stream_id}"
        );
    }
    serde_json::from_value(value).map_err(|err| {
        create_xtream_grab_error!(
            XtreamGrabErrorKind::Parse,
            "unexpected movie info shape for id {stream_id}: {err}"
        )
    })
}

pub async fn get_series_detail(
    client: Arc<reqwest::Client>,
    server: &ServerCredential,
    series_id: &str,
) -> Result<SeriesDetail, XtreamGrabError> {
    check_credential(server)?;
    let url = format!(
        "{}&{}={series_id}",
        get_player_api_action_url(server, xc::XC_ACTION_GET_SERIES_INFO),
        xc::XC_PARAM_SERIES_ID
    );
    let mut value: Value = request::get_json_content(client, &url).await?;
    if is_not_found_response(&value) {
        return create_xtream_grab_error_result!(
            XtreamGrabErrorKind::NotFound,
            "no series with id {series_id}"
        );
    }
    normalize_series_episodes(&mut value);
    serde_json::from_value(value).map_err(|err| {
        create_xtream_grab_error!(
            XtreamGrabErrorKind::Parse,
            "unexpected series info shape for id {series_id}: {err}"
        )
    })
}

// Xtream panels answer a detail query for an unknown id with an empty
// array or null instead of an error object.
fn is_not_found_response(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(entries) => entries.is_empty(),
        _ => false,
    }
}

/// Some panel versions deliver `episodes` as an array of per-season arrays
/// instead of a season-label keyed object. Rewrites that variant into the
/// canonical object shape, season label taken from the episodes' `season`
/// field and falling back to the array position.
fn normalize_series_episodes(value: &mut Value) {
    let Some(document) = value.as_object_mut() else {
        return;
    };
    let Some(Value::Array(season_groups)) = document.get("episodes") else {
        return;
    };
    let mut episodes = Map::new();
    for (index, group) in season_groups.iter().enumerate() {
        let Value::Array(group_episodes) = group else {
            continue;
        };
        if group_episodes.is_empty() {
            continue;
        }
        let label = group_episodes
            .first()
            .and_then(|episode| episode.get("season"))
            .map_or_else(
                || (index + 1).to_string(),
                |season| match season {
                    Value::String(s) => s.to_string(),
                    other => other.to_string(),
                },
            );
        // two groups can carry the same season label, keep both
        let slot = episodes
            .entry(label)
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(existing) = slot {
            existing.extend(group_episodes.iter().cloned());
        }
    }
    document.insert(String::from("episodes"), Value::Object(episodes));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_server() -> ServerCredential {
        ServerCredential::new("http://h.co", "u", "p")
    }

    #[test]
    fn test_action_url() {
        let url = get_player_api_action_url(&test_server(), xc::XC_ACTION_GET_VOD_STREAMS);
        assert_eq!(
            url,
            "http://h.co/player_api.php?username=u&password=p&action=get_vod_streams"
        );
    }

    #[test]
    fn test_not_found_shapes() {
        assert!(is_not_found_response(&serde_json::json!([])));
        assert!(is_not_found_response(&Value::Null));
        assert!(!is_not_found_response(&serde_json::json!({"info": {}})));
        assert!(!is_not_found_response(&serde_json::json!([1])));
    }

    #[test]
    fn test_normalize_array_episodes_variant() {
        let mut value = serde_json::json!({
            "info": {"name": "Show"},
            "episodes": [
                [{"id": "1", "episode_num": 1, "season": 1}],
                [{"id": "2", "episode_num": 1, "season": "2"}]
            ]
        });
        normalize_series_episodes(&mut value);
        let detail: SeriesDetail = serde_json::from_value(value).unwrap();
        let seasons: Vec<&String> = detail.episodes.keys().collect();
        assert_eq!(seasons, vec!["1", "2"]);
        assert_eq!(detail.episodes["2"][0].id, "2");
    }

    #[test]
    fn test_normalize_merges_groups_with_same_season_label() {
        let mut value = serde_json::json!({
            "episodes": [
                [{"id": "1", "episode_num": 1, "season": 1}],
                [{"id": "2", "episode_num": 2, "season": "1"}]
            ]
        });
        normalize_series_episodes(&mut value);
        let detail: SeriesDetail = serde_json::from_value(value).unwrap();
        assert_eq!(detail.episodes.len(), 1);
        let ids: Vec<&str> = detail.episodes["1"].iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_normalize_keeps_object_episodes() {
        let mut value = serde_json::json!({
            "episodes": {"1": [{"id": "5", "episode_num": 5}]}
        });
        normalize_series_episodes(&mut value);
        let detail: SeriesDetail = serde_json::from_value(value).unwrap();
        assert_eq!(detail.episodes["1"][0].id, "5");
    }
}
