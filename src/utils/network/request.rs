use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use url::Url;

use crate::xtream_grab_error::{
    create_xtream_grab_error, create_xtream_grab_error_result, XtreamGrabError, XtreamGrabErrorKind,
};

const REQUEST_TIMEOUT_SECS: u64 = 30;

pub fn create_client() -> Arc<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());
    Arc::new(client)
}

/// Masks credential query parameters before a url reaches the logs.
pub fn sanitize_sensitive_info(url_str: &str) -> String {
    match Url::parse(url_str) {
        Ok(mut url) => {
            let pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(key, value)| {
                    if key == "username" || key == "password" {
                        (key.to_string(), String::from("***"))
                    } else {
                        (key.to_string(), value.to_string())
                    }
                })
                .collect();
            if !pairs.is_empty() {
                url.query_pairs_mut().clear().extend_pairs(pairs);
            }
            url.to_string()
        }
        Err(_) => url_str.to_string(),
    }
}

/// One GET, body parsed as json into `T`. A non-success status is a
/// `Network` error, a body that does not match `T` is a `Parse` error.
/// An empty array body is a legitimate empty result for list types and
/// parses fine; it is never turned into an error here.
pub async fn get_json_content<T: DeserializeOwned>(
    client: Arc<reqwest::Client>,
    url: &str,
) -> Result<T, XtreamGrabError> {
    debug!("requesting {}", sanitize_sensitive_info(url));
    let response = client.get(url).send().await.map_err(|err| {
        create_xtream_grab_error!(
            XtreamGrabErrorKind::Network,
            "cant connect to {}: {err}",
            sanitize_sensitive_info(url)
        )
    })?;
    let status = response.status();
    if !status.is_success() {
        return create_xtream_grab_error_result!(
            XtreamGrabErrorKind::Network,
            "request failed with status {status} for {}",
            sanitize_sensitive_info(url)
        );
    }
    let content = response.text().await.map_err(|err| {
        create_xtream_grab_error!(
            XtreamGrabErrorKind::Network,
            "cant read response from {}: {err}",
            sanitize_sensitive_info(url)
        )
    })?;
    serde_json::from_str::<T>(&content).map_err(|err| {
        create_xtream_grab_error!(
            XtreamGrabErrorKind::Parse,
            "unexpected response shape from {}: {err}",
            sanitize_sensitive_info(url)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::sanitize_sensitive_info;

    #[test]
    fn test_sanitize_masks_credentials() {
        let url = "http://h.co/player_api.php?username=u&password=p&action=get_series";
        let masked = sanitize_sensitive_info(url);
        assert!(!masked.contains("username=u"));
        assert!(!masked.contains("password=p"));
        assert!(masked.contains("action=get_series"));
    }

    #[test]
    fn test_sanitize_keeps_invalid_urls() {
        assert_eq!(sanitize_sensitive_info("not a url"), "not a url");
    }
}
