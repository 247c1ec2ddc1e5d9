use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::StreamExt;
use log::warn;

use crate::model::{SeriesDetail, ServerCredential};
use crate::utils::network::xtream;
use crate::xtream_grab_error::XtreamGrabError;

/// Cap on in-flight detail requests so a large batch does not hammer the
/// remote panel.
pub const BATCH_CONCURRENCY: usize = 4;

/// Fetches the detail of every series id, bounded concurrency. A failed id
/// is logged and left out of the result map, it never aborts the batch.
/// `on_progress` receives percent values in completion order, monotonically
/// non-decreasing and ending at 100.
pub async fn fetch_series_details<P>(
    client: Arc<reqwest::Client>,
    server: &ServerCredential,
    series_ids: &[String],
    on_progress: P,
) -> HashMap<String, SeriesDetail>
where
    P: FnMut(u32),
{
    run_batch(
        series_ids,
        |series_id| {
            let client = Arc::clone(&client);
            let server = server.clone();
            async move { xtream::get_series_detail(client, &server, &series_id).await }
        },
        on_progress,
    )
    .await
}

pub(crate) async fn run_batch<F, Fut, P>(
    series_ids: &[String],
    fetch: F,
    mut on_progress: P,
) -> HashMap<String, SeriesDetail>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<SeriesDetail, XtreamGrabError>>,
    P: FnMut(u32),
{
    let total = series_ids.len();
    if total == 0 {
        on_progress(100);
        return HashMap::new();
    }
    let mut results = HashMap::with_capacity(total);
    let mut completed = 0_usize;
    let mut stream = futures::stream::iter(series_ids.iter().map(|id| {
        let request = fetch(id.clone());
        let series_id = id.clone();
        async move { (series_id, request.await) }
    }))
    .buffer_unordered(BATCH_CONCURRENCY);

    while let Some((series_id, result)) = stream.next().await {
        completed += 1;
        match result {
            Ok(detail) => {
                results.insert(series_id, detail);
            }
            Err(err) => warn!("skipping series {series_id}: {err}"),
        }
        on_progress(u32::try_from(completed * 100 / total).unwrap_or(100));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xtream_grab_error::{XtreamGrabError, XtreamGrabErrorKind};

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn test_batch_isolates_single_failure() {
        let series_ids = ids(&["1", "2", "3", "4", "5"]);
        let mut reported = Vec::new();
        let result = run_batch(
            &series_ids,
            |id| async move {
                if id == "3" {
                    Err(XtreamGrabError::new(
                        XtreamGrabErrorKind::Network,
                        String::from("unreachable"),
                    ))
                } else {
                    Ok(SeriesDetail::default())
                }
            },
            |percent| reported.push(percent),
        )
        .await;

        assert_eq!(result.len(), 4);
        assert!(!result.contains_key("3"));
        assert_eq!(reported.len(), 5);
        assert!(reported.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*reported.last().unwrap(), 100);
    }

    #[tokio::test]
    async fn test_empty_batch_reports_completion() {
        let mut reported = Vec::new();
        let result = run_batch(
            &[],
            |_| async move { Ok(SeriesDetail::default()) },
            |percent| reported.push(percent),
        )
        .await;
        assert!(result.is_empty());
        assert_eq!(reported, vec![100]);
    }

    #[tokio::test]
    async fn test_batch_collects_all_on_success() {
        let series_ids = ids(&["a", "b"]);
        let result = run_batch(
            &series_ids,
            |_| async move { Ok(SeriesDetail::default()) },
            |_| {},
        )
        .await;
        assert_eq!(result.len(), 2);
        assert!(result.contains_key("a") && result.contains_key("b"));
    }
}
